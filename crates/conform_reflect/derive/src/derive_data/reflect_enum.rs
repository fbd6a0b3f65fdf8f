use proc_macro2::TokenStream;
use quote::quote;
use syn::Variant;

use super::{ReflectMeta, StructField, VariantAttributes};

// -----------------------------------------------------------------------------
// Define

pub(crate) struct ReflectEnum<'a> {
    pub meta: ReflectMeta<'a>,
    pub variants: Vec<EnumVariant<'a>>,
}

/// Represents a variant on an enum.
pub(crate) struct EnumVariant<'a> {
    /// The raw variant.
    pub data: &'a Variant,
    /// The fields within this variant.
    pub fields: EnumVariantFields<'a>,
    pub attrs: VariantAttributes,
    /// Position in the declaration.
    pub index: usize,
    /// The discriminator, `rename` and `rename_all` applied.
    pub tag: String,
}

pub(crate) enum EnumVariantFields<'a> {
    Named(Vec<StructField<'a>>),
    Unnamed(Vec<StructField<'a>>),
    Unit,
}

// -----------------------------------------------------------------------------
// EnumVariant Implementation

impl<'a> EnumVariant<'a> {
    pub fn new(data: &'a Variant, index: usize, meta: &ReflectMeta) -> syn::Result<Self> {
        let attrs = VariantAttributes::parse_attrs(&data.attrs)?;

        let fields = match &data.fields {
            syn::Fields::Named(named) => {
                EnumVariantFields::Named(StructField::collect_named(&named.named, meta, false)?)
            }
            syn::Fields::Unnamed(unnamed) => {
                EnumVariantFields::Unnamed(StructField::collect_unnamed(&unnamed.unnamed)?)
            }
            syn::Fields::Unit => EnumVariantFields::Unit,
        };

        let name = data.ident.to_string();
        let tag = match (&attrs.rename, meta.attrs().rename_all) {
            (Some(rename), _) => rename.value(),
            (None, Some(rule)) => rule.apply_to_variant(&name),
            (None, None) => name,
        };

        Ok(Self {
            data,
            fields,
            attrs,
            index,
            tag,
        })
    }

    /// The complete set of fields in this variant.
    pub fn fields(&self) -> &[StructField<'a>] {
        match &self.fields {
            EnumVariantFields::Named(fields) | EnumVariantFields::Unnamed(fields) => fields,
            EnumVariantFields::Unit => &[],
        }
    }

    /// Generates the `VariantInfo` of this variant.
    ///
    /// ```ignore
    /// _path_::info::VariantInfo::new("Circle", _path_::info::VariantKind::Struct(...))
    ///     .with_tag("circle")
    /// ```
    pub fn to_info_tokens(&self, conform_reflect_path: &syn::Path) -> TokenStream {
        let variant_info_ = crate::path::variant_info_(conform_reflect_path);
        let variant_kind_ = crate::path::variant_kind_(conform_reflect_path);
        let type_info_ = crate::path::type_info_(conform_reflect_path);
        let typed_ = crate::path::typed_(conform_reflect_path);
        let exports_ = crate::path::macro_exports_(conform_reflect_path);

        let kind = match &self.fields {
            EnumVariantFields::Unit => quote!(#variant_kind_::Unit),
            EnumVariantFields::Unnamed(fields) if fields.len() == 1 => {
                let ty = fields[0].ty();
                quote!(#variant_kind_::Newtype(<#ty as #typed_>::type_info))
            }
            EnumVariantFields::Unnamed(fields) => {
                let elements = fields.iter().map(|field| {
                    let ty = field.ty();
                    quote!(<#ty as #typed_>::type_info as fn() -> &'static #type_info_)
                });
                quote! {
                    #variant_kind_::Tuple(#exports_::vec![#(#elements),*].into_boxed_slice())
                }
            }
            EnumVariantFields::Named(fields) => {
                let fields = fields
                    .iter()
                    .map(|field| field.to_info_tokens(conform_reflect_path));
                quote! {
                    #variant_kind_::Struct(#exports_::vec![#(#fields),*].into_boxed_slice())
                }
            }
        };

        let name = self.data.ident.to_string();
        let with_tag = (self.tag != name).then(|| {
            let tag = &self.tag;
            quote!(.with_tag(#tag))
        });
        let with_aliases = (!self.attrs.aliases.is_empty()).then(|| {
            let aliases = &self.attrs.aliases;
            quote!(.with_aliases(&[#(#aliases),*]))
        });

        quote! {
            #variant_info_::new(#name, #kind)
                #with_tag
                #with_aliases
        }
    }

    /// Generates a pattern binding every field to its local.
    ///
    /// ```ignore
    /// Self::Rect { w: __field0, h: __field1 }
    /// ```
    pub fn pattern_tokens(&self) -> TokenStream {
        let ident = &self.data.ident;
        let members = self.fields().iter().map(StructField::member);
        let locals = self.fields().iter().map(StructField::local);
        match &self.fields {
            EnumVariantFields::Unit => quote!(Self::#ident),
            _ => quote!(Self::#ident { #(#members: #locals),* }),
        }
    }
}

// -----------------------------------------------------------------------------
// Enum Implementation

impl<'a> ReflectEnum<'a> {
    #[inline]
    pub fn meta(&self) -> &ReflectMeta<'a> {
        &self.meta
    }

    /// Generates the `Tagging` of the enum, if not the default one.
    pub fn with_tagging_tokens(&self) -> Option<TokenStream> {
        let tagging_ = crate::path::tagging_(self.meta.conform_reflect_path());
        let attrs = self.meta.attrs();

        let tagging = match (&attrs.tag, &attrs.content) {
            (Some(tag), Some(content)) => {
                quote!(#tagging_::Adjacent { tag: #tag, content: #content })
            }
            (Some(tag), None) => quote!(#tagging_::Internal { tag: #tag }),
            (None, _) if attrs.external.is_some() => quote!(#tagging_::External),
            (None, _) if attrs.untagged.is_some() => quote!(#tagging_::Untagged),
            (None, _) => return None,
        };
        Some(quote!(.with_tagging(#tagging)))
    }
}
