use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{Field, Member, Type};

use super::{FieldAttributes, ReflectMeta};

// -----------------------------------------------------------------------------
// StructField

/// The role of a field in the representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FieldRole {
    /// An own field, with its position among the non-base fields.
    Own(usize),
    /// A `#[reflect(base)]` field, with its position among the base fields.
    Base(usize),
}

/// A field of a struct or of a struct variant.
pub(crate) struct StructField<'a> {
    /// The raw field.
    pub data: &'a Field,
    pub attrs: FieldAttributes,
    /// Position in the Rust definition.
    pub index: usize,
    pub role: FieldRole,
    /// The representation key, `rename` and `rename_all` applied.
    pub repr_name: String,
}

impl<'a> StructField<'a> {
    /// Collects named fields, computing roles and representation names.
    ///
    /// `allow_base` is false for struct variants.
    pub fn collect_named(
        fields: impl IntoIterator<Item = &'a Field>,
        meta: &ReflectMeta,
        allow_base: bool,
    ) -> syn::Result<Vec<Self>> {
        let rename_all = meta.attrs().rename_all;
        let mut own = 0;
        let mut base = 0;

        let mut collected = Vec::new();
        for (index, data) in fields.into_iter().enumerate() {
            let attrs = FieldAttributes::parse_attrs(&data.attrs)?;

            let role = match attrs.base {
                Some(span) if !allow_base => {
                    return Err(syn::Error::new(span, "`base` is only valid on struct fields"));
                }
                Some(_) => {
                    base += 1;
                    FieldRole::Base(base - 1)
                }
                None => {
                    own += 1;
                    FieldRole::Own(own - 1)
                }
            };

            let name = data
                .ident
                .as_ref()
                .map(|ident| ident.unraw().to_string())
                .unwrap_or_default();
            let repr_name = match (&attrs.rename, rename_all) {
                (Some(rename), _) => rename.value(),
                (None, Some(rule)) => rule.apply_to_field(&name),
                (None, None) => name,
            };

            collected.push(Self {
                data,
                attrs,
                index,
                role,
                repr_name,
            });
        }
        Ok(collected)
    }

    /// Collects unnamed fields, which take no attributes.
    pub fn collect_unnamed(fields: impl IntoIterator<Item = &'a Field>) -> syn::Result<Vec<Self>> {
        let mut collected = Vec::new();
        for (index, data) in fields.into_iter().enumerate() {
            let attrs = FieldAttributes::parse_attrs(&data.attrs)?;
            if !attrs.is_empty() {
                return Err(syn::Error::new_spanned(
                    data,
                    "field attributes are only supported on named fields",
                ));
            }
            collected.push(Self {
                data,
                attrs,
                index,
                role: FieldRole::Own(index),
                repr_name: index.to_string(),
            });
        }
        Ok(collected)
    }

    #[inline]
    pub fn ty(&self) -> &'a Type {
        &self.data.ty
    }

    /// `self.name` or `self.0`.
    pub fn member(&self) -> Member {
        match &self.data.ident {
            Some(ident) => Member::Named(ident.clone()),
            None => Member::Unnamed(self.index.into()),
        }
    }

    /// The local binding used by generated code.
    #[inline]
    pub fn local(&self) -> Ident {
        format_ident!("__field{}", self.index)
    }

    /// The Rust name, without `r#`.
    pub fn name(&self) -> String {
        self.data
            .ident
            .as_ref()
            .map(|ident| ident.unraw().to_string())
            .unwrap_or_else(|| self.index.to_string())
    }

    /// Generates the `FieldInfo` of a named field.
    ///
    /// ```ignore
    /// _path_::info::FieldInfo::new::<u16>("port", 1)
    ///     .with_repr_name("Port")
    ///     .with_aliases(&["p"])
    ///     .with_default(|| -> Box<dyn Reflect> { ... })
    /// ```
    pub fn to_info_tokens(&self, conform_reflect_path: &syn::Path) -> TokenStream {
        let field_info_ = crate::path::field_info_(conform_reflect_path);
        let reflect_ = crate::path::reflect_(conform_reflect_path);
        let result_ = crate::path::result_(conform_reflect_path);
        let error_ = crate::path::error_(conform_reflect_path);
        let value_ = crate::path::value_(conform_reflect_path);
        let skip_ = crate::path::skip_(conform_reflect_path);
        let exports_ = crate::path::macro_exports_(conform_reflect_path);

        let ty = self.ty();
        let name = self.name();
        let index = self.index;
        let attrs = &self.attrs;

        let with_repr_name = (self.repr_name != name).then(|| {
            let repr_name = &self.repr_name;
            quote!(.with_repr_name(#repr_name))
        });

        let with_aliases = (!attrs.aliases.is_empty()).then(|| {
            let aliases = &attrs.aliases;
            quote!(.with_aliases(&[#(#aliases),*]))
        });

        let with_default = attrs.default_expr(ty).map(|default| {
            quote! {
                .with_default(|| -> #exports_::Box<dyn #reflect_> {
                    let value: #ty = #default;
                    #exports_::Box::new(value)
                })
            }
        });

        let skip_if = |predicate: TokenStream| {
            quote! {
                .with_skip(#skip_::If(|value: &dyn #reflect_| -> bool {
                    match value.downcast_ref::<#ty>() {
                        #exports_::Some(value) => #predicate,
                        #exports_::None => false,
                    }
                }))
            }
        };
        let with_skip = if attrs.skip.is_some() {
            Some(quote!(.with_skip(#skip_::Always)))
        } else if attrs.skip_if_default.is_some() {
            Some(skip_if(quote! {
                ::core::cmp::PartialEq::eq(value, &<#ty as ::core::default::Default>::default())
            }))
        } else {
            attrs.skip_if.as_ref().map(|path| skip_if(quote!(#path(value))))
        };

        let with_serializer = attrs.serialize_with.as_ref().map(|path| {
            let message = format!("field `{name}` holds an unexpected type");
            quote! {
                .with_serializer(|value: &dyn #reflect_| -> #result_<#value_> {
                    match value.downcast_ref::<#ty>() {
                        #exports_::Some(value) => #path(value),
                        #exports_::None => #exports_::Err(#error_::custom(#message)),
                    }
                })
            }
        });

        let with_deserializer = attrs.deserialize_with.as_ref().map(|path| {
            quote! {
                .with_deserializer(|value: &#value_| -> #result_<#exports_::Box<dyn #reflect_>> {
                    let value: #ty = #path(value)?;
                    #exports_::Ok(#exports_::Box::new(value))
                })
            }
        });

        quote! {
            #field_info_::new::<#ty>(#name, #index)
                #with_repr_name
                #with_aliases
                #with_default
                #with_skip
                #with_serializer
                #with_deserializer
        }
    }

    /// Generates the statement reading this field into its local.
    ///
    /// `access` is a `ClassAccess` and `de` the deserializer.
    pub fn to_read_tokens(&self, access: &Ident, de: &Ident) -> TokenStream {
        let ty = self.ty();
        let local = self.local();
        match self.role {
            FieldRole::Base(base) => quote! {
                let #local = #access.base::<#ty>(#de, #base)?;
            },
            FieldRole::Own(_) if self.attrs.skip.is_some() => {
                let default = self
                    .attrs
                    .default_expr(ty)
                    .unwrap_or_else(|| quote!(::core::default::Default::default()));
                quote! {
                    let #local: #ty = #default;
                }
            }
            FieldRole::Own(own) => quote! {
                let #local = #access.field::<#ty>(#de, #own)?;
            },
        }
    }
}

// -----------------------------------------------------------------------------
// ReflectStruct

/// A struct, named or tuple.
pub(crate) struct ReflectStruct<'a> {
    pub meta: ReflectMeta<'a>,
    pub fields: Vec<StructField<'a>>,
}

impl<'a> ReflectStruct<'a> {
    #[inline]
    pub fn meta(&self) -> &ReflectMeta<'a> {
        &self.meta
    }

    pub fn own_fields(&self) -> impl Iterator<Item = &StructField<'a>> {
        self.fields
            .iter()
            .filter(|field| matches!(field.role, FieldRole::Own(_)))
    }

    pub fn base_fields(&self) -> impl Iterator<Item = &StructField<'a>> {
        self.fields
            .iter()
            .filter(|field| matches!(field.role, FieldRole::Base(_)))
    }

    /// Generates `field_at` arms for every field, bases included.
    ///
    /// ```ignore
    /// 0 => Some(&self.host),
    /// ```
    pub fn field_at_arms(&self) -> TokenStream {
        let conform_reflect_path = self.meta.conform_reflect_path();
        let reflect_ = crate::path::reflect_(conform_reflect_path);
        let exports_ = crate::path::macro_exports_(conform_reflect_path);

        let arms = self.fields.iter().map(|field| {
            let index = field.index;
            let member = field.member();
            quote!(#index => #exports_::Some(&self.#member as &dyn #reflect_),)
        });
        quote!(#(#arms)*)
    }
}
