use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use super::{get_auto_register_impl, impl_trait_reflect, impl_trait_typed};

use crate::derive_data::{EnumVariant, EnumVariantFields, ReflectEnum, StructField};

/// Implement full reflect for enum type.
///
/// Enums are unions: the active variant plus a discriminator placed
/// according to the tagging mode.
pub(crate) fn impl_enum(info: &ReflectEnum) -> TokenStream {
    let meta = info.meta();
    let conform_reflect_path = meta.conform_reflect_path();
    let type_info_ = crate::path::type_info_(conform_reflect_path);
    let union_info_ = crate::path::union_info_(conform_reflect_path);
    let reflect_ref_ = crate::path::reflect_ref_(conform_reflect_path);
    let exports_ = crate::path::macro_exports_(conform_reflect_path);

    let variants = info
        .variants
        .iter()
        .map(|variant| variant.to_info_tokens(conform_reflect_path));
    let with_tagging = info.with_tagging_tokens();

    // trait: Typed
    let typed_trait_tokens = impl_trait_typed(
        meta,
        quote! {
            #type_info_::Union(
                #union_info_::new::<Self>(#exports_::vec![#(#variants),*])
                    #with_tagging
            )
        },
    );

    // trait: Reflect
    let reflect_trait_tokens = impl_trait_reflect(meta, quote!(#reflect_ref_::Union(self)));

    // trait: Union
    let union_trait_tokens = impl_trait_union(info);

    // trait: FromRepr
    let from_repr_tokens = impl_enum_from_repr(info);

    // feature: auto_register
    let auto_register_tokens = get_auto_register_impl(meta);

    quote! {
        #typed_trait_tokens

        #reflect_trait_tokens

        #union_trait_tokens

        #from_repr_tokens

        #auto_register_tokens
    }
}

/// Generate `Union` trait implementation tokens.
fn impl_trait_union(info: &ReflectEnum) -> TokenStream {
    let meta = info.meta();
    let conform_reflect_path = meta.conform_reflect_path();
    let union_ = crate::path::union_(conform_reflect_path);
    let reflect_ = crate::path::reflect_(conform_reflect_path);
    let exports_ = crate::path::macro_exports_(conform_reflect_path);

    let index_arms = info.variants.iter().map(|variant| {
        let ident = &variant.data.ident;
        let index = variant.index;
        quote!(Self::#ident { .. } => #index,)
    });

    let field_arms = info.variants.iter().map(|variant| {
        let pattern = variant.pattern_tokens();
        let fields = variant.fields().iter().map(|field| {
            let index = field.index;
            let local = field.local();
            quote!(#index => #exports_::Some(#local as &dyn #reflect_),)
        });
        quote! {
            #pattern => match index {
                #(#fields)*
                _ => #exports_::None,
            },
        }
    });

    let ident = meta.ident();
    let (impl_generics, ty_generics, where_clause) = meta.split_generics();

    quote! {
        impl #impl_generics #union_ for #ident #ty_generics #where_clause {
            fn variant_index(&self) -> usize {
                match self {
                    #(#index_arms)*
                }
            }

            fn field_at(&self, index: usize) -> #exports_::Option<&dyn #reflect_> {
                match self {
                    #(#field_arms)*
                }
            }
        }
    }
}

/// Generate `FromRepr` implementation tokens.
///
/// The deserializer picks the variant (or tries them in order); each arm
/// builds one variant from its payload.
fn impl_enum_from_repr(info: &ReflectEnum) -> TokenStream {
    let meta = info.meta();
    let conform_reflect_path = meta.conform_reflect_path();
    let from_repr_ = crate::path::from_repr_(conform_reflect_path);
    let typed_ = crate::path::typed_(conform_reflect_path);
    let value_ = crate::path::value_(conform_reflect_path);
    let deserializer_ = crate::path::deserializer_(conform_reflect_path);
    let result_ = crate::path::result_(conform_reflect_path);
    let exports_ = crate::path::macro_exports_(conform_reflect_path);

    let arms = info
        .variants
        .iter()
        .map(|variant| variant_build_tokens(variant, conform_reflect_path));

    let ident = meta.ident();
    let (impl_generics, ty_generics, where_clause) = meta.split_generics();

    quote! {
        impl #impl_generics #from_repr_ for #ident #ty_generics #where_clause {
            fn from_repr(value: &#value_, de: &mut #deserializer_<'_>) -> #result_<Self> {
                let declared = <Self as #typed_>::type_info();
                de.union(declared, value, |de, index, payload| match index {
                    #(#arms)*
                    _ => #exports_::Err(de.reject(declared, payload, "unknown variant")),
                })
            }
        }
    }
}

/// One `index => { ... }` arm of the union builder.
fn variant_build_tokens(variant: &EnumVariant, conform_reflect_path: &syn::Path) -> TokenStream {
    let from_repr_ = crate::path::from_repr_(conform_reflect_path);
    let segment_ = crate::path::segment_(conform_reflect_path);
    let exports_ = crate::path::macro_exports_(conform_reflect_path);

    let index = variant.index;
    let ident = &variant.data.ident;
    let members = variant.fields().iter().map(StructField::member);
    let locals = variant.fields().iter().map(StructField::local);
    let build = quote!(#exports_::Ok(Self::#ident { #(#members: #locals),* }));

    let body = match &variant.fields {
        EnumVariantFields::Unit => quote! {
            de.unit_variant(declared, payload)?;
        },
        EnumVariantFields::Unnamed(fields) if fields.len() == 1 => {
            let ty = fields[0].ty();
            let local = fields[0].local();
            quote! {
                let #local = de.deeper(|de| <#ty as #from_repr_>::from_repr(payload, de))?;
            }
        }
        EnumVariantFields::Unnamed(fields) => {
            let len = fields.len();
            let reads = fields.iter().map(|field| {
                let ty = field.ty();
                let local = field.local();
                let position = field.index;
                quote! {
                    let #local = de.element::<#ty>(#segment_::Index(#position), &items[#position])?;
                }
            });
            quote! {
                let items = de.tuple(declared, payload, #len)?;
                #(#reads)*
            }
        }
        EnumVariantFields::Named(fields) => {
            let access = format_ident!("access");
            let de = format_ident!("de");
            let reads = fields.iter().map(|field| field.to_read_tokens(&access, &de));
            let mutability = fields
                .iter()
                .any(|field| field.attrs.skip.is_none())
                .then(|| quote!(mut));
            quote! {
                let #mutability #access = #de.struct_variant(declared, payload, #index)?;
                #(#reads)*
                #access.finish(#de)?;
            }
        }
    };

    quote! {
        #index => {
            #body
            #build
        }
    }
}
