use proc_macro2::TokenStream;
use quote::quote;

use super::{get_auto_register_impl, impl_trait_reflect, impl_trait_typed};

use crate::derive_data::ReflectMeta;

/// Implement full reflect for unit struct type.
///
/// A unit struct is a `Unit` scalar, represented as null.
pub(crate) fn impl_unit(meta: &ReflectMeta) -> TokenStream {
    let conform_reflect_path = meta.conform_reflect_path();
    let typed_ = crate::path::typed_(conform_reflect_path);
    let from_repr_ = crate::path::from_repr_(conform_reflect_path);
    let type_info_ = crate::path::type_info_(conform_reflect_path);
    let scalar_info_ = crate::path::scalar_info_(conform_reflect_path);
    let scalar_kind_ = crate::path::scalar_kind_(conform_reflect_path);
    let reflect_ref_ = crate::path::reflect_ref_(conform_reflect_path);
    let scalar_ = crate::path::scalar_(conform_reflect_path);
    let value_ = crate::path::value_(conform_reflect_path);
    let deserializer_ = crate::path::deserializer_(conform_reflect_path);
    let result_ = crate::path::result_(conform_reflect_path);
    let exports_ = crate::path::macro_exports_(conform_reflect_path);

    // trait: Typed
    let typed_trait_tokens = impl_trait_typed(
        meta,
        quote!(#type_info_::Scalar(#scalar_info_::new::<Self>(#scalar_kind_::Unit))),
    );

    // trait: Reflect
    let reflect_trait_tokens = impl_trait_reflect(meta, quote!(#reflect_ref_::Scalar(self)));

    let ident = meta.ident();
    let (impl_generics, ty_generics, where_clause) = meta.split_generics();

    let auto_register_tokens = get_auto_register_impl(meta);

    quote! {
        #typed_trait_tokens

        #reflect_trait_tokens

        impl #impl_generics #scalar_ for #ident #ty_generics #where_clause {
            #[inline]
            fn to_value(&self) -> #exports_::Result<#value_, #exports_::Cow<'static, str>> {
                #exports_::Ok(#value_::Null)
            }
        }

        impl #impl_generics #from_repr_ for #ident #ty_generics #where_clause {
            fn from_repr(value: &#value_, de: &mut #deserializer_<'_>) -> #result_<Self> {
                de.check(<Self as #typed_>::type_info(), value)?;
                #exports_::Ok(Self {})
            }
        }

        #auto_register_tokens
    }
}
