use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectMeta;

/// Generate implementation code for `Reflect`.
///
/// `reflect_ref_tokens` is the body of `reflect_ref`, such as
/// `ReflectRef::Class(self)`.
pub(crate) fn impl_trait_reflect(meta: &ReflectMeta, reflect_ref_tokens: TokenStream) -> TokenStream {
    let conform_reflect_path = meta.conform_reflect_path();
    let reflect_ = crate::path::reflect_(conform_reflect_path);
    let typed_ = crate::path::typed_(conform_reflect_path);
    let type_info_ = crate::path::type_info_(conform_reflect_path);
    let reflect_ref_ = crate::path::reflect_ref_(conform_reflect_path);

    let ident = meta.ident();
    let (impl_generics, ty_generics, where_clause) = meta.split_generics();

    quote! {
        impl #impl_generics #reflect_ for #ident #ty_generics #where_clause {
            #[inline]
            fn reflect_type_info(&self) -> &'static #type_info_ {
                <Self as #typed_>::type_info()
            }

            #[inline]
            fn reflect_ref(&self) -> #reflect_ref_<'_> {
                #reflect_ref_tokens
            }
        }
    }
}
