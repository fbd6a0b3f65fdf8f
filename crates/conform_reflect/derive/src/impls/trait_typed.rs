use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectMeta;

/// Generate implementation code for `Typed`.
///
/// `type_info_tokens` builds the `TypeInfo`; it runs once per type (or per
/// instantiation of a generic type).
pub(crate) fn impl_trait_typed(meta: &ReflectMeta, type_info_tokens: TokenStream) -> TokenStream {
    let conform_reflect_path = meta.conform_reflect_path();
    let typed_ = crate::path::typed_(conform_reflect_path);
    let type_info_ = crate::path::type_info_(conform_reflect_path);

    let inner_cell_tokens = meta.cell_tokens(type_info_tokens);

    let ident = meta.ident();
    let (impl_generics, ty_generics, where_clause) = meta.split_generics();

    quote! {
        impl #impl_generics #typed_ for #ident #ty_generics #where_clause {
            fn type_info() -> &'static #type_info_ {
                #inner_cell_tokens
            }
        }
    }
}
