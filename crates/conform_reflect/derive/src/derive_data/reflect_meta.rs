use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{Generics, Ident, ImplGenerics, Path, TypeGenerics};

use super::TypeAttributes;

/// What every derive shape shares: the type, its attributes and the path
/// of `conform_reflect`.
pub(crate) struct ReflectMeta<'a> {
    conform_reflect_path: Path,
    attrs: TypeAttributes,
    ident: &'a Ident,
    generics: &'a Generics,
}

impl core::fmt::Debug for ReflectMeta<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ReflectMeta")
            .field("conform_reflect_path", &self.conform_reflect_path.to_token_stream())
            .field("ident", &self.ident)
            .finish()
    }
}

impl<'a> ReflectMeta<'a> {
    #[inline]
    pub fn new(attrs: TypeAttributes, ident: &'a Ident, generics: &'a Generics) -> Self {
        Self {
            conform_reflect_path: crate::path::conform_reflect(),
            attrs,
            ident,
            generics,
        }
    }

    #[inline]
    pub fn conform_reflect_path(&self) -> &Path {
        &self.conform_reflect_path
    }

    #[inline]
    pub fn attrs(&self) -> &TypeAttributes {
        &self.attrs
    }

    #[inline]
    pub fn ident(&self) -> &'a Ident {
        self.ident
    }

    /// Whether the type has type or const parameters.
    ///
    /// Generic types keep one descriptor per instantiation.
    #[inline]
    pub fn impl_with_generic(&self) -> bool {
        self.generics.type_params().next().is_some()
            || self.generics.const_params().next().is_some()
    }

    /// Splits the generics for an `impl` block.
    ///
    /// Every type parameter is bounded by `Typed + Reflect + FromRepr`, on
    /// top of the user's own where clause.
    ///
    /// ```ignore
    /// impl<T> _path_::Reflect for Page<T>
    /// where
    ///     T: _path_::info::Typed + _path_::Reflect + _path_::FromRepr,
    /// { ... }
    /// ```
    pub fn split_generics(&self) -> (ImplGenerics<'a>, TypeGenerics<'a>, TokenStream) {
        let (impl_generics, ty_generics, where_clause) = self.generics.split_for_impl();

        let conform_reflect_path = &self.conform_reflect_path;
        let typed_ = crate::path::typed_(conform_reflect_path);
        let reflect_ = crate::path::reflect_(conform_reflect_path);
        let from_repr_ = crate::path::from_repr_(conform_reflect_path);

        let bounds: Vec<TokenStream> = self
            .generics
            .type_params()
            .map(|param| {
                let ident = &param.ident;
                quote!(#ident: #typed_ + #reflect_ + #from_repr_)
            })
            .collect();

        let predicates = where_clause
            .map(|clause| clause.predicates.iter().collect::<Vec<_>>())
            .unwrap_or_default();

        let where_tokens = if bounds.is_empty() && predicates.is_empty() {
            crate::utils::empty()
        } else {
            quote! {
                where #(#bounds,)* #(#predicates,)*
            }
        };

        (impl_generics, ty_generics, where_tokens)
    }

    /// The static cell holding the descriptor and the lookup of it.
    ///
    /// ```ignore
    /// static CELL: _path_::info::NonGenericTypeInfoCell = ...;
    /// CELL.get_or_init(|| { #type_info_tokens })
    /// ```
    pub fn cell_tokens(&self, type_info_tokens: TokenStream) -> TokenStream {
        let conform_reflect_path = &self.conform_reflect_path;
        if self.impl_with_generic() {
            let info_cell = crate::path::generic_type_info_cell_(conform_reflect_path);
            quote! {
                static CELL: #info_cell = #info_cell::new();
                CELL.get_or_insert::<Self>(|| {
                    #type_info_tokens
                })
            }
        } else {
            let info_cell = crate::path::non_generic_type_info_cell_(conform_reflect_path);
            quote! {
                static CELL: #info_cell = #info_cell::new();
                CELL.get_or_init(|| {
                    #type_info_tokens
                })
            }
        }
    }
}
