use proc_macro2::TokenStream;
use quote::quote;

use super::{get_auto_register_impl, impl_trait_reflect, impl_trait_typed, impl_unit};

use crate::derive_data::{ReflectStruct, StructField};

/// Implement full reflect for tuple struct type.
///
/// A single field is transparent: the struct shares the descriptor and the
/// representation of the field. Several fields form a fixed-length
/// sequence.
pub(crate) fn impl_tuple_struct(info: &ReflectStruct) -> TokenStream {
    match info.fields.len() {
        0 => impl_unit(info.meta()),
        1 => impl_newtype(info),
        _ => impl_tuple(info),
    }
}

// -----------------------------------------------------------------------------
// Newtype

fn impl_newtype(info: &ReflectStruct) -> TokenStream {
    let meta = info.meta();
    let conform_reflect_path = meta.conform_reflect_path();
    let typed_ = crate::path::typed_(conform_reflect_path);
    let reflect_ = crate::path::reflect_(conform_reflect_path);
    let from_repr_ = crate::path::from_repr_(conform_reflect_path);
    let type_info_ = crate::path::type_info_(conform_reflect_path);
    let reflect_ref_ = crate::path::reflect_ref_(conform_reflect_path);
    let value_ = crate::path::value_(conform_reflect_path);
    let deserializer_ = crate::path::deserializer_(conform_reflect_path);
    let result_ = crate::path::result_(conform_reflect_path);

    let inner = info.fields[0].ty();

    let ident = meta.ident();
    let (impl_generics, ty_generics, where_clause) = meta.split_generics();

    let auto_register_tokens = get_auto_register_impl(meta);

    quote! {
        impl #impl_generics #typed_ for #ident #ty_generics #where_clause {
            #[inline]
            fn type_info() -> &'static #type_info_ {
                <#inner as #typed_>::type_info()
            }
        }

        impl #impl_generics #reflect_ for #ident #ty_generics #where_clause {
            #[inline]
            fn reflect_type_info(&self) -> &'static #type_info_ {
                <#inner as #reflect_>::reflect_type_info(&self.0)
            }

            #[inline]
            fn reflect_ref(&self) -> #reflect_ref_<'_> {
                <#inner as #reflect_>::reflect_ref(&self.0)
            }
        }

        impl #impl_generics #from_repr_ for #ident #ty_generics #where_clause {
            #[inline]
            fn from_repr(value: &#value_, de: &mut #deserializer_<'_>) -> #result_<Self> {
                <#inner as #from_repr_>::from_repr(value, de).map(Self)
            }
        }

        #auto_register_tokens
    }
}

// -----------------------------------------------------------------------------
// Tuple

fn impl_tuple(info: &ReflectStruct) -> TokenStream {
    let meta = info.meta();
    let conform_reflect_path = meta.conform_reflect_path();
    let typed_ = crate::path::typed_(conform_reflect_path);
    let reflect_ = crate::path::reflect_(conform_reflect_path);
    let from_repr_ = crate::path::from_repr_(conform_reflect_path);
    let type_info_ = crate::path::type_info_(conform_reflect_path);
    let tuple_info_ = crate::path::tuple_info_(conform_reflect_path);
    let reflect_ref_ = crate::path::reflect_ref_(conform_reflect_path);
    let sequence_ = crate::path::sequence_(conform_reflect_path);
    let segment_ = crate::path::segment_(conform_reflect_path);
    let value_ = crate::path::value_(conform_reflect_path);
    let deserializer_ = crate::path::deserializer_(conform_reflect_path);
    let result_ = crate::path::result_(conform_reflect_path);
    let exports_ = crate::path::macro_exports_(conform_reflect_path);

    let len = info.fields.len();
    let types: Vec<_> = info.fields.iter().map(StructField::ty).collect();
    let members: Vec<_> = info.fields.iter().map(StructField::member).collect();
    let locals: Vec<_> = info.fields.iter().map(StructField::local).collect();
    let indices: Vec<_> = info.fields.iter().map(|field| field.index).collect();

    // trait: Typed
    let typed_trait_tokens = impl_trait_typed(
        meta,
        quote! {
            #type_info_::Tuple(#tuple_info_::new::<Self>(#exports_::vec![
                #(<#types as #typed_>::type_info as fn() -> &'static #type_info_),*
            ]))
        },
    );

    // trait: Reflect
    let reflect_trait_tokens = impl_trait_reflect(meta, quote!(#reflect_ref_::Seq(self)));

    let ident = meta.ident();
    let (impl_generics, ty_generics, where_clause) = meta.split_generics();

    let auto_register_tokens = get_auto_register_impl(meta);

    quote! {
        #typed_trait_tokens

        #reflect_trait_tokens

        impl #impl_generics #sequence_ for #ident #ty_generics #where_clause {
            #[inline]
            fn len(&self) -> usize {
                #len
            }

            fn iter(&self) -> #exports_::Box<dyn ::core::iter::Iterator<Item = &dyn #reflect_> + '_> {
                #exports_::Box::new([#(&self.#members as &dyn #reflect_),*].into_iter())
            }
        }

        impl #impl_generics #from_repr_ for #ident #ty_generics #where_clause {
            fn from_repr(value: &#value_, de: &mut #deserializer_<'_>) -> #result_<Self> {
                let items = de.tuple(<Self as #typed_>::type_info(), value, #len)?;
                #(
                    let #locals = de.element::<#types>(#segment_::Index(#indices), &items[#indices])?;
                )*
                #exports_::Ok(Self { #(#members: #locals),* })
            }
        }

        #auto_register_tokens
    }
}
