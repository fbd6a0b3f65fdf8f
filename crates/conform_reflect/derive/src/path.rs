//! Paths into `conform_reflect` used by the generated code.
//!
//! Kept in one place so that moving an item in `conform_reflect` only
//! needs a change here.

use proc_macro2::TokenStream;
use quote::quote;

// -----------------------------------------------------------------------------
// Crate Path

/// Get the correct access path to the `conform_reflect` crate.
///
/// 1. For crates that depend on `conform_reflect`, `::conform_reflect` is returned.
/// 2. For crates that depend on `conform`, `::conform::reflect` is returned.
/// 3. For other situations, `::conform_reflect` is returned, but this may be incorrect.
///
/// Reading the manifest is relatively costly, so the path is obtained
/// once per derive and passed around.
pub(crate) fn conform_reflect() -> syn::Path {
    conform_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("conform_reflect"))
}

// -----------------------------------------------------------------------------
// Items

macro_rules! item_paths {
    ($($fn_name:ident => $($segment:ident)::+;)*) => {$(
        #[inline(always)]
        pub(crate) fn $fn_name(conform_reflect_path: &syn::Path) -> TokenStream {
            quote! {
                #conform_reflect_path::$($segment)::+
            }
        }
    )*};
}

item_paths! {
    reflect_ => Reflect;
    from_repr_ => FromRepr;
    result_ => Result;
    error_ => Error;
    typed_ => info::Typed;
    type_info_ => info::TypeInfo;
    non_generic_type_info_cell_ => info::NonGenericTypeInfoCell;
    generic_type_info_cell_ => info::GenericTypeInfoCell;
    class_info_ => info::ClassInfo;
    base_info_ => info::BaseInfo;
    field_info_ => info::FieldInfo;
    skip_ => info::Skip;
    tuple_info_ => info::TupleInfo;
    scalar_info_ => info::ScalarInfo;
    scalar_kind_ => info::ScalarKind;
    union_info_ => info::UnionInfo;
    variant_info_ => info::VariantInfo;
    variant_kind_ => info::VariantKind;
    tagging_ => info::Tagging;
    reflect_ref_ => ops::ReflectRef;
    class_ => ops::Class;
    union_ => ops::Union;
    sequence_ => ops::Sequence;
    scalar_ => ops::Scalar;
    deserializer_ => de::Deserializer;
    segment_ => path::Segment;
    value_ => value::Value;
    macro_exports_ => __macro_exports;
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn auto_register_(conform_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #conform_reflect_path::__macro_exports::auto_register
    }
}
