use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use super::{get_auto_register_impl, impl_trait_reflect, impl_trait_typed};

use crate::derive_data::{ReflectStruct, StructField};

/// Implement full reflect for struct type.
///
/// Named structs are classes: a mapping with one key per field.
pub(crate) fn impl_struct(info: &ReflectStruct) -> TokenStream {
    let meta = info.meta();
    let reflect_ref_ = crate::path::reflect_ref_(meta.conform_reflect_path());

    // trait: Typed
    let typed_trait_tokens = impl_trait_typed(meta, class_info_tokens(info));

    // trait: Reflect
    let reflect_trait_tokens = impl_trait_reflect(meta, quote!(#reflect_ref_::Class(self)));

    // trait: Class
    let class_trait_tokens = impl_trait_class(info);

    // trait: FromRepr
    let from_repr_tokens = impl_struct_from_repr(info);

    // feature: auto_register
    let auto_register_tokens = get_auto_register_impl(meta);

    quote! {
        #typed_trait_tokens

        #reflect_trait_tokens

        #class_trait_tokens

        #from_repr_tokens

        #auto_register_tokens
    }
}

/// Generates the `TypeInfo::Class` expression.
///
/// ```ignore
/// _path_::info::TypeInfo::Class(
///     _path_::info::ClassInfo::new::<Self>(vec![ ... ])
///         .with_bases(vec![ _path_::info::BaseInfo::new::<Base>("base", 0) ])
///         .with_deny_unknown_fields(true)
/// )
/// ```
fn class_info_tokens(info: &ReflectStruct) -> TokenStream {
    let meta = info.meta();
    let conform_reflect_path = meta.conform_reflect_path();
    let type_info_ = crate::path::type_info_(conform_reflect_path);
    let class_info_ = crate::path::class_info_(conform_reflect_path);
    let base_info_ = crate::path::base_info_(conform_reflect_path);
    let exports_ = crate::path::macro_exports_(conform_reflect_path);

    let fields = info
        .own_fields()
        .map(|field| field.to_info_tokens(conform_reflect_path));

    let bases: Vec<TokenStream> = info
        .base_fields()
        .map(|field| {
            let ty = field.ty();
            let name = field.name();
            let index = field.index;
            quote!(#base_info_::new::<#ty>(#name, #index))
        })
        .collect();
    let with_bases = (!bases.is_empty()).then(|| {
        quote!(.with_bases(#exports_::vec![#(#bases),*]))
    });

    let with_deny_unknown_fields = meta
        .attrs()
        .deny_unknown_fields
        .map(|_| quote!(.with_deny_unknown_fields(true)));

    quote! {
        #type_info_::Class(
            #class_info_::new::<Self>(#exports_::vec![#(#fields),*])
                #with_bases
                #with_deny_unknown_fields
        )
    }
}

/// Generate `Class` trait implementation tokens.
fn impl_trait_class(info: &ReflectStruct) -> TokenStream {
    let meta = info.meta();
    let conform_reflect_path = meta.conform_reflect_path();
    let class_ = crate::path::class_(conform_reflect_path);
    let reflect_ = crate::path::reflect_(conform_reflect_path);
    let exports_ = crate::path::macro_exports_(conform_reflect_path);

    let field_at_arms = info.field_at_arms();

    let ident = meta.ident();
    let (impl_generics, ty_generics, where_clause) = meta.split_generics();

    quote! {
        impl #impl_generics #class_ for #ident #ty_generics #where_clause {
            fn field_at(&self, index: usize) -> #exports_::Option<&dyn #reflect_> {
                match index {
                    #field_at_arms
                    _ => #exports_::None,
                }
            }
        }
    }
}

/// Generate `FromRepr` implementation tokens.
///
/// Every field is read into a local first; `Self` is only built once all
/// reads and the unknown-field check succeeded.
fn impl_struct_from_repr(info: &ReflectStruct) -> TokenStream {
    let meta = info.meta();
    let conform_reflect_path = meta.conform_reflect_path();
    let from_repr_ = crate::path::from_repr_(conform_reflect_path);
    let typed_ = crate::path::typed_(conform_reflect_path);
    let value_ = crate::path::value_(conform_reflect_path);
    let deserializer_ = crate::path::deserializer_(conform_reflect_path);
    let result_ = crate::path::result_(conform_reflect_path);
    let exports_ = crate::path::macro_exports_(conform_reflect_path);

    let access = format_ident!("access");
    let de = format_ident!("de");

    let reads = info
        .fields
        .iter()
        .map(|field| field.to_read_tokens(&access, &de));
    let members = info.fields.iter().map(StructField::member);
    let locals = info.fields.iter().map(StructField::local);

    let mutability = info
        .fields
        .iter()
        .any(|field| field.attrs.skip.is_none())
        .then(|| quote!(mut));

    let ident = meta.ident();
    let (impl_generics, ty_generics, where_clause) = meta.split_generics();

    quote! {
        impl #impl_generics #from_repr_ for #ident #ty_generics #where_clause {
            fn from_repr(value: &#value_, #de: &mut #deserializer_<'_>) -> #result_<Self> {
                let #mutability #access = #de.class(<Self as #typed_>::type_info(), value)?;
                #(#reads)*
                #access.finish(#de)?;
                #exports_::Ok(Self { #(#members: #locals),* })
            }
        }
    }
}
