use syn::{Data, DeriveInput, Fields};

use super::{EnumVariant, ReflectEnum, ReflectMeta, ReflectStruct, StructField, TypeAttributes};

/// The parsed input of `#[derive(Reflect)]`, by shape.
pub(crate) enum ReflectDerive<'a> {
    /// `struct T { ... }`
    Struct(ReflectStruct<'a>),
    /// `struct T(...);`
    TupleStruct(ReflectStruct<'a>),
    /// `struct T;`
    UnitStruct(ReflectMeta<'a>),
    /// `enum T { ... }`
    Enum(ReflectEnum<'a>),
}

impl<'a> ReflectDerive<'a> {
    pub fn from_input(input: &'a DeriveInput) -> syn::Result<Self> {
        if let Some(lifetime) = input.generics.lifetimes().next() {
            return Err(syn::Error::new_spanned(
                lifetime,
                "`Reflect` cannot be derived for types with lifetime parameters",
            ));
        }

        let attrs = TypeAttributes::parse_attrs(&input.attrs)?;

        match &input.data {
            Data::Struct(data) => {
                attrs.validate_for_struct()?;
                if let (Some(span), false) = (
                    attrs.deny_unknown_fields,
                    matches!(data.fields, Fields::Named(_)),
                ) {
                    return Err(syn::Error::new(
                        span,
                        "`deny_unknown_fields` is only valid on structs with named fields",
                    ));
                }
                let meta = ReflectMeta::new(attrs, &input.ident, &input.generics);
                match &data.fields {
                    Fields::Named(named) => {
                        let fields = StructField::collect_named(&named.named, &meta, true)?;
                        Ok(Self::Struct(ReflectStruct { meta, fields }))
                    }
                    Fields::Unnamed(unnamed) => {
                        let fields = StructField::collect_unnamed(&unnamed.unnamed)?;
                        Ok(Self::TupleStruct(ReflectStruct { meta, fields }))
                    }
                    Fields::Unit => Ok(Self::UnitStruct(meta)),
                }
            }
            Data::Enum(data) => {
                attrs.validate_for_enum()?;
                if data.variants.is_empty() {
                    return Err(syn::Error::new_spanned(
                        &input.ident,
                        "`Reflect` cannot be derived for enums without variants",
                    ));
                }
                let meta = ReflectMeta::new(attrs, &input.ident, &input.generics);
                let variants = data
                    .variants
                    .iter()
                    .enumerate()
                    .map(|(index, variant)| EnumVariant::new(variant, index, &meta))
                    .collect::<syn::Result<Vec<_>>>()?;
                Ok(Self::Enum(ReflectEnum { meta, variants }))
            }
            Data::Union(data) => Err(syn::Error::new_spanned(
                data.union_token,
                "`Reflect` cannot be derived for unions",
            )),
        }
    }
}
