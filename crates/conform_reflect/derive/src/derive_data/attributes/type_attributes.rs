use conform_macro_utils::RenameRule;
use proc_macro2::Span;
use syn::spanned::Spanned;
use syn::{Attribute, LitStr};

use crate::REFLECT_ATTRIBUTE_NAME;
use crate::utils::{parse_str_value, set_once};

/// Attributes of `#[reflect(...)]` on the type itself.
#[derive(Default)]
pub(crate) struct TypeAttributes {
    pub rename_all: Option<RenameRule>,
    pub deny_unknown_fields: Option<Span>,
    pub tag: Option<LitStr>,
    pub content: Option<LitStr>,
    pub external: Option<Span>,
    pub untagged: Option<Span>,
    pub auto_register: Option<Span>,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();

        for attr in attrs {
            if !attr.path().is_ident(REFLECT_ATTRIBUTE_NAME) {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename_all") {
                    let lit = parse_str_value(&meta)?;
                    let rule = RenameRule::parse(&lit.value())
                        .map_err(|err| syn::Error::new(lit.span(), err.to_string()))?;
                    set_once(&meta, &mut this.rename_all, rule)
                } else if meta.path.is_ident("deny_unknown_fields") {
                    set_once(&meta, &mut this.deny_unknown_fields, meta.path.span())
                } else if meta.path.is_ident("tag") {
                    let lit = parse_str_value(&meta)?;
                    set_once(&meta, &mut this.tag, lit)
                } else if meta.path.is_ident("content") {
                    let lit = parse_str_value(&meta)?;
                    set_once(&meta, &mut this.content, lit)
                } else if meta.path.is_ident("external") {
                    set_once(&meta, &mut this.external, meta.path.span())
                } else if meta.path.is_ident("untagged") {
                    set_once(&meta, &mut this.untagged, meta.path.span())
                } else if meta.path.is_ident("auto_register") {
                    set_once(&meta, &mut this.auto_register, meta.path.span())
                } else {
                    Err(meta.error("unknown type attribute"))
                }
            })?;
        }

        Ok(this)
    }

    /// Rejects the enum-only attributes on a struct.
    pub fn validate_for_struct(&self) -> syn::Result<()> {
        if let Some(tag) = &self.tag {
            return Err(syn::Error::new(tag.span(), "`tag` is only valid on enums"));
        }
        if let Some(content) = &self.content {
            return Err(syn::Error::new(content.span(), "`content` is only valid on enums"));
        }
        if let Some(span) = self.external.or(self.untagged) {
            return Err(syn::Error::new(span, "tagging modes are only valid on enums"));
        }
        Ok(())
    }

    /// Rejects conflicting tagging modes and struct-only attributes.
    pub fn validate_for_enum(&self) -> syn::Result<()> {
        if let Some(span) = self.deny_unknown_fields {
            return Err(syn::Error::new(
                span,
                "`deny_unknown_fields` is only valid on structs with named fields",
            ));
        }
        if let (Some(content), None) = (&self.content, &self.tag) {
            return Err(syn::Error::new(content.span(), "`content` requires `tag`"));
        }
        let modes = [
            self.tag.as_ref().map(LitStr::span),
            self.external,
            self.untagged,
        ];
        if let Some(span) = modes.iter().flatten().nth(1) {
            return Err(syn::Error::new(
                *span,
                "`tag`, `external` and `untagged` are mutually exclusive",
            ));
        }
        Ok(())
    }
}
