use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::spanned::Spanned;
use syn::{Attribute, ExprPath, LitStr, Type};

use crate::REFLECT_ATTRIBUTE_NAME;
use crate::utils::{parse_path_value, parse_str_value, set_once};

/// Where the default of a field comes from.
pub(crate) enum DefaultAttr {
    /// `#[reflect(default)]`
    Trait(Span),
    /// `#[reflect(default = path)]`
    Path(ExprPath),
}

/// Attributes of `#[reflect(...)]` on a named field.
#[derive(Default)]
pub(crate) struct FieldAttributes {
    pub rename: Option<LitStr>,
    pub aliases: Vec<LitStr>,
    pub default: Option<DefaultAttr>,
    pub skip: Option<Span>,
    pub skip_if_default: Option<Span>,
    pub skip_if: Option<ExprPath>,
    pub serialize_with: Option<ExprPath>,
    pub deserialize_with: Option<ExprPath>,
    pub base: Option<Span>,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();

        for attr in attrs {
            if !attr.path().is_ident(REFLECT_ATTRIBUTE_NAME) {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let lit = parse_str_value(&meta)?;
                    set_once(&meta, &mut this.rename, lit)
                } else if meta.path.is_ident("alias") {
                    this.aliases.push(parse_str_value(&meta)?);
                    Ok(())
                } else if meta.path.is_ident("default") {
                    let default = if meta.input.peek(syn::Token![=]) {
                        DefaultAttr::Path(parse_path_value(&meta)?)
                    } else {
                        DefaultAttr::Trait(meta.path.span())
                    };
                    set_once(&meta, &mut this.default, default)
                } else if meta.path.is_ident("skip") {
                    set_once(&meta, &mut this.skip, meta.path.span())
                } else if meta.path.is_ident("skip_if_default") {
                    set_once(&meta, &mut this.skip_if_default, meta.path.span())
                } else if meta.path.is_ident("skip_if") {
                    let path = parse_path_value(&meta)?;
                    set_once(&meta, &mut this.skip_if, path)
                } else if meta.path.is_ident("serialize_with") {
                    let path = parse_path_value(&meta)?;
                    set_once(&meta, &mut this.serialize_with, path)
                } else if meta.path.is_ident("deserialize_with") {
                    let path = parse_path_value(&meta)?;
                    set_once(&meta, &mut this.deserialize_with, path)
                } else if meta.path.is_ident("base") {
                    set_once(&meta, &mut this.base, meta.path.span())
                } else {
                    Err(meta.error("unknown field attribute"))
                }
            })?;
        }

        this.validate()?;
        Ok(this)
    }

    fn validate(&self) -> syn::Result<()> {
        let skip_rules = [
            self.skip,
            self.skip_if_default,
            self.skip_if.as_ref().map(Spanned::span),
        ];
        if let Some(span) = skip_rules.iter().flatten().nth(1) {
            return Err(syn::Error::new(
                *span,
                "`skip`, `skip_if_default` and `skip_if` are mutually exclusive",
            ));
        }
        if let Some(span) = self.base
            && !self.is_plain_base()
        {
            return Err(syn::Error::new(
                span,
                "`base` cannot be combined with other field attributes",
            ));
        }
        Ok(())
    }

    fn is_plain_base(&self) -> bool {
        self.rename.is_none()
            && self.aliases.is_empty()
            && self.default.is_none()
            && self.skip.is_none()
            && self.skip_if_default.is_none()
            && self.skip_if.is_none()
            && self.serialize_with.is_none()
            && self.deserialize_with.is_none()
    }

    /// Whether no attribute is present.
    pub fn is_empty(&self) -> bool {
        self.base.is_none() && self.is_plain_base()
    }

    /// An expression producing the default of a field of type `ty`, if any.
    ///
    /// `skip` and `skip_if_default` imply `Default::default()` when no
    /// default is given, so an omitted field reads back.
    pub fn default_expr(&self, ty: &Type) -> Option<TokenStream> {
        match &self.default {
            Some(DefaultAttr::Trait(span)) => {
                Some(quote::quote_spanned!(*span => <#ty as ::core::default::Default>::default()))
            }
            Some(DefaultAttr::Path(path)) => Some(quote!(#path())),
            None if self.skip.is_some() || self.skip_if_default.is_some() => {
                Some(quote!(<#ty as ::core::default::Default>::default()))
            }
            None => None,
        }
    }
}
