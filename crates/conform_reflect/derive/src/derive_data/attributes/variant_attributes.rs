use syn::{Attribute, LitStr};

use crate::REFLECT_ATTRIBUTE_NAME;
use crate::utils::{parse_str_value, set_once};

/// Attributes of `#[reflect(...)]` on an enum variant.
#[derive(Default)]
pub(crate) struct VariantAttributes {
    pub rename: Option<LitStr>,
    pub aliases: Vec<LitStr>,
}

impl VariantAttributes {
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
                } else {
                    Err(meta.error("unknown variant attribute"))
                }
            })?;
        }

        Ok(this)
    }
}
