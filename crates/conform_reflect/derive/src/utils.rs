use proc_macro2::TokenStream;
use syn::meta::ParseNestedMeta;
use syn::{ExprPath, LitStr};

/// An empty token stream.
#[inline(always)]
pub(crate) fn empty() -> TokenStream {
    TokenStream::new()
}

/// Parses `key = path` or `key = "path"`.
pub(crate) fn parse_path_value(meta: &ParseNestedMeta) -> syn::Result<ExprPath> {
    let input = meta.value()?;
    if input.peek(LitStr) {
        input.parse::<LitStr>()?.parse()
    } else {
        input.parse()
    }
}

/// Parses `key = "..."`.
#[inline]
pub(crate) fn parse_str_value(meta: &ParseNestedMeta) -> syn::Result<LitStr> {
    meta.value()?.parse()
}

/// Stores `value` in `slot`, failing if the attribute was already given.
pub(crate) fn set_once<T>(meta: &ParseNestedMeta, slot: &mut Option<T>, value: T) -> syn::Result<()> {
    if slot.is_some() {
        let name = meta
            .path
            .get_ident()
            .map(ToString::to_string)
            .unwrap_or_default();
        return Err(meta.error(format!("duplicate `{name}` attribute")));
    }
    *slot = Some(value);
    Ok(())
}
