#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Modules

mod error;

#[cfg(feature = "json")]
pub mod json;
#[cfg(feature = "ron")]
pub mod ron;
#[cfg(feature = "toml")]
pub mod toml;

// -----------------------------------------------------------------------------
// Top-level exports

pub use error::{FormatError, Result};

#[cfg(feature = "json")]
pub use self::json::{
    Json, JsonOptions, from_json, from_json_with, from_json_with_options, to_json, to_json_with,
    to_json_with_options,
};
#[cfg(feature = "ron")]
pub use self::ron::{
    Ron, RonOptions, from_ron, from_ron_with, from_ron_with_options, to_ron, to_ron_with,
    to_ron_with_options,
};
#[cfg(feature = "toml")]
pub use self::toml::{
    Toml, TomlOptions, from_toml, from_toml_with, from_toml_with_options, to_toml, to_toml_with,
    to_toml_with_options,
};

use conform_reflect::de::Deserializer;
use conform_reflect::info::Typed;
use conform_reflect::policy::CoercionPolicy;
use conform_reflect::ser::Serializer;
use conform_reflect::value::Value;
use conform_reflect::{FromRepr, Reflect};

// -----------------------------------------------------------------------------
// Format

/// A binding between the value tree and one text format.
///
/// Bindings only translate [`Value`] trees. Type checking, defaults and
/// unions are handled by the core before [`encode`](Self::encode) and
/// after [`decode`](Self::decode).
///
/// # Examples
///
/// ```
/// # #[cfg(feature = "json")] {
/// use conform_format::{Format, Json, JsonOptions};
/// use conform_reflect::value::{Mapping, Value};
///
/// let mut map = Mapping::new();
/// map.insert("port", Value::Int(80));
///
/// let text = Json::encode(&Value::Map(map.clone()), &JsonOptions::default()).unwrap();
/// assert_eq!(text, r#"{"port":80}"#);
/// assert_eq!(Json::decode(&text, &JsonOptions::default()).unwrap(), Value::Map(map));
/// # }
/// ```
pub trait Format {
    /// Used in logs and error messages.
    const NAME: &'static str;

    /// Codec settings, passed through untouched.
    type Options: Default;

    fn encode(value: &Value, options: &Self::Options) -> Result<String>;

    fn decode(input: &str, options: &Self::Options) -> Result<Value>;
}

/// Serializes `value` under `policy` and encodes it as `F`.
pub fn to_string_with<F: Format, T: Reflect>(
    value: &T,
    policy: &dyn CoercionPolicy,
    options: &F::Options,
) -> Result<String> {
    let tree = Serializer::new(policy).serialize(value)?;
    let text = F::encode(&tree, options)?;
    tracing::trace!(format = F::NAME, len = text.len(), "value encoded");
    Ok(text)
}

/// Decodes `input` as `F` and deserializes it under `policy`.
pub fn from_str_with<F: Format, T: Typed + FromRepr>(
    input: &str,
    policy: &dyn CoercionPolicy,
    options: &F::Options,
) -> Result<T> {
    let tree = F::decode(input, options)?;
    tracing::trace!(format = F::NAME, len = input.len(), "input decoded");
    Ok(Deserializer::new(policy).deserialize(&tree)?)
}
