//! JSON through `serde_json`.
//!
//! Bytes are written as arrays of integers; reading them back into a byte
//! field needs [`Coerce`].

use conform_reflect::info::Typed;
use conform_reflect::policy::{Coerce, CoercionPolicy};
use conform_reflect::value::Value;
use conform_reflect::{FromRepr, Reflect};

use crate::{Format, FormatError, Result};

/// Settings of the JSON binding.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonOptions {
    /// Indented output.
    pub pretty: bool,
}

/// The JSON binding.
#[derive(Clone, Copy, Debug, Default)]
pub struct Json;

impl Format for Json {
    const NAME: &'static str = "json";

    type Options = JsonOptions;

    fn encode(value: &Value, options: &JsonOptions) -> Result<String> {
        let text = if options.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        text.map_err(|e| FormatError::codec(Self::NAME, e))
    }

    fn decode(input: &str, _: &JsonOptions) -> Result<Value> {
        serde_json::from_str(input).map_err(|e| FormatError::codec(Self::NAME, e))
    }
}

/// Encodes `value` as compact JSON under [`Coerce`].
///
/// # Examples
///
/// ```
/// use conform_format::{from_json, to_json};
/// use conform_reflect::derive::Reflect;
///
/// #[derive(Reflect, Debug, PartialEq)]
/// struct Probe {
///     path: String,
///     interval: Option<u32>,
/// }
///
/// let probe = Probe { path: "/health".into(), interval: None };
/// let text = to_json(&probe).unwrap();
/// assert_eq!(text, r#"{"path":"/health","interval":null}"#);
/// assert_eq!(from_json::<Probe>(&text).unwrap(), probe);
/// ```
#[inline]
pub fn to_json<T: Reflect>(value: &T) -> Result<String> {
    to_json_with(value, &Coerce)
}

/// Like [`to_json`], under `policy` and with default [`JsonOptions`].
#[inline]
pub fn to_json_with<T: Reflect>(value: &T, policy: &dyn CoercionPolicy) -> Result<String> {
    to_json_with_options(value, policy, &JsonOptions::default())
}

#[inline]
pub fn to_json_with_options<T: Reflect>(
    value: &T,
    policy: &dyn CoercionPolicy,
    options: &JsonOptions,
) -> Result<String> {
    crate::to_string_with::<Json, T>(value, policy, options)
}

#[inline]
pub fn from_json<T: Typed + FromRepr>(input: &str) -> Result<T> {
    from_json_with(input, &Coerce)
}

/// Like [`from_json`], under `policy` and with default [`JsonOptions`].
#[inline]
pub fn from_json_with<T: Typed + FromRepr>(input: &str, policy: &dyn CoercionPolicy) -> Result<T> {
    from_json_with_options(input, policy, &JsonOptions::default())
}

#[inline]
pub fn from_json_with_options<T: Typed + FromRepr>(
    input: &str,
    policy: &dyn CoercionPolicy,
    options: &JsonOptions,
) -> Result<T> {
    crate::from_str_with::<Json, T>(input, policy, options)
}

#[cfg(test)]
mod tests {
    use conform_reflect::value::{Mapping, Value};

    use super::{Json, JsonOptions};
    use crate::{Format, FormatError};

    #[test]
    fn pretty_output() {
        let mut map = Mapping::new();
        map.insert("a", Value::Seq(vec![Value::Int(1)]));
        let options = JsonOptions { pretty: true };
        let text = Json::encode(&Value::Map(map), &options).unwrap();
        assert_eq!(text, "{\n  \"a\": [\n    1\n  ]\n}");
    }

    #[test]
    fn syntax_errors_are_codec_errors() {
        let err = Json::decode("{", &JsonOptions::default()).unwrap_err();
        assert!(matches!(err, FormatError::Codec { format: "json", .. }));
    }

    #[test]
    fn bytes_become_integer_arrays() {
        let text = Json::encode(&Value::Bytes(vec![1, 255]), &JsonOptions::default()).unwrap();
        assert_eq!(text, "[1,255]");
    }
}
