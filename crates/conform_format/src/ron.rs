//! RON through the `ron` crate.
//!
//! Mappings are written as RON maps with string keys (`{"port": 80}`),
//! never as named structs, and null is written as `()`.

use ::ron::ser::PrettyConfig;
use conform_reflect::info::Typed;
use conform_reflect::policy::{Coerce, CoercionPolicy};
use conform_reflect::value::Value;
use conform_reflect::{FromRepr, Reflect};

use crate::{Format, FormatError, Result};

/// Settings of the RON binding.
#[derive(Clone, Copy, Debug, Default)]
pub struct RonOptions {
    /// Multi-line output with the default indentation.
    pub pretty: bool,
}

/// The RON binding.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ron;

impl Format for Ron {
    const NAME: &'static str = "ron";

    type Options = RonOptions;

    fn encode(value: &Value, options: &RonOptions) -> Result<String> {
        let text = if options.pretty {
            ::ron::ser::to_string_pretty(value, PrettyConfig::default())
        } else {
            ::ron::to_string(value)
        };
        text.map_err(|e| FormatError::codec(Self::NAME, e))
    }

    fn decode(input: &str, _: &RonOptions) -> Result<Value> {
        ::ron::from_str(input).map_err(|e| FormatError::codec(Self::NAME, e))
    }
}

/// Encodes `value` as compact RON under [`Coerce`].
///
/// # Examples
///
/// ```
/// use conform_format::{from_ron, to_ron};
/// use conform_reflect::derive::Reflect;
///
/// #[derive(Reflect, Debug, PartialEq)]
/// #[reflect(tag = "kind")]
/// enum Backoff {
///     Fixed { millis: u64 },
///     Exponential { base: u64, cap: u64 },
/// }
///
/// let backoff = Backoff::Fixed { millis: 250 };
/// let text = to_ron(&backoff).unwrap();
/// assert_eq!(text, r#"{"kind":"Fixed","millis":250}"#);
/// assert_eq!(from_ron::<Backoff>(&text).unwrap(), backoff);
/// ```
#[inline]
pub fn to_ron<T: Reflect>(value: &T) -> Result<String> {
    to_ron_with(value, &Coerce)
}

/// Like [`to_ron`], under `policy` and with default [`RonOptions`].
#[inline]
pub fn to_ron_with<T: Reflect>(value: &T, policy: &dyn CoercionPolicy) -> Result<String> {
    to_ron_with_options(value, policy, &RonOptions::default())
}

#[inline]
pub fn to_ron_with_options<T: Reflect>(
    value: &T,
    policy: &dyn CoercionPolicy,
    options: &RonOptions,
) -> Result<String> {
    crate::to_string_with::<Ron, T>(value, policy, options)
}

#[inline]
pub fn from_ron<T: Typed + FromRepr>(input: &str) -> Result<T> {
    from_ron_with(input, &Coerce)
}

/// Like [`from_ron`], under `policy` and with default [`RonOptions`].
#[inline]
pub fn from_ron_with<T: Typed + FromRepr>(input: &str, policy: &dyn CoercionPolicy) -> Result<T> {
    from_ron_with_options(input, policy, &RonOptions::default())
}

#[inline]
pub fn from_ron_with_options<T: Typed + FromRepr>(
    input: &str,
    policy: &dyn CoercionPolicy,
    options: &RonOptions,
) -> Result<T> {
    crate::from_str_with::<Ron, T>(input, policy, options)
}

#[cfg(test)]
mod tests {
    use conform_reflect::value::{Mapping, Value};

    use super::{Ron, RonOptions};
    use crate::{Format, FormatError};

    #[test]
    fn null_and_nesting() {
        let mut inner = Mapping::new();
        inner.insert("on", Value::Bool(true));
        let mut map = Mapping::new();
        map.insert("none", Value::Null);
        map.insert("list", Value::Seq(vec![Value::Int(1), Value::Float(2.5)]));
        map.insert("inner", Value::Map(inner));
        let value = Value::Map(map);

        for pretty in [false, true] {
            let options = RonOptions { pretty };
            let text = Ron::encode(&value, &options).unwrap();
            assert_eq!(Ron::decode(&text, &options).unwrap(), value);
        }
    }

    #[test]
    fn syntax_errors_are_codec_errors() {
        let err = Ron::decode("{\"a\": ", &RonOptions::default()).unwrap_err();
        assert!(matches!(err, FormatError::Codec { format: "ron", .. }));
    }
}
