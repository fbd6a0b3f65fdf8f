//! Coercion policies: how closely a value must match its declared type.
//!
//! A policy is consulted for every node in both directions. It never
//! recurses: containers are checked for their own shape and their
//! elements are checked when the walker reaches them.
//!
//! | input | declared | [`Strict`] | [`Coerce`] |
//! |---|---|---|---|
//! | `42` | `i32` | accepted | accepted |
//! | `300` | `u8` | rejected | rejected |
//! | `42` | `f64` | rejected | `42.0` |
//! | `"42"` | `i32` | rejected | `42` |
//! | `"true"` | `bool` | rejected | `true` |
//! | `[1, 2]` | bytes | rejected | `b"\x01\x02"` |
//! | bytes | `Vec<u8>` | rejected | `[1, 2]` |

use alloc::borrow::Cow;
use alloc::format;
use alloc::vec::Vec;
use core::fmt;

use crate::info::{ScalarKind, TypeInfo};
use crate::value::Value;

// -----------------------------------------------------------------------------
// Rejected

/// Why a policy refused a value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rejected {
    pub reason: Cow<'static, str>,
}

impl Rejected {
    #[inline]
    pub fn new(reason: impl Into<Cow<'static, str>>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn expected(what: &str, value: &Value) -> Self {
        Self::new(format!("expected {what}, found {}", value.kind_name()))
    }
}

// -----------------------------------------------------------------------------
// UnionResolution

/// How the deserializer picks a variant when a union value carries no
/// usable discriminator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnionResolution {
    /// The first variant that accepts the value wins.
    FirstMatch,
    /// Exactly one variant must accept the value; two or more is an
    /// [`AmbiguousUnion`](crate::ErrorKind::AmbiguousUnion) error.
    ExactlyOne,
}

// -----------------------------------------------------------------------------
// CoercionPolicy

/// A stateless strategy deciding whether a value fits a declared type.
///
/// The policy is passed to each top-level call; there is no global default.
///
/// # Examples
///
/// ```
/// use conform_reflect::info::Typed;
/// use conform_reflect::policy::{CoercionPolicy, Coerce, Strict};
/// use conform_reflect::value::Value;
///
/// let input = Value::from("42");
/// let declared = i32::type_info();
///
/// assert!(Strict.check(declared, &input).is_err());
/// assert_eq!(Coerce.check(declared, &input).unwrap().into_owned(), Value::Int(42));
/// ```
pub trait CoercionPolicy: fmt::Debug + Send + Sync {
    /// Accepts `value` for `declared`, possibly converted, or rejects it.
    ///
    /// An accepted value has the exact shape `declared` requires.
    fn check<'v>(&self, declared: &TypeInfo, value: &'v Value)
    -> Result<Cow<'v, Value>, Rejected>;

    fn union_resolution(&self) -> UnionResolution;
}

// -----------------------------------------------------------------------------
// Strict

/// Accepts exact structural matches only.
#[derive(Clone, Copy, Debug, Default)]
pub struct Strict;

impl CoercionPolicy for Strict {
    #[inline]
    fn check<'v>(
        &self,
        declared: &TypeInfo,
        value: &'v Value,
    ) -> Result<Cow<'v, Value>, Rejected> {
        check_exact(declared, value).map(|()| Cow::Borrowed(value))
    }

    #[inline]
    fn union_resolution(&self) -> UnionResolution {
        UnionResolution::ExactlyOne
    }
}

// -----------------------------------------------------------------------------
// Coerce

/// Tries, in order: an exact match, integer to float widening, same-shape
/// container conversion, then parsing a string into the declared primitive.
#[derive(Clone, Copy, Debug, Default)]
pub struct Coerce;

impl CoercionPolicy for Coerce {
    fn check<'v>(
        &self,
        declared: &TypeInfo,
        value: &'v Value,
    ) -> Result<Cow<'v, Value>, Rejected> {
        match check_exact(declared, value) {
            Ok(()) => Ok(Cow::Borrowed(value)),
            Err(rejected) => match coerce(declared, value) {
                Some(converted) => converted.map(Cow::Owned),
                None => Err(rejected),
            },
        }
    }

    #[inline]
    fn union_resolution(&self) -> UnionResolution {
        UnionResolution::FirstMatch
    }
}

// -----------------------------------------------------------------------------
// Shared rules

/// The structural rule both stock policies start from.
///
/// Optional and union types accept anything here; their contents are
/// checked once the deserializer picked a branch.
pub fn check_exact(declared: &TypeInfo, value: &Value) -> Result<(), Rejected> {
    match declared {
        TypeInfo::Scalar(info) => check_scalar(info.kind(), value),
        TypeInfo::List(_) | TypeInfo::Set(_) => match value {
            Value::Seq(_) => Ok(()),
            _ => Err(Rejected::expected("a sequence", value)),
        },
        TypeInfo::Array(info) => check_len(info.len(), value),
        TypeInfo::Tuple(info) => check_len(info.len(), value),
        TypeInfo::Map(_) | TypeInfo::Class(_) => match value {
            Value::Map(_) => Ok(()),
            _ => Err(Rejected::expected("a mapping", value)),
        },
        TypeInfo::Optional(_) | TypeInfo::Union(_) => Ok(()),
    }
}

fn check_len(len: usize, value: &Value) -> Result<(), Rejected> {
    match value {
        Value::Seq(items) if items.len() == len => Ok(()),
        Value::Seq(items) => Err(Rejected::new(format!(
            "expected {len} elements, found {}",
            items.len()
        ))),
        _ => Err(Rejected::expected("a sequence", value)),
    }
}

fn check_int(kind: ScalarKind, value: i64) -> Result<(), Rejected> {
    match kind.int_range() {
        Some((lo, hi)) if (lo..=hi).contains(&(value as i128)) => Ok(()),
        Some((lo, hi)) => Err(Rejected::new(format!(
            "{value} is out of range {lo}..={hi}"
        ))),
        None => Err(Rejected::new("not an integer type")),
    }
}

fn check_scalar(kind: ScalarKind, value: &Value) -> Result<(), Rejected> {
    match (kind, value) {
        (ScalarKind::Any, _)
        | (ScalarKind::Unit, Value::Null)
        | (ScalarKind::Bool, Value::Bool(_))
        | (ScalarKind::Str, Value::Str(_))
        | (ScalarKind::Bytes, Value::Bytes(_))
        | (ScalarKind::F64, Value::Float(_)) => Ok(()),
        (ScalarKind::Char, Value::Str(s)) => match s.chars().count() {
            1 => Ok(()),
            _ => Err(Rejected::new("expected a single character")),
        },
        (ScalarKind::F32, Value::Float(f)) => {
            if !f.is_finite() || f.abs() <= f32::MAX as f64 {
                Ok(())
            } else {
                Err(Rejected::new(format!("{f} is out of range for f32")))
            }
        }
        (kind, Value::Int(i)) if kind.int_range().is_some() => check_int(kind, *i),
        (kind, _) => Err(Rejected::expected(scalar_name(kind), value)),
    }
}

fn scalar_name(kind: ScalarKind) -> &'static str {
    match kind {
        ScalarKind::Unit => "null",
        ScalarKind::Bool => "a bool",
        ScalarKind::Char => "a character",
        ScalarKind::F32 | ScalarKind::F64 => "a float",
        ScalarKind::Str => "a string",
        ScalarKind::Bytes => "bytes",
        ScalarKind::Any => "any value",
        _ => "an integer",
    }
}

// `None` when no conversion applies, so the exact-match rejection is reported.
fn coerce(declared: &TypeInfo, value: &Value) -> Option<Result<Value, Rejected>> {
    match (declared, value) {
        // widening
        (TypeInfo::Scalar(info), Value::Int(i)) if info.kind().is_float() => {
            Some(Ok(Value::Float(*i as f64)))
        }
        // containers
        (TypeInfo::Scalar(info), Value::Seq(items)) if info.kind() == ScalarKind::Bytes => {
            Some(seq_to_bytes(items))
        }
        (TypeInfo::List(_) | TypeInfo::Set(_), Value::Bytes(bytes)) => Some(Ok(bytes_to_seq(bytes))),
        (TypeInfo::Array(info), Value::Bytes(bytes)) => Some(sized_seq(info.len(), bytes)),
        (TypeInfo::Tuple(info), Value::Bytes(bytes)) => Some(sized_seq(info.len(), bytes)),
        // string parsing
        (TypeInfo::Scalar(info), Value::Str(s)) => parse_str(info.kind(), s),
        _ => None,
    }
}

fn seq_to_bytes(items: &[Value]) -> Result<Value, Rejected> {
    items
        .iter()
        .map(|item| match item {
            Value::Int(i) => u8::try_from(*i)
                .map_err(|_| Rejected::new(format!("{i} is not a byte"))),
            other => Err(Rejected::expected("a byte", other)),
        })
        .collect::<Result<Vec<u8>, _>>()
        .map(Value::Bytes)
}

fn bytes_to_seq(bytes: &[u8]) -> Value {
    Value::Seq(bytes.iter().map(|b| Value::Int(*b as i64)).collect())
}

fn sized_seq(len: usize, bytes: &[u8]) -> Result<Value, Rejected> {
    let seq = bytes_to_seq(bytes);
    check_len(len, &seq).map(|()| seq)
}

fn parse_str(kind: ScalarKind, s: &str) -> Option<Result<Value, Rejected>> {
    if kind.int_range().is_some() {
        return Some(
            s.parse::<i64>()
                .map_err(|_| Rejected::new(format!("cannot parse {s:?} as an integer")))
                .and_then(|i| check_int(kind, i).map(|()| Value::Int(i))),
        );
    }
    match kind {
        ScalarKind::F32 | ScalarKind::F64 => Some(
            s.parse::<f64>()
                .map_err(|_| Rejected::new(format!("cannot parse {s:?} as a float")))
                .and_then(|f| check_scalar(kind, &Value::Float(f)).map(|()| Value::Float(f))),
        ),
        ScalarKind::Bool => match s {
            "true" => Some(Ok(Value::Bool(true))),
            "false" => Some(Ok(Value::Bool(false))),
            _ => Some(Err(Rejected::new(format!("cannot parse {s:?} as a bool")))),
        },
        _ => None,
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{CoercionPolicy, Coerce, Strict};
    use crate::ByteBuf;
    use crate::info::Typed;
    use crate::value::Value;

    #[test]
    fn strict_is_exact() {
        assert!(Strict.check(u8::type_info(), &Value::Int(255)).is_ok());
        assert!(Strict.check(u8::type_info(), &Value::Int(256)).is_err());
        assert!(Strict.check(f64::type_info(), &Value::Int(1)).is_err());
        assert!(Strict.check(char::type_info(), &Value::from("ab")).is_err());
        assert!(Strict.check(<Vec<u8>>::type_info(), &Value::Bytes(vec![1])).is_err());
        assert!(Strict.check(<[u8; 2]>::type_info(), &Value::Seq(vec![Value::Int(1)])).is_err());
    }

    #[test]
    fn coerce_order() {
        let three = Value::Int(3);
        let widen = Coerce.check(f64::type_info(), &three).unwrap();
        assert_eq!(widen.into_owned(), Value::Float(3.0));

        // never narrows
        assert!(Coerce.check(i64::type_info(), &Value::Float(3.0)).is_err());

        let ints = Value::Seq(vec![Value::Int(1), Value::Int(2)]);
        let bytes = Coerce.check(ByteBuf::type_info(), &ints).unwrap();
        assert_eq!(bytes.into_owned(), Value::Bytes(vec![1, 2]));

        let raw = Value::Bytes(vec![7, 8]);
        let seq = Coerce.check(<[u8; 2]>::type_info(), &raw).unwrap();
        assert_eq!(seq.into_owned(), Value::Seq(vec![Value::Int(7), Value::Int(8)]));
        assert!(Coerce.check(<[u8; 3]>::type_info(), &raw).is_err());

        let int_text = Value::from("42");
        let parsed = Coerce.check(i32::type_info(), &int_text).unwrap();
        assert_eq!(parsed.into_owned(), Value::Int(42));
        let float_text = Value::from("1.5");
        let parsed = Coerce.check(f32::type_info(), &float_text).unwrap();
        assert_eq!(parsed.into_owned(), Value::Float(1.5));
        let bool_text = Value::from("false");
        let parsed = Coerce.check(bool::type_info(), &bool_text).unwrap();
        assert_eq!(parsed.into_owned(), Value::Bool(false));
    }

    #[test]
    fn coerce_rejects_unparseable_and_out_of_range() {
        let err = Coerce.check(u8::type_info(), &Value::from("300")).unwrap_err();
        assert!(err.reason.contains("out of range"));
        let err = Coerce.check(u8::type_info(), &Value::from("4x")).unwrap_err();
        assert!(err.reason.contains("cannot parse"));
        assert!(Coerce.check(bool::type_info(), &Value::from("yes")).is_err());
        assert!(Coerce.check(String::type_info(), &Value::Int(1)).is_err());
    }
}
