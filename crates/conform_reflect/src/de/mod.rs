//! The deserializer core: [`Value`] to typed instances.
//!
//! Typed construction lives in [`FromRepr`] implementations (usually
//! derived). They drive a [`Deserializer`], which carries the policy and
//! options, tracks the field path for errors, and guards the depth.
//!
//! # Examples
//!
//! ```
//! use conform_reflect::{ErrorKind, derive::Reflect};
//! use conform_reflect::de::Deserializer;
//! use conform_reflect::policy::Strict;
//! use conform_reflect::value::{Mapping, Value};
//!
//! #[derive(Reflect, Debug, PartialEq)]
//! struct Limits {
//!     max_conn: u32,
//! }
//!
//! let mut map = Mapping::new();
//! map.insert("max_conn", Value::Int(64));
//! map.insert("z", Value::Null);
//! let input = Value::Map(map);
//!
//! let limits: Limits = Deserializer::new(&Strict).deserialize(&input).unwrap();
//! assert_eq!(limits, Limits { max_conn: 64 });
//!
//! let err = Deserializer::new(&Strict)
//!     .deny_unknown_fields(true)
//!     .deserialize::<Limits>(&input)
//!     .unwrap_err();
//! assert!(matches!(err.kind(), ErrorKind::UnknownField { .. }));
//! ```

use alloc::borrow::Cow;
use alloc::string::ToString;
use alloc::vec::Vec;
use core::mem;

use crate::FromRepr;
use crate::error::{Error, ErrorKind, Result};
use crate::info::{FieldInfo, TypeInfo};
use crate::path::{FieldPath, Segment};
use crate::policy::{CoercionPolicy, Rejected};
use crate::value::{Mapping, Value};

// -----------------------------------------------------------------------------
// Modules

mod class;
mod union;

pub use class::ClassAccess;

/// Default nesting limit of the serializer and the deserializer.
pub const DEFAULT_MAX_DEPTH: usize = 128;

// -----------------------------------------------------------------------------
// Deserializer

/// Reconstructs typed values from a [`Value`] tree.
///
/// Options are set with builder methods. Per-call state (path, depth) is
/// reset by [`deserialize`](Self::deserialize).
pub struct Deserializer<'p> {
    policy: &'p dyn CoercionPolicy,
    deny_unknown_fields: bool,
    max_depth: usize,
    depth: usize,
    path: FieldPath,
    // Set while a base class is read from its owner's mapping; holds the
    // inherited fields the owner overrides.
    flattened: Option<Vec<&'static FieldInfo>>,
}

impl<'p> Deserializer<'p> {
    #[inline]
    pub fn new(policy: &'p dyn CoercionPolicy) -> Self {
        Self {
            policy,
            deny_unknown_fields: false,
            max_depth: DEFAULT_MAX_DEPTH,
            depth: 0,
            path: FieldPath::root(),
            flattened: None,
        }
    }

    /// Fail with [`ErrorKind::UnknownField`] on keys no field claims.
    ///
    /// Classes marked `#[reflect(deny_unknown_fields)]` always do.
    #[inline]
    pub fn deny_unknown_fields(mut self, deny: bool) -> Self {
        self.deny_unknown_fields = deny;
        self
    }

    #[inline]
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[inline]
    pub fn policy(&self) -> &'p dyn CoercionPolicy {
        self.policy
    }

    /// The path of the node being read.
    #[inline]
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Deserializes a whole tree into `T`.
    pub fn deserialize<T: FromRepr>(&mut self, value: &Value) -> Result<T> {
        self.reset();
        T::from_repr(value, self)
    }

    #[inline]
    pub(crate) fn reset(&mut self) {
        self.restore(0, 0);
    }

    // -------------------------------------------------------------------------
    // Errors

    /// An error located at the current path.
    #[inline]
    pub fn error(&self, kind: ErrorKind) -> Error {
        Error::at(kind, self.path.clone())
    }

    /// A [`ErrorKind::RejectedValue`] located at the current path.
    pub fn reject(
        &self,
        declared: &TypeInfo,
        value: &Value,
        reason: impl Into<Cow<'static, str>>,
    ) -> Error {
        self.error(ErrorKind::RejectedValue {
            declared: declared.type_path(),
            actual: value.to_string(),
            reason: reason.into(),
        })
    }

    // -------------------------------------------------------------------------
    // Building blocks for `FromRepr`

    /// Runs the policy for `declared`.
    #[inline]
    pub fn check<'v>(&self, declared: &TypeInfo, value: &'v Value) -> Result<Cow<'v, Value>> {
        self.policy
            .check(declared, value)
            .map_err(|Rejected { reason }| self.reject(declared, value, reason))
    }

    /// Runs `f` one level deeper, under `segment`.
    pub fn nested<T>(
        &mut self,
        segment: Segment,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        self.path.push(segment);
        let result = self.deeper(f);
        self.path.pop();
        result
    }

    /// Runs `f` one level deeper at the same path.
    ///
    /// Used for values read in place: the inner value of an optional and
    /// the payload of a newtype variant.
    pub fn deeper<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= self.max_depth {
            return Err(self.error(ErrorKind::DepthExceeded {
                limit: self.max_depth,
            }));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Deserializes a child value under `segment`.
    #[inline]
    pub fn element<T: FromRepr>(&mut self, segment: Segment, value: &Value) -> Result<T> {
        self.nested(segment, |de| T::from_repr(value, de))
    }

    /// Checks a sequence-like value and returns its items.
    pub fn seq<'v>(&self, declared: &TypeInfo, value: &'v Value) -> Result<Cow<'v, [Value]>> {
        match self.check(declared, value)? {
            Cow::Borrowed(Value::Seq(items)) => Ok(Cow::Borrowed(items.as_slice())),
            Cow::Owned(Value::Seq(items)) => Ok(Cow::Owned(items)),
            _ => Err(self.reject(declared, value, "expected a sequence")),
        }
    }

    /// Like [`seq`](Self::seq), also requiring exactly `len` items.
    ///
    /// Used for tuple variants, whose declared type is the union.
    pub fn tuple<'v>(
        &self,
        declared: &TypeInfo,
        value: &'v Value,
        len: usize,
    ) -> Result<Cow<'v, [Value]>> {
        let items = self.seq(declared, value)?;
        if items.len() != len {
            return Err(self.reject(
                declared,
                value,
                alloc::format!("expected {len} elements, found {}", items.len()),
            ));
        }
        Ok(items)
    }

    /// Checks a map value and returns its entries.
    pub fn map<'v>(&self, declared: &TypeInfo, value: &'v Value) -> Result<&'v Mapping> {
        self.check(declared, value)?;
        value
            .as_map()
            .ok_or_else(|| self.reject(declared, value, "expected a mapping"))
    }

    // Consumed by the next `class` call only.
    #[inline]
    fn take_flattened(&mut self) -> Option<Vec<&'static FieldInfo>> {
        mem::take(&mut self.flattened)
    }

    // Restores per-call state after a failed union variant attempt.
    #[inline]
    fn restore(&mut self, depth: usize, path_len: usize) {
        self.depth = depth;
        self.path.truncate(path_len);
        self.flattened = None;
    }
}

impl core::fmt::Debug for Deserializer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Deserializer")
            .field("policy", &self.policy)
            .field("deny_unknown_fields", &self.deny_unknown_fields)
            .field("max_depth", &self.max_depth)
            .field("path", &self.path)
            .finish()
    }
}
