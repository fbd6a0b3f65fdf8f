//! Error types shared by the serializer and the deserializer.

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use crate::path::FieldPath;

/// Result type of every fallible operation in this crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

// -----------------------------------------------------------------------------
// ErrorKind

/// What went wrong, independent of where.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A type referenced by name is not known at use time.
    #[error("unresolved type `{name}`")]
    UnresolvedType { name: String },

    /// The coercion policy rejected a value for a declared type.
    #[error("rejected {actual} for `{declared}`: {reason}")]
    RejectedValue {
        declared: &'static str,
        actual: String,
        reason: Cow<'static, str>,
    },

    /// Strict union fallback found more than one matching variant.
    #[error("ambiguous value for union `{union}`: variants {} all match", .candidates.join(", "))]
    AmbiguousUnion {
        union: &'static str,
        candidates: Vec<&'static str>,
    },

    /// A class instance was reached again while it was still being serialized.
    #[error("cyclic reference to an instance of `{class}`")]
    CyclicReference { class: &'static str },

    #[error("missing field `{field}` of `{class}`")]
    MissingField {
        class: &'static str,
        field: &'static str,
    },

    #[error("unknown field `{field}` for `{class}`")]
    UnknownField { class: &'static str, field: String },

    /// The class definition itself cannot be represented, for example a
    /// base field whose type is not a class.
    #[error("invalid class `{class}`: {reason}")]
    InvalidClass {
        class: &'static str,
        reason: &'static str,
    },

    #[error("maximum nesting depth of {limit} exceeded")]
    DepthExceeded { limit: usize },

    /// Raised by custom field hooks.
    #[error("{0}")]
    Custom(Box<dyn core::error::Error + Send + Sync>),
}

impl ErrorKind {
    /// Whether the error only means "this input does not have that shape".
    ///
    /// Union fallback treats these as a non-matching variant and moves on;
    /// every other kind aborts the whole call. Hook errors are never
    /// mismatches, so a failing hook is reported rather than skipped.
    pub fn is_mismatch(&self) -> bool {
        matches!(
            self,
            ErrorKind::RejectedValue { .. }
                | ErrorKind::AmbiguousUnion { .. }
                | ErrorKind::MissingField { .. }
                | ErrorKind::UnknownField { .. }
        )
    }
}

// -----------------------------------------------------------------------------
// Error

/// An [`ErrorKind`] together with the [`FieldPath`] where it happened.
///
/// # Examples
///
/// ```
/// use conform_reflect::{Error, ErrorKind};
///
/// let err = Error::custom("port must be positive");
/// assert!(matches!(err.kind(), ErrorKind::Custom(_)));
/// assert_eq!(err.to_string(), "port must be positive");
/// ```
#[derive(Debug)]
pub struct Error {
    kind: Box<ErrorKind>,
    path: FieldPath,
}

impl Error {
    /// Creates an error located at the root.
    #[inline]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind: Box::new(kind),
            path: FieldPath::root(),
        }
    }

    /// Creates an error located at `path`.
    #[inline]
    pub fn at(kind: ErrorKind, path: FieldPath) -> Self {
        Self {
            kind: Box::new(kind),
            path,
        }
    }

    /// A [`ErrorKind::Custom`] error carrying `msg`.
    pub fn custom(msg: impl fmt::Display) -> Self {
        Self::new(ErrorKind::Custom(msg.to_string().into()))
    }

    #[inline]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    #[inline]
    pub fn into_kind(self) -> ErrorKind {
        *self.kind
    }

    #[inline]
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Sets the path if the error does not carry one yet.
    ///
    /// Hooks build errors without knowing where they run.
    pub(crate) fn or_at(mut self, path: &FieldPath) -> Self {
        if self.path.is_root() {
            self.path = path.clone();
        }
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.path, self.kind)
        }
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match &*self.kind {
            ErrorKind::Custom(inner) => Some(&**inner),
            _ => None,
        }
    }
}

impl From<ErrorKind> for Error {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind};
    use crate::path::{FieldPath, Segment};

    #[test]
    fn display_includes_path() {
        let mut path = FieldPath::root();
        path.push(Segment::Field("server".into()));
        path.push(Segment::Field("port".into()));
        let err = Error::at(
            ErrorKind::MissingField {
                class: "Server",
                field: "port",
            },
            path,
        );
        assert_eq!(err.to_string(), "server.port: missing field `port` of `Server`");
    }

    #[test]
    fn mismatch_classification() {
        assert!(
            ErrorKind::UnknownField {
                class: "A",
                field: "z".into()
            }
            .is_mismatch()
        );
        assert!(!ErrorKind::DepthExceeded { limit: 4 }.is_mismatch());
        assert!(!ErrorKind::UnresolvedType { name: "X".into() }.is_mismatch());
        assert!(!ErrorKind::Custom("hook failed".into()).is_mismatch());
        assert!(
            !ErrorKind::InvalidClass {
                class: "A",
                reason: "bad base"
            }
            .is_mismatch()
        );
    }
}
