use conform_reflect::path::FieldPath;

/// The result type of the format bindings.
pub type Result<T, E = FormatError> = core::result::Result<T, E>;

/// Failure of a format binding.
///
/// Core errors pass through unchanged, so the field path and the
/// [`ErrorKind`](conform_reflect::ErrorKind) stay available.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error(transparent)]
    Core(#[from] conform_reflect::Error),

    /// The codec rejected the input or failed to write the output.
    #[error("{format} codec error: {source}")]
    Codec {
        format: &'static str,
        #[source]
        source: Box<dyn core::error::Error + Send + Sync>,
    },

    /// The value tree has no form in the target format.
    #[error("{format} cannot represent the value at {path}: {reason}")]
    Unrepresentable {
        format: &'static str,
        path: FieldPath,
        reason: &'static str,
    },
}

impl FormatError {
    pub(crate) fn codec(
        format: &'static str,
        source: impl core::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Codec {
            format,
            source: Box::new(source),
        }
    }

    /// The core error, if this is one.
    pub fn as_core(&self) -> Option<&conform_reflect::Error> {
        match self {
            FormatError::Core(err) => Some(err),
            _ => None,
        }
    }
}
