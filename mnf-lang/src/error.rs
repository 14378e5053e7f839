use thiserror::Error;

/// Errors from parsing or writing a language store.
#[derive(Debug, Error)]
pub enum LangError {
    /// Propagated from the shared byte-reading primitives.
    #[error(transparent)]
    Format(#[from] mnf_format::FormatError),

    /// I/O error not already wrapped by [`mnf_format::FormatError`].
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for this crate.
pub type LangResult<T> = Result<T, LangError>;
