use thiserror::Error;

/// Errors shared by every parser in the toolchain.
#[derive(Debug, Error)]
pub enum FormatError {
    /// End of input reached before any byte of the current field was read.
    ///
    /// Used as the normal terminator for the `.lang`/ZOSFT string-blob scan
    /// loops, which read until this error instead of a fixed count.
    #[error("unexpected end of input")]
    Eof,

    /// End of input reached partway through a NUL-terminated string.
    #[error("unterminated string: {0} byte(s) read without a NUL terminator")]
    UnterminatedString(usize),

    /// Signature bytes did not match what the format requires.
    #[error("bad signature: expected {expected:?}, got {actual:?}")]
    BadSignature {
        /// Expected signature bytes.
        expected: &'static [u8],
        /// Signature bytes actually read.
        actual: Vec<u8>,
    },

    /// I/O error not covered by the EOF cases above.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for format primitives.
pub type FormatResult<T> = Result<T, FormatError>;
