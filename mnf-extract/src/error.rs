use thiserror::Error;

/// Errors from running the extraction pipeline and its CLI-facing commands.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Propagated from manifest, archive or ZOSFT parsing.
    #[error(transparent)]
    Archive(#[from] mnf_archive::ArchiveError),

    /// Propagated from language store parsing or writing.
    #[error(transparent)]
    Lang(#[from] mnf_lang::LangError),

    /// I/O error not already wrapped by one of the above.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read or write failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Directory walk failure while scanning `writeLng`'s input tree.
    #[error("directory walk error: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// `Index3`'s `Block2Records` and `Block3Records` lengths disagree.
    ///
    /// The manifest parser already enforces this invariant at parse time;
    /// this variant exists for commands that re-check it directly against
    /// a `Mnf` rather than going through `mnf_archive::Mnf::open`.
    #[error("len(Block2Records) != len(Block3Records)")]
    ParallelArrayMismatch,

    /// A `Block3Record` names an archive index with no open archive file.
    #[error("not valid archiveIndex: {0}")]
    ArchiveNotFound(u16),

    /// `extractFile --id` did not match `(?i)^(0x)?([0-9a-f]{8})-([0-9a-f]{8})`.
    #[error("invalid raw id {0:?}: expected <8 hex digits>-<8 hex digits>")]
    InvalidRawId(String),

    /// No retained entry in the manifest matched the requested raw id.
    #[error("no entry found for raw id {0:?}")]
    RawIdNotFound(String),

    /// A `writeLng` input filename did not match `0x%08x.csv`.
    #[error("invalid domain CSV filename {0:?}: expected 0x<8 hex digits>.csv")]
    InvalidDomainFilename(String),

    /// A CSV row had the wrong number of fields.
    #[error("malformed CSV row in {path:?}: expected {expected} fields, got {actual}")]
    MalformedRow {
        /// Source file the row came from.
        path: std::path::PathBuf,
        /// Expected field count.
        expected: usize,
        /// Actual field count.
        actual: usize,
    },

    /// A numeric CSV field failed to parse.
    #[error("malformed numeric field {field:?} in {path:?}: {value:?}")]
    MalformedField {
        /// Source file the row came from.
        path: std::path::PathBuf,
        /// Field name, for diagnostics.
        field: &'static str,
        /// Raw field value that failed to parse.
        value: String,
    },

    /// The external texture converter exited with a non-zero status or
    /// could not be spawned at all.
    #[error("texture conversion failed: {0}")]
    TextureConversion(String),
}

/// Result alias for this crate.
pub type ExtractResult<T> = Result<T, ExtractError>;
