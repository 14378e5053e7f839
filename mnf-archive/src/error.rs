use thiserror::Error;

/// Errors from parsing manifests, archives and ZOSFT sidecars.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Propagated from the shared byte-reading primitives.
    #[error(transparent)]
    Format(#[from] mnf_format::FormatError),

    /// I/O error not already wrapped by [`mnf_format::FormatError`].
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Manifest version is not the only one this parser understands (3).
    #[error("unsupported manifest version: {0}")]
    UnsupportedVersion(u16),

    /// An index block ID other than 0 or 3 was encountered where the parser
    /// expected one of those two.
    #[error("unknown index block id: {0}")]
    UnknownIndexId(u16),

    /// A `Block3Record` names an archive index with no corresponding open
    /// archive file handle.
    #[error("archive index {0} has no open archive file")]
    ArchiveNotFound(u16),

    /// A `Block3Record`'s offset and compressed size run past the end of
    /// its owning archive file.
    #[error("record range {offset}+{compressed_size} exceeds archive size {archive_size}")]
    RecordOutOfRange {
        /// Record's declared offset.
        offset: u32,
        /// Record's declared compressed size.
        compressed_size: u32,
        /// Actual size of the owning archive file.
        archive_size: u64,
    },

    /// `compression_type` was not one of 0, 1, 4, 8.
    #[error("unsupported compression type: {0}")]
    UnsupportedCompression(u16),

    /// `compression_type` was 4 or 8 (Oodle) but no [`OodleDecompressor`]
    /// was supplied.
    ///
    /// [`OodleDecompressor`]: crate::archive::OodleDecompressor
    #[error("Oodle decompression requested but no decompressor is configured")]
    OodleNotConfigured,

    /// zlib inflate failed.
    #[error("zlib decompression failed: {0}")]
    Zlib(String),

    /// `Index3`'s `Block2Records` and `Block3Records` lengths disagree,
    /// violating the parallel-array invariant.
    #[error("parallel array invariant violated: {block2} Block2Records vs {block3} Block3Records")]
    ParallelArrayMismatch {
        /// Number of parsed `Block2Record`s.
        block2: usize,
        /// Number of parsed `Block3Record`s.
        block3: usize,
    },

    /// A framed block's zlib stream inflated to fewer (or more) bytes than
    /// its header declared, too corrupt to index into safely.
    #[error("block declared {declared} uncompressed bytes but inflated to {actual}")]
    TruncatedBlock {
        /// Declared uncompressed size from the block header.
        declared: u32,
        /// Actual number of bytes produced by inflation.
        actual: usize,
    },
}

/// Result alias for this crate.
pub type ArchiveResult<T> = Result<T, ArchiveError>;
