//! Extraction pipeline, CSV dump commands and lang CSV round-trip, built on
//! top of `mnf-archive`'s manifest/archive/ZOSFT parsing and `mnf-lang`'s
//! string store.

mod commands;
mod error;
mod hash_registry;
mod pipeline;
mod record;
#[cfg(test)]
pub(crate) mod test_support;
mod texture;

pub use commands::{
    debug_mnf, dump_index, dump_mnf, extract_all, extract_file, parse_lng, test_zosft, write_lng,
    ExtractAllOptions,
};
pub use error::{ExtractError, ExtractResult};
pub use hash_registry::HashRegistry;
pub use pipeline::{combine_records, run, ExtractStats, DEFAULT_WORKERS, MAX_WORKERS, MIN_WORKERS};
pub use record::{bytes_format, ExtractRecord};
pub use texture::{ProcessTextureConverter, TextureConverter, SUPPORTED_TARGET_FORMATS};
