//! Shared primitives for the MNF/ZOSFT/lang archive toolchain.
//!
//! This crate has no knowledge of any specific on-disk format; it only
//! provides the byte-level reading trait and payload-sniffing function that
//! every format crate in the workspace builds on.

mod byte_reader;
mod error;
mod ext;

pub use byte_reader::ByteReader;
pub use error::{FormatError, FormatResult};
pub use ext::sniff_extension;
