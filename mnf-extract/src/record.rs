//! A joined, filtered `(Block2Record, Block3Record)` pair ready for a
//! worker task, grounded on `original_source/extracter/extracter.go`'s
//! `Record` type.

use mnf_archive::{Block2Record, Block3Record};

/// One entry retained by [`crate::pipeline::combine_records`].
#[derive(Debug, Clone)]
pub struct ExtractRecord {
    /// Original index in `Index3`'s parallel arrays, 0-based.
    pub index: usize,
    /// Logical identity fields.
    pub block2: Block2Record,
    /// Physical location and codec fields.
    pub block3: Block3Record,
    /// ZOSFT-derived filename, if this entry was nameable and the id was
    /// still present in the filename map when it was visited.
    pub filename: Option<String>,
}

impl ExtractRecord {
    /// The deterministic fallback filename `0x%08x-%08x.<ext>`, where the
    /// second hex group is `field2 ++ flags` read as one big-endian `u32`.
    #[must_use]
    pub fn raw_filename(&self, ext: &str) -> String {
        format!(
            "0x{:08x}-{:02x}{:02x}{:02x}{:02x}.{ext}",
            self.block2.id,
            self.block2.field2[0],
            self.block2.field2[1],
            self.block2.flags[0],
            self.block2.flags[1],
        )
    }
}

/// Hex-format `data` the way `original_source/format/format.go`'s
/// `BytesFormat` does: space-separated `%02x` groups, with an extra blank
/// separator inserted before every 4th byte.
#[must_use]
pub fn bytes_format(data: &[u8]) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(data.len());
    for (i, byte) in data.iter().enumerate() {
        if i != 0 && i % 4 == 0 {
            parts.push(String::new());
        }
        parts.push(format!("{byte:02x}"));
    }
    parts.join(" ")
}
