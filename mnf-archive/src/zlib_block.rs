//! Shared helper for the "u32 uncompressed size, u32 compressed size, zlib
//! bytes" framing that recurs in the manifest's `Index3` and in ZOSFT's
//! three sub-indices — with the framing endianness differing between the
//! two formats, so the caller passes already-read sizes rather than this
//! module picking an endianness itself.

use std::io::Read;

use flate2::read::ZlibDecoder;

use crate::error::{ArchiveError, ArchiveResult};

/// Inflate exactly `compressed_size` zlib-compressed bytes from `reader`,
/// returning exactly `uncompressed_size` bytes of output.
pub(crate) fn inflate_framed<R: Read>(
    reader: &mut R,
    compressed_size: u32,
    uncompressed_size: u32,
) -> ArchiveResult<Vec<u8>> {
    let limited = reader.take(u64::from(compressed_size));
    let mut decoder = ZlibDecoder::new(limited);
    let mut out = Vec::with_capacity(uncompressed_size as usize);
    decoder
        .read_to_end(&mut out)
        .map_err(|e| ArchiveError::Zlib(e.to_string()))?;
    Ok(out)
}
