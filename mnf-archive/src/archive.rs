//! Archive (`.dat`) file handle: raw payload extraction plus decompression.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use parking_lot::Mutex;

use crate::error::{ArchiveError, ArchiveResult};
use crate::records::Block3Record;

/// External Oodle decompressor, supplied by the caller.
///
/// The Oodle codec itself is a proprietary external library; this crate
/// never links against it directly. Compression types 4 and 8 (the only
/// ones seen in practice) are routed through whatever implementation of
/// this trait the caller supplies.
pub trait OodleDecompressor: Send + Sync {
    /// Decompress `src` into exactly `dst_size` bytes.
    fn decompress(&self, src: &[u8], dst_size: usize) -> ArchiveResult<Vec<u8>>;
}

/// Default [`OodleDecompressor`] that always fails.
///
/// Lets every other part of the pipeline run and be tested without the
/// real Oodle library present; callers that need compression types 4/8
/// must supply their own implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullOodle;

impl OodleDecompressor for NullOodle {
    fn decompress(&self, _src: &[u8], _dst_size: usize) -> ArchiveResult<Vec<u8>> {
        Err(ArchiveError::OodleNotConfigured)
    }
}

/// One open `.dat` archive file, its size cached at open time.
#[derive(Debug)]
pub struct ArchiveFile {
    file: Mutex<File>,
    size: u64,
}

impl ArchiveFile {
    /// Open the archive at `path`, caching its size for [`ArchiveFile::is_valid`].
    pub fn open(path: impl AsRef<Path>) -> ArchiveResult<Self> {
        let file = File::open(path)?;
        let size = file.metadata()?.len();
        Ok(Self {
            file: Mutex::new(file),
            size,
        })
    }

    /// Size of the archive file in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Whether `record`'s stored range actually fits inside this archive.
    #[must_use]
    pub fn is_valid(&self, record: &Block3Record) -> bool {
        let end = u64::from(record.offset) + u64::from(record.compressed_size);
        end <= self.size
    }

    /// Read `record`'s payload, decompress it per `record.compression_type`,
    /// and strip an embedded length-prefixed header if one is present.
    pub fn read(
        &self,
        record: &Block3Record,
        oodle: &dyn OodleDecompressor,
    ) -> ArchiveResult<Vec<u8>> {
        let raw = self.read_raw(record)?;

        let mut data = match record.compression_type {
            0 => raw,
            1 => {
                let mut decoder = flate2::read::ZlibDecoder::new(raw.as_slice());
                let mut out = Vec::with_capacity(record.uncompressed_size as usize);
                decoder
                    .read_to_end(&mut out)
                    .map_err(|e| ArchiveError::Zlib(e.to_string()))?;
                out
            }
            4 | 8 => oodle.decompress(&raw, record.uncompressed_size as usize)?,
            other => return Err(ArchiveError::UnsupportedCompression(other)),
        };

        strip_embedded_header(&mut data);

        Ok(data)
    }

    /// Read `record`'s payload as stored in the archive, without
    /// decompressing or stripping anything.
    pub fn read_raw(&self, record: &Block3Record) -> ArchiveResult<Vec<u8>> {
        let mut guard = self.file.lock();
        guard.seek(SeekFrom::Start(u64::from(record.offset)))?;

        let mut buf = vec![0u8; record.compressed_size as usize];
        guard.read_exact(&mut buf)?;
        Ok(buf)
    }
}

/// Some decompressed payloads carry a leading marker word followed by two
/// big-endian length-prefixed blocks ahead of the real file content. When
/// present, this strips that header in place, leaving `data` truncated to
/// just the payload that follows it.
///
/// The marker is a single case: the first 4 bytes (big-endian) are zero
/// and at least 16 bytes are available. Anything else leaves `data`
/// untouched, including payloads too short to safely inspect.
fn strip_embedded_header(data: &mut Vec<u8>) {
    if data.len() < 16 || data[0] != 0x00 {
        return;
    }

    let read_be_u32 = |d: &[u8], at: usize| -> Option<u32> {
        d.get(at..at + 4).map(|s| u32::from_be_bytes(s.try_into().unwrap()))
    };

    let Some(marker) = read_be_u32(data, 0) else { return };
    if marker != 0 {
        return;
    }

    let mut cursor = 4usize;
    let Some(block1_size) = read_be_u32(data, cursor) else { return };
    cursor += 4 + block1_size as usize;

    let Some(block2_size) = read_be_u32(data, cursor) else { return };
    cursor += 4 + block2_size as usize;

    if cursor > data.len() {
        return;
    }

    data.drain(..cursor);
}
