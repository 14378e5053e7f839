//! ZOSFT filename sidecar parsing.
//!
//! A ZOSFT blob carries three structurally identical sub-indices ahead of
//! a NUL-delimited filename blob. Only the second sub-index is ever joined
//! against anything else in this toolchain; the first and third are parsed
//! so round-tripping tools can report their shapes, matching the upstream
//! reader's own "only index 2 matters" comment.

use std::collections::HashMap;
use std::io::Read;

use mnf_format::ByteReader;

use crate::error::{ArchiveError, ArchiveResult};
use crate::zlib_block::inflate_framed;

const SIGNATURE: &[u8] = b"ZOSFT";

/// A fully parsed ZOSFT sidecar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zosft {
    /// Opaque field following the signature, preserved verbatim.
    pub field2: [u8; 10],
    /// Declared number of (id, offset) pairs joined through `Index2`.
    pub count: u32,
    /// First sub-index. Not semantically used anywhere in this toolchain.
    pub index1: Index1,
    /// Second sub-index: the id/offset table this format exists for.
    pub index2: Index2,
    /// Third sub-index. Not semantically used anywhere in this toolchain.
    pub index3: Index3,
    /// Size in bytes of the trailing NUL-delimited filename blob.
    pub data_size: u32,
    /// Filenames keyed by their starting byte offset into the filename
    /// blob, as consumed while scanning it.
    pub offset_file_name: HashMap<u32, String>,
}

impl Zosft {
    /// Parse a full ZOSFT blob, including its opening and closing
    /// signature.
    pub fn parse<R: Read>(r: &mut R) -> ArchiveResult<Self> {
        r.expect_signature(SIGNATURE)?;

        let field2: [u8; 10] = r.read_bytes(10)?.try_into().unwrap();
        let count = r.read_u32le()?;

        let index1 = parse_index1(r)?;
        let index2 = parse_index2(r)?;
        let index3 = parse_index3(r)?;

        let data_size = r.read_u32le()?;
        let offset_file_name = read_filename_blob(r, data_size)?;

        r.expect_signature(SIGNATURE)?;

        Ok(Self {
            field2,
            count,
            index1,
            index2,
            index3,
            data_size,
            offset_file_name,
        })
    }

    /// Join `Index2`'s id and offset columns against the filename blob,
    /// producing a `Block2Record.id -> filename` table.
    #[must_use]
    pub fn file_names_by_id(&self) -> HashMap<u32, String> {
        let mut out = HashMap::with_capacity(self.count as usize);
        for i in 0..self.count as usize {
            let Some(id_record) = self.index2.block2_records.get(i) else {
                break;
            };
            let Some(offset_record) = self.index2.block3_records.get(i) else {
                break;
            };
            if let Some(name) = self.offset_file_name.get(&offset_record.offset) {
                out.insert(id_record.id, name.clone());
            }
        }
        out
    }
}

fn read_filename_blob<R: Read>(r: &mut R, data_size: u32) -> ArchiveResult<HashMap<u32, String>> {
    let mut limited = r.take(u64::from(data_size));
    let mut offset_file_name = HashMap::new();
    let mut current = Vec::new();
    let mut byte = [0u8; 1];
    let mut offset = 0u32;
    let mut i = 0u32;

    loop {
        match limited.read(&mut byte) {
            Ok(0) => break,
            Ok(_) => {
                if byte[0] == 0x00 {
                    let name = String::from_utf8_lossy(&current).into_owned();
                    offset_file_name.insert(offset, name);
                    current.clear();
                    offset = i + 1;
                } else {
                    current.push(byte[0]);
                }
                i += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(offset_file_name)
}

/// Record shape for `Index1`'s first block: a 24-bit index plus a flag
/// byte, identical in layout to [`crate::records::Block1Record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Index1Block1Record {
    /// 24-bit index value.
    pub index: u32,
    /// Flag byte.
    pub flag: u8,
}

/// Record shape for `Index1`'s second block: an opaque byte run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index1Block2Record {
    /// Opaque payload, preserved verbatim.
    pub field1: Vec<u8>,
}

/// Record shape for `Index1`'s third block: a bare id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Index1Block3Record {
    /// Record id.
    pub id: u32,
}

/// First ZOSFT sub-index. Parsed structurally; never joined against
/// anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index1 {
    /// Sub-index id field, preserved verbatim.
    pub id: u16,
    /// Opaque field following the id.
    pub field2: u32,
    /// Declared record count for block 1.
    pub count1: u32,
    /// Declared record count for block 2.
    pub count2: u32,
    /// Declared record count for block 3.
    pub count3: u32,
    /// Decoded block 1 records.
    pub block1_records: Vec<Index1Block1Record>,
    /// Decoded block 2 records.
    pub block2_records: Vec<Index1Block2Record>,
    /// Decoded block 3 records.
    pub block3_records: Vec<Index1Block3Record>,
}

/// Record shape for `Index2`'s first block: a 24-bit index plus a flag
/// byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Index2Block1Record {
    /// 24-bit index value.
    pub index: u32,
    /// Flag byte.
    pub flag: u8,
}

/// Record shape for `Index2`'s second block: the id column joined
/// positionally against `Index2Block3Record::offset` in
/// [`Zosft::file_names_by_id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Index2Block2Record {
    /// Record id, matched against `Block2Record::id` in the owning
    /// manifest's `Index3`.
    pub id: u32,
}

/// Record shape for `Index2`'s third block: the offset column joined
/// against the filename blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index2Block3Record {
    /// Id, duplicated from the second block in the original format.
    pub id: u32,
    /// Offset into the filename blob naming this record's filename.
    pub offset: u32,
    /// Opaque trailing field, preserved verbatim.
    pub field3: Vec<u8>,
}

/// Second ZOSFT sub-index: the id/offset table this format exists for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index2 {
    /// Sub-index id field, preserved verbatim.
    pub id: u16,
    /// Opaque field following the id.
    pub field2: u32,
    /// Declared record count for block 1.
    pub count1: u32,
    /// Declared record count for block 2.
    pub count2: u32,
    /// Declared record count for block 3.
    pub count3: u32,
    /// Decoded block 1 records.
    pub block1_records: Vec<Index2Block1Record>,
    /// Decoded block 2 records, parallel to `block3_records`.
    pub block2_records: Vec<Index2Block2Record>,
    /// Decoded block 3 records, parallel to `block2_records`.
    pub block3_records: Vec<Index2Block3Record>,
}

/// Record shape for `Index3`'s first block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Index3Block1Record {
    /// Opaque field.
    pub field1: u32,
    /// Flag byte.
    pub flag: u8,
}

/// Record shape for `Index3`'s second block: an opaque byte run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index3Block2Record {
    /// Opaque payload, preserved verbatim.
    pub field1: Vec<u8>,
}

/// Record shape for `Index3`'s third block: an opaque byte run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index3Block3Record {
    /// Opaque payload, preserved verbatim.
    pub field1: Vec<u8>,
}

/// Third ZOSFT sub-index. Parsed structurally; never joined against
/// anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index3 {
    /// Sub-index id field, preserved verbatim.
    pub id: u16,
    /// Opaque field following the id.
    pub field2: u32,
    /// Declared record count for block 1.
    pub count1: u32,
    /// Declared record count for block 2.
    pub count2: u32,
    /// Declared record count for block 3.
    pub count3: u32,
    /// Decoded block 1 records.
    pub block1_records: Vec<Index3Block1Record>,
    /// Decoded block 2 records.
    pub block2_records: Vec<Index3Block2Record>,
    /// Decoded block 3 records.
    pub block3_records: Vec<Index3Block3Record>,
}

/// Read one of `Index{1,2,3}`'s three component blocks, little-endian
/// framed. The original omits the size/compressed pair entirely when the
/// declared count is zero, so this does too.
fn read_optional_block<R: Read, T>(
    r: &mut R,
    count: u32,
    decode: impl Fn(&[u8]) -> T,
) -> ArchiveResult<Vec<T>> {
    if count == 0 {
        return Ok(Vec::new());
    }

    let uncompressed_size = r.read_u32le()?;
    let compressed_size = r.read_u32le()?;
    let inflated = inflate_framed(r, compressed_size, uncompressed_size)?;
    if inflated.len() != uncompressed_size as usize {
        return Err(ArchiveError::TruncatedBlock {
            declared: uncompressed_size,
            actual: inflated.len(),
        });
    }

    let record_size = uncompressed_size as usize / count as usize;
    let mut out = Vec::with_capacity(count as usize);
    for i in 0..count as usize {
        let start = i * record_size;
        out.push(decode(&inflated[start..start + record_size]));
    }
    Ok(out)
}

fn parse_index1<R: Read>(r: &mut R) -> ArchiveResult<Index1> {
    let id = r.read_u16le()?;
    let field2 = r.read_u32le()?;
    let count1 = r.read_u32le()?;
    let count2 = r.read_u32le()?;
    let count3 = r.read_u32le()?;

    let block1_records = read_optional_block(r, count1, |raw| Index1Block1Record {
        index: u32::from_le_bytes(raw.try_into().unwrap()) & 0x00ff_ffff,
        flag: raw[3],
    })?;
    let block2_records = read_optional_block(r, count2, |raw| Index1Block2Record {
        field1: raw.to_vec(),
    })?;
    let block3_records = read_optional_block(r, count3, |raw| Index1Block3Record {
        id: u32::from_le_bytes(raw.try_into().unwrap()),
    })?;

    Ok(Index1 {
        id,
        field2,
        count1,
        count2,
        count3,
        block1_records,
        block2_records,
        block3_records,
    })
}

fn parse_index2<R: Read>(r: &mut R) -> ArchiveResult<Index2> {
    let id = r.read_u16le()?;
    let field2 = r.read_u32le()?;
    let count1 = r.read_u32le()?;
    let count2 = r.read_u32le()?;
    let count3 = r.read_u32le()?;

    let block1_records = read_optional_block(r, count1, |raw| Index2Block1Record {
        index: u32::from_le_bytes(raw.try_into().unwrap()) & 0x00ff_ffff,
        flag: raw[3],
    })?;
    let block2_records = read_optional_block(r, count2, |raw| Index2Block2Record {
        id: u32::from_le_bytes(raw.try_into().unwrap()),
    })?;
    let block3_records = read_optional_block(r, count3, |raw| Index2Block3Record {
        id: u32::from_le_bytes(raw[0..4].try_into().unwrap()),
        offset: u32::from_le_bytes(raw[4..8].try_into().unwrap()),
        field3: raw[8..16].to_vec(),
    })?;

    Ok(Index2 {
        id,
        field2,
        count1,
        count2,
        count3,
        block1_records,
        block2_records,
        block3_records,
    })
}

fn parse_index3<R: Read>(r: &mut R) -> ArchiveResult<Index3> {
    let id = r.read_u16le()?;
    let field2 = r.read_u32le()?;
    let count1 = r.read_u32le()?;
    let count2 = r.read_u32le()?;
    let count3 = r.read_u32le()?;

    let block1_records = read_optional_block(r, count1, |raw| Index3Block1Record {
        field1: u32::from_le_bytes(raw.try_into().unwrap()) & 0x00ff_ffff,
        flag: raw[3],
    })?;
    let block2_records = read_optional_block(r, count2, |raw| Index3Block2Record {
        field1: raw.to_vec(),
    })?;
    let block3_records = read_optional_block(r, count3, |raw| Index3Block3Record {
        field1: raw.to_vec(),
    })?;

    Ok(Index3 {
        id,
        field2,
        count1,
        count2,
        count3,
        block1_records,
        block2_records,
        block3_records,
    })
}
