//! Fixed-size record shapes decoded out of `Index3`'s three inflated blocks.
//!
//! All three record kinds are little-endian on the wire regardless of the
//! big-endian block framing that surrounds them.

/// One entry of `Index3`'s first block: a 24-bit index packed into the low
/// bits of a little-endian `u32`, plus a flag byte in the top byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block1Record {
    /// 24-bit index value, masked out of the low 3 bytes.
    pub index: u32,
    /// Flag byte, the 4th (most significant) byte of the packed word.
    pub flag: u8,
}

impl Block1Record {
    pub(crate) const WIRE_SIZE: usize = 4;

    pub(crate) fn decode(raw: &[u8; Self::WIRE_SIZE]) -> Self {
        let word = u32::from_le_bytes(*raw);
        Self {
            index: word & 0x00ff_ffff,
            flag: raw[3],
        }
    }
}

/// One entry of `Index3`'s second block: an id plus two opaque 2-byte
/// fields whose meaning the upstream format never documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block2Record {
    /// Record id. Joined positionally against `Block3Records` and, for the
    /// well-known sentinel ids, against the ZOSFT-derived filename table.
    pub id: u32,
    /// Opaque field, preserved verbatim.
    pub field2: [u8; 2],
    /// Opaque flags, preserved verbatim.
    pub flags: [u8; 2],
}

impl Block2Record {
    pub(crate) const WIRE_SIZE: usize = 8;

    pub(crate) fn decode(raw: &[u8; Self::WIRE_SIZE]) -> Self {
        Self {
            id: u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]),
            field2: [raw[4], raw[5]],
            flags: [raw[6], raw[7]],
        }
    }
}

/// Sentinel `Block2Record::id` marking the ZOSFT sidecar entry in a depot
/// manifest (`eso.mnf`).
pub const ZOSFT_DEPOT_ID: u32 = 0x00ff_ffff;
/// Sentinel `Block2Record::id` marking the ZOSFT sidecar entry in a game
/// manifest (`game.mnf`).
pub const ZOSFT_GAME_ID: u32 = 0x0000_0000;

/// One entry of `Index3`'s third block: the payload location and codec
/// parameters needed to pull a file's bytes out of an archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block3Record {
    /// Size of the payload after decompression.
    pub uncompressed_size: u32,
    /// Size of the payload as stored in the archive.
    pub compressed_size: u32,
    /// Checksum-like field, preserved verbatim and never validated.
    pub hash: u32,
    /// Byte offset into the owning archive file.
    pub offset: u32,
    /// Index into `Mnf::archives` naming which archive file holds this
    /// payload.
    pub archive_index: u16,
    /// Codec used for the stored payload: 0 (none), 1 (zlib), 4 or 8
    /// (Oodle).
    pub compression_type: u16,
}

impl Block3Record {
    pub(crate) const WIRE_SIZE: usize = 20;

    pub(crate) fn decode(raw: &[u8; Self::WIRE_SIZE]) -> Self {
        Self {
            uncompressed_size: u32::from_le_bytes(raw[0..4].try_into().unwrap()),
            compressed_size: u32::from_le_bytes(raw[4..8].try_into().unwrap()),
            hash: u32::from_le_bytes(raw[8..12].try_into().unwrap()),
            offset: u32::from_le_bytes(raw[12..16].try_into().unwrap()),
            archive_index: u16::from_le_bytes(raw[16..18].try_into().unwrap()),
            compression_type: u16::from_le_bytes(raw[18..20].try_into().unwrap()),
        }
    }
}

/// The opaque index-0 block, present in some manifests ahead of `Index3`.
///
/// Neither field is interpreted; both are kept verbatim so round-tripping
/// tools (`dumpMnf`) can report their sizes without needing to understand
/// their contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index0Block {
    /// Two-byte field preceding the two length-prefixed blocks.
    pub field1: [u8; 2],
    /// First opaque block.
    pub block1: Vec<u8>,
    /// Second opaque block.
    pub block2: Vec<u8>,
}

/// The record tables decoded out of manifest index id 3.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index3 {
    /// Four-byte field preceding the three counts, preserved verbatim.
    pub field1: [u8; 4],
    /// Declared record count for block 1.
    pub count1: u32,
    /// Declared record count for block 2.
    pub count2: u32,
    /// Declared record count for block 3.
    pub count3: u32,
    /// Decoded block 1 records.
    pub block1_records: Vec<Block1Record>,
    /// Decoded block 2 records, parallel to `block3_records`.
    pub block2_records: Vec<Block2Record>,
    /// Decoded block 3 records, parallel to `block2_records`.
    pub block3_records: Vec<Block3Record>,
}
