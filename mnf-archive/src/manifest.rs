//! `.mnf` manifest parsing.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use mnf_format::ByteReader;
use tracing::debug;

use crate::archive::ArchiveFile;
use crate::error::{ArchiveError, ArchiveResult};
use crate::records::{
    Block1Record, Block2Record, Block3Record, Index0Block, Index3, ZOSFT_DEPOT_ID, ZOSFT_GAME_ID,
};
use crate::zlib_block::inflate_framed;
use crate::zosft::Zosft;

const SIGNATURE: &[u8] = b"MES2";
const SUPPORTED_VERSION: u16 = 3;

/// A parsed manifest, its sibling archive handles, and the optional
/// opaque index-0 block.
#[derive(Debug)]
pub struct Mnf {
    /// Path the manifest was opened from.
    pub path: PathBuf,
    /// Archive handles keyed by their position in `archive_ids`, matching
    /// `Block3Record::archive_index`.
    pub archives: HashMap<u16, ArchiveFile>,

    /// Manifest format version; always 3 for a successfully parsed manifest.
    pub version: u16,
    /// Per-archive-slot archive id, used to name each sibling `.dat` file.
    pub archive_ids: HashMap<u16, u16>,
    /// Opaque field following the archive id table.
    pub field5: u32,
    /// Declared total data size, preserved verbatim and otherwise unused.
    pub data_size: u32,
    /// Opaque index-0 block, present in some manifests.
    pub index0: Option<Index0Block>,
    /// Record tables from index id 3.
    pub index3: Option<Index3>,
}

impl Mnf {
    /// Open and fully parse the manifest at `path`, opening every sibling
    /// archive file it names.
    pub fn open(path: impl AsRef<Path>) -> ArchiveResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = std::fs::File::open(&path)?;
        let mut r = BufReader::with_capacity(1024 * 1024, file);

        r.expect_signature(SIGNATURE)?;

        let version = r.read_u16le()?;
        if version != SUPPORTED_VERSION {
            return Err(ArchiveError::UnsupportedVersion(version));
        }

        let archive_count = r.read_u16le()?;
        let mut archive_ids = HashMap::with_capacity(archive_count as usize);
        for slot in 0..archive_count {
            archive_ids.insert(slot, r.read_u16le()?);
        }

        let stem = file_stem_lossy(&path);
        let mut archives = HashMap::with_capacity(archive_ids.len());
        for (&slot, &archive_id) in &archive_ids {
            let archive_path = path
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(format!("{stem}{archive_id:04}.dat"));
            debug!(?archive_path, slot, "opening sibling archive");
            archives.insert(slot, ArchiveFile::open(&archive_path)?);
        }

        let field5 = r.read_u32le()?;
        let data_size = r.read_u32le()?;

        let mut index_id = r.read_u16be()?;

        let mut index0 = None;
        if index_id == 0 {
            let field1: [u8; 2] = r.read_bytes(2)?.try_into().unwrap();
            let block1 = r.read_u32be_prefixed_bytes()?;
            let block2 = r.read_u32be_prefixed_bytes()?;
            index0 = Some(Index0Block {
                field1,
                block1,
                block2,
            });

            index_id = r.read_u16be()?;
        }

        let index3 = if index_id == 3 {
            Some(parse_index3(&mut r)?)
        } else {
            return Err(ArchiveError::UnknownIndexId(index_id));
        };

        Ok(Self {
            path,
            archives,
            version,
            archive_ids,
            field5,
            data_size,
            index0,
            index3,
        })
    }

    /// Decompress and post-process `record`'s payload through its owning
    /// archive, applying the embedded-header strip.
    pub fn read(
        &self,
        record: &Block3Record,
        oodle: &dyn crate::archive::OodleDecompressor,
    ) -> ArchiveResult<Vec<u8>> {
        let archive = self.archive_for(record)?;
        if !archive.is_valid(record) {
            return Err(ArchiveError::RecordOutOfRange {
                offset: record.offset,
                compressed_size: record.compressed_size,
                archive_size: archive.size(),
            });
        }
        archive.read(record, oodle)
    }

    /// Read `record`'s payload as stored, without decompression.
    pub fn read_raw(&self, record: &Block3Record) -> ArchiveResult<Vec<u8>> {
        let archive = self.archive_for(record)?;
        if !archive.is_valid(record) {
            return Err(ArchiveError::RecordOutOfRange {
                offset: record.offset,
                compressed_size: record.compressed_size,
                archive_size: archive.size(),
            });
        }
        archive.read_raw(record)
    }

    fn archive_for(&self, record: &Block3Record) -> ArchiveResult<&ArchiveFile> {
        self.archives
            .get(&record.archive_index)
            .ok_or(ArchiveError::ArchiveNotFound(record.archive_index))
    }

    /// Locate and parse the ZOSFT sidecar named by the well-known sentinel
    /// `Block2Record::id`, if this manifest has one.
    pub fn get_zosft(
        &self,
        oodle: &dyn crate::archive::OodleDecompressor,
    ) -> ArchiveResult<Option<Zosft>> {
        let Some(index3) = &self.index3 else {
            return Ok(None);
        };

        let sentinel = if self.is_depot() {
            ZOSFT_DEPOT_ID
        } else if self.is_game() {
            ZOSFT_GAME_ID
        } else {
            return Ok(None);
        };

        let Some(slot) = index3.block2_records.iter().position(|r| r.id == sentinel) else {
            return Ok(None);
        };
        let record = &index3.block3_records[slot];

        let data = self.read(record, oodle)?;
        let zosft = Zosft::parse(&mut data.as_slice())?;
        Ok(Some(zosft))
    }

    /// Whether this manifest is the depot manifest (`eso.mnf`), by
    /// basename alone.
    #[must_use]
    pub fn is_depot(&self) -> bool {
        self.path.file_name() == Some(OsStr::new("eso.mnf"))
    }

    /// Whether this manifest is the game manifest (`game.mnf`), by
    /// basename alone.
    #[must_use]
    pub fn is_game(&self) -> bool {
        self.path.file_name() == Some(OsStr::new("game.mnf"))
    }
}

fn file_stem_lossy(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn parse_index3<R: Read>(r: &mut R) -> ArchiveResult<Index3> {
    let field1: [u8; 4] = r.read_bytes(4)?.try_into().unwrap();
    let count1 = r.read_u32be()?;
    let count2 = r.read_u32be()?;
    let count3 = r.read_u32be()?;

    let block1_records = read_block(
        r,
        Block1Record::WIRE_SIZE,
        |raw| Block1Record::decode(raw.try_into().unwrap()),
    )?;

    let block2_records = read_block(
        r,
        Block2Record::WIRE_SIZE,
        |raw| Block2Record::decode(raw.try_into().unwrap()),
    )?;

    let block3_records = read_block(
        r,
        Block3Record::WIRE_SIZE,
        |raw| Block3Record::decode(raw.try_into().unwrap()),
    )?;

    if block2_records.len() != block3_records.len() {
        return Err(ArchiveError::ParallelArrayMismatch {
            block2: block2_records.len(),
            block3: block3_records.len(),
        });
    }

    Ok(Index3 {
        field1,
        count1,
        count2,
        count3,
        block1_records,
        block2_records,
        block3_records,
    })
}

fn read_block<R: Read, T>(
    r: &mut R,
    record_size: usize,
    decode: impl Fn(&[u8]) -> T,
) -> ArchiveResult<Vec<T>> {
    let uncompressed_size = r.read_u32be()?;
    let compressed_size = r.read_u32be()?;

    let inflated = inflate_framed(r, compressed_size, uncompressed_size)?;
    if inflated.len() != uncompressed_size as usize {
        return Err(ArchiveError::TruncatedBlock {
            declared: uncompressed_size,
            actual: inflated.len(),
        });
    }

    let count = uncompressed_size as usize / record_size;
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let start = i * record_size;
        out.push(decode(&inflated[start..start + record_size]));
    }
    Ok(out)
}
