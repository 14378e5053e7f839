//! Manifest (`.mnf`), archive (`.dat`) and ZOSFT filename sidecar parsing.

mod archive;
mod error;
mod manifest;
mod records;
mod zlib_block;
mod zosft;

pub use archive::{ArchiveFile, NullOodle, OodleDecompressor};
pub use error::{ArchiveError, ArchiveResult};
pub use manifest::Mnf;
pub use records::{
    Block1Record, Block2Record, Block3Record, Index0Block, Index3, ZOSFT_DEPOT_ID, ZOSFT_GAME_ID,
};
pub use zosft::{
    Index1 as ZosftIndex1, Index1Block1Record as ZosftIndex1Block1Record,
    Index1Block2Record as ZosftIndex1Block2Record, Index1Block3Record as ZosftIndex1Block3Record,
    Index2 as ZosftIndex2, Index2Block1Record as ZosftIndex2Block1Record,
    Index2Block2Record as ZosftIndex2Block2Record, Index2Block3Record as ZosftIndex2Block3Record,
    Index3 as ZosftIndex3, Index3Block1Record as ZosftIndex3Block1Record,
    Index3Block2Record as ZosftIndex3Block2Record, Index3Block3Record as ZosftIndex3Block3Record,
    Zosft,
};

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write as _;

    fn zlib_block(records: &[u8]) -> Vec<u8> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(records).unwrap();
        encoder.finish().unwrap()
    }

    /// Build a single-archive manifest with one Block3Record pointing at
    /// a tiny uncompressed payload in the sibling `.dat` file, mirroring
    /// `original_source/mnf/mnf.go`'s byte layout end to end.
    fn write_sample_manifest(dir: &std::path::Path, mnf_name: &str) -> std::path::PathBuf {
        let mnf_path = dir.join(mnf_name);
        let stem = mnf_path.file_stem().unwrap().to_str().unwrap().to_string();

        let mut mnf_bytes = Vec::new();
        mnf_bytes.extend_from_slice(b"MES2");
        mnf_bytes.extend_from_slice(&3u16.to_le_bytes()); // version
        mnf_bytes.extend_from_slice(&1u16.to_le_bytes()); // archive count
        mnf_bytes.extend_from_slice(&0u16.to_le_bytes()); // archive id for slot 0
        mnf_bytes.extend_from_slice(&0u32.to_le_bytes()); // field5
        mnf_bytes.extend_from_slice(&0u32.to_le_bytes()); // data size

        // indexId 3 directly, no index0 block.
        mnf_bytes.extend_from_slice(&3u16.to_be_bytes());
        mnf_bytes.extend_from_slice(&[0u8; 4]); // field1
        mnf_bytes.extend_from_slice(&0u32.to_be_bytes()); // count1
        mnf_bytes.extend_from_slice(&1u32.to_be_bytes()); // count2
        mnf_bytes.extend_from_slice(&1u32.to_be_bytes()); // count3

        // block1: empty.
        let block1_compressed = zlib_block(&[]);
        mnf_bytes.extend_from_slice(&0u32.to_be_bytes());
        mnf_bytes.extend_from_slice(&(block1_compressed.len() as u32).to_be_bytes());
        mnf_bytes.extend_from_slice(&block1_compressed);

        // block2: one record, id=7.
        let mut block2_raw = Vec::new();
        block2_raw.extend_from_slice(&7u32.to_le_bytes());
        block2_raw.extend_from_slice(&[0u8; 2]);
        block2_raw.extend_from_slice(&[0u8; 2]);
        let block2_compressed = zlib_block(&block2_raw);
        mnf_bytes.extend_from_slice(&(block2_raw.len() as u32).to_be_bytes());
        mnf_bytes.extend_from_slice(&(block2_compressed.len() as u32).to_be_bytes());
        mnf_bytes.extend_from_slice(&block2_compressed);

        // block3: one record pointing at offset 0, 11 uncompressed bytes,
        // stored uncompressed, in archive slot 0.
        let payload = b"hello-world";
        let mut block3_raw = Vec::new();
        block3_raw.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        block3_raw.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        block3_raw.extend_from_slice(&0u32.to_le_bytes()); // hash
        block3_raw.extend_from_slice(&0u32.to_le_bytes()); // offset
        block3_raw.extend_from_slice(&0u16.to_le_bytes()); // archive index
        block3_raw.extend_from_slice(&0u16.to_le_bytes()); // compression type
        let block3_compressed = zlib_block(&block3_raw);
        mnf_bytes.extend_from_slice(&(block3_raw.len() as u32).to_be_bytes());
        mnf_bytes.extend_from_slice(&(block3_compressed.len() as u32).to_be_bytes());
        mnf_bytes.extend_from_slice(&block3_compressed);

        std::fs::write(&mnf_path, &mnf_bytes).unwrap();
        std::fs::write(dir.join(format!("{stem}0000.dat")), payload).unwrap();

        mnf_path
    }

    #[test]
    fn opens_manifest_and_reads_payload_through_archive() {
        let dir = tempfile::tempdir().unwrap();
        let mnf_path = write_sample_manifest(dir.path(), "test.mnf");

        let mnf = Mnf::open(&mnf_path).unwrap();
        assert_eq!(mnf.version, 3);
        let index3 = mnf.index3.as_ref().unwrap();
        assert_eq!(index3.block2_records.len(), 1);
        assert_eq!(index3.block3_records.len(), 1);

        let data = mnf.read(&index3.block3_records[0], &NullOodle).unwrap();
        assert_eq!(data, b"hello-world");
    }

    #[test]
    fn depot_and_game_role_detection_is_by_basename_only() {
        let dir = tempfile::tempdir().unwrap();
        let depot_path = write_sample_manifest(dir.path(), "eso.mnf");
        let depot = Mnf::open(&depot_path).unwrap();
        assert!(depot.is_depot());
        assert!(!depot.is_game());

        let game_path = write_sample_manifest(dir.path(), "game.mnf");
        let game = Mnf::open(&game_path).unwrap();
        assert!(game.is_game());
        assert!(!game.is_depot());
    }

    #[test]
    fn parallel_array_mismatch_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mnf_path = dir.path().join("broken.mnf");

        let mut mnf_bytes = Vec::new();
        mnf_bytes.extend_from_slice(b"MES2");
        mnf_bytes.extend_from_slice(&3u16.to_le_bytes());
        mnf_bytes.extend_from_slice(&0u16.to_le_bytes()); // zero archives
        mnf_bytes.extend_from_slice(&0u32.to_le_bytes());
        mnf_bytes.extend_from_slice(&0u32.to_le_bytes());

        mnf_bytes.extend_from_slice(&3u16.to_be_bytes());
        mnf_bytes.extend_from_slice(&[0u8; 4]);
        mnf_bytes.extend_from_slice(&0u32.to_be_bytes());
        mnf_bytes.extend_from_slice(&1u32.to_be_bytes()); // count2 = 1
        mnf_bytes.extend_from_slice(&0u32.to_be_bytes()); // count3 = 0 (mismatch)

        let block1_compressed = zlib_block(&[]);
        mnf_bytes.extend_from_slice(&0u32.to_be_bytes());
        mnf_bytes.extend_from_slice(&(block1_compressed.len() as u32).to_be_bytes());
        mnf_bytes.extend_from_slice(&block1_compressed);

        let mut block2_raw = Vec::new();
        block2_raw.extend_from_slice(&1u32.to_le_bytes());
        block2_raw.extend_from_slice(&[0u8; 4]);
        let block2_compressed = zlib_block(&block2_raw);
        mnf_bytes.extend_from_slice(&(block2_raw.len() as u32).to_be_bytes());
        mnf_bytes.extend_from_slice(&(block2_compressed.len() as u32).to_be_bytes());
        mnf_bytes.extend_from_slice(&block2_compressed);

        let block3_compressed = zlib_block(&[]);
        mnf_bytes.extend_from_slice(&0u32.to_be_bytes());
        mnf_bytes.extend_from_slice(&(block3_compressed.len() as u32).to_be_bytes());
        mnf_bytes.extend_from_slice(&block3_compressed);

        std::fs::write(&mnf_path, &mnf_bytes).unwrap();

        let err = Mnf::open(&mnf_path).unwrap_err();
        assert!(matches!(
            err,
            ArchiveError::ParallelArrayMismatch {
                block2: 1,
                block3: 0
            }
        ));
    }
}
