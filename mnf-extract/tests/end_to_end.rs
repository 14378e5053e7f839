//! Cross-module scenarios from the toolchain's own testable-properties list,
//! driven through `mnf-extract`'s commands rather than a single crate's
//! unit tests.

use mnf_archive::NullOodle;
use pretty_assertions::assert_eq;

// `mnf_extract::test_support` is `#[cfg(test)] pub(crate)`, so it only
// exists in the library build that compiles the crate's own unit tests;
// an integration test under `tests/` links against the library built
// without `--cfg test`, where the module isn't there to import. Sharing
// the fixture builder here means textually including it, same as before.
include!("../src/test_support.rs");

#[test]
fn depot_skip_then_retained_entry_extracts_only_the_retained_one() {
    let dir = tempfile::tempdir().unwrap();
    let mut payload = b"DDS".to_vec();
    payload.extend_from_slice(&[0u8; 5]);

    let mnf_path = ManifestFixture::new()
        .entry(FixtureEntry::skip_prelude())
        .entry(FixtureEntry::retained(1, [0, 0], &payload))
        .write(dir.path(), "eso.mnf");

    let output = dir.path().join("out");
    let options = mnf_extract::ExtractAllOptions {
        threads: 2,
        hash_sum_file: None,
        convert_dds_to: None,
    };

    struct NoConverter;
    impl mnf_extract::TextureConverter for NoConverter {
        fn convert(&self, _: &std::path::Path, _: &str) -> mnf_extract::ExtractResult<()> {
            unreachable!("no .dds conversion requested in this scenario")
        }
    }

    let stats = mnf_extract::extract_all(&mnf_path, &output, &options, &NullOodle, &NoConverter).unwrap();
    assert_eq!(stats.processed, 1);

    let mut written = Vec::new();
    for entry in walkdir::WalkDir::new(&output) {
        let entry = entry.unwrap();
        if entry.file_type().is_file() {
            written.push(entry.path().strip_prefix(&output).unwrap().to_path_buf());
        }
    }
    assert_eq!(written.len(), 1);
    assert_eq!(
        written[0],
        std::path::Path::new("001").join("0x00000001-00000000.dds")
    );
}

/// Hand-builds a manifest with one record whose `offset + compressed_size`
/// exceeds its archive's actual size, mirroring the low-level byte
/// construction `mnf-archive`'s own crate tests use, since the shared
/// fixture builder always derives a record's size from the payload it
/// writes and so can never produce an out-of-bounds record on its own.
fn write_manifest_with_invalid_trailing_record(dir: &std::path::Path) -> std::path::PathBuf {
    fn zlib_block(data: &[u8]) -> Vec<u8> {
        use std::io::Write as _;
        let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }
    fn push_be(out: &mut Vec<u8>, raw: &[u8]) {
        let compressed = zlib_block(raw);
        out.extend_from_slice(&(raw.len() as u32).to_be_bytes());
        out.extend_from_slice(&(compressed.len() as u32).to_be_bytes());
        out.extend_from_slice(&compressed);
    }

    let mnf_path = dir.join("game.mnf");
    let payload = b"good payload";

    let mut block2_raw = Vec::new();
    let mut block3_raw = Vec::new();

    // Record 0: valid, fits inside the archive.
    block2_raw.extend_from_slice(&0u32.to_le_bytes());
    block2_raw.extend_from_slice(&[0u8; 4]);
    block3_raw.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    block3_raw.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    block3_raw.extend_from_slice(&0u32.to_le_bytes());
    block3_raw.extend_from_slice(&0u32.to_le_bytes()); // offset
    block3_raw.extend_from_slice(&0u16.to_le_bytes());
    block3_raw.extend_from_slice(&0u16.to_le_bytes());

    // Record 1: claims to start past the end of the archive.
    block2_raw.extend_from_slice(&1u32.to_le_bytes());
    block2_raw.extend_from_slice(&[0u8; 4]);
    block3_raw.extend_from_slice(&4u32.to_le_bytes());
    block3_raw.extend_from_slice(&4u32.to_le_bytes());
    block3_raw.extend_from_slice(&0u32.to_le_bytes());
    block3_raw.extend_from_slice(&(payload.len() as u32 + 100).to_le_bytes()); // offset, out of bounds
    block3_raw.extend_from_slice(&0u16.to_le_bytes());
    block3_raw.extend_from_slice(&0u16.to_le_bytes());

    let mut mnf_bytes = Vec::new();
    mnf_bytes.extend_from_slice(b"MES2");
    mnf_bytes.extend_from_slice(&3u16.to_le_bytes());
    mnf_bytes.extend_from_slice(&1u16.to_le_bytes());
    mnf_bytes.extend_from_slice(&0u16.to_le_bytes());
    mnf_bytes.extend_from_slice(&0u32.to_le_bytes());
    mnf_bytes.extend_from_slice(&0u32.to_le_bytes());

    mnf_bytes.extend_from_slice(&3u16.to_be_bytes());
    mnf_bytes.extend_from_slice(&[0u8; 4]);
    mnf_bytes.extend_from_slice(&0u32.to_be_bytes());
    mnf_bytes.extend_from_slice(&2u32.to_be_bytes());
    mnf_bytes.extend_from_slice(&2u32.to_be_bytes());

    push_be(&mut mnf_bytes, &[]);
    push_be(&mut mnf_bytes, &block2_raw);
    push_be(&mut mnf_bytes, &block3_raw);

    std::fs::write(&mnf_path, &mnf_bytes).unwrap();
    std::fs::write(dir.join("game0000.dat"), payload).unwrap();

    mnf_path
}

#[test]
fn validity_filter_silently_drops_out_of_bounds_record_but_keeps_the_valid_one() {
    let dir = tempfile::tempdir().unwrap();
    let mnf_path = write_manifest_with_invalid_trailing_record(dir.path());

    let output = dir.path().join("index.csv");
    mnf_extract::dump_index(&mnf_path, &output, &NullOodle).unwrap();

    let text = std::fs::read_to_string(&output).unwrap();
    let rows: Vec<&str> = text.lines().skip(1).collect();
    assert_eq!(rows.len(), 1, "only the in-bounds record should be emitted");
    assert!(rows[0].contains("0x00000000"));
}

#[test]
fn lang_csv_round_trip_preserves_every_record_across_two_domains() {
    let dir = tempfile::tempdir().unwrap();
    let records = vec![
        mnf_lang::LangRecord { domain_id: 1, variant: 0, id: 5, offset: 0, text: "alpha".to_string() },
        mnf_lang::LangRecord { domain_id: 1, variant: 1, id: 6, offset: 0, text: "beta".to_string() },
        mnf_lang::LangRecord { domain_id: 2, variant: 0, id: 1, offset: 0, text: "gamma".to_string() },
    ];
    let mut bytes = Vec::new();
    mnf_lang::write(&mut bytes, &records).unwrap();
    let lang_path = dir.path().join("client.lang");
    std::fs::write(&lang_path, &bytes).unwrap();

    let csv_dir = dir.path().join("csv");
    mnf_extract::parse_lng(&lang_path, &csv_dir).unwrap();

    let rebuilt_path = dir.path().join("rebuilt.lang");
    mnf_extract::write_lng(&csv_dir, &rebuilt_path).unwrap();

    let mut file = std::fs::File::open(&rebuilt_path).unwrap();
    let store = mnf_lang::LangStore::parse(&mut file).unwrap();

    assert_eq!(store.domain_ids(), vec![1, 2]);
    assert_eq!(store.ids(1), vec![5, 6]);
    assert_eq!(store.records(1, 5)[0].text, "alpha");
    assert_eq!(store.records(1, 6)[0].text, "beta");
    assert_eq!(store.records(2, 1)[0].text, "gamma");
}
