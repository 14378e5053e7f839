//! `dumpMnf` — unconditional CSV dump of every `(Block2Record, Block3Record)`
//! pair, grounded on `original_source/cmd/mnf-extracter/dumpMnf/command.go`.
//! No depot-skip filter, no archive validity check: this is a raw index
//! listing.

use std::path::Path;

use mnf_archive::Mnf;

use crate::error::ExtractResult;
use crate::record::bytes_format;

/// Parse the manifest at `input` and write one CSV row per index entry to
/// `output`, in original file order.
pub fn dump_mnf(input: &Path, output: &Path) -> ExtractResult<()> {
    let mnf = Mnf::open(input)?;
    let index3 = mnf
        .index3
        .as_ref()
        .expect("Mnf::open guarantees index3 is present");

    let mut writer = csv::Writer::from_path(output)?;
    writer.write_record([
        "Index",
        "",
        "Id",
        "Field2",
        "Flags",
        "",
        "UncompressedSize",
        "CompressedSize",
        "Hash",
        "Offset",
        "ArchiveIndex",
        "CompressionType",
    ])?;

    for (i, (block2, block3)) in index3
        .block2_records
        .iter()
        .zip(index3.block3_records.iter())
        .enumerate()
    {
        writer.write_record([
            i.to_string(),
            String::new(),
            block2.id.to_string(),
            bytes_format(&block2.field2),
            bytes_format(&block2.flags),
            String::new(),
            block3.uncompressed_size.to_string(),
            block3.compressed_size.to_string(),
            format!("0x{:08x}", block3.hash),
            block3.offset.to_string(),
            block3.archive_index.to_string(),
            block3.compression_type.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::test_support::*;

    #[test]
    fn dump_mnf_writes_one_row_per_entry_with_no_filtering() {
        let dir = tempfile::tempdir().unwrap();
        let mnf_path = ManifestFixture::new()
            .entry(FixtureEntry::skip_prelude())
            .entry(FixtureEntry::retained(0, [0, 0], b"payload"))
            .write(dir.path(), "eso.mnf");

        let output = dir.path().join("dump.csv");
        dump_mnf(&mnf_path, &output).unwrap();

        let text = std::fs::read_to_string(&output).unwrap();
        // header + both entries, including the depot-skip prelude entry.
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("Index,"));
    }
}
