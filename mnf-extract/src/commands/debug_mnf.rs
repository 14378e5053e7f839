//! `debugMnf` — rich CSV dump including per-archive uniqueness of the
//! `(id, field2, flags)` tuple, grounded on
//! `original_source/cmd/mnf-extracter/debugMnf/command.go`. Deliberately does
//! not reuse [`crate::pipeline::combine_records`]: this command has no
//! depot-skip `continue` at all (only an archive-validity one), and consumes
//! a ZOSFT filename only once the depot prelude has been passed.

use std::collections::HashMap;
use std::path::Path;

use mnf_archive::{ArchiveError, Mnf, OodleDecompressor};

use crate::error::ExtractResult;
use crate::record::bytes_format;

fn tuple_key(id: u32, field2: [u8; 2], flags: [u8; 2]) -> String {
    format!("{id}-{}-{}-{}-{}", field2[0], field2[1], flags[0], flags[1])
}

/// Parse the manifest at `input` and write one CSV row per validity-passing
/// entry to `output`.
pub fn debug_mnf(input: &Path, output: &Path, oodle: &dyn OodleDecompressor) -> ExtractResult<()> {
    let mnf = Mnf::open(input)?;
    let index3 = mnf
        .index3
        .as_ref()
        .expect("Mnf::open guarantees index3 is present");

    let zosft = mnf.get_zosft(oodle)?;
    let mut file_names = zosft.map(|z| z.file_names_by_id()).unwrap_or_default();

    let mut writer = csv::Writer::from_path(output)?;
    writer.write_record([
        "Index", "", "Id", "ItemId", "Flags", "", "UncompressedSize", "CompressedSize", "Hash",
        "Offset", "NextOffset", "ArchiveIndex", "ArchiveBasedIndex", "UniqueId", "CompressionType",
        "", "Filename", "Ext", "Byte10",
    ])?;

    let mut unique_ids: HashMap<u16, HashMap<String, u64>> = HashMap::new();
    for (block2, block3) in index3.block2_records.iter().zip(index3.block3_records.iter()) {
        let key = tuple_key(block2.id, block2.field2, block2.flags);
        *unique_ids
            .entry(block3.archive_index)
            .or_default()
            .entry(key)
            .or_insert(0) += 1;
    }

    let mut archive_based_index: HashMap<u16, u64> = HashMap::new();
    let is_depot = mnf.is_depot();
    let mut skip = is_depot;

    for (i, (block2, block3)) in index3
        .block2_records
        .iter()
        .zip(index3.block3_records.iter())
        .enumerate()
    {
        if is_depot && skip && block3.archive_index != 0 {
            skip = false;
        }

        let Some(archive) = mnf.archives.get(&block3.archive_index) else {
            return Err(ArchiveError::ArchiveNotFound(block3.archive_index).into());
        };
        if !archive.is_valid(block3) {
            continue;
        }

        let mut filename = String::new();
        if block2.field2 == [0, 0] && !skip {
            if let Some(name) = file_names.remove(&block2.id) {
                filename = name;
            }
        }

        let data = mnf.read(block3, oodle)?;
        let byte10 = &data[..data.len().min(10)];
        let ext = mnf_format::sniff_extension(byte10);

        let counter = archive_based_index.entry(block3.archive_index).or_insert(0);
        *counter += 1;

        let key = tuple_key(block2.id, block2.field2, block2.flags);
        let unique = unique_ids
            .get(&block3.archive_index)
            .and_then(|m| m.get(&key))
            .copied()
            .unwrap_or(0)
            == 1;

        writer.write_record([
            (i + 1).to_string(),
            String::new(),
            block2.id.to_string(),
            bytes_format(&block2.field2),
            bytes_format(&block2.flags),
            String::new(),
            block3.uncompressed_size.to_string(),
            block3.compressed_size.to_string(),
            format!("0x{:08x}", block3.hash),
            block3.offset.to_string(),
            (u64::from(block3.offset) + u64::from(block3.compressed_size)).to_string(),
            block3.archive_index.to_string(),
            counter.to_string(),
            unique.to_string(),
            block3.compression_type.to_string(),
            String::new(),
            filename,
            ext.to_string(),
            bytes_format(byte10),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
