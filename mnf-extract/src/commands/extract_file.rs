//! `extractFile` — extract one entry matching a raw id, grounded on
//! `original_source/cmd/mnf-extracter/extractFile/command.go`.

use std::path::Path;
use std::sync::mpsc::sync_channel;

use mnf_archive::{Mnf, OodleDecompressor};

use crate::error::{ExtractError, ExtractResult};
use crate::pipeline::combine_records;
use crate::record::ExtractRecord;

/// Parsed form of `extractFile --id`, matching
/// `(?i)^(0x)?([0-9a-f]{8})-([0-9a-f]{8})`: an 8-hex-digit id followed by
/// an 8-hex-digit `field2 ++ flags` group.
struct RawId {
    id: u32,
    field2: [u8; 2],
    flags: [u8; 2],
}

fn parse_raw_id(input: &str) -> ExtractResult<RawId> {
    let rest = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);

    let bytes = rest.as_bytes();
    let invalid = || ExtractError::InvalidRawId(input.to_string());

    if bytes.len() < 17 || bytes[8] != b'-' {
        return Err(invalid());
    }

    let id_hex = &rest[0..8];
    let group_hex = &rest[9..17];
    if !id_hex.bytes().all(|b| b.is_ascii_hexdigit())
        || !group_hex.bytes().all(|b| b.is_ascii_hexdigit())
    {
        return Err(invalid());
    }

    let id = u32::from_str_radix(id_hex, 16).map_err(|_| invalid())?;
    let field2_hi = u8::from_str_radix(&group_hex[0..2], 16).map_err(|_| invalid())?;
    let field2_lo = u8::from_str_radix(&group_hex[2..4], 16).map_err(|_| invalid())?;
    let flags_hi = u8::from_str_radix(&group_hex[4..6], 16).map_err(|_| invalid())?;
    let flags_lo = u8::from_str_radix(&group_hex[6..8], 16).map_err(|_| invalid())?;

    Ok(RawId {
        id,
        field2: [field2_hi, field2_lo],
        flags: [flags_hi, flags_lo],
    })
}

/// Scan `input`'s retained entries for the one matching `raw_id` and write
/// it under `output_dir`, both at its archive-indexed raw path and, when a
/// ZOSFT filename was resolved, its domain filename path.
pub fn extract_file(
    input: &Path,
    output_dir: &Path,
    raw_id: &str,
    oodle: &dyn OodleDecompressor,
) -> ExtractResult<()> {
    let wanted = parse_raw_id(raw_id)?;
    let mnf = Mnf::open(input)?;
    let mnf_ref = &mnf;

    let (tx, rx) = sync_channel(100);
    let found: Option<ExtractRecord> = std::thread::scope(|scope| {
        // `tx` moves fully into the producer closure so it drops as soon as
        // `combine_records` returns.
        scope.spawn(move || combine_records(mnf_ref, oodle, &tx));
        // `into_iter()` takes ownership of `rx`, so this closure's early
        // `find` match drops the receiver immediately instead of leaving it
        // alive (and the producer possibly blocked on a full channel) until
        // the enclosing function returns.
        rx.into_iter().find(|record| {
            record.block2.id == wanted.id
                && record.block2.field2 == wanted.field2
                && record.block2.flags == wanted.flags
        })
    });

    let Some(record) = found else {
        return Err(ExtractError::RawIdNotFound(raw_id.to_string()));
    };

    let data = mnf.read(&record.block3, oodle)?;
    let ext = mnf_format::sniff_extension(&data);

    let raw_path = output_dir
        .join(format!("{:03}", record.block3.archive_index))
        .join(record.raw_filename(ext));
    if let Some(parent) = raw_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&raw_path, &data)?;

    if let Some(filename) = &record.filename {
        let named_path = output_dir.join(filename);
        if let Some(parent) = named_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&named_path, &data)?;
    }

    Ok(())
}
