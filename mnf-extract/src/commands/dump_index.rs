//! `dumpIndex` — CSV of retained entries with resolved filenames and the
//! raw-filename form, grounded on
//! `original_source/cmd/mnf-extracter/dumpIndex/command.go`. Mirrors that
//! command's own behaviour of never reading archive payloads, so the raw
//! filename's extension is always the `"dat"` fallback.

use std::path::Path;
use std::sync::mpsc::sync_channel;

use mnf_archive::{Mnf, OodleDecompressor};

use crate::error::{ExtractError, ExtractResult};
use crate::pipeline::combine_records;

/// Write one CSV row per retained entry in `input` to `output`.
pub fn dump_index(input: &Path, output: &Path, oodle: &dyn OodleDecompressor) -> ExtractResult<()> {
    let mnf = Mnf::open(input)?;
    let mnf_ref = &mnf;

    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(output)?;
    writer.write_record(["rawName", "archive", "offset", "compType", "compSize", "uncompSize", "fileName"])?;

    let (tx, rx) = sync_channel(100);
    let result: ExtractResult<()> = std::thread::scope(|scope| {
        // `tx` moves fully into the producer closure so it drops as soon as
        // `combine_records` returns; iterating `rx` by value below makes
        // this closure own the receiver, so a `?`-propagated CSV write error
        // drops it immediately instead of leaving the producer blocked on a
        // full channel no one drains anymore.
        let producer = scope.spawn(move || combine_records(mnf_ref, oodle, &tx));
        for record in rx {
            writer.write_record([
                record.raw_filename("dat"),
                record.block3.archive_index.to_string(),
                record.block3.offset.to_string(),
                record.block3.compression_type.to_string(),
                record.block3.compressed_size.to_string(),
                record.block3.uncompressed_size.to_string(),
                record.filename.clone().unwrap_or_default(),
            ])?;
        }
        producer
            .join()
            .map_err(|_| ExtractError::Io(std::io::Error::other("producer thread panicked")))??;
        Ok(())
    });
    result?;

    writer.flush()?;
    Ok(())
}
