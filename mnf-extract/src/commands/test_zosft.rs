//! `testZosft` — scan a manifest's retained entries and report the first
//! one whose payload parses as a ZOSFT sidecar, grounded on
//! `original_source/cmd/mnf-extracter/testZosft/command.go`.

use std::path::Path;

use mnf_archive::{Mnf, OodleDecompressor, Zosft};
use std::sync::mpsc::sync_channel;

use crate::error::ExtractResult;
use crate::pipeline::combine_records;

/// The first retained entry (by `Block2Record::id`) whose payload parses
/// as ZOSFT, if any were found before the manifest was exhausted.
pub fn test_zosft(input: &Path, oodle: &dyn OodleDecompressor) -> ExtractResult<Option<u32>> {
    let mnf = Mnf::open(input)?;
    let mnf_ref = &mnf;

    let (tx, rx) = sync_channel(100);
    std::thread::scope(|scope| {
        // `tx` moves fully into the producer closure so it drops as soon as
        // `combine_records` returns.
        scope.spawn(move || combine_records(mnf_ref, oodle, &tx));

        // Iterating `rx` by value (not `rx.iter()`) makes this closure own
        // the receiver, so an early `return` below drops it immediately,
        // rather than leaving a stuck producer blocked on a full channel
        // that nothing drains until the enclosing function returns.
        for record in rx {
            let data = mnf_ref.read(&record.block3, oodle)?;
            if Zosft::parse(&mut data.as_slice()).is_ok() {
                return Ok(Some(record.block2.id));
            }
        }
        Ok(None)
    })
}
