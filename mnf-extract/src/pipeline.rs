//! Record join/filter and bounded worker pool, grounded on
//! `original_source/extracter/extracter.go`'s `CombineRecords` and the
//! spinning `select`/`default` consumer loops seen across
//! `cmd/mnf-extracter/*/command.go`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{sync_channel, SyncSender};
use std::thread;

use mnf_archive::{ArchiveError, ArchiveResult, Mnf, OodleDecompressor};
use parking_lot::Mutex;

use crate::error::{ExtractError, ExtractResult};
use crate::record::ExtractRecord;

/// Capacity of the bounded channel between the producer and the worker
/// pool. The producer's `send` blocks once this many records are queued,
/// giving the backpressure the concurrency model requires.
const CHANNEL_CAPACITY: usize = 1000;

/// Minimum and maximum worker pool size; the default is 3.
pub const MIN_WORKERS: usize = 1;
/// See [`MIN_WORKERS`].
pub const MAX_WORKERS: usize = 5;
/// Default worker pool size when the caller has no preference.
pub const DEFAULT_WORKERS: usize = 3;

/// How many retained records a worker processes between progress log lines.
const PROGRESS_INTERVAL: u64 = 10_000;

/// Join `Index3`'s parallel arrays against the ZOSFT filename map and the
/// depot-skip/validity filters, sending each retained record to `tx`.
///
/// Order of operations per entry, preserved exactly from
/// `original_source/extracter/extracter.go`: the depot-skip check runs and
/// `continue`s *before* the archive lookup, validity check or filename
/// consumption are ever reached, so a record dropped by the skip never
/// consumes a filename. Stops early (without error) if the receiving end
/// of `tx` has been dropped.
pub fn combine_records(
    mnf: &Mnf,
    oodle: &dyn OodleDecompressor,
    tx: &SyncSender<ExtractRecord>,
) -> ArchiveResult<()> {
    let zosft = mnf.get_zosft(oodle)?;
    let mut file_names = zosft.map(|z| z.file_names_by_id()).unwrap_or_default();

    let index3 = mnf
        .index3
        .as_ref()
        .expect("Mnf::open guarantees index3 is present");

    let is_depot = mnf.is_depot();
    let mut skip = is_depot;

    for i in 0..index3.block2_records.len() {
        let block2 = index3.block2_records[i];
        let block3 = index3.block3_records[i];

        if is_depot && skip && block3.archive_index != 0 {
            skip = false;
        }

        if skip {
            continue;
        }

        let Some(archive) = mnf.archives.get(&block3.archive_index) else {
            return Err(ArchiveError::ArchiveNotFound(block3.archive_index));
        };

        if !archive.is_valid(&block3) {
            continue;
        }

        let mut filename = None;
        if block2.field2 == [0, 0] {
            if let Some(name) = file_names.remove(&block2.id) {
                filename = Some(name);
            }
        }

        let record = ExtractRecord {
            index: i,
            block2,
            block3,
            filename,
        };
        if tx.send(record).is_err() {
            break;
        }
    }

    Ok(())
}

/// Counters surfaced once a [`run`] call finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    /// Total retained records handed to a worker.
    pub processed: u64,
    /// Records whose task returned an error (logged, not fatal).
    pub failed: u64,
}

#[derive(Default)]
struct Counters {
    processed: AtomicU64,
    failed: AtomicU64,
}

/// Run [`combine_records`] on a producer thread and drain its output
/// through a fixed pool of `worker_count.clamp(1, 5)` worker threads, each
/// invoking `task` for every retained record.
///
/// A worker task's error is logged and counted; it never stops the pool.
/// A fatal error from `combine_records` itself (a missing archive index)
/// is surfaced once every worker has drained the channel.
pub fn run<F>(
    mnf: &Mnf,
    oodle: &(dyn OodleDecompressor + Sync),
    worker_count: usize,
    task: F,
) -> ExtractResult<ExtractStats>
where
    F: Fn(&ExtractRecord) -> ExtractResult<()> + Sync,
{
    let worker_count = worker_count.clamp(MIN_WORKERS, MAX_WORKERS);
    let (tx, rx) = sync_channel::<ExtractRecord>(CHANNEL_CAPACITY);
    let rx = Mutex::new(rx);
    let counters = Counters::default();

    let producer_outcome = thread::scope(|scope| {
        // `tx` moves into the producer closure so it drops there, as soon as
        // `combine_records` returns, rather than needing a separate `drop`
        // that would conflict with the borrow `scope.spawn` requires to
        // outlive this closure.
        let producer = scope.spawn(move || combine_records(mnf, oodle, &tx));

        let workers: Vec<_> = (0..worker_count)
            .map(|_| {
                scope.spawn(|| {
                    loop {
                        let received = rx.lock().recv();
                        let Ok(record) = received else { break };

                        let processed = counters.processed.fetch_add(1, Ordering::Relaxed) + 1;
                        if processed % PROGRESS_INTERVAL == 0 {
                            tracing::info!(processed, "extraction progress");
                        }

                        if let Err(e) = task(&record) {
                            tracing::warn!(error = %e, index = record.index, "worker task failed");
                            counters.failed.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                })
            })
            .collect();

        for worker in workers {
            let _ = worker.join();
        }

        producer.join()
    });

    match producer_outcome {
        Ok(Ok(())) => {}
        Ok(Err(e)) => return Err(e.into()),
        Err(_) => {
            return Err(ExtractError::Io(std::io::Error::other(
                "producer thread panicked",
            )));
        }
    }

    Ok(ExtractStats {
        processed: counters.processed.load(Ordering::Relaxed),
        failed: counters.failed.load(Ordering::Relaxed),
    })
}
