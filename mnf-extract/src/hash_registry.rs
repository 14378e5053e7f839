//! Shared SHA-1 hash registry, grounded on
//! `original_source/cmd/mnf-extracter/extractAll/command.go`'s `hash.Registry`
//! usage: workers insert and remove entries concurrently; finalisation
//! sorts and writes them once.

use std::collections::HashMap;
use std::io::Write;

use parking_lot::Mutex;
use sha1::{Digest, Sha1};

use crate::error::ExtractResult;

/// A shared table of `name -> sha1(bytes)`, written out as a sorted
/// `%x *%s\n` hash-sum file on [`HashRegistry::finalize`].
#[derive(Debug, Default)]
pub struct HashRegistry {
    entries: Mutex<HashMap<String, [u8; 20]>>,
}

impl HashRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash `data` and register it under `name`, replacing any prior entry.
    pub fn insert(&self, name: impl Into<String>, data: &[u8]) {
        let digest = Sha1::digest(data);
        self.entries.lock().insert(name.into(), digest.into());
    }

    /// Remove `name`'s entry, if any. Used when a `.dds` is converted and
    /// replaced by its output file under a different name.
    pub fn remove(&self, name: &str) {
        self.entries.lock().remove(name);
    }

    /// Sort all entries lexicographically by name and write `%x *%s\n`
    /// lines, matching the original's `sort.Slice` + `fmt.Sprintf` pass.
    pub fn finalize<W: Write>(&self, w: &mut W) -> ExtractResult<()> {
        let entries = self.entries.lock();
        let mut names: Vec<&String> = entries.keys().collect();
        names.sort_unstable();

        for name in names {
            let digest = &entries[name];
            writeln!(w, "{} *{name}", hex::encode(digest))?;
        }
        Ok(())
    }
}
