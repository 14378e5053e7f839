//! `.lang` header, record table and string blob.

use std::collections::{HashMap, HashSet};
use std::io::{Read, Write};

use mnf_format::ByteReader;

use crate::error::LangResult;

const SIGNATURE: u32 = 2;
const SIGNATURE_BYTES: [u8; 4] = [0x00, 0x00, 0x00, 0x02];

/// One (domain, variant, id) → text triple.
///
/// `offset` is the byte offset of `text` inside the source file's string
/// blob; it is meaningful on records produced by [`LangStore::parse`] and
/// ignored (recomputed) by [`write`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LangRecord {
    /// Domain this string belongs to.
    pub domain_id: u32,
    /// Variant within the domain (named `GroupId` in the original format).
    pub variant: u32,
    /// String id within `(domain_id, variant)`.
    pub id: u32,
    /// Byte offset of `text` in the string blob.
    pub offset: u32,
    /// Decoded string value.
    pub text: String,
}

/// A fully parsed language store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LangStore {
    /// All records, in file order.
    pub records: Vec<LangRecord>,
}

impl LangStore {
    /// Parse a `.lang` file: header, fixed-size record table, then a
    /// NUL-delimited string blob running to end of input.
    pub fn parse<R: Read>(r: &mut R) -> LangResult<Self> {
        r.expect_signature(&SIGNATURE_BYTES)?;

        let count = r.read_u32be()?;
        let mut records = Vec::with_capacity(count as usize);
        let mut indices_by_offset: HashMap<u32, Vec<usize>> = HashMap::new();

        for i in 0..count as usize {
            let domain_id = r.read_u32be()?;
            let variant = r.read_u32be()?;
            let id = r.read_u32be()?;
            let offset = r.read_u32be()?;

            indices_by_offset.entry(offset).or_default().push(i);
            records.push(LangRecord {
                domain_id,
                variant,
                id,
                offset,
                text: String::new(),
            });
        }

        let mut current_offset = 0u32;
        loop {
            let text = match r.read_nul_terminated_string() {
                Ok(text) => text,
                Err(mnf_format::FormatError::Eof) => break,
                Err(e) => return Err(e.into()),
            };

            let consumed = text.len() as u32 + 1;
            if let Some(indices) = indices_by_offset.get(&current_offset) {
                for &idx in indices {
                    records[idx].text.clone_from(&text);
                }
            }
            current_offset += consumed;
        }

        Ok(Self { records })
    }

    /// Domain ids present in the store, ascending and deduplicated.
    #[must_use]
    pub fn domain_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.records.iter().map(|r| r.domain_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Ids present for `domain`, ascending and deduplicated.
    #[must_use]
    pub fn ids(&self, domain: u32) -> Vec<u32> {
        let mut ids: Vec<u32> = self
            .records
            .iter()
            .filter(|r| r.domain_id == domain)
            .map(|r| r.id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Records for `(domain, id)`, sorted by variant ascending.
    #[must_use]
    pub fn records(&self, domain: u32, id: u32) -> Vec<&LangRecord> {
        let mut matches: Vec<&LangRecord> = self
            .records
            .iter()
            .filter(|r| r.domain_id == domain && r.id == id)
            .collect();
        matches.sort_by_key(|r| r.variant);
        matches
    }
}

/// Write `records` as a `.lang` file: header, record table with freshly
/// assigned offsets, then each distinct text value once, in first-occurrence
/// order.
///
/// Offsets are assigned by first occurrence of `text`; any pre-existing
/// `offset` on the input records is ignored.
pub fn write<W: Write>(w: &mut W, records: &[LangRecord]) -> LangResult<()> {
    w.write_all(&SIGNATURE.to_be_bytes())?;
    w.write_all(&(records.len() as u32).to_be_bytes())?;

    let mut text_offsets: HashMap<&str, u32> = HashMap::new();
    let mut assigned_offsets = Vec::with_capacity(records.len());
    let mut running_offset = 0u32;

    for record in records {
        let offset = *text_offsets.entry(record.text.as_str()).or_insert_with(|| {
            let offset = running_offset;
            running_offset += record.text.len() as u32 + 1;
            offset
        });
        assigned_offsets.push(offset);

        w.write_all(&record.domain_id.to_be_bytes())?;
        w.write_all(&record.variant.to_be_bytes())?;
        w.write_all(&record.id.to_be_bytes())?;
        w.write_all(&offset.to_be_bytes())?;
    }

    let mut emitted: HashSet<&str> = HashSet::new();
    for record in records {
        if !emitted.insert(record.text.as_str()) {
            continue;
        }
        w.write_all(record.text.as_bytes())?;
        w.write_all(&[0u8])?;
    }

    Ok(())
}
