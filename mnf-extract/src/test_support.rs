//! Shared fixture builder for pipeline and command tests, built once per
//! crate and glob-imported (`use crate::test_support::*;`) from each test
//! module instead of duplicating `mnf-archive`'s own byte layout.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use mnf_archive::{ZOSFT_DEPOT_ID, ZOSFT_GAME_ID};

pub(crate) struct FixtureEntry {
    id: u32,
    field2: [u8; 2],
    archive_index: u16,
    payload: Vec<u8>,
}

impl FixtureEntry {
    pub(crate) fn skip_prelude() -> Self {
        Self {
            id: 0,
            field2: [0, 0],
            archive_index: 0,
            payload: Vec::new(),
        }
    }

    pub(crate) fn retained(archive_index: u16, field2: [u8; 2], payload: &[u8]) -> Self {
        Self {
            id: 1,
            field2,
            archive_index,
            payload: payload.to_vec(),
        }
    }

    pub(crate) fn with_id(mut self, id: u32) -> Self {
        self.id = id;
        self
    }
}

pub(crate) struct ManifestFixture {
    entries: Vec<FixtureEntry>,
    zosft_names: Option<Vec<(u32, &'static str)>>,
}

impl ManifestFixture {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            zosft_names: None,
        }
    }

    pub(crate) fn entry(mut self, e: FixtureEntry) -> Self {
        self.entries.push(e);
        self
    }

    pub(crate) fn zosft(mut self, names: &[(u32, &'static str)]) -> Self {
        self.zosft_names = Some(names.to_vec());
        self
    }

    pub(crate) fn write(self, dir: &Path, mnf_name: &str) -> PathBuf {
        let mnf_path = dir.join(mnf_name);
        let stem = mnf_path.file_stem().unwrap().to_str().unwrap().to_string();
        let is_depot = mnf_name == "eso.mnf";
        let sentinel_id = if is_depot { ZOSFT_DEPOT_ID } else { ZOSFT_GAME_ID };

        let mut archive_indices: Vec<u16> = self.entries.iter().map(|e| e.archive_index).collect();
        archive_indices.sort_unstable();
        archive_indices.dedup();
        if archive_indices.is_empty() {
            archive_indices.push(0);
        }

        let mut archive_buffers: std::collections::BTreeMap<u16, Vec<u8>> =
            archive_indices.iter().map(|&i| (i, Vec::new())).collect();

        let mut block2_raw = Vec::new();
        let mut block3_raw = Vec::new();

        if let Some(names) = &self.zosft_names {
            let blob = build_zosft_blob(names);
            let buf = archive_buffers
                .get_mut(&0)
                .expect("zosft fixtures place the sidecar in archive 0");
            let offset = buf.len() as u32;
            buf.extend_from_slice(&blob);

            block2_raw.extend_from_slice(&sentinel_id.to_le_bytes());
            block2_raw.extend_from_slice(&[0xFF, 0xFF]);
            block2_raw.extend_from_slice(&[0, 0]);

            block3_raw.extend_from_slice(&(blob.len() as u32).to_le_bytes());
            block3_raw.extend_from_slice(&(blob.len() as u32).to_le_bytes());
            block3_raw.extend_from_slice(&0u32.to_le_bytes());
            block3_raw.extend_from_slice(&offset.to_le_bytes());
            block3_raw.extend_from_slice(&0u16.to_le_bytes());
            block3_raw.extend_from_slice(&0u16.to_le_bytes());
        }

        for entry in &self.entries {
            let buf = archive_buffers.get_mut(&entry.archive_index).unwrap();
            let offset = buf.len() as u32;
            buf.extend_from_slice(&entry.payload);

            block2_raw.extend_from_slice(&entry.id.to_le_bytes());
            block2_raw.extend_from_slice(&entry.field2);
            block2_raw.extend_from_slice(&[0, 0]);

            block3_raw.extend_from_slice(&(entry.payload.len() as u32).to_le_bytes());
            block3_raw.extend_from_slice(&(entry.payload.len() as u32).to_le_bytes());
            block3_raw.extend_from_slice(&0u32.to_le_bytes());
            block3_raw.extend_from_slice(&offset.to_le_bytes());
            block3_raw.extend_from_slice(&entry.archive_index.to_le_bytes());
            block3_raw.extend_from_slice(&0u16.to_le_bytes());
        }

        let count3 = (self.entries.len() + usize::from(self.zosft_names.is_some())) as u32;

        let mut mnf_bytes = Vec::new();
        mnf_bytes.extend_from_slice(b"MES2");
        mnf_bytes.extend_from_slice(&3u16.to_le_bytes());
        mnf_bytes.extend_from_slice(&(archive_indices.len() as u16).to_le_bytes());
        for &idx in &archive_indices {
            mnf_bytes.extend_from_slice(&idx.to_le_bytes());
        }
        mnf_bytes.extend_from_slice(&0u32.to_le_bytes());
        mnf_bytes.extend_from_slice(&0u32.to_le_bytes());

        mnf_bytes.extend_from_slice(&3u16.to_be_bytes());
        mnf_bytes.extend_from_slice(&[0u8; 4]);
        mnf_bytes.extend_from_slice(&0u32.to_be_bytes());
        mnf_bytes.extend_from_slice(&count3.to_be_bytes());
        mnf_bytes.extend_from_slice(&count3.to_be_bytes());

        push_zlib_block_be(&mut mnf_bytes, &[]);
        push_zlib_block_be(&mut mnf_bytes, &block2_raw);
        push_zlib_block_be(&mut mnf_bytes, &block3_raw);

        for &idx in &archive_indices {
            let path = dir.join(format!("{stem}{idx:04}.dat"));
            std::fs::write(&path, &archive_buffers[&idx]).unwrap();
        }
        std::fs::write(&mnf_path, &mnf_bytes).unwrap();

        mnf_path
    }
}

fn build_zosft_blob(entries: &[(u32, &str)]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"ZOSFT");
    out.extend_from_slice(&[0u8; 10]);
    out.extend_from_slice(&(entries.len() as u32).to_le_bytes());

    write_empty_subindex(&mut out);

    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&(entries.len() as u32).to_le_bytes());
    out.extend_from_slice(&(entries.len() as u32).to_le_bytes());

    let mut filename_blob = Vec::new();
    let mut offsets = Vec::with_capacity(entries.len());
    for (_, name) in entries {
        offsets.push(filename_blob.len() as u32);
        filename_blob.extend_from_slice(name.as_bytes());
        filename_blob.push(0);
    }

    let mut block2_raw = Vec::new();
    for (id, _) in entries {
        block2_raw.extend_from_slice(&id.to_le_bytes());
    }
    push_zlib_block_le(&mut out, &block2_raw);

    let mut block3_raw = Vec::new();
    for (i, (id, _)) in entries.iter().enumerate() {
        block3_raw.extend_from_slice(&id.to_le_bytes());
        block3_raw.extend_from_slice(&offsets[i].to_le_bytes());
        block3_raw.extend_from_slice(&[0u8; 8]);
    }
    push_zlib_block_le(&mut out, &block3_raw);

    write_empty_subindex(&mut out);

    out.extend_from_slice(&(filename_blob.len() as u32).to_le_bytes());
    out.extend_from_slice(&filename_blob);

    out.extend_from_slice(b"ZOSFT");
    out
}

fn write_empty_subindex(out: &mut Vec<u8>) {
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
}

fn zlib_block(data: &[u8]) -> Vec<u8> {
    use std::io::Write as _;
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn push_zlib_block_be(out: &mut Vec<u8>, raw: &[u8]) {
    let compressed = zlib_block(raw);
    out.extend_from_slice(&(raw.len() as u32).to_be_bytes());
    out.extend_from_slice(&(compressed.len() as u32).to_be_bytes());
    out.extend_from_slice(&compressed);
}

fn push_zlib_block_le(out: &mut Vec<u8>, raw: &[u8]) {
    let compressed = zlib_block(raw);
    out.extend_from_slice(&(raw.len() as u32).to_le_bytes());
    out.extend_from_slice(&(compressed.len() as u32).to_le_bytes());
    out.extend_from_slice(&compressed);
}
