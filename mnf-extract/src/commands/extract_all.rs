//! `extractAll` — full extraction driven by [`crate::pipeline::run`],
//! grounded on `original_source/cmd/mnf-extracter/extractAll/command.go`.
//! Each retained record is written to its archive-indexed raw path and,
//! when a ZOSFT filename was resolved, to that filename's path too — both
//! optionally hashed into a [`HashRegistry`] and, for `.dds` output,
//! optionally converted to another raster format.

use std::path::{Path, PathBuf};

use mnf_archive::{Mnf, OodleDecompressor};

use crate::error::ExtractResult;
use crate::hash_registry::HashRegistry;
use crate::pipeline::{self, ExtractStats};
use crate::record::ExtractRecord;
use crate::texture::TextureConverter;

/// Tunables for a single [`extract_all`] run.
#[derive(Debug, Clone, Default)]
pub struct ExtractAllOptions {
    /// Worker pool size, clamped to `1..=5` by [`pipeline::run`].
    pub threads: usize,
    /// When set, every written file is SHA-1 hashed and the digests are
    /// written to this path once extraction finishes.
    pub hash_sum_file: Option<PathBuf>,
    /// When set (`"jpg"` or `"png"`), every extracted `.dds` is converted
    /// to this format in place and the original `.dds` is deleted.
    pub convert_dds_to: Option<String>,
}

/// Parse `input` and extract every retained entry under `output_dir`.
pub fn extract_all(
    input: &Path,
    output_dir: &Path,
    options: &ExtractAllOptions,
    oodle: &(dyn OodleDecompressor + Sync),
    converter: &dyn TextureConverter,
) -> ExtractResult<ExtractStats> {
    let mnf = Mnf::open(input)?;
    std::fs::create_dir_all(output_dir)?;

    let hash_registry = options.hash_sum_file.as_ref().map(|_| HashRegistry::new());

    let stats = pipeline::run(&mnf, oodle, options.threads, |record| {
        extract_one(&mnf, oodle, output_dir, record, hash_registry.as_ref(), options, converter)
    })?;

    if let Some(path) = &options.hash_sum_file {
        let registry = hash_registry.as_ref().expect("set alongside hash_sum_file");
        let mut file = std::fs::File::create(path)?;
        registry.finalize(&mut file)?;
    }

    Ok(stats)
}

fn extract_one(
    mnf: &Mnf,
    oodle: &dyn OodleDecompressor,
    output_dir: &Path,
    record: &ExtractRecord,
    hash_registry: Option<&HashRegistry>,
    options: &ExtractAllOptions,
    converter: &dyn TextureConverter,
) -> ExtractResult<()> {
    let data = mnf.read(&record.block3, oodle)?;
    let ext = mnf_format::sniff_extension(&data);

    let raw_rel = Path::new(&format!("{:03}", record.block3.archive_index))
        .join(record.raw_filename(ext));
    write_and_process(output_dir, &raw_rel, &data, hash_registry, options, converter)?;

    if let Some(filename) = &record.filename {
        write_and_process(output_dir, Path::new(filename), &data, hash_registry, options, converter)?;
    }

    Ok(())
}

/// Write `data` to `output_dir/relative_path`, hash it if a registry was
/// configured, and convert it if it's a `.dds` and conversion was
/// configured. Applied once to the raw path and once to the resolved
/// filename path, matching the original's own duplicated block for each.
fn write_and_process(
    output_dir: &Path,
    relative_path: &Path,
    data: &[u8],
    hash_registry: Option<&HashRegistry>,
    options: &ExtractAllOptions,
    converter: &dyn TextureConverter,
) -> ExtractResult<()> {
    let full_path = output_dir.join(relative_path);
    if let Some(parent) = full_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&full_path, data)?;

    let registry_key = relative_path.to_string_lossy().replace('\\', "/");
    if let Some(registry) = hash_registry {
        registry.insert(registry_key.clone(), data);
    }

    let Some(target_format) = &options.convert_dds_to else {
        return Ok(());
    };
    if full_path.extension().and_then(|e| e.to_str()) != Some("dds") {
        return Ok(());
    }

    if converter.convert(&full_path, target_format).is_ok() {
        std::fs::remove_file(&full_path)?;

        if let Some(registry) = hash_registry {
            let converted_path = full_path.with_extension(target_format);
            let converted_data = std::fs::read(&converted_path)?;
            let converted_key = registry_key.trim_end_matches(".dds").to_string() + "." + target_format;
            registry.insert(converted_key, &converted_data);
            registry.remove(&registry_key);
        }
    }

    Ok(())
}
