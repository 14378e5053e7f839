//! `writeLng` — reverse of [`super::parse_lng`], grounded on
//! `original_source/cmd/mnf-extracter/writeLng/command.go`. Reads every
//! `*.csv` under `input_dir`, with each row as `(Id, Variant, Value)` — the
//! same order `parseLng` writes, picked deliberately over the original
//! source's own `writeLng`, which reads `(Variant, Id, Value)` and so
//! disagrees with what its own `parseLng` counterpart produces.

use std::path::Path;

use mnf_lang::LangRecord;

use crate::error::{ExtractError, ExtractResult};

fn domain_id_from_filename(path: &Path) -> ExtractResult<u32> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ExtractError::InvalidDomainFilename(path.display().to_string()))?;

    let hex = stem.strip_prefix("0x").unwrap_or(stem);
    u32::from_str_radix(hex, 16)
        .map_err(|_| ExtractError::InvalidDomainFilename(path.display().to_string()))
}

fn parse_field(path: &Path, field: &'static str, value: &str) -> ExtractResult<u32> {
    value
        .parse()
        .map_err(|_| ExtractError::MalformedField {
            path: path.to_path_buf(),
            field,
            value: value.to_string(),
        })
}

/// Scan every `*.csv` under `input_dir` and write the combined records as a
/// `.lang` file at `output`.
pub fn write_lng(input_dir: &Path, output: &Path) -> ExtractResult<()> {
    let mut records = Vec::new();

    for entry in walkdir::WalkDir::new(input_dir) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().and_then(|e| e.to_str()) != Some("csv") {
            continue;
        }

        let path = entry.path();
        let domain_id = domain_id_from_filename(path)?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(path)?;

        for result in reader.records() {
            let row = result?;
            if row.len() != 3 {
                return Err(ExtractError::MalformedRow {
                    path: path.to_path_buf(),
                    expected: 3,
                    actual: row.len(),
                });
            }

            let id = parse_field(path, "id", &row[0])?;
            let variant = parse_field(path, "variant", &row[1])?;
            let text = row[2].to_string();

            records.push(LangRecord {
                domain_id,
                variant,
                id,
                offset: 0,
                text,
            });
        }
    }

    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::File::create(output)?;
    mnf_lang::write(&mut file, &records)?;

    Ok(())
}
