//! `parseLng` — one CSV per domain, grounded on
//! `original_source/cmd/mnf-extracter/parseLng/command.go`. Each row is
//! `(Id, Variant, Value)`; see [`super::write_lng`] for the corresponding
//! reader.

use std::fs::File;
use std::path::Path;

use mnf_lang::LangStore;

use crate::error::ExtractResult;

/// Parse the `.lang` file at `input` and write one `0x%08x.csv` file per
/// domain under `output_dir`.
pub fn parse_lng(input: &Path, output_dir: &Path) -> ExtractResult<()> {
    let mut file = File::open(input)?;
    let store = LangStore::parse(&mut file)?;

    std::fs::create_dir_all(output_dir)?;

    for domain_id in store.domain_ids() {
        let csv_path = output_dir.join(format!("0x{domain_id:08x}.csv"));
        let mut writer = csv::Writer::from_path(&csv_path)?;

        for id in store.ids(domain_id) {
            for record in store.records(domain_id, id) {
                writer.write_record([
                    record.id.to_string(),
                    record.variant.to_string(),
                    record.text.clone(),
                ])?;
            }
        }

        writer.flush()?;
    }

    Ok(())
}
