//! Optional DDS texture post-processing, grounded on
//! `original_source/cmd/mnf-extracter/extractAll/command.go`'s
//! `texconv.Texconv(args, …)` call shape.

use std::path::Path;
use std::process::Command;

use crate::error::{ExtractError, ExtractResult};

/// Target formats `extractAll --convert-dds-to` accepts.
pub const SUPPORTED_TARGET_FORMATS: &[&str] = &["jpg", "png"];

/// External DDS-to-raster converter, invoked once per extracted `.dds`
/// file when `--convert-dds-to` is configured.
pub trait TextureConverter: Send + Sync {
    /// Convert the `.dds` file at `dds_path` to `target_format` in place
    /// (same directory, same stem, new extension). Returns an error if the
    /// external process fails to spawn or exits non-zero; the caller
    /// leaves the original `.dds` untouched on failure.
    fn convert(&self, dds_path: &Path, target_format: &str) -> ExtractResult<()>;
}

/// Shells out to a configurable `texconv`-compatible binary, matching the
/// original's canonical argument vector: `-ft <fmt> -f R8G8B8A8_UNORM_SRGB
/// -y -o <dir> <path>`.
#[derive(Debug, Clone)]
pub struct ProcessTextureConverter {
    /// Path to the converter binary; defaults to `texconv` on `PATH`.
    pub binary: String,
}

impl Default for ProcessTextureConverter {
    fn default() -> Self {
        Self {
            binary: "texconv".to_string(),
        }
    }
}

impl TextureConverter for ProcessTextureConverter {
    fn convert(&self, dds_path: &Path, target_format: &str) -> ExtractResult<()> {
        let Some(parent) = dds_path.parent() else {
            return Err(ExtractError::TextureConversion(format!(
                "{} has no parent directory",
                dds_path.display()
            )));
        };

        let status = Command::new(&self.binary)
            .args(["-ft", target_format, "-f", "R8G8B8A8_UNORM_SRGB", "-y", "-o"])
            .arg(parent)
            .arg(dds_path)
            .status()
            .map_err(|e| ExtractError::TextureConversion(format!("spawn {}: {e}", self.binary)))?;

        if !status.success() {
            return Err(ExtractError::TextureConversion(format!(
                "{} exited with {status}",
                self.binary
            )));
        }
        Ok(())
    }
}
