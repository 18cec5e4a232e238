//! Subcommands and the plumbing they share.

pub mod batch;
pub mod config;
pub mod output;
pub mod process;

use std::path::{Path, PathBuf};

use tracing::debug;

use titlex_core::models::{OcrConfig, TitlexConfig};
use titlex_core::OcrExport;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("titlex")
        .join("config.json")
}

/// Load the config given on the command line, else the default file if it
/// exists, else built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<TitlexConfig> {
    if let Some(path) = config_path {
        return Ok(TitlexConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        Ok(TitlexConfig::from_file(&default_path)?)
    } else {
        Ok(TitlexConfig::default())
    }
}

/// Obtain the OCR export for `input`: reload a persisted export, or run the
/// configured OCR command on the document.
pub async fn load_export(
    input: &Path,
    from_export: bool,
    ocr: &OcrConfig,
) -> anyhow::Result<OcrExport> {
    if from_export {
        debug!("Reusing OCR export {}", input.display());
        return Ok(OcrExport::from_file(input)?);
    }

    run_ocr(input, ocr).await
}

async fn run_ocr(input: &Path, ocr: &OcrConfig) -> anyhow::Result<OcrExport> {
    let Some(program) = ocr.program.as_deref() else {
        anyhow::bail!(
            "No OCR command configured.\n\n\
             Run 'titlex config set ocr.program <command>' or pass --from-export \
             with a previously saved export."
        );
    };

    let args = ocr.resolved_args(input);
    debug!("Running OCR: {} {}", program, args.join(" "));

    let output = tokio::process::Command::new(program)
        .args(&args)
        .output()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to start OCR command '{}': {}", program, e))?;

    if !output.status.success() {
        anyhow::bail!(
            "OCR command '{}' failed ({}): {}",
            program,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    let json = String::from_utf8(output.stdout)
        .map_err(|e| anyhow::anyhow!("OCR command produced invalid UTF-8: {}", e))?;

    Ok(OcrExport::from_json(&json)?)
}
