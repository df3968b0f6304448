use crate::config::Settings;
use crate::validation::{format_from_path, parse_format, validate_lang_dir, validate_output_path};
use indicatif::{ProgressBar, ProgressStyle};
use langtable::{
    ExportOptions as LibExportOptions, Exported, JsonDirStore, RowFilter, ViewScanner,
    formats::FormatType, scan::UsageScanner,
};
use std::path::PathBuf;

pub const DEFAULT_MISSING_OUTPUT: &str = "missing_translations.csv";
pub const DEFAULT_UNUSED_OUTPUT: &str = "unused_translations.csv";

/// Which rows an export writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    All,
    Missing,
    Unused,
}

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub kind: ExportKind,
    /// Explicit format name. When absent the format comes from the output
    /// extension, or CSV.
    pub format: Option<String>,
    pub output: Option<String>,
    pub file: Option<String>,
}

impl ExportOptions {
    /// Resolves the format and the output file name.
    pub fn target(&self) -> Result<(FormatType, String), String> {
        let format = match (&self.format, &self.output) {
            (Some(format), _) => parse_format(format)?,
            (None, Some(output)) if self.kind != ExportKind::All => format_from_path(output)?,
            (None, _) => FormatType::Csv,
        };
        let output = match &self.output {
            Some(output) => output.clone(),
            None => match self.kind {
                ExportKind::All => format!("translations.{}", format.extension()),
                ExportKind::Missing => DEFAULT_MISSING_OUTPUT.to_string(),
                ExportKind::Unused => DEFAULT_UNUSED_OUTPUT.to_string(),
            },
        };
        Ok((format, output))
    }
}

fn spinner() -> ProgressBar {
    let progress_bar = ProgressBar::new_spinner();
    progress_bar.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    progress_bar
}

/// Run the export commands: flatten every language tree into one table.
pub fn run_export_command(opts: ExportOptions, settings: &Settings) -> Result<PathBuf, String> {
    let (format, output) = opts.target()?;
    let output_path = settings.storage_path(&output);
    validate_lang_dir(&settings.lang_dir)?;
    validate_output_path(&output_path)?;

    let progress_bar = spinner();
    progress_bar.set_message(format!(
        "Reading translations from {}...",
        settings.lang_dir.display()
    ));
    let store = JsonDirStore::new(&settings.lang_dir);

    let rows = match opts.kind {
        ExportKind::All => RowFilter::All,
        ExportKind::Missing => RowFilter::Missing,
        ExportKind::Unused => {
            progress_bar.set_message(format!(
                "Scanning {} for used keys...",
                settings.views_dir.display()
            ));
            let scanner = ViewScanner::new(&settings.views_dir).with_suffix(&settings.view_suffix);
            let used = scanner.scan_used_keys().map_err(|e| {
                progress_bar.finish_with_message("❌ Error scanning views");
                format!("Error scanning views: {}", e)
            })?;
            RowFilter::Unused(used)
        }
    };
    let lib_options = LibExportOptions {
        file: opts.file.clone(),
        rows,
    };

    progress_bar.set_message(format!("Encoding {}...", format));
    let exported: Exported = langtable::export(&store, format, &lib_options).map_err(|e| {
        progress_bar.finish_with_message("❌ Error exporting translations");
        format!("Error exporting translations: {}", e)
    })?;

    progress_bar.set_message("Writing output file...");
    std::fs::write(&output_path, &exported.bytes).map_err(|e| {
        progress_bar.finish_with_message("❌ Error writing output file");
        format!("Error writing to {}: {}", output_path.display(), e)
    })?;

    progress_bar.finish_with_message(format!(
        "✅ Exported {} rows from {} files ({}) to {}",
        exported.rows,
        exported.files,
        exported.languages.join(", "),
        output_path.display()
    ));
    Ok(output_path)
}
