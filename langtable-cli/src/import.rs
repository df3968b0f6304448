use crate::config::Settings;
use crate::validation::{parse_format, validate_file_path, validate_lang_dir};
use indicatif::{ProgressBar, ProgressStyle};
use langtable::{ImportReport, JsonDirStore};

#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    pub format: Option<String>,
    /// Defaults to `translations.<ext>` in the storage directory.
    pub input: Option<String>,
}

/// Run the import command: merge an edited table back into the trees.
///
/// Groups that fail are listed on stderr and turn the result into an error
/// after the remaining groups have been written.
pub fn run_import_command(opts: ImportOptions, settings: &Settings) -> Result<ImportReport, String> {
    let format = parse_format(opts.format.as_deref().unwrap_or("csv"))?;
    let input = opts
        .input
        .unwrap_or_else(|| format!("translations.{}", format.extension()));
    let input_path = settings.storage_path(&input);
    validate_file_path(&input_path)?;
    validate_lang_dir(&settings.lang_dir)?;

    let progress_bar = ProgressBar::new_spinner();
    progress_bar.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );

    progress_bar.set_message(format!("Reading {}...", input_path.display()));
    let bytes = std::fs::read(&input_path).map_err(|e| {
        progress_bar.finish_with_message("❌ Error reading input file");
        format!("Error reading {}: {}", input_path.display(), e)
    })?;

    progress_bar.set_message("Merging translations...");
    let mut store = JsonDirStore::new(&settings.lang_dir);
    let report = langtable::import(&mut store, format, &bytes).map_err(|e| {
        progress_bar.finish_with_message("❌ Import aborted");
        format!("Error importing {}: {}", input_path.display(), e)
    })?;

    if report.is_success() {
        progress_bar.finish_with_message(format!(
            "✅ Imported {} keys into {} file(s)",
            report.keys_merged(),
            report.succeeded_count()
        ));
    } else {
        progress_bar.finish_with_message("⚠️ Import finished with failures");
    }

    println!("Succeeded: {}", report.succeeded_count());
    println!("Failed: {}", report.failed_count());
    for failure in &report.failed {
        eprintln!("  {} (keys: {})", failure.error, failure.keys.join(", "));
    }

    if !report.is_success() {
        return Err(format!(
            "{} of {} group(s) failed to import",
            report.failed_count(),
            report.succeeded_count() + report.failed_count()
        ));
    }
    Ok(report)
}
