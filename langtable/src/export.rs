//! Export: language trees out of a store, into one tabular document.
//!
//! Every `(file, language)` tree is loaded fresh, flattened and pivoted into
//! a [`LanguageMatrix`], optionally filtered, then encoded in full before
//! anything is returned. A failure at any step yields no output at all.

use std::collections::BTreeSet;

use crate::{
    error::Error,
    formats::FormatType,
    matrix::LanguageMatrix,
    scan::UsageScanner,
    store::TreeStore,
    tree::Tree,
};

/// Which rows an export keeps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RowFilter {
    /// Every row.
    #[default]
    All,
    /// Rows where some language is absent or blank.
    Missing,
    /// Rows whose `file.key` never appears in the scanned templates.
    Unused(BTreeSet<String>),
}

/// Export settings.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Restrict the export to a single file id.
    pub file: Option<String>,
    pub rows: RowFilter,
}

/// An encoded export and what went into it.
#[derive(Debug, Clone)]
pub struct Exported {
    pub bytes: Vec<u8>,
    /// Column order used for the language columns.
    pub languages: Vec<String>,
    pub files: usize,
    pub rows: usize,
}

/// Loads every tree in `store` into a matrix.
///
/// Files are visited in sorted order and languages in the store's order; the
/// language list of the result still puts `en` first. A stored key that an
/// import could not parse back (`"Loading..."`) fails the whole export.
pub fn collect_matrix<S>(store: &S, file: Option<&str>) -> Result<LanguageMatrix, Error>
where
    S: TreeStore + ?Sized,
{
    let languages = store.languages()?;
    let mut files = BTreeSet::new();
    for language in &languages {
        files.extend(store.files(language)?);
    }
    if let Some(only) = file {
        files.retain(|f| f == only);
    }

    let mut matrix = LanguageMatrix::new();
    for file in &files {
        let mut trees: Vec<(&str, Tree)> = Vec::with_capacity(languages.len());
        for language in &languages {
            let tree = store.load_tree(file, language)?;
            if !tree.is_empty() {
                trees.push((language.as_str(), tree));
            }
        }
        matrix.add_file(file, trees.iter().map(|(language, tree)| (*language, tree)))?;
    }
    tracing::info!(
        files = matrix.file_count(),
        rows = matrix.row_count(),
        "collected translations"
    );
    Ok(matrix)
}

/// Builds, filters and encodes a matrix from `store`.
pub fn export<S>(store: &S, format: FormatType, options: &ExportOptions) -> Result<Exported, Error>
where
    S: TreeStore + ?Sized,
{
    let full = collect_matrix(store, options.file.as_deref())?;
    let languages = full.languages();
    tracing::info!(languages = %languages.join(", "), "languages found");

    let matrix = match &options.rows {
        RowFilter::All => full,
        RowFilter::Missing => full.missing(&languages),
        RowFilter::Unused(used) => full.unused(used),
    };

    let bytes = format.encode(&matrix, &languages)?;
    tracing::info!(%format, rows = matrix.row_count(), "export encoded");
    Ok(Exported {
        bytes,
        languages,
        files: matrix.file_count(),
        rows: matrix.row_count(),
    })
}

/// Exports only the rows with a missing or blank language.
pub fn export_missing<S>(store: &S, format: FormatType, file: Option<&str>) -> Result<Exported, Error>
where
    S: TreeStore + ?Sized,
{
    let options = ExportOptions {
        file: file.map(str::to_string),
        rows: RowFilter::Missing,
    };
    export(store, format, &options)
}

/// Exports only the rows no template references.
pub fn export_unused<S, U>(
    store: &S,
    scanner: &U,
    format: FormatType,
    file: Option<&str>,
) -> Result<Exported, Error>
where
    S: TreeStore + ?Sized,
    U: UsageScanner + ?Sized,
{
    let used = scanner.scan_used_keys()?;
    tracing::info!(used = used.len(), "keys referenced by templates");
    let options = ExportOptions {
        file: file.map(str::to_string),
        rows: RowFilter::Unused(used),
    };
    export(store, format, &options)
}
