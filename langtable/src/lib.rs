#![forbid(unsafe_code)]
//! Translation trees to spreadsheets and back.
//!
//! Applications keep their translations as one nested key tree per file and
//! language (`en/messages.json`, `fr/messages.json`, ...). Translators would
//! rather edit one big table. langtable converts between the two:
//!
//! - **Export** flattens every tree to dot-path keys (`welcome.title`) and
//!   pivots them into a language matrix with one row per `(file, key)` and one
//!   column per language, then encodes it as CSV, JSON, XML or `.xlsx`.
//! - **Import** decodes such a table, regroups it by `(file, language)` and
//!   merges each group into the existing tree, keeping every key the table
//!   does not mention. A failing group is reported and skipped; the others
//!   still land.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use langtable::{FormatType, JsonDirStore, export, import};
//!
//! let mut store = JsonDirStore::new("resources/lang");
//! let exported = export(&store, FormatType::Csv, &Default::default())?;
//! std::fs::write("translations.csv", &exported.bytes)?;
//!
//! // ... edit the sheet ...
//!
//! let bytes = std::fs::read("translations.csv")?;
//! let report = import(&mut store, FormatType::Csv, &bytes)?;
//! println!("{} groups merged, {} failed", report.succeeded_count(), report.failed_count());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Supported Formats
//!
//! - **CSV**: header `File,Key,<lang...>`, one row per key
//! - **JSON**: `{file: {key: {lang: value}}}`, pretty-printed
//! - **XML**: `<translations>` with one element per file
//! - **XLSX**: the CSV grid in the first worksheet

pub mod error;
pub mod export;
pub mod formats;
pub mod matrix;
pub mod path;
pub mod reconcile;
pub mod scan;
pub mod store;
pub mod traits;
pub mod tree;

// Re-export most used types for easy consumption
pub use crate::{
    error::Error,
    export::{ExportOptions, Exported, RowFilter, export, export_missing, export_unused},
    formats::{FormatType, infer_format_from_extension},
    matrix::{DEFAULT_LANGUAGE, LanguageMatrix},
    path::KeyPath,
    reconcile::{ImportReconciler, ImportReport, import},
    scan::{UsageScanner, ViewScanner},
    store::{JsonDirStore, MemoryStore, TreeStore},
    traits::TabularCodec,
    tree::{Tree, merge_trees, unflatten},
};
