//! CLI library for testing purposes

pub mod config;
pub mod export;
pub mod import;
pub mod validation;

pub use config::{LangtableConfig, Settings, load_config};
pub use export::{ExportKind, ExportOptions, run_export_command};
pub use import::{ImportOptions, run_import_command};
