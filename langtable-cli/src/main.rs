use clap::{Parser, Subcommand};
use langtable_cli::config::{LangtableConfig, load_config, merge};
use langtable_cli::{
    ExportKind, ExportOptions, ImportOptions, Settings, run_export_command, run_import_command,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file (defaults to ./langtable.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding <lang>/<file>.json translation trees
    #[arg(long, global = true)]
    lang_dir: Option<String>,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Export every translation into one table.
    Export {
        /// Output format: csv, json, xml or xlsx
        #[arg(default_value = "csv")]
        format: String,
        /// Output file, relative to the storage directory
        output: Option<String>,
        /// Only export this translation file
        #[arg(long)]
        file: Option<String>,
    },

    /// Merge an edited table back into the translation trees.
    Import {
        /// Input format: csv, json, xml or xlsx
        #[arg(default_value = "csv")]
        format: String,
        /// Input file, relative to the storage directory
        input: Option<String>,
    },

    /// Export only keys with a missing or blank language.
    ExportMissing {
        /// Output file; the format follows its extension
        output: Option<String>,
        /// Only export this translation file
        #[arg(long)]
        file: Option<String>,
    },

    /// Export keys no view template references.
    ExportUnused {
        /// Output file; the format follows its extension
        output: Option<String>,
        /// Only export this translation file
        #[arg(long)]
        file: Option<String>,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("langtable=info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn settings(args: &Args) -> Result<Settings, String> {
    let file_config = load_config(args.config.as_deref())?;
    let flags = LangtableConfig {
        lang_dir: args.lang_dir.clone(),
        ..Default::default()
    };
    Ok(merge(flags, file_config).resolve())
}

fn run(args: Args) -> Result<(), String> {
    let settings = settings(&args)?;

    match args.commands {
        Commands::Export {
            format,
            output,
            file,
        } => {
            let opts = ExportOptions {
                kind: ExportKind::All,
                format: Some(format),
                output,
                file,
            };
            run_export_command(opts, &settings).map(|_| ())
        }
        Commands::Import { format, input } => {
            let opts = ImportOptions {
                format: Some(format),
                input,
            };
            run_import_command(opts, &settings).map(|_| ())
        }
        Commands::ExportMissing { output, file } => {
            let opts = ExportOptions {
                kind: ExportKind::Missing,
                format: None,
                output,
                file,
            };
            run_export_command(opts, &settings).map(|_| ())
        }
        Commands::ExportUnused { output, file } => {
            let opts = ExportOptions {
                kind: ExportKind::Unused,
                format: None,
                output,
                file,
            };
            run_export_command(opts, &settings).map(|_| ())
        }
    }
}

fn main() {
    init_tracing();
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
