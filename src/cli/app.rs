//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use super::edit::ModeArg;
use super::output::{Output, OutputFormat};
use super::{check, edit, watch};
use crate::storage::{Config, DocumentFile};

#[derive(Parser)]
#[command(name = "timeline")]
#[command(author, version, about = "Validate, normalize and lay out timeline documents")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Report every problem in a timeline document
    Validate {
        /// Document path, or `-` for stdin
        file: PathBuf,
    },

    /// Derive missing end dates and order items by start
    Normalize {
        /// Document path, or `-` for stdin
        file: PathBuf,

        /// Write the result back to the file
        #[arg(long, short)]
        write: bool,
    },

    /// Show item positions on the time axis
    Layout {
        /// Document path, or `-` for stdin
        file: PathBuf,
    },

    /// Re-indent the JSON without validating it
    Fmt {
        /// Document path, or `-` for stdin
        file: PathBuf,

        /// Write the result back to the file
        #[arg(long, short)]
        write: bool,
    },

    /// Switch the view between day and hour mode
    SetMode {
        /// Document path, or `-` for stdin
        file: PathBuf,

        /// New view mode
        #[arg(value_enum)]
        mode: ModeArg,

        /// Write the result back to the file
        #[arg(long, short)]
        write: bool,
    },

    /// Re-validate and re-render whenever the file changes
    Watch {
        /// Document path
        file: PathBuf,
    },

    /// Print the bundled sample document
    Sample {
        /// Write the sample here instead of printing it
        path: Option<PathBuf>,
    },
}

/// Routes library `tracing` events to stderr
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A subscriber may already be installed when embedded; keep that one
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .try_init();
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load()?;
    let format = cli.format.unwrap_or(config.global.default_format);
    let output = Output::new(format, cli.verbose);

    output.verbose("timeline starting");
    if let Some(root) = &config.project_root {
        output.verbose(&format!("Using project config from: {}", root.display()));
    }

    match cli.command {
        Commands::Validate { file } => check::validate(&output, &DocumentFile::new(file))?,

        Commands::Normalize { file, write } => {
            check::normalize(&output, &DocumentFile::new(file), write)?
        }

        Commands::Layout { file } => {
            check::layout(&output, &DocumentFile::new(file), &config.project.render)?
        }

        Commands::Fmt { file, write } => edit::fmt(&output, &DocumentFile::new(file), write)?,

        Commands::SetMode { file, mode, write } => {
            edit::set_mode(&output, &DocumentFile::new(file), mode, write)?
        }

        Commands::Watch { file } => watch::run(&output, &DocumentFile::new(file), &config)?,

        Commands::Sample { path } => {
            let target = path.map(DocumentFile::new);
            edit::sample(&output, target.as_ref())?
        }
    }

    output.verbose("Command completed successfully");
    Ok(())
}
