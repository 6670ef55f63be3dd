mod commands;

use clap::{Parser, Subcommand};
use sluice_core::{ContinuationToken, Preset};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "sluice",
    version,
    about = "Inspect how oversized MCP tool results are reduced"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the analyzer's verdict for a JSON file as JSON.
    Analyze {
        /// JSON input file, or `-` for stdin
        file: PathBuf,

        /// Named budget preset (conservative, standard, permissive, database_results)
        #[arg(long, conflicts_with = "config")]
        preset: Option<Preset>,

        /// sluice.yaml to take the chunking budget from
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Run the chunking orchestrator and print the rendered tool result.
    Chunk {
        /// JSON input file, or `-` for stdin
        file: PathBuf,

        #[arg(long, conflicts_with = "config")]
        preset: Option<Preset>,

        #[arg(long)]
        config: Option<PathBuf>,

        /// Omit the metadata block
        #[arg(long, default_value_t = false)]
        no_metadata: bool,
    },

    /// Run the simple limiter and print its string.
    Limit {
        /// JSON input file, or `-` for stdin
        file: PathBuf,

        /// Hard token ceiling
        #[arg(long, default_value_t = 10_000)]
        max_tokens: usize,

        /// Context label for the header line
        #[arg(long, default_value = "result")]
        label: String,

        /// Arrays are sliced to this many items first
        #[arg(long, default_value_t = 50)]
        max_items: usize,

        /// Print the body without the header line
        #[arg(long, default_value_t = false)]
        no_warning: bool,
    },

    /// Print the page of a paginated array that starts at a continuation token.
    Resume {
        /// JSON input file, or `-` for stdin
        file: PathBuf,

        /// Continuation token, e.g. offset:40
        #[arg(long)]
        token: ContinuationToken,

        #[arg(long, conflicts_with = "config")]
        preset: Option<Preset>,

        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long, default_value_t = false)]
        no_metadata: bool,
    },
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the command output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let output = match cli.cmd {
        Command::Analyze {
            file,
            preset,
            config,
        } => commands::analyze::run(&file, preset, config.as_deref())?,

        Command::Chunk {
            file,
            preset,
            config,
            no_metadata,
        } => commands::chunk::run(&file, preset, config.as_deref(), !no_metadata)?,

        Command::Limit {
            file,
            max_tokens,
            label,
            max_items,
            no_warning,
        } => commands::limit::run(&file, &label, max_tokens, max_items, !no_warning)?,

        Command::Resume {
            file,
            token,
            preset,
            config,
            no_metadata,
        } => commands::resume::run(&file, token, preset, config.as_deref(), !no_metadata)?,
    };

    println!("{}", output);
    Ok(())
}
