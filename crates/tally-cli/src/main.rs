//! Tally CLI - hash-linked transaction ledger

use anyhow::Context;
use clap::Parser;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tally_core::{ExportFormat, LedgerConfig};
use tally_ledger::{Ledger, SystemClock, Validation};
use tracing_subscriber::EnvFilter;

mod batch;
mod session;

#[derive(Parser)]
#[command(name = "tally")]
#[command(version)]
#[command(about = "Tally - append-only, hash-linked transaction ledger", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, env = "TALLY_CONFIG")]
    config: Option<PathBuf>,

    /// Export format (text, json, csv); overrides the configuration file
    #[arg(long, global = true)]
    format: Option<ExportFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Record a single transaction and print the resulting chain
    Send {
        #[arg(short, long)]
        sender: String,
        #[arg(short, long)]
        receiver: String,
        #[arg(short, long, allow_hyphen_values = true)]
        amount: String,
    },

    /// Append transactions from a file ('-' for stdin), then verify and export
    Batch {
        /// One `sender,receiver,amount` per line
        #[arg(short, long)]
        input: PathBuf,
        /// Write the export here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Enter transactions interactively
    Session,

    /// Print the SHA-256 digest of a string
    Digest {
        text: String,
    },
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so exports on stdout stay clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    if let Err(e) = tally_crypto::self_test() {
        tracing::error!("{}", e);
        std::process::exit(1);
    }

    let mut config = match &cli.config {
        Some(path) => LedgerConfig::load(path)
            .with_context(|| format!("Failed to load configuration from {:?}", path))?,
        None => LedgerConfig::default(),
    };
    if let Some(format) = cli.format {
        config.export.format = format;
    }

    match cli.command {
        Commands::Send { sender, receiver, amount } => {
            let mut ledger = Ledger::new();
            let block = ledger.append(&sender, &receiver, &amount, &SystemClock)?;
            tracing::info!("Block #{} added successfully", block.sequence_number());
            print!("{}", ledger.export_as(config.export.format)?);
            Ok(())
        }
        Commands::Batch { input, output } => {
            let format = config.export.format;
            let outcome = if input == Path::new("-") {
                batch::process(std::io::stdin().lock(), format, &SystemClock)?
            } else {
                let file = std::fs::File::open(&input)
                    .with_context(|| format!("Failed to open {:?}", input))?;
                batch::process(BufReader::new(file), format, &SystemClock)?
            };

            tracing::info!(
                "Appended {} block(s), skipped {} line(s)",
                outcome.report.appended,
                outcome.report.rejected.len()
            );

            batch::write_export(output.as_deref(), &outcome.export)
                .with_context(|| format!("Failed to write export to {:?}", output))?;

            match &outcome.validation {
                Validation::Valid { blocks } => {
                    tracing::info!("✓ Chain verified: {} block(s) intact", blocks);
                }
                Validation::Invalid(violation) => {
                    tracing::error!("✗ CHAIN INTEGRITY COMPROMISED: {}", violation);
                }
            }

            let code = outcome.exit_code();
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Commands::Session => {
            let mut session = session::Session::new(&config, &SystemClock);
            session.run(std::io::stdin().lock(), std::io::stdout().lock())?;
            tracing::info!("Session closed with {} block(s)", session.ledger().len());
            Ok(())
        }
        Commands::Digest { text } => {
            println!("{}", tally_crypto::sha256_hex(text.as_bytes()));
            Ok(())
        }
    }
}
