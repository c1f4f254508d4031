//! Longbox Ingest - Main entry point
//!
//! Command-line tool for the reading-order workbook: converts it into
//! the JSON artifact set, enriches it from the Marvel API, or mirrors
//! its structure as folders.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use longbox_ingest::marvel::MarvelClient;
use longbox_ingest::workbook::Workbook;
use longbox_ingest::{artifacts, derive, enrich, folders};

/// Command-line arguments for longbox-ingest
#[derive(Parser, Debug)]
#[command(name = "longbox-ingest")]
#[command(about = "Reading-order workbook tools for Longbox")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert the workbook into the JSON artifact set
    Convert {
        /// Workbook to read
        #[arg(short, long)]
        file: PathBuf,

        /// Directory the artifacts are written to
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Fill missing issue IDs and metadata from the Marvel API
    Update {
        /// Workbook to update in place
        #[arg(short, long)]
        file: PathBuf,

        /// First year of the search window
        #[arg(long)]
        start: i32,

        /// Last year of the search window
        #[arg(long)]
        end: i32,

        /// Marvel API public key
        #[arg(long, env = "MARVEL_PUBLIC_KEY")]
        public_key: String,

        /// Marvel API private key
        #[arg(long, env = "MARVEL_PRIVATE_KEY", hide_env_values = true)]
        private_key: String,
    },

    /// Mirror the workbook structure as folders
    Folders {
        /// Workbook to read
        #[arg(short, long)]
        file: PathBuf,

        /// Directory the folders are created under
        #[arg(short, long)]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "longbox_ingest=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    match args.command {
        Command::Convert { file, out } => convert(&file, &out),
        Command::Update {
            file,
            start,
            end,
            public_key,
            private_key,
        } => update(&file, start, end, public_key, private_key).await,
        Command::Folders { file, out } => mirror(&file, &out),
    }
}

fn convert(file: &Path, out: &Path) -> Result<()> {
    info!("Converting '{}' into '{}'", file.display(), out.display());
    let workbook = Workbook::open(file).context("Failed to open workbook")?;
    let sheets = workbook.sheets()?;
    let set = derive::derive(&sheets)?;
    artifacts::write_artifacts(&set, out).context("Failed to write artifacts")?;
    info!(
        comics = set.comics.len(),
        phases = set.phases.len(),
        events = set.events.len(),
        characters = set.characters.len(),
        creators = set.creators.len(),
        "conversion complete"
    );
    Ok(())
}

async fn update(
    file: &Path,
    start: i32,
    end: i32,
    public_key: String,
    private_key: String,
) -> Result<()> {
    info!("Updating '{}'", file.display());
    let mut workbook = Workbook::open(file).context("Failed to open workbook")?;
    let client = MarvelClient::new(public_key, private_key);

    // Ctrl+C stops further lookups; rows already updated are kept and
    // the workbook is still saved below.
    let cancel = CancellationToken::new();
    let listener = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, finishing the row in flight");
            listener.cancel();
        }
    });

    let stats = enrich::enrich(&mut workbook, &client, start, end, &cancel).await?;
    info!(
        found = stats.found,
        filled = stats.filled,
        failed = stats.failed,
        skipped = stats.skipped,
        "enrichment finished, saving workbook"
    );
    workbook.save().context("Failed to save workbook")?;
    Ok(())
}

fn mirror(file: &Path, out: &Path) -> Result<()> {
    info!(
        "Creating folders from '{}' in '{}'",
        file.display(),
        out.display()
    );
    let workbook = Workbook::open(file).context("Failed to open workbook")?;
    let sheets = workbook.sheets()?;
    folders::mirror(&sheets, out)?;
    info!("folder mirror complete");
    Ok(())
}
