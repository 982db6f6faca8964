//! `lru`: small utilities for Adobe Lightroom libraries.

use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use lrutility::{
    chunk::{self, ChunkError, DEFAULT_CHUNK_SIZE},
    cull::{self, CullError, CullOptions},
};

/// LrUtility - a collection of utilities for Adobe Lightroom.
#[derive(Parser)]
#[command(name = "lru")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging (DEBUG level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Delete raw files (and their sidecars) carrying the reject rating.
    #[command(alias = "delete-rate-1")]
    Cull {
        /// Target directory to search for XMP files
        directory: PathBuf,

        /// Perform a dry run without actually deleting files
        #[arg(short, long)]
        dry_run: bool,

        /// The rating that marks a reject
        #[arg(short, long, default_value_t = 1)]
        reject_rating: i64,
    },

    /// Pack a directory's files into zip archives below a size limit.
    #[command(alias = "zip-chunker")]
    Chunk {
        /// Target directory to search for files
        directory: PathBuf,

        /// Size of each chunk in bytes
        #[arg(short, long, default_value_t = DEFAULT_CHUNK_SIZE)]
        size_chunk: u64,
    },

    /// Print everything read from one sidecar.
    Inspect {
        /// The XMP file to read
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match cli.command {
        Commands::Cull {
            directory,
            dry_run,
            reject_rating,
        } => {
            let options = CullOptions {
                dry_run,
                reject_rating,
            };

            match cull::cull(&directory, &options) {
                Ok(report) => {
                    for failure in &report.failures {
                        log::warn!("{failure}");
                    }
                    log::info!(
                        "Scanned {} sidecar(s), {} {} file(s), {} unrated, {} failure(s).",
                        report.scanned.len(),
                        if report.dry_run { "would delete" } else { "deleted" },
                        report.removed.len(),
                        report.unrated.len(),
                        report.failures.len(),
                    );
                }

                // a missing folder isn't worth a failing exit
                Err(e @ CullError::MissingDirectory { .. }) => log::error!("{e}"),
            }

            ExitCode::SUCCESS
        }

        Commands::Chunk {
            directory,
            size_chunk,
        } => match chunk::chunk_directory(&directory, size_chunk) {
            Ok(archives) => {
                log::debug!("Wrote {} archive(s).", archives.len());
                ExitCode::SUCCESS
            }
            Err(e @ ChunkError::MissingDirectory { .. }) => {
                log::error!("{e}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                log::error!("{e}");
                ExitCode::FAILURE
            }
        },

        Commands::Inspect { file } => match lrutility::extract(&file) {
            Ok(record) => {
                println!("{record:#?}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                log::error!("{e}");
                ExitCode::FAILURE
            }
        },
    }
}
