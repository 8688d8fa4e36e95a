//! # Vidscribe CLI (`vid`)
//!
//! The `vid` binary is the primary interface for Vidscribe. It provides
//! commands for database initialization, batch transcript indexing,
//! per-video search, segment inspection, and store maintenance.
//!
//! ## Usage
//!
//! ```bash
//! vid --config ./vidscribe.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `vid init` | Create the SQLite database and run schema migrations |
//! | `vid batch <dir> <videos...>` | Queue videos and index their transcripts |
//! | `vid import <video> <transcript>` | Index one video from a transcript file |
//! | `vid search <video> "<query>"` | Search a video's indexed segments |
//! | `vid segments <video>` | Dump a video's stored segments |
//! | `vid videos` | List indexed videos |
//! | `vid remove <video>` | Drop a video from the index |
//! | `vid stats` | Show store statistics |
//! | `vid optimize` | Rebuild the search index and compact the file |
//!
//! ## Examples
//!
//! ```bash
//! # Initialize the database
//! vid init --config ./vidscribe.toml
//!
//! # Index a batch of videos whose transcripts sit in ./transcripts
//! vid batch ./transcripts lecture1.mp4 lecture2.mp4
//!
//! # Index a single video from an explicit transcript
//! vid import lecture1.mp4 ./transcripts/lecture1.json
//!
//! # Find where a phrase is spoken
//! vid search lecture1.mp4 "gradient descent"
//!
//! # Free the space left behind by removed videos
//! vid remove lecture2.mp4
//! vid optimize
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vidscribe::store::TranscriptStore;
use vidscribe::{config, ingest, search, stats, videos};

/// Vidscribe CLI — a local-first transcript indexing and search engine
/// for video files.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. A missing file falls back to built-in defaults, so `vid init`
/// works with zero setup.
#[derive(Parser)]
#[command(
    name = "vid",
    about = "Vidscribe — a local-first transcript indexing and search engine for video files",
    version,
    long_about = "Vidscribe tracks local videos through a batch processing queue, persists their \
    timestamped transcript segments into SQLite with an FTS5 full-text index, and answers \
    per-video phrase searches with highlighted snippets."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./vidscribe.toml`. Database, search, and transcription
    /// settings are read from this file; a missing file means defaults.
    #[arg(long, global = true, default_value = "./vidscribe.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and all required tables
    /// (videos, segments, segments_fts). This command is idempotent —
    /// running it multiple times is safe.
    Init,

    /// Queue videos and index their transcripts.
    ///
    /// Enqueues each video, then walks the queue in order: loads
    /// `<dir>/<video stem>.json`, stores the segments, and updates the
    /// search index. A failed item is marked and the run continues with
    /// the next one.
    Batch {
        /// Directory holding one `<video stem>.json` transcript per video.
        transcripts_dir: PathBuf,

        /// Video files to process.
        #[arg(required = true)]
        videos: Vec<PathBuf>,
    },

    /// Index one video from an explicit transcript file.
    ///
    /// Replaces anything previously stored for the video. The video's
    /// registry entry keeps its id across re-imports.
    Import {
        /// Video file the transcript belongs to.
        video: PathBuf,

        /// Transcript JSON with timestamped segments.
        transcript: PathBuf,
    },

    /// Search a video's indexed segments.
    ///
    /// Runs an FTS5 match scoped to the given video and prints ranked
    /// results with timestamps and highlighted snippets. Plain queries are
    /// matched as an exact phrase; quote parts of the query yourself to
    /// use FTS5 operators.
    Search {
        /// Video file to search within.
        video: PathBuf,

        /// The search query string.
        query: String,

        /// Maximum number of results to return.
        #[arg(long)]
        limit: Option<i64>,
    },

    /// Dump a video's stored segments in playback order.
    Segments {
        /// Video file to inspect.
        video: PathBuf,
    },

    /// List indexed videos with sizes, segment counts, and index times.
    Videos,

    /// Drop a video's registry row, segments, and search entries.
    Remove {
        /// Video file to remove from the index.
        video: PathBuf,
    },

    /// Show store statistics.
    Stats,

    /// Rebuild the search index from the segment rows and compact the
    /// database file. Useful after removing many videos.
    Optimize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Init => {
            let store = TranscriptStore::open(&cfg.db.path).await?;
            store.close().await;
            println!("Database initialized successfully.");
        }
        Commands::Batch {
            transcripts_dir,
            videos,
        } => {
            ingest::run_batch(&cfg, &transcripts_dir, &videos).await?;
        }
        Commands::Import { video, transcript } => {
            ingest::run_import(&cfg, &video, &transcript).await?;
        }
        Commands::Search {
            video,
            query,
            limit,
        } => {
            search::run_search(&cfg, &video, &query, limit).await?;
        }
        Commands::Segments { video } => {
            videos::run_segments(&cfg, &video).await?;
        }
        Commands::Videos => {
            videos::run_videos(&cfg).await?;
        }
        Commands::Remove { video } => {
            ingest::run_remove(&cfg, &video).await?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg).await?;
        }
        Commands::Optimize => {
            stats::run_optimize(&cfg).await?;
        }
    }

    Ok(())
}
