//! # Vidscribe
//!
//! A local-first transcript indexing and search engine for video files.
//!
//! Vidscribe takes the timestamped transcripts an offline speech-to-text
//! pipeline produces for local videos, tracks the videos through a batch
//! processing queue, and persists every transcript segment into SQLite
//! with an FTS5 full-text index so spoken phrases can be found and jumped
//! to by timestamp.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌─────────────┐   ┌───────────┐
//! │ Transcripts │──▶│ Batch Queue │──▶│  SQLite   │
//! │ (JSON)      │   │ per-video   │   │ FTS5      │
//! └─────────────┘   └─────────────┘   └────┬──────┘
//!                                          │
//!                      ┌───────────────────┤
//!                      ▼                   ▼
//!                 ┌──────────┐       ┌──────────┐
//!                 │   CLI    │       │  Search  │
//!                 │  (vid)   │       │ snippets │
//!                 └──────────┘       └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! vid init                             # create database
//! vid batch ./transcripts a.mp4 b.mp4  # index a batch of videos
//! vid import a.mp4 ./a.json            # index one video directly
//! vid search a.mp4 "hello world"
//! vid segments a.mp4                   # dump stored segments
//! vid stats
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`queue`] | In-memory batch processing queue |
//! | [`transcript`] | Transcript JSON parsing |
//! | [`ingest`] | Batch driver: queue + store + transcripts |
//! | [`store`] | Segment persistence and the FTS index |
//! | [`search`] | Per-video full-text search with snippets |
//! | [`videos`] | Indexed-video listing and segment dumps |
//! | [`stats`] | Store statistics and maintenance |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |

pub mod config;
pub mod db;
pub mod ingest;
pub mod migrate;
pub mod models;
pub mod queue;
pub mod search;
pub mod stats;
pub mod store;
pub mod transcript;
pub mod videos;
