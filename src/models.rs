//! Core data models used throughout vidscribe.
//!
//! These types represent the work items moving through the batch queue,
//! the transcript segments persisted in the store, and the rows returned
//! by search and registry queries.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

/// A timestamped span of transcribed text.
///
/// `start` and `end` are seconds from the beginning of the video.
/// Whitespace-only text survives the queue hand-off but is dropped at
/// indexing time.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl Segment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }
}

/// Processing lifecycle of a queued video.
///
/// The state machine is advisory: the queue records whatever the driver
/// sets and enforces no transition legality, so a caller can freely reset
/// an Error or Canceled item back to Queued for a retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStatus {
    Queued,
    Processing,
    Completed,
    Error,
    Canceled,
}

impl ProcessingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProcessingStatus::Queued => "queued",
            ProcessingStatus::Processing => "processing",
            ProcessingStatus::Completed => "completed",
            ProcessingStatus::Error => "error",
            ProcessingStatus::Canceled => "canceled",
        }
    }

    /// Eligible for `next_eligible`: anything not finished and not in flight.
    pub fn is_eligible(self) -> bool {
        matches!(
            self,
            ProcessingStatus::Queued | ProcessingStatus::Error | ProcessingStatus::Canceled
        )
    }
}

impl std::fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One video's record in the batch queue.
///
/// Identity is the `path`; no two items in a queue share one. Everything
/// else is bookkeeping written by the processing driver or the UI layer.
#[derive(Debug, Clone)]
pub struct VideoWorkItem {
    /// Queue identity. Unique within a queue.
    pub path: PathBuf,
    /// Basename of `path` at enqueue time; UI layers may rename it.
    pub display_name: String,
    pub status: ProcessingStatus,
    /// Percent complete, always within 0..=100.
    pub progress: u8,
    /// Media duration, known once the transcript is in.
    pub duration_ms: Option<u64>,
    /// Transcript hand-off from the external pipeline; empty until then.
    pub segments: Vec<Segment>,
    /// Present only while `status` is `Error`.
    pub error_message: Option<String>,
    /// Written by the external subtitle generator after completion.
    pub subtitles_path: Option<PathBuf>,
    pub created_at: DateTime<Utc>,
    /// Stamped on every transition into Completed or Error.
    pub processed_at: Option<DateTime<Utc>>,
    /// Whisper model tag this item was enqueued for. Immutable.
    pub model: String,
    /// Language hint; `None` means auto-detect. Immutable.
    pub language: Option<String>,
}

impl VideoWorkItem {
    pub(crate) fn new(path: PathBuf, model: String, language: Option<String>) -> Self {
        let display_name = display_name_for(&path);
        Self {
            path,
            display_name,
            status: ProcessingStatus::Queued,
            progress: 0,
            duration_ms: None,
            segments: Vec::new(),
            error_message: None,
            subtitles_path: None,
            created_at: Utc::now(),
            processed_at: None,
            model,
            language,
        }
    }
}

/// Derive the default display name for a path: its final component, or the
/// whole path when there is none (e.g. `".."`).
pub(crate) fn display_name_for(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Snapshot of queue composition by status.
///
/// Always satisfies `total == queued + processing + completed + error + canceled`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    pub total: usize,
    pub queued: usize,
    pub processing: usize,
    pub completed: usize,
    pub error: usize,
    pub canceled: usize,
}

/// A video's registry row as stored in SQLite.
#[derive(Debug, Clone)]
pub struct VideoRecord {
    /// Stable rowid, assigned on first indexing and kept across re-indexing.
    pub id: i64,
    pub path: String,
    /// Basename of `path` at indexing time.
    pub name: String,
    /// Byte size at indexing time; `None` when the file was unreadable.
    pub size: Option<i64>,
    /// Unix seconds of the last (re-)indexing.
    pub indexed_at: i64,
}

/// Registry listing row: a [`VideoRecord`] plus its stored segment count.
#[derive(Debug, Clone)]
pub struct VideoEntry {
    pub record: VideoRecord,
    pub segment_count: i64,
}

/// One ranked search result for a single video.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub start: f64,
    pub end: f64,
    /// Full segment text, untruncated.
    pub text: String,
    /// Excerpt with matches wrapped in the configured marker pair and an
    /// ellipsis where the window cut the text.
    pub snippet: String,
    /// bm25 rank straight from FTS5; lower is better.
    pub rank: f64,
}

/// Store-level statistics, as reported by `vid stats`.
#[derive(Debug, Clone)]
pub struct StoreStats {
    pub video_count: i64,
    pub segment_count: i64,
    pub db_size_bytes: u64,
    pub db_path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_is_basename() {
        assert_eq!(display_name_for(Path::new("/clips/a.mp4")), "a.mp4");
        assert_eq!(display_name_for(Path::new("b.mkv")), "b.mkv");
    }

    #[test]
    fn eligibility_matches_status_set() {
        assert!(ProcessingStatus::Queued.is_eligible());
        assert!(ProcessingStatus::Error.is_eligible());
        assert!(ProcessingStatus::Canceled.is_eligible());
        assert!(!ProcessingStatus::Processing.is_eligible());
        assert!(!ProcessingStatus::Completed.is_eligible());
    }
}
