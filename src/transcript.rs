//! Transcript hand-off format.
//!
//! The external transcription pipeline writes one JSON artifact per video:
//!
//! ```json
//! {
//!   "language": "en",
//!   "duration": 12.7,
//!   "segments": [
//!     { "start": 0.0, "end": 2.5, "text": "hello world" }
//!   ]
//! }
//! ```
//!
//! Unknown fields (Whisper emits several per segment) are ignored.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::models::Segment;

#[derive(Debug, Clone, Deserialize)]
pub struct Transcript {
    #[serde(default)]
    pub language: Option<String>,
    /// Media duration in seconds, when the pipeline reports it.
    #[serde(default)]
    pub duration: Option<f64>,
    pub segments: Vec<TranscriptSegment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptSegment {
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub text: String,
}

impl Transcript {
    pub fn to_segments(&self) -> Vec<Segment> {
        self.segments
            .iter()
            .map(|s| Segment::new(s.start, s.end, s.text.clone()))
            .collect()
    }

    /// Duration in milliseconds, falling back to the last segment's end
    /// when the pipeline did not report one.
    pub fn duration_ms(&self) -> Option<u64> {
        self.duration
            .or_else(|| self.segments.last().map(|s| s.end))
            .map(|seconds| (seconds * 1000.0).round() as u64)
    }
}

pub fn load_transcript(path: &Path) -> Result<Transcript> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read transcript file: {}", path.display()))?;
    let transcript: Transcript = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse transcript file: {}", path.display()))?;
    Ok(transcript)
}
