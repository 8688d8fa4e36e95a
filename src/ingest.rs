//! Batch driver: runs the queue against the store.
//!
//! Coordinates one processing pass: enqueue the given videos, walk the
//! queue updating status and progress, load each video's externally
//! produced transcript, and persist the segments through
//! [`TranscriptStore::index_video`]. Processing is strictly sequential;
//! one item is Processing at a time.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::warn;

use crate::config::Config;
use crate::models::ProcessingStatus;
use crate::queue::{BatchQueue, QueueOptions};
use crate::store::TranscriptStore;
use crate::transcript;

/// Counters reported by a batch run.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOutcome {
    pub completed: usize,
    pub failed: usize,
    pub segments_indexed: usize,
}

/// Process a batch of videos whose transcripts live in `transcripts_dir`
/// as `<video stem>.json`.
///
/// Each item is attempted once per pass: a missing or malformed transcript,
/// or a storage failure, marks that item Error with the message and the
/// pass continues with the next item. Failed items keep Error status so a
/// later pass can retry them. Only a failure to open the store aborts the
/// run.
pub async fn run_batch(
    config: &Config,
    transcripts_dir: &Path,
    videos: &[PathBuf],
) -> Result<BatchOutcome> {
    let store = TranscriptStore::open(&config.db.path).await?;

    let mut queue = BatchQueue::with_options(QueueOptions {
        model: config.transcription.model.clone(),
        language: config.transcription.language_opt(),
    });
    queue.enqueue_many(videos.iter().cloned());

    let mut outcome = BatchOutcome::default();

    // One pass over the queue in order. Indices stay stable because the
    // pass never removes items.
    for index in 0..queue.len() {
        let path = match queue.set_current(index) {
            Some(item) => item.path.clone(),
            None => break,
        };

        println!("processing {}", path.display());
        queue.update_status(index, ProcessingStatus::Processing, None);
        queue.update_progress(index, 10);

        match index_one(&store, &mut queue, index, transcripts_dir, &path).await {
            Ok(stored) => {
                queue.update_status(index, ProcessingStatus::Completed, None);
                queue.update_progress(index, 100);
                outcome.completed += 1;
                outcome.segments_indexed += stored;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "batch item failed");
                println!("  error: {:#}", e);
                queue.update_status(index, ProcessingStatus::Error, Some(format!("{:#}", e)));
                outcome.failed += 1;
            }
        }
    }

    let stats = queue.stats();
    println!("batch");
    println!("  videos queued: {}", stats.total);
    println!("  completed: {}", outcome.completed);
    println!("  segments indexed: {}", outcome.segments_indexed);
    println!("  failed: {}", outcome.failed);
    println!("ok");

    store.close().await;
    Ok(outcome)
}

async fn index_one(
    store: &TranscriptStore,
    queue: &mut BatchQueue,
    index: usize,
    transcripts_dir: &Path,
    video_path: &Path,
) -> Result<usize> {
    let transcript_path = transcript_path_for(transcripts_dir, video_path);
    let transcript = transcript::load_transcript(&transcript_path)?;
    queue.update_progress(index, 60);

    let segments = transcript.to_segments();
    queue.set_segments(index, segments.clone());
    if let Some(duration_ms) = transcript.duration_ms() {
        queue.set_duration(index, duration_ms);
    }

    store.index_video(video_path, &segments).await?;
    queue.update_progress(index, 95);

    // Whitespace-only segments are dropped at indexing time
    Ok(segments
        .iter()
        .filter(|s| !s.text.trim().is_empty())
        .count())
}

/// `<transcripts_dir>/<video stem>.json`
fn transcript_path_for(transcripts_dir: &Path, video_path: &Path) -> PathBuf {
    let stem = video_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| video_path.to_string_lossy().into_owned());
    transcripts_dir.join(format!("{}.json", stem))
}

/// Index a single video from an explicit transcript artifact.
pub async fn run_import(config: &Config, video_path: &Path, transcript_path: &Path) -> Result<()> {
    let transcript = transcript::load_transcript(transcript_path)?;
    let segments = transcript.to_segments();

    let store = TranscriptStore::open(&config.db.path).await?;
    store.index_video(video_path, &segments).await?;
    let stored = store.get_all_segments(video_path).await?.len();

    println!("import {}", video_path.display());
    println!("  segments read: {}", segments.len());
    println!("  segments indexed: {}", stored);
    println!("ok");

    store.close().await;
    Ok(())
}

/// Drop a video's registry row, segments, and search entries.
pub async fn run_remove(config: &Config, video_path: &Path) -> Result<()> {
    let store = TranscriptStore::open(&config.db.path).await?;
    let removed = store.remove_video_index(video_path).await?;

    if removed {
        println!("removed {}", video_path.display());
    } else {
        println!("{} is not indexed", video_path.display());
    }

    store.close().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_lookup_uses_video_stem() {
        assert_eq!(
            transcript_path_for(Path::new("/t"), Path::new("/clips/a.mp4")),
            PathBuf::from("/t/a.json")
        );
        // Dots in the stem survive
        assert_eq!(
            transcript_path_for(Path::new("/t"), Path::new("ep.01.final.mkv")),
            PathBuf::from("/t/ep.01.final.json")
        );
        assert_eq!(
            transcript_path_for(Path::new("/t"), Path::new("noext")),
            PathBuf::from("/t/noext.json")
        );
    }
}
