//! Indexed-video listing and segment dumps.
//!
//! Read-only views over the store for `vid videos` and `vid segments`.

use std::path::Path;

use anyhow::Result;

use crate::config::Config;
use crate::search::format_timestamp;
use crate::stats::format_bytes;
use crate::store::TranscriptStore;

/// List every indexed video with its size, segment count, and index time.
pub async fn run_videos(config: &Config) -> Result<()> {
    let store = TranscriptStore::open(&config.db.path).await?;
    let entries = store.list_videos().await?;

    if entries.is_empty() {
        println!("No videos indexed.");
        store.close().await;
        return Ok(());
    }

    println!(
        "{:<48} {:>10} {:>10}   {}",
        "VIDEO", "SIZE", "SEGMENTS", "INDEXED"
    );
    println!("{}", "-".repeat(88));

    for entry in &entries {
        let size_display = match entry.record.size {
            Some(size) => format_bytes(size.max(0) as u64),
            None => "-".to_string(),
        };
        println!(
            "{:<48} {:>10} {:>10}   {}",
            entry.record.path,
            size_display,
            entry.segment_count,
            format_ts(entry.record.indexed_at)
        );
    }

    println!();
    println!(
        "{} video{}",
        entries.len(),
        if entries.len() == 1 { "" } else { "s" }
    );

    store.close().await;
    Ok(())
}

/// Dump a video's stored segments in playback order.
pub async fn run_segments(config: &Config, video_path: &Path) -> Result<()> {
    let store = TranscriptStore::open(&config.db.path).await?;

    if !store.is_video_indexed(video_path).await? {
        println!("{} is not indexed", video_path.display());
        store.close().await;
        return Ok(());
    }

    let segments = store.get_all_segments(video_path).await?;
    if segments.is_empty() {
        println!("No segments stored for {}", video_path.display());
        store.close().await;
        return Ok(());
    }

    println!("--- Segments ({}) ---", segments.len());
    for segment in &segments {
        println!(
            "[{} - {}] {}",
            format_timestamp(segment.start),
            format_timestamp(segment.end),
            segment.text
        );
    }

    store.close().await;
    Ok(())
}

fn format_ts(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ts.to_string())
}
