//! Store statistics and maintenance.
//!
//! Provides a quick summary of what's indexed: video counts, segment
//! counts, and database size. Used by `vid stats` to give confidence
//! that imports and batch runs are landing where expected, and by
//! `vid optimize` after heavy churn.

use anyhow::Result;

use crate::config::Config;
use crate::store::TranscriptStore;

/// Run the stats command: query the database and print a summary.
pub async fn run_stats(config: &Config) -> Result<()> {
    let store = TranscriptStore::open(&config.db.path).await?;
    let stats = store.stats().await?;

    println!("Vidscribe — Store Stats");
    println!("=======================");
    println!();
    println!("  Database:   {}", stats.db_path.display());
    println!("  Size:       {}", format_bytes(stats.db_size_bytes));
    println!();
    println!("  Videos:     {}", stats.video_count);
    println!("  Segments:   {}", stats.segment_count);
    println!();

    store.close().await;
    Ok(())
}

/// Rebuild the search index from the segment rows and compact the file.
pub async fn run_optimize(config: &Config) -> Result<()> {
    let store = TranscriptStore::open(&config.db.path).await?;
    store.optimize().await?;

    let stats = store.stats().await?;
    println!("Store optimized.");
    println!("  Size: {}", format_bytes(stats.db_size_bytes));

    store.close().await;
    Ok(())
}

/// Format a byte count as a human-readable string.
pub(crate) fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_render_at_sensible_scales() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.00 GB");
    }
}
