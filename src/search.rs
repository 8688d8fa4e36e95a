//! Ranked full-text search over stored transcript segments.
//!
//! Queries are phrase-matched by default: the raw string is wrapped in
//! double quotes before it reaches FTS5, so `near miss` finds that exact
//! word sequence instead of being parsed as boolean/prefix syntax. A query
//! that already contains a quote character is passed through verbatim as a
//! user-authored phrase expression. Results are scoped to one video and
//! ordered by bm25 rank (lower is better) with the segment start time as a
//! tiebreak, so identical queries against identical data always return the
//! same ordering.

use std::path::Path;

use anyhow::Result;
use sqlx::Row;
use tracing::debug;

use crate::config::{Config, SearchConfig};
use crate::models::SearchHit;
use crate::store::TranscriptStore;

/// Per-call search knobs, normally derived from `[search]` config.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub limit: i64,
    pub snippet_start: String,
    pub snippet_end: String,
    pub snippet_ellipsis: String,
    /// Context window around the match, in tokens. FTS5 caps this at 64.
    pub snippet_tokens: i64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: 50,
            snippet_start: "<mark>".to_string(),
            snippet_end: "</mark>".to_string(),
            snippet_ellipsis: "...".to_string(),
            snippet_tokens: 32,
        }
    }
}

impl From<&SearchConfig> for SearchOptions {
    fn from(config: &SearchConfig) -> Self {
        Self {
            limit: config.limit,
            snippet_start: config.snippet_start.clone(),
            snippet_end: config.snippet_end.clone(),
            snippet_ellipsis: config.snippet_ellipsis.clone(),
            snippet_tokens: config.snippet_tokens,
        }
    }
}

/// Top matching segments for one video, best-first. An empty (or
/// whitespace-only) query and an unindexed path both yield zero results
/// rather than an error.
pub async fn search_segments(
    store: &TranscriptStore,
    video_path: &Path,
    query: &str,
    options: &SearchOptions,
) -> Result<Vec<SearchHit>> {
    let match_query = match prepare_match_query(query) {
        Some(q) => q,
        None => return Ok(Vec::new()),
    };

    let video = match store.video_record(video_path).await? {
        Some(video) => video,
        None => return Ok(Vec::new()),
    };

    let rows = sqlx::query(
        r#"
        SELECT s.start_time, s.end_time, s.text,
               snippet(segments_fts, 2, ?, ?, ?, ?) AS highlighted,
               rank
        FROM segments s
        JOIN segments_fts ON segments_fts.segment_id = s.id
        WHERE segments_fts.video_id = ? AND segments_fts MATCH ?
        ORDER BY rank, s.start_time
        LIMIT ?
        "#,
    )
    .bind(&options.snippet_start)
    .bind(&options.snippet_end)
    .bind(&options.snippet_ellipsis)
    .bind(options.snippet_tokens)
    .bind(video.id)
    .bind(&match_query)
    .bind(options.limit)
    .fetch_all(store.pool())
    .await?;

    let hits: Vec<SearchHit> = rows
        .iter()
        .map(|row| SearchHit {
            start: row.get("start_time"),
            end: row.get("end_time"),
            text: row.get("text"),
            snippet: row.get("highlighted"),
            rank: row.get("rank"),
        })
        .collect();

    debug!(query = %match_query, video_id = video.id, hits = hits.len(), "search completed");
    Ok(hits)
}

/// Turn a raw user query into an FTS5 MATCH expression. `None` means the
/// query was empty after trimming and the search should return nothing.
pub fn prepare_match_query(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.contains('"') {
        // User-authored phrase syntax, keep as-is
        Some(trimmed.to_string())
    } else {
        Some(format!("\"{}\"", trimmed))
    }
}

/// Run the search command: query one video and print ranked hits.
pub async fn run_search(
    config: &Config,
    video_path: &Path,
    query: &str,
    limit: Option<i64>,
) -> Result<()> {
    let store = TranscriptStore::open(&config.db.path).await?;

    let mut options = SearchOptions::from(&config.search);
    if let Some(limit) = limit {
        options.limit = limit;
    }

    let hits = search_segments(&store, video_path, query, &options).await?;

    if hits.is_empty() {
        println!("No results.");
        store.close().await;
        return Ok(());
    }

    for (i, hit) in hits.iter().enumerate() {
        println!(
            "{}. [{} - {}] {}",
            i + 1,
            format_timestamp(hit.start),
            format_timestamp(hit.end),
            hit.snippet.replace('\n', " ").trim()
        );
    }
    println!();
    println!("{} result{}", hits.len(), if hits.len() == 1 { "" } else { "s" });

    store.close().await;
    Ok(())
}

/// Format seconds as `m:ss` or `h:mm:ss` for display next to a hit.
pub(crate) fn format_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_queries_match_nothing() {
        assert_eq!(prepare_match_query(""), None);
        assert_eq!(prepare_match_query("   "), None);
        assert_eq!(prepare_match_query("\t\n"), None);
    }

    #[test]
    fn plain_queries_are_phrase_wrapped() {
        assert_eq!(prepare_match_query("hello"), Some("\"hello\"".to_string()));
        assert_eq!(
            prepare_match_query("hello world"),
            Some("\"hello world\"".to_string())
        );
        assert_eq!(
            prepare_match_query("  padded  "),
            Some("\"padded\"".to_string())
        );
    }

    #[test]
    fn wrapping_defuses_operator_syntax() {
        // Without wrapping FTS5 would parse these as boolean/prefix syntax
        assert_eq!(
            prepare_match_query("cats OR dogs"),
            Some("\"cats OR dogs\"".to_string())
        );
        assert_eq!(prepare_match_query("net*"), Some("\"net*\"".to_string()));
    }

    #[test]
    fn quoted_queries_pass_through() {
        assert_eq!(
            prepare_match_query("\"exact phrase\""),
            Some("\"exact phrase\"".to_string())
        );
        assert_eq!(
            prepare_match_query("say \"cheese\""),
            Some("say \"cheese\"".to_string())
        );
    }

    #[test]
    fn timestamps_render_compactly() {
        assert_eq!(format_timestamp(0.0), "0:00");
        assert_eq!(format_timestamp(7.9), "0:07");
        assert_eq!(format_timestamp(65.0), "1:05");
        assert_eq!(format_timestamp(3599.0), "59:59");
        assert_eq!(format_timestamp(3661.0), "1:01:01");
        assert_eq!(format_timestamp(-2.0), "0:00");
    }
}
