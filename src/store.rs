//! Durable transcript storage: the video registry, the segment table, and
//! the derived FTS index kept in sync with both.
//!
//! All writes for one video happen inside a single transaction, so a
//! concurrent reader sees either the previous segment set or the fully
//! replaced one, never a mix. The FTS table is a derived view: every insert
//! and delete against `segments` is mirrored into `segments_fts` in the
//! same transaction, and `optimize` can rebuild it from `segments` alone.

use std::path::{Path, PathBuf};

use anyhow::Result;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use crate::db;
use crate::migrate;
use crate::models::{display_name_for, Segment, StoreStats, VideoEntry, VideoRecord};

pub struct TranscriptStore {
    pool: SqlitePool,
    db_path: PathBuf,
}

impl TranscriptStore {
    /// Open (creating if missing) the store at `db_path` and run schema
    /// setup. A failure here is unrecoverable for the session.
    pub async fn open(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        let pool = db::connect(&db_path).await?;
        migrate::run_migrations(&pool).await?;
        debug!(path = %db_path.display(), "store opened");
        Ok(Self { pool, db_path })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Persist and index a video's segments, replacing whatever was stored
    /// for that path before. The registry row is upserted so the video id
    /// stays stable across re-indexing. Segments whose trimmed text is
    /// empty are dropped; the rest are stored verbatim. Returns the video
    /// id.
    pub async fn index_video(&self, video_path: &Path, segments: &[Segment]) -> Result<i64> {
        let key = path_key(video_path);
        let name = display_name_for(video_path);
        let size: Option<i64> = std::fs::metadata(video_path).ok().map(|m| m.len() as i64);
        let indexed_at = chrono::Utc::now().timestamp();

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO videos (path, name, size, indexed_at) VALUES (?, ?, ?, ?)
            ON CONFLICT(path) DO UPDATE SET
                name = excluded.name,
                size = excluded.size,
                indexed_at = excluded.indexed_at
            "#,
        )
        .bind(&key)
        .bind(&name)
        .bind(size)
        .bind(indexed_at)
        .execute(&mut *tx)
        .await?;

        let video_id: i64 = sqlx::query_scalar("SELECT id FROM videos WHERE path = ?")
            .bind(&key)
            .fetch_one(&mut *tx)
            .await?;

        // Replace, not merge: old FTS entries and segments go first
        sqlx::query("DELETE FROM segments_fts WHERE video_id = ?")
            .bind(video_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM segments WHERE video_id = ?")
            .bind(video_id)
            .execute(&mut *tx)
            .await?;

        let mut stored = 0usize;
        for segment in segments {
            if segment.text.trim().is_empty() {
                continue;
            }
            let segment_id = sqlx::query(
                "INSERT INTO segments (video_id, start_time, end_time, text) VALUES (?, ?, ?, ?)",
            )
            .bind(video_id)
            .bind(segment.start)
            .bind(segment.end)
            .bind(&segment.text)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();

            sqlx::query("INSERT INTO segments_fts (segment_id, video_id, text) VALUES (?, ?, ?)")
                .bind(segment_id)
                .bind(video_id)
                .bind(&segment.text)
                .execute(&mut *tx)
                .await?;
            stored += 1;
        }

        tx.commit().await?;

        info!(path = %key, segments = stored, "indexed video");
        Ok(video_id)
    }

    /// Delete a video's registry row, segments, and FTS entries together.
    /// Returns false (not an error) when the path was never indexed.
    pub async fn remove_video_index(&self, video_path: &Path) -> Result<bool> {
        let key = path_key(video_path);
        let mut tx = self.pool.begin().await?;

        let video_id: Option<i64> = sqlx::query_scalar("SELECT id FROM videos WHERE path = ?")
            .bind(&key)
            .fetch_optional(&mut *tx)
            .await?;

        let video_id = match video_id {
            Some(id) => id,
            None => return Ok(false),
        };

        sqlx::query("DELETE FROM segments_fts WHERE video_id = ?")
            .bind(video_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM segments WHERE video_id = ?")
            .bind(video_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM videos WHERE id = ?")
            .bind(video_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(path = %key, "removed video index");
        Ok(true)
    }

    pub async fn is_video_indexed(&self, video_path: &Path) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM videos WHERE path = ?")
            .bind(path_key(video_path))
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    /// Registry row for a path, if indexed.
    pub async fn video_record(&self, video_path: &Path) -> Result<Option<VideoRecord>> {
        let row = sqlx::query("SELECT id, path, name, size, indexed_at FROM videos WHERE path = ?")
            .bind(path_key(video_path))
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| VideoRecord {
            id: row.get("id"),
            path: row.get("path"),
            name: row.get("name"),
            size: row.get("size"),
            indexed_at: row.get("indexed_at"),
        }))
    }

    /// All stored segments for a video, ordered by start time ascending.
    /// Empty when the path is not indexed.
    pub async fn get_all_segments(&self, video_path: &Path) -> Result<Vec<Segment>> {
        let rows = sqlx::query(
            r#"
            SELECT s.start_time, s.end_time, s.text
            FROM segments s
            JOIN videos v ON v.id = s.video_id
            WHERE v.path = ?
            ORDER BY s.start_time
            "#,
        )
        .bind(path_key(video_path))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| Segment {
                start: row.get("start_time"),
                end: row.get("end_time"),
                text: row.get("text"),
            })
            .collect())
    }

    /// Registry listing with per-video segment counts, ordered by path.
    pub async fn list_videos(&self) -> Result<Vec<VideoEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT v.id, v.path, v.name, v.size, v.indexed_at,
                   COUNT(s.id) AS segment_count
            FROM videos v
            LEFT JOIN segments s ON s.video_id = v.id
            GROUP BY v.id
            ORDER BY v.path
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| VideoEntry {
                record: VideoRecord {
                    id: row.get("id"),
                    path: row.get("path"),
                    name: row.get("name"),
                    size: row.get("size"),
                    indexed_at: row.get("indexed_at"),
                },
                segment_count: row.get("segment_count"),
            })
            .collect())
    }

    pub async fn stats(&self) -> Result<StoreStats> {
        let video_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM videos")
            .fetch_one(&self.pool)
            .await?;
        let segment_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM segments")
            .fetch_one(&self.pool)
            .await?;
        let db_size_bytes = std::fs::metadata(&self.db_path)
            .map(|m| m.len())
            .unwrap_or(0);

        Ok(StoreStats {
            video_count,
            segment_count,
            db_size_bytes,
            db_path: self.db_path.clone(),
        })
    }

    /// Rebuild the FTS table from the segment table and reclaim disk space.
    /// Safe at any time; loses nothing. May be slow on large stores and is
    /// never invoked implicitly.
    pub async fn optimize(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM segments_fts")
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "INSERT INTO segments_fts (segment_id, video_id, text) \
             SELECT id, video_id, text FROM segments",
        )
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        // VACUUM cannot run inside a transaction
        sqlx::query("VACUUM").execute(&self.pool).await?;

        info!("store optimized");
        Ok(())
    }
}

/// Canonical string key for a video path. Lookups and writes must agree on
/// this conversion for path identity to hold.
fn path_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
