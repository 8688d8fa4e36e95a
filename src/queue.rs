//! Batch processing queue for video transcription work.
//!
//! The queue is an ordered, in-memory collection of [`VideoWorkItem`]s with
//! a single "current" cursor. It tracks lifecycle and progress for the
//! external pipeline but performs no processing itself: a driver picks
//! work with [`BatchQueue::next_eligible`] (or walks indices in order),
//! records transitions with [`BatchQueue::update_status`], and hands
//! finished segments to the store.
//!
//! Every mutating operation that takes an index reports failure through its
//! return value instead of panicking, so a UI layer can surface "cannot
//! remove while processing" style messages without unwinding.

use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::models::{ProcessingStatus, QueueStats, Segment, VideoWorkItem};

/// Processing configuration stamped onto each item at enqueue time.
#[derive(Debug, Clone)]
pub struct QueueOptions {
    pub model: String,
    pub language: Option<String>,
}

impl Default for QueueOptions {
    fn default() -> Self {
        Self {
            model: "base".to_string(),
            language: None,
        }
    }
}

/// Ordered work queue with a status state machine and one active cursor.
///
/// At most one item is Processing at a time by convention: a driver moves
/// the cursor to one item, finishes it, and only then moves on. The queue
/// itself does not enforce transition legality; any status may follow any
/// other, which is what lets a caller reset an Error item back to Queued
/// for a retry.
#[derive(Debug, Default)]
pub struct BatchQueue {
    items: Vec<VideoWorkItem>,
    current: Option<usize>,
    options: QueueOptions,
}

impl BatchQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: QueueOptions) -> Self {
        Self {
            items: Vec::new(),
            current: None,
            options,
        }
    }

    /// Add a path to the queue, or return the existing item when the path
    /// is already queued. New items start Queued at progress 0.
    pub fn enqueue(&mut self, path: impl Into<PathBuf>) -> &VideoWorkItem {
        let index = self.enqueue_index(path.into());
        &self.items[index]
    }

    /// Enqueue each path in order, deduplicating against the queue and
    /// against earlier paths in the same call.
    pub fn enqueue_many<I, P>(&mut self, paths: I) -> Vec<&VideoWorkItem>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let indices: Vec<usize> = paths
            .into_iter()
            .map(|p| self.enqueue_index(p.into()))
            .collect();
        indices.into_iter().map(|i| &self.items[i]).collect()
    }

    fn enqueue_index(&mut self, path: PathBuf) -> usize {
        if let Some(index) = self.position(&path) {
            return index;
        }
        self.items.push(VideoWorkItem::new(
            path,
            self.options.model.clone(),
            self.options.language.clone(),
        ));
        self.items.len() - 1
    }

    /// Index of the item with this path, if queued.
    pub fn position(&self, path: &Path) -> Option<usize> {
        self.items.iter().position(|item| item.path.as_path() == path)
    }

    /// Remove the item at `index`. Fails when the index is out of range or
    /// the item is actively Processing.
    ///
    /// Removing before the cursor shifts the cursor down by one so it keeps
    /// pointing at the same logical item; removing at or after it leaves the
    /// cursor value unchanged, except that a cursor left dangling past the
    /// new end resets to none.
    pub fn remove(&mut self, index: usize) -> bool {
        if index >= self.items.len() {
            return false;
        }
        if self.items[index].status == ProcessingStatus::Processing {
            return false;
        }
        self.items.remove(index);
        if let Some(cur) = self.current {
            if index < cur {
                self.current = Some(cur - 1);
            } else if cur >= self.items.len() {
                self.current = None;
            }
        }
        true
    }

    /// Remove every Completed item and return how many were removed.
    ///
    /// The cursor follows the item it pointed to; when that item was itself
    /// Completed, the cursor becomes none rather than landing on an
    /// unrelated neighbor.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.items.len();
        let current_path: Option<PathBuf> = self
            .current
            .and_then(|i| self.items.get(i))
            .map(|item| item.path.clone());
        self.items
            .retain(|item| item.status != ProcessingStatus::Completed);
        self.current = current_path.and_then(|p| self.position(&p));
        before - self.items.len()
    }

    /// Empty the queue. Fails while any item is Processing.
    pub fn clear_all(&mut self) -> bool {
        if self
            .items
            .iter()
            .any(|item| item.status == ProcessingStatus::Processing)
        {
            return false;
        }
        self.items.clear();
        self.current = None;
        true
    }

    /// Scan from the start for the first item that is Queued, Error, or
    /// Canceled, make it current, and return it. Clears the cursor and
    /// returns `None` when nothing is left to process.
    pub fn next_eligible(&mut self) -> Option<&VideoWorkItem> {
        match self.items.iter().position(|item| item.status.is_eligible()) {
            Some(index) => {
                self.current = Some(index);
                Some(&self.items[index])
            }
            None => {
                self.current = None;
                None
            }
        }
    }

    pub fn current(&self) -> Option<&VideoWorkItem> {
        self.current.and_then(|i| self.items.get(i))
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Point the cursor at `index`. Out-of-range leaves the cursor untouched
    /// and returns `None`.
    pub fn set_current(&mut self, index: usize) -> Option<&VideoWorkItem> {
        if index >= self.items.len() {
            return None;
        }
        self.current = Some(index);
        self.items.get(index)
    }

    /// Record a status transition. No legality check is applied between
    /// statuses. Entering Completed or Error stamps `processed_at`; the
    /// error message is kept only for Error and cleared otherwise.
    pub fn update_status(
        &mut self,
        index: usize,
        status: ProcessingStatus,
        error_message: Option<String>,
    ) -> bool {
        let item = match self.items.get_mut(index) {
            Some(item) => item,
            None => return false,
        };
        item.status = status;
        item.error_message = if status == ProcessingStatus::Error {
            error_message
        } else {
            None
        };
        if matches!(
            status,
            ProcessingStatus::Completed | ProcessingStatus::Error
        ) {
            item.processed_at = Some(Utc::now());
        }
        true
    }

    /// Store a progress value, clamped into [0, 100].
    pub fn update_progress(&mut self, index: usize, value: i32) -> bool {
        let item = match self.items.get_mut(index) {
            Some(item) => item,
            None => return false,
        };
        item.progress = value.clamp(0, 100) as u8;
        true
    }

    pub fn set_segments(&mut self, index: usize, segments: Vec<Segment>) -> bool {
        match self.items.get_mut(index) {
            Some(item) => {
                item.segments = segments;
                true
            }
            None => false,
        }
    }

    pub fn set_duration(&mut self, index: usize, duration_ms: u64) -> bool {
        match self.items.get_mut(index) {
            Some(item) => {
                item.duration_ms = Some(duration_ms);
                true
            }
            None => false,
        }
    }

    pub fn set_subtitles_path(&mut self, index: usize, path: impl Into<PathBuf>) -> bool {
        match self.items.get_mut(index) {
            Some(item) => {
                item.subtitles_path = Some(path.into());
                true
            }
            None => false,
        }
    }

    pub fn set_display_name(&mut self, index: usize, name: impl Into<String>) -> bool {
        match self.items.get_mut(index) {
            Some(item) => {
                item.display_name = name.into();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, index: usize) -> Option<&VideoWorkItem> {
        self.items.get(index)
    }

    pub fn get_segments(&self, index: usize) -> Option<&[Segment]> {
        self.items.get(index).map(|item| item.segments.as_slice())
    }

    /// Snapshot count per status, computed by full scan.
    pub fn stats(&self) -> QueueStats {
        let mut stats = QueueStats {
            total: self.items.len(),
            ..QueueStats::default()
        };
        for item in &self.items {
            match item.status {
                ProcessingStatus::Queued => stats.queued += 1,
                ProcessingStatus::Processing => stats.processing += 1,
                ProcessingStatus::Completed => stats.completed += 1,
                ProcessingStatus::Error => stats.error += 1,
                ProcessingStatus::Canceled => stats.canceled += 1,
            }
        }
        stats
    }

    pub fn items(&self) -> &[VideoWorkItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
