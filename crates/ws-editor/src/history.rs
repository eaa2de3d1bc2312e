//! Undo/Redo history.
//!
//! Every tracked change is recorded as a pair of state snapshots. Snapshots
//! are `Arc<StoryState>` handles, so an entry costs two pointers plus the
//! pages that actually changed.
//!
//! Drag gestures use **batching**: the state is captured when the outermost
//! batch opens and again when it closes, so one undo reverts the whole
//! gesture no matter how many dispatches it made.

use std::sync::Arc;
use ws_core::StoryState;

#[derive(Debug, Clone)]
struct Entry {
    before: Arc<StoryState>,
    after: Arc<StoryState>,
    description: String,
}

/// Bounded undo/redo stacks with batch grouping.
#[derive(Debug)]
pub struct History {
    undo_stack: Vec<Entry>,
    redo_stack: Vec<Entry>,
    /// Maximum undo depth.
    max_depth: usize,
    /// Batch nesting depth (0 = not batching).
    batch_depth: usize,
    /// State captured when the outermost batch opened.
    batch_snapshot: Option<Arc<StoryState>>,
    /// Whether a tracked change happened inside the current batch.
    batch_dirty: bool,
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::with_capacity(max_depth.min(64)),
            redo_stack: Vec::new(),
            max_depth,
            batch_depth: 0,
            batch_snapshot: None,
            batch_dirty: false,
        }
    }

    fn push(&mut self, entry: Entry) {
        if self.max_depth == 0 {
            return;
        }
        self.undo_stack.push(entry);
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    /// Start a batch group at `current`.
    pub fn begin_batch(&mut self, current: &Arc<StoryState>) {
        if self.batch_depth == 0 {
            self.batch_snapshot = Some(Arc::clone(current));
            self.batch_dirty = false;
        }
        self.batch_depth += 1;
    }

    /// End a batch group. When the outermost batch closes after a tracked
    /// change, one entry spanning the whole batch is recorded.
    pub fn end_batch(&mut self, current: &Arc<StoryState>) {
        if self.batch_depth == 0 {
            return;
        }
        self.batch_depth -= 1;
        if self.batch_depth > 0 {
            return;
        }
        let before = self.batch_snapshot.take();
        if self.batch_dirty
            && let Some(before) = before
            && before != *current
        {
            self.push(Entry {
                before,
                after: Arc::clone(current),
                description: "batch".to_string(),
            });
        }
        self.batch_dirty = false;
    }

    pub fn is_batching(&self) -> bool {
        self.batch_depth > 0
    }

    /// Record a change from `before` to `after`. Inside a batch the change
    /// only marks the batch dirty.
    pub fn record(&mut self, before: &Arc<StoryState>, after: &Arc<StoryState>, description: &str) {
        if self.batch_depth > 0 {
            self.batch_dirty = true;
            return;
        }
        self.push(Entry {
            before: Arc::clone(before),
            after: Arc::clone(after),
            description: description.to_string(),
        });
    }

    /// Step back: returns the state to restore and the entry's description.
    /// Nothing is undone while a batch is open.
    pub fn undo(&mut self) -> Option<(Arc<StoryState>, String)> {
        if self.is_batching() {
            return None;
        }
        let entry = self.undo_stack.pop()?;
        let restored = (Arc::clone(&entry.before), entry.description.clone());
        self.redo_stack.push(entry);
        Some(restored)
    }

    /// Step forward again after an undo.
    pub fn redo(&mut self) -> Option<(Arc<StoryState>, String)> {
        if self.is_batching() {
            return None;
        }
        let entry = self.redo_stack.pop()?;
        let restored = (Arc::clone(&entry.after), entry.description.clone());
        self.undo_stack.push(entry);
        Some(restored)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.batch_depth = 0;
        self.batch_snapshot = None;
        self.batch_dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ws_core::{Id, Page};

    fn state(pages: &[&str]) -> Arc<StoryState> {
        Arc::new(StoryState::with_pages(
            pages.iter().map(|p| Page::new(Id::intern(p))).collect(),
        ))
    }

    #[test]
    fn undo_redo_restores_snapshots() {
        let a = state(&["a"]);
        let b = state(&["a", "b"]);
        let mut history = History::new(100);
        history.record(&a, &b, "add page");

        let (restored, desc) = history.undo().unwrap();
        assert!(Arc::ptr_eq(&restored, &a));
        assert_eq!(desc, "add page");
        assert!(history.can_redo());

        let (restored, _) = history.redo().unwrap();
        assert!(Arc::ptr_eq(&restored, &b));
        assert!(!history.can_redo());
    }

    #[test]
    fn redo_clears_on_new_record() {
        let a = state(&["a"]);
        let b = state(&["b"]);
        let mut history = History::new(100);
        history.record(&a, &b, "one");
        history.undo();
        assert!(history.can_redo());
        history.record(&a, &b, "two");
        assert!(!history.can_redo());
    }

    #[test]
    fn max_depth_trims_oldest() {
        let mut history = History::new(3);
        let a = state(&["a"]);
        for _ in 0..5 {
            history.record(&a, &a, "noop");
        }
        let mut undo_count = 0;
        while history.undo().is_some() {
            undo_count += 1;
        }
        assert_eq!(undo_count, 3);
    }

    #[test]
    fn batch_collapses_into_one_entry() {
        let a = state(&["a"]);
        let b = state(&["a", "b"]);
        let c = state(&["a", "b", "c"]);
        let mut history = History::new(100);

        history.begin_batch(&a);
        history.record(&a, &b, "drag");
        history.begin_batch(&b);
        history.record(&b, &c, "drag");
        history.end_batch(&c);
        assert!(history.undo().is_none());
        history.end_batch(&c);

        let (restored, _) = history.undo().unwrap();
        assert!(Arc::ptr_eq(&restored, &a));
        assert!(!history.can_undo());
    }

    #[test]
    fn empty_batch_no_undo_entry() {
        let a = state(&["a"]);
        let mut history = History::new(100);
        history.begin_batch(&a);
        history.end_batch(&a);
        assert!(!history.can_undo());
    }
}
