//! The story container the editor UI talks to.

use crate::action::{Action, reduce};
use crate::config::EditorConfig;
use crate::history::History;
use crate::layers::get_layer_arrangement;
use crate::reducer::SelectionUpdate;
use std::sync::Arc;
use ws_core::{ElementId, StoryState};

/// Owns the current story state and its undo history.
#[derive(Debug)]
pub struct StoryStore {
    state: Arc<StoryState>,
    history: History,
}

/// Whether going from `before` to `after` is worth an undo step: page
/// content, page list, current page or story metadata changed.
fn is_tracked_change(before: &StoryState, after: &StoryState) -> bool {
    before.current != after.current
        || before.story != after.story
        || before.pages.len() != after.pages.len()
        || before
            .pages
            .iter()
            .zip(&after.pages)
            .any(|(a, b)| !Arc::ptr_eq(a, b))
}

impl StoryStore {
    pub fn new(state: StoryState, config: &EditorConfig) -> Self {
        Self {
            state: Arc::new(state),
            history: History::new(config.history_depth),
        }
    }

    pub fn state(&self) -> &Arc<StoryState> {
        &self.state
    }

    /// Apply `action`. Returns whether the state changed.
    pub fn dispatch(&mut self, action: Action) -> bool {
        let description = action.name();
        let next = reduce(&self.state, action);
        if Arc::ptr_eq(&next, &self.state) {
            return false;
        }
        if is_tracked_change(&self.state, &next) {
            self.history.record(&self.state, &next, description);
        }
        self.state = next;
        true
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some((state, description)) => {
                log::debug!("undo: {description}");
                self.state = state;
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some((state, description)) => {
                log::debug!("redo: {description}");
                self.state = state;
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Group the following dispatches into one undo step (drag gestures).
    pub fn begin_batch(&mut self) {
        self.history.begin_batch(&self.state);
    }

    pub fn end_batch(&mut self) {
        self.history.end_batch(&self.state);
    }

    /// Replace the whole state and forget the history.
    pub fn reset(&mut self, state: StoryState) {
        self.state = Arc::new(state);
        self.history.clear();
    }

    // ─── Shortcuts ────────────────────────────────────────────────────────

    /// Select every non-background element on the current page.
    pub fn select_all(&mut self) -> bool {
        let ids: Vec<ElementId> = self
            .state
            .current_page()
            .map(|page| {
                page.elements
                    .iter()
                    .filter(|e| !e.is_background)
                    .map(|e| e.id)
                    .collect()
            })
            .unwrap_or_default();
        self.dispatch(Action::SetSelectedElementsById {
            update: SelectionUpdate::Ids(ids),
            with_linked: false,
        })
    }

    pub fn clear_selection(&mut self) -> bool {
        self.dispatch(Action::SetSelectedElementsById {
            update: SelectionUpdate::Ids(Vec::new()),
            with_linked: false,
        })
    }

    pub fn duplicate_selection(&mut self) -> bool {
        let element_ids = self.state.selection.to_vec();
        self.dispatch(Action::DuplicateElementsById { element_ids })
    }

    /// Resolve an arrow key on the selected layer and apply it.
    pub fn arrange_by_key(&mut self, key: &str, shift: bool) -> bool {
        let action = {
            let Some(page) = self.state.current_page() else {
                return false;
            };
            let selection = self.state.selection.as_slice();
            get_layer_arrangement(key, shift, selection, &page.elements)
                .map(|arrangement| arrangement.into_action(selection[0]))
        };
        match action {
            Some(action) => self.dispatch(action),
            None => false,
        }
    }
}
