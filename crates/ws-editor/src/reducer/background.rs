//! Promoting elements to the page background and restoring the default.

use super::elements::{prune_animations, restore_default_background};
use super::{current_page, with_page};
use std::collections::HashSet;
use std::sync::Arc;
use ws_core::{Element, ElementId, Page, StoryState};

/// Make `element_id` the background of the current page.
///
/// The element moves to index 0 and leaves its group; its opacity resets to
/// 100 only if it had one. The previous background is removed together with
/// its animations; a default background is kept as the page's saved default
/// so it can be restored later.
pub fn set_background_element(state: &StoryState, element_id: ElementId) -> Option<StoryState> {
    let (index, page) = current_page(state)?;
    let mut position = page.element_index(element_id)?;
    if page.elements[position].is_background {
        return None;
    }

    let mut draft = Page::clone(page);
    let previous = if draft.background().is_some() {
        position -= 1;
        Some(draft.elements.remove(0))
    } else {
        None
    };

    let mut promoted = Element::clone(&draft.elements.remove(position));
    promoted.is_background = true;
    promoted.is_default_background = false;
    promoted.group_id = None;
    if promoted.opacity.is_some() {
        promoted.opacity = Some(100.0);
    }
    draft.elements.insert(0, Arc::new(promoted));

    let mut dropped: HashSet<ElementId> = HashSet::from([element_id]);
    if let Some(previous) = previous {
        dropped.insert(previous.id);
        prune_animations(&mut draft, &HashSet::from([previous.id]));
        if previous.is_default_background {
            draft.default_background_element = Some(previous);
        }
    }

    let mut next = with_page(state, index, draft);
    next.selection.retain(|id| !dropped.contains(&*id));
    Some(next)
}

/// Replace a real background with the saved (or a fresh) default one.
pub fn clear_background_element(state: &StoryState) -> Option<StoryState> {
    let (index, page) = current_page(state)?;
    let background = page.background()?;
    if background.is_default_background {
        return None;
    }
    let removed = HashSet::from([background.id]);

    let mut draft = Page::clone(page);
    draft.elements.remove(0);
    restore_default_background(&mut draft);
    prune_animations(&mut draft, &removed);

    let mut next = with_page(state, index, draft);
    next.selection.retain(|id| !removed.contains(&*id));
    Some(next)
}
