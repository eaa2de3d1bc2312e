//! Selection management.
//!
//! The selection is an ordered set of element ids on the current page.
//! Background, locked and video-placeholder elements are only ever selected
//! on their own. Any change to the selected set resets the animation state.

use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;
use ws_core::{AnimationState, ElementId, Page, StoryState};

type Selection = SmallVec<[ElementId; 4]>;

/// New selection as a literal id list or computed from the current one.
#[derive(Clone)]
pub enum SelectionUpdate {
    Ids(Vec<ElementId>),
    Updater(Arc<dyn Fn(&[ElementId]) -> Vec<ElementId> + Send + Sync>),
}

impl SelectionUpdate {
    pub fn updater(f: impl Fn(&[ElementId]) -> Vec<ElementId> + Send + Sync + 'static) -> Self {
        Self::Updater(Arc::new(f))
    }

    fn resolve(&self, current: &[ElementId]) -> Vec<ElementId> {
        match self {
            Self::Ids(ids) => ids.clone(),
            Self::Updater(f) => f(current),
        }
    }
}

impl fmt::Debug for SelectionUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ids(ids) => f.debug_tuple("Ids").field(ids).finish(),
            Self::Updater(_) => f.write_str("Updater(..)"),
        }
    }
}

impl From<Vec<ElementId>> for SelectionUpdate {
    fn from(ids: Vec<ElementId>) -> Self {
        Self::Ids(ids)
    }
}

fn requires_sole_selection(page: &Page, id: ElementId) -> bool {
    page.element(id).is_some_and(|e| e.requires_sole_selection())
}

/// `id` plus, when `with_linked`, every other member of its group.
fn linked_ids(page: &Page, id: ElementId, with_linked: bool) -> Selection {
    let group_id = page.element(id).and_then(|e| e.group_id);
    match group_id {
        Some(group_id) if with_linked => {
            let mut ids: Selection = SmallVec::from_elem(id, 1);
            ids.extend(
                page.group_members(group_id)
                    .into_iter()
                    .map(|(_, e)| e.id)
                    .filter(|member| *member != id),
            );
            ids
        }
        _ => SmallVec::from_elem(id, 1),
    }
}

fn push_unique(selection: &mut Selection, ids: impl IntoIterator<Item = ElementId>) {
    for id in ids {
        if !selection.contains(&id) {
            selection.push(id);
        }
    }
}

/// Replace the selection if the resolved set differs from the current one.
fn commit(state: &StoryState, selection: Selection) -> Option<StoryState> {
    let unchanged = selection.len() == state.selection.len()
        && selection.iter().all(|id| state.selection.contains(id));
    if unchanged {
        return None;
    }
    let mut next = state.clone();
    next.selection = selection;
    next.animation_state = AnimationState::Reset;
    Some(next)
}

/// Select exactly `ids` on the current page.
///
/// Unknown ids and duplicates are dropped. In a multi-selection, elements
/// that must be selected alone are dropped, unless that would leave nothing,
/// in which case the first candidate is kept. With `with_linked`, group
/// siblings of each selected element are added.
pub fn set_selected_elements_by_id(
    state: &StoryState,
    update: &SelectionUpdate,
    with_linked: bool,
) -> Option<StoryState> {
    let page = state.current_page()?;
    let mut selection = Selection::new();
    for id in update.resolve(&state.selection) {
        if page.contains(id) {
            push_unique(&mut selection, linked_ids(page, id, with_linked));
        }
    }
    if selection.len() > 1 {
        let first = selection[0];
        selection.retain(|id| !requires_sole_selection(page, *id));
        if selection.is_empty() {
            selection.push(first);
        }
    }
    commit(state, selection)
}

/// Remove `element_id` from the selection if present, otherwise add it.
pub fn toggle_element_in_selection(
    state: &StoryState,
    element_id: ElementId,
    with_linked: bool,
) -> Option<StoryState> {
    let page = state.current_page()?;
    let element = page.element(element_id)?;
    let linked = linked_ids(page, element_id, with_linked);

    let selection: Selection = if state.is_selected(element_id) {
        state
            .selection
            .iter()
            .copied()
            .filter(|id| !linked.contains(id))
            .collect()
    } else if element.requires_sole_selection() {
        SmallVec::from_elem(element_id, 1)
    } else {
        let mut selection: Selection = state
            .selection
            .iter()
            .copied()
            .filter(|id| !requires_sole_selection(page, *id))
            .collect();
        push_unique(
            &mut selection,
            linked.into_iter().filter(|id| !requires_sole_selection(page, *id)),
        );
        selection
    };
    commit(state, selection)
}

/// Add `element_id` to the selection (never removes it).
pub fn add_element_to_selection(state: &StoryState, element_id: ElementId) -> Option<StoryState> {
    if state.is_selected(element_id) {
        return None;
    }
    let page = state.current_page()?;
    let element = page.element(element_id)?;
    let selection: Selection = if element.requires_sole_selection() {
        SmallVec::from_elem(element_id, 1)
    } else {
        let mut selection: Selection = state
            .selection
            .iter()
            .copied()
            .filter(|id| !requires_sole_selection(page, *id))
            .collect();
        selection.push(element_id);
        selection
    };
    commit(state, selection)
}

pub fn unselect_element(state: &StoryState, element_id: ElementId) -> Option<StoryState> {
    if !state.is_selected(element_id) {
        return None;
    }
    let selection = state
        .selection
        .iter()
        .copied()
        .filter(|id| *id != element_id)
        .collect();
    commit(state, selection)
}

/// Selection from a click in the layer panel.
///
/// Meta toggles the layer; shift selects the range between the anchor (the
/// first selected element) and this layer, anchor first; a plain click
/// selects only this layer.
pub fn toggle_layer(
    state: &StoryState,
    element_id: ElementId,
    meta_key: bool,
    shift_key: bool,
    with_linked: bool,
) -> Option<StoryState> {
    if meta_key {
        return toggle_element_in_selection(state, element_id, with_linked);
    }
    if shift_key && let Some(&anchor) = state.selection.first() {
        let page = state.current_page()?;
        let from = page.element_index(anchor)?;
        let to = page.element_index(element_id)?;
        let mut range: Vec<ElementId> = page.elements[from.min(to)..=from.max(to)]
            .iter()
            .map(|e| e.id)
            .collect();
        if to < from {
            range.reverse();
        }
        return set_selected_elements_by_id(state, &SelectionUpdate::Ids(range), with_linked);
    }
    set_selected_elements_by_id(state, &SelectionUpdate::Ids(vec![element_id]), with_linked)
}
