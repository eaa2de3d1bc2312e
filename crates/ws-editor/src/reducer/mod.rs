//! Story reducer: pure state transitions over a [`StoryState`].
//!
//! Every operation takes the current state by reference and returns
//! `Some(next)` when something changed or `None` when it did not apply.
//! Nothing here panics or errors on bad input: unknown ids, empty lists and
//! out-of-range positions all resolve to `None`. [`crate::action::reduce`]
//! turns `None` back into the same `Arc`, which is what callers compare to
//! detect changes.
//!
//! Transitions are copy-on-write: `StoryState` and `Page` clones only copy
//! `Arc` handles, and only the page that changed gets a new allocation.

mod arrange;
mod background;
mod combine;
mod duplicate;
mod elements;
mod groups;
mod pages;
mod selection;
mod story;

pub use arrange::{GroupMembership, LayerPosition, arrange_element, arrange_group};
pub use background::{clear_background_element, set_background_element};
pub use combine::combine_elements;
pub use duplicate::{
    DUPLICATE_OFFSET, duplicate_element_by_id, duplicate_elements_by_id, duplicate_group_by_id,
};
pub use elements::{
    add_animations, add_element, add_elements, add_elements_across_pages, delete_element_by_id,
    delete_elements_by_id, delete_elements_by_resource_id, delete_selected_elements,
    update_element_by_id, update_elements_by_id, update_elements_by_resource_id,
};
pub use groups::{
    add_group, delete_group_and_elements_by_id, delete_group_by_id, remove_element_from_group,
    update_group_by_id,
};
pub use pages::{add_page, arrange_page, delete_page, set_current_page, update_page_properties};
pub use selection::{
    add_element_to_selection, set_selected_elements_by_id, toggle_element_in_selection,
    toggle_layer, unselect_element, SelectionUpdate,
};
pub use story::{
    COPYABLE_STYLE_KEYS, copy_selected_element, restore, update_animation_state, update_story,
};

use std::sync::Arc;
use ws_core::{Page, StoryState};

/// The current page with its index, if the story has one.
pub(crate) fn current_page(state: &StoryState) -> Option<(usize, &Arc<Page>)> {
    let index = state.current_page_index()?;
    Some((index, &state.pages[index]))
}

/// `state` with the page at `index` replaced.
pub(crate) fn with_page(state: &StoryState, index: usize, page: Page) -> StoryState {
    let mut next = state.clone();
    next.pages[index] = Arc::new(page);
    next
}

/// Run `f` against a working copy of the current page and commit it when
/// `f` reports a change.
pub(crate) fn edit_current_page(
    state: &StoryState,
    f: impl FnOnce(&mut Page) -> bool,
) -> Option<StoryState> {
    let (index, page) = current_page(state)?;
    let mut draft = Page::clone(page);
    if !f(&mut draft) {
        return None;
    }
    Some(with_page(state, index, draft))
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Small builders shared by the reducer unit tests.

    use std::sync::Arc;
    use ws_core::{Element, ElementType, Group, Id, Page, StoryState, create_element};

    pub fn id(s: &str) -> Id {
        Id::intern(s)
    }

    pub fn background(name: &str) -> Element {
        let mut bg = create_element(id(name), ElementType::Shape, 0.0, 0.0, 1.0, 1.0);
        bg.is_background = true;
        bg
    }

    pub fn shape(name: &str) -> Element {
        create_element(id(name), ElementType::Shape, 10.0, 10.0, 50.0, 50.0)
    }

    pub fn grouped(name: &str, group: &str) -> Element {
        let mut element = shape(name);
        element.group_id = Some(id(group));
        element
    }

    /// One page: a background named `bg_name` followed by `others`.
    pub fn story(bg_name: &str, others: Vec<Element>) -> StoryState {
        let mut elements = vec![background(bg_name)];
        elements.extend(others);
        let mut page = Page::with_elements(id("p1"), elements);
        let group_ids: Vec<Id> = page.elements.iter().filter_map(|e| e.group_id).collect();
        for group_id in group_ids {
            page.groups
                .entry(group_id)
                .or_insert_with(|| Group::named(group_id.as_str()));
        }
        StoryState::with_pages(vec![page])
    }

    pub fn element_ids(state: &StoryState) -> Vec<String> {
        state
            .current_page()
            .map(|p| p.elements.iter().map(|e| e.id.as_str().to_string()).collect())
            .unwrap_or_default()
    }

    pub fn selection(state: &StoryState) -> Vec<String> {
        state.selection.iter().map(|id| id.as_str().to_string()).collect()
    }

    pub fn element<'a>(state: &'a StoryState, name: &str) -> &'a Arc<Element> {
        state.element(id(name)).expect("element on current page")
    }
}
