//! Page list management.

use std::sync::Arc;
use ws_core::patch::{RESERVED_PAGE_KEYS, apply_patch};
use ws_core::{AnimationState, Page, PageId, StoryState, Update, create_default_background};

/// Insert `page` at `position` (the end by default) and make it current.
/// A page arriving without a background gets a fresh default one.
pub fn add_page(state: &StoryState, mut page: Page, position: Option<usize>) -> Option<StoryState> {
    if state.page_index(page.id).is_some() {
        log::debug!("add_page: page {} already exists", page.id);
        return None;
    }
    if page.background().is_none() {
        for element in page.elements.iter_mut().filter(|e| e.is_background) {
            Arc::make_mut(element).is_background = false;
        }
        page.elements.insert(0, Arc::new(create_default_background()));
    }
    let position = position.unwrap_or(state.pages.len()).min(state.pages.len());

    let mut next = state.clone();
    next.current = Some(page.id);
    next.pages.insert(position, Arc::new(page));
    next.selection.clear();
    next.animation_state = AnimationState::Reset;
    Some(next)
}

/// Remove a page. The last remaining page is never deleted; deleting the
/// current page moves `current` to the page after it, or before it at the end.
pub fn delete_page(state: &StoryState, page_id: PageId) -> Option<StoryState> {
    let index = state.page_index(page_id)?;
    if state.pages.len() <= 1 {
        return None;
    }
    let mut next = state.clone();
    next.pages.remove(index);
    if state.current == Some(page_id) {
        let neighbour = index.min(next.pages.len() - 1);
        next.current = Some(next.pages[neighbour].id);
        next.animation_state = AnimationState::Reset;
    }
    next.selection.clear();
    Some(next)
}

/// Merge `update` into a page's own properties; `None` targets the current
/// page. Element, animation and group collections cannot be patched here.
pub fn update_page_properties(
    state: &StoryState,
    page_id: Option<PageId>,
    update: &Update<Page>,
) -> Option<StoryState> {
    let index = match page_id {
        Some(page_id) => state.page_index(page_id)?,
        None => state.current_page_index()?,
    };
    let page = &state.pages[index];
    let patched = apply_patch(page.as_ref(), update.resolve(page), RESERVED_PAGE_KEYS)?;
    let mut next = state.clone();
    next.pages[index] = Arc::new(patched);
    Some(next)
}

/// Switch the current page. Selection is cleared and playback reset.
pub fn set_current_page(state: &StoryState, page_id: PageId) -> Option<StoryState> {
    if state.current == Some(page_id) || state.page_index(page_id).is_none() {
        return None;
    }
    let mut next = state.clone();
    next.current = Some(page_id);
    next.selection.clear();
    next.animation_state = AnimationState::Reset;
    Some(next)
}

/// Move a page to `position`, clamped to the page list.
pub fn arrange_page(state: &StoryState, page_id: PageId, position: usize) -> Option<StoryState> {
    let index = state.page_index(page_id)?;
    let position = position.min(state.pages.len() - 1);
    if position == index {
        return None;
    }
    let mut next = state.clone();
    let page = next.pages.remove(index);
    next.pages.insert(position, page);
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use ws_core::props;

    fn three_pages() -> StoryState {
        let mut state = story("bg", vec![shape("a")]);
        state.pages.push(Arc::new(Page::new(id("p2"))));
        state.pages.push(Arc::new(Page::new(id("p3"))));
        state.selection = [id("a")].into_iter().collect();
        state
    }

    fn page_ids(state: &StoryState) -> Vec<String> {
        state.pages.iter().map(|p| p.id.as_str().to_string()).collect()
    }

    #[test]
    fn add_page_becomes_current() {
        let state = three_pages();
        let next = add_page(&state, Page::new(id("p4")), Some(1)).unwrap();
        assert_eq!(page_ids(&next), ["p1", "p4", "p2", "p3"]);
        assert_eq!(next.current, Some(id("p4")));
        assert!(next.selection.is_empty());
        assert!(add_page(&next, Page::new(id("p4")), None).is_none());
    }

    #[test]
    fn add_page_without_background_gets_default() {
        let state = three_pages();
        let bare = Page::with_elements(id("bare"), vec![shape("loose")]);
        let next = add_page(&state, bare, None).unwrap();
        let page = next.current_page().unwrap();
        assert!(page.elements[0].is_default_background);
        assert_eq!(page.elements.len(), 2);
        assert!(next.check_invariants().is_ok());
    }

    #[test]
    fn delete_current_page_moves_to_neighbour() {
        let state = three_pages();
        let next = delete_page(&state, id("p1")).unwrap();
        assert_eq!(page_ids(&next), ["p2", "p3"]);
        assert_eq!(next.current, Some(id("p2")));

        let at_end = set_current_page(&state, id("p3")).unwrap();
        let next = delete_page(&at_end, id("p3")).unwrap();
        assert_eq!(next.current, Some(id("p2")));
        assert!(next.check_invariants().is_ok());
    }

    #[test]
    fn last_page_is_never_deleted() {
        let state = story("bg", vec![]);
        assert!(delete_page(&state, id("p1")).is_none());
        assert!(delete_page(&state, id("ghost")).is_none());
    }

    #[test]
    fn update_page_properties_keeps_structure() {
        let state = three_pages();
        let update = Update::Literal(props(json!({"backgroundColor": "#fff", "elements": []})));
        let next = update_page_properties(&state, None, &update).unwrap();
        let page = next.current_page().unwrap();
        assert_eq!(page.extra["backgroundColor"], json!("#fff"));
        assert_eq!(page.elements.len(), 2);
        assert!(update_page_properties(&next, None, &update).is_none());
    }

    #[test]
    fn set_current_page_clears_selection() {
        let state = three_pages();
        let next = set_current_page(&state, id("p2")).unwrap();
        assert_eq!(next.current, Some(id("p2")));
        assert!(next.selection.is_empty());
        assert!(set_current_page(&next, id("p2")).is_none());
        assert!(set_current_page(&next, id("ghost")).is_none());
    }

    #[test]
    fn arrange_page_clamps() {
        let state = three_pages();
        let next = arrange_page(&state, id("p1"), 99).unwrap();
        assert_eq!(page_ids(&next), ["p2", "p3", "p1"]);
        assert!(arrange_page(&next, id("p1"), 2).is_none());
    }
}
