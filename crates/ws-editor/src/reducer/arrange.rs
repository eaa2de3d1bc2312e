//! Z-order arrangement of elements and groups on the current page.
//!
//! The background sits at index 0 and never moves; every other element lives
//! in `1..=len-1`.

use super::{current_page, with_page};
use std::sync::Arc;
use ws_core::{Element, ElementId, GroupId, Page, StoryState};

/// Where to move an element in the paint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerPosition {
    /// Absolute index, clamped to the legal range.
    Index(usize),
    /// Topmost slot.
    Front,
    /// Lowest slot above the background.
    Back,
    /// One slot up.
    Forward,
    /// One slot down.
    Backward,
}

/// What happens to the moved element's group membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupMembership {
    /// Keep whatever group the element is in.
    #[default]
    Unchanged,
    /// Join this group (it must exist on the page).
    Join(GroupId),
    /// Leave the current group.
    Leave,
}

fn resolve_position(current: usize, min: usize, max: usize, desired: LayerPosition) -> usize {
    match desired {
        LayerPosition::Index(index) => index.clamp(min, max),
        LayerPosition::Front => max,
        LayerPosition::Back => min,
        LayerPosition::Forward => (current + 1).min(max),
        LayerPosition::Backward => current.saturating_sub(1).max(min),
    }
}

/// Move one non-background element to `position`, optionally changing its
/// group. With no `element_id`, the single selected element is moved.
///
/// Returns `None` when the page has fewer than three elements, the target is
/// the background, or neither position nor membership would change.
pub fn arrange_element(
    state: &StoryState,
    element_id: Option<ElementId>,
    position: LayerPosition,
    membership: GroupMembership,
) -> Option<StoryState> {
    let (index, page) = current_page(state)?;
    if page.elements.len() < 3 {
        return None;
    }
    let target = match element_id {
        Some(id) => id,
        None if state.selection.len() == 1 => state.selection[0],
        None => return None,
    };
    let current = page.element_index(target)?;
    let element = &page.elements[current];
    if element.is_background {
        log::trace!("arrange_element: {target} is the background");
        return None;
    }

    let new_position = resolve_position(current, 1, page.elements.len() - 1, position);
    let group_change: Option<Option<GroupId>> = match membership {
        GroupMembership::Unchanged => None,
        GroupMembership::Join(group_id) => {
            if !page.groups.contains_key(&group_id) {
                log::debug!("arrange_element: unknown group {group_id}");
                return None;
            }
            (element.group_id != Some(group_id)).then_some(Some(group_id))
        }
        GroupMembership::Leave => element.group_id.is_some().then_some(None),
    };
    if new_position == current && group_change.is_none() {
        return None;
    }

    let mut draft = Page::clone(page);
    let mut moved = draft.elements.remove(current);
    if let Some(group_id) = group_change {
        let mut element = Element::clone(&moved);
        element.group_id = group_id;
        moved = Arc::new(element);
    }
    draft.elements.insert(new_position, moved);
    Some(with_page(state, index, draft))
}

/// Move every member of `group_id` as one contiguous block, keeping their
/// relative order, so the block's lowest member lands at `position`.
pub fn arrange_group(state: &StoryState, group_id: GroupId, position: usize) -> Option<StoryState> {
    let (index, page) = current_page(state)?;
    let members: Vec<usize> = page
        .group_members(group_id)
        .into_iter()
        .map(|(i, _)| i)
        .collect();
    let (&first, &last) = (members.first()?, members.last()?);

    let (block, rest): (Vec<Arc<Element>>, Vec<Arc<Element>>) = page
        .elements
        .iter()
        .cloned()
        .partition(|e| e.group_id == Some(group_id));
    if rest.is_empty() {
        return None;
    }
    let insert_at = position.clamp(1, rest.len());
    let contiguous = last - first + 1 == members.len();
    if contiguous && insert_at == first {
        return None;
    }

    let mut draft = Page::clone(page);
    let mut elements = rest;
    elements.splice(insert_at..insert_at, block);
    draft.elements = elements;
    Some(with_page(state, index, draft))
}
