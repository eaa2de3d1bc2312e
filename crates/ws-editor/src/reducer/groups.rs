//! Layer groups on the current page.

use super::elements::remove_elements;
use super::{current_page, edit_current_page, with_page};
use std::collections::HashSet;
use std::sync::Arc;
use ws_core::patch::apply_patch;
use ws_core::{Element, ElementId, Group, GroupId, Page, StoryState, Update};

/// Register a new, empty group. No-op if the id is taken.
pub fn add_group(
    state: &StoryState,
    group_id: GroupId,
    name: impl Into<String>,
    is_locked: bool,
) -> Option<StoryState> {
    let name = name.into();
    edit_current_page(state, |page| {
        if page.groups.contains_key(&group_id) {
            return false;
        }
        page.groups.insert(
            group_id,
            Group {
                name,
                is_locked,
                is_collapsed: false,
            },
        );
        true
    })
}

/// Merge `update` into the group's properties.
pub fn update_group_by_id(
    state: &StoryState,
    group_id: GroupId,
    update: &Update<Group>,
) -> Option<StoryState> {
    let (index, page) = current_page(state)?;
    let group = page.groups.get(&group_id)?;
    let next_group = apply_patch(group, update.resolve(group), &[])?;
    let mut draft = Page::clone(page);
    draft.groups.insert(group_id, next_group);
    Some(with_page(state, index, draft))
}

/// Dissolve a group; members stay where they are, ungrouped.
pub fn delete_group_by_id(state: &StoryState, group_id: GroupId) -> Option<StoryState> {
    edit_current_page(state, |page| {
        if page.groups.remove(&group_id).is_none() {
            return false;
        }
        for element in page.elements.iter_mut() {
            if element.group_id == Some(group_id) {
                Arc::make_mut(element).group_id = None;
            }
        }
        true
    })
}

/// Delete a group together with every member.
pub fn delete_group_and_elements_by_id(
    state: &StoryState,
    group_id: GroupId,
) -> Option<StoryState> {
    let (_, page) = current_page(state)?;
    if !page.groups.contains_key(&group_id) {
        return None;
    }
    let members: HashSet<ElementId> = page
        .group_members(group_id)
        .into_iter()
        .map(|(_, e)| e.id)
        .collect();
    let mut next = edit_current_page(state, |page| {
        page.groups.remove(&group_id);
        remove_elements(page, &members);
        true
    })?;
    next.selection.retain(|id| !members.contains(&*id));
    Some(next)
}

/// Take `element_id` out of `group_id` and park it directly above the
/// group's topmost remaining member. The group goes away once empty.
pub fn remove_element_from_group(
    state: &StoryState,
    element_id: ElementId,
    group_id: GroupId,
) -> Option<StoryState> {
    let (index, page) = current_page(state)?;
    let position = page.element_index(element_id)?;
    if page.elements[position].group_id != Some(group_id) {
        return None;
    }
    let members = page.group_members(group_id);
    let top = members.last().map_or(position, |(i, _)| *i);
    let emptied = members.len() == 1;

    let mut draft = Page::clone(page);
    let mut element = Element::clone(&draft.elements.remove(position));
    element.group_id = None;
    draft.elements.insert(top, Arc::new(element));
    if emptied {
        log::trace!("remove_element_from_group: group {group_id} is now empty");
        draft.groups.remove(&group_id);
    }
    Some(with_page(state, index, draft))
}
