//! Duplicating elements and groups.

use super::{current_page, with_page};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;
use ws_core::{
    Animation, AnimationState, Element, ElementId, Group, GroupId, Id, Page, StoryState,
};

/// Distance, on both axes, between an element and its duplicate.
pub const DUPLICATE_OFFSET: f64 = 30.0;

/// Gives up looking for a free slot after this many steps.
const MAX_OFFSET_STEPS: usize = 64;

/// Copy of `element` with a fresh id, shifted by [`DUPLICATE_OFFSET`] until
/// its origin does not coincide with any in `occupied`.
fn offset_copy(element: &Element, occupied: &mut Vec<(f64, f64)>) -> Element {
    let mut copy = element.clone();
    copy.id = Id::generate();
    let (mut x, mut y) = (element.x + DUPLICATE_OFFSET, element.y + DUPLICATE_OFFSET);
    for _ in 0..MAX_OFFSET_STEPS {
        if !occupied.contains(&(x, y)) {
            break;
        }
        x += DUPLICATE_OFFSET;
        y += DUPLICATE_OFFSET;
    }
    copy.x = x;
    copy.y = y;
    occupied.push((x, y));
    copy
}

/// Clone every animation whose targets all got duplicated, pointing the
/// clone at the duplicates.
fn clone_animations(
    animations: &[Animation],
    remap: &HashMap<ElementId, ElementId>,
) -> Vec<Animation> {
    animations
        .iter()
        .filter(|a| !a.targets.is_empty() && a.targets.iter().all(|t| remap.contains_key(t)))
        .map(|a| {
            let mut copy = a.clone();
            copy.id = Id::generate();
            copy.targets = a.targets.iter().map(|t| remap[t]).collect();
            copy
        })
        .collect()
}

fn origins(page: &Page) -> Vec<(f64, f64)> {
    page.elements.iter().map(|e| (e.x, e.y)).collect()
}

pub fn duplicate_element_by_id(state: &StoryState, element_id: ElementId) -> Option<StoryState> {
    duplicate_elements_by_id(state, &[element_id])
}

/// Duplicate each listed element directly above its original and select
/// the duplicates. Background elements and unknown ids are skipped.
pub fn duplicate_elements_by_id(
    state: &StoryState,
    element_ids: &[ElementId],
) -> Option<StoryState> {
    let (index, page) = current_page(state)?;
    let mut draft = Page::clone(page);
    let mut occupied = origins(page);
    let mut remap: HashMap<ElementId, ElementId> = HashMap::new();
    let mut selection: SmallVec<[ElementId; 4]> = SmallVec::new();

    for &element_id in element_ids {
        if remap.contains_key(&element_id) {
            continue;
        }
        let Some(position) = draft.element_index(element_id) else {
            continue;
        };
        if draft.elements[position].is_background {
            log::trace!("duplicate: skipping background {element_id}");
            continue;
        }
        let copy = offset_copy(&draft.elements[position], &mut occupied);
        remap.insert(element_id, copy.id);
        selection.push(copy.id);
        draft.elements.insert(position + 1, Arc::new(copy));
    }
    if selection.is_empty() {
        return None;
    }
    draft.animations.extend(clone_animations(&page.animations, &remap));

    let mut next = with_page(state, index, draft);
    next.selection = selection;
    next.animation_state = AnimationState::Reset;
    Some(next)
}

/// Duplicate a whole group into a new group placed on top of the page.
///
/// Every member must be a known, duplicable type and none may be the
/// background. The new group is named `name`, or `"<name> Copy"`.
pub fn duplicate_group_by_id(
    state: &StoryState,
    group_id: GroupId,
    new_group_id: Option<GroupId>,
    name: Option<String>,
) -> Option<StoryState> {
    let (index, page) = current_page(state)?;
    let group = page.groups.get(&group_id)?;
    let members = page.group_members(group_id);
    if members.is_empty()
        || members
            .iter()
            .any(|(_, e)| e.is_background || !e.kind.can_duplicate())
    {
        log::debug!("duplicate_group: group {group_id} cannot be duplicated");
        return None;
    }
    let new_group_id = new_group_id.unwrap_or_else(Id::generate);
    if page.groups.contains_key(&new_group_id) {
        return None;
    }

    let mut draft = Page::clone(page);
    let mut occupied = origins(page);
    let mut remap: HashMap<ElementId, ElementId> = HashMap::new();
    let mut selection: SmallVec<[ElementId; 4]> = SmallVec::new();
    for (_, member) in &members {
        let mut copy = offset_copy(member, &mut occupied);
        copy.group_id = Some(new_group_id);
        remap.insert(member.id, copy.id);
        selection.push(copy.id);
        draft.elements.push(Arc::new(copy));
    }
    draft.groups.insert(
        new_group_id,
        Group {
            name: name.unwrap_or_else(|| format!("{} Copy", group.name)),
            ..group.clone()
        },
    );
    draft.animations.extend(clone_animations(&page.animations, &remap));

    let mut next = with_page(state, index, draft);
    next.selection = selection;
    next.animation_state = AnimationState::Reset;
    Some(next)
}
