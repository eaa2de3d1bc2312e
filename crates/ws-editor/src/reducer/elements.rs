//! Adding, updating and deleting elements.

use super::{current_page, edit_current_page, with_page};
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use ws_core::patch::{RESERVED_ELEMENT_KEYS, apply_patch};
use ws_core::{
    Animation, AnimationState, Element, ElementId, Id, Page, ResourceId, StoryState, Update,
    create_default_background,
};

/// Prepare an incoming element for `page`: background flags are owned by the
/// background operations, and a group reference must resolve on this page.
fn admit(mut element: Element, page: &Page) -> Element {
    element.is_background = false;
    element.is_default_background = false;
    if let Some(group_id) = element.group_id
        && !page.groups.contains_key(&group_id)
    {
        log::debug!("admit: dropping unknown group {group_id} from {}", element.id);
        element.group_id = None;
    }
    element
}

/// Append `element` to the current page and select it.
pub fn add_element(state: &StoryState, element: Element) -> Option<StoryState> {
    add_elements(state, vec![element])
}

/// Append every element whose id is not already on the current page, in
/// order, and select exactly the ones that were added.
pub fn add_elements(state: &StoryState, elements: Vec<Element>) -> Option<StoryState> {
    if elements.is_empty() {
        return None;
    }
    let mut added: SmallVec<[ElementId; 4]> = SmallVec::new();
    let mut next = edit_current_page(state, |page| {
        let mut seen: HashSet<ElementId> = page.elements.iter().map(|e| e.id).collect();
        for element in elements {
            if !seen.insert(element.id) {
                log::trace!("add_elements: {} already on page", element.id);
                continue;
            }
            added.push(element.id);
            let element = admit(element, page);
            page.elements.push(Arc::new(element));
        }
        !added.is_empty()
    })?;
    next.selection = added;
    Some(next)
}

/// Create one page per element from `template` and insert them at
/// `position`. Current page and selection stay as they are.
pub fn add_elements_across_pages(
    state: &StoryState,
    elements: Vec<Element>,
    template: &Page,
    position: usize,
) -> Option<StoryState> {
    if elements.is_empty() {
        return None;
    }
    let position = position.min(state.pages.len());
    let new_pages: Vec<Arc<Page>> = elements
        .into_iter()
        .map(|element| {
            let mut page = rekey_page(template);
            let element = admit(element, &page);
            page.elements.push(Arc::new(element));
            Arc::new(page)
        })
        .collect();

    let mut next = state.clone();
    next.pages.splice(position..position, new_pages);
    next.animation_state = AnimationState::Reset;
    Some(next)
}

/// Copy of `template` with fresh page, element and animation ids.
fn rekey_page(template: &Page) -> Page {
    let mut page = template.clone();
    page.id = Id::generate();

    let mut remap: HashMap<ElementId, ElementId> = HashMap::new();
    page.elements = template
        .elements
        .iter()
        .map(|e| {
            let mut copy = Element::clone(e);
            copy.id = Id::generate();
            remap.insert(e.id, copy.id);
            Arc::new(copy)
        })
        .collect();
    if page.background().is_none() {
        page.elements.insert(0, Arc::new(create_default_background()));
    }
    page.animations = template
        .animations
        .iter()
        .map(|a| {
            let mut copy = a.clone();
            copy.id = Id::generate();
            for target in copy.targets.iter_mut() {
                if let Some(new_id) = remap.get(target) {
                    *target = *new_id;
                }
            }
            copy
        })
        .collect();
    if let Some(saved) = &template.default_background_element {
        let mut copy = Element::clone(saved);
        copy.id = Id::generate();
        page.default_background_element = Some(Arc::new(copy));
    }
    page
}

// ─── Updates ─────────────────────────────────────────────────────────────

/// Patch one element on `page`; `None` if the patch is empty, changes
/// nothing, or points the element at a group that does not exist.
fn patch_element(page: &Page, element: &Element, update: &Update<Element>) -> Option<Element> {
    let next = apply_patch(element, update.resolve(element), RESERVED_ELEMENT_KEYS)?;
    if let Some(group_id) = next.group_id
        && !page.groups.contains_key(&group_id)
    {
        log::debug!("update: {} cannot join unknown group {group_id}", element.id);
        return None;
    }
    Some(next)
}

/// Patch the elements on `page` selected by `matches`. Returns whether any
/// element changed.
fn patch_matching(
    page: &mut Page,
    update: &Update<Element>,
    matches: impl Fn(&Element) -> bool,
) -> bool {
    let mut changed = false;
    for i in 0..page.elements.len() {
        if !matches(page.elements[i].as_ref()) {
            continue;
        }
        if let Some(next) = patch_element(page, &page.elements[i], update) {
            page.elements[i] = Arc::new(next);
            changed = true;
        }
    }
    changed
}

pub fn update_element_by_id(
    state: &StoryState,
    element_id: ElementId,
    update: &Update<Element>,
) -> Option<StoryState> {
    update_elements_by_id(state, &[element_id], update)
}

/// Merge `update` into each listed element on the current page. Reserved
/// fields (`id`, `isBackground`, `isDefaultBackground`) are dropped.
pub fn update_elements_by_id(
    state: &StoryState,
    element_ids: &[ElementId],
    update: &Update<Element>,
) -> Option<StoryState> {
    if element_ids.is_empty() {
        return None;
    }
    edit_current_page(state, |page| {
        patch_matching(page, update, |e| element_ids.contains(&e.id))
    })
}

/// Merge `update` into every element, on every page, showing the media
/// resource `resource_id`.
pub fn update_elements_by_resource_id(
    state: &StoryState,
    resource_id: &ResourceId,
    update: &Update<Element>,
) -> Option<StoryState> {
    let mut next: Option<StoryState> = None;
    for (index, page) in state.pages.iter().enumerate() {
        let mut draft = Page::clone(page);
        if patch_matching(&mut draft, update, |e| e.resource_id() == Some(resource_id)) {
            let target = next.get_or_insert_with(|| state.clone());
            target.pages[index] = Arc::new(draft);
        }
    }
    next
}

// ─── Deletion ────────────────────────────────────────────────────────────

/// Put the saved default background (or a fresh one) back at index 0.
pub(crate) fn restore_default_background(page: &mut Page) {
    let background = match &page.default_background_element {
        Some(saved) => {
            let mut element = Element::clone(saved);
            element.is_background = true;
            element.is_default_background = true;
            element.group_id = None;
            Arc::new(element)
        }
        None => Arc::new(create_default_background()),
    };
    page.elements.insert(0, background);
}

/// Drop `removed` from animation targets; animations left without targets go.
pub(crate) fn prune_animations(page: &mut Page, removed: &HashSet<ElementId>) {
    page.animations.retain_mut(|animation| {
        animation.targets.retain(|t| !removed.contains(&*t));
        !animation.targets.is_empty()
    });
}

/// Remove `ids` from `page`, cascading to animations and reinstating a
/// default background when the background went. A default background is
/// never removed. Returns whether anything was removed.
pub(crate) fn remove_elements(page: &mut Page, ids: &HashSet<ElementId>) -> bool {
    let before = page.elements.len();
    let background_removed = page
        .background()
        .is_some_and(|bg| ids.contains(&bg.id) && !bg.is_default_background);
    page.elements
        .retain(|e| !ids.contains(&e.id) || e.is_default_background);
    if page.elements.len() == before {
        return false;
    }
    if background_removed {
        restore_default_background(page);
    }
    prune_animations(page, ids);
    true
}

fn drop_from_selection(state: &mut StoryState, ids: &HashSet<ElementId>) {
    state.selection.retain(|id| !ids.contains(&*id));
}

pub fn delete_element_by_id(state: &StoryState, element_id: ElementId) -> Option<StoryState> {
    delete_elements_by_id(state, &[element_id])
}

/// Delete the listed elements from the current page.
pub fn delete_elements_by_id(state: &StoryState, element_ids: &[ElementId]) -> Option<StoryState> {
    if element_ids.is_empty() {
        return None;
    }
    let ids: HashSet<ElementId> = element_ids.iter().copied().collect();
    let mut next = edit_current_page(state, |page| remove_elements(page, &ids))?;
    drop_from_selection(&mut next, &ids);
    Some(next)
}

pub fn delete_selected_elements(state: &StoryState) -> Option<StoryState> {
    let selection: Vec<ElementId> = state.selection.to_vec();
    delete_elements_by_id(state, &selection)
}

/// Delete every element, on every page, that shows `resource_id`.
pub fn delete_elements_by_resource_id(
    state: &StoryState,
    resource_id: &ResourceId,
) -> Option<StoryState> {
    let mut next: Option<StoryState> = None;
    let mut removed: HashSet<ElementId> = HashSet::new();
    for (index, page) in state.pages.iter().enumerate() {
        let ids: HashSet<ElementId> = page
            .elements
            .iter()
            .filter(|e| e.resource_id() == Some(resource_id))
            .map(|e| e.id)
            .collect();
        if ids.is_empty() {
            continue;
        }
        let mut draft = Page::clone(page);
        if remove_elements(&mut draft, &ids) {
            let target = next.get_or_insert_with(|| state.clone());
            target.pages[index] = Arc::new(draft);
            removed.extend(ids);
        }
    }
    let mut next = next?;
    drop_from_selection(&mut next, &removed);
    Some(next)
}

// ─── Animations ──────────────────────────────────────────────────────────

/// Append animations to the current page. Ids already present are skipped;
/// targets not on the page are dropped, and an animation with none left is
/// skipped.
pub fn add_animations(state: &StoryState, animations: Vec<Animation>) -> Option<StoryState> {
    let (index, page) = current_page(state)?;
    let mut draft = Page::clone(page);
    let mut changed = false;
    for mut animation in animations {
        if draft.animations.iter().any(|a| a.id == animation.id) {
            continue;
        }
        animation.targets.retain(|t| draft.contains(*t));
        if animation.targets.is_empty() {
            continue;
        }
        draft.animations.push(animation);
        changed = true;
    }
    changed.then(|| with_page(state, index, draft))
}
