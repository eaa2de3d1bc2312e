//! Dropping a media element onto another element (or the background).

use super::elements::prune_animations;
use super::{current_page, with_page};
use smallvec::smallvec;
use std::collections::HashSet;
use std::sync::Arc;
use ws_core::{Element, ElementId, Id, Page, StoryState, create_default_background};

/// Focal point of a freshly combined element, in percent.
const CENTER_FOCAL: f64 = 50.0;
const DEFAULT_SCALE: f64 = 100.0;

/// Fill the frame of `target` with the media of `origin`. The result keeps
/// the target's id and its own properties; the origin contributes the media.
fn merge(origin: &Element, target: &Element) -> Element {
    let mut combined = target.clone();
    combined.kind = origin.kind.clone();
    combined.resource = origin.resource.clone();
    combined.flip = origin.flip;
    combined.scale = Some(origin.scale.unwrap_or(DEFAULT_SCALE));
    combined.focal_x = Some(CENTER_FOCAL);
    combined.focal_y = Some(CENTER_FOCAL);
    for (key, value) in &origin.extra {
        combined.extra.insert(key.clone(), value.clone());
    }

    if !target.is_rectangular() {
        combined.border = None;
        combined.border_radius = None;
    }
    if origin.link.is_some() {
        combined.link = origin.link.clone();
    }
    combined
}

/// Turn a merged element into the page background.
fn into_background(mut combined: Element) -> Element {
    combined.is_default_background = false;
    combined.opacity = Some(100.0);
    combined.overlay = None;
    combined.link = None;
    combined.border = None;
    combined.border_radius = None;
    combined.group_id = None;
    combined
}

/// Fill the element `second_id` on the current page with the media of
/// `first_element`.
///
/// `first_element` must carry a media resource and `second_id` must be a
/// maskable element or the background. The target keeps its id, frame and
/// own properties. The origin is removed from the page if it was on it; its
/// animations move to the target unless `should_retain_animations` is false.
/// The target becomes the selection.
pub fn combine_elements(
    state: &StoryState,
    first_element: Element,
    second_id: ElementId,
    should_retain_animations: bool,
) -> Option<StoryState> {
    let (index, page) = current_page(state)?;
    let origin_id = first_element.id;
    if first_element.resource.is_none() || !first_element.kind.is_media() {
        log::debug!("combine: {origin_id} carries no media");
        return None;
    }
    if origin_id == second_id || page.element(origin_id).is_some_and(|e| e.is_background) {
        return None;
    }
    let target = page.element(second_id)?;
    if !target.is_background && !target.kind.is_maskable() {
        log::debug!("combine: {} cannot hold media", target.kind);
        return None;
    }

    let mut combined = merge(&first_element, target);
    let mut draft = Page::clone(page);
    if target.is_background {
        combined = into_background(combined);
        if target.is_default_background {
            // The live background keeps the target id, so the saved copy needs its own.
            let mut saved = Element::clone(target);
            saved.id = Id::generate();
            draft.default_background_element = Some(Arc::new(saved));
        } else if draft.default_background_element.is_none() {
            draft.default_background_element = Some(Arc::new(create_default_background()));
        }
    }

    let combined = Arc::new(combined);
    draft.elements = page
        .elements
        .iter()
        .filter(|e| e.id != origin_id)
        .map(|e| {
            if e.id == second_id {
                Arc::clone(&combined)
            } else {
                Arc::clone(e)
            }
        })
        .collect();

    let mut removed: HashSet<ElementId> = HashSet::from([second_id]);
    if !should_retain_animations {
        removed.insert(origin_id);
    }
    prune_animations(&mut draft, &removed);
    for animation in &mut draft.animations {
        for target in animation.targets.iter_mut() {
            if *target == origin_id {
                *target = second_id;
            }
        }
    }

    let mut next = with_page(state, index, draft);
    next.selection = smallvec![second_id];
    Some(next)
}
