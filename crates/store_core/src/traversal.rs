//! Ordered traversal over the two-level catalog.

use shared::domain::{Hierarchy, KindId, StoryId};

use crate::reconcile::Selection;

/// Flattens the catalog into (kind, story) pairs: kinds in order, and each
/// kind's stories in order.
pub fn flatten(hierarchy: &Hierarchy) -> impl Iterator<Item = (&KindId, &StoryId)> + '_ {
    hierarchy
        .kinds()
        .iter()
        .flat_map(|entry| entry.stories.iter().map(move |story| (&entry.kind, story)))
}

/// Position of `selection` in the flattened sequence (first match).
pub fn position_of(hierarchy: &Hierarchy, selection: &Selection) -> Option<usize> {
    let (kind, story) = (selection.kind()?, selection.story()?);
    flatten(hierarchy).position(|(k, s)| k == kind && s == story)
}

/// Selection `offset` steps away from `current`, or `None` when `current` is
/// not in the catalog or the target falls outside it. No wraparound.
pub fn jump_target(hierarchy: &Hierarchy, current: &Selection, offset: isize) -> Option<Selection> {
    let index = position_of(hierarchy, current)?;
    let target = index.checked_add_signed(offset)?;
    let (kind, story) = flatten(hierarchy).nth(target)?;
    Some(Selection {
        selected_kind: Some(kind.clone()),
        selected_story: Some(story.clone()),
    })
}
