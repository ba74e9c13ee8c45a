//! Selection reconciliation against the current catalog snapshot.

use serde::{Deserialize, Serialize};
use shared::domain::{Hierarchy, KindId, StoryId};

/// The selected (kind, story) pair. Either half may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub selected_kind: Option<KindId>,
    pub selected_story: Option<StoryId>,
}

impl Selection {
    pub fn new(kind: impl Into<KindId>, story: impl Into<StoryId>) -> Self {
        Self {
            selected_kind: Some(kind.into()),
            selected_story: Some(story.into()),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn kind(&self) -> Option<&str> {
        self.selected_kind.as_ref().map(KindId::as_str)
    }

    pub fn story(&self) -> Option<&str> {
        self.selected_story.as_ref().map(StoryId::as_str)
    }

    /// True when the selection satisfies the catalog invariant: a present
    /// kind exists in `hierarchy`, and a present story exists in that kind.
    /// An empty hierarchy validates nothing.
    pub fn is_valid_in(&self, hierarchy: &Hierarchy) -> bool {
        if hierarchy.is_empty() {
            return true;
        }
        match (self.kind(), self.story()) {
            (None, None) => true,
            (None, Some(_)) => false,
            (Some(kind), None) => hierarchy.find_kind(kind).is_some(),
            (Some(kind), Some(story)) => hierarchy.contains(kind, story),
        }
    }
}

/// Returns `candidate` when it names a kind in `hierarchy`, otherwise the
/// first kind. An empty hierarchy leaves the candidate untouched.
pub fn reconcile_kind(hierarchy: &Hierarchy, candidate: Option<&KindId>) -> Option<KindId> {
    if hierarchy.is_empty() {
        return candidate.cloned();
    }

    if let Some(kind) = candidate {
        if hierarchy.find_kind(kind.as_str()).is_some() {
            return Some(kind.clone());
        }
    }

    hierarchy.first_kind().cloned()
}

/// Returns `candidate` when it is a story of `kind`, otherwise the first
/// story of `kind`. `None` when `kind` is unknown or has no stories.
pub fn reconcile_story(
    hierarchy: &Hierarchy,
    kind: Option<&KindId>,
    candidate: Option<&StoryId>,
) -> Option<StoryId> {
    if hierarchy.is_empty() {
        return candidate.cloned();
    }

    let entry = hierarchy.find_kind(kind?.as_str())?;

    if let Some(story) = candidate {
        if entry.contains(story.as_str()) {
            return Some(story.clone());
        }
    }

    entry.first_story().cloned()
}

/// Reconciles a full candidate pair: kind first, then story within the
/// reconciled kind.
pub fn reconcile_selection(
    hierarchy: &Hierarchy,
    kind: Option<&KindId>,
    story: Option<&StoryId>,
) -> Selection {
    let selected_kind = reconcile_kind(hierarchy, kind);
    let selected_story = reconcile_story(hierarchy, selected_kind.as_ref(), story);
    Selection {
        selected_kind,
        selected_story,
    }
}

/// Re-derives the selection after a catalog swap. A story survives only when
/// its kind is still the selected one.
pub fn reconcile_after_catalog_swap(hierarchy: &Hierarchy, previous: &Selection) -> Selection {
    let selected_kind = reconcile_kind(hierarchy, previous.selected_kind.as_ref());
    let carried_story = if selected_kind == previous.selected_kind {
        previous.selected_story.as_ref()
    } else {
        None
    };
    let selected_story = reconcile_story(hierarchy, selected_kind.as_ref(), carried_story);
    Selection {
        selected_kind,
        selected_story,
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use shared::domain::KindEntry;

    use super::*;

    fn catalog() -> Hierarchy {
        Hierarchy::new(vec![
            KindEntry::new("A", ["a1", "a2"]),
            KindEntry::new("B", ["b1", "b2"]),
            KindEntry::new("Empty", Vec::<&str>::new()),
        ])
    }

    #[test]
    fn kind_falls_back_to_first() {
        let kind = reconcile_kind(&catalog(), Some(&KindId::from("missing")));
        assert_eq!(kind, Some(KindId::from("A")));
        assert_eq!(reconcile_kind(&catalog(), None), Some(KindId::from("A")));
    }

    #[test]
    fn kind_passes_through_on_empty_catalog() {
        let kind = reconcile_kind(&Hierarchy::default(), Some(&KindId::from("ghost")));
        assert_eq!(kind, Some(KindId::from("ghost")));
    }

    #[test]
    fn story_falls_back_to_first_in_kind() {
        let story = reconcile_story(
            &catalog(),
            Some(&KindId::from("B")),
            Some(&StoryId::from("a2")),
        );
        assert_eq!(story, Some(StoryId::from("b1")));
    }

    #[test]
    fn story_is_none_for_unknown_or_empty_kind() {
        let hierarchy = catalog();
        let story = StoryId::from("a1");
        assert_eq!(
            reconcile_story(&hierarchy, Some(&KindId::from("nope")), Some(&story)),
            None
        );
        assert_eq!(
            reconcile_story(&hierarchy, Some(&KindId::from("Empty")), Some(&story)),
            None
        );
        assert_eq!(reconcile_story(&hierarchy, None, Some(&story)), None);
    }

    #[test]
    fn story_passes_through_on_empty_catalog() {
        let story = reconcile_story(
            &Hierarchy::default(),
            Some(&KindId::from("A")),
            Some(&StoryId::from("whatever")),
        );
        assert_eq!(story, Some(StoryId::from("whatever")));
    }

    #[test]
    fn catalog_swap_drops_story_when_kind_changes() {
        let previous = Selection::new("A", "a2");
        let next = Hierarchy::new(vec![KindEntry::new("B", ["b1", "b2"])]);
        assert_eq!(
            reconcile_after_catalog_swap(&next, &previous),
            Selection::new("B", "b1")
        );
    }

    #[test]
    fn catalog_swap_keeps_story_of_surviving_kind() {
        let previous = Selection::new("B", "b2");
        let next = Hierarchy::new(vec![
            KindEntry::new("C", ["c1"]),
            KindEntry::new("B", ["b0", "b2"]),
        ]);
        assert_eq!(
            reconcile_after_catalog_swap(&next, &previous),
            Selection::new("B", "b2")
        );
    }

    fn arb_hierarchy() -> impl Strategy<Value = Hierarchy> {
        prop::collection::btree_map(
            "[a-d]",
            prop::collection::vec("[a-d][0-3]", 0..4),
            0..5,
        )
        .prop_map(|kinds| {
            kinds
                .into_iter()
                .map(|(kind, stories)| KindEntry::new(kind, stories))
                .collect::<Hierarchy>()
        })
    }

    proptest! {
        #[test]
        fn reconcile_kind_is_idempotent(hierarchy in arb_hierarchy(), candidate in proptest::option::of("[a-e]")) {
            let candidate = candidate.map(KindId::from);
            let once = reconcile_kind(&hierarchy, candidate.as_ref());
            let twice = reconcile_kind(&hierarchy, once.as_ref());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn absent_kind_falls_back_to_first(hierarchy in arb_hierarchy()) {
            prop_assume!(!hierarchy.is_empty());
            let candidate = KindId::from("zz");
            let reconciled = reconcile_kind(&hierarchy, Some(&candidate));
            prop_assert_eq!(reconciled.as_ref(), hierarchy.first_kind());
        }

        #[test]
        fn reconciled_selection_is_valid(
            hierarchy in arb_hierarchy(),
            kind in proptest::option::of("[a-e]"),
            story in proptest::option::of("[a-e][0-4]"),
        ) {
            let kind = kind.map(KindId::from);
            let story = story.map(StoryId::from);
            let selection = reconcile_selection(&hierarchy, kind.as_ref(), story.as_ref());
            prop_assert!(selection.is_valid_in(&hierarchy));
        }
    }
}
