use std::{borrow::Borrow, collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_newtype!(KindId);
id_newtype!(StoryId);
id_newtype!(PanelId);

/// One kind and its stories, in traversal order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindEntry {
    pub kind: KindId,
    #[serde(default)]
    pub stories: Vec<StoryId>,
}

impl KindEntry {
    pub fn new<S>(kind: impl Into<KindId>, stories: impl IntoIterator<Item = S>) -> Self
    where
        S: Into<StoryId>,
    {
        Self {
            kind: kind.into(),
            stories: stories.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, story: &str) -> bool {
        self.stories.iter().any(|s| s == story)
    }

    pub fn first_story(&self) -> Option<&StoryId> {
        self.stories.first()
    }
}

/// Immutable catalog snapshot. Replaced wholesale whenever the provider
/// publishes a new catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hierarchy(Vec<KindEntry>);

impl Hierarchy {
    pub fn new(kinds: Vec<KindEntry>) -> Self {
        Self(kinds)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn kinds(&self) -> &[KindEntry] {
        &self.0
    }

    pub fn find_kind(&self, kind: &str) -> Option<&KindEntry> {
        self.0.iter().find(|entry| entry.kind == kind)
    }

    pub fn first_kind(&self) -> Option<&KindId> {
        self.0.first().map(|entry| &entry.kind)
    }

    pub fn contains(&self, kind: &str, story: &str) -> bool {
        self.find_kind(kind).is_some_and(|entry| entry.contains(story))
    }

    /// Number of (kind, story) pairs across every kind.
    pub fn story_count(&self) -> usize {
        self.0.iter().map(|entry| entry.stories.len()).sum()
    }
}

impl From<Vec<KindEntry>> for Hierarchy {
    fn from(kinds: Vec<KindEntry>) -> Self {
        Self(kinds)
    }
}

impl FromIterator<KindEntry> for Hierarchy {
    fn from_iter<T: IntoIterator<Item = KindEntry>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelMeta {
    pub title: String,
    #[serde(default = "default_renderable")]
    pub renderable: bool,
}

fn default_renderable() -> bool {
    true
}

impl PanelMeta {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            renderable: true,
        }
    }
}

pub type PanelRegistry = BTreeMap<PanelId, PanelMeta>;

/// Where the addon panel is docked. `Hidden` is the URL's empty `panel=`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelLayout {
    #[default]
    Right,
    Bottom,
    Hidden,
}

impl PanelLayout {
    pub fn is_visible(self) -> bool {
        !matches!(self, PanelLayout::Hidden)
    }

    pub fn as_param(self) -> &'static str {
        match self {
            PanelLayout::Right => "right",
            PanelLayout::Bottom => "bottom",
            PanelLayout::Hidden => "",
        }
    }

    /// Accepts only the two docked positions; anything else hides the panel.
    pub fn from_param(raw: &str) -> Self {
        match raw {
            "right" => PanelLayout::Right,
            "bottom" => PanelLayout::Bottom,
            _ => PanelLayout::Hidden,
        }
    }
}

impl fmt::Display for PanelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelLayout::Hidden => f.write_str("hidden"),
            other => f.write_str(other.as_param()),
        }
    }
}
