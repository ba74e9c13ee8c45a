use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    domain::{Hierarchy, PanelLayout},
    error::StoreError,
};

pub const PARAM_SELECTED_KIND: &str = "selectedKind";
pub const PARAM_SELECTED_STORY: &str = "selectedStory";
pub const PARAM_ADDON_PANEL: &str = "addonPanel";
pub const PARAM_FULL: &str = "full";
pub const PARAM_PANEL: &str = "panel";
pub const PARAM_NAV: &str = "nav";

/// Discrete input signals understood by the shortcut dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShortcutEvent {
    Fullscreen,
    AddonPanel,
    StoriesPanel,
    ShowSearch,
    NextStory,
    PrevStory,
    AddonPanelInRight,
}

impl ShortcutEvent {
    pub const ALL: [ShortcutEvent; 7] = [
        ShortcutEvent::Fullscreen,
        ShortcutEvent::AddonPanel,
        ShortcutEvent::StoriesPanel,
        ShortcutEvent::ShowSearch,
        ShortcutEvent::NextStory,
        ShortcutEvent::PrevStory,
        ShortcutEvent::AddonPanelInRight,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShortcutEvent::Fullscreen => "FULLSCREEN",
            ShortcutEvent::AddonPanel => "ADDON_PANEL",
            ShortcutEvent::StoriesPanel => "STORIES_PANEL",
            ShortcutEvent::ShowSearch => "SHOW_SEARCH",
            ShortcutEvent::NextStory => "NEXT_STORY",
            ShortcutEvent::PrevStory => "PREV_STORY",
            ShortcutEvent::AddonPanelInRight => "ADDON_PANEL_IN_RIGHT",
        }
    }
}

impl fmt::Display for ShortcutEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShortcutEvent {
    type Err = StoreError;

    /// Case-insensitive; `-` and `_` are interchangeable.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().replace('-', "_").to_ascii_uppercase();
        ShortcutEvent::ALL
            .into_iter()
            .find(|event| event.name() == normalized)
            .ok_or_else(|| StoreError::UnknownShortcut(raw.to_string()))
    }
}

impl FromStr for PanelLayout {
    type Err = StoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "right" => Ok(PanelLayout::Right),
            "bottom" => Ok(PanelLayout::Bottom),
            "hidden" | "" | "false" => Ok(PanelLayout::Hidden),
            _ => Err(StoreError::InvalidPanelLayout(raw.to_string())),
        }
    }
}

/// Decodes a catalog snapshot in the provider's JSON shape:
/// `[{"kind": "...", "stories": ["...", ...]}, ...]`.
pub fn decode_hierarchy(raw: &str) -> Result<Hierarchy, StoreError> {
    Ok(serde_json::from_str(raw)?)
}
