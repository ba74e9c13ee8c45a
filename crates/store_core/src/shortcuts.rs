//! Keyboard shortcut state machine.
//!
//! [`dispatch`] is pure: it maps one event and the current flags to the next
//! flags plus, for navigation events, a requested traversal offset that the
//! store applies against its catalog.

use serde::{Deserialize, Serialize};
use shared::{domain::PanelLayout, protocol::ShortcutEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortcutFlags {
    pub fullscreen: bool,
    pub nav_visible: bool,
    pub panel_layout: PanelLayout,
    pub shortcuts_enabled: bool,
}

impl Default for ShortcutFlags {
    fn default() -> Self {
        Self {
            fullscreen: false,
            nav_visible: true,
            panel_layout: PanelLayout::Right,
            shortcuts_enabled: true,
        }
    }
}

/// Side request produced alongside the new flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutEffect {
    Jump(isize),
    ToggleSearch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    pub flags: ShortcutFlags,
    pub effect: Option<ShortcutEffect>,
}

impl Dispatch {
    fn settled(flags: ShortcutFlags) -> Self {
        Self {
            flags,
            effect: None,
        }
    }

    fn requesting(flags: ShortcutFlags, effect: ShortcutEffect) -> Self {
        Self {
            flags,
            effect: Some(effect),
        }
    }
}

pub fn dispatch(event: ShortcutEvent, flags: ShortcutFlags) -> Dispatch {
    if !flags.shortcuts_enabled {
        return Dispatch::settled(flags);
    }

    let mut next = flags;
    match event {
        ShortcutEvent::NextStory => {
            return Dispatch::requesting(flags, ShortcutEffect::Jump(1));
        }
        ShortcutEvent::PrevStory => {
            return Dispatch::requesting(flags, ShortcutEffect::Jump(-1));
        }
        ShortcutEvent::ShowSearch => {
            return Dispatch::requesting(flags, ShortcutEffect::ToggleSearch);
        }
        ShortcutEvent::Fullscreen => next.fullscreen = !flags.fullscreen,
        ShortcutEvent::StoriesPanel => next.nav_visible = !flags.nav_visible,
        ShortcutEvent::AddonPanel => {
            // TODO: restore the layout that was active before hiding instead of always `Right`.
            next.panel_layout = if flags.panel_layout.is_visible() {
                PanelLayout::Hidden
            } else {
                PanelLayout::Right
            };
        }
        ShortcutEvent::AddonPanelInRight => {
            next.panel_layout = match flags.panel_layout {
                PanelLayout::Bottom => PanelLayout::Right,
                PanelLayout::Right | PanelLayout::Hidden => PanelLayout::Bottom,
            };
        }
    }
    Dispatch::settled(next)
}

#[cfg(test)]
#[path = "tests/shortcuts_tests.rs"]
mod tests;
