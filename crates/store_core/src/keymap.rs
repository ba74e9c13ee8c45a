//! Physical key chords to shortcut events.

use serde::{Deserialize, Serialize};
use shared::protocol::ShortcutEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Char(char),
    Left,
    Right,
    Up,
    Down,
    Escape,
    Enter,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub meta: bool,
    #[serde(default)]
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        meta: false,
        alt: false,
    };

    pub const CTRL_SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: true,
        meta: false,
        alt: false,
    };

    /// Shortcut modifier: shift, ctrl or meta held, and alt not held.
    pub fn is_shortcut(self) -> bool {
        (self.shift || self.ctrl || self.meta) && !self.alt
    }

    pub fn is_empty(self) -> bool {
        self == Modifiers::NONE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyChord {
    pub key: Key,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl KeyChord {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }
}

const BINDINGS: &[(Key, ShortcutEvent)] = &[
    (Key::Char('f'), ShortcutEvent::Fullscreen),
    (Key::Char('z'), ShortcutEvent::AddonPanel),
    (Key::Char('x'), ShortcutEvent::StoriesPanel),
    (Key::Char('g'), ShortcutEvent::AddonPanelInRight),
    (Key::Char('k'), ShortcutEvent::ShowSearch),
    (Key::Char('p'), ShortcutEvent::ShowSearch),
    (Key::Right, ShortcutEvent::NextStory),
    (Key::Left, ShortcutEvent::PrevStory),
];

/// Letter keys match case-insensitively since shift is itself a modifier.
pub fn resolve(chord: KeyChord) -> Option<ShortcutEvent> {
    if chord.key == Key::Char('/') && chord.modifiers.is_empty() {
        return Some(ShortcutEvent::ShowSearch);
    }

    if !chord.modifiers.is_shortcut() {
        return None;
    }

    let key = match chord.key {
        Key::Char(c) => Key::Char(c.to_ascii_lowercase()),
        other => other,
    };
    BINDINGS
        .iter()
        .find(|(bound, _)| *bound == key)
        .map(|(_, event)| *event)
}
