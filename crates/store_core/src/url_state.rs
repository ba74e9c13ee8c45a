//! Projection of store state into URL parameters, and the inverse intake of
//! location parameters.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use shared::{
    domain::{KindId, PanelId, PanelLayout, StoryId},
    protocol::{
        PARAM_ADDON_PANEL, PARAM_FULL, PARAM_NAV, PARAM_PANEL, PARAM_SELECTED_KIND,
        PARAM_SELECTED_STORY,
    },
};

use crate::{config::ShortcutOptionsPatch, reconcile::Selection, shortcuts::ShortcutFlags};

pub type QueryParams = BTreeMap<String, String>;

/// Serializes as one flat object: built-in keys first, then custom
/// parameters overwriting them. A hidden panel is `false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlState {
    pub selected_kind: Option<KindId>,
    pub selected_story: Option<StoryId>,
    pub full: bool,
    pub panel: PanelLayout,
    pub nav: bool,
    pub custom: QueryParams,
}

impl UrlState {
    pub fn project(selection: &Selection, flags: &ShortcutFlags, custom: &QueryParams) -> Self {
        Self {
            selected_kind: selection.selected_kind.clone(),
            selected_story: selection.selected_story.clone(),
            full: flags.fullscreen,
            panel: flags.panel_layout,
            nav: flags.nav_visible,
            custom: custom.clone(),
        }
    }

    /// Flat string form for a router. Custom parameters are merged last and
    /// win on key collision; an absent selection omits its key.
    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        if let Some(kind) = &self.selected_kind {
            params.insert(PARAM_SELECTED_KIND.into(), kind.to_string());
        }
        if let Some(story) = &self.selected_story {
            params.insert(PARAM_SELECTED_STORY.into(), story.to_string());
        }
        params.insert(PARAM_FULL.into(), flag_param(self.full).into());
        params.insert(PARAM_PANEL.into(), self.panel.as_param().into());
        params.insert(PARAM_NAV.into(), flag_param(self.nav).into());
        params.extend(
            self.custom
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        params
    }
}

impl Serialize for UrlState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut fields = Map::new();
        fields.insert(
            PARAM_SELECTED_KIND.into(),
            self.selected_kind
                .as_ref()
                .map_or(Value::Null, |kind| Value::from(kind.as_str())),
        );
        fields.insert(
            PARAM_SELECTED_STORY.into(),
            self.selected_story
                .as_ref()
                .map_or(Value::Null, |story| Value::from(story.as_str())),
        );
        fields.insert(PARAM_FULL.into(), Value::Bool(self.full));
        let panel = if self.panel.is_visible() {
            Value::from(self.panel.as_param())
        } else {
            Value::Bool(false)
        };
        fields.insert(PARAM_PANEL.into(), panel);
        fields.insert(PARAM_NAV.into(), Value::Bool(self.nav));
        for (key, value) in &self.custom {
            fields.insert(key.clone(), Value::from(value.as_str()));
        }
        fields.serialize(serializer)
    }
}

fn flag_param(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

/// Numeric-string truthiness: the trimmed value read as a number, true when
/// non-zero. Empty is zero; anything non-numeric is false. Accepts decimal
/// and exponent forms, `0x`/`0o`/`0b` integers and signed `Infinity`.
pub fn coerce_flag(raw: &str) -> bool {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return false;
    }
    if matches!(trimmed, "Infinity" | "+Infinity" | "-Infinity") {
        return true;
    }
    if let Some(truthy) = radix_truthiness(trimmed) {
        return truthy;
    }
    if trimmed
        .chars()
        .any(|c| c.is_ascii_alphabetic() && !matches!(c, 'e' | 'E'))
    {
        return false;
    }
    match trimmed.parse::<f64>() {
        Ok(value) => value != 0.0 && !value.is_nan(),
        Err(_) => false,
    }
}

/// `Some` when `value` carries a radix prefix; malformed digits are false.
fn radix_truthiness(value: &str) -> Option<bool> {
    let bytes = value.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'0' {
        return None;
    }
    let radix = match bytes[1] {
        b'x' | b'X' => 16,
        b'o' | b'O' => 8,
        b'b' | b'B' => 2,
        _ => return None,
    };
    let digits = &value[2..];
    let well_formed = !digits.is_empty() && digits.chars().all(|c| c.is_digit(radix));
    Some(well_formed && digits.chars().any(|c| c != '0'))
}

/// Merges `updates` into `current`. A `None` value removes the key.
pub fn merge_query_params<I, K>(current: &QueryParams, updates: I) -> QueryParams
where
    I: IntoIterator<Item = (K, Option<String>)>,
    K: Into<String>,
{
    let mut merged = current.clone();
    for (key, value) in updates {
        let key = key.into();
        match value {
            Some(value) => {
                merged.insert(key, value);
            }
            None => {
                merged.remove(&key);
            }
        }
    }
    merged
}

/// Everything a location change asks of the store, decoded from flat params.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationUpdate {
    pub selection: Option<(KindId, Option<StoryId>)>,
    pub addon_panel: Option<PanelId>,
    pub shortcuts: ShortcutOptionsPatch,
    pub custom: QueryParams,
}

impl LocationUpdate {
    pub fn parse<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut custom: QueryParams = params
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let selected_kind = custom.remove(PARAM_SELECTED_KIND);
        let selected_story = custom.remove(PARAM_SELECTED_STORY);
        let addon_panel = custom.remove(PARAM_ADDON_PANEL);
        let full = custom
            .remove(PARAM_FULL)
            .is_some_and(|raw| coerce_flag(&raw));
        let nav = custom.remove(PARAM_NAV).map_or(true, |raw| coerce_flag(&raw));
        let panel = custom
            .remove(PARAM_PANEL)
            .map_or(PanelLayout::Bottom, |raw| PanelLayout::from_param(&raw));

        let selection = selected_kind
            .filter(|kind| !kind.is_empty())
            .map(|kind| (KindId::from(kind), selected_story.map(StoryId::from)));

        Self {
            selection,
            addon_panel: addon_panel
                .filter(|panel| !panel.is_empty())
                .map(PanelId::from),
            shortcuts: ShortcutOptionsPatch {
                full: Some(full),
                nav: Some(nav),
                panel: Some(panel),
                enable_shortcuts: None,
            },
            custom,
        }
    }
}

#[cfg(test)]
#[path = "tests/url_state_tests.rs"]
mod tests;
