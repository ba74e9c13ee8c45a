use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use shared::{
    domain::{PanelId, PanelLayout},
    error::StoreError,
};

use crate::{shortcuts::ShortcutFlags, url_state::coerce_flag};

pub const DEFAULT_CONFIG_PATH: &str = "store.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShortcutOptions {
    pub full: bool,
    pub nav: bool,
    pub panel: PanelLayout,
    pub enable_shortcuts: bool,
}

impl Default for ShortcutOptions {
    fn default() -> Self {
        Self {
            full: false,
            nav: true,
            panel: PanelLayout::Right,
            enable_shortcuts: true,
        }
    }
}

impl ShortcutOptions {
    pub fn to_flags(self) -> ShortcutFlags {
        ShortcutFlags {
            fullscreen: self.full,
            nav_visible: self.nav,
            panel_layout: self.panel,
            shortcuts_enabled: self.enable_shortcuts,
        }
    }
}

/// Partial shortcut update; unset fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutOptionsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nav: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panel: Option<PanelLayout>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_shortcuts: Option<bool>,
}

impl ShortcutOptionsPatch {
    pub fn apply_to(&self, flags: ShortcutFlags) -> ShortcutFlags {
        ShortcutFlags {
            fullscreen: self.full.unwrap_or(flags.fullscreen),
            nav_visible: self.nav.unwrap_or(flags.nav_visible),
            panel_layout: self.panel.unwrap_or(flags.panel_layout),
            shortcuts_enabled: self.enable_shortcuts.unwrap_or(flags.shortcuts_enabled),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiOptions {
    pub name: String,
    pub url: String,
    pub sort_stories_by_kind: bool,
    pub hierarchy_separator: String,
    pub hierarchy_root_separator: Option<String>,
    pub sidebar_animations: bool,
    pub theme: Option<serde_json::Value>,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            name: "STORYBOOK".into(),
            url: "https://github.com/storybooks/storybook".into(),
            sort_stories_by_kind: false,
            hierarchy_separator: "/".into(),
            hierarchy_root_separator: None,
            sidebar_animations: true,
            theme: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiOptionsPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub sort_stories_by_kind: Option<bool>,
    #[serde(default)]
    pub hierarchy_separator: Option<String>,
    /// `Some(None)` clears the separator.
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub hierarchy_root_separator: Option<Option<String>>,
    #[serde(default)]
    pub sidebar_animations: Option<bool>,
    /// `Some(None)` clears the theme.
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub theme: Option<Option<serde_json::Value>>,
    #[serde(default)]
    pub selected_addon_panel: Option<PanelId>,
}

/// Keeps an explicit `null` apart from an absent key.
fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl UiOptionsPatch {
    pub fn apply_to(&self, options: &UiOptions) -> UiOptions {
        UiOptions {
            name: self.name.clone().unwrap_or_else(|| options.name.clone()),
            url: self.url.clone().unwrap_or_else(|| options.url.clone()),
            sort_stories_by_kind: self
                .sort_stories_by_kind
                .unwrap_or(options.sort_stories_by_kind),
            hierarchy_separator: self
                .hierarchy_separator
                .clone()
                .unwrap_or_else(|| options.hierarchy_separator.clone()),
            hierarchy_root_separator: self
                .hierarchy_root_separator
                .clone()
                .unwrap_or_else(|| options.hierarchy_root_separator.clone()),
            sidebar_animations: self.sidebar_animations.unwrap_or(options.sidebar_animations),
            theme: self.theme.clone().unwrap_or_else(|| options.theme.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub shortcuts: ShortcutOptions,
    pub ui: UiOptions,
}

/// Defaults, then `path` (or `store.toml`) when present, then `STORE__*`
/// environment overrides.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<StoreConfig> {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let mut settings = match fs::read_to_string(&path) {
        Ok(raw) => parse_settings(&raw)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))?,
        Err(err) if err.kind() == ErrorKind::NotFound => StoreConfig::default(),
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()));
        }
    };

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok())?;
    Ok(settings)
}

pub fn parse_settings(raw: &str) -> anyhow::Result<StoreConfig> {
    Ok(toml::from_str(raw)?)
}

pub fn apply_env_overrides(
    settings: &mut StoreConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), StoreError> {
    if let Some(v) = lookup("STORE__FULL") {
        settings.shortcuts.full = parse_bool("STORE__FULL", &v)?;
    }
    if let Some(v) = lookup("STORE__NAV") {
        settings.shortcuts.nav = parse_bool("STORE__NAV", &v)?;
    }
    if let Some(v) = lookup("STORE__PANEL") {
        settings.shortcuts.panel = v.parse()?;
    }
    if let Some(v) = lookup("STORE__ENABLE_SHORTCUTS") {
        settings.shortcuts.enable_shortcuts = parse_bool("STORE__ENABLE_SHORTCUTS", &v)?;
    }
    if let Some(v) = lookup("STORE__NAME") {
        settings.ui.name = v;
    }
    if let Some(v) = lookup("STORE__URL") {
        settings.ui.url = v;
    }
    Ok(())
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, StoreError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" => Ok(true),
        "false" | "no" | "off" => Ok(false),
        other if other.parse::<f64>().is_ok() || other.is_empty() => Ok(coerce_flag(other)),
        _ => Err(StoreError::invalid_config(
            key,
            format!("expected a boolean, got '{raw}'"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_match_stock_ui() {
        let config = StoreConfig::default();
        assert_eq!(config.shortcuts.to_flags(), ShortcutFlags::default());
        assert_eq!(config.ui.name, "STORYBOOK");
        assert_eq!(config.ui.hierarchy_separator, "/");
        assert!(config.ui.sidebar_animations);
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let config = parse_settings(
            r##"
            [shortcuts]
            panel = "bottom"
            enable_shortcuts = false

            [ui]
            name = "Design System"
            theme = { accent = "#ff4785" }
            "##,
        )
        .expect("parse");
        assert_eq!(config.shortcuts.panel, PanelLayout::Bottom);
        assert!(!config.shortcuts.enable_shortcuts);
        assert!(config.shortcuts.nav);
        assert_eq!(config.ui.name, "Design System");
        assert_eq!(
            config.ui.theme,
            Some(serde_json::json!({ "accent": "#ff4785" }))
        );
        assert_eq!(config.ui.url, UiOptions::default().url);
    }

    #[test]
    fn env_overrides_win_over_file_values() {
        let mut config = StoreConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("STORE__FULL", "1"),
                ("STORE__NAV", "false"),
                ("STORE__PANEL", "hidden"),
                ("STORE__NAME", "Widgets"),
            ]),
        )
        .expect("overrides");
        assert!(config.shortcuts.full);
        assert!(!config.shortcuts.nav);
        assert_eq!(config.shortcuts.panel, PanelLayout::Hidden);
        assert_eq!(config.ui.name, "Widgets");
    }

    #[test]
    fn rejects_garbage_env_values() {
        let mut config = StoreConfig::default();
        let err = apply_env_overrides(&mut config, env(&[("STORE__FULL", "maybe")]))
            .expect_err("invalid bool");
        assert!(matches!(err, StoreError::InvalidConfig { ref key, .. } if key == "STORE__FULL"));

        let err = apply_env_overrides(&mut config, env(&[("STORE__PANEL", "left")]))
            .expect_err("invalid panel");
        assert!(matches!(err, StoreError::InvalidPanelLayout(_)));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = load_settings(Some(&dir.path().join("absent.toml"))).expect("load");
        assert_eq!(config.ui, UiOptions::default());
    }

    #[test]
    fn reads_config_file_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("store.toml");
        fs::write(&path, "[shortcuts]\nfull = true\n").expect("write");
        let config = load_settings(Some(&path)).expect("load");
        assert!(config.shortcuts.full);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("store.toml");
        fs::write(&path, "[shortcuts\nfull = ").expect("write");
        let err = load_settings(Some(&path)).expect_err("malformed");
        assert!(err.to_string().contains("failed to parse config file"));
    }

    #[test]
    fn patch_only_touches_named_fields() {
        let flags = ShortcutOptionsPatch {
            nav: Some(false),
            ..Default::default()
        }
        .apply_to(ShortcutFlags::default());
        assert_eq!(
            flags,
            ShortcutFlags {
                nav_visible: false,
                ..ShortcutFlags::default()
            }
        );

        let ui = UiOptionsPatch {
            sidebar_animations: Some(false),
            ..Default::default()
        }
        .apply_to(&UiOptions::default());
        assert!(!ui.sidebar_animations);
        assert_eq!(ui.name, "STORYBOOK");
    }

    #[test]
    fn null_patch_clears_nullable_ui_options() {
        let themed = UiOptionsPatch {
            theme: Some(Some(serde_json::json!({ "brand": "acme" }))),
            hierarchy_root_separator: Some(Some("|".into())),
            ..Default::default()
        }
        .apply_to(&UiOptions::default());
        assert_eq!(themed.hierarchy_root_separator.as_deref(), Some("|"));

        let untouched: UiOptionsPatch =
            serde_json::from_str(r#"{"name":"Kit"}"#).expect("patch");
        assert_eq!(untouched.theme, None);
        assert_eq!(untouched.apply_to(&themed).theme, themed.theme);

        let clearing: UiOptionsPatch =
            serde_json::from_str(r#"{"theme":null,"hierarchy_root_separator":null}"#)
                .expect("patch");
        assert_eq!(clearing.theme, Some(None));
        let cleared = clearing.apply_to(&themed);
        assert_eq!(cleared.theme, None);
        assert_eq!(cleared.hierarchy_root_separator, None);
        assert_eq!(cleared.name, "STORYBOOK");
    }
}
