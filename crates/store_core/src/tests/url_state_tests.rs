use super::*;

#[test]
fn coerces_numeric_strings_like_a_browser_router() {
    assert!(coerce_flag("1"));
    assert!(coerce_flag(" 2 "));
    assert!(coerce_flag("-1"));
    assert!(!coerce_flag("0"));
    assert!(!coerce_flag("0.0"));
    assert!(!coerce_flag(""));
    assert!(!coerce_flag("true"));
    assert!(!coerce_flag("NaN"));
}

#[test]
fn coerces_only_number_spellings_a_browser_accepts() {
    assert!(coerce_flag("Infinity"));
    assert!(coerce_flag("-Infinity"));
    assert!(!coerce_flag("inf"));
    assert!(!coerce_flag("infinity"));
    assert!(!coerce_flag("nan"));
    assert!(coerce_flag("1e3"));
    assert!(!coerce_flag("0e5"));
    assert!(!coerce_flag("1e"));
    assert!(coerce_flag("0x10"));
    assert!(coerce_flag("0B1"));
    assert!(coerce_flag("0o7"));
    assert!(!coerce_flag("0x0"));
    assert!(!coerce_flag("0x"));
    assert!(!coerce_flag("0xg1"));
    assert!(!coerce_flag("-0x10"));
}

#[test]
fn location_defaults_apply_for_absent_keys() {
    let update = LocationUpdate::parse(Vec::<(String, String)>::new());
    assert_eq!(update.selection, None);
    assert_eq!(update.addon_panel, None);
    assert_eq!(
        update.shortcuts,
        ShortcutOptionsPatch {
            full: Some(false),
            nav: Some(true),
            panel: Some(PanelLayout::Bottom),
            enable_shortcuts: None,
        }
    );
    assert!(update.custom.is_empty());
}

#[test]
fn location_routes_unrecognized_keys_to_custom_params() {
    let update = LocationUpdate::parse([
        ("selectedKind", "Button"),
        ("selectedStory", "primary"),
        ("addonPanel", "notes"),
        ("full", "1"),
        ("nav", "0"),
        ("panel", "left"),
        ("theme", "dark"),
    ]);
    assert_eq!(
        update.selection,
        Some((KindId::from("Button"), Some(StoryId::from("primary"))))
    );
    assert_eq!(update.addon_panel, Some(PanelId::from("notes")));
    assert_eq!(update.shortcuts.full, Some(true));
    assert_eq!(update.shortcuts.nav, Some(false));
    assert_eq!(update.shortcuts.panel, Some(PanelLayout::Hidden));
    assert_eq!(
        update.custom,
        QueryParams::from([("theme".to_string(), "dark".to_string())])
    );
}

#[test]
fn empty_selected_kind_is_ignored() {
    let update = LocationUpdate::parse([("selectedKind", ""), ("selectedStory", "x")]);
    assert_eq!(update.selection, None);
}

#[test]
fn merge_drops_null_values_and_deletes_existing_keys() {
    let current = QueryParams::from([("y".to_string(), "old".to_string())]);
    let merged = merge_query_params(
        &current,
        [("x", Some("1".to_string())), ("y", None), ("z", None)],
    );
    assert_eq!(merged, QueryParams::from([("x".to_string(), "1".to_string())]));
}

#[test]
fn projection_encodes_recognized_option_set() {
    let state = UrlState::project(
        &Selection::new("Button", "primary"),
        &ShortcutFlags {
            fullscreen: true,
            nav_visible: false,
            panel_layout: PanelLayout::Hidden,
            shortcuts_enabled: true,
        },
        &QueryParams::new(),
    );
    let params = state.to_params();
    assert_eq!(params["selectedKind"], "Button");
    assert_eq!(params["selectedStory"], "primary");
    assert_eq!(params["full"], "1");
    assert_eq!(params["nav"], "0");
    assert_eq!(params["panel"], "");
}

#[test]
fn custom_params_win_on_collision() {
    let custom = QueryParams::from([
        ("full".to_string(), "yes".to_string()),
        ("locale".to_string(), "fr".to_string()),
    ]);
    let state = UrlState::project(&Selection::none(), &ShortcutFlags::default(), &custom);
    let params = state.to_params();
    assert_eq!(params["full"], "yes");
    assert_eq!(params["locale"], "fr");
    assert!(!params.contains_key("selectedKind"));
}

#[test]
fn url_state_serializes_custom_params_inline() {
    let custom = QueryParams::from([("locale".to_string(), "fr".to_string())]);
    let state = UrlState::project(
        &Selection::new("A", "a1"),
        &ShortcutFlags::default(),
        &custom,
    );
    let json = serde_json::to_value(&state).expect("json");
    assert_eq!(
        json,
        serde_json::json!({
            "selectedKind": "A",
            "selectedStory": "a1",
            "full": false,
            "panel": "right",
            "nav": true,
            "locale": "fr",
        })
    );
}

#[test]
fn serialized_url_state_has_one_key_per_param() {
    let custom = QueryParams::from([("full".to_string(), "yes".to_string())]);
    let flags = ShortcutFlags {
        panel_layout: PanelLayout::Hidden,
        ..ShortcutFlags::default()
    };
    let state = UrlState::project(&Selection::none(), &flags, &custom);

    let text = serde_json::to_string(&state).expect("json");
    assert_eq!(text.matches("\"full\"").count(), 1);

    let parsed: serde_json::Value = serde_json::from_str(&text).expect("parse");
    assert_eq!(
        parsed,
        serde_json::json!({
            "selectedKind": null,
            "selectedStory": null,
            "full": "yes",
            "panel": false,
            "nav": true,
        })
    );
}
