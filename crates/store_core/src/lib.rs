use std::sync::Arc;

use shared::{
    domain::{Hierarchy, KindId, PanelId, PanelRegistry, StoryId},
    protocol::ShortcutEvent,
};
use tokio::sync::broadcast;
use tracing::{debug, info};

pub mod config;
pub mod keymap;
pub mod panels;
pub mod reconcile;
pub mod shortcuts;
pub mod traversal;
pub mod url_state;

pub use config::{StoreConfig, UiOptions};
pub use keymap::KeyChord;
pub use panels::{DiagnosticSink, TracingDiagnostics};
pub use reconcile::Selection;
pub use shortcuts::ShortcutFlags;
pub use url_state::{QueryParams, UrlState};

use config::{ShortcutOptionsPatch, UiOptionsPatch};
use shortcuts::ShortcutEffect;
use url_state::LocationUpdate;

const CHANGE_CHANNEL_CAPACITY: usize = 256;

/// Catalog owner. Supplies the panel registry and renders the selected story.
pub trait StoryProvider: Send + Sync {
    fn panels(&self) -> PanelRegistry;
    fn render_preview(&self, kind: Option<&KindId>, story: Option<&StoryId>);
}

/// Provider with no panels that renders nothing.
pub struct MissingStoryProvider;

impl StoryProvider for MissingStoryProvider {
    fn panels(&self) -> PanelRegistry {
        PanelRegistry::new()
    }

    fn render_preview(&self, kind: Option<&KindId>, story: Option<&StoryId>) {
        debug!(?kind, ?story, "no story provider attached; preview skipped");
    }
}

/// Notification published after an operation has committed.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreChange {
    Stories { kinds: usize, stories: usize },
    Selection(Selection),
    Shortcuts(ShortcutFlags),
    AddonPanel(Option<PanelId>),
    QueryParams(QueryParams),
    UiOptions(UiOptions),
    StoryFilter(Option<String>),
    ShortcutsHelp(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoreState {
    pub stories: Arc<Hierarchy>,
    pub selection: Selection,
    pub shortcuts: ShortcutFlags,
    pub selected_addon_panel: Option<PanelId>,
    pub custom_query_params: QueryParams,
    pub ui_options: UiOptions,
    pub story_filter: Option<String>,
    pub show_shortcuts_help: bool,
}

impl StoreState {
    pub fn from_config(config: &StoreConfig) -> Self {
        Self {
            stories: Arc::new(Hierarchy::default()),
            selection: Selection::none(),
            shortcuts: config.shortcuts.to_flags(),
            selected_addon_panel: None,
            custom_query_params: QueryParams::new(),
            ui_options: config.ui.clone(),
            story_filter: None,
            show_shortcuts_help: false,
        }
    }

    fn changes_since(&self, previous: &StoreState) -> Vec<StoreChange> {
        let mut changes = Vec::new();
        if !Arc::ptr_eq(&self.stories, &previous.stories) {
            changes.push(StoreChange::Stories {
                kinds: self.stories.len(),
                stories: self.stories.story_count(),
            });
        }
        if self.selection != previous.selection {
            changes.push(StoreChange::Selection(self.selection.clone()));
        }
        if self.shortcuts != previous.shortcuts {
            changes.push(StoreChange::Shortcuts(self.shortcuts));
        }
        if self.selected_addon_panel != previous.selected_addon_panel {
            changes.push(StoreChange::AddonPanel(self.selected_addon_panel.clone()));
        }
        if self.custom_query_params != previous.custom_query_params {
            changes.push(StoreChange::QueryParams(self.custom_query_params.clone()));
        }
        if self.ui_options != previous.ui_options {
            changes.push(StoreChange::UiOptions(self.ui_options.clone()));
        }
        if self.story_filter != previous.story_filter {
            changes.push(StoreChange::StoryFilter(self.story_filter.clone()));
        }
        if self.show_shortcuts_help != previous.show_shortcuts_help {
            changes.push(StoreChange::ShortcutsHelp(self.show_shortcuts_help));
        }
        changes
    }
}

/// Client-side state for the catalog browser.
///
/// Every mutating method builds the complete next [`StoreState`], swaps it in
/// with a single assignment and only then publishes [`StoreChange`]s, so a
/// subscriber never observes a reconciled kind next to a stale story.
pub struct Store {
    provider: Arc<dyn StoryProvider>,
    diagnostics: Arc<dyn DiagnosticSink>,
    state: StoreState,
    events: broadcast::Sender<StoreChange>,
}

impl Store {
    pub fn new(config: StoreConfig, provider: Arc<dyn StoryProvider>) -> Self {
        Self::new_with_diagnostics(config, provider, Arc::new(TracingDiagnostics))
    }

    pub fn new_with_diagnostics(
        config: StoreConfig,
        provider: Arc<dyn StoryProvider>,
        diagnostics: Arc<dyn DiagnosticSink>,
    ) -> Self {
        let (events, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            provider,
            diagnostics,
            state: StoreState::from_config(&config),
            events,
        }
    }

    /// Receivers can be drained with `try_recv` from synchronous code.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.events.subscribe()
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    pub fn snapshot(&self) -> StoreState {
        self.state.clone()
    }

    pub fn stories(&self) -> &Hierarchy {
        &self.state.stories
    }

    pub fn selection(&self) -> &Selection {
        &self.state.selection
    }

    pub fn shortcuts(&self) -> ShortcutFlags {
        self.state.shortcuts
    }

    pub fn selected_addon_panel(&self) -> Option<&PanelId> {
        self.state.selected_addon_panel.as_ref()
    }

    pub fn custom_query_params(&self) -> &QueryParams {
        &self.state.custom_query_params
    }

    pub fn ui_options(&self) -> &UiOptions {
        &self.state.ui_options
    }

    pub fn story_filter(&self) -> Option<&str> {
        self.state.story_filter.as_deref()
    }

    pub fn shows_shortcuts_help(&self) -> bool {
        self.state.show_shortcuts_help
    }

    pub fn panels(&self) -> PanelRegistry {
        self.provider.panels()
    }

    pub fn render_preview(&self) {
        let selection = &self.state.selection;
        self.provider.render_preview(
            selection.selected_kind.as_ref(),
            selection.selected_story.as_ref(),
        );
    }

    pub fn url_state(&self) -> UrlState {
        UrlState::project(
            &self.state.selection,
            &self.state.shortcuts,
            &self.state.custom_query_params,
        )
    }

    pub fn set_stories(&mut self, stories: Hierarchy) {
        let selection = reconcile::reconcile_after_catalog_swap(&stories, &self.state.selection);
        info!(
            kinds = stories.len(),
            stories = stories.story_count(),
            "catalog replaced"
        );
        self.commit(StoreState {
            stories: Arc::new(stories),
            selection,
            ..self.state.clone()
        });
    }

    pub fn select_story(&mut self, kind: impl Into<KindId>, story: impl Into<StoryId>) {
        self.select(Some(kind.into()), Some(story.into()));
    }

    /// Selects `kind` and lets reconciliation pick its first story.
    pub fn select_kind(&mut self, kind: impl Into<KindId>) {
        self.select(Some(kind.into()), None);
    }

    pub fn select_in_current_kind(&mut self, story: impl Into<StoryId>) {
        let story = story.into();
        let selected_story = reconcile::reconcile_story(
            &self.state.stories,
            self.state.selection.selected_kind.as_ref(),
            Some(&story),
        );
        self.commit(StoreState {
            selection: Selection {
                selected_story,
                ..self.state.selection.clone()
            },
            ..self.state.clone()
        });
    }

    /// Moves `offset` steps through the flattened catalog. Returns whether
    /// the selection moved.
    pub fn jump_to_story(&mut self, offset: isize) -> bool {
        let Some(selection) =
            traversal::jump_target(&self.state.stories, &self.state.selection, offset)
        else {
            debug!(offset, "jump out of range; selection unchanged");
            return false;
        };
        self.commit(StoreState {
            selection,
            ..self.state.clone()
        });
        true
    }

    pub fn handle_event(&mut self, event: ShortcutEvent) {
        debug!(
            %event,
            enabled = self.state.shortcuts.shortcuts_enabled,
            "shortcut event"
        );
        let outcome = shortcuts::dispatch(event, self.state.shortcuts);
        match outcome.effect {
            Some(ShortcutEffect::Jump(offset)) => {
                self.jump_to_story(offset);
            }
            Some(ShortcutEffect::ToggleSearch) => self.toggle_search_box(),
            None => self.commit(StoreState {
                shortcuts: outcome.flags,
                ..self.state.clone()
            }),
        }
    }

    /// Dispatches an event given by name; unknown names are ignored.
    pub fn handle_event_name(&mut self, name: &str) {
        match name.parse::<ShortcutEvent>() {
            Ok(event) => self.handle_event(event),
            Err(err) => debug!(error = %err, "ignoring unrecognized shortcut event"),
        }
    }

    pub fn handle_key(&mut self, chord: KeyChord) {
        if let Some(event) = keymap::resolve(chord) {
            self.handle_event(event);
        }
    }

    pub fn set_shortcuts_options(&mut self, patch: ShortcutOptionsPatch) {
        self.commit(StoreState {
            shortcuts: patch.apply_to(self.state.shortcuts),
            ..self.state.clone()
        });
    }

    pub fn set_options(&mut self, patch: UiOptionsPatch) {
        let selected_addon_panel = match &patch.selected_addon_panel {
            Some(candidate) => self.ensure_panel(candidate),
            None => self.state.selected_addon_panel.clone(),
        };
        self.commit(StoreState {
            ui_options: patch.apply_to(&self.state.ui_options),
            selected_addon_panel,
            ..self.state.clone()
        });
    }

    pub fn select_addon_panel(&mut self, panel: impl Into<PanelId>) {
        let selected_addon_panel = self.ensure_panel(&panel.into());
        self.commit(StoreState {
            selected_addon_panel,
            ..self.state.clone()
        });
    }

    pub fn set_story_filter(&mut self, filter: Option<String>) {
        self.commit(StoreState {
            story_filter: filter,
            ..self.state.clone()
        });
    }

    pub fn set_shortcuts_help(&mut self, visible: bool) {
        self.commit(StoreState {
            show_shortcuts_help: visible,
            ..self.state.clone()
        });
    }

    /// Merges custom query parameters. A `None` value deletes the key.
    pub fn set_query_params<I, K>(&mut self, params: I)
    where
        I: IntoIterator<Item = (K, Option<String>)>,
        K: Into<String>,
    {
        let custom_query_params =
            url_state::merge_query_params(&self.state.custom_query_params, params);
        self.commit(StoreState {
            custom_query_params,
            ..self.state.clone()
        });
    }

    /// Applies a flat location parameter map in one commit.
    pub fn update_from_location<I, K, V>(&mut self, params: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let update = LocationUpdate::parse(params);

        let selection = match &update.selection {
            Some((kind, story)) => {
                reconcile::reconcile_selection(&self.state.stories, Some(kind), story.as_ref())
            }
            None => self.state.selection.clone(),
        };
        let selected_addon_panel = match &update.addon_panel {
            Some(panel) => self.ensure_panel(panel),
            None => self.state.selected_addon_panel.clone(),
        };
        let custom_query_params = url_state::merge_query_params(
            &self.state.custom_query_params,
            update.custom.into_iter().map(|(k, v)| (k, Some(v))),
        );

        self.commit(StoreState {
            selection,
            shortcuts: update.shortcuts.apply_to(self.state.shortcuts),
            selected_addon_panel,
            custom_query_params,
            ..self.state.clone()
        });
    }

    fn ensure_panel(&self, candidate: &PanelId) -> Option<PanelId> {
        panels::ensure_panel(
            &self.provider.panels(),
            candidate,
            self.state.selected_addon_panel.as_ref(),
            self.diagnostics.as_ref(),
        )
    }

    /// Reserved for the search box overlay.
    fn toggle_search_box(&mut self) {}

    fn select(&mut self, kind: Option<KindId>, story: Option<StoryId>) {
        let selection =
            reconcile::reconcile_selection(&self.state.stories, kind.as_ref(), story.as_ref());
        self.commit(StoreState {
            selection,
            ..self.state.clone()
        });
    }

    fn commit(&mut self, next: StoreState) {
        let previous = std::mem::replace(&mut self.state, next);
        for change in self.state.changes_since(&previous) {
            if let StoreChange::Selection(selection) = &change {
                debug!(
                    kind = selection.kind(),
                    story = selection.story(),
                    "selection committed"
                );
            }
            // No subscribers is fine.
            let _ = self.events.send(change);
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
