use std::{fs, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use shared::{
    domain::{KindId, PanelRegistry, StoryId},
    protocol::{decode_hierarchy, ShortcutEvent},
};
use store_core::{config::load_settings, QueryParams, Store, StoryProvider};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Replays a browsing session against a catalog and prints the resulting URL.
#[derive(Parser, Debug)]
struct Args {
    /// Catalog JSON: `[{"kind": "...", "stories": ["..."]}]`.
    #[arg(long)]
    stories: PathBuf,
    /// Store config TOML (defaults to ./store.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Initial location query string, e.g. `selectedKind=Button&full=1`.
    #[arg(long, default_value = "")]
    location: String,
    /// Shortcut events to dispatch in order, e.g. `next_story,fullscreen`.
    #[arg(long = "events", value_delimiter = ',')]
    events: Vec<ShortcutEvent>,
    /// Print the URL state as JSON instead of a query string.
    #[arg(long)]
    json: bool,
}

struct LoggingProvider;

impl StoryProvider for LoggingProvider {
    fn panels(&self) -> PanelRegistry {
        PanelRegistry::new()
    }

    fn render_preview(&self, kind: Option<&KindId>, story: Option<&StoryId>) {
        info!(?kind, ?story, "render preview");
    }
}

/// `RUST_LOG` directives when present and valid, `info` otherwise.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn main() -> Result<()> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives.as_deref()))
        .init();
    let args = Args::parse();

    let config = load_settings(args.config.as_deref())?;
    let raw = fs::read_to_string(&args.stories)
        .with_context(|| format!("failed to read catalog '{}'", args.stories.display()))?;
    let hierarchy = decode_hierarchy(&raw)?;

    let mut store = Store::new(config, Arc::new(LoggingProvider));
    store.update_from_location(parse_query(&args.location));
    store.set_stories(hierarchy);
    for event in args.events {
        store.handle_event(event);
    }
    store.render_preview();

    let url_state = store.url_state();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&url_state)?);
    } else {
        println!("?{}", encode_query(&url_state.to_params()));
    }

    Ok(())
}

fn parse_query(raw: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(raw.trim_start_matches('?').as_bytes())
        .into_owned()
        .collect()
}

fn encode_query(params: &QueryParams) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish()
}
