//! Addon panel selection and the diagnostic sink used when a requested panel
//! does not exist.

use shared::domain::{PanelId, PanelRegistry};
use tracing::info;

const AVAILABLE_PANELS_GROUP: &str = "Available Panels ID:";

/// Grouped diagnostic output, shaped like a console group.
pub trait DiagnosticSink: Send + Sync {
    fn group(&self, label: &str);
    fn log(&self, line: &str);
    fn group_end(&self, label: &str);
}

/// Default sink: every call becomes a `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
    fn group(&self, label: &str) {
        info!(group = label, "diagnostic group start");
    }

    fn log(&self, line: &str) {
        info!("{line}");
    }

    fn group_end(&self, label: &str) {
        info!(group = label, "diagnostic group end");
    }
}

/// Returns `candidate` when it is registered, otherwise `fallback`. The
/// fallback path enumerates every registered panel to `sink`.
pub fn ensure_panel(
    registry: &PanelRegistry,
    candidate: &PanelId,
    fallback: Option<&PanelId>,
    sink: &dyn DiagnosticSink,
) -> Option<PanelId> {
    if registry.contains_key(candidate) {
        return Some(candidate.clone());
    }

    sink.group(AVAILABLE_PANELS_GROUP);
    for (panel_id, meta) in registry {
        sink.log(&format!("{panel_id} ({})", meta.title));
    }
    sink.group_end(AVAILABLE_PANELS_GROUP);

    fallback.cloned()
}
