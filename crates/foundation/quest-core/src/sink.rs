//! Presentation sink
//!
//! The runtime never draws anything itself. Every user-visible change is
//! pushed through a `PresentationSink` as plain data; the terminal console
//! is one implementation, `NullSink` discards everything.

use crate::field::CustomField;
use crate::item::DashboardSnapshot;
use crate::types::{ActionKind, QuestProgress, RequestTrace, ResponseTrace};
use serde_json::{Map, Value};

/// Receiver of rendering commands
pub trait PresentationSink: Send + Sync {
    /// Base URL changed (or was loaded at startup)
    fn render_base_url(&self, _base_url: &str) {}

    fn render_request_trace(&self, trace: &RequestTrace);

    fn render_response_trace(&self, trace: &ResponseTrace);

    /// Quest totals after an action; `newly_completed` is set on first credit
    fn render_quest_progress(&self, progress: &QuestProgress, newly_completed: Option<ActionKind>);

    /// Number of CRUD requests issued this session
    fn render_request_count(&self, _count: u64) {}

    /// Registered custom fields plus the payload schema preview
    fn render_custom_fields(&self, fields: &[CustomField], preview: &Map<String, Value>);

    fn render_dashboard(&self, snapshot: &DashboardSnapshot);
}

/// A sink that discards everything.
///
/// Useful for tests and for scripted use where only return values matter.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl PresentationSink for NullSink {
    fn render_request_trace(&self, _trace: &RequestTrace) {}

    fn render_response_trace(&self, _trace: &ResponseTrace) {}

    fn render_quest_progress(&self, _progress: &QuestProgress, _newly_completed: Option<ActionKind>) {}

    fn render_custom_fields(&self, _fields: &[CustomField], _preview: &Map<String, Value>) {}

    fn render_dashboard(&self, _snapshot: &DashboardSnapshot) {}
}
