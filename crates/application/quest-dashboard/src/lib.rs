//! # Item Quest Dashboard
//!
//! Turns the raw item collection into the dashboard view: table rows, item
//! count, total stock value and the labeled series the charts draw.
//!
//! There is no incremental update. Every refresh recomputes the whole
//! snapshot from the latest collection and replaces the previous one.

use quest_core::{ChartSeries, DashboardSnapshot, Item, PresentationSink, Result};
use quest_session::ApiSession;
use std::sync::Arc;
use tracing::{debug, warn};

/// Derive a snapshot from `items`. Pure; items are kept in received order.
pub fn refresh(items: Vec<Item>) -> DashboardSnapshot {
    let mut chart_series = ChartSeries::default();
    let mut total_value = 0.0;

    for item in &items {
        let value = item.value();
        total_value += value;

        chart_series.labels.push(item.label());
        chart_series.quantities.push(item.quantity());
        chart_series.values.push(value);
    }

    DashboardSnapshot {
        item_count: items.len(),
        rows: items,
        total_value,
        chart_series,
    }
}

/// Holds the latest snapshot and pushes each new one to the sink
pub struct Dashboard {
    snapshot: DashboardSnapshot,
    sink: Arc<dyn PresentationSink>,
}

impl Dashboard {
    pub fn new(sink: Arc<dyn PresentationSink>) -> Self {
        Self {
            snapshot: DashboardSnapshot::default(),
            sink,
        }
    }

    pub fn snapshot(&self) -> &DashboardSnapshot {
        &self.snapshot
    }

    /// Replace the snapshot with one computed from `items`
    pub fn refresh(&mut self, items: Vec<Item>) -> &DashboardSnapshot {
        self.snapshot = refresh(items);
        debug!(
            items = self.snapshot.item_count,
            total = %self.snapshot.total_value_display(),
            "dashboard refreshed"
        );
        self.sink.render_dashboard(&self.snapshot);
        &self.snapshot
    }

    /// Fetch the collection and refresh.
    ///
    /// When the fetch fails an empty snapshot is published before the error
    /// is returned, so the view never shows stale numbers.
    pub async fn refresh_from(&mut self, session: &ApiSession) -> Result<&DashboardSnapshot> {
        match session.fetch_collection().await {
            Ok(items) => Ok(self.refresh(items)),
            Err(err) => {
                warn!(error = %err, "dashboard fetch failed");
                self.refresh(Vec::new());
                Err(err)
            }
        }
    }
}
