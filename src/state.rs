//! Core dashboard state types and the batch accumulator.
//!
//! This module contains the nested ordered mappings that hold every metric
//! point a widget has seen, keyed by panel id, then label, then point id,
//! plus the poll watermark derived from them.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::fetch::Batch;

// ============================================================================
// Constants
// ============================================================================

/// Default delay between the end of one poll cycle and the start of the next
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

// ============================================================================
// Core Types
// ============================================================================

/// A single observation within a label series
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DataPoint {
    /// Server-issued, monotonically increasing identifier. Used as the dedup
    /// and sort key, never as the rendered x-value.
    pub point_id: u64,
    /// Observed metric value
    pub value: f64,
}

/// All points for one `(panel, label)` pair, keyed by point id.
///
/// At most one point per id; a re-delivered id overwrites in place.
/// Iteration yields ascending point ids, which is the render order.
pub type LabelSeries = BTreeMap<u64, DataPoint>;

/// Label name to its series, owned by exactly one panel
pub type PanelData = BTreeMap<String, LabelSeries>;

/// Accumulated state for one dashboard widget instance.
///
/// Initialized empty at widget construction and mutated on every merged poll
/// response. Held privately by a widget rather than in any ambient static, so
/// a process can run multiple independent widgets.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DashboardState {
    /// Panel id to that panel's per-label series
    panels: BTreeMap<u64, PanelData>,
    /// Highest point id ever merged, sent as the next poll watermark
    max_seen_id: u64,
}

impl DashboardState {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest point id observed so far.
    ///
    /// The server is expected to return only points with ids greater than
    /// this; that filtering is a server-side contract, not enforced here.
    pub fn max_seen_id(&self) -> u64 {
        self.max_seen_id
    }

    /// Iterate over panels in ascending panel-id order
    pub fn panels(&self) -> impl Iterator<Item = (u64, &PanelData)> {
        self.panels.iter().map(|(id, panel)| (*id, panel))
    }

    /// Look up one panel's accumulated series
    pub fn panel(&self, panel_id: u64) -> Option<&PanelData> {
        self.panels.get(&panel_id)
    }

    /// Number of panels that have received at least one batch
    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    /// Merge a poll response into the accumulated state.
    ///
    /// Panel and label entries are created on first sight. Every `(label,
    /// value)` pair in a batch item is stored under that item's point id;
    /// re-delivering the same `(panel, label, point_id)` overwrites in place,
    /// so merging is idempotent and input order never affects the final
    /// state. The watermark advances per batch item, so a response with
    /// out-of-order ids still leaves the correct running maximum.
    pub fn merge(&mut self, batches: &[Batch]) {
        for batch in batches {
            let panel = self.panels.entry(batch.panel_id).or_default();

            for (label, &value) in &batch.data {
                let series = panel.entry(label.clone()).or_default();
                series.insert(
                    batch.point_id,
                    DataPoint {
                        point_id: batch.point_id,
                        value,
                    },
                );
            }

            if batch.point_id > self.max_seen_id {
                self.max_seen_id = batch.point_id;
            }
        }
    }
}
