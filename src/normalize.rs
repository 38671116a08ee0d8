//! Rank normalization of accumulated series for charting.
//!
//! Point ids order a series but carry no meaning on a chart axis, so each
//! series is reindexed to consecutive zero-based ranks before rendering. This
//! transform is pure with respect to the dashboard state and recomputed from
//! scratch on every render pass; accumulated sizes are dashboard-scale, so
//! the full recompute stays cheap.

use crate::state::{LabelSeries, PanelData};

/// A plot-ready series for one label
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedSeries {
    /// Metric label, e.g. "cpu"
    pub label: String,
    /// `[rank, value]` pairs, rank dense from zero in ascending point-id order
    pub data: Vec<[f64; 2]>,
}

/// Reindex one label series to consecutive zero-based ranks.
///
/// For a series of n points this yields exactly n pairs `[0, v0]` through
/// `[n-1, v_{n-1}]`, where `v_i` is the value of the point with the i-th
/// smallest point id. The original ids are discarded; only their ordering
/// survives.
pub fn normalize_series(series: &LabelSeries) -> Vec<[f64; 2]> {
    // LabelSeries iteration is ascending by point id, the required order
    series
        .values()
        .enumerate()
        .map(|(rank, point)| [rank as f64, point.value])
        .collect()
}

/// Produce the per-label series list handed to the renderer for one panel,
/// in ascending label order
pub fn normalize_panel(panel: &PanelData) -> Vec<NormalizedSeries> {
    panel
        .iter()
        .map(|(label, series)| NormalizedSeries {
            label: label.clone(),
            data: normalize_series(series),
        })
        .collect()
}
