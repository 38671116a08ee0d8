//! Pipeline tests exercising merge and normalization through the public API,
//! independent of the widget loop.

#[path = "common/mod.rs"]
mod common;

use common::batch;
use liveboard::fetch::decode_batches;
use liveboard::normalize::{normalize_panel, normalize_series};
use liveboard::state::DashboardState;

#[test]
fn test_decoded_payload_flows_into_state() {
    let payload = r#"[
        {"panel_id": 1, "point_id": 5, "data": {"cpu": 10.0}},
        {"panel_id": 1, "point_id": 3, "data": {"cpu": 7.0}}
    ]"#;

    let batches = decode_batches(payload).unwrap();
    let mut state = DashboardState::new();
    state.merge(&batches);

    assert_eq!(state.max_seen_id(), 5);
    let series = &state.panel(1).unwrap()["cpu"];
    assert_eq!(normalize_series(series), vec![[0.0, 7.0], [1.0, 10.0]]);
}

#[test]
fn test_rank_transform_produces_exactly_n_pairs() {
    let mut state = DashboardState::new();
    let n = 25u64;
    for point_id in (1..=n).rev() {
        state.merge(&[batch(1, point_id, &[("cpu", point_id as f64 * 0.5)])]);
    }

    let series = &state.panel(1).unwrap()["cpu"];
    let normalized = normalize_series(series);

    assert_eq!(normalized.len(), n as usize);
    for (rank, pair) in normalized.iter().enumerate() {
        assert_eq!(pair[0], rank as f64);
        // The i-th smallest point id is i + 1, so its value is (i + 1) / 2
        assert_eq!(pair[1], (rank as f64 + 1.0) * 0.5);
    }
}

#[test]
fn test_normalization_recomputes_from_scratch_each_pass() {
    let mut state = DashboardState::new();
    state.merge(&[batch(1, 10, &[("cpu", 1.0)])]);

    let first = normalize_panel(state.panel(1).unwrap());
    assert_eq!(first[0].data, vec![[0.0, 1.0]]);

    // An earlier id arriving later shifts every rank on the next pass
    state.merge(&[batch(1, 4, &[("cpu", 0.5)])]);
    let second = normalize_panel(state.panel(1).unwrap());
    assert_eq!(second[0].data, vec![[0.0, 0.5], [1.0, 1.0]]);
}

#[test]
fn test_labels_accumulate_independently_within_a_panel() {
    let mut state = DashboardState::new();
    state.merge(&[
        batch(1, 1, &[("cpu", 1.0), ("mem", 5.0)]),
        batch(1, 2, &[("cpu", 2.0)]),
    ]);

    let normalized = normalize_panel(state.panel(1).unwrap());
    assert_eq!(normalized.len(), 2);
    assert_eq!(normalized[0].label, "cpu");
    assert_eq!(normalized[0].data, vec![[0.0, 1.0], [1.0, 2.0]]);
    assert_eq!(normalized[1].label, "mem");
    assert_eq!(normalized[1].data, vec![[0.0, 5.0]]);
}
