//! Common test utilities shared across all test modules
//!
//! Provides scripted fetch and collecting render collaborators plus helpers
//! for building batch fixtures.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};

use liveboard::fetch::{Batch, FetchError, Fetcher};
use liveboard::normalize::NormalizedSeries;
use liveboard::render::{RenderOptions, Renderer};

/// Initialize tracing output for a test run; safe to call repeatedly
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Build a batch item from label/value pairs
pub fn batch(panel_id: u64, point_id: u64, data: &[(&str, f64)]) -> Batch {
    Batch {
        panel_id,
        point_id,
        data: data
            .iter()
            .map(|(label, value)| (label.to_string(), *value))
            .collect::<BTreeMap<_, _>>(),
    }
}

/// Fetcher replaying a scripted sequence of responses.
///
/// Records the watermark of every call into a shared log. Once the script is
/// exhausted it keeps answering with an empty batch list, like an endpoint
/// with nothing new to report.
pub struct ScriptedFetcher {
    script: VecDeque<Result<Vec<Batch>, FetchError>>,
    watermarks: Arc<Mutex<Vec<u64>>>,
}

impl ScriptedFetcher {
    pub fn new(script: Vec<Result<Vec<Batch>, FetchError>>) -> Self {
        Self {
            script: script.into(),
            watermarks: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared handle to the watermark log, valid after the fetcher moves
    pub fn watermark_log(&self) -> Arc<Mutex<Vec<u64>>> {
        Arc::clone(&self.watermarks)
    }
}

impl Fetcher for ScriptedFetcher {
    fn fetch(&mut self, watermark: u64) -> Result<Vec<Batch>, FetchError> {
        self.watermarks.lock().unwrap().push(watermark);
        self.script.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// One recorded render hand-off
#[derive(Clone, Debug)]
pub struct RenderCall {
    pub target: String,
    pub series: Vec<NormalizedSeries>,
    pub options: RenderOptions,
}

/// Renderer recording every hand-off into a shared log
#[derive(Clone, Default)]
pub struct CollectingRenderer {
    calls: Arc<Mutex<Vec<RenderCall>>>,
}

impl CollectingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every call so far
    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Most recent call addressed to `target`
    pub fn last_for(&self, target: &str) -> Option<RenderCall> {
        self.calls()
            .into_iter()
            .rev()
            .find(|call| call.target == target)
    }

    #[allow(dead_code)]
    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl Renderer for CollectingRenderer {
    fn render(&mut self, target: &str, series: &[NormalizedSeries], options: &RenderOptions) {
        self.calls.lock().unwrap().push(RenderCall {
            target: target.to_string(),
            series: series.to_vec(),
            options: *options,
        });
    }
}
