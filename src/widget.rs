//! Widget composition: configuration, the poll cycle, and the polling loop.
//!
//! A [`Dashboard`] owns its accumulated state privately and composes the
//! fetch and render collaborators. One cycle is fetch past the current
//! watermark, merge, render every panel; cycles run strictly sequentially,
//! with the next one scheduled a fixed delay after the previous one finished
//! rather than at wall-clock ticks, so a slow fetch stretches the cadence
//! instead of stacking requests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::fetch::{Batch, FetchError, Fetcher, HttpFetcher};
use crate::normalize::normalize_panel;
use crate::render::{panel_target, RenderOptions, Renderer};
use crate::state::{DashboardState, DEFAULT_POLL_INTERVAL};

/// How often a waiting loop re-checks its shutdown flag
const SHUTDOWN_POLL_SLICE: Duration = Duration::from_millis(100);

// ============================================================================
// Configuration
// ============================================================================

/// Construction parameters for a dashboard widget
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// URL polled for new batches
    pub data_endpoint: String,
    /// Delay between the end of one poll cycle and the start of the next
    #[serde(default = "default_poll_interval")]
    pub poll_interval: Duration,
}

fn default_poll_interval() -> Duration {
    DEFAULT_POLL_INTERVAL
}

impl DashboardConfig {
    /// Config for the given endpoint with the default 10 s interval
    pub fn new(data_endpoint: impl Into<String>) -> Self {
        Self {
            data_endpoint: data_endpoint.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the poll interval
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

// ============================================================================
// Shutdown
// ============================================================================

/// Clonable stop flag for a running poll loop.
///
/// The source this design descends from polled forever with no way to stop;
/// any widget embedded in a managed process needs a graceful way out, so the
/// loop checks this flag between cycles and during the inter-cycle wait.
#[derive(Clone, Debug, Default)]
pub struct ShutdownHandle {
    stop: Arc<AtomicBool>,
}

impl ShutdownHandle {
    /// Create a handle in the running state
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the loop to stop after the current cycle
    pub fn shutdown(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Whether a stop has been requested
    pub fn is_shutdown(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }
}

// ============================================================================
// Widget
// ============================================================================

/// A dashboard widget instance: private accumulated state plus its fetch and
/// render collaborators
pub struct Dashboard<F, R> {
    config: DashboardConfig,
    state: DashboardState,
    fetcher: F,
    renderer: R,
    options: RenderOptions,
}

impl<R: Renderer> Dashboard<HttpFetcher, R> {
    /// Widget polling `config.data_endpoint` over HTTP
    pub fn over_http(config: DashboardConfig, renderer: R) -> Self {
        let fetcher = HttpFetcher::new(config.data_endpoint.clone());
        Self::new(config, fetcher, renderer)
    }
}

impl<F: Fetcher, R: Renderer> Dashboard<F, R> {
    /// Widget with explicit collaborators
    pub fn new(config: DashboardConfig, fetcher: F, renderer: R) -> Self {
        Self {
            config,
            state: DashboardState::new(),
            fetcher,
            renderer,
            options: RenderOptions::default(),
        }
    }

    /// Accumulated state, read-only
    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Merge externally supplied batches and re-render, without polling.
    ///
    /// Lets a host seed the widget with a bootstrap payload delivered outside
    /// the poll channel, e.g. inlined into the page that embeds it.
    pub fn ingest(&mut self, batches: &[Batch]) {
        self.state.merge(batches);
        self.render_all();
    }

    /// Run one poll cycle: fetch past the current watermark, merge, render.
    ///
    /// The merge and every render complete before this returns, so cycles
    /// never interleave.
    pub fn poll_cycle(&mut self) -> Result<(), FetchError> {
        let watermark = self.state.max_seen_id();
        let batches = self.fetcher.fetch(watermark)?;
        self.state.merge(&batches);
        self.render_all();
        Ok(())
    }

    /// Re-render every panel from the accumulated state.
    ///
    /// Not incremental: each pass recomputes every series from scratch.
    pub fn render_all(&mut self) {
        let Dashboard {
            state,
            renderer,
            options,
            ..
        } = self;

        for (panel_id, panel) in state.panels() {
            let series = normalize_panel(panel);
            renderer.render(&panel_target(panel_id), &series, options);
        }
    }

    /// Run the polling loop until `handle` is shut down.
    ///
    /// The first cycle starts immediately; each later cycle starts
    /// `poll_interval` after the previous one finished. A fetch or decode
    /// error stops the loop and propagates; the endpoint halting the widget
    /// matches the behavior this design descends from, surfaced as an error
    /// instead of a silent stall.
    pub fn run(&mut self, handle: &ShutdownHandle) -> Result<(), FetchError> {
        tracing::info!(
            "dashboard polling {} every {:?}",
            self.config.data_endpoint,
            self.config.poll_interval
        );

        while !handle.is_shutdown() {
            self.poll_cycle()?;
            wait(self.config.poll_interval, handle);
        }

        tracing::info!("dashboard poll loop stopped");
        Ok(())
    }
}

impl<F, R> Dashboard<F, R>
where
    F: Fetcher + Send + 'static,
    R: Renderer + Send + 'static,
{
    /// Run the polling loop on a background thread.
    ///
    /// The returned handle stops the loop and collects its outcome.
    pub fn spawn(mut self) -> DashboardHandle {
        let shutdown = ShutdownHandle::new();
        let loop_shutdown = shutdown.clone();
        let join = thread::spawn(move || self.run(&loop_shutdown));

        DashboardHandle { shutdown, join }
    }
}

/// Sleep in short slices so shutdown stays responsive during the wait
fn wait(interval: Duration, handle: &ShutdownHandle) {
    let deadline = Instant::now() + interval;
    while !handle.is_shutdown() {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        thread::sleep(remaining.min(SHUTDOWN_POLL_SLICE));
    }
}

/// A widget polling on a background thread
pub struct DashboardHandle {
    shutdown: ShutdownHandle,
    join: JoinHandle<Result<(), FetchError>>,
}

impl DashboardHandle {
    /// Clone of the loop's stop flag, usable from anywhere
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Whether the loop has exited, either by shutdown or by error
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Signal the loop to stop and wait for it to finish
    pub fn stop(self) -> Result<(), FetchError> {
        self.shutdown.shutdown();
        self.join.join().expect("poll loop thread panicked")
    }
}
