//! Rendering hand-off seam.
//!
//! The widget never draws anything itself; it hands normalized series to an
//! external rendering collaborator, one call per panel, addressed by a
//! `dashboard-<panel_id>` target name. The hosting surface must provide one
//! render target per panel it expects drawn under that name.

use crate::normalize::NormalizedSeries;

/// Render configuration passed with every hand-off
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderOptions {
    /// X-axis tick labels. Off by default: the x-axis is a synthetic rank,
    /// not a meaningful timestamp.
    pub show_x_ticks: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { show_x_ticks: false }
    }
}

/// Target identifier for a panel's rendering surface
pub fn panel_target(panel_id: u64) -> String {
    format!("dashboard-{}", panel_id)
}

/// Seam for the external rendering collaborator.
///
/// Invoked synchronously once per panel after every merge; implementations
/// that cannot resolve `target` decide for themselves whether to no-op or
/// fail, mirroring how a hosting page would behave.
pub trait Renderer {
    fn render(&mut self, target: &str, series: &[NormalizedSeries], options: &RenderOptions);
}

/// Renderer that reports series shapes through `tracing`.
///
/// Useful for headless hosts and for diagnosing what a widget would draw.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogRenderer;

impl Renderer for LogRenderer {
    fn render(&mut self, target: &str, series: &[NormalizedSeries], _options: &RenderOptions) {
        for s in series {
            tracing::info!("{}: '{}' with {} point(s)", target, s.label, s.data.len());
        }
    }
}
