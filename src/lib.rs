//! liveboard - a polling dashboard widget library
//!
//! This library implements a host-embeddable dashboard widget: it polls a
//! JSON data endpoint for newly produced metric points, accumulates them per
//! panel and label, normalizes each series to dense zero-based ranks, and
//! hands the plot-ready result to an external rendering collaborator.
//!
//! ## Module Structure
//!
//! - [`state`] - Core data model and the batch accumulator
//! - [`fetch`] - Batch wire format, fetch errors, and the HTTP poller
//! - [`normalize`] - Rank normalization of accumulated series
//! - [`render`] - Rendering hand-off seam and target naming
//! - [`widget`] - Widget composition, the poll cycle, and the polling loop

pub mod fetch;
pub mod normalize;
pub mod render;
pub mod state;
pub mod widget;
