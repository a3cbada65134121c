//! Stroke recording for the Stylus core.
//!
//! This module provides:
//! - [`StrokeRecorder`] - Builds strokes from smoothed samples and keeps the
//!   session's committed strokes
//! - [`Stroke`] - A committed or in-progress path with its visual attributes
//! - [`StrokeEvent`] - Lifecycle events for host hooks
//!
//! A stroke opens when the tip touches the surface and closes when it
//! lifts. Only strokes with at least two points are kept: a single touch is
//! a tap, not a path.

mod events;
mod recorder;

pub use events::StrokeEvent;
pub use recorder::{Stroke, StrokeError, StrokeRecorder};
