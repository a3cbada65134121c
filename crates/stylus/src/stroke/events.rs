//! Events emitted during stroke recording.

use crate::types::ToolKind;

/// Stroke lifecycle events for host hooks.
///
/// The recorder returns these from its lifecycle calls so the host can
/// react (redraw, sync, notify) without inspecting recorder internals.
#[derive(Debug, Clone, PartialEq)]
pub enum StrokeEvent {
    /// A new stroke has started recording.
    StrokeStarted {
        stroke_id: u64,
        tool: ToolKind,
        timestamp_ms: u64,
    },
    /// A stroke was moved into the committed collection.
    StrokeCommitted { stroke_id: u64, point_count: usize },
    /// A stroke ended with too few points to form a path.
    StrokeDiscarded { stroke_id: u64, point_count: usize },
    /// All strokes were removed.
    StrokesCleared {
        committed: usize,
        active_discarded: bool,
    },
}
