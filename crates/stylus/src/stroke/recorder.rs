//! Stroke recorder for building strokes from smoothed contact samples.

use glam::Vec3;
use serde::Serialize;
use stylus_config::StrokeConfig;
use tracing::debug;

use crate::profile::profile_for;
use crate::smoothing::{smooth_path, SmoothPath};
use crate::types::ToolKind;

use super::events::StrokeEvent;

/// Error type for stroke recording operations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum StrokeError {
    #[error("Stroke not started - call start_stroke() first")]
    NotStarted,
}

/// A path drawn with one tool in one continuous contact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stroke {
    pub id: u64,
    pub points: Vec<Vec3>,
    /// Pressure recorded with each point
    pub pressures: Vec<f32>,
    pub tool: ToolKind,
    /// RGBA
    pub color: [f32; 4],
    /// Milliseconds since the Unix epoch
    pub created_at_ms: u64,
    pub width: f32,
    pub opacity: f32,
}

impl Stroke {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last_point(&self) -> Option<Vec3> {
        self.points.last().copied()
    }

    /// Curve through the recorded points
    pub fn smoothed_path(&self, tension: f32) -> SmoothPath {
        smooth_path(&self.points, tension)
    }

    /// Total polyline length of the recorded points
    pub fn length(&self) -> f32 {
        self.points.windows(2).map(|w| w[0].distance(w[1])).sum()
    }

    fn restyle(&mut self, pressure: f32) {
        let style = profile_for(self.tool).style;
        self.width = style.width_for_pressure(pressure);
        self.opacity = style.opacity_for_pressure(pressure);
    }
}

/// Accumulates points into strokes and keeps the session's committed strokes.
///
/// Points closer than the minimum spacing to the previous point are
/// dropped, so slow movement does not pile up nearly identical points
/// that would distort curve fitting. Strokes with fewer than two points
/// are discarded when they end.
///
/// # Example
///
/// ```ignore
/// let mut recorder = StrokeRecorder::new(&StrokeConfig::default());
/// recorder.start_stroke(start, 0.5, ToolKind::Pencil, [0.0, 0.0, 0.0, 1.0]);
/// recorder.add_point(next, 0.6)?;
/// recorder.end_stroke()?;
/// ```
#[derive(Debug, Clone)]
pub struct StrokeRecorder {
    /// Stroke being drawn (None when the tool is lifted)
    active: Option<Stroke>,
    /// Finished strokes in commit order
    committed: Vec<Stroke>,
    min_spacing: f32,
    next_id: u64,
}

impl Default for StrokeRecorder {
    fn default() -> Self {
        Self::new(&StrokeConfig::default())
    }
}

impl StrokeRecorder {
    /// Create a new stroke recorder.
    pub fn new(config: &StrokeConfig) -> Self {
        Self {
            active: None,
            committed: Vec::new(),
            min_spacing: config.min_point_spacing.max(0.0),
            next_id: 1,
        }
    }

    /// Check if currently recording a stroke.
    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    /// Start recording a new stroke at `point`.
    ///
    /// A stroke still in progress is ended first (committed or discarded by
    /// the usual rule). Returns the events in the order they happened, so
    /// the last one is always `StrokeStarted`.
    pub fn start_stroke(
        &mut self,
        point: Vec3,
        pressure: f32,
        tool: ToolKind,
        color: [f32; 4],
    ) -> Vec<StrokeEvent> {
        let mut events = Vec::with_capacity(2);
        if let Ok(ended) = self.end_stroke() {
            debug!("start_stroke: ended unfinished stroke first");
            events.push(ended);
        }

        let id = self.next_id;
        self.next_id += 1;

        let pressure = pressure.clamp(0.0, 1.0);
        let timestamp_ms = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        let mut stroke = Stroke {
            id,
            points: vec![point],
            pressures: vec![pressure],
            tool,
            color,
            created_at_ms: timestamp_ms,
            width: 0.0,
            opacity: 0.0,
        };
        stroke.restyle(pressure);
        self.active = Some(stroke);

        events.push(StrokeEvent::StrokeStarted {
            stroke_id: id,
            tool,
            timestamp_ms,
        });
        events
    }

    /// Add a point to the current stroke.
    ///
    /// Returns `Ok(false)` when the point is within the minimum spacing of
    /// the last recorded point and was dropped.
    pub fn add_point(&mut self, point: Vec3, pressure: f32) -> Result<bool, StrokeError> {
        let stroke = self.active.as_mut().ok_or(StrokeError::NotStarted)?;

        if let Some(last) = stroke.last_point() {
            if point.distance(last) <= self.min_spacing {
                return Ok(false);
            }
        }

        let pressure = pressure.clamp(0.0, 1.0);
        stroke.points.push(point);
        stroke.pressures.push(pressure);
        stroke.restyle(pressure);

        Ok(true)
    }

    /// Finish the current stroke.
    ///
    /// Strokes with at least two points are committed; shorter ones are
    /// discarded.
    pub fn end_stroke(&mut self) -> Result<StrokeEvent, StrokeError> {
        let stroke = self.active.take().ok_or(StrokeError::NotStarted)?;
        let stroke_id = stroke.id;
        let point_count = stroke.len();

        if point_count < 2 {
            debug!("end_stroke: discarded stroke {} ({} point)", stroke_id, point_count);
            return Ok(StrokeEvent::StrokeDiscarded {
                stroke_id,
                point_count,
            });
        }

        debug!(
            "end_stroke: committed stroke {} ({} points, length {:.4})",
            stroke_id,
            point_count,
            stroke.length()
        );
        self.committed.push(stroke);

        Ok(StrokeEvent::StrokeCommitted {
            stroke_id,
            point_count,
        })
    }

    /// Remove every committed stroke and any stroke in progress.
    pub fn clear_strokes(&mut self) -> StrokeEvent {
        let committed = self.committed.len();
        let active_discarded = self.active.take().is_some();
        self.committed.clear();

        debug!("clear_strokes: removed {} committed strokes", committed);

        StrokeEvent::StrokesCleared {
            committed,
            active_discarded,
        }
    }

    /// The stroke being drawn, if any.
    pub fn active(&self) -> Option<&Stroke> {
        self.active.as_ref()
    }

    /// Committed strokes in commit order.
    pub fn committed(&self) -> &[Stroke] {
        &self.committed
    }

    /// Committed strokes followed by the active one, in drawing order.
    pub fn strokes(&self) -> impl Iterator<Item = &Stroke> {
        self.committed.iter().chain(self.active.iter())
    }

    pub fn min_spacing(&self) -> f32 {
        self.min_spacing
    }
}
