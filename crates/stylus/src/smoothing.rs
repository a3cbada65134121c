//! Temporal smoothing of contact samples and stroke curve fitting

use std::collections::VecDeque;
use std::f32::consts::PI;

use glam::{Vec2, Vec3};
use serde::Serialize;
use stylus_config::SmoothingConfig;

use crate::constants::{MAX_FRICTION, MIN_FRICTION, SURFACE_UP};
use crate::noise::surface_noise;
use crate::types::SmoothPoint;

/// Base friction on a level surface
const LEVEL_FRICTION: f32 = 0.6;
/// Extra friction gained as the surface faces straight up
const SLOPE_FRICTION_RANGE: f32 = 0.4;

/// Friction of the surface under a sample
///
/// The base value falls from 1.0 on a level surface toward 0.6 as the
/// normal tilts away from up. Surface grain perturbs it by up to
/// `±texture / 2`, and the result is clamped to [0.3, 1.0].
pub fn friction_coefficient(surface_normal: Vec3, coordinate: Vec2, texture: f32) -> f32 {
    let normal = surface_normal.normalize_or(SURFACE_UP);
    let angle = normal.dot(SURFACE_UP).clamp(-1.0, 1.0).acos();
    let base = LEVEL_FRICTION + (1.0 - angle / PI) * SLOPE_FRICTION_RANGE;

    let grain = (surface_noise(coordinate) - 0.5) * texture.max(0.0);
    (base + grain).clamp(MIN_FRICTION, MAX_FRICTION)
}

/// Build a raw sample from a world-space contact
pub fn raw_sample(
    world_position: Vec3,
    surface_normal: Vec3,
    pressure: f32,
    texture: f32,
) -> SmoothPoint {
    let coordinate = Vec2::new(world_position.x, world_position.z);
    SmoothPoint {
        surface_coordinate: coordinate,
        pressure: pressure.clamp(0.0, 1.0),
        surface_height: world_position.y,
        friction: friction_coefficient(surface_normal, coordinate, texture),
    }
}

/// Exponentially weighted moving filter over recent samples
///
/// Sample `i` (0 = oldest) carries weight `2^i`, so the newest sample
/// dominates while older ones damp jitter. Surface height is never
/// averaged; it always comes from the latest raw sample.
#[derive(Debug, Clone)]
pub struct CoordinateSmoother {
    history: VecDeque<SmoothPoint>,
    capacity: usize,
    min_samples: usize,
}

impl Default for CoordinateSmoother {
    fn default() -> Self {
        Self::new(&SmoothingConfig::default())
    }
}

impl CoordinateSmoother {
    pub fn new(config: &SmoothingConfig) -> Self {
        let capacity = config.history_capacity.max(1);
        Self {
            history: VecDeque::with_capacity(capacity),
            capacity,
            min_samples: config.min_filter_samples,
        }
    }

    /// Record a raw sample and return its filtered value
    pub fn filter(&mut self, raw: SmoothPoint) -> SmoothPoint {
        if self.history.len() == self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(raw);

        if self.history.len() < self.min_samples {
            return raw;
        }

        let mut weight = 1.0f32;
        let mut total_weight = 0.0f32;
        let mut coordinate = Vec2::ZERO;
        let mut pressure = 0.0f32;
        let mut friction = 0.0f32;

        for sample in &self.history {
            coordinate += sample.surface_coordinate * weight;
            pressure += sample.pressure * weight;
            friction += sample.friction * weight;
            total_weight += weight;
            weight *= 2.0;
        }

        SmoothPoint {
            surface_coordinate: coordinate / total_weight,
            pressure: (pressure / total_weight).clamp(0.0, 1.0),
            surface_height: raw.surface_height,
            friction: (friction / total_weight).clamp(MIN_FRICTION, MAX_FRICTION),
        }
    }

    /// Forget all history, e.g. between strokes
    pub fn reset(&mut self) {
        self.history.clear();
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// One piece of a smoothed path
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum PathSegment {
    Line {
        from: Vec3,
        to: Vec3,
    },
    Quadratic {
        from: Vec3,
        control: Vec3,
        to: Vec3,
    },
    Cubic {
        from: Vec3,
        control1: Vec3,
        control2: Vec3,
        to: Vec3,
    },
}

impl PathSegment {
    /// Point at parameter `t` in [0, 1]
    pub fn point_at(&self, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        match *self {
            PathSegment::Line { from, to } => from.lerp(to, t),
            PathSegment::Quadratic { from, control, to } => {
                from * (u * u) + control * (2.0 * u * t) + to * (t * t)
            }
            PathSegment::Cubic {
                from,
                control1,
                control2,
                to,
            } => {
                from * (u * u * u)
                    + control1 * (3.0 * u * u * t)
                    + control2 * (3.0 * u * t * t)
                    + to * (t * t * t)
            }
        }
    }

    pub fn start(&self) -> Vec3 {
        match *self {
            PathSegment::Line { from, .. }
            | PathSegment::Quadratic { from, .. }
            | PathSegment::Cubic { from, .. } => from,
        }
    }

    pub fn end(&self) -> Vec3 {
        match *self {
            PathSegment::Line { to, .. }
            | PathSegment::Quadratic { to, .. }
            | PathSegment::Cubic { to, .. } => to,
        }
    }
}

/// Curve through a stroke's points
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SmoothPath {
    pub segments: Vec<PathSegment>,
}

impl SmoothPath {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Flatten to a polyline with `steps` samples per segment
    pub fn sample(&self, steps: usize) -> Vec<Vec3> {
        let steps = steps.max(1);
        let Some(first) = self.segments.first() else {
            return Vec::new();
        };

        let mut points = Vec::with_capacity(self.segments.len() * steps + 1);
        points.push(first.start());
        for segment in &self.segments {
            for step in 1..=steps {
                points.push(segment.point_at(step as f32 / steps as f32));
            }
        }
        points
    }
}

/// Fit a smooth curve through `points`
///
/// Fewer than two points give an empty path and two give a straight line.
/// Longer inputs get control points on both sides of every interior point,
/// offset along the neighbor-to-neighbor direction by `tension`. The end
/// segments are quadratic and interior segments cubic, so the curve has no
/// corners at the sample points.
pub fn smooth_path(points: &[Vec3], tension: f32) -> SmoothPath {
    match points.len() {
        0 | 1 => return SmoothPath::default(),
        2 => {
            return SmoothPath {
                segments: vec![PathSegment::Line {
                    from: points[0],
                    to: points[1],
                }],
            };
        }
        _ => {}
    }

    let last = points.len() - 1;

    // (incoming, outgoing) control points of each interior point
    let controls: Vec<(Vec3, Vec3)> = (1..last)
        .map(|i| {
            let tangent = (points[i + 1] - points[i - 1]) * (tension * 0.5);
            (points[i] - tangent, points[i] + tangent)
        })
        .collect();
    let control = |i: usize| controls[i - 1];

    let mut segments = Vec::with_capacity(last);
    segments.push(PathSegment::Quadratic {
        from: points[0],
        control: control(1).0,
        to: points[1],
    });
    for i in 1..last - 1 {
        segments.push(PathSegment::Cubic {
            from: points[i],
            control1: control(i).1,
            control2: control(i + 1).0,
            to: points[i + 1],
        });
    }
    segments.push(PathSegment::Quadratic {
        from: points[last - 1],
        control: control(last - 1).1,
        to: points[last],
    });

    SmoothPath { segments }
}
