//! Shared configuration for Stylus
//!
//! This crate is the single source of truth for the tunable constants of the
//! tool-contact simulation: body response, contact detection, tip wear,
//! sample smoothing and stroke recording. Every section deserializes with
//! per-field defaults, so a host can ship a partial JSON document and only
//! override what it cares about.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Downward acceleration applied during free flight (world units / s²)
pub const DEFAULT_GRAVITY: f32 = 9.81;

/// Fraction of vertical speed kept when bouncing off the surface
pub const DEFAULT_RESTITUTION: f32 = 0.85;

/// Fraction of horizontal speed kept while touching the surface
pub const DEFAULT_SURFACE_FRICTION: f32 = 0.95;

/// Impact speed above which contact chatter is injected
pub const DEFAULT_CHATTER_THRESHOLD: f32 = 0.5;

/// Lateral displacement per unit of impact speed above the threshold
pub const DEFAULT_CHATTER_SCALE: f32 = 0.0005;

/// Exponent applied to raw pressure is `1 / sensitivity`
pub const DEFAULT_PRESSURE_SENSITIVITY: f32 = 2.5;

/// Amplitude of hand tremor added to pressure response
pub const DEFAULT_TREMOR: f32 = 0.01;

/// Blend factor for angle and azimuth tracking
pub const DEFAULT_ANGLE_BLEND: f32 = 0.15;

/// Tolerance above the surface still counted as contact
pub const DEFAULT_CONTACT_EPSILON: f32 = 0.001;

/// Pressure per unit of penetration depth
pub const DEFAULT_PRESSURE_PER_DEPTH: f32 = 100.0;

/// Radius around a contact that erodes tip vertices
pub const DEFAULT_WEAR_RADIUS: f32 = 0.008;

/// Maximum recession of a fully worn vertex
pub const DEFAULT_WEAR_DEPTH: f32 = 0.015;

/// Wear level after which the tip starts flattening
pub const DEFAULT_FLATTEN_THRESHOLD: f32 = 0.3;

/// Extra recession per unit of wear above the flatten threshold
pub const DEFAULT_FLATTEN_SCALE: f32 = 0.004;

/// Lateral jitter per unit of wear
pub const DEFAULT_WEAR_JITTER: f32 = 0.0005;

/// Capacity of the smoothing history
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// History length below which samples pass through unfiltered
pub const DEFAULT_MIN_FILTER_SAMPLES: usize = 3;

/// Tension used when fitting curves through stroke points
pub const DEFAULT_CURVE_TENSION: f32 = 0.3;

/// Minimum distance between consecutive stroke points
pub const DEFAULT_MIN_POINT_SPACING: f32 = 0.003;

/// Tip geometry defaults
pub const DEFAULT_TIP_RADIUS: f32 = 0.02;
pub const DEFAULT_TIP_HEIGHT: f32 = 0.1;
pub const DEFAULT_TIP_SEGMENTS: u32 = 16;
pub const DEFAULT_TIP_RINGS: u32 = 3;

/// Upper bounds on tip resolution
pub const MAX_TIP_SEGMENTS: u32 = 256;
pub const MAX_TIP_RINGS: u32 = 64;

/// Distance from the body origin to the tip apex along the tool axis
pub const DEFAULT_TOOL_LENGTH: f32 = 0.15;

/// Errors raised while loading or validating a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: f32 },

    #[error("Invalid count for {field}: {value}")]
    InvalidCount { field: &'static str, value: usize },
}

/// Spring-damper body and surface response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Apply gravity and surface bouncing on top of the spring
    pub gravity_enabled: bool,
    pub gravity: f32,
    pub restitution: f32,
    pub surface_friction: f32,
    pub chatter_threshold: f32,
    pub chatter_scale: f32,
    pub tremor: f32,
    pub angle_blend: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity_enabled: false,
            gravity: DEFAULT_GRAVITY,
            restitution: DEFAULT_RESTITUTION,
            surface_friction: DEFAULT_SURFACE_FRICTION,
            chatter_threshold: DEFAULT_CHATTER_THRESHOLD,
            chatter_scale: DEFAULT_CHATTER_SCALE,
            tremor: DEFAULT_TREMOR,
            angle_blend: DEFAULT_ANGLE_BLEND,
        }
    }
}

/// Tip-vs-surface contact detection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    pub epsilon: f32,
    pub pressure_per_depth: f32,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_CONTACT_EPSILON,
            pressure_per_depth: DEFAULT_PRESSURE_PER_DEPTH,
        }
    }
}

/// Tip erosion
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WearConfig {
    pub radius: f32,
    pub depth: f32,
    pub flatten_threshold: f32,
    pub flatten_scale: f32,
    pub jitter: f32,
}

impl Default for WearConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_WEAR_RADIUS,
            depth: DEFAULT_WEAR_DEPTH,
            flatten_threshold: DEFAULT_FLATTEN_THRESHOLD,
            flatten_scale: DEFAULT_FLATTEN_SCALE,
            jitter: DEFAULT_WEAR_JITTER,
        }
    }
}

/// Sample smoothing and curve fitting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    pub history_capacity: usize,
    pub min_filter_samples: usize,
    pub curve_tension: f32,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            min_filter_samples: DEFAULT_MIN_FILTER_SAMPLES,
            curve_tension: DEFAULT_CURVE_TENSION,
        }
    }
}

/// Stroke recording
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeConfig {
    pub min_point_spacing: f32,
}

impl Default for StrokeConfig {
    fn default() -> Self {
        Self {
            min_point_spacing: DEFAULT_MIN_POINT_SPACING,
        }
    }
}

/// Tip mesh geometry and its placement on the tool body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TipConfig {
    pub radius: f32,
    pub height: f32,
    pub segments: u32,
    pub rings: u32,
    pub tool_length: f32,
}

impl Default for TipConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_TIP_RADIUS,
            height: DEFAULT_TIP_HEIGHT,
            segments: DEFAULT_TIP_SEGMENTS,
            rings: DEFAULT_TIP_RINGS,
            tool_length: DEFAULT_TOOL_LENGTH,
        }
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub physics: PhysicsConfig,
    pub contact: ContactConfig,
    pub wear: WearConfig,
    pub smoothing: SmoothingConfig,
    pub stroke: StrokeConfig,
    pub tip: TipConfig,
}

impl SimulationConfig {
    /// Parse a configuration from JSON and validate it
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that every value is usable by the simulation
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("physics.gravity", self.physics.gravity)?;
        unit("physics.restitution", self.physics.restitution)?;
        unit("physics.surface_friction", self.physics.surface_friction)?;
        non_negative("physics.chatter_threshold", self.physics.chatter_threshold)?;
        non_negative("physics.chatter_scale", self.physics.chatter_scale)?;
        non_negative("physics.tremor", self.physics.tremor)?;
        unit("physics.angle_blend", self.physics.angle_blend)?;

        non_negative("contact.epsilon", self.contact.epsilon)?;
        positive("contact.pressure_per_depth", self.contact.pressure_per_depth)?;

        positive("wear.radius", self.wear.radius)?;
        non_negative("wear.depth", self.wear.depth)?;
        unit("wear.flatten_threshold", self.wear.flatten_threshold)?;
        non_negative("wear.flatten_scale", self.wear.flatten_scale)?;
        non_negative("wear.jitter", self.wear.jitter)?;

        if self.smoothing.history_capacity == 0 {
            return Err(ConfigError::InvalidCount {
                field: "smoothing.history_capacity",
                value: self.smoothing.history_capacity,
            });
        }
        if self.smoothing.min_filter_samples > self.smoothing.history_capacity {
            return Err(ConfigError::InvalidCount {
                field: "smoothing.min_filter_samples",
                value: self.smoothing.min_filter_samples,
            });
        }
        non_negative("smoothing.curve_tension", self.smoothing.curve_tension)?;

        non_negative("stroke.min_point_spacing", self.stroke.min_point_spacing)?;

        positive("tip.radius", self.tip.radius)?;
        positive("tip.height", self.tip.height)?;
        non_negative("tip.tool_length", self.tip.tool_length)?;
        if !(3..=MAX_TIP_SEGMENTS).contains(&self.tip.segments) {
            return Err(ConfigError::InvalidCount {
                field: "tip.segments",
                value: self.tip.segments as usize,
            });
        }
        if self.tip.rings > MAX_TIP_RINGS {
            return Err(ConfigError::InvalidCount {
                field: "tip.rings",
                value: self.tip.rings as usize,
            });
        }

        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue { field, value })
    }
}

fn unit(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue { field, value })
    }
}
