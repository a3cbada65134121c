//! Per-tool physical constants and stroke styling
//!
//! Every tool is described by one row of a static table, so adding a tool
//! is a data change. Lookups never fail: names or ids that do not map to a
//! [`ToolKind`] resolve to the pencil profile.

use serde::Serialize;
use tracing::warn;

use crate::types::ToolKind;

/// How pressure maps onto stroke width and opacity
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrokeStyle {
    /// Width at pressure 0 (world units)
    pub min_width: f32,
    /// Width at pressure 1
    pub max_width: f32,
    /// Opacity at pressure 0
    pub min_opacity: f32,
    /// Opacity at pressure 1
    pub max_opacity: f32,
}

impl StrokeStyle {
    /// Calculate stroke width based on pressure
    pub fn width_for_pressure(&self, pressure: f32) -> f32 {
        let pressure = pressure.clamp(0.0, 1.0);
        self.min_width + (self.max_width - self.min_width) * pressure
    }

    /// Calculate stroke opacity based on pressure
    pub fn opacity_for_pressure(&self, pressure: f32) -> f32 {
        let pressure = pressure.clamp(0.0, 1.0);
        (self.min_opacity + (self.max_opacity - self.min_opacity) * pressure).clamp(0.0, 1.0)
    }

    /// Width range covered from pressure 0 to 1
    pub fn width_range(&self) -> f32 {
        self.max_width - self.min_width
    }

    /// Opacity range covered from pressure 0 to 1
    pub fn opacity_range(&self) -> f32 {
        self.max_opacity - self.min_opacity
    }
}

/// Immutable physical description of a tool
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolProfile {
    pub kind: ToolKind,
    pub name: &'static str,
    pub mass: f32,
    pub elasticity: f32,
    /// Per-step velocity retention
    pub damping: f32,
    /// Pressure response sensitivity (higher = softer response)
    pub pressure_sensitivity: f32,
    /// Base erosion rate of the tip
    pub wear_rate: f32,
    /// Graphite hardness 0..1 (pencils only)
    pub lead_hardness: Option<f32>,
    /// Bristle count (brushes only)
    pub bristle_count: Option<u32>,
    /// Ink flow 0..1 (pens only)
    pub ink_flow: Option<f32>,
    pub style: StrokeStyle,
}

/// Tool used when a lookup cannot be resolved
pub const DEFAULT_TOOL: ToolKind = ToolKind::Pencil;

static PROFILES: [ToolProfile; 6] = [
    // Pencils hold their width; pressing harder only darkens the line.
    ToolProfile {
        kind: ToolKind::Pencil,
        name: "Pencil",
        mass: 0.015,
        elasticity: 0.8,
        damping: 0.85,
        pressure_sensitivity: 2.5,
        wear_rate: 0.6,
        lead_hardness: Some(0.5),
        bristle_count: None,
        ink_flow: None,
        style: StrokeStyle {
            min_width: 0.002,
            max_width: 0.002,
            min_opacity: 0.25,
            max_opacity: 0.9,
        },
    },
    ToolProfile {
        kind: ToolKind::MechanicalPencil,
        name: "Mechanical Pencil",
        mass: 0.02,
        elasticity: 0.9,
        damping: 0.88,
        pressure_sensitivity: 2.5,
        wear_rate: 0.4,
        lead_hardness: Some(0.7),
        bristle_count: None,
        ink_flow: None,
        style: StrokeStyle {
            min_width: 0.0012,
            max_width: 0.0012,
            min_opacity: 0.3,
            max_opacity: 0.85,
        },
    },
    // Pens: narrowest width range, widest opacity range.
    ToolProfile {
        kind: ToolKind::Pen,
        name: "Pen",
        mass: 0.025,
        elasticity: 0.95,
        damping: 0.9,
        pressure_sensitivity: 2.0,
        wear_rate: 0.05,
        lead_hardness: None,
        bristle_count: None,
        ink_flow: Some(0.8),
        style: StrokeStyle {
            min_width: 0.0015,
            max_width: 0.0018,
            min_opacity: 0.1,
            max_opacity: 1.0,
        },
    },
    ToolProfile {
        kind: ToolKind::Brush,
        name: "Brush",
        mass: 0.01,
        elasticity: 0.4,
        damping: 0.7,
        pressure_sensitivity: 3.0,
        wear_rate: 0.02,
        lead_hardness: None,
        bristle_count: Some(64),
        ink_flow: None,
        style: StrokeStyle {
            min_width: 0.002,
            max_width: 0.014,
            min_opacity: 0.7,
            max_opacity: 0.8,
        },
    },
    ToolProfile {
        kind: ToolKind::Crayon,
        name: "Crayon",
        mass: 0.03,
        elasticity: 0.5,
        damping: 0.75,
        pressure_sensitivity: 2.5,
        wear_rate: 1.0,
        lead_hardness: None,
        bristle_count: None,
        ink_flow: None,
        style: StrokeStyle {
            min_width: 0.004,
            max_width: 0.012,
            min_opacity: 0.6,
            max_opacity: 0.75,
        },
    },
    ToolProfile {
        kind: ToolKind::Eraser,
        name: "Eraser",
        mass: 0.02,
        elasticity: 0.6,
        damping: 0.8,
        pressure_sensitivity: 2.5,
        wear_rate: 0.8,
        lead_hardness: None,
        bristle_count: None,
        ink_flow: None,
        style: StrokeStyle {
            min_width: 0.006,
            max_width: 0.009,
            min_opacity: 1.0,
            max_opacity: 1.0,
        },
    },
];

/// Look up the profile of a tool
pub fn profile_for(kind: ToolKind) -> &'static ToolProfile {
    &PROFILES[kind as usize]
}

/// Look up a profile by host-facing name, falling back to [`DEFAULT_TOOL`]
pub fn profile_for_name(name: &str) -> &'static ToolProfile {
    match ToolKind::from_name(name) {
        Some(kind) => profile_for(kind),
        None => {
            warn!("Unknown tool name {:?}, using {:?} profile", name, DEFAULT_TOOL);
            profile_for(DEFAULT_TOOL)
        }
    }
}

/// Look up a profile by wire id, falling back to [`DEFAULT_TOOL`]
pub fn profile_for_id(id: u8) -> &'static ToolProfile {
    match ToolKind::from_id(id) {
        Some(kind) => profile_for(kind),
        None => {
            warn!("Unknown tool id {}, using {:?} profile", id, DEFAULT_TOOL);
            profile_for(DEFAULT_TOOL)
        }
    }
}

/// All profiles in [`ToolKind`] order
pub fn all_profiles() -> &'static [ToolProfile] {
    &PROFILES
}
