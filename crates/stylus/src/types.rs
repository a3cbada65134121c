use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Drawing instrument kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ToolKind {
    #[default]
    Pencil = 0,
    MechanicalPencil = 1,
    Pen = 2,
    Brush = 3,
    Crayon = 4,
    Eraser = 5,
}

impl ToolKind {
    pub const ALL: [ToolKind; 6] = [
        ToolKind::Pencil,
        ToolKind::MechanicalPencil,
        ToolKind::Pen,
        ToolKind::Brush,
        ToolKind::Crayon,
        ToolKind::Eraser,
    ];

    /// Decode a wire id, None if unknown
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    /// Parse a host-facing name such as `"mechanical_pencil"`
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Pencil => "pencil",
            ToolKind::MechanicalPencil => "mechanical_pencil",
            ToolKind::Pen => "pen",
            ToolKind::Brush => "brush",
            ToolKind::Crayon => "crayon",
            ToolKind::Eraser => "eraser",
        }
    }
}

/// Footprint shape classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    #[default]
    Point,
    Line,
    Oval,
}

/// One tip vertex touching the surface during a frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactPoint {
    /// Vertex position in world space
    pub world_position: Vec3,
    /// Normal of the drawing surface at the contact
    pub surface_normal: Vec3,
    /// Share of the tip surface area carried by the vertex
    pub contact_area: f32,
    /// Penetration-derived pressure, never negative (not clamped to 1)
    pub pressure: f32,
}

/// Aggregate shape of a set of contacts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ContactFootprint {
    pub centroid: Vec3,
    pub total_area: f32,
    pub shape: ShapeKind,
    /// Major axis angle in the surface plane (radians), 0 for points
    pub orientation: f32,
}

/// A contact sample projected onto the drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothPoint {
    /// World (x, z) on the surface plane
    pub surface_coordinate: Vec2,
    pub pressure: f32,
    /// World y of the surface under the sample
    pub surface_height: f32,
    /// Always within [0.3, 1.0]
    pub friction: f32,
}

impl SmoothPoint {
    /// Lift the sample back into world space
    pub fn world_position(&self) -> Vec3 {
        Vec3::new(
            self.surface_coordinate.x,
            self.surface_height,
            self.surface_coordinate.y,
        )
    }
}
