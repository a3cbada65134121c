//! Drawing surface materials

use serde::{Deserialize, Serialize};

/// Material the tool draws on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum SurfaceKind {
    Whiteboard = 0,
    Canvas = 1,
    #[default]
    Paper = 2,
}

/// Physical constants of a surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SurfaceMaterial {
    /// Drag against the tool 0..1
    pub friction: f32,
    /// How much pigment soaks in 0..1
    pub absorption: f32,
    /// Amplitude of the surface grain 0..1
    pub texture: f32,
}

/// Resistance and mark strength of a tool pressed into a surface
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SurfaceInteraction {
    pub resistance: f32,
    pub mark_intensity: f32,
}

impl SurfaceKind {
    pub fn material(&self) -> SurfaceMaterial {
        match self {
            SurfaceKind::Whiteboard => SurfaceMaterial {
                friction: 0.3,
                absorption: 0.0,
                texture: 0.05,
            },
            SurfaceKind::Canvas => SurfaceMaterial {
                friction: 0.8,
                absorption: 0.7,
                texture: 0.6,
            },
            SurfaceKind::Paper => SurfaceMaterial {
                friction: 0.6,
                absorption: 0.4,
                texture: 0.3,
            },
        }
    }

    /// `resistance = friction * pressure`,
    /// `mark_intensity = min(1, pressure * (1 - absorption * 0.3))`
    pub fn interact(&self, pressure: f32) -> SurfaceInteraction {
        let material = self.material();
        let pressure = pressure.max(0.0);
        SurfaceInteraction {
            resistance: material.friction * pressure,
            mark_intensity: (pressure * (1.0 - material.absorption * 0.3)).min(1.0),
        }
    }
}
