//! Stylus tool-contact physics
//!
//! This crate simulates a drawing tool touching a surface:
//! - [`profile`] - Per-tool physical and visual constants
//! - [`body`] - Spring-damper body dynamics and pressure response
//! - [`tip_mesh`] - Deformable cone mesh of the tool tip
//! - [`collision`] - Tip-to-surface contact detection
//! - [`wear`] - Progressive tip erosion
//! - [`footprint`] - Contact shape classification
//! - [`smoothing`] - Sample filtering and curve fitting
//! - [`stroke`] - Stroke recording and lifecycle events
//! - [`surface`] - Drawing surface materials
//! - [`simulation`] - Per-frame engine handle tying it together

pub mod body;
pub mod collision;
pub mod constants;
pub mod footprint;
pub mod noise;
pub mod profile;
pub mod simulation;
pub mod smoothing;
pub mod stroke;
pub mod surface;
pub mod tip_mesh;
pub mod types;
pub mod wear;

pub use body::{PhysicsState, SurfaceImpact};
pub use footprint::classify;
pub use profile::{
    all_profiles, profile_for, profile_for_id, profile_for_name, StrokeStyle, ToolProfile,
};
pub use simulation::{FrameInput, FrameOutput, SimulationError, ToolSimulation};
pub use smoothing::{smooth_path, CoordinateSmoother, PathSegment, SmoothPath};
pub use stroke::{Stroke, StrokeError, StrokeEvent, StrokeRecorder};
pub use surface::{SurfaceInteraction, SurfaceKind, SurfaceMaterial};
pub use tip_mesh::{ContactVertex, TipMesh, WearSample, WearSummary};
pub use types::*;
pub use wear::{apply_wear, WearResult};

pub use stylus_config as config;
