//! Per-frame tool simulation
//!
//! [`ToolSimulation`] is the explicit engine handle the host drives. One
//! [`ToolSimulation::step`] runs the whole frame in a fixed order:
//!
//! 1. Body integration toward the host's target pose
//! 2. Gravity and surface response (when enabled)
//! 3. Contact detection against the pose integrated this frame
//! 4. Tip wear
//! 5. Footprint classification
//! 6. Sample smoothing
//! 7. Stroke recording
//!
//! All state lives in the handle and is only mutated through `&mut self`,
//! so a host that simulates on another thread must serialize its calls.

use glam::{EulerRot, Quat, Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stylus_config::{ConfigError, SimulationConfig};
use thiserror::Error;
use tracing::{debug, info};

use crate::body::{
    apply_gravity, integrate, pressure_response, resolve_surface_contact, track_angle,
    track_azimuth, PhysicsState, SurfaceImpact,
};
use crate::collision::{detect, max_penetration, mean_pressure, tip_transform};
use crate::constants::SURFACE_UP;
use crate::footprint::classify;
use crate::profile::{profile_for, ToolProfile};
use crate::smoothing::{raw_sample, CoordinateSmoother, SmoothPath};
use crate::stroke::{Stroke, StrokeError, StrokeEvent, StrokeRecorder};
use crate::surface::{SurfaceInteraction, SurfaceKind};
use crate::tip_mesh::{TipMesh, WearSummary};
use crate::types::{ContactFootprint, SmoothPoint, ToolKind};
use crate::wear::{apply_wear, WearResult};

/// Errors from driving the simulation
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Invalid time step: {0}")]
    InvalidTimeStep(f32),

    #[error("Non-finite input: {0}")]
    NonFiniteInput(&'static str),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Stroke error: {0}")]
    Stroke(#[from] StrokeError),
}

/// Host input for one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameInput {
    /// Seconds since the previous frame, > 0
    pub dt: f32,
    /// Target position of the tool body
    pub position: Vec3,
    /// Orientation of the tool body
    pub rotation: Quat,
    /// User pressure control 0..1, scales contact pressure
    pub pressure_setting: f32,
    pub surface: SurfaceKind,
    /// World Y of the drawing plane
    pub surface_height: f32,
}

impl FrameInput {
    /// An upright tool at `position` over paper at height 0
    pub fn new(dt: f32, position: Vec3) -> Self {
        Self {
            dt,
            position,
            rotation: Quat::IDENTITY,
            pressure_setting: 1.0,
            surface: SurfaceKind::default(),
            surface_height: 0.0,
        }
    }
}

/// What one frame produced
#[derive(Debug, Clone)]
pub struct FrameOutput {
    /// Body state at the end of the frame
    pub state: PhysicsState,
    pub contact_count: usize,
    /// Footprint of this frame's contacts (the empty default without contact)
    pub footprint: ContactFootprint,
    /// Smoothed drawing sample, None without contact
    pub sample: Option<SmoothPoint>,
    pub interaction: SurfaceInteraction,
    pub wear: WearResult,
    pub impact: Option<SurfaceImpact>,
    pub stroke_events: Vec<StrokeEvent>,
}

/// Engine handle owning all simulation state
#[derive(Debug)]
pub struct ToolSimulation<R: Rng = StdRng> {
    config: SimulationConfig,
    tool: ToolKind,
    color: [f32; 4],
    state: PhysicsState,
    tip: TipMesh,
    smoother: CoordinateSmoother,
    recorder: StrokeRecorder,
    last_footprint: ContactFootprint,
    rng: R,
}

impl ToolSimulation<StdRng> {
    /// Create a simulation with a seeded generator
    pub fn new(
        config: SimulationConfig,
        tool: ToolKind,
        seed: u64,
    ) -> Result<Self, SimulationError> {
        Self::with_rng(config, tool, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> ToolSimulation<R> {
    /// Create a simulation drawing randomness from `rng`
    pub fn with_rng(
        config: SimulationConfig,
        tool: ToolKind,
        rng: R,
    ) -> Result<Self, SimulationError> {
        config.validate()?;

        let profile = profile_for(tool);
        let hover = SURFACE_UP * (config.tip.tool_length + config.tip.height);
        let tip = generate_tip(&config);

        info!(
            "ToolSimulation: {} with {} tip vertices",
            profile.name,
            tip.vertex_count()
        );

        Ok(Self {
            state: PhysicsState::from_profile(profile, hover),
            smoother: CoordinateSmoother::new(&config.smoothing),
            recorder: StrokeRecorder::new(&config.stroke),
            tool,
            color: [0.0, 0.0, 0.0, 1.0],
            tip,
            last_footprint: ContactFootprint::default(),
            config,
            rng,
        })
    }

    /// Advance the simulation by one frame
    pub fn step(&mut self, input: &FrameInput) -> Result<FrameOutput, SimulationError> {
        validate_input(input)?;

        let profile = profile_for(self.tool);
        let physics = &self.config.physics;
        let rotation = input.rotation.normalize();

        self.state = integrate(&self.state, input.position, input.dt);
        let (yaw, _, _) = rotation.to_euler(EulerRot::YXZ);
        self.state.azimuth = track_azimuth(self.state.azimuth, yaw, physics.angle_blend);
        if physics.gravity_enabled {
            apply_gravity(&mut self.state, physics.gravity, input.dt);
        }

        let tip_to_world =
            tip_transform(self.state.position, rotation, self.config.tip.tool_length);
        let contacts = detect(
            &self.tip,
            &tip_to_world,
            input.surface_height,
            &self.config.contact,
        );

        let mut output = FrameOutput {
            state: self.state,
            contact_count: contacts.len(),
            footprint: classify(&contacts),
            sample: None,
            interaction: SurfaceInteraction::default(),
            wear: WearResult::default(),
            impact: None,
            stroke_events: Vec::new(),
        };
        self.last_footprint = output.footprint;

        if contacts.is_empty() {
            self.state.pressure = 0.0;
            if self.recorder.is_recording() {
                output.stroke_events.push(self.recorder.end_stroke()?);
                self.smoother.reset();
            }
            output.state = self.state;
            return Ok(output);
        }

        if physics.gravity_enabled {
            let penetration = max_penetration(&contacts, input.surface_height);
            output.impact = Some(resolve_surface_contact(
                &mut self.state,
                penetration,
                physics,
                &mut self.rng,
            ));
        }

        output.wear = apply_wear(
            &mut self.tip,
            &contacts,
            &tip_to_world,
            profile.wear_rate,
            &self.config.wear,
            &mut self.rng,
        );

        let raw_pressure =
            mean_pressure(&contacts).clamp(0.0, 1.0) * input.pressure_setting.clamp(0.0, 1.0);
        self.state.pressure = pressure_response(
            raw_pressure,
            profile.pressure_sensitivity,
            physics.tremor,
            &mut self.rng,
        );
        output.interaction = input.surface.interact(self.state.pressure);

        let centroid = output.footprint.centroid;
        let on_surface = Vec3::new(centroid.x, input.surface_height, centroid.z);
        let sample = self.smoother.filter(raw_sample(
            on_surface,
            SURFACE_UP,
            self.state.pressure,
            input.surface.material().texture,
        ));
        output.sample = Some(sample);

        let point = sample.world_position();
        if self.recorder.is_recording() {
            self.recorder.add_point(point, sample.pressure)?;
        } else {
            output.stroke_events.extend(self.recorder.start_stroke(
                point,
                sample.pressure,
                self.tool,
                self.color,
            ));
        }

        output.state = self.state;
        Ok(output)
    }

    /// Track the stroke direction from two pointer positions
    pub fn pointer_moved(&mut self, last: Vec2, current: Vec2) -> f32 {
        self.state.angle = track_angle(
            self.state.angle,
            last,
            current,
            self.config.physics.angle_blend,
        );
        self.state.angle
    }

    /// Switch to another tool
    ///
    /// Ends any stroke in progress, replaces the body constants with the
    /// new profile and fits a fresh, unworn tip.
    pub fn switch_tool(&mut self, tool: ToolKind) -> Option<StrokeEvent> {
        let event = if self.recorder.is_recording() {
            self.recorder.end_stroke().ok()
        } else {
            None
        };

        self.tool = tool;
        self.state.apply_profile(profile_for(tool));
        self.tip = generate_tip(&self.config);
        self.smoother.reset();

        debug!("switch_tool: now using {}", profile_for(tool).name);
        event
    }

    /// Move the body without simulating, e.g. when the host re-positions the tool
    pub fn teleport(&mut self, position: Vec3) {
        self.state.position = position;
        self.state.velocity = Vec3::ZERO;
        self.state.acceleration = Vec3::ZERO;
    }

    pub fn set_color(&mut self, color: [f32; 4]) {
        self.color = color;
    }

    pub fn color(&self) -> [f32; 4] {
        self.color
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn profile(&self) -> &'static ToolProfile {
        profile_for(self.tool)
    }

    pub fn state(&self) -> &PhysicsState {
        &self.state
    }

    pub fn tip_mesh(&self) -> &TipMesh {
        &self.tip
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Footprint of the most recent frame
    pub fn footprint(&self) -> ContactFootprint {
        self.last_footprint
    }

    pub fn wear_summary(&self) -> WearSummary {
        self.tip.wear_summary()
    }

    /// Restore the unworn tip
    pub fn reset_wear(&mut self) {
        self.tip.reset_wear();
    }

    pub fn committed_strokes(&self) -> &[Stroke] {
        self.recorder.committed()
    }

    pub fn active_stroke(&self) -> Option<&Stroke> {
        self.recorder.active()
    }

    /// Committed strokes followed by the active one
    pub fn strokes(&self) -> impl Iterator<Item = &Stroke> {
        self.recorder.strokes()
    }

    /// Curve through a stroke's points at the configured tension
    pub fn smoothed_path(&self, stroke: &Stroke) -> SmoothPath {
        stroke.smoothed_path(self.config.smoothing.curve_tension)
    }

    /// Remove every stroke (explicit user reset)
    pub fn clear_strokes(&mut self) -> StrokeEvent {
        self.smoother.reset();
        self.recorder.clear_strokes()
    }
}

fn generate_tip(config: &SimulationConfig) -> TipMesh {
    TipMesh::generate(
        config.tip.radius,
        config.tip.height,
        config.tip.segments,
        config.tip.rings,
    )
}

fn validate_input(input: &FrameInput) -> Result<(), SimulationError> {
    if !input.dt.is_finite() || input.dt <= 0.0 {
        return Err(SimulationError::InvalidTimeStep(input.dt));
    }
    if !input.position.is_finite() {
        return Err(SimulationError::NonFiniteInput("position"));
    }
    if !input.rotation.is_finite() || input.rotation.length_squared() <= f32::EPSILON {
        return Err(SimulationError::NonFiniteInput("rotation"));
    }
    if !input.pressure_setting.is_finite() {
        return Err(SimulationError::NonFiniteInput("pressure_setting"));
    }
    if !input.surface_height.is_finite() {
        return Err(SimulationError::NonFiniteInput("surface_height"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stylus_config::DEFAULT_TOOL_LENGTH;

    const DT: f32 = 1.0 / 60.0;

    fn sim() -> ToolSimulation {
        ToolSimulation::new(SimulationConfig::default(), ToolKind::Pencil, 7).unwrap()
    }

    /// Hold the tool well above the surface at its current (x, z)
    fn hover(sim: &mut ToolSimulation, frames: usize) -> Vec<FrameOutput> {
        let position = sim.state().position;
        let target = Vec3::new(position.x, DEFAULT_TOOL_LENGTH + 0.05, position.z);
        (0..frames)
            .map(|_| sim.step(&FrameInput::new(DT, target)).unwrap())
            .collect()
    }

    /// Place the apex just above the surface at the origin, at rest
    fn settle_above(sim: &mut ToolSimulation) {
        sim.teleport(Vec3::new(0.0, DEFAULT_TOOL_LENGTH + 0.005, 0.0));
    }

    /// Press the apex 30mm into the surface while sliding along X
    fn drag(sim: &mut ToolSimulation, frames: usize, distance: f32) -> Vec<FrameOutput> {
        (0..frames)
            .map(|i| {
                let x = distance * i as f32 / frames as f32;
                let target = Vec3::new(x, DEFAULT_TOOL_LENGTH - 0.03, 0.0);
                sim.step(&FrameInput::new(DT, target)).unwrap()
            })
            .collect()
    }

    fn lowest_tip_point(sim: &ToolSimulation) -> f32 {
        let transform = tip_transform(sim.state().position, Quat::IDENTITY, DEFAULT_TOOL_LENGTH);
        sim.tip_mesh()
            .vertices()
            .iter()
            .map(|v| transform.transform_point3(v.position).y)
            .fold(f32::INFINITY, f32::min)
    }

    #[test]
    fn test_hovering_makes_no_contact() {
        let mut sim = sim();
        let outputs = hover(&mut sim, 120);

        assert!(outputs.iter().all(|o| o.contact_count == 0));
        assert!(sim.active_stroke().is_none());
        assert_eq!(sim.state().pressure, 0.0);
        assert_eq!(sim.wear_summary().mean_wear, 0.0);
    }

    #[test]
    fn test_press_drag_lift_commits_stroke() {
        let mut sim = sim();
        settle_above(&mut sim);
        let pressed = drag(&mut sim, 240, 0.2);

        assert!(pressed.iter().any(|o| o.contact_count > 0));
        assert!(pressed
            .iter()
            .flat_map(|o| &o.stroke_events)
            .any(|e| matches!(e, StrokeEvent::StrokeStarted { .. })));
        assert!(sim.active_stroke().is_some());

        let lifted = hover(&mut sim, 120);
        assert!(lifted
            .iter()
            .flat_map(|o| &o.stroke_events)
            .any(|e| matches!(e, StrokeEvent::StrokeCommitted { .. })));

        assert_eq!(sim.committed_strokes().len(), 1);
        let stroke = &sim.committed_strokes()[0];
        assert!(stroke.len() >= 2);
        assert_eq!(stroke.tool, ToolKind::Pencil);
        assert!(stroke.points.iter().all(|p| p.y == 0.0));
        for pair in stroke.points.windows(2) {
            assert!(pair[0].distance(pair[1]) > sim.config().stroke.min_point_spacing);
        }

        let path = sim.smoothed_path(stroke);
        assert_eq!(path.segments.len(), stroke.len() - 1);

        assert!(sim.wear_summary().mean_wear > 0.0);
        assert!(sim.tip_mesh().vertices()[0].wear > 0.0);
        assert_eq!(sim.state().pressure, 0.0);
    }

    #[test]
    fn test_contact_outputs_are_in_range() {
        let mut sim = sim();
        settle_above(&mut sim);
        for output in drag(&mut sim, 200, 0.1) {
            let state = output.state;
            assert!(state.position.is_finite());
            if output.contact_count > 0 {
                assert!((0.01..=1.0).contains(&state.pressure));
                let sample = output.sample.unwrap();
                assert!((0.3..=1.0).contains(&sample.friction));
                assert!(output.footprint.centroid.is_finite());
                assert!(output.interaction.mark_intensity <= 1.0);
            } else {
                assert!(output.sample.is_none());
            }
        }
    }

    #[test]
    fn test_wear_never_decreases_across_frames() {
        let mut sim = sim();
        let wear = |sim: &ToolSimulation| -> Vec<f32> {
            sim.tip_mesh().vertices().iter().map(|v| v.wear).collect()
        };

        let mut previous = wear(&sim);
        for round in 0..3 {
            settle_above(&mut sim);
            for i in 0..100 {
                let x = 0.05 * round as f32 + 0.0005 * i as f32;
                let target = Vec3::new(x, DEFAULT_TOOL_LENGTH - 0.03, 0.0);
                sim.step(&FrameInput::new(DT, target)).unwrap();

                let current = wear(&sim);
                assert!(previous.iter().zip(&current).all(|(old, new)| new >= old));
                previous = current;
            }
            hover(&mut sim, 30);
        }
        assert!(previous.iter().any(|w| *w > 0.0));
    }

    #[test]
    fn test_seeded_runs_are_identical() {
        let run = || {
            let mut sim = sim();
            settle_above(&mut sim);
            drag(&mut sim, 150, 0.1);
            hover(&mut sim, 30);
            (
                sim.committed_strokes()
                    .iter()
                    .map(|s| s.points.clone())
                    .collect::<Vec<_>>(),
                sim.tip_mesh().clone(),
                *sim.state(),
            )
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_tap_leaves_no_stroke() {
        let mut sim = sim();
        settle_above(&mut sim);
        // Press in place: no movement means no second point
        let mut events = Vec::new();
        for _ in 0..60 {
            let target = Vec3::new(0.0, DEFAULT_TOOL_LENGTH - 0.03, 0.0);
            let output = sim.step(&FrameInput::new(DT, target)).unwrap();
            events.extend(output.stroke_events);
        }
        for output in hover(&mut sim, 120) {
            events.extend(output.stroke_events);
        }

        assert!(events
            .iter()
            .any(|e| matches!(e, StrokeEvent::StrokeDiscarded { .. })));
        assert!(!events
            .iter()
            .any(|e| matches!(e, StrokeEvent::StrokeCommitted { .. })));
        assert!(sim.committed_strokes().is_empty());
    }

    #[test]
    fn test_gravity_mode_bounds_penetration() {
        let mut config = SimulationConfig::default();
        config.physics.gravity_enabled = true;
        let mut sim = ToolSimulation::new(config.clone(), ToolKind::Crayon, 3).unwrap();
        // The body is lifted clear before wear; one frame of erosion may sink the tip again
        let max_sink = config.wear.depth + 1e-4;

        for _ in 0..300 {
            let target = Vec3::new(0.0, DEFAULT_TOOL_LENGTH - 0.05, 0.0);
            let output = sim.step(&FrameInput::new(DT, target)).unwrap();
            if output.contact_count > 0 {
                assert!(output.impact.is_some());
            }
            assert!(lowest_tip_point(&sim) >= -max_sink);
        }
    }

    #[test]
    fn test_switch_tool_resets_tip_and_ends_stroke() {
        let mut sim = sim();
        settle_above(&mut sim);
        drag(&mut sim, 120, 0.1);
        assert!(sim.active_stroke().is_some());

        let event = sim.switch_tool(ToolKind::Brush);

        assert!(matches!(event, Some(StrokeEvent::StrokeCommitted { .. })));
        assert!(sim.active_stroke().is_none());
        assert_eq!(sim.tool(), ToolKind::Brush);
        assert_eq!(sim.state().mass, profile_for(ToolKind::Brush).mass);
        assert_eq!(sim.wear_summary().mean_wear, 0.0);
        assert_eq!(sim.tip_mesh().vertex_count(), 65);
    }

    #[test]
    fn test_frame_output_carries_end_of_frame_state() {
        let mut sim = sim();
        let airborne = sim.step(&FrameInput::new(DT, Vec3::new(0.0, 0.3, 0.0))).unwrap();
        assert_eq!(airborne.contact_count, 0);
        assert_eq!(airborne.state, *sim.state());

        settle_above(&mut sim);
        let pressed = drag(&mut sim, 30, 0.0);
        let last = pressed.last().unwrap();
        assert!(last.contact_count > 0);
        assert_eq!(last.state, *sim.state());
        assert_eq!(last.state.pressure, sim.state().pressure);
    }

    #[test]
    fn test_invalid_input_is_rejected() {
        let mut sim = sim();
        let target = Vec3::new(0.0, 0.2, 0.0);

        assert!(matches!(
            sim.step(&FrameInput::new(0.0, target)),
            Err(SimulationError::InvalidTimeStep(_))
        ));
        assert!(matches!(
            sim.step(&FrameInput::new(f32::NAN, target)),
            Err(SimulationError::InvalidTimeStep(_))
        ));
        assert!(matches!(
            sim.step(&FrameInput::new(DT, Vec3::new(f32::INFINITY, 0.0, 0.0))),
            Err(SimulationError::NonFiniteInput("position"))
        ));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = SimulationConfig::default();
        config.wear.radius = -1.0;
        assert!(matches!(
            ToolSimulation::new(config, ToolKind::Pen, 0),
            Err(SimulationError::Config(_))
        ));
    }

    #[test]
    fn test_pointer_tracking_and_clear() {
        let mut sim = sim();
        let angle = sim.pointer_moved(Vec2::ZERO, Vec2::new(0.0, 0.1));
        assert!(angle > 0.0);
        assert_eq!(sim.pointer_moved(Vec2::ZERO, Vec2::ZERO), angle);

        settle_above(&mut sim);
        drag(&mut sim, 120, 0.1);
        hover(&mut sim, 60);
        assert_eq!(sim.committed_strokes().len(), 1);

        let event = sim.clear_strokes();
        assert!(matches!(event, StrokeEvent::StrokesCleared { committed: 1, .. }));
        assert_eq!(sim.strokes().count(), 0);
    }

    #[test]
    fn test_reset_wear() {
        let mut sim = sim();
        settle_above(&mut sim);
        drag(&mut sim, 120, 0.1);
        assert!(sim.wear_summary().max_wear > 0.0);

        sim.reset_wear();
        assert_eq!(sim.wear_summary().max_wear, 0.0);
    }
}
