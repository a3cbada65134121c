//! Spring-damper body of the drawing tool
//!
//! The body state is a plain value; every operation takes it explicitly
//! and either returns a new state or mutates the one it is handed. Random
//! perturbations (hand tremor, contact chatter) come from the caller's RNG.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};
use stylus_config::PhysicsConfig;
use tracing::trace;

use crate::constants::{
    MAX_RESPONSE_PRESSURE, MIN_ANGLE_MOVEMENT, MIN_DENOMINATOR, MIN_RESPONSE_PRESSURE,
    SPRING_STIFFNESS_SCALE, SURFACE_UP,
};
use crate::noise::{planar_jitter, symmetric_jitter};
use crate::profile::ToolProfile;

/// Dynamic state of the tool body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub acceleration: Vec3,
    /// Responded pressure in [0, 1]
    pub pressure: f32,
    /// Stroke direction angle on the surface (radians)
    pub angle: f32,
    /// Body yaw (radians)
    pub azimuth: f32,
    pub elasticity: f32,
    pub damping: f32,
    pub mass: f32,
}

impl PhysicsState {
    /// A body at rest at `position` with the profile's constants
    pub fn from_profile(profile: &ToolProfile, position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            pressure: 0.0,
            angle: 0.0,
            azimuth: 0.0,
            elasticity: profile.elasticity,
            damping: profile.damping,
            mass: profile.mass,
        }
    }

    /// Replace the physical constants with those of another tool
    pub fn apply_profile(&mut self, profile: &ToolProfile) {
        self.elasticity = profile.elasticity;
        self.damping = profile.damping;
        self.mass = profile.mass;
    }

    /// Speed of the body
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

/// Outcome of pushing the body out of the surface
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceImpact {
    /// Speed toward the surface before the bounce (0 when moving away)
    pub impact_speed: f32,
    /// Lateral displacement injected as contact chatter
    pub chatter: Vec3,
}

/// Advance the body one step toward `target`
///
/// The spring pulls with stiffness `elasticity * 10`, the previous velocity
/// is scaled by `damping`, then velocity and position are integrated.
pub fn integrate(state: &PhysicsState, target: Vec3, dt: f32) -> PhysicsState {
    let force = (target - state.position) * (state.elasticity * SPRING_STIFFNESS_SCALE);
    let acceleration = force / state.mass.max(MIN_DENOMINATOR);

    let velocity = state.velocity * state.damping + acceleration * dt;
    let position = state.position + velocity * dt;

    PhysicsState {
        position,
        velocity,
        acceleration,
        ..*state
    }
}

/// Map raw input pressure onto the tool's response curve
///
/// `raw^(1/sensitivity)` plus tremor in `[-tremor, tremor]`, clamped to
/// `[0.01, 1.0]`. Raw pressure outside [0, 1] is clamped first and a
/// sensitivity that is not positive falls back to 2.5.
pub fn pressure_response<R: Rng>(raw: f32, sensitivity: f32, tremor: f32, rng: &mut R) -> f32 {
    let sensitivity = if sensitivity > MIN_DENOMINATOR {
        sensitivity
    } else {
        stylus_config::DEFAULT_PRESSURE_SENSITIVITY
    };
    let raw = if raw.is_finite() { raw.clamp(0.0, 1.0) } else { 0.0 };

    let curved = raw.powf(1.0 / sensitivity);
    (curved + symmetric_jitter(rng, tremor)).clamp(MIN_RESPONSE_PRESSURE, MAX_RESPONSE_PRESSURE)
}

/// Follow the direction of pointer movement on the surface
///
/// Movements shorter than 1e-3 keep the current angle.
pub fn track_angle(angle: f32, last: Vec2, current: Vec2, blend: f32) -> f32 {
    let delta = current - last;
    if delta.length() < MIN_ANGLE_MOVEMENT {
        return angle;
    }

    let target = delta.y.atan2(delta.x);
    angle + (target - angle) * blend
}

/// Blend a yaw angle toward `target` along the shortest arc
pub fn track_azimuth(azimuth: f32, target: f32, blend: f32) -> f32 {
    let mut delta = target - azimuth;
    if delta > PI {
        delta -= TAU;
    } else if delta < -PI {
        delta += TAU;
    }
    azimuth + delta * blend
}

/// Free-flight gravity for one step
pub fn apply_gravity(state: &mut PhysicsState, gravity: f32, dt: f32) {
    state.velocity -= SURFACE_UP * gravity * dt;
}

/// Bounce the body off the surface after the tip penetrated by `penetration`
///
/// The body is lifted out of the surface. Vertical velocity reverses and
/// loses energy only while moving toward the surface; horizontal velocity
/// is scaled by surface friction. Impacts faster than the chatter threshold
/// displace the body sideways by a random amount proportional to the excess.
pub fn resolve_surface_contact<R: Rng>(
    state: &mut PhysicsState,
    penetration: f32,
    config: &PhysicsConfig,
    rng: &mut R,
) -> SurfaceImpact {
    if penetration > 0.0 {
        state.position += SURFACE_UP * penetration;
    }

    let normal_speed = state.velocity.dot(SURFACE_UP);
    let mut impact_speed = 0.0;
    if normal_speed < 0.0 {
        impact_speed = -normal_speed;
        state.velocity -= SURFACE_UP * normal_speed * (1.0 + config.restitution);
    }

    let vertical = SURFACE_UP * state.velocity.dot(SURFACE_UP);
    let horizontal = state.velocity - vertical;
    state.velocity = vertical + horizontal * config.surface_friction;

    let mut chatter = Vec3::ZERO;
    if impact_speed > config.chatter_threshold {
        let excess = impact_speed - config.chatter_threshold;
        chatter = planar_jitter(rng, SURFACE_UP, excess * config.chatter_scale);
        state.position += chatter;
        trace!(impact_speed, ?chatter, "contact chatter");
    }

    SurfaceImpact {
        impact_speed,
        chatter,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::profile_for;
    use crate::types::ToolKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pencil_state() -> PhysicsState {
        PhysicsState::from_profile(profile_for(ToolKind::Pencil), Vec3::ZERO)
    }

    #[test]
    fn test_integrate_moves_toward_target() {
        let state = pencil_state();
        let target = Vec3::new(1.0, 0.0, 0.0);
        let next = integrate(&state, target, 1.0 / 60.0);

        assert!(next.position.x > 0.0);
        assert!(next.velocity.x > 0.0);
        assert_eq!(next.mass, state.mass);
    }

    #[test]
    fn test_integrate_formula() {
        let state = PhysicsState {
            velocity: Vec3::new(0.0, 2.0, 0.0),
            elasticity: 0.5,
            damping: 0.5,
            mass: 2.0,
            ..pencil_state()
        };
        let dt = 0.1;
        let next = integrate(&state, Vec3::new(4.0, 0.0, 0.0), dt);

        // force = 4 * 5 = 20, accel = 10, v = (0,1,0) + (1,0,0)
        assert!((next.acceleration.x - 10.0).abs() < 1e-5);
        assert!((next.velocity - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-5);
        assert!((next.position - Vec3::new(0.1, 0.1, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_integrate_settles_at_target() {
        let mut state = pencil_state();
        let target = Vec3::new(0.1, 0.05, -0.02);
        for _ in 0..2000 {
            state = integrate(&state, target, 1.0 / 60.0);
        }
        assert!((state.position - target).length() < 1e-4);
    }

    #[test]
    fn test_integrate_zero_mass_stays_finite() {
        let state = PhysicsState {
            mass: 0.0,
            ..pencil_state()
        };
        let next = integrate(&state, Vec3::ONE, 0.016);
        assert!(next.position.is_finite());
    }

    #[test]
    fn test_apply_profile_replaces_constants() {
        let mut state = pencil_state();
        state.velocity = Vec3::X;
        let brush = profile_for(ToolKind::Brush);
        state.apply_profile(brush);

        assert_eq!(state.mass, brush.mass);
        assert_eq!(state.elasticity, brush.elasticity);
        assert_eq!(state.damping, brush.damping);
        assert_eq!(state.velocity, Vec3::X);
    }

    #[test]
    fn test_pressure_response_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        for sensitivity in [0.1, 0.5, 1.0, 2.5, 10.0] {
            for i in 0..=100 {
                let raw = i as f32 / 100.0;
                let p = pressure_response(raw, sensitivity, 0.01, &mut rng);
                assert!((0.01..=1.0).contains(&p), "raw={raw} s={sensitivity} p={p}");
            }
        }
    }

    #[test]
    fn test_pressure_response_curve_without_tremor() {
        let mut rng = StdRng::seed_from_u64(0);
        let p = pressure_response(0.5, 2.5, 0.0, &mut rng);
        assert!((p - 0.5f32.powf(0.4)).abs() < 1e-6);

        // Zero pressure hits the floor
        assert_eq!(pressure_response(0.0, 2.5, 0.0, &mut rng), 0.01);
    }

    #[test]
    fn test_pressure_response_degenerate_inputs() {
        let mut rng = StdRng::seed_from_u64(5);
        let p = pressure_response(f32::NAN, 2.5, 0.01, &mut rng);
        assert!((0.01..=1.0).contains(&p));
        let p = pressure_response(0.5, 0.0, 0.0, &mut rng);
        assert!((p - 0.5f32.powf(0.4)).abs() < 1e-6);
    }

    #[test]
    fn test_pressure_response_seeded() {
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        for _ in 0..20 {
            assert_eq!(
                pressure_response(0.3, 2.5, 0.01, &mut a),
                pressure_response(0.3, 2.5, 0.01, &mut b)
            );
        }
    }

    #[test]
    fn test_track_angle_ignores_small_movement() {
        let angle = track_angle(0.7, Vec2::ZERO, Vec2::new(0.0005, 0.0), 0.15);
        assert_eq!(angle, 0.7);
    }

    #[test]
    fn test_track_angle_blends() {
        let angle = track_angle(0.0, Vec2::ZERO, Vec2::new(0.0, 1.0), 0.15);
        assert!((angle - std::f32::consts::FRAC_PI_2 * 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_track_azimuth_wraps() {
        // From just below +π to just above -π is a short step, not a full turn
        let azimuth = track_azimuth(3.0, -3.0, 0.5);
        assert!(azimuth > 3.0);
        assert!((azimuth - (3.0 + (TAU - 6.0) * 0.5)).abs() < 1e-5);

        let azimuth = track_azimuth(-3.0, 3.0, 0.5);
        assert!(azimuth < -3.0);
    }

    #[test]
    fn test_gravity_accelerates_down() {
        let mut state = pencil_state();
        apply_gravity(&mut state, 9.81, 0.1);
        assert!((state.velocity.y + 0.981).abs() < 1e-5);
    }

    #[test]
    fn test_surface_contact_bounces_when_falling() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = PhysicsConfig::default();
        let mut state = pencil_state();
        state.velocity = Vec3::new(1.0, -0.4, 0.0);

        let impact = resolve_surface_contact(&mut state, 0.002, &config, &mut rng);

        assert!((impact.impact_speed - 0.4).abs() < 1e-6);
        assert!((state.velocity.y - 0.4 * 0.85).abs() < 1e-6);
        assert!((state.velocity.x - 0.95).abs() < 1e-6);
        assert!((state.position.y - 0.002).abs() < 1e-6);
        // Below the chatter threshold
        assert_eq!(impact.chatter, Vec3::ZERO);
    }

    #[test]
    fn test_surface_contact_keeps_upward_velocity() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = PhysicsConfig::default();
        let mut state = pencil_state();
        state.velocity = Vec3::new(0.0, 0.3, 0.0);

        let impact = resolve_surface_contact(&mut state, 0.001, &config, &mut rng);

        assert_eq!(impact.impact_speed, 0.0);
        assert!((state.velocity.y - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_hard_impact_chatters() {
        let mut rng = StdRng::seed_from_u64(8);
        let config = PhysicsConfig {
            chatter_scale: 0.01,
            ..Default::default()
        };
        let mut state = pencil_state();
        state.velocity = Vec3::new(0.0, -3.0, 0.0);

        let impact = resolve_surface_contact(&mut state, 0.0, &config, &mut rng);

        let limit = (3.0 - config.chatter_threshold) * config.chatter_scale;
        assert!(impact.chatter.y.abs() < 1e-6);
        assert!(impact.chatter.x.abs() <= limit && impact.chatter.z.abs() <= limit);
        assert!(impact.chatter.length() > 0.0);
    }
}
