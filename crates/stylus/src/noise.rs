//! Random perturbation and procedural surface noise
//!
//! Random draws always go through a caller-supplied [`rand::Rng`], so a
//! seeded generator reproduces a simulation exactly.

use glam::{Vec2, Vec3};
use rand::Rng;

/// Spatial frequencies (radians per world unit) of the three noise octaves.
const FINE_FREQUENCY: f32 = 1500.0;
const MEDIUM_FREQUENCY: f32 = 400.0;
const COARSE_FREQUENCY: f32 = 90.0;

const FINE_WEIGHT: f32 = 0.4;
const MEDIUM_WEIGHT: f32 = 0.3;
const COARSE_WEIGHT: f32 = 0.3;

/// Uniform sample in `[-amplitude, amplitude]`, zero when amplitude is not positive
pub fn symmetric_jitter<R: Rng>(rng: &mut R, amplitude: f32) -> f32 {
    if amplitude > 0.0 {
        rng.gen_range(-amplitude..=amplitude)
    } else {
        0.0
    }
}

/// Random offset in the plane perpendicular to `normal`
pub fn planar_jitter<R: Rng>(rng: &mut R, normal: Vec3, amplitude: f32) -> Vec3 {
    let (tangent, bitangent) = normal.normalize_or(Vec3::Y).any_orthonormal_pair();
    tangent * symmetric_jitter(rng, amplitude) + bitangent * symmetric_jitter(rng, amplitude)
}

/// Deterministic surface grain at world (x, z), in [0, 1]
///
/// Three sinusoidal octaves (fine, medium, coarse) weighted 0.4/0.3/0.3.
pub fn surface_noise(position: Vec2) -> f32 {
    let octave = |frequency: f32| {
        let p = position * frequency;
        // Each octave is in [-1, 1]
        (p.x.sin() * p.y.cos() + (p.x * 0.7 + p.y * 1.3).sin()) * 0.5
    };

    let sum = octave(FINE_FREQUENCY) * FINE_WEIGHT
        + octave(MEDIUM_FREQUENCY) * MEDIUM_WEIGHT
        + octave(COARSE_FREQUENCY) * COARSE_WEIGHT;

    ((sum + 1.0) * 0.5).clamp(0.0, 1.0)
}
