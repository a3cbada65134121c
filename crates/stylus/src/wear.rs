//! Tip erosion from surface contact
//!
//! Each contact erodes every vertex within the wear radius with a linear
//! falloff, scaled by contact pressure and softened by vertex hardness.
//! Wear only ever accumulates; the resulting vertex position is recomputed
//! from the rest position so it can never drift independently of wear.

use glam::{Affine3A, Vec3};
use rand::Rng;
use stylus_config::WearConfig;
use tracing::debug;

use crate::constants::{
    MIN_DENOMINATOR, WEAR_HARDNESS_EXPONENT, WEAR_PRESSURE_EXPONENT, WEAR_SCALE,
};
use crate::noise::planar_jitter;
use crate::tip_mesh::TipMesh;
use crate::types::ContactPoint;

/// Result of applying one frame of contacts
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WearResult {
    /// Vertices that received wear this frame
    pub vertices_affected: usize,
    /// Sum of wear added across all vertices
    pub wear_added: f32,
}

/// Wear contribution of a single contact on a single vertex
///
/// `pressure^1.2 * wear_rate * hardness^-0.8 * influence * 0.1`
pub fn wear_amount(pressure: f32, wear_rate: f32, hardness: f32, influence: f32) -> f32 {
    let pressure = pressure.clamp(0.0, 1.0);
    let hardness = hardness.max(MIN_DENOMINATOR);
    pressure.powf(WEAR_PRESSURE_EXPONENT)
        * wear_rate.max(0.0)
        * hardness.powf(WEAR_HARDNESS_EXPONENT)
        * influence.clamp(0.0, 1.0)
        * WEAR_SCALE
}

/// Offset of a vertex from its rest position at a given wear level
///
/// `-normal * wear * depth + lateral_jitter(wear) + flattening`, where
/// `normal` is the contact's surface normal. Flattening pushes back along
/// the normal once wear passes the threshold, in proportion to the excess.
pub fn wear_offset<R: Rng>(
    wear: f32,
    surface_normal: Vec3,
    config: &WearConfig,
    rng: &mut R,
) -> Vec3 {
    let normal = surface_normal.normalize_or(Vec3::Y);

    let erosion = -normal * wear * config.depth;
    let lateral = planar_jitter(rng, normal, wear * config.jitter);
    let flattening = if wear > config.flatten_threshold {
        normal * (wear - config.flatten_threshold) * config.flatten_scale
    } else {
        Vec3::ZERO
    };

    erosion + lateral + flattening
}

/// Erode the tip with this frame's contacts and rebuild its surface
///
/// Contacts are in world space; `tip_to_world` is the transform used to
/// detect them. The mesh is only rebuilt when some vertex wore.
pub fn apply_wear<R: Rng>(
    mesh: &mut TipMesh,
    contacts: &[ContactPoint],
    tip_to_world: &Affine3A,
    wear_rate: f32,
    config: &WearConfig,
    rng: &mut R,
) -> WearResult {
    if contacts.is_empty() {
        return WearResult::default();
    }

    let world_to_tip = tip_to_world.inverse();
    let radius = config.radius.max(MIN_DENOMINATOR);

    // Accumulate per vertex first so every contact sees the same positions
    let mut added = vec![0.0f32; mesh.vertex_count()];
    let mut contact_normal = vec![Vec3::ZERO; mesh.vertex_count()];

    for contact in contacts {
        let local_contact = world_to_tip.transform_point3(contact.world_position);
        let local_normal = world_to_tip
            .transform_vector3(contact.surface_normal)
            .normalize_or(Vec3::Y);

        for (index, vertex) in mesh.vertices().iter().enumerate() {
            let distance = vertex.position.distance(local_contact);
            if distance > radius {
                continue;
            }

            let influence = 1.0 - distance / radius;
            let amount = wear_amount(contact.pressure, wear_rate, vertex.hardness, influence);
            if amount > 0.0 {
                added[index] += amount;
                contact_normal[index] += local_normal * amount;
            }
        }
    }

    let mut result = WearResult::default();
    for (index, vertex) in mesh.vertices_mut().iter_mut().enumerate() {
        if added[index] <= 0.0 {
            continue;
        }

        let previous = vertex.wear;
        vertex.wear = (vertex.wear + added[index]).min(1.0);

        let normal = contact_normal[index].normalize_or(Vec3::Y);
        vertex.position = vertex.rest_position + wear_offset(vertex.wear, normal, config, rng);

        result.vertices_affected += 1;
        result.wear_added += vertex.wear - previous;
    }

    if result.vertices_affected > 0 {
        mesh.rebuild_surface();
        debug!(
            "apply_wear: {} contacts wore {} vertices (+{:.6}), mean wear {:.4}",
            contacts.len(),
            result.vertices_affected,
            result.wear_added,
            mesh.mean_wear()
        );
    }

    result
}
