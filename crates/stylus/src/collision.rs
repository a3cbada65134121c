//! Tip-versus-surface contact detection
//!
//! The drawing surface is a horizontal plane at a given height. Every tip
//! vertex is tested on its own, which keeps detection exact for the worn,
//! irregular tip shapes produced by the wear module.

use glam::{Affine3A, Quat, Vec3};
use stylus_config::ContactConfig;
use tracing::trace;

use crate::constants::SURFACE_UP;
use crate::tip_mesh::TipMesh;
use crate::types::ContactPoint;

/// Tip-space to world-space transform of a tool body
///
/// The tip apex lies `tool_length` below the body origin along the body's
/// own axis, so tilting the tool swings the tip instead of translating it.
pub fn tip_transform(position: Vec3, rotation: Quat, tool_length: f32) -> Affine3A {
    Affine3A::from_rotation_translation(rotation, position)
        * Affine3A::from_translation(-SURFACE_UP * tool_length)
}

/// Find every tip vertex at or below the surface
///
/// A vertex is in contact when its world Y is within `epsilon` above the
/// surface or anywhere below it. Pressure is `depth * pressure_per_depth`
/// floored at zero; vertices inside the epsilon band report zero pressure.
/// An empty result means no contact.
pub fn detect(
    mesh: &TipMesh,
    tip_to_world: &Affine3A,
    surface_height: f32,
    config: &ContactConfig,
) -> Vec<ContactPoint> {
    let areas = mesh.vertex_areas();

    let contacts: Vec<ContactPoint> = mesh
        .vertices()
        .iter()
        .enumerate()
        .filter_map(|(index, vertex)| {
            let world = tip_to_world.transform_point3(vertex.position);
            if world.y > surface_height + config.epsilon {
                return None;
            }

            let depth = surface_height - world.y;
            Some(ContactPoint {
                world_position: world,
                surface_normal: SURFACE_UP,
                contact_area: areas.get(index).copied().unwrap_or(0.0),
                pressure: (depth * config.pressure_per_depth).max(0.0),
            })
        })
        .collect();

    if !contacts.is_empty() {
        trace!(
            "detect: {} contacts at surface height {:.4}",
            contacts.len(),
            surface_height
        );
    }

    contacts
}

/// Deepest penetration among contacts, 0 when none are below the surface
pub fn max_penetration(contacts: &[ContactPoint], surface_height: f32) -> f32 {
    contacts
        .iter()
        .map(|c| surface_height - c.world_position.y)
        .fold(0.0, f32::max)
}

/// Mean contact pressure, 0 for no contacts
pub fn mean_pressure(contacts: &[ContactPoint]) -> f32 {
    if contacts.is_empty() {
        return 0.0;
    }
    contacts.iter().map(|c| c.pressure).sum::<f32>() / contacts.len() as f32
}
