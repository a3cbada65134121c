//! Contact footprint classification
//!
//! A footprint summarizes one frame of contacts by their centroid, total
//! area and the spread of their positions in the surface (x, z) plane.

use glam::Vec3;

use crate::constants::{
    LINE_RATIO_MAX, LINE_RATIO_MIN, OVAL_MIN_CONTACTS, SHAPE_VARIANCE_EPSILON,
};
use crate::types::{ContactFootprint, ContactPoint, ShapeKind};

/// Classify the shape of a set of contacts
///
/// - No contacts: origin, zero area, point.
/// - One contact: point at that contact.
/// - Otherwise the aspect ratio `sqrt(Sxx / Szz)` of the second moments
///   decides: outside [0.5, 2] is a line, otherwise four or more contacts
///   form an oval and fewer stay a point.
///
/// When `Szz` is zero the ratio is undefined; such footprints are lines
/// with orientation 0, unless `Sxx` is zero too, in which case every
/// contact coincides and the footprint is a point.
pub fn classify(contacts: &[ContactPoint]) -> ContactFootprint {
    if contacts.is_empty() {
        return ContactFootprint {
            centroid: Vec3::ZERO,
            total_area: 0.0,
            shape: ShapeKind::Point,
            orientation: 0.0,
        };
    }

    let count = contacts.len() as f32;
    let centroid = contacts.iter().map(|c| c.world_position).sum::<Vec3>() / count;
    let total_area = contacts.iter().map(|c| c.contact_area).sum::<f32>();

    let mut footprint = ContactFootprint {
        centroid,
        total_area,
        shape: ShapeKind::Point,
        orientation: 0.0,
    };

    if contacts.len() < 2 {
        return footprint;
    }

    let (mut sxx, mut szz, mut sxz) = (0.0f32, 0.0f32, 0.0f32);
    for contact in contacts {
        let d = contact.world_position - centroid;
        sxx += d.x * d.x;
        szz += d.z * d.z;
        sxz += d.x * d.z;
    }

    if szz <= SHAPE_VARIANCE_EPSILON {
        if sxx > SHAPE_VARIANCE_EPSILON {
            footprint.shape = ShapeKind::Line;
        }
        return footprint;
    }

    let ratio = (sxx / szz).sqrt();
    footprint.shape = if !(LINE_RATIO_MIN..=LINE_RATIO_MAX).contains(&ratio) {
        ShapeKind::Line
    } else if contacts.len() >= OVAL_MIN_CONTACTS {
        ShapeKind::Oval
    } else {
        ShapeKind::Point
    };

    if footprint.shape != ShapeKind::Point {
        footprint.orientation = 0.5 * sxz.atan2(sxx - szz);
    }

    footprint
}
