//! Deformable tip geometry
//!
//! The tip is a cone of concentric rings around a single apex vertex. The
//! apex sits at the tip-space origin and rings rise along +Y up to the base
//! ring at `height`. Vertex order is fixed at generation time: apex, the
//! intermediate rings from the apex outward, then the base ring. Wear is
//! attached to vertex indices, so rebuilding the surface never reorders,
//! adds or removes vertices.

use std::f32::consts::TAU;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use stylus_config::{MAX_TIP_RINGS, MAX_TIP_SEGMENTS};
use tracing::debug;

use crate::constants::{APEX_HARDNESS, BASE_HARDNESS, RING_HARDNESS, SURFACE_UP};

/// A single vertex of the tip
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactVertex {
    /// Rest position plus the wear offset
    pub position: Vec3,
    /// Position of the unworn tip
    pub rest_position: Vec3,
    /// Accumulated wear 0..1, never decreases
    pub wear: f32,
    /// Material hardness in (0, 1]
    pub hardness: f32,
}

impl ContactVertex {
    fn new(rest_position: Vec3, hardness: f32) -> Self {
        Self {
            position: rest_position,
            rest_position,
            wear: 0.0,
            hardness,
        }
    }
}

/// Per-vertex wear snapshot laid out for direct GPU upload
#[derive(Debug, Clone, Copy, PartialEq, Serialize, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct WearSample {
    pub position: [f32; 3],
    pub wear: f32,
}

/// Aggregate wear state for the host's wear overlay
#[derive(Debug, Clone, Default, Serialize)]
pub struct WearSummary {
    pub mean_wear: f32,
    pub max_wear: f32,
    /// Vertices with any wear at all
    pub worn_vertices: usize,
    pub samples: Vec<WearSample>,
}

impl WearSummary {
    /// Raw bytes of the sample buffer
    pub fn sample_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.samples)
    }
}

/// Tip mesh with derived surface data
#[derive(Debug, Clone, PartialEq)]
pub struct TipMesh {
    vertices: Vec<ContactVertex>,
    triangles: Vec<[u32; 3]>,
    normals: Vec<Vec3>,
    /// One third of the area of every adjacent triangle
    areas: Vec<f32>,
    radius: f32,
    height: f32,
    segments: u32,
    ring_count: u32,
}

impl TipMesh {
    /// Build an unworn tip
    ///
    /// Produces `1 + segments * (ring_count + 1)` vertices: the apex
    /// (hardness 0.7), `ring_count` intermediate rings (0.8) interpolated in
    /// radius and height, and the base ring (0.9). Segments are clamped to
    /// `3..=MAX_TIP_SEGMENTS` and rings to `MAX_TIP_RINGS`.
    pub fn generate(radius: f32, height: f32, segments: u32, ring_count: u32) -> Self {
        let segments = segments.clamp(3, MAX_TIP_SEGMENTS);
        let ring_total = ring_count.min(MAX_TIP_RINGS) + 1;

        let mut vertices = Vec::with_capacity(1 + (segments * ring_total) as usize);
        vertices.push(ContactVertex::new(Vec3::ZERO, APEX_HARDNESS));

        for ring in 1..=ring_total {
            let t = ring as f32 / ring_total as f32;
            let ring_radius = radius * t;
            let ring_height = height * t;
            let hardness = if ring == ring_total {
                BASE_HARDNESS
            } else {
                RING_HARDNESS
            };

            for segment in 0..segments {
                let theta = segment as f32 / segments as f32 * TAU;
                let rest = Vec3::new(
                    ring_radius * theta.cos(),
                    ring_height,
                    ring_radius * theta.sin(),
                );
                vertices.push(ContactVertex::new(rest, hardness));
            }
        }

        let mut mesh = Self {
            vertices,
            triangles: Vec::new(),
            normals: Vec::new(),
            areas: Vec::new(),
            radius,
            height,
            segments,
            ring_count: ring_total - 1,
        };
        mesh.rebuild_surface();

        debug!(
            "TipMesh::generate: radius={:.4}, height={:.4}, {} vertices, {} triangles",
            radius,
            height,
            mesh.vertices.len(),
            mesh.triangles.len()
        );

        mesh
    }

    /// Recompute triangles, vertex normals and contact areas
    ///
    /// Only derived data changes; vertex positions and wear are untouched,
    /// so calling this repeatedly yields identical results.
    pub fn rebuild_surface(&mut self) {
        self.triangles = self.triangulate();

        let vertex_count = self.vertices.len();
        let mut normals = vec![Vec3::ZERO; vertex_count];
        let mut areas = vec![0.0f32; vertex_count];

        for &[a, b, c] in &self.triangles {
            let (a, b, c) = (a as usize, b as usize, c as usize);
            let pa = self.vertices[a].position;
            let pb = self.vertices[b].position;
            let pc = self.vertices[c].position;

            // Length of the cross product is twice the triangle area
            let weighted_normal = (pb - pa).cross(pc - pa);
            let third_area = weighted_normal.length() / 6.0;

            for index in [a, b, c] {
                normals[index] += weighted_normal;
                areas[index] += third_area;
            }
        }

        self.normals = normals
            .into_iter()
            .map(|n| n.normalize_or(-SURFACE_UP))
            .collect();
        self.areas = areas;
    }

    fn triangulate(&self) -> Vec<[u32; 3]> {
        let segments = self.segments;
        let ring_total = self.ring_count + 1;
        let ring_start = |ring: u32| 1 + ring * segments;

        let mut triangles = Vec::with_capacity((segments * (2 * ring_total - 1)) as usize);

        // Apex fan onto the first ring
        for j in 0..segments {
            let next = (j + 1) % segments;
            triangles.push([0, ring_start(0) + j, ring_start(0) + next]);
        }

        // Strips between consecutive rings
        for ring in 0..ring_total - 1 {
            let lower = ring_start(ring);
            let upper = ring_start(ring + 1);
            for j in 0..segments {
                let next = (j + 1) % segments;
                triangles.push([lower + j, upper + j, lower + next]);
                triangles.push([lower + next, upper + j, upper + next]);
            }
        }

        triangles
    }

    /// Restore the unworn tip
    pub fn reset_wear(&mut self) {
        for vertex in &mut self.vertices {
            vertex.wear = 0.0;
            vertex.position = vertex.rest_position;
        }
        self.rebuild_surface();
    }

    pub fn vertices(&self) -> &[ContactVertex] {
        &self.vertices
    }

    pub(crate) fn vertices_mut(&mut self) -> &mut [ContactVertex] {
        &mut self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Outward vertex normals in tip space
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Surface area carried by each vertex
    pub fn vertex_areas(&self) -> &[f32] {
        &self.areas
    }

    pub fn total_area(&self) -> f32 {
        self.areas.iter().sum()
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn segments(&self) -> u32 {
        self.segments
    }

    pub fn ring_count(&self) -> u32 {
        self.ring_count
    }

    /// Mean wear over all vertices
    pub fn mean_wear(&self) -> f32 {
        if self.vertices.is_empty() {
            return 0.0;
        }
        self.vertices.iter().map(|v| v.wear).sum::<f32>() / self.vertices.len() as f32
    }

    /// Snapshot of wear for rendering
    pub fn wear_summary(&self) -> WearSummary {
        let samples: Vec<WearSample> = self
            .vertices
            .iter()
            .map(|v| WearSample {
                position: v.position.to_array(),
                wear: v.wear,
            })
            .collect();

        WearSummary {
            mean_wear: self.mean_wear(),
            max_wear: self.vertices.iter().map(|v| v.wear).fold(0.0, f32::max),
            worn_vertices: self.vertices.iter().filter(|v| v.wear > 0.0).count(),
            samples,
        }
    }
}
