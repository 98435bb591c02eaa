//! Mesh generation for the Voronoi map and decorative shapes
//!
//! Generates engine-agnostic triangle lists from planar geometry.

use glam::{Vec2, Vec3};

use crate::cell::VoronoiCell;
use crate::generation::Triangulation;

/// Plane a 2D shape is laid out in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Plane {
    /// Ground plane: `(x, y)` maps to `(x, 0, y)`, facing +Y
    #[default]
    Xz,
    /// Screen plane: `(x, y)` maps to `(x, y, 0)`, facing +Z
    Xy,
}

impl Plane {
    /// Lift a planar point into 3D
    #[inline]
    pub fn project(self, p: Vec2) -> Vec3 {
        match self {
            Plane::Xz => Vec3::new(p.x, 0.0, p.y),
            Plane::Xy => Vec3::new(p.x, p.y, 0.0),
        }
    }

    #[inline]
    pub fn normal(self) -> Vec3 {
        match self {
            Plane::Xz => Vec3::Y,
            Plane::Xy => Vec3::Z,
        }
    }

    /// The XZ projection mirrors the plane, so counter-clockwise input has
    /// to be flipped to stay front-facing from +Y
    #[inline]
    fn flips_winding(self) -> bool {
        matches!(self, Plane::Xz)
    }
}

/// Engine-agnostic mesh data output
///
/// Contains raw vertex data suitable for any rendering engine:
/// - Bevy: Convert to `Mesh` with attributes
/// - Godot: Convert to `ArrayMesh`
/// - wgpu: Use directly as vertex buffers
///
/// Triangles are wound counter-clockwise when seen from the normal side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions (3D coordinates)
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Build a mesh from planar triangles
    pub fn from_triangles(triangles: &[[Vec2; 3]], plane: Plane) -> Self {
        let mut mesh = MeshData::default();
        for triangle in triangles {
            mesh.push_triangle(*triangle, plane);
        }
        mesh
    }

    /// Append one planar triangle given counter-clockwise in 2D
    pub fn push_triangle(&mut self, [a, b, c]: [Vec2; 3], plane: Plane) {
        let corners = if plane.flips_winding() { [a, c, b] } else { [a, b, c] };
        let normal = plane.normal().to_array();
        for p in corners {
            self.indices.push(self.positions.len() as u32);
            self.positions.push(plane.project(p).to_array());
            self.normals.push(normal);
        }
    }

    /// Append one triangle already in 3D, with its face normal
    pub fn push_triangle_3d(&mut self, corners: [Vec3; 3]) {
        let [a, b, c] = corners;
        let normal = (b - a).cross(c - a).normalize_or_zero().to_array();
        for p in corners {
            self.indices.push(self.positions.len() as u32);
            self.positions.push(p.to_array());
            self.normals.push(normal);
        }
    }

    /// Append all triangles of another mesh
    pub fn append(&mut self, other: &MeshData) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.indices.extend(other.indices.iter().map(|i| base + i));
    }

    /// De-indexed vertex list, three vertices per triangle
    pub fn triangle_list(&self) -> Vec<Vec3> {
        self.indices
            .iter()
            .map(|&i| Vec3::from_array(self.positions[i as usize]))
            .collect()
    }
}

/// Mesh of every face of a triangulation, laid out in the ground plane
pub fn triangulation_mesh(triangulation: &Triangulation) -> MeshData {
    let sites = triangulation.sites();
    let triangles: Vec<[Vec2; 3]> = triangulation
        .faces()
        .into_iter()
        .map(|corners| corners.map(|s| sites[s].position()))
        .collect();
    MeshData::from_triangles(&triangles, Plane::Xz)
}

/// Fan mesh of one Voronoi cell, empty for cells without a polygon
pub fn cell_mesh(cell: &VoronoiCell, plane: Plane) -> MeshData {
    MeshData::from_triangles(&cell.triangle_fan(), plane)
}

/// Fan meshes of many cells merged into one
pub fn cells_mesh<'a>(cells: impl IntoIterator<Item = &'a VoronoiCell>, plane: Plane) -> MeshData {
    let mut mesh = MeshData::default();
    for cell in cells {
        for triangle in cell.triangle_fan() {
            mesh.push_triangle(triangle, plane);
        }
    }
    mesh
}
