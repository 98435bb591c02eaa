//! Decorative shapes: flags, crowns, markers and the mine wheel
//!
//! Every shape is authored in the XY plane in map units and triangulated
//! with [`crate::polygon`]. Shapes with cut-outs go through
//! [`PolygonWithHoles::cut`] first.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use crate::error::Result;
use crate::mesh::{MeshData, Plane};
use crate::polygon::{triangulate, PolygonWithHoles};

/// Regular polygon approximating a circle, counter-clockwise from angle 0
///
/// `segments` is clamped to at least 3.
///
/// # Example
///
/// ```
/// use glam::Vec2;
/// use rust_voronoi_map::shapes::circle;
///
/// let points = circle(Vec2::ZERO, 1.0, 4);
/// assert_eq!(points.len(), 4);
/// assert!((points[1] - Vec2::Y).length() < 1e-6);
/// ```
pub fn circle(center: Vec2, radius: f32, segments: usize) -> Vec<Vec2> {
    let segments = segments.max(3);
    let step = TAU / segments as f32;
    (0..segments)
        .map(|i| {
            let (sin, cos) = (i as f32 * step).sin_cos();
            center + radius * Vec2::new(cos, sin)
        })
        .collect()
}

fn outline_mesh(outline: &[Vec2]) -> Result<MeshData> {
    Ok(MeshData::from_triangles(&triangulate(outline)?, Plane::Xy))
}

/// Cut every cutter out of `outline` in turn
fn cut_all(outline: &[Vec2], cutters: &[Vec<Vec2>]) -> Result<Vec<PolygonWithHoles>> {
    let mut pieces = vec![PolygonWithHoles::new(outline)];
    for cutter in cutters {
        let mut next = Vec::with_capacity(pieces.len());
        for piece in &pieces {
            next.extend(piece.cut(cutter)?);
        }
        pieces = next;
    }
    Ok(pieces)
}

fn pieces_mesh(pieces: &[PolygonWithHoles]) -> Result<MeshData> {
    let mut mesh = MeshData::default();
    for piece in pieces {
        mesh.append(&MeshData::from_triangles(&piece.triangulate()?, Plane::Xy));
    }
    Ok(mesh)
}

fn pennant(x: f32, y0: f32, y1: f32) -> [Vec2; 5] {
    [
        Vec2::new(-x, y0),
        Vec2::new(0.0, 0.0),
        Vec2::new(x, y0),
        Vec2::new(x, y1),
        Vec2::new(-x, y1),
    ]
}

/// Tile ownership flag: a pointed banner with four round holes
pub fn flag_mesh() -> Result<MeshData> {
    let holes: Vec<Vec<Vec2>> = [(-0.05, 0.15), (-0.05, 0.25), (0.05, 0.15), (0.05, 0.25)]
        .into_iter()
        .map(|(x, y)| circle(Vec2::new(x, y), 0.035, 16))
        .collect();
    pieces_mesh(&cut_all(&pennant(0.1, 0.1, 0.3), &holes)?)
}

/// Half-size flag without holes
pub fn small_flag_mesh() -> Result<MeshData> {
    outline_mesh(&pennant(0.05, 0.05, 0.15))
}

pub fn crown_mesh() -> Result<MeshData> {
    let (x0, x1) = (0.1, 0.05);
    let (y0, y1) = (0.025, 0.05);
    outline_mesh(&[
        Vec2::new(-x0, 0.0),
        Vec2::new(x0, 0.0),
        Vec2::new(x0, y1),
        Vec2::new(x1, y0),
        Vec2::new(0.0, y1),
        Vec2::new(-x1, y0),
        Vec2::new(-x0, y1),
    ])
}

/// Thin bar drawn under a tile label
pub fn decal_mesh() -> Result<MeshData> {
    let (x, y) = (0.05, 0.023);
    outline_mesh(&[
        Vec2::new(-x, 0.0),
        Vec2::new(x, 0.0),
        Vec2::new(x, y),
        Vec2::new(-x, y),
    ])
}

/// Filled circle at the origin
pub fn dot_mesh(radius: f32, segments: usize) -> Result<MeshData> {
    outline_mesh(&circle(Vec2::ZERO, radius, segments))
}

/// Arrow head pointing down at the origin
pub fn indicator_mesh() -> Result<MeshData> {
    let (x, y0, y1) = (0.05, 0.1, 0.15);
    outline_mesh(&[
        Vec2::new(0.0, 0.0),
        Vec2::new(x, y1),
        Vec2::new(0.0, y0),
        Vec2::new(-x, y1),
    ])
}

/// Eight-pointed star standing on the origin
pub fn star_mesh() -> Result<MeshData> {
    let center = Vec2::new(0.0, 0.2);
    let mut outline = circle(center, 0.2, 16);
    for p in outline.iter_mut().skip(1).step_by(2) {
        *p += 0.5 * (center - *p);
    }
    outline_mesh(&outline)
}

/// Annulus between two concentric circles
pub fn ring_mesh(outer_radius: f32, inner_radius: f32, segments: usize) -> Result<MeshData> {
    let pieces = cut_all(
        &circle(Vec2::ZERO, outer_radius, segments),
        &[circle(Vec2::ZERO, inner_radius, segments)],
    )?;
    pieces_mesh(&pieces)
}

const MINE_UNIT: f32 = 0.025;

/// Mine wheel: a ring with two crossing spokes
pub fn wheel_mesh() -> Result<MeshData> {
    let d = MINE_UNIT;
    let mut mesh = ring_mesh(3.0 * d, 2.5 * d, 16)?;

    let (half_width, half_length) = (0.25 * d, 2.75 * d);
    let vertical = [
        Vec2::new(-half_width, -half_length),
        Vec2::new(half_width, -half_length),
        Vec2::new(half_width, half_length),
        Vec2::new(-half_width, half_length),
    ];
    for spoke in [vertical, vertical.map(|p| Vec2::new(p.y, -p.x))] {
        mesh.push_triangle([spoke[0], spoke[1], spoke[2]], Plane::Xy);
        mesh.push_triangle([spoke[0], spoke[2], spoke[3]], Plane::Xy);
    }
    Ok(mesh)
}

/// Mine tower the wheel is mounted on: two slanted faces meeting at the top
pub fn mine_base_mesh() -> MeshData {
    let d = MINE_UNIT;
    let (x0, x1) = (1.5 * d, 2.0 * d);
    let (y0, y1) = (3.0 * d, 4.0 * d);
    let (z0, z1) = (0.25 * d, d);

    let mut mesh = MeshData::default();
    for side in [1.0, -1.0] {
        let p = [
            Vec3::new(-x1, 0.0, side * z1),
            Vec3::new(-x0, 0.0, side * z1),
            Vec3::new(-x0, y0, side * z0),
            Vec3::new(x0, y0, side * z0),
            Vec3::new(x0, 0.0, side * z1),
            Vec3::new(x1, 0.0, side * z1),
            Vec3::new(x1, y1, 0.0),
            Vec3::new(-x1, y1, 0.0),
        ];
        for [a, b, c] in [
            [0, 1, 2],
            [0, 2, 7],
            [2, 3, 6],
            [2, 6, 7],
            [3, 4, 5],
            [3, 5, 6],
        ] {
            // The back side is wound the other way round to face -Z
            let corners = if side > 0.0 { [p[a], p[b], p[c]] } else { [p[a], p[c], p[b]] };
            mesh.push_triangle_3d(corners);
        }
    }
    mesh
}
