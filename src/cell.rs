//! Voronoi Cell Structure
//!
//! Represents one bounded cell of a planar Voronoi diagram: its site, the
//! neighbouring sites it shares an edge with, and its clipped boundary polygon.

use glam::Vec2;

use crate::geometry::{point_in_polygon, polygon_signed_area};

/// A single Voronoi cell
///
/// # Design Notes
///
/// Cells are never serialized. They are rebuilt from the sites (or from the
/// map configuration) whenever needed, so the cell id is simply the index of
/// its site in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct VoronoiCell {
    /// Index of the site this cell belongs to
    pub site: usize,

    /// Location of the site
    pub position: Vec2,

    /// Sites whose cells share an edge with this one (sorted, no duplicates)
    ///
    /// This is exactly the set of sites joined to `site` by a Delaunay edge.
    /// Used for movement rules, flood fills and tile growth.
    pub neighbors: Vec<usize>,

    /// Boundary polygon, counter-clockwise, clipped to the diagram bounds
    ///
    /// Empty for sites that were skipped during triangulation.
    pub polygon: Vec<Vec2>,
}

impl VoronoiCell {
    pub fn new(site: usize, position: Vec2, neighbors: Vec<usize>, polygon: Vec<Vec2>) -> Self {
        Self {
            site,
            position,
            neighbors,
            polygon,
        }
    }

    /// Get the number of neighbouring cells
    #[inline]
    pub fn neighbor_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Check if this cell shares an edge with another site's cell
    #[inline]
    pub fn is_neighbor_of(&self, other_site: usize) -> bool {
        self.neighbors.binary_search(&other_site).is_ok()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.polygon.len()
    }

    /// `true` if the cell has no usable polygon
    pub fn is_empty(&self) -> bool {
        self.polygon.len() < 3
    }

    /// Area of the cell polygon
    pub fn area(&self) -> f32 {
        polygon_signed_area(&self.polygon).abs()
    }

    /// Check whether a point falls inside the cell polygon
    pub fn contains(&self, point: Vec2) -> bool {
        point_in_polygon(point, &self.polygon)
    }

    /// Fan triangulation `(v0, v_i, v_i+1)` of the convex cell polygon
    pub fn triangle_fan(&self) -> Vec<[Vec2; 3]> {
        if self.polygon.len() < 3 {
            return Vec::new();
        }
        let v0 = self.polygon[0];
        self.polygon
            .windows(2)
            .skip(1)
            .map(|w| [v0, w[0], w[1]])
            .collect()
    }
}
