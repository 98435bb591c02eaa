//! Voronoi cell construction from a Delaunay triangulation
//!
//! Neighbour sets come from the dual of the triangulation. Each cell polygon
//! starts as the bounding rectangle and is clipped against the bisector of the
//! site and every neighbour in turn.

use std::collections::BTreeSet;

use glam::Vec2;

use crate::cell::VoronoiCell;
use crate::error::Result;
use crate::generation::delaunay::Triangulation;
use crate::geometry::Rect;

/// Default distance each bisector is pulled towards its site
pub const DEFAULT_CELL_INSET: f32 = 0.01;

/// Options for building a bounded Voronoi diagram
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoronoiOptions {
    /// Origin-centred rectangle every cell is clipped to
    pub bounds: Rect,
    /// Distance each bisector is moved towards the site
    ///
    /// A small positive inset leaves a thin gap between neighbouring cells so
    /// their rendered outlines never share an edge. Zero yields cells lying
    /// exactly on the bisectors.
    pub cell_inset: f32,
}

impl VoronoiOptions {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            cell_inset: DEFAULT_CELL_INSET,
        }
    }

    pub fn with_inset(mut self, cell_inset: f32) -> Self {
        self.cell_inset = cell_inset;
        self
    }
}

/// Bounded Voronoi diagram, one cell per input site
#[derive(Debug, Clone)]
pub struct VoronoiDiagram {
    cells: Vec<VoronoiCell>,
    options: VoronoiOptions,
}

impl VoronoiDiagram {
    /// Build the diagram dual to `triangulation`
    ///
    /// Sites that were skipped during triangulation get a cell with no
    /// neighbours and an empty polygon.
    pub fn new(triangulation: &Triangulation, options: VoronoiOptions) -> Self {
        let adjacency = dual_adjacency(triangulation);
        let sites = triangulation.sites();

        let cells: Vec<VoronoiCell> = adjacency
            .into_iter()
            .enumerate()
            .map(|(index, neighbors)| {
                let position = sites[index].position();
                let polygon = if triangulation.is_inserted(index) {
                    cell_polygon(
                        position,
                        neighbors.iter().map(|&n| sites[n].position()),
                        &options,
                    )
                } else {
                    Vec::new()
                };
                VoronoiCell::new(index, position, neighbors, polygon)
            })
            .collect();

        log::debug!(
            "built {} voronoi cells in {}x{} bounds",
            cells.len(),
            options.bounds.width,
            options.bounds.height
        );
        Self { cells, options }
    }

    /// Triangulate `points` and build the diagram in one step
    pub fn from_sites(points: &[Vec2], options: VoronoiOptions) -> Result<Self> {
        let triangulation = Triangulation::new(points)?;
        Ok(Self::new(&triangulation, options))
    }

    pub fn cells(&self) -> &[VoronoiCell] {
        &self.cells
    }

    pub fn cell(&self, site: usize) -> Option<&VoronoiCell> {
        self.cells.get(site)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Neighbouring sites of `site`, empty for unknown sites
    pub fn neighbors(&self, site: usize) -> &[usize] {
        self.cells
            .get(site)
            .map(|c| c.neighbors.as_slice())
            .unwrap_or(&[])
    }

    pub fn are_neighbors(&self, a: usize, b: usize) -> bool {
        self.cells.get(a).is_some_and(|c| c.is_neighbor_of(b))
    }

    pub fn options(&self) -> &VoronoiOptions {
        &self.options
    }
}

/// Per-site neighbour lists: the other two corners of every face a site is in
///
/// Lists are sorted and free of duplicates.
pub fn dual_adjacency(triangulation: &Triangulation) -> Vec<Vec<usize>> {
    let mut sets: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); triangulation.sites().len()];
    for (_, face) in triangulation.mesh().faces() {
        let corners = face.corners();
        for &a in &corners {
            sets[a].extend(corners.iter().copied().filter(|&b| b != a));
        }
    }
    sets.into_iter().map(|s| s.into_iter().collect()).collect()
}

/// Clip the bounding rectangle down to the cell of `site`
pub fn cell_polygon(
    site: Vec2,
    neighbors: impl IntoIterator<Item = Vec2>,
    options: &VoronoiOptions,
) -> Vec<Vec2> {
    let mut polygon = options.bounds.corners().to_vec();
    for neighbor in neighbors {
        let delta = neighbor - site;
        let normal = delta.normalize_or_zero();
        if normal == Vec2::ZERO {
            continue;
        }
        let offset = normal.dot(site) + 0.5 * delta.length() - options.cell_inset;
        polygon = clip_half_plane(&polygon, normal, offset);
        if polygon.is_empty() {
            break;
        }
    }
    polygon
}

/// Sutherland–Hodgman clip of a convex polygon against `dot(normal, p) <= offset`
///
/// Vertices on the line are kept. An intersection point is inserted only where
/// an edge strictly crosses the line, so no duplicate vertices are produced.
pub fn clip_half_plane(polygon: &[Vec2], normal: Vec2, offset: f32) -> Vec<Vec2> {
    let n = polygon.len();
    let mut clipped = Vec::with_capacity(n + 1);
    for i in 0..n {
        let p0 = polygon[i];
        let p1 = polygon[(i + 1) % n];
        let d0 = normal.dot(p0) - offset;
        let d1 = normal.dot(p1) - offset;

        if d0 <= 0.0 {
            clipped.push(p0);
        }
        if (d0 < 0.0 && d1 > 0.0) || (d0 > 0.0 && d1 < 0.0) {
            let t = d0 / (d0 - d1);
            clipped.push(p0 + t * (p1 - p0));
        }
    }
    if clipped.len() < 3 {
        clipped.clear();
    }
    clipped
}
