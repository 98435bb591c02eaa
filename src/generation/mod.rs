//! Site generation, Delaunay triangulation and Voronoi construction
//!
//! Generates sites on a square map, spreads them out, triangulates them and
//! builds the bounded Voronoi cells of the map.

mod delaunay;
mod lloyd;
mod points;
mod voronoi;

pub use delaunay::{Site, Triangulation};
pub use lloyd::{lloyd_relaxation, lloyd_relaxation_with_options, LloydOptions};
pub use points::{generate_uniform_points, repel_points, RepelOptions};
pub use voronoi::{
    cell_polygon, clip_half_plane, dual_adjacency, VoronoiDiagram, VoronoiOptions,
    DEFAULT_CELL_INSET,
};

use glam::Vec2;

use crate::config::MapConfig;
use crate::error::Result;

/// Generate the final site positions for a configuration
///
/// Uniform noise, then repulsion smoothing, then optional Lloyd relaxation.
pub fn generate_sites(config: &MapConfig) -> Result<Vec<Vec2>> {
    let points = points::generate_uniform_points(config.site_count, config.map_size, config.seed);
    let points = points::repel_points(points, &config.repel_options());

    if config.lloyd_iterations > 0 {
        lloyd::lloyd_relaxation_with_options(points, &config.voronoi_options(), config.lloyd_options())
    } else {
        Ok(points)
    }
}

/// Generate sites and build their Voronoi diagram from configuration
pub fn generate_diagram(config: &MapConfig) -> Result<(Triangulation, VoronoiDiagram)> {
    let sites = generate_sites(config)?;
    let triangulation = Triangulation::new(&sites)?;
    let diagram = VoronoiDiagram::new(&triangulation, config.voronoi_options());
    Ok((triangulation, diagram))
}
