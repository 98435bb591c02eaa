//! Planar Voronoi map generation
//!
//! A standalone geometry kernel for tile-based game maps: Delaunay
//! triangulation, bounded Voronoi cells, polygon triangulation with holes and
//! engine-agnostic mesh output (Bevy, Godot, wgpu, etc.)
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use rust_voronoi_map::*;
//!
//! // Generate a map
//! let config = MapConfigBuilder::new()
//!     .seed(42)
//!     .site_count(200).unwrap()
//!     .tile_count(101)
//!     .build().unwrap();
//!
//! let map = VoronoiMap::generate(config).unwrap();
//!
//! // Generate mesh for rendering
//! let mesh = map.mesh();
//! println!("Generated {} triangles", mesh.triangle_count());
//! ```
//!
//! The kernel can also be used directly:
//!
//! ```rust
//! use rust_voronoi_map::*;
//!
//! let sites = [
//!     Vec2::new(-1.0, -1.0),
//!     Vec2::new(1.0, -1.0),
//!     Vec2::new(1.0, 1.0),
//!     Vec2::new(-1.0, 1.0),
//!     Vec2::new(0.1, 0.2),
//! ];
//! let triangulation = Triangulation::new(&sites).unwrap();
//! let diagram = VoronoiDiagram::new(&triangulation, VoronoiOptions::new(Rect::square(4.0)));
//! assert_eq!(diagram.neighbors(4).len(), 4);
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): Enables O(log n) position-to-tile lookups using KD-tree
//! - `serde`: Enables serialization support for configuration

// Modules
pub mod error;
pub mod geometry;
pub mod hull;
pub mod triangle_mesh;
pub mod config;
pub mod cell;
pub mod generation;
pub mod polygon;
pub mod mesh;
pub mod shapes;
pub mod map;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{VoronoiError, Result};
pub use geometry::Rect;
pub use hull::convex_hull;
pub use triangle_mesh::{EdgeRef, Face, FaceHandle, TriangleMesh};
pub use config::{MapConfig, MapConfigBuilder};
pub use cell::VoronoiCell;
pub use generation::{
    LloydOptions, RepelOptions, Site, Triangulation, VoronoiDiagram, VoronoiOptions,
};
pub use polygon::PolygonWithHoles;
pub use mesh::{MeshData, Plane};
pub use map::{MapTile, VoronoiMap};

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam vectors for convenience
pub use glam::{Vec2, Vec3};
