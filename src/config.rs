//! Voronoi Map Configuration and Builder
//!
//! This module provides the configuration type for deterministic map generation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, VoronoiError};
use crate::generation::{LloydOptions, RepelOptions, VoronoiOptions};
use crate::geometry::Rect;

/// Configuration for deterministic Voronoi map generation
///
/// The same configuration always produces the identical map, so only the
/// configuration needs to be stored or sent over the network.
///
/// # Example
///
/// ```rust
/// use rust_voronoi_map::*;
///
/// let config = MapConfigBuilder::new()
///     .seed(42)
///     .site_count(120).unwrap()
///     .build()
///     .unwrap();
///
/// // Config is serializable (with "serde" feature)
/// # #[cfg(feature = "serde")]
/// # {
/// let json = serde_json::to_string(&config).unwrap();
/// let restored: MapConfig = serde_json::from_str(&json).unwrap();
/// assert_eq!(config.seed, restored.seed);
/// # }
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapConfig {
    /// Random seed for site placement
    pub seed: u32,

    /// Side length of the square map, centred on the origin
    pub map_size: f32,

    /// Number of random sites scattered over the map
    pub site_count: usize,

    /// Number of repulsion passes applied to the sites
    ///
    /// - 0: Raw uniform noise (clumpy)
    /// - 10: Default, evenly spread sites
    pub smoothing_iterations: usize,

    /// Number of Lloyd's relaxation iterations run after smoothing
    pub lloyd_iterations: usize,

    /// Convergence threshold for Lloyd's relaxation (fraction of map size)
    ///
    /// Relaxation stops early once no site moves more than this fraction of
    /// the map size. 0.0 runs every iteration.
    pub lloyd_convergence: f32,

    /// Sites closer than this to the map edge never become tiles
    pub border_margin: f32,

    /// Number of connected tiles grown from the seed cell
    pub tile_count: usize,

    /// Distance each cell edge is pulled in from the bisector
    pub cell_inset: f32,
}

impl MapConfig {
    /// Bounding rectangle of the map
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::square(self.map_size)
    }

    /// Largest |x| or |y| a site may have to become a tile
    #[inline]
    pub fn tile_cutoff(&self) -> f32 {
        self.map_size * 0.5 - self.border_margin
    }

    pub fn voronoi_options(&self) -> VoronoiOptions {
        VoronoiOptions::new(self.bounds()).with_inset(self.cell_inset)
    }

    pub fn lloyd_options(&self) -> LloydOptions {
        LloydOptions {
            max_iterations: self.lloyd_iterations,
            convergence_threshold: self.lloyd_convergence,
        }
    }

    pub fn repel_options(&self) -> RepelOptions {
        RepelOptions {
            iterations: self.smoothing_iterations,
            ..RepelOptions::default()
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        let builder = MapConfigBuilder::new();
        MapConfig {
            seed: rand::random(),
            map_size: builder.map_size,
            site_count: builder.site_count,
            smoothing_iterations: builder.smoothing_iterations,
            lloyd_iterations: builder.lloyd_iterations,
            lloyd_convergence: builder.lloyd_convergence,
            border_margin: builder.border_margin,
            tile_count: builder.tile_count,
            cell_inset: builder.cell_inset,
        }
    }
}

/// Builder for creating MapConfig with validation
///
/// # Example
///
/// ```rust
/// use rust_voronoi_map::*;
///
/// // Use defaults
/// let config = MapConfigBuilder::new().build().unwrap();
///
/// // Customize
/// let config = MapConfigBuilder::new()
///     .seed(12345)
///     .map_size(10.0)
///     .unwrap()
///     .smoothing_iterations(5)
///     .unwrap()
///     .tile_count(40)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct MapConfigBuilder {
    seed: Option<u32>,
    map_size: f32,
    site_count: usize,
    smoothing_iterations: usize,
    lloyd_iterations: usize,
    lloyd_convergence: f32,
    border_margin: f32,
    tile_count: usize,
    cell_inset: f32,
}

impl MapConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: Random
    /// - map_size: 7.5
    /// - site_count: 200
    /// - smoothing_iterations: 10
    /// - lloyd_iterations: 0
    /// - lloyd_convergence: 0.01
    /// - border_margin: 0.5
    /// - tile_count: 101
    /// - cell_inset: 0.01
    pub fn new() -> Self {
        Self {
            seed: None,
            map_size: 7.5,
            site_count: 200,
            smoothing_iterations: 10,
            lloyd_iterations: 0,
            lloyd_convergence: 0.01,
            border_margin: 0.5,
            tile_count: 101,
            cell_inset: 0.01,
        }
    }

    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the side length of the square map
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if size <= 0.0
    pub fn map_size(mut self, size: f32) -> Result<Self> {
        if !(size > 0.0) {
            return Err(VoronoiError::InvalidConfig(format!(
                "Map size must be positive (got {})",
                size
            )));
        }
        self.map_size = size;
        Ok(self)
    }

    /// Set the number of sites
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if fewer than 3 sites are requested
    pub fn site_count(mut self, count: usize) -> Result<Self> {
        if count < 3 {
            return Err(VoronoiError::InvalidConfig(format!(
                "Site count must be >= 3 (got {})",
                count
            )));
        }
        self.site_count = count;
        Ok(self)
    }

    /// Set the number of repulsion passes
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if iterations > 50
    pub fn smoothing_iterations(mut self, iterations: usize) -> Result<Self> {
        if iterations > 50 {
            return Err(VoronoiError::InvalidConfig(format!(
                "Smoothing iterations must be <= 50 (got {})",
                iterations
            )));
        }
        self.smoothing_iterations = iterations;
        Ok(self)
    }

    /// Set the number of Lloyd's Relaxation iterations
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if iterations > 20 (excessive and impractical)
    pub fn lloyd_iterations(mut self, iterations: usize) -> Result<Self> {
        if iterations > 20 {
            return Err(VoronoiError::InvalidConfig(format!(
                "Lloyd iterations must be <= 20 (got {})",
                iterations
            )));
        }
        self.lloyd_iterations = iterations;
        Ok(self)
    }

    /// Set the convergence threshold for Lloyd's relaxation
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if threshold is negative
    pub fn lloyd_convergence(mut self, threshold: f32) -> Result<Self> {
        if threshold < 0.0 {
            return Err(VoronoiError::InvalidConfig(format!(
                "Lloyd convergence threshold must be >= 0 (got {})",
                threshold
            )));
        }
        self.lloyd_convergence = threshold;
        Ok(self)
    }

    /// Set the border margin
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the margin is negative
    pub fn border_margin(mut self, margin: f32) -> Result<Self> {
        if margin < 0.0 {
            return Err(VoronoiError::InvalidConfig(format!(
                "Border margin must be >= 0 (got {})",
                margin
            )));
        }
        self.border_margin = margin;
        Ok(self)
    }

    /// Set the number of connected tiles to grow
    pub fn tile_count(mut self, count: usize) -> Self {
        self.tile_count = count;
        self
    }

    /// Set the bisector inset of each cell
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the inset is negative
    pub fn cell_inset(mut self, inset: f32) -> Result<Self> {
        if inset < 0.0 {
            return Err(VoronoiError::InvalidConfig(format!(
                "Cell inset must be >= 0 (got {})",
                inset
            )));
        }
        self.cell_inset = inset;
        Ok(self)
    }

    /// Build the configuration
    ///
    /// If no seed was provided, generates a random seed using thread_rng.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the settings are inconsistent with each
    /// other: no tiles, more tiles than sites, or a border margin that leaves
    /// no room for tiles.
    pub fn build(self) -> Result<MapConfig> {
        if self.tile_count == 0 || self.tile_count > self.site_count {
            return Err(VoronoiError::InvalidConfig(format!(
                "Tile count must be between 1 and the site count {} (got {})",
                self.site_count, self.tile_count
            )));
        }
        if self.border_margin * 2.0 >= self.map_size {
            return Err(VoronoiError::InvalidConfig(format!(
                "Border margin {} leaves no room on a map of size {}",
                self.border_margin, self.map_size
            )));
        }

        let seed = self.seed.unwrap_or_else(|| rand::random());
        Ok(MapConfig {
            seed,
            map_size: self.map_size,
            site_count: self.site_count,
            smoothing_iterations: self.smoothing_iterations,
            lloyd_iterations: self.lloyd_iterations,
            lloyd_convergence: self.lloyd_convergence,
            border_margin: self.border_margin,
            tile_count: self.tile_count,
            cell_inset: self.cell_inset,
        })
    }
}

impl Default for MapConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
