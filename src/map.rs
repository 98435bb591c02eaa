//! VoronoiMap main structure

use std::collections::{BTreeSet, HashSet};
use std::time::Instant;

use glam::{Vec2, Vec3};

use crate::cell::VoronoiCell;
use crate::config::MapConfig;
use crate::error::{Result, VoronoiError};
use crate::generation::{generate_diagram, Triangulation, VoronoiDiagram};
use crate::mesh::{cell_mesh, cells_mesh, MeshData, Plane};

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// One playable tile of the map
#[derive(Debug, Clone, PartialEq)]
pub struct MapTile {
    /// Tile ID, the order in which the tile joined the map (0 is the seed)
    pub id: usize,
    /// Site of the Voronoi cell this tile was made from
    pub site: usize,
    /// Site position in the ground plane `(x, 0, y)`
    pub center: Vec3,
    /// Cell outline, counter-clockwise
    pub polygon: Vec<Vec2>,
    /// Neighbouring tile IDs, sorted; cells outside the map are left out
    pub neighbors: Vec<usize>,
}

impl MapTile {
    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.center.x, self.center.z)
    }

    pub fn neighbor_count(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_neighbor_of(&self, other_id: usize) -> bool {
        self.neighbors.binary_search(&other_id).is_ok()
    }
}

/// A connected set of Voronoi tiles grown on a square map
///
/// # Examples
///
/// ```
/// use rust_voronoi_map::*;
///
/// let config = MapConfigBuilder::new()
///     .seed(42)
///     .tile_count(40)
///     .build()
///     .unwrap();
///
/// let map = VoronoiMap::generate(config).unwrap();
/// assert_eq!(map.tile_count(), 40);
///
/// if let Some(tile) = map.tile(0) {
///     println!("Seed tile has {} neighbours", tile.neighbor_count());
/// }
/// ```
#[derive(Clone)]
pub struct VoronoiMap {
    config: MapConfig,
    triangulation: Triangulation,
    diagram: VoronoiDiagram,
    tiles: Vec<MapTile>,
    /// Tile ID for every site, `None` for cells outside the map
    site_tiles: Vec<Option<usize>>,
    #[cfg(feature = "spatial-index")]
    spatial_index: SpatialIndex,
}

impl VoronoiMap {
    /// Generate a map from configuration
    ///
    /// Sites are scattered and smoothed, their Voronoi diagram is built over
    /// the square map, and tiles are grown from the first eligible cell. Each
    /// step adds the lowest-numbered eligible cell touching the map so far. A
    /// cell is eligible when it is not empty and its site lies within
    /// [`MapConfig::tile_cutoff`] of the centre on both axes.
    ///
    /// # Errors
    ///
    /// - `DegenerateGeometry` if the sites cannot be triangulated
    /// - `MalformedInput` if fewer than `tile_count` connected eligible cells
    ///   exist
    pub fn generate(config: MapConfig) -> Result<Self> {
        let start = Instant::now();
        let (triangulation, diagram) = generate_diagram(&config)?;
        let map = Self::assemble(config, triangulation, diagram)?;

        log::debug!(
            "map: {} tiles from {} sites in {:?}",
            map.tiles.len(),
            map.diagram.len(),
            start.elapsed()
        );
        Ok(map)
    }

    /// Grow the tiles over an existing diagram and build the lookup tables
    fn assemble(
        config: MapConfig,
        triangulation: Triangulation,
        diagram: VoronoiDiagram,
    ) -> Result<Self> {
        let members = grow_tiles(&diagram, config.tile_cutoff(), config.tile_count)?;

        let mut site_tiles = vec![None; diagram.len()];
        for (id, &site) in members.iter().enumerate() {
            site_tiles[site] = Some(id);
        }

        let tiles: Vec<MapTile> = members
            .iter()
            .enumerate()
            .map(|(id, &site)| {
                let cell = &diagram.cells()[site];
                let mut neighbors: Vec<usize> =
                    cell.neighbors.iter().filter_map(|&n| site_tiles[n]).collect();
                neighbors.sort_unstable();
                MapTile {
                    id,
                    site,
                    center: Vec3::new(cell.position.x, 0.0, cell.position.y),
                    polygon: cell.polygon.clone(),
                    neighbors,
                }
            })
            .collect();

        #[cfg(feature = "spatial-index")]
        let spatial_index = SpatialIndex::from_indexed(
            diagram
                .cells()
                .iter()
                .filter(|c| triangulation.is_inserted(c.site))
                .map(|c| (c.site, c.position)),
        );

        Ok(Self {
            config,
            triangulation,
            diagram,
            tiles,
            site_tiles,
            #[cfg(feature = "spatial-index")]
            spatial_index,
        })
    }

    #[inline]
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Delaunay triangulation of all sites, including those outside the map
    pub fn triangulation(&self) -> &Triangulation {
        &self.triangulation
    }

    /// Voronoi diagram of all sites, including those outside the map
    pub fn diagram(&self) -> &VoronoiDiagram {
        &self.diagram
    }

    #[inline]
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Get a tile by ID
    ///
    /// Returns `None` if the tile ID is out of bounds.
    #[inline]
    pub fn tile(&self, id: usize) -> Option<&MapTile> {
        self.tiles.get(id)
    }

    #[inline]
    pub fn tiles(&self) -> &[MapTile] {
        &self.tiles
    }

    /// Tile made from the given site, if that cell is part of the map
    pub fn tile_for_site(&self, site: usize) -> Option<&MapTile> {
        let id = (*self.site_tiles.get(site)?)?;
        self.tiles.get(id)
    }

    /// Get neighbour IDs for a tile
    ///
    /// Returns an empty slice if the tile ID is invalid.
    pub fn neighbors(&self, id: usize) -> &[usize] {
        self.tiles
            .get(id)
            .map(|t| t.neighbors.as_slice())
            .unwrap_or(&[])
    }

    pub fn are_neighbors(&self, a: usize, b: usize) -> bool {
        self.tiles.get(a).is_some_and(|t| t.is_neighbor_of(b))
    }

    /// Find the tile under a ground-plane position
    ///
    /// Uses the KD-tree over the triangulated sites: the nearest site owns the
    /// cell that contains `position`. Returns `None` when that cell is not a
    /// tile.
    ///
    /// # Example
    ///
    /// ```
    /// # use rust_voronoi_map::*;
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// # let config = MapConfigBuilder::new().seed(7).tile_count(20).build().unwrap();
    /// let map = VoronoiMap::generate(config).unwrap();
    /// let seed = map.tile(0).unwrap();
    /// assert_eq!(map.find_tile_at(seed.position()), Some(0));
    /// # }
    /// ```
    #[cfg(feature = "spatial-index")]
    pub fn find_tile_at(&self, position: Vec2) -> Option<usize> {
        let site = self.spatial_index.find_nearest(position)?;
        self.site_tiles.get(site).copied().flatten()
    }

    /// Find tiles within a given hop count from a center tile (BFS)
    ///
    /// Returns the tile IDs reachable in at most `hops` steps, including the
    /// center tile. Returns an empty vec if `center_id` is invalid.
    pub fn tiles_within_hops(&self, center_id: usize, hops: usize) -> Vec<usize> {
        if center_id >= self.tiles.len() {
            return vec![];
        }

        let mut visited = HashSet::new();
        let mut current = vec![center_id];
        visited.insert(center_id);

        for _ in 0..hops {
            let mut next = Vec::new();
            for &tile_id in &current {
                for &neighbor in self.neighbors(tile_id) {
                    if visited.insert(neighbor) {
                        next.push(neighbor);
                    }
                }
            }
            current = next;
        }

        let mut result: Vec<usize> = visited.into_iter().collect();
        result.sort_unstable();
        result
    }

    /// Fan mesh of a single tile in the ground plane
    pub fn tile_mesh(&self, id: usize) -> Result<MeshData> {
        let tile = self.tiles.get(id).ok_or(VoronoiError::TileNotFound(id))?;
        let cell = VoronoiCell::new(tile.site, tile.position(), Vec::new(), tile.polygon.clone());
        Ok(cell_mesh(&cell, Plane::Xz))
    }

    /// Fan mesh of every tile in the ground plane
    pub fn mesh(&self) -> MeshData {
        let cells = self
            .tiles
            .iter()
            .filter_map(|tile| self.diagram.cell(tile.site));
        cells_mesh(cells, Plane::Xz)
    }
}

fn eligible(cell: &VoronoiCell, cutoff: f32) -> bool {
    !cell.is_empty() && cell.position.x.abs() <= cutoff && cell.position.y.abs() <= cutoff
}

/// Sites of the grown map in joining order
fn grow_tiles(diagram: &VoronoiDiagram, cutoff: f32, tile_count: usize) -> Result<Vec<usize>> {
    let cells = diagram.cells();
    let seed = cells
        .iter()
        .position(|c| eligible(c, cutoff))
        .ok_or_else(|| VoronoiError::MalformedInput("malformed point set: no eligible seed cell".into()))?;

    let mut members = vec![seed];
    let mut joined = vec![false; cells.len()];
    joined[seed] = true;

    // Eligible cells touching the map, taken lowest site first
    let mut frontier = BTreeSet::new();
    let extend = |site: usize, frontier: &mut BTreeSet<usize>, joined: &[bool]| {
        for &n in diagram.neighbors(site) {
            if !joined[n] && eligible(&cells[n], cutoff) {
                frontier.insert(n);
            }
        }
    };
    extend(seed, &mut frontier, &joined);

    while members.len() < tile_count {
        let Some(next) = frontier.pop_first() else {
            log::warn!(
                "map: only {} connected eligible cells, {} requested",
                members.len(),
                tile_count
            );
            return Err(VoronoiError::MalformedInput(format!(
                "malformed point set: grew {} of {} tiles",
                members.len(),
                tile_count
            )));
        };
        joined[next] = true;
        members.push(next);
        extend(next, &mut frontier, &joined);
    }

    Ok(members)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapConfigBuilder;

    fn small_config(seed: u32) -> MapConfig {
        MapConfigBuilder::new()
            .seed(seed)
            .tile_count(40)
            .build()
            .unwrap()
    }

    #[cfg(feature = "spatial-index")]
    #[test]
    fn test_find_tile_at_ignores_skipped_duplicates() {
        let mut sites: Vec<Vec2> = (-1..=1)
            .flat_map(|x| (-1..=1).map(move |y| Vec2::new(x as f32, y as f32)))
            .collect();
        sites.push(Vec2::ZERO);
        let config = MapConfigBuilder::new().seed(1).tile_count(9).build().unwrap();
        let triangulation = Triangulation::new(&sites).unwrap();
        assert!(!triangulation.is_inserted(9));
        let diagram = VoronoiDiagram::new(&triangulation, config.voronoi_options());

        let map = VoronoiMap::assemble(config, triangulation, diagram).unwrap();
        let centre = map.tile_for_site(4).unwrap().id;
        assert_eq!(map.find_tile_at(Vec2::ZERO), Some(centre));
        assert_eq!(map.find_tile_at(Vec2::new(0.1, -0.1)), Some(centre));
    }

    #[test]
    fn test_map_generation() {
        let map = VoronoiMap::generate(small_config(42)).unwrap();

        assert_eq!(map.tile_count(), 40);
        assert_eq!(map.diagram().len(), 200);

        let cutoff = map.config().tile_cutoff();
        for (id, tile) in map.tiles().iter().enumerate() {
            assert_eq!(tile.id, id);
            assert_eq!(tile.center.y, 0.0);
            assert!(tile.center.x.abs() <= cutoff && tile.center.z.abs() <= cutoff);
            assert!(tile.polygon.len() >= 3, "Tile {} has no outline", id);
        }
    }

    #[test]
    fn test_default_map_size() {
        let config = MapConfigBuilder::new().seed(42).build().unwrap();
        let map = VoronoiMap::generate(config).unwrap();
        assert_eq!(map.tile_count(), 101);
    }

    #[test]
    fn test_map_determinism() {
        let a = VoronoiMap::generate(small_config(9)).unwrap();
        let b = VoronoiMap::generate(small_config(9)).unwrap();
        assert_eq!(a.tiles(), b.tiles());
    }

    #[test]
    fn test_tiles_are_connected() {
        let map = VoronoiMap::generate(small_config(42)).unwrap();
        let reachable = map.tiles_within_hops(0, map.tile_count());
        assert_eq!(reachable.len(), map.tile_count());
    }

    #[test]
    fn test_neighbors_are_symmetric_and_inside() {
        let map = VoronoiMap::generate(small_config(3)).unwrap();
        for tile in map.tiles() {
            assert!(!tile.neighbors.is_empty() || map.tile_count() == 1);
            for &n in &tile.neighbors {
                assert!(n < map.tile_count());
                assert!(map.are_neighbors(n, tile.id), "{} -> {} is one-way", tile.id, n);
            }
        }
    }

    #[test]
    fn test_tiles_within_hops() {
        let map = VoronoiMap::generate(small_config(42)).unwrap();

        assert_eq!(map.tiles_within_hops(0, 0), vec![0]);

        let one_hop = map.tiles_within_hops(0, 1);
        assert_eq!(one_hop.len(), 1 + map.neighbors(0).len());

        let two_hops = map.tiles_within_hops(0, 2);
        assert!(two_hops.len() > one_hop.len());
    }

    #[test]
    fn test_invalid_tile_id() {
        let map = VoronoiMap::generate(small_config(42)).unwrap();

        assert!(map.tile(map.tile_count()).is_none());
        assert!(map.neighbors(999_999).is_empty());
        assert!(map.tiles_within_hops(999_999, 5).is_empty());
        assert_eq!(map.tile_mesh(999_999), Err(VoronoiError::TileNotFound(999_999)));
    }

    #[test]
    fn test_too_many_tiles() {
        let config = MapConfigBuilder::new()
            .seed(42)
            .tile_count(200)
            .build()
            .unwrap();
        let err = VoronoiMap::generate(config).err();
        assert!(matches!(err, Some(VoronoiError::MalformedInput(_))));
    }

    #[test]
    fn test_tile_for_site() {
        let map = VoronoiMap::generate(small_config(42)).unwrap();
        for tile in map.tiles() {
            assert_eq!(map.tile_for_site(tile.site).map(|t| t.id), Some(tile.id));
        }
    }

    #[cfg(feature = "spatial-index")]
    #[test]
    fn test_find_tile_at() {
        let map = VoronoiMap::generate(small_config(42)).unwrap();

        for tile in map.tiles() {
            assert_eq!(map.find_tile_at(tile.position()), Some(tile.id));
        }
        for (site, cell) in map.diagram().cells().iter().enumerate() {
            if map.tile_for_site(site).is_none() {
                assert_eq!(map.find_tile_at(cell.position), None);
            }
        }
    }

    #[test]
    fn test_map_mesh() {
        let map = VoronoiMap::generate(small_config(42)).unwrap();
        let mesh = map.mesh();

        let expected: usize = map.tiles().iter().map(|t| t.polygon.len() - 2).sum();
        assert_eq!(mesh.triangle_count(), expected);
        assert!(mesh.positions.iter().all(|p| p[1] == 0.0));
        assert_eq!(map.tile_mesh(0).unwrap().triangle_count(), map.tile(0).unwrap().polygon.len() - 2);
    }
}
