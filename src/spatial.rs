//! Spatial indexing for fast position-to-cell lookups
//!
//! This module is only available with the `spatial-index` feature.

#[cfg(feature = "spatial-index")]
use glam::Vec2;
#[cfg(feature = "spatial-index")]
use kiddo::immutable::float::kdtree::ImmutableKdTree;
#[cfg(feature = "spatial-index")]
use kiddo::SquaredEuclidean;

/// Wrapper around a 2D KD-tree over site positions
///
/// The nearest site to a position is the site whose Voronoi cell contains
/// it, so a nearest-neighbour query answers "which cell was clicked".
///
/// # Performance
///
/// - Construction: O(n log n)
/// - Query: O(log n)
#[cfg(feature = "spatial-index")]
#[derive(Clone)]
pub struct SpatialIndex {
    tree: Option<ImmutableKdTree<f32, usize, 2, 32>>,
    /// Site index reported for each tree item
    items: Vec<usize>,
}

#[cfg(feature = "spatial-index")]
impl SpatialIndex {
    /// Build spatial index from site positions
    ///
    /// # Example
    ///
    /// ```
    /// use rust_voronoi_map::*;
    /// use glam::Vec2;
    ///
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// let sites = vec![
    ///     Vec2::new(1.0, 0.0),
    ///     Vec2::new(0.0, 1.0),
    ///     Vec2::new(-1.0, -1.0),
    /// ];
    ///
    /// let index = SpatialIndex::new(&sites);
    /// assert_eq!(index.find_nearest(Vec2::new(0.9, 0.2)), Some(0));
    /// # }
    /// ```
    pub fn new(sites: &[Vec2]) -> Self {
        Self::from_indexed(sites.iter().copied().enumerate())
    }

    /// Build an index over a subset of sites, each reported under its own index
    pub fn from_indexed(sites: impl IntoIterator<Item = (usize, Vec2)>) -> Self {
        let (items, points): (Vec<usize>, Vec<[f32; 2]>) =
            sites.into_iter().map(|(i, p)| (i, [p.x, p.y])).unzip();

        let tree = (!points.is_empty()).then(|| ImmutableKdTree::new_from_slice(&points));
        Self { tree, items }
    }

    /// Index of the site nearest to `position`, `None` for an empty index
    pub fn find_nearest(&self, position: Vec2) -> Option<usize> {
        let tree = self.tree.as_ref()?;
        let result = tree.nearest_one::<SquaredEuclidean>(&[position.x, position.y]);
        self.items.get(result.item as usize).copied()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
