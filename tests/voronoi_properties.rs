//! Voronoi cells: duality with the triangulation, convexity and coverage

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rust_voronoi_map::geometry::{polygon_signed_area, signed_area};
use rust_voronoi_map::*;

fn random_sites(seed: u64, count: usize, size: f32) -> Vec<Vec2> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let half = size * 0.5;
    (0..count)
        .map(|_| Vec2::new(rng.gen_range(-half..half), rng.gen_range(-half..half)))
        .collect()
}

#[test]
fn test_neighbors_are_delaunay_edges() {
    let sites = random_sites(1, 150, 10.0);
    let triangulation = Triangulation::new(&sites).unwrap();
    let diagram = VoronoiDiagram::new(&triangulation, VoronoiOptions::new(Rect::square(10.0)));

    let mut from_cells = std::collections::BTreeSet::new();
    for cell in diagram.cells() {
        for &n in &cell.neighbors {
            assert!(diagram.are_neighbors(n, cell.site), "{} -> {} is one-way", cell.site, n);
            from_cells.insert((cell.site.min(n), cell.site.max(n)));
        }
    }
    assert_eq!(from_cells, triangulation.edges());
}

#[test]
fn test_cells_are_convex_and_own_their_site() {
    let sites = random_sites(2, 120, 8.0);
    let options = VoronoiOptions::new(Rect::square(8.0)).with_inset(0.0);
    let diagram = VoronoiDiagram::from_sites(&sites, options).unwrap();

    for cell in diagram.cells() {
        let n = cell.polygon.len();
        assert!(n >= 3, "Cell {} is empty", cell.site);
        for i in 0..n {
            let turn = signed_area(cell.polygon[i], cell.polygon[(i + 1) % n], cell.polygon[(i + 2) % n]);
            assert!(turn > -1e-6, "Cell {} is not convex", cell.site);
        }
        assert!(cell.contains(cell.position), "Cell {} misses its site", cell.site);
    }
}

#[test]
fn test_cells_tile_the_bounds() {
    let bounds = Rect::new(12.0, 6.0);
    let sites = random_sites(3, 80, 6.0);
    let diagram = VoronoiDiagram::from_sites(&sites, VoronoiOptions::new(bounds).with_inset(0.0)).unwrap();

    let total: f32 = diagram.cells().iter().map(|c| polygon_signed_area(&c.polygon)).sum();
    assert!(
        (total - bounds.area()).abs() < 1e-3 * bounds.area(),
        "Cells cover {} of {}",
        total,
        bounds.area()
    );
}

#[test]
fn test_inset_shrinks_cells() {
    let sites = random_sites(4, 60, 10.0);
    let bounds = Rect::square(10.0);
    let exact = VoronoiDiagram::from_sites(&sites, VoronoiOptions::new(bounds).with_inset(0.0)).unwrap();
    let inset = VoronoiDiagram::from_sites(&sites, VoronoiOptions::new(bounds).with_inset(0.05)).unwrap();

    for (a, b) in exact.cells().iter().zip(inset.cells()) {
        assert!(b.area() < a.area(), "Inset did not shrink cell {}", a.site);
    }
}

#[test]
fn test_nearest_site_owns_the_point() {
    let sites = random_sites(5, 100, 10.0);
    let diagram =
        VoronoiDiagram::from_sites(&sites, VoronoiOptions::new(Rect::square(10.0)).with_inset(0.0)).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(55);

    for _ in 0..200 {
        let probe = Vec2::new(rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0));
        let nearest = (0..sites.len())
            .min_by(|&a, &b| sites[a].distance_squared(probe).total_cmp(&sites[b].distance_squared(probe)))
            .unwrap();
        let second = (0..sites.len())
            .filter(|&i| i != nearest)
            .map(|i| sites[i].distance(probe))
            .fold(f32::MAX, f32::min);

        // Points right on a bisector may land in either cell
        if second - sites[nearest].distance(probe) > 1e-3 {
            assert!(diagram.cells()[nearest].contains(probe));
        }
    }
}

#[cfg(feature = "spatial-index")]
#[test]
fn test_spatial_index_agrees_with_cells() {
    let sites = random_sites(6, 100, 10.0);
    let index = SpatialIndex::new(&sites);
    let diagram =
        VoronoiDiagram::from_sites(&sites, VoronoiOptions::new(Rect::square(10.0)).with_inset(0.0)).unwrap();

    for cell in diagram.cells() {
        let centroid = geometry::centroid(&cell.polygon).unwrap();
        assert_eq!(index.find_nearest(centroid), Some(cell.site));
    }
}
