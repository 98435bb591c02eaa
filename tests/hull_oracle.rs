//! Gift-wrapping hull cross-checked against parry2d

use parry2d::math::Point;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rust_voronoi_map::geometry::signed_area;
use rust_voronoi_map::*;

fn key(p: Vec2) -> (u32, u32) {
    (p.x.to_bits(), p.y.to_bits())
}

fn oracle_hull(points: &[Vec2]) -> Vec<(u32, u32)> {
    let parry_points: Vec<Point<f32>> = points.iter().map(|p| Point::new(p.x, p.y)).collect();
    let mut hull: Vec<(u32, u32)> = parry2d::transformation::convex_hull(&parry_points)
        .iter()
        .map(|p| key(Vec2::new(p.x, p.y)))
        .collect();
    hull.sort_unstable();
    hull
}

#[test]
fn test_hull_matches_parry() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);

    for count in [3, 10, 50, 200, 1000] {
        for _ in 0..5 {
            let points: Vec<Vec2> = (0..count)
                .map(|_| Vec2::new(rng.gen_range(-100.0..100.0), rng.gen_range(-100.0..100.0)))
                .collect();

            let hull = convex_hull(&points);
            let mut ours: Vec<(u32, u32)> = hull.iter().map(|&i| key(points[i])).collect();
            ours.sort_unstable();

            assert_eq!(ours, oracle_hull(&points), "Hull of {} points differs", count);

            for i in 0..hull.len() {
                let a = points[hull[i]];
                let b = points[hull[(i + 1) % hull.len()]];
                let c = points[hull[(i + 2) % hull.len()]];
                assert!(signed_area(a, b, c) > 0.0, "Hull is not strictly convex CCW");
            }
        }
    }
}

#[test]
fn test_hull_of_disc_points() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let points: Vec<Vec2> = (0..500)
        .map(|_| {
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            let radius = rng.gen_range(0.0f32..1.0).sqrt();
            radius * Vec2::new(angle.cos(), angle.sin())
        })
        .collect();

    let mut ours: Vec<(u32, u32)> = convex_hull(&points).iter().map(|&i| key(points[i])).collect();
    ours.sort_unstable();
    assert_eq!(ours, oracle_hull(&points));
}
