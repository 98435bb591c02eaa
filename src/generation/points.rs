//! Site generation and smoothing
//!
//! Sites are scattered uniformly over an origin-centred square and then
//! pushed apart by a short-range repulsion so no two cells are tiny slivers.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Options for the repulsion smoothing pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepelOptions {
    /// Number of passes
    pub iterations: usize,
    /// Points further apart than this do not interact
    pub radius: f32,
    /// Push per pass is `strength / distance`
    pub strength: f32,
}

impl Default for RepelOptions {
    fn default() -> Self {
        Self {
            iterations: 10,
            radius: 1.0,
            strength: 0.01,
        }
    }
}

/// Generate `count` points uniformly distributed in a `size` × `size` square
/// centred on the origin
///
/// # Example
///
/// ```rust
/// use rust_voronoi_map::generation::generate_uniform_points;
///
/// let points = generate_uniform_points(100, 7.5, 42);
/// assert_eq!(points.len(), 100);
/// assert!(points.iter().all(|p| p.x.abs() <= 3.75 && p.y.abs() <= 3.75));
/// ```
pub fn generate_uniform_points(count: usize, size: f32, seed: u32) -> Vec<Vec2> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed as u64);
    let half = size * 0.5;
    (0..count)
        .map(|_| Vec2::new(rng.gen_range(-half..half), rng.gen_range(-half..half)))
        .collect()
}

/// Push points away from close neighbours
///
/// Every pass reads the positions of the previous pass, so the result does
/// not depend on point order. Coincident points exert no force on each other.
/// Points near the edge of a point set drift outwards; they are not clamped.
pub fn repel_points(mut points: Vec<Vec2>, options: &RepelOptions) -> Vec<Vec2> {
    for _ in 0..options.iterations {
        points = repel_pass(&points, options);
    }
    points
}

fn repel_pass(points: &[Vec2], options: &RepelOptions) -> Vec<Vec2> {
    points
        .iter()
        .enumerate()
        .map(|(i, &old)| {
            let mut moved = old;
            for (j, &other) in points.iter().enumerate() {
                if i == j {
                    continue;
                }
                let diff = other - old;
                let len = diff.length();
                if len > 0.0 && len < options.radius {
                    moved -= options.strength / len * (diff / len);
                }
            }
            moved
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn min_distance(points: &[Vec2]) -> f32 {
        let mut best = f32::MAX;
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                best = best.min(points[i].distance(points[j]));
            }
        }
        best
    }

    #[test]
    fn test_uniform_points_determinism() {
        let a = generate_uniform_points(50, 7.5, 1234);
        let b = generate_uniform_points(50, 7.5, 1234);
        let c = generate_uniform_points(50, 7.5, 4321);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_uniform_points_in_square() {
        let points = generate_uniform_points(500, 4.0, 7);
        assert!(points.iter().all(|p| p.x.abs() <= 2.0 && p.y.abs() <= 2.0));
    }

    #[test]
    fn test_repel_pushes_pair_apart() {
        let points = vec![Vec2::new(-0.25, 0.0), Vec2::new(0.25, 0.0)];
        let options = RepelOptions {
            iterations: 1,
            ..RepelOptions::default()
        };
        let moved = repel_points(points, &options);

        // Each point moves strength / distance = 0.02 away from the other
        assert!((moved[0].x - -0.27).abs() < 1e-6);
        assert!((moved[1].x - 0.27).abs() < 1e-6);
        assert_eq!(moved[0].y, 0.0);
    }

    #[test]
    fn test_repel_ignores_distant_and_coincident_points() {
        let points = vec![Vec2::new(0.0, 0.0), Vec2::new(5.0, 0.0), Vec2::new(5.0, 0.0)];
        let moved = repel_points(points.clone(), &RepelOptions::default());
        assert_eq!(moved, points);
    }

    #[test]
    fn test_repel_spreads_points() {
        let points = generate_uniform_points(200, 7.5, 42);
        let before = min_distance(&points);
        let after = repel_points(points, &RepelOptions::default());

        assert!(min_distance(&after) > before);
    }
}
