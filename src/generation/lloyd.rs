//! Lloyd's Relaxation for uniform point distribution
//!
//! Lloyd's Relaxation iteratively improves the uniformity of the sites by
//! moving each site to the area centroid of its clipped Voronoi cell.

use std::time::Instant;

use glam::Vec2;

use crate::error::Result;
use crate::generation::voronoi::{VoronoiDiagram, VoronoiOptions};
use crate::geometry::centroid;

/// Options for Lloyd's relaxation algorithm
#[derive(Debug, Clone, Copy)]
pub struct LloydOptions {
    /// Maximum number of iterations to run
    pub max_iterations: usize,
    /// Convergence threshold - stop when max displacement < this value
    /// (as a fraction of the larger side of the bounds).
    /// Set to 0.0 to disable early termination
    pub convergence_threshold: f32,
}

impl Default for LloydOptions {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            // For the default 7.5 map this stops once no site moves more
            // than 0.075 units
            convergence_threshold: 0.01,
        }
    }
}

/// Apply Lloyd's Relaxation to improve point distribution uniformity
///
/// # Algorithm
///
/// For each iteration:
/// 1. Triangulate the current sites and build their bounded Voronoi cells
/// 2. Move every site to the area centroid of its cell
///
/// Sites whose cell is empty (skipped or outside the bounds) stay in place.
///
/// # Errors
///
/// Returns `DegenerateGeometry` if the sites cannot be triangulated.
pub fn lloyd_relaxation(
    points: Vec<Vec2>,
    voronoi: &VoronoiOptions,
    iterations: usize,
) -> Result<Vec<Vec2>> {
    let options = LloydOptions {
        max_iterations: iterations,
        ..Default::default()
    };
    lloyd_relaxation_with_options(points, voronoi, options)
}

/// Apply Lloyd's Relaxation with custom options
pub fn lloyd_relaxation_with_options(
    mut points: Vec<Vec2>,
    voronoi: &VoronoiOptions,
    options: LloydOptions,
) -> Result<Vec<Vec2>> {
    let extent = voronoi.bounds.width.max(voronoi.bounds.height);
    let convergence_threshold = options.convergence_threshold * extent;
    let total_start = Instant::now();

    log::debug!(
        "lloyd: {} points, max {} iterations, threshold {:.4} (abs: {:.4})",
        points.len(),
        options.max_iterations,
        options.convergence_threshold,
        convergence_threshold
    );

    let mut iterations_run = 0;
    let mut converged = false;

    for iteration in 0..options.max_iterations {
        let iter_start = Instant::now();
        let diagram = VoronoiDiagram::from_sites(&points, *voronoi)?;
        let (new_points, max_displacement) = compute_new_points(&points, &diagram);

        points = new_points;
        iterations_run = iteration + 1;

        log::debug!(
            "lloyd iteration {}: {:?}, max displacement {:.4}",
            iterations_run,
            iter_start.elapsed(),
            max_displacement
        );

        if convergence_threshold > 0.0 && max_displacement < convergence_threshold {
            converged = true;
            break;
        }
    }

    log::debug!(
        "lloyd finished: {} iterations (of max {}), converged={}, total={:?}",
        iterations_run,
        options.max_iterations,
        converged,
        total_start.elapsed()
    );

    Ok(points)
}

/// Compute new site positions and track maximum displacement
fn compute_new_points(points: &[Vec2], diagram: &VoronoiDiagram) -> (Vec<Vec2>, f32) {
    let mut max_displacement: f32 = 0.0;

    let new_points = points
        .iter()
        .enumerate()
        .map(|(index, &old)| {
            let new_point = diagram
                .cell(index)
                .and_then(|cell| centroid(&cell.polygon))
                .unwrap_or(old);
            max_displacement = max_displacement.max(new_point.distance(old));
            new_point
        })
        .collect();

    (new_points, max_displacement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::points::generate_uniform_points;
    use crate::geometry::Rect;

    fn bounds_10() -> VoronoiOptions {
        VoronoiOptions::new(Rect::square(10.0)).with_inset(0.0)
    }

    #[test]
    fn test_lloyd_relaxation_stays_in_bounds() {
        let points = generate_uniform_points(100, 10.0, 42);
        let relaxed = lloyd_relaxation(points, &bounds_10(), 3).unwrap();

        assert_eq!(relaxed.len(), 100);
        assert!(relaxed.iter().all(|p| p.x.abs() <= 5.0 && p.y.abs() <= 5.0));
    }

    #[test]
    fn test_lloyd_relaxation_determinism() {
        let points = generate_uniform_points(50, 10.0, 12345);

        let relaxed1 = lloyd_relaxation(points.clone(), &bounds_10(), 2).unwrap();
        let relaxed2 = lloyd_relaxation(points, &bounds_10(), 2).unwrap();

        assert_eq!(relaxed1, relaxed2);
    }

    #[test]
    fn test_lloyd_moves_sites_to_centroids() {
        // Four symmetric sites own one quadrant each of the 4x4 box
        let points = vec![
            Vec2::new(-0.5, -0.5),
            Vec2::new(0.5, -0.5),
            Vec2::new(0.5, 0.5),
            Vec2::new(-0.5, 0.5),
        ];
        let voronoi = VoronoiOptions::new(Rect::square(4.0)).with_inset(0.0);
        let relaxed = lloyd_relaxation(points.clone(), &voronoi, 1).unwrap();

        for (old, new) in points.iter().zip(&relaxed) {
            let expected = *old * 2.0;
            assert!(
                new.distance(expected) < 1e-4,
                "Site {:?} moved to {:?}, expected {:?}",
                old,
                new,
                expected
            );
        }
    }

    #[test]
    fn test_lloyd_options_default() {
        let options = LloydOptions::default();
        assert_eq!(options.max_iterations, 5);
        assert!((options.convergence_threshold - 0.01).abs() < 0.001);
    }

    #[test]
    fn test_lloyd_no_convergence_threshold() {
        let points = generate_uniform_points(50, 10.0, 42);
        let options = LloydOptions {
            max_iterations: 3,
            convergence_threshold: 0.0,
        };
        let relaxed = lloyd_relaxation_with_options(points, &bounds_10(), options).unwrap();

        assert_eq!(relaxed.len(), 50);
    }

    #[test]
    fn test_lloyd_rejects_degenerate_sites() {
        let points = vec![Vec2::ZERO, Vec2::X, Vec2::new(2.0, 0.0)];
        assert!(lloyd_relaxation(points, &bounds_10(), 1).is_err());
    }
}
