//! Gift-wrapping convex hull
//!
//! Seeds the triangulation: the hull polygon is fanned into the initial faces
//! and every remaining site is inserted into it.

use glam::Vec2;

use crate::geometry::support;

/// Compute the convex hull of `points` as indices in counter-clockwise order
///
/// Starts from the extreme points along the x axis and repeatedly pushes the
/// support point in the outward normal direction of each hull edge between its
/// endpoints. A support point is only inserted when it lies strictly outside
/// the edge, so every hull vertex is a true corner and the loop terminates for
/// any input.
///
/// Degenerate inputs return fewer than three indices: two for collinear
/// points, one when all points coincide and none for an empty slice.
///
/// # Example
///
/// ```
/// use glam::Vec2;
/// use rust_voronoi_map::convex_hull;
///
/// let points = [
///     Vec2::new(0.0, 0.0),
///     Vec2::new(1.0, 0.2),
///     Vec2::new(2.0, 0.0),
///     Vec2::new(1.0, 2.0),
/// ];
/// assert_eq!(convex_hull(&points), vec![0, 2, 3]);
/// ```
pub fn convex_hull(points: &[Vec2]) -> Vec<usize> {
    let Some(start) = initial_edge(points) else {
        return Vec::new();
    };
    if start.0 == start.1 {
        return vec![start.0];
    }

    let mut hull = vec![start.0, start.1];
    let mut i0 = 0;
    while i0 < hull.len() {
        let i1 = if i0 + 1 < hull.len() { i0 + 1 } else { 0 };
        let a = points[hull[i0]];
        let b = points[hull[i1]];
        let n = (b - a).normalize_or_zero();
        let direction = Vec2::new(n.y, -n.x);

        match support(points, direction) {
            Some(s) if s != hull[i0] && s != hull[i1] && direction.dot(points[s]) > direction.dot(a) => {
                hull.insert(i0 + 1, s);
            }
            _ => i0 += 1,
        }
    }
    hull
}

/// Two distinct extreme points to wrap from, preferring the x axis
fn initial_edge(points: &[Vec2]) -> Option<(usize, usize)> {
    let left = support(points, Vec2::NEG_X)?;
    let right = support(points, Vec2::X)?;
    if points[left] != points[right] {
        return Some((left, right));
    }
    // All points share one x coordinate
    let bottom = support(points, Vec2::NEG_Y)?;
    let top = support(points, Vec2::Y)?;
    if points[bottom] != points[top] {
        Some((top, bottom))
    } else {
        Some((left, left))
    }
}
