//! Planar geometry primitives
//!
//! Orientation, in-circle and intersection tests shared by the hull builder,
//! the triangulator, the Voronoi clipper and the polygon tools.
//!
//! Orientation and in-circle signs come from Shewchuk's adaptive predicates
//! (`robust`), so they are exact for every `f32` input: cocircular and
//! collinear configurations are always recognised as such, whatever the order
//! of the points. Areas, centroids and intersections are evaluated in `f64`.

use glam::{DVec2, Vec2};
use robust::{incircle, orient2d, Coord};

/// Next corner index in counter-clockwise order (0 → 1 → 2 → 0)
#[inline]
pub fn ccw_next(i: usize) -> usize {
    const LOOKUP: [usize; 3] = [1, 2, 0];
    LOOKUP[i]
}

/// Next corner index in clockwise order (0 → 2 → 1 → 0)
#[inline]
pub fn cw_next(i: usize) -> usize {
    const LOOKUP: [usize; 3] = [2, 0, 1];
    LOOKUP[i]
}

#[inline]
fn widen(p: Vec2) -> DVec2 {
    DVec2::new(p.x as f64, p.y as f64)
}

#[inline]
fn coord(p: Vec2) -> Coord<f64> {
    Coord {
        x: p.x as f64,
        y: p.y as f64,
    }
}

/// Twice the signed area of `(p0, p1, p2)`, with an exact sign
#[inline]
pub(crate) fn orient(p0: Vec2, p1: Vec2, p2: Vec2) -> f64 {
    orient2d(coord(p0), coord(p1), coord(p2))
}

/// Signed area of the triangle `(p0, p1, p2)`
///
/// Positive for counter-clockwise winding, negative for clockwise and exactly
/// zero for collinear points.
#[inline]
pub fn signed_area(p0: Vec2, p1: Vec2, p2: Vec2) -> f32 {
    (0.5 * orient(p0, p1, p2)) as f32
}

/// Orientation test with collinear points counted as counter-clockwise
///
/// The inclusive tie-break is what lets point location accept sites lying
/// exactly on a face edge.
#[inline]
pub fn ccw(p0: Vec2, p1: Vec2, p2: Vec2) -> bool {
    orient(p0, p1, p2) >= 0.0
}

/// Returns `true` if `p3` lies strictly inside the circle through `p0, p1, p2`
///
/// The in-circle determinant is positive for an inside point only when the
/// triangle is counter-clockwise, so its sign is multiplied by the triangle's
/// orientation and the result does not depend on winding. Degenerate
/// triangles have no inside. Cocircular points are never inside.
pub fn in_circle(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> bool {
    let gamma = orient(p0, p1, p2);
    let delta = incircle(coord(p0), coord(p1), coord(p2), coord(p3));
    gamma * delta > 0.0
}

/// Parametric coordinates `(t, s)` where the lines `p0 + t(p1 - p0)` and
/// `q0 + s(q1 - q0)` meet, or `None` if they are parallel.
pub(crate) fn line_parameters(p0: Vec2, p1: Vec2, q0: Vec2, q1: Vec2) -> Option<(f32, f32)> {
    let n0 = widen(p1) - widen(p0);
    let n1 = widen(q1) - widen(q0);
    let us = n0.perp();
    let vs = n1.perp();
    let w = widen(p0) - widen(q0);
    let d = vs.dot(n0);
    if d == 0.0 {
        return None;
    }
    let t = -vs.dot(w) / d;
    let s = -us.dot(w) / d;
    Some((t as f32, s as f32))
}

/// Intersection point of segments `p0-p1` and `q0-q1`
///
/// Returns `Some` only when both parametric coordinates lie in `[0, 1]`.
/// Parallel segments never intersect. With `incl == false`, segments that
/// share an endpoint are reported as not intersecting.
pub fn segment_intersection(p0: Vec2, p1: Vec2, q0: Vec2, q1: Vec2, incl: bool) -> Option<Vec2> {
    if !incl && (p0 == q0 || p1 == q0 || p0 == q1 || p1 == q1) {
        return None;
    }
    let (t, s) = line_parameters(p0, p1, q0, q1)?;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&s) {
        Some(p0 + t * (p1 - p0))
    } else {
        None
    }
}

/// Index of the point that maximises `dot(point, direction)`
///
/// Ties keep the first point seen. Returns `None` for an empty slice.
pub fn support(points: &[Vec2], direction: Vec2) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, p) in points.iter().enumerate() {
        let d = direction.dot(*p);
        match best {
            Some((_, best_d)) if d <= best_d => {}
            _ => best = Some((i, d)),
        }
    }
    best.map(|(i, _)| i)
}

/// Signed area of a closed polygon (shoelace formula)
pub fn polygon_signed_area(polygon: &[Vec2]) -> f32 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0f64;
    for (i, p) in polygon.iter().enumerate() {
        let q = polygon[(i + 1) % polygon.len()];
        twice_area += widen(*p).perp_dot(widen(q));
    }
    (0.5 * twice_area) as f32
}

/// Area centroid of a closed polygon, `None` when the area vanishes
pub fn centroid(polygon: &[Vec2]) -> Option<Vec2> {
    if polygon.len() < 3 {
        return None;
    }
    let mut twice_area = 0.0f64;
    let mut sum = DVec2::ZERO;
    for (i, p) in polygon.iter().enumerate() {
        let a = widen(*p);
        let b = widen(polygon[(i + 1) % polygon.len()]);
        let cross = a.perp_dot(b);
        twice_area += cross;
        sum += (a + b) * cross;
    }
    if twice_area == 0.0 {
        return None;
    }
    let c = sum / (3.0 * twice_area);
    Some(Vec2::new(c.x as f32, c.y as f32))
}

/// Even-odd containment test; points on the boundary may go either way
pub fn point_in_polygon(point: Vec2, polygon: &[Vec2]) -> bool {
    let mut inside = false;
    let n = polygon.len();
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        if (a.y > point.y) != (b.y > point.y) {
            let x = a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if point.x < x {
                inside = !inside;
            }
        }
    }
    inside
}

/// Returns `true` if `p` lies strictly inside the triangle `(a, b, c)` of either winding
pub fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let d0 = orient(a, b, p);
    let d1 = orient(b, c, p);
    let d2 = orient(c, a, p);
    (d0 > 0.0 && d1 > 0.0 && d2 > 0.0) || (d0 < 0.0 && d1 < 0.0 && d2 < 0.0)
}

/// Axis-aligned rectangle centred on the origin
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn square(size: f32) -> Self {
        Self::new(size, size)
    }

    /// Corners in counter-clockwise order, starting bottom-left
    pub fn corners(&self) -> [Vec2; 4] {
        let h = Vec2::new(self.width, self.height) * 0.5;
        [
            Vec2::new(-h.x, -h.y),
            Vec2::new(h.x, -h.y),
            Vec2::new(h.x, h.y),
            Vec2::new(-h.x, h.y),
        ]
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x.abs() <= self.width * 0.5 && p.y.abs() <= self.height * 0.5
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_cycles() {
        for i in 0..3 {
            assert_eq!(cw_next(ccw_next(i)), i);
            assert_eq!(ccw_next(ccw_next(ccw_next(i))), i);
        }
        assert_eq!(ccw_next(2), 0);
        assert_eq!(cw_next(0), 2);
    }

    #[test]
    fn test_signed_area_and_ccw() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(2.0, 0.0);
        let c = Vec2::new(0.0, 2.0);
        assert_eq!(signed_area(a, b, c), 2.0);
        assert_eq!(signed_area(a, c, b), -2.0);
        assert!(ccw(a, b, c));
        assert!(!ccw(a, c, b));

        // Collinear counts as counter-clockwise
        let m = Vec2::new(1.0, 0.0);
        assert_eq!(signed_area(a, m, b), 0.0);
        assert!(ccw(a, m, b));
        assert!(ccw(b, m, a));
    }

    #[test]
    fn test_in_circle() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(4.0, 0.0);
        let c = Vec2::new(4.0, 4.0);

        assert!(in_circle(a, b, c, Vec2::new(2.0, 1.0)));
        assert!(in_circle(a, b, c, Vec2::new(1.0, 3.0)));
        assert!(!in_circle(a, b, c, Vec2::new(10.0, 10.0)));

        // Winding does not matter
        assert!(in_circle(a, c, b, Vec2::new(2.0, 1.0)));
        assert!(!in_circle(a, c, b, Vec2::new(-3.0, 2.0)));

        // Cocircular point is not strictly inside
        assert!(!in_circle(a, b, c, Vec2::new(0.0, 4.0)));
    }

    #[test]
    fn test_in_circle_cocircular_is_order_independent() {
        // Symmetric trapezoid from a 0.1 grid; d lies exactly on the circle
        // through a, b, c once the decimals are rounded to f32
        let a = Vec2::new(f32::from_bits(0x3f999993), f32::from_bits(0x3ecccccd));
        let b = Vec2::new(f32::from_bits(0x3f8cccd0), f32::from_bits(0x3ecccccd));
        let c = Vec2::new(f32::from_bits(0x3f8cccc8), f32::from_bits(0x3e99999a));
        let d = Vec2::new(f32::from_bits(0x3f99999b), f32::from_bits(0x3e99999a));

        for [p0, p1, p2] in [[a, b, c], [b, c, a], [c, a, b], [a, c, b], [c, b, a], [b, a, c]] {
            assert!(!in_circle(p0, p1, p2, d));
        }
        for [p0, p1, p2] in [[a, b, d], [b, d, a], [d, a, b]] {
            assert!(!in_circle(p0, p1, p2, c));
        }
    }

    #[test]
    fn test_degenerate_triangle_has_no_inside() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(1.0, 0.0);
        let c = Vec2::new(2.0, 0.0);
        assert!(!in_circle(a, b, c, Vec2::new(1.0, 0.5)));
        assert!(!in_circle(a, b, c, Vec2::new(1.0, 0.0)));
    }

    #[test]
    fn test_segment_intersection() {
        let hit = segment_intersection(
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 2.0),
            Vec2::new(2.0, 0.0),
            false,
        );
        assert_eq!(hit, Some(Vec2::new(1.0, 1.0)));

        // Lines meet outside the segments
        let miss = segment_intersection(
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(2.0, -1.0),
            Vec2::new(2.0, 1.0),
            true,
        );
        assert_eq!(miss, None);

        // Parallel
        let parallel = segment_intersection(
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
            true,
        );
        assert_eq!(parallel, None);
    }

    #[test]
    fn test_segment_intersection_shared_endpoint() {
        let p0 = Vec2::new(0.0, 0.0);
        let p1 = Vec2::new(1.0, 0.0);
        let q1 = Vec2::new(1.0, 1.0);
        assert_eq!(segment_intersection(p0, p1, p1, q1, false), None);
        assert_eq!(segment_intersection(p0, p1, p1, q1, true), Some(p1));
    }

    #[test]
    fn test_support_first_seen_tie() {
        let points = [
            Vec2::new(1.0, 0.0),
            Vec2::new(3.0, 1.0),
            Vec2::new(3.0, -1.0),
            Vec2::new(-2.0, 0.0),
        ];
        assert_eq!(support(&points, Vec2::X), Some(1));
        assert_eq!(support(&points, -Vec2::X), Some(3));
        assert_eq!(support(&[], Vec2::X), None);
    }

    #[test]
    fn test_polygon_area_and_centroid() {
        let square = [
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        assert_eq!(polygon_signed_area(&square), 4.0);
        let mut reversed = square;
        reversed.reverse();
        assert_eq!(polygon_signed_area(&reversed), -4.0);
        assert_eq!(centroid(&square), Some(Vec2::new(1.0, 1.0)));
        assert_eq!(centroid(&square[..2]), None);
    }

    #[test]
    fn test_containment() {
        let square = [
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        assert!(point_in_polygon(Vec2::new(1.0, 1.0), &square));
        assert!(!point_in_polygon(Vec2::new(3.0, 1.0), &square));

        let (a, b, c) = (square[0], square[1], square[2]);
        assert!(point_in_triangle(Vec2::new(1.5, 0.5), a, b, c));
        assert!(point_in_triangle(Vec2::new(1.5, 0.5), a, c, b));
        assert!(!point_in_triangle(Vec2::new(1.0, 0.0), a, b, c));
    }

    #[test]
    fn test_rect_corners() {
        let rect = Rect::new(4.0, 2.0);
        let corners = rect.corners();
        assert_eq!(corners[0], Vec2::new(-2.0, -1.0));
        assert_eq!(corners[2], Vec2::new(2.0, 1.0));
        assert_eq!(polygon_signed_area(&corners), rect.area());
        assert!(rect.contains(Vec2::new(1.5, -0.5)));
        assert!(!rect.contains(Vec2::new(0.0, 1.5)));
    }
}
