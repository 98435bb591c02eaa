//! Polygon triangulation and difference
//!
//! Used to build the decorative shapes: simple polygons are ear-clipped, and
//! shapes with cut-outs are represented as an outer loop plus holes. Holes are
//! bridged into the outer loop before clipping.
//!
//! Outer loops are stored counter-clockwise and holes clockwise.

use std::collections::HashMap;

use glam::Vec2;

use crate::error::{Result, VoronoiError};
use crate::geometry::{
    line_parameters, orient, point_in_polygon, point_in_triangle, polygon_signed_area,
    segment_intersection, signed_area,
};

/// Drop consecutive duplicate vertices, including a repeated first vertex
fn dedup_ring(polygon: &[Vec2]) -> Vec<Vec2> {
    let mut ring: Vec<Vec2> = Vec::with_capacity(polygon.len());
    for &p in polygon {
        if ring.last() != Some(&p) {
            ring.push(p);
        }
    }
    while ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    ring
}

fn counter_clockwise(polygon: &[Vec2]) -> Vec<Vec2> {
    let mut ring = dedup_ring(polygon);
    if polygon_signed_area(&ring) < 0.0 {
        ring.reverse();
    }
    ring
}

fn clockwise(polygon: &[Vec2]) -> Vec<Vec2> {
    let mut ring = counter_clockwise(polygon);
    ring.reverse();
    ring
}

fn edges(ring: &[Vec2]) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
    (0..ring.len()).map(move |i| (ring[i], ring[(i + 1) % ring.len()]))
}

/// `true` if any edge of `a` intersects any edge of `b`
fn outlines_cross(a: &[Vec2], b: &[Vec2]) -> bool {
    edges(a).any(|(p0, p1)| edges(b).any(|(q0, q1)| segment_intersection(p0, p1, q0, q1, true).is_some()))
}

/// Triangulate a simple polygon by ear clipping
///
/// The polygon may be given in either winding; the triangles are always
/// counter-clockwise and their areas sum to the polygon's area. Collinear
/// vertices are dropped when no ear is left. Fully degenerate input yields no
/// triangles.
///
/// # Errors
///
/// Returns `DegenerateGeometry` if no ear can be found, which only happens for
/// self-intersecting input.
///
/// # Example
///
/// ```
/// use glam::Vec2;
/// use rust_voronoi_map::polygon::triangulate;
///
/// let square = [
///     Vec2::new(0.0, 0.0),
///     Vec2::new(2.0, 0.0),
///     Vec2::new(2.0, 2.0),
///     Vec2::new(0.0, 2.0),
/// ];
/// assert_eq!(triangulate(&square).unwrap().len(), 2);
/// ```
pub fn triangulate(polygon: &[Vec2]) -> Result<Vec<[Vec2; 3]>> {
    ear_clip(counter_clockwise(polygon))
}

fn ear_clip(mut ring: Vec<Vec2>) -> Result<Vec<[Vec2; 3]>> {
    if ring.len() < 3 {
        return Ok(Vec::new());
    }
    let mut triangles = Vec::with_capacity(ring.len() - 2);

    while ring.len() > 3 {
        let len = ring.len();
        if let Some(i0) = (0..len).find(|&i| is_ear(&ring, i)) {
            let i1 = (i0 + 1) % len;
            let i2 = (i1 + 1) % len;
            triangles.push([ring[i0], ring[i1], ring[i2]]);
            ring.remove(i1);
            continue;
        }

        let collinear = (0..len).find(|&i| {
            signed_area(ring[(i + len - 1) % len], ring[i], ring[(i + 1) % len]) == 0.0
        });
        match collinear {
            Some(i) => {
                ring.remove(i);
            }
            None => {
                return Err(VoronoiError::DegenerateGeometry(format!(
                    "no ear among {} remaining vertices",
                    len
                )))
            }
        }
    }

    if signed_area(ring[0], ring[1], ring[2]) > 0.0 {
        triangles.push([ring[0], ring[1], ring[2]]);
    }
    Ok(triangles)
}

/// The corner at `i0 + 1` is an ear: convex, its diagonal crosses no edge and
/// no other vertex lies strictly inside it
fn is_ear(ring: &[Vec2], i0: usize) -> bool {
    let len = ring.len();
    let i1 = (i0 + 1) % len;
    let i2 = (i1 + 1) % len;
    let (a, b, c) = (ring[i0], ring[i1], ring[i2]);

    if signed_area(a, b, c) <= 0.0 {
        return false;
    }
    if edges(ring).any(|(e0, e1)| segment_intersection(a, c, e0, e1, false).is_some()) {
        return false;
    }
    !(0..len)
        .filter(|&k| k != i0 && k != i1 && k != i2)
        .any(|k| point_in_triangle(ring[k], a, b, c))
}

/// A polygon with an outer loop and any number of holes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolygonWithHoles {
    /// Outer boundary, counter-clockwise
    pub outer: Vec<Vec2>,
    /// Holes, each clockwise
    pub holes: Vec<Vec<Vec2>>,
}

impl PolygonWithHoles {
    /// A polygon without holes; the outline is reoriented counter-clockwise
    pub fn new(outer: &[Vec2]) -> Self {
        Self {
            outer: counter_clockwise(outer),
            holes: Vec::new(),
        }
    }

    /// A polygon with holes; outline and holes are reoriented as needed
    pub fn with_holes(outer: &[Vec2], holes: &[Vec<Vec2>]) -> Self {
        Self {
            outer: counter_clockwise(outer),
            holes: holes.iter().map(|h| clockwise(h)).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.outer.len() < 3
    }

    /// Area of the outer loop minus the area of the holes
    pub fn area(&self) -> f32 {
        let holes: f32 = self.holes.iter().map(|h| polygon_signed_area(h).abs()).sum();
        polygon_signed_area(&self.outer).abs() - holes
    }

    /// Inside the outer loop and outside every hole
    pub fn contains(&self, point: Vec2) -> bool {
        point_in_polygon(point, &self.outer)
            && !self.holes.iter().any(|h| point_in_polygon(point, h))
    }

    /// Splice every hole into the outer loop along a bridge edge
    ///
    /// Holes are processed rightmost first. Each is connected from its
    /// rightmost vertex to the nearest loop vertex that can be reached without
    /// crossing any edge, producing a single weakly simple loop in which the
    /// bridge appears twice.
    ///
    /// # Errors
    ///
    /// Returns `DegenerateGeometry` if a hole has no visible loop vertex.
    pub fn bridged(&self) -> Result<Vec<Vec2>> {
        let mut ring = self.outer.clone();
        let mut holes: Vec<Vec<Vec2>> = self
            .holes
            .iter()
            .map(|h| clockwise(h))
            .filter(|h| h.len() >= 3)
            .collect();
        holes.sort_by(|a, b| max_x(b).total_cmp(&max_x(a)));

        for (n, hole) in holes.iter().enumerate() {
            let m = rightmost(hole);
            let anchor = hole[m];
            let pending = &holes[n + 1..];

            let mut candidates: Vec<usize> = (0..ring.len()).collect();
            candidates.sort_by(|&i, &j| {
                ring[i]
                    .distance_squared(anchor)
                    .total_cmp(&ring[j].distance_squared(anchor))
            });
            let bridge = candidates
                .into_iter()
                .find(|&i| {
                    let v = ring[i];
                    v != anchor
                        && std::iter::once(ring.as_slice())
                            .chain(std::iter::once(hole.as_slice()))
                            .chain(pending.iter().map(Vec::as_slice))
                            .all(|boundary| {
                                !edges(boundary).any(|(e0, e1)| {
                                    segment_intersection(v, anchor, e0, e1, false).is_some()
                                })
                            })
                })
                .ok_or_else(|| {
                    VoronoiError::DegenerateGeometry("hole cannot be bridged to the outline".into())
                })?;

            let mut spliced = Vec::with_capacity(ring.len() + hole.len() + 2);
            spliced.extend_from_slice(&ring[..=bridge]);
            spliced.extend(hole[m..].iter().chain(hole[..=m].iter()).copied());
            spliced.extend_from_slice(&ring[bridge..]);
            ring = spliced;
        }
        Ok(ring)
    }

    /// Triangulate the polygon, holes excluded
    pub fn triangulate(&self) -> Result<Vec<[Vec2; 3]>> {
        if self.is_empty() {
            return Ok(Vec::new());
        }
        ear_clip(self.bridged()?)
    }

    /// Subtract the simple polygon `b`
    ///
    /// Existing holes are kept in whichever piece contains them, and dropped
    /// when `b` covers them.
    ///
    /// # Errors
    ///
    /// Returns `DegenerateGeometry` if `b` crosses or touches an existing hole.
    pub fn cut(&self, b: &[Vec2]) -> Result<Vec<PolygonWithHoles>> {
        let b = counter_clockwise(b);
        if b.len() < 3 || self.is_empty() {
            return Ok(vec![self.clone()]);
        }
        if self.holes.iter().any(|h| outlines_cross(h, &b)) {
            return Err(VoronoiError::DegenerateGeometry(
                "cut outline crosses an existing hole".into(),
            ));
        }
        if self.holes.iter().any(|h| point_in_polygon(b[0], h)) {
            return Ok(vec![self.clone()]);
        }

        let mut pieces = cut_outline(&self.outer, &b)?;
        for hole in &self.holes {
            if point_in_polygon(hole[0], &b) {
                continue;
            }
            if let Some(piece) = pieces
                .iter_mut()
                .find(|p| point_in_polygon(hole[0], &p.outer))
            {
                piece.holes.push(hole.clone());
            }
        }
        Ok(pieces)
    }
}

fn max_x(ring: &[Vec2]) -> f32 {
    ring.iter().map(|p| p.x).fold(f32::MIN, f32::max)
}

fn rightmost(ring: &[Vec2]) -> usize {
    let mut best = 0;
    for (i, p) in ring.iter().enumerate() {
        if p.x > ring[best].x || (p.x == ring[best].x && p.y < ring[best].y) {
            best = i;
        }
    }
    best
}

/// Subtract polygon `b` from polygon `a`
///
/// - `b` strictly inside `a`: one polygon with `b` as a hole
/// - `a` inside `b`: nothing is left
/// - disjoint outlines: `a` unchanged
/// - meeting outlines: both outlines are split wherever they cross or touch,
///   the parts of `a` outside `b` and the parts of `b` inside `a` are linked
///   into loops, yielding zero or more pieces. Edges shared by both outlines
///   are removed when `b` lies on the same side as `a`. `cut(a, a)` is empty.
///
/// # Example
///
/// ```
/// use glam::Vec2;
/// use rust_voronoi_map::polygon::cut;
///
/// let square = |c: Vec2, h: f32| {
///     vec![
///         c + Vec2::new(-h, -h),
///         c + Vec2::new(h, -h),
///         c + Vec2::new(h, h),
///         c + Vec2::new(-h, h),
///     ]
/// };
/// let pieces = cut(&square(Vec2::ZERO, 2.0), &square(Vec2::ZERO, 1.0)).unwrap();
/// assert_eq!(pieces.len(), 1);
/// assert_eq!(pieces[0].holes.len(), 1);
/// assert_eq!(pieces[0].area(), 12.0);
/// ```
pub fn cut(a: &[Vec2], b: &[Vec2]) -> Result<Vec<PolygonWithHoles>> {
    PolygonWithHoles::new(a).cut(b)
}

/// Split points along each edge of a ring, as `(parameter, point)`
type Splits = Vec<Vec<(f32, Vec2)>>;

/// `p` lies on the closed segment `s0-s1`
fn on_segment(p: Vec2, s0: Vec2, s1: Vec2) -> bool {
    orient(s0, s1, p) == 0.0 && p.cmpge(s0.min(s1)).all() && p.cmple(s0.max(s1)).all()
}

fn parameter(p: Vec2, s0: Vec2, s1: Vec2) -> f32 {
    let d = s1 - s0;
    (p - s0).dot(d) / d.length_squared()
}

/// The segments cross at a point interior to both
fn crosses_properly(p0: Vec2, p1: Vec2, q0: Vec2, q1: Vec2) -> bool {
    let straddles = |a: f64, b: f64| (a > 0.0 && b < 0.0) || (a < 0.0 && b > 0.0);
    straddles(orient(p0, p1, q0), orient(p0, p1, q1))
        && straddles(orient(q0, q1, p0), orient(q0, q1, p1))
}

/// Every point where the outlines meet, recorded on the edges of both
///
/// Proper crossings get one computed point shared by both outlines. A vertex
/// lying on an edge of the other outline (touching corners, collinear
/// overlaps) splits that edge at the vertex itself. Returns `None` when the
/// outlines do not meet at all.
fn find_contacts(a: &[Vec2], b: &[Vec2]) -> Option<(Splits, Splits)> {
    let mut a_splits: Splits = vec![Vec::new(); a.len()];
    let mut b_splits: Splits = vec![Vec::new(); b.len()];
    let mut contact = false;

    for (i, (p0, p1)) in edges(a).enumerate() {
        for (j, (q0, q1)) in edges(b).enumerate() {
            for q in [q0, q1] {
                if on_segment(q, p0, p1) {
                    contact = true;
                    a_splits[i].push((parameter(q, p0, p1), q));
                }
            }
            for p in [p0, p1] {
                if on_segment(p, q0, q1) {
                    contact = true;
                    b_splits[j].push((parameter(p, q0, q1), p));
                }
            }
            if crosses_properly(p0, p1, q0, q1) {
                if let Some((t, s)) = line_parameters(p0, p1, q0, q1) {
                    contact = true;
                    let point = p0 + t * (p1 - p0);
                    a_splits[i].push((t, point));
                    b_splits[j].push((s, point));
                }
            }
        }
    }
    contact.then_some((a_splits, b_splits))
}

/// Edges of `ring` cut at the split points, in ring order
fn fragments(ring: &[Vec2], mut splits: Splits) -> Vec<(Vec2, Vec2)> {
    let mut out = Vec::new();
    for ((p0, p1), cuts) in edges(ring).zip(splits.iter_mut()) {
        cuts.sort_by(|x, y| x.0.total_cmp(&y.0));
        let mut from = p0;
        for p in cuts.iter().map(|c| c.1).chain(std::iter::once(p1)) {
            if p != from {
                out.push((from, p));
                from = p;
            }
        }
    }
    out
}

/// If `u-v` runs along an edge of `ring`, whether it runs the same way
fn overlap(u: Vec2, v: Vec2, ring: &[Vec2]) -> Option<bool> {
    edges(ring)
        .find(|&(q0, q1)| on_segment(u, q0, q1) && on_segment(v, q0, q1))
        .map(|(q0, q1)| (v - u).dot(q1 - q0) > 0.0)
}

/// Clockwise angle in `(0, 2π]` from the reversed edge `v → u` to `v → w`
fn clockwise_turn(u: Vec2, v: Vec2, w: Vec2) -> f64 {
    let back = (u - v).as_dvec2();
    let out = (w - v).as_dvec2();
    let angle = -back.perp_dot(out).atan2(back.dot(out));
    if angle <= 0.0 {
        angle + std::f64::consts::TAU
    } else {
        angle
    }
}

fn point_key(p: Vec2) -> (u32, u32) {
    // Adding zero folds -0.0 into 0.0
    ((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits())
}

/// Link directed boundary edges into closed loops
///
/// At a vertex with several outgoing edges the loop takes the sharpest left
/// turn, which keeps the region on its left and lets pieces that touch at a
/// single point come out as separate loops.
fn trace_loops(boundary: &[(Vec2, Vec2)]) -> Result<Vec<Vec<Vec2>>> {
    let mut outgoing: HashMap<(u32, u32), Vec<usize>> = HashMap::new();
    for (k, (u, _)) in boundary.iter().enumerate() {
        outgoing.entry(point_key(*u)).or_default().push(k);
    }
    let broken = || VoronoiError::DegenerateGeometry("cut boundary does not close".into());

    let mut used = vec![false; boundary.len()];
    let mut loops = Vec::new();
    for first in 0..boundary.len() {
        if used[first] {
            continue;
        }
        let mut outline = Vec::new();
        let mut k = first;
        loop {
            used[k] = true;
            let (u, v) = boundary[k];
            outline.push(u);

            let next = outgoing
                .get(&point_key(v))
                .and_then(|candidates| {
                    candidates.iter().copied().min_by(|&x, &y| {
                        clockwise_turn(u, v, boundary[x].1)
                            .total_cmp(&clockwise_turn(u, v, boundary[y].1))
                    })
                })
                .ok_or_else(broken)?;
            if next == first {
                break;
            }
            if used[next] {
                return Err(broken());
            }
            k = next;
        }
        loops.push(outline);
    }
    Ok(loops)
}

fn cut_outline(a: &[Vec2], b: &[Vec2]) -> Result<Vec<PolygonWithHoles>> {
    let Some((a_splits, b_splits)) = find_contacts(a, b) else {
        return Ok(if point_in_polygon(b[0], a) {
            let mut hole = b.to_vec();
            hole.reverse();
            vec![PolygonWithHoles {
                outer: a.to_vec(),
                holes: vec![hole],
            }]
        } else if point_in_polygon(a[0], b) {
            Vec::new()
        } else {
            vec![PolygonWithHoles::new(a)]
        });
    };

    // `a` where it is outside `b`, or where `b` borders it from outside
    let mut boundary: Vec<(Vec2, Vec2)> = fragments(a, a_splits)
        .into_iter()
        .filter(|&(u, v)| match overlap(u, v, b) {
            Some(same_direction) => !same_direction,
            None => !point_in_polygon((u + v) * 0.5, b),
        })
        .collect();
    // `b` reversed where it is inside `a`
    boundary.extend(
        fragments(b, b_splits)
            .into_iter()
            .filter(|&(u, v)| overlap(u, v, a).is_none() && point_in_polygon((u + v) * 0.5, a))
            .map(|(u, v)| (v, u)),
    );

    let mut pieces = Vec::new();
    let mut holes = Vec::new();
    for outline in trace_loops(&boundary)? {
        let area = polygon_signed_area(&outline);
        if area > 0.0 {
            pieces.push(PolygonWithHoles::new(&outline));
        } else if area < 0.0 {
            holes.push(outline);
        }
    }
    for hole in holes {
        let inner = (hole[0] + hole[1]) * 0.5;
        pieces
            .iter_mut()
            .find(|p| point_in_polygon(inner, &p.outer))
            .ok_or_else(|| VoronoiError::DegenerateGeometry("cut left a hole outside the outline".into()))?
            .holes
            .push(hole);
    }

    log::debug!(
        "cut traced {} boundary edges into {} pieces",
        boundary.len(),
        pieces.len()
    );
    Ok(pieces)
}
