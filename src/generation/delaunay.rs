//! Incremental Delaunay triangulation
//!
//! The convex hull of the sites is fanned into the initial faces, which are
//! legalized, and the remaining sites are inserted one at a time in input
//! order. Each insertion locates the containing face, splits it (or the edge
//! the site lies on) and restores the Delaunay property with Lawson flips.

use std::collections::BTreeSet;

use glam::{Vec2, Vec3};

use crate::error::{Result, VoronoiError};
use crate::geometry::{ccw, ccw_next, cw_next, in_circle, signed_area};
use crate::hull::convex_hull;
use crate::triangle_mesh::{EdgeRef, FaceHandle, TriangleMesh};

/// Relative distance (fraction of the site extent) within which a site that
/// no face contains is still assigned to the nearest face
const LOCATE_TOLERANCE: f32 = 1e-6;

/// A triangulated site: an immutable location plus its hull classification
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Site {
    position: Vec2,
    on_hull: bool,
}

impl Site {
    fn new(position: Vec2) -> Self {
        Self {
            position,
            on_hull: false,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// `true` if the site lies on the boundary of the triangulation
    #[inline]
    pub fn on_hull(&self) -> bool {
        self.on_hull
    }
}

/// Delaunay triangulation of a planar site set
///
/// Faces reference sites by their index in the input slice. Sites that could
/// not be inserted are recorded in [`Triangulation::diagnostics`] and are not
/// corners of any face.
///
/// # Example
///
/// ```
/// use glam::Vec2;
/// use rust_voronoi_map::Triangulation;
///
/// let points = [
///     Vec2::new(0.0, 0.0),
///     Vec2::new(4.0, 0.0),
///     Vec2::new(4.0, 4.0),
///     Vec2::new(0.0, 4.0),
///     Vec2::new(2.0, 1.0),
/// ];
/// let triangulation = Triangulation::new(&points).unwrap();
/// assert_eq!(triangulation.face_count(), 4);
/// assert!(triangulation.verify_delaunay().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct Triangulation {
    sites: Vec<Site>,
    mesh: TriangleMesh,
    hull: Vec<usize>,
    inserted: Vec<bool>,
    diagnostics: Vec<VoronoiError>,
    locate_tolerance: f32,
}

impl Triangulation {
    /// Triangulate `points`
    ///
    /// # Errors
    ///
    /// Returns `DegenerateGeometry` if the points do not span a triangle
    /// (fewer than three distinct, non-collinear points).
    pub fn new(points: &[Vec2]) -> Result<Self> {
        let hull = convex_hull(points);
        if hull.len() < 3 {
            return Err(VoronoiError::DegenerateGeometry(format!(
                "{} points do not span a triangle",
                points.len()
            )));
        }

        let mut sites: Vec<Site> = points.iter().map(|&p| Site::new(p)).collect();
        let mut inserted = vec![false; points.len()];
        for &i in &hull {
            sites[i].on_hull = true;
            inserted[i] = true;
        }

        let (min, max) = points
            .iter()
            .fold((Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)), |(lo, hi), p| {
                (lo.min(*p), hi.max(*p))
            });

        let mut triangulation = Self {
            sites,
            mesh: TriangleMesh::new(),
            hull,
            inserted,
            diagnostics: Vec::new(),
            locate_tolerance: (max - min).length() * LOCATE_TOLERANCE,
        };

        let seed = triangulation.fan_hull()?;
        let hull_budget = triangulation.mesh.face_count().pow(2).max(64);
        triangulation.legalize(seed, hull_budget);

        for index in 0..points.len() {
            if !triangulation.inserted[index] {
                triangulation.insert(index)?;
            }
        }

        log::debug!(
            "triangulated {} sites into {} faces ({} hull sites, {} skipped)",
            points.len(),
            triangulation.mesh.face_count(),
            triangulation.hull.len(),
            triangulation.diagnostics.len()
        );
        Ok(triangulation)
    }

    #[inline]
    fn pos(&self, site: usize) -> Vec2 {
        self.sites[site].position
    }

    /// Triangulate the convex hull by repeatedly cutting off a convex ear
    fn fan_hull(&mut self) -> Result<Vec<FaceHandle>> {
        let mut sub_hull = self.hull.clone();
        // Edge slot of an existing face lying along sub_hull[k] -> sub_hull[k + 1]
        let mut outer: Vec<Option<EdgeRef>> = vec![None; sub_hull.len()];
        let mut created = Vec::with_capacity(sub_hull.len() - 2);

        while sub_hull.len() > 3 {
            let len = sub_hull.len();
            let ear = (0..len)
                .find(|&i0| {
                    let i1 = (i0 + 1) % len;
                    let i2 = (i1 + 1) % len;
                    signed_area(
                        self.pos(sub_hull[i0]),
                        self.pos(sub_hull[i1]),
                        self.pos(sub_hull[i2]),
                    ) > 0.0
                })
                .ok_or_else(|| {
                    VoronoiError::DegenerateGeometry("hull has no convex corner".into())
                })?;
            let i1 = (ear + 1) % len;
            let i2 = (i1 + 1) % len;

            let face = self
                .mesh
                .add_face([sub_hull[ear], sub_hull[i1], sub_hull[i2]]);
            if let Some(edge) = outer[ear] {
                self.mesh.connect(EdgeRef::new(face, 2), edge)?;
            }
            if let Some(edge) = outer[i1] {
                self.mesh.connect(EdgeRef::new(face, 0), edge)?;
            }
            outer[ear] = Some(EdgeRef::new(face, 1));
            outer.remove(i1);
            sub_hull.remove(i1);
            created.push(face);
        }

        let face = self.mesh.add_face([sub_hull[0], sub_hull[1], sub_hull[2]]);
        for (k, edge) in [2, 0, 1].into_iter().enumerate() {
            if let Some(other) = outer[k] {
                self.mesh.connect(EdgeRef::new(face, edge), other)?;
            }
        }
        created.push(face);
        Ok(created)
    }

    /// Find the face containing `p`
    ///
    /// Falls back to the face that `p` is closest to being inside of when it
    /// is within the locate tolerance. The flag reports whether the fallback
    /// was used.
    fn locate(&self, p: Vec2) -> Option<(FaceHandle, bool)> {
        let mut best: Option<(FaceHandle, f32)> = None;
        for (handle, face) in self.mesh.faces() {
            let [a, b, c] = face.corners().map(|s| self.pos(s));
            if ccw(a, b, p) && ccw(b, c, p) && ccw(c, a, p) {
                return Some((handle, false));
            }
            let worst = [(a, b), (b, c), (c, a)]
                .into_iter()
                .map(|(u, v)| 2.0 * signed_area(u, v, p) / (v - u).length().max(f32::MIN_POSITIVE))
                .fold(f32::INFINITY, f32::min);
            if best.map_or(true, |(_, d)| worst > d) {
                best = Some((handle, worst));
            }
        }
        match best {
            Some((handle, distance)) if distance >= -self.locate_tolerance => Some((handle, true)),
            _ => None,
        }
    }

    /// Insert one site and legalize around it
    fn insert(&mut self, index: usize) -> Result<()> {
        let p = self.pos(index);
        let Some((handle, fallback)) = self.locate(p) else {
            log::warn!("no face contains site {} at {:?}, skipping", index, p);
            self.diagnostics.push(VoronoiError::PointLocation { index });
            return Ok(());
        };
        let face = self
            .mesh
            .face(handle)
            .ok_or(VoronoiError::FaceNotFound(handle.index()))?
            .clone();

        if let Some(&other) = face.corners().iter().find(|&&c| self.pos(c) == p) {
            log::warn!("site {} coincides with site {}, skipping", index, other);
            self.diagnostics.push(VoronoiError::DegenerateGeometry(format!(
                "site {} coincides with site {}",
                index, other
            )));
            return Ok(());
        }

        let areas: [f32; 3] = std::array::from_fn(|i| {
            let (a, b) = face.edge_corners(i);
            signed_area(self.pos(a), self.pos(b), p)
        });
        let mut on_edge = (0..3).find(|&i| areas[i] == 0.0);
        if on_edge.is_none() && fallback {
            on_edge = (0..3)
                .filter(|&i| areas[i] < 0.0)
                .min_by(|&i, &j| areas[i].total_cmp(&areas[j]));
        }

        let created = match on_edge {
            Some(edge) => {
                if face.twin(edge).is_none() {
                    self.sites[index].on_hull = true;
                }
                self.mesh.split_edge(handle, edge, index)?
            }
            None => self.mesh.split(handle, index)?.to_vec(),
        };
        self.inserted[index] = true;
        // Every flip adds an edge at the new site, so its degree bounds the flips
        let budget = self.sites.len().max(64);
        self.legalize(created, budget);
        Ok(())
    }

    /// Lawson flip loop over a worklist of faces
    ///
    /// A face is popped and its edges are tested in order; the first edge whose
    /// opposite corner lies inside the face's circumcircle is flipped, and the
    /// flipped pair plus its four outer neighbours are queued again. Each flip
    /// strictly increases the smallest angle of the triangulation and the
    /// in-circle test is exact, so the loop ends once the worklist drains.
    /// Hitting `budget` means the mesh is corrupt and is logged as an error.
    fn legalize(&mut self, faces: Vec<FaceHandle>, budget: usize) {
        let mut pending: BTreeSet<FaceHandle> = faces.into_iter().collect();
        let mut flips = 0usize;

        while let Some(handle) = pending.pop_first() {
            let Some(face) = self.mesh.face(handle).cloned() else {
                continue;
            };
            let [c0, c1, c2] = face.corners().map(|s| self.pos(s));

            for i in 0..3 {
                let Some(twin) = face.twin(i) else {
                    continue;
                };
                let Some(neighbour) = self.mesh.face(twin.face) else {
                    continue;
                };
                let far = self.pos(neighbour.corner(twin.edge));
                if !in_circle(c0, c1, c2, far) {
                    continue;
                }

                let outer = [
                    face.twin(ccw_next(i)),
                    face.twin(cw_next(i)),
                    neighbour.twin(ccw_next(twin.edge)),
                    neighbour.twin(cw_next(twin.edge)),
                ];
                if let Err(err) = self.mesh.flip(handle, i, twin.face, twin.edge) {
                    log::warn!("flip of face {} edge {} failed: {}", handle.index(), i, err);
                    break;
                }
                flips += 1;
                pending.extend(outer.into_iter().flatten().map(|e| e.face));
                pending.insert(handle);
                pending.insert(twin.face);
                break;
            }

            if flips >= budget {
                log::error!("legalization stopped after {} flips", flips);
                break;
            }
        }
    }

    /// All sites in input order
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn site(&self, index: usize) -> Option<&Site> {
        self.sites.get(index)
    }

    /// `true` if the site is on the boundary of the triangulation
    pub fn is_on_hull(&self, index: usize) -> bool {
        self.sites.get(index).is_some_and(Site::on_hull)
    }

    /// `true` if the site is a corner of the triangulation
    pub fn is_inserted(&self, index: usize) -> bool {
        self.inserted.get(index).copied().unwrap_or(false)
    }

    /// Convex hull used to seed the triangulation, counter-clockwise
    pub fn hull(&self) -> &[usize] {
        &self.hull
    }

    /// The underlying face mesh
    pub fn mesh(&self) -> &TriangleMesh {
        &self.mesh
    }

    pub fn face_count(&self) -> usize {
        self.mesh.face_count()
    }

    /// Corner triples of every face, counter-clockwise
    pub fn faces(&self) -> Vec<[usize; 3]> {
        self.mesh.faces().map(|(_, f)| f.corners()).collect()
    }

    /// Undirected edges as `(low, high)` site pairs
    pub fn edges(&self) -> BTreeSet<(usize, usize)> {
        self.mesh
            .faces()
            .flat_map(|(_, f)| {
                (0..3).map(move |i| {
                    let (a, b) = f.edge_corners(i);
                    (a.min(b), a.max(b))
                })
            })
            .collect()
    }

    /// Non-fatal problems encountered while inserting sites
    pub fn diagnostics(&self) -> &[VoronoiError] {
        &self.diagnostics
    }

    /// Flat triangle list in the XZ plane (y = 0), three vertices per face
    pub fn vertex_data(&self) -> Vec<Vec3> {
        self.mesh
            .faces()
            .flat_map(|(_, f)| f.corners())
            .map(|s| {
                let p = self.pos(s);
                Vec3::new(p.x, 0.0, p.y)
            })
            .collect()
    }

    /// Check that no inserted site lies strictly inside any face's circumcircle
    pub fn verify_delaunay(&self) -> Result<()> {
        for (handle, face) in self.mesh.faces() {
            let [a, b, c] = face.corners().map(|s| self.pos(s));
            for (index, site) in self.sites.iter().enumerate() {
                if !self.inserted[index] || face.corner_index(index).is_some() {
                    continue;
                }
                if in_circle(a, b, c, site.position) {
                    return Err(VoronoiError::DegenerateGeometry(format!(
                        "site {} lies inside the circumcircle of face {}",
                        index,
                        handle.index()
                    )));
                }
            }
        }
        Ok(())
    }
}
