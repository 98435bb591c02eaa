//! Triangle mesh with mutual edge adjacency
//!
//! Faces live in an arena and are addressed by [`FaceHandle`]. Each face has
//! three corners (site indices, counter-clockwise) and three edge slots. Edge
//! `i` is opposite corner `i`: it runs from corner `ccw_next(i)` to corner
//! `cw_next(i)`. An edge slot optionally stores the [`EdgeRef`] of the matching
//! slot on the neighbouring face.
//!
//! Every public mutator leaves the mesh twin-symmetric: if `(f, i)` has twin
//! `(g, j)` then `(g, j)` has twin `(f, i)`.

use crate::error::{Result, VoronoiError};
use crate::geometry::{ccw_next, cw_next};

/// Stable handle to a face in a [`TriangleMesh`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceHandle(usize);

impl FaceHandle {
    /// Arena slot of this face
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One edge slot of one face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeRef {
    pub face: FaceHandle,
    pub edge: usize,
}

impl EdgeRef {
    #[inline]
    pub fn new(face: FaceHandle, edge: usize) -> Self {
        Self { face, edge }
    }
}

/// A triangle referencing three sites and up to three neighbouring edges
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    corners: [usize; 3],
    twins: [Option<EdgeRef>; 3],
}

impl Face {
    fn new(corners: [usize; 3]) -> Self {
        Self {
            corners,
            twins: [None; 3],
        }
    }

    /// Site indices of the three corners, counter-clockwise
    #[inline]
    pub fn corners(&self) -> [usize; 3] {
        self.corners
    }

    #[inline]
    pub fn corner(&self, i: usize) -> usize {
        self.corners[i]
    }

    /// Matching edge slot on the neighbouring face, `None` on the boundary
    #[inline]
    pub fn twin(&self, i: usize) -> Option<EdgeRef> {
        self.twins[i]
    }

    /// Directed corner pair `(from, to)` of edge `i`
    #[inline]
    pub fn edge_corners(&self, i: usize) -> (usize, usize) {
        (self.corners[ccw_next(i)], self.corners[cw_next(i)])
    }

    /// Local index of a site among this face's corners
    pub fn corner_index(&self, site: usize) -> Option<usize> {
        self.corners.iter().position(|&c| c == site)
    }
}

/// Arena of triangular faces with half-edge style adjacency
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    faces: Vec<Option<Face>>,
    free: Vec<usize>,
}

impl TriangleMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live faces
    pub fn face_count(&self) -> usize {
        self.faces.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.face_count() == 0
    }

    /// Get a face by handle, `None` if it was removed
    pub fn face(&self, handle: FaceHandle) -> Option<&Face> {
        self.faces.get(handle.0).and_then(Option::as_ref)
    }

    /// Iterate over all live faces in handle order
    pub fn faces(&self) -> impl Iterator<Item = (FaceHandle, &Face)> + '_ {
        self.faces
            .iter()
            .enumerate()
            .filter_map(|(i, f)| f.as_ref().map(|f| (FaceHandle(i), f)))
    }

    fn live(&self, handle: FaceHandle) -> Result<&Face> {
        self.face(handle)
            .ok_or(VoronoiError::FaceNotFound(handle.0))
    }

    fn live_mut(&mut self, handle: FaceHandle) -> Result<&mut Face> {
        self.faces
            .get_mut(handle.0)
            .and_then(Option::as_mut)
            .ok_or(VoronoiError::FaceNotFound(handle.0))
    }

    /// Insert an unconnected face
    ///
    /// The caller is responsible for passing the corners counter-clockwise.
    pub fn add_face(&mut self, corners: [usize; 3]) -> FaceHandle {
        let face = Some(Face::new(corners));
        match self.free.pop() {
            Some(slot) => {
                self.faces[slot] = face;
                FaceHandle(slot)
            }
            None => {
                self.faces.push(face);
                FaceHandle(self.faces.len() - 1)
            }
        }
    }

    /// Overwrite a face's corners in place, detaching all of its edges first
    pub fn replace_face(&mut self, handle: FaceHandle, corners: [usize; 3]) -> Result<()> {
        self.disconnect(handle)?;
        self.live_mut(handle)?.corners = corners;
        Ok(())
    }

    /// Remove a face, clearing every twin that pointed at it
    pub fn remove_face(&mut self, handle: FaceHandle) -> Result<Face> {
        self.disconnect(handle)?;
        let face = self.faces[handle.0]
            .take()
            .ok_or(VoronoiError::FaceNotFound(handle.0))?;
        self.free.push(handle.0);
        Ok(face)
    }

    /// Matching edge slot across `edge`
    pub fn twin(&self, edge: EdgeRef) -> Option<EdgeRef> {
        self.face(edge.face).and_then(|f| f.twins[edge.edge])
    }

    /// The face across edge `i` of `face`, `None` on the boundary
    pub fn neighbour(&self, face: FaceHandle, i: usize) -> Option<FaceHandle> {
        self.twin(EdgeRef::new(face, i)).map(|e| e.face)
    }

    /// Make two edge slots twins of each other
    ///
    /// Any previous twins of either slot are detached first.
    pub fn connect(&mut self, a: EdgeRef, b: EdgeRef) -> Result<()> {
        self.live(a.face)?;
        self.live(b.face)?;
        self.disconnect_edge(a)?;
        self.disconnect_edge(b)?;
        self.live_mut(a.face)?.twins[a.edge] = Some(b);
        self.live_mut(b.face)?.twins[b.edge] = Some(a);
        Ok(())
    }

    fn connect_opt(&mut self, a: EdgeRef, b: Option<EdgeRef>) -> Result<()> {
        match b {
            Some(b) => self.connect(a, b),
            None => Ok(()),
        }
    }

    /// Detach one edge slot from its twin
    pub fn disconnect_edge(&mut self, edge: EdgeRef) -> Result<()> {
        if let Some(twin) = self.live_mut(edge.face)?.twins[edge.edge].take() {
            if let Some(other) = self.faces.get_mut(twin.face.0).and_then(Option::as_mut) {
                if other.twins[twin.edge] == Some(edge) {
                    other.twins[twin.edge] = None;
                }
            }
        }
        Ok(())
    }

    /// Detach all three edges of a face
    pub fn disconnect(&mut self, face: FaceHandle) -> Result<()> {
        for i in 0..3 {
            self.disconnect_edge(EdgeRef::new(face, i))?;
        }
        Ok(())
    }

    /// Swap the diagonal shared by two faces
    ///
    /// `(f0, i0)` and `(f1, i1)` must be twins. With `f0 = (o0, a, b)` and
    /// `f1 = (o1, b, a)`, the faces become `f0 = (o0, a, o1)` and
    /// `f1 = (o1, b, o0)` sharing edge 1, and the four outer neighbours are
    /// rewired. No other face is touched.
    pub fn flip(&mut self, f0: FaceHandle, i0: usize, f1: FaceHandle, i1: usize) -> Result<()> {
        if self.twin(EdgeRef::new(f0, i0)) != Some(EdgeRef::new(f1, i1)) {
            return Err(VoronoiError::DegenerateGeometry(format!(
                "faces {} and {} do not share edges {} / {}",
                f0.0, f1.0, i0, i1
            )));
        }
        let a = self.live(f0)?.clone();
        let b = self.live(f1)?.clone();

        let o0 = a.corners[i0];
        let pa = a.corners[ccw_next(i0)];
        let pb = a.corners[cw_next(i0)];
        let o1 = b.corners[i1];

        let outer_o0_pa = a.twins[cw_next(i0)];
        let outer_pb_o0 = a.twins[ccw_next(i0)];
        let outer_o1_pb = b.twins[cw_next(i1)];
        let outer_pa_o1 = b.twins[ccw_next(i1)];

        self.replace_face(f0, [o0, pa, o1])?;
        self.replace_face(f1, [o1, pb, o0])?;

        self.connect(EdgeRef::new(f0, 1), EdgeRef::new(f1, 1))?;
        self.connect_opt(EdgeRef::new(f0, 0), outer_pa_o1)?;
        self.connect_opt(EdgeRef::new(f0, 2), outer_o0_pa)?;
        self.connect_opt(EdgeRef::new(f1, 0), outer_pb_o0)?;
        self.connect_opt(EdgeRef::new(f1, 2), outer_o1_pb)?;
        Ok(())
    }

    /// Split a face around an interior site
    ///
    /// `(c0, c1, c2)` becomes `(c0, c1, p)` (reusing the handle), `(c1, c2, p)`
    /// and `(c2, c0, p)`. Outer adjacencies are preserved on edge 2 of each new
    /// face and the three spokes are wired to each other.
    pub fn split(&mut self, face: FaceHandle, p: usize) -> Result<[FaceHandle; 3]> {
        let old = self.live(face)?.clone();
        let [c0, c1, c2] = old.corners;

        self.replace_face(face, [c0, c1, p])?;
        let second = self.add_face([c1, c2, p]);
        let third = self.add_face([c2, c0, p]);

        self.connect(EdgeRef::new(face, 0), EdgeRef::new(second, 1))?;
        self.connect(EdgeRef::new(second, 0), EdgeRef::new(third, 1))?;
        self.connect(EdgeRef::new(third, 0), EdgeRef::new(face, 1))?;

        self.connect_opt(EdgeRef::new(face, 2), old.twins[2])?;
        self.connect_opt(EdgeRef::new(second, 2), old.twins[0])?;
        self.connect_opt(EdgeRef::new(third, 2), old.twins[1])?;
        Ok([face, second, third])
    }

    /// Split edge `i` of a face at site `p`
    ///
    /// On a boundary edge the face becomes two faces. When the edge has a twin
    /// the neighbouring face is split as well, so the result never contains a
    /// T-junction. Returns every face touching `p`.
    pub fn split_edge(&mut self, face: FaceHandle, i: usize, p: usize) -> Result<Vec<FaceHandle>> {
        let old = self.live(face)?.clone();
        let o = old.corners[i];
        let a = old.corners[ccw_next(i)];
        let b = old.corners[cw_next(i)];
        let outer_o_a = old.twins[cw_next(i)];
        let outer_b_o = old.twins[ccw_next(i)];

        let across = match old.twins[i] {
            Some(edge) => Some((edge, self.live(edge.face)?.clone())),
            None => None,
        };

        self.replace_face(face, [o, a, p])?;
        let second = self.add_face([o, p, b]);
        self.connect(EdgeRef::new(face, 1), EdgeRef::new(second, 2))?;
        self.connect_opt(EdgeRef::new(face, 2), outer_o_a)?;
        self.connect_opt(EdgeRef::new(second, 1), outer_b_o)?;

        let mut created = vec![face, second];

        if let Some((edge, neighbour)) = across {
            let j = edge.edge;
            let q = neighbour.corners[j];
            let outer_q_b = neighbour.twins[cw_next(j)];
            let outer_a_q = neighbour.twins[ccw_next(j)];

            self.replace_face(edge.face, [q, b, p])?;
            let fourth = self.add_face([q, p, a]);
            self.connect(EdgeRef::new(edge.face, 1), EdgeRef::new(fourth, 2))?;
            self.connect(EdgeRef::new(edge.face, 0), EdgeRef::new(second, 0))?;
            self.connect(EdgeRef::new(fourth, 0), EdgeRef::new(face, 0))?;
            self.connect_opt(EdgeRef::new(edge.face, 2), outer_q_b)?;
            self.connect_opt(EdgeRef::new(fourth, 1), outer_a_q)?;

            created.push(edge.face);
            created.push(fourth);
        }
        Ok(created)
    }

    /// Number of edge slots without a twin
    pub fn boundary_edge_count(&self) -> usize {
        self.faces()
            .map(|(_, f)| f.twins.iter().filter(|t| t.is_none()).count())
            .sum()
    }

    /// Directed corner pairs of all boundary edges
    pub fn boundary_edges(&self) -> Vec<(usize, usize)> {
        self.faces()
            .flat_map(|(_, f)| {
                (0..3)
                    .filter(|&i| f.twins[i].is_none())
                    .map(|i| f.edge_corners(i))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Check twin symmetry and that twinned edges join the same two corners
    pub fn validate(&self) -> Result<()> {
        for (handle, face) in self.faces() {
            for i in 0..3 {
                let Some(twin) = face.twins[i] else {
                    continue;
                };
                let other = self.face(twin.face).ok_or_else(|| {
                    VoronoiError::DegenerateGeometry(format!(
                        "face {} edge {} points at removed face {}",
                        handle.0, i, twin.face.0
                    ))
                })?;
                if other.twins[twin.edge] != Some(EdgeRef::new(handle, i)) {
                    return Err(VoronoiError::DegenerateGeometry(format!(
                        "face {} edge {} is not mirrored by face {} edge {}",
                        handle.0, i, twin.face.0, twin.edge
                    )));
                }
                let (from, to) = face.edge_corners(i);
                if other.edge_corners(twin.edge) != (to, from) {
                    return Err(VoronoiError::DegenerateGeometry(format!(
                        "face {} edge {} and face {} edge {} join different corners",
                        handle.0, i, twin.face.0, twin.edge
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Quad 0-1-2-3 split along the 0-2 diagonal
    fn two_faces() -> (TriangleMesh, FaceHandle, FaceHandle) {
        let mut mesh = TriangleMesh::new();
        let f0 = mesh.add_face([0, 1, 2]);
        let f1 = mesh.add_face([0, 2, 3]);
        // f0 edge 1 is 2 -> 0, f1 edge 2 is 0 -> 2
        mesh.connect(EdgeRef::new(f0, 1), EdgeRef::new(f1, 2)).unwrap();
        (mesh, f0, f1)
    }

    fn sorted(mut corners: [usize; 3]) -> [usize; 3] {
        corners.sort_unstable();
        corners
    }

    #[test]
    fn test_connect_is_mutual() {
        let (mesh, f0, f1) = two_faces();
        assert_eq!(mesh.neighbour(f0, 1), Some(f1));
        assert_eq!(mesh.neighbour(f1, 2), Some(f0));
        assert_eq!(mesh.neighbour(f0, 0), None);
        assert_eq!(mesh.boundary_edge_count(), 4);
        mesh.validate().unwrap();
    }

    #[test]
    fn test_reconnect_detaches_old_twin() {
        let (mut mesh, f0, f1) = two_faces();
        let f2 = mesh.add_face([0, 2, 4]);
        mesh.connect(EdgeRef::new(f2, 2), EdgeRef::new(f0, 1)).unwrap();
        assert_eq!(mesh.neighbour(f0, 1), Some(f2));
        assert_eq!(mesh.neighbour(f1, 2), None);
        mesh.validate().unwrap();
    }

    #[test]
    fn test_remove_face_clears_twins() {
        let (mut mesh, f0, f1) = two_faces();
        mesh.remove_face(f1).unwrap();
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.neighbour(f0, 1), None);
        assert!(mesh.face(f1).is_none());
        assert_eq!(
            mesh.remove_face(f1),
            Err(VoronoiError::FaceNotFound(f1.index()))
        );

        // Freed slot is reused
        let f2 = mesh.add_face([0, 2, 3]);
        assert_eq!(f2, f1);
        mesh.validate().unwrap();
    }

    #[test]
    fn test_flip_swaps_diagonal() {
        let (mut mesh, f0, f1) = two_faces();
        mesh.flip(f0, 1, f1, 2).unwrap();

        let a = mesh.face(f0).unwrap().corners();
        let b = mesh.face(f1).unwrap().corners();
        assert_eq!(sorted(a), [1, 2, 3]);
        assert_eq!(sorted(b), [0, 1, 3]);
        assert_eq!(mesh.neighbour(f0, 1), Some(f1));
        assert_eq!(mesh.boundary_edge_count(), 4);
        mesh.validate().unwrap();
    }

    #[test]
    fn test_flip_rewires_outer_neighbours() {
        let (mut mesh, f0, f1) = two_faces();
        // Outer face across 0 -> 1 of f0 (f0 edge 2)
        let outer = mesh.add_face([1, 0, 5]);
        mesh.connect(EdgeRef::new(f0, 2), EdgeRef::new(outer, 2)).unwrap();

        mesh.flip(f0, 1, f1, 2).unwrap();
        mesh.validate().unwrap();

        // Edge 0 -> 1 now belongs to the face containing corners 0, 1, 3
        let across = mesh.neighbour(outer, 2).unwrap();
        assert_eq!(sorted(mesh.face(across).unwrap().corners()), [0, 1, 3]);
    }

    #[test]
    fn test_flip_requires_twins() {
        let (mut mesh, f0, f1) = two_faces();
        assert!(mesh.flip(f0, 0, f1, 2).is_err());
    }

    #[test]
    fn test_split_preserves_adjacency() {
        let (mut mesh, f0, f1) = two_faces();
        let created = mesh.split(f0, 9).unwrap();

        assert_eq!(created[0], f0);
        assert_eq!(mesh.face_count(), 4);
        for handle in created {
            assert!(mesh.face(handle).unwrap().corner_index(9).is_some());
        }
        // The shared diagonal 0-2 still connects to f1
        let across = mesh.neighbour(f1, 2).unwrap();
        assert!(created.contains(&across));
        assert_eq!(mesh.boundary_edge_count(), 4);
        mesh.validate().unwrap();
    }

    #[test]
    fn test_split_boundary_edge() {
        let (mut mesh, f0, _) = two_faces();
        // f0 edge 2 runs 0 -> 1 and lies on the boundary
        let created = mesh.split_edge(f0, 2, 7).unwrap();
        assert_eq!(created.len(), 2);
        assert_eq!(mesh.face_count(), 3);
        assert_eq!(mesh.boundary_edge_count(), 5);
        mesh.validate().unwrap();
    }

    #[test]
    fn test_split_shared_edge() {
        let (mut mesh, f0, _) = two_faces();
        // f0 edge 1 is the shared diagonal
        let created = mesh.split_edge(f0, 1, 7).unwrap();
        assert_eq!(created.len(), 4);
        assert_eq!(mesh.face_count(), 4);
        assert_eq!(mesh.boundary_edge_count(), 4);
        for handle in &created {
            assert!(mesh.face(*handle).unwrap().corner_index(7).is_some());
        }
        mesh.validate().unwrap();
    }

    #[test]
    fn test_stale_handle() {
        let mut mesh = TriangleMesh::new();
        let f = mesh.add_face([0, 1, 2]);
        mesh.remove_face(f).unwrap();
        assert!(mesh.is_empty());
        assert!(mesh.split(f, 3).is_err());
    }
}
