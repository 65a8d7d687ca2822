//! Bounded polyhedron graphs for LED sculptures.
//!
//! Vertices and faces are the primary data. Edges and the edge-to-face
//! adjacency are derived from the faces by [`Polyhedron::prepare`]; every
//! operation that changes geometry or topology rebuilds them.
//!
//! All tables are bounded by the `MAX_*` capacities. Input exceeding a
//! capacity is truncated with a warning, never rejected.

pub mod derive;
pub mod dump;
pub mod scratch;
pub mod seed;
pub mod transform;

pub use scratch::{Scratch, ScratchPool};
pub use seed::Solid;

use common::{
  linalg::{normalize_or_keep, Vector3},
  EdgeIdx, FaceIdx, VertexIdx,
};

use indexmap::IndexSet;
use itertools::Itertools;
use tracing::warn;

pub const MAX_VERTICES: usize = 200;
pub const MAX_EDGES: usize = 300;
pub const MAX_FACES: usize = 120;
pub const MAX_FACE_DEGREE: usize = 10;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PolyError {
  #[error("scratch pool exhausted: all {capacity} polyhedra are in use")]
  ScratchExhausted { capacity: usize },
  #[error("dual of a polyhedron with {nvertices} vertices and {nfaces} faces exceeds capacity")]
  DualCapacity { nvertices: usize, nfaces: usize },
  #[error("truncation fraction {0} is not in (0, 0.5]")]
  InvalidTruncation(f32),
  #[error("face {face} references vertex {vertex}, but there are only {nvertices} vertices")]
  InvalidVertexRef {
    face: FaceIdx,
    vertex: VertexIdx,
    nvertices: usize,
  },
  #[error("face {face} has only {degree} vertices")]
  DegenerateFace { face: FaceIdx, degree: usize },
}

pub type PolyResult<T> = Result<T, PolyError>;

/// Undirected edge with sorted endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
  a: VertexIdx,
  b: VertexIdx,
}
impl Edge {
  pub fn new(v0: VertexIdx, v1: VertexIdx) -> Self {
    if v0 <= v1 {
      Self { a: v0, b: v1 }
    } else {
      Self { a: v1, b: v0 }
    }
  }
  /// Smaller endpoint.
  pub fn a(&self) -> VertexIdx {
    self.a
  }
  /// Larger endpoint.
  pub fn b(&self) -> VertexIdx {
    self.b
  }
  pub fn vertices(&self) -> [VertexIdx; 2] {
    [self.a, self.b]
  }
  pub fn contains(&self, v: VertexIdx) -> bool {
    self.a == v || self.b == v
  }
  pub fn other(&self, v: VertexIdx) -> Option<VertexIdx> {
    if v == self.a {
      Some(self.b)
    } else if v == self.b {
      Some(self.a)
    } else {
      None
    }
  }
}

/// The (up to two) faces adjacent to an edge, first slot filled first.
pub type EdgeFaces = [Option<FaceIdx>; 2];

#[derive(Debug, Clone, Default)]
pub struct Polyhedron {
  vertices: Vec<Vector3>,
  faces: Vec<Vec<VertexIdx>>,
  /// Insertion order is the edge index.
  edges: IndexSet<Edge>,
  edge_faces: Vec<EdgeFaces>,
}

impl Polyhedron {
  /// Builds a prepared polyhedron from raw vertices and faces.
  ///
  /// Faces must have at least three vertices, all in range.
  pub fn from_parts(vertices: Vec<Vector3>, faces: Vec<Vec<VertexIdx>>) -> PolyResult<Self> {
    for (iface, face) in faces.iter().enumerate() {
      if face.len() < 3 {
        return Err(PolyError::DegenerateFace {
          face: iface,
          degree: face.len(),
        });
      }
      if let Some(&vertex) = face.iter().find(|&&v| v >= vertices.len()) {
        return Err(PolyError::InvalidVertexRef {
          face: iface,
          vertex,
          nvertices: vertices.len(),
        });
      }
    }
    let mut poly = Self::with_capacity();
    poly.assign(vertices, faces);
    poly.prepare();
    Ok(poly)
  }

  /// Empty polyhedron with storage reserved up to the capacities.
  pub fn with_capacity() -> Self {
    Self {
      vertices: Vec::with_capacity(MAX_VERTICES),
      faces: Vec::with_capacity(MAX_FACES),
      edges: IndexSet::with_capacity(MAX_EDGES),
      edge_faces: Vec::with_capacity(MAX_EDGES),
    }
  }

  /// Removes all data, keeping the allocations.
  pub fn clear(&mut self) {
    self.vertices.clear();
    self.faces.clear();
    self.edges.clear();
    self.edge_faces.clear();
  }

  /// Replaces vertices and faces, truncating to the capacities.
  /// Edges are stale until the next [`Self::prepare`].
  pub(crate) fn assign(
    &mut self,
    vertices: impl IntoIterator<Item = Vector3>,
    faces: impl IntoIterator<Item = Vec<VertexIdx>>,
  ) {
    self.clear();

    let mut vertices = vertices.into_iter();
    self.vertices.extend(vertices.by_ref().take(MAX_VERTICES));
    if vertices.next().is_some() {
      warn!("vertex capacity {MAX_VERTICES} reached, remaining vertices dropped");
    }

    let nvertices = self.vertices.len();
    let mut faces = faces.into_iter();
    for mut face in faces.by_ref().take(MAX_FACES) {
      if face.len() > MAX_FACE_DEGREE {
        warn!("face degree {} exceeds {MAX_FACE_DEGREE}, truncated", face.len());
        face.truncate(MAX_FACE_DEGREE);
      }
      if face.iter().any(|&v| v >= nvertices) {
        warn!("face references a dropped vertex, face dropped");
        continue;
      }
      self.faces.push(face);
    }
    if faces.next().is_some() {
      warn!("face capacity {MAX_FACES} reached, remaining faces dropped");
    }
  }

  /// Scales to unit mean vertex radius and rebuilds edges and adjacency.
  pub fn prepare(&mut self) {
    self.normalize_mean_radius();
    self.derive_edges();
  }

  fn normalize_mean_radius(&mut self) {
    if self.vertices.is_empty() {
      return;
    }
    let mean =
      self.vertices.iter().map(|v| v.norm()).sum::<f32>() / self.vertices.len() as f32;
    if mean > 0.0 {
      let scale = mean.recip();
      self.vertices.iter_mut().for_each(|v| *v *= scale);
    }
  }

  /// Projects every vertex onto the unit sphere.
  pub fn normalize_radial(&mut self) {
    self
      .vertices
      .iter_mut()
      .for_each(|v| *v = normalize_or_keep(*v));
  }

  fn derive_edges(&mut self) {
    self.edges.clear();
    self.edge_faces.clear();

    let mut capacity_hit = false;
    let mut nonmanifold = false;
    for (iface, face) in self.faces.iter().enumerate() {
      for (v0, v1) in face.iter().copied().circular_tuple_windows() {
        let edge = Edge::new(v0, v1);
        let iedge = match self.edges.get_index_of(&edge) {
          Some(iedge) => iedge,
          None if self.edges.len() >= MAX_EDGES => {
            capacity_hit = true;
            continue;
          }
          None => {
            let (iedge, _) = self.edges.insert_full(edge);
            self.edge_faces.push([None, None]);
            iedge
          }
        };
        match &mut self.edge_faces[iedge] {
          [slot @ None, _] | [Some(_), slot @ None] => *slot = Some(iface),
          _ => nonmanifold = true,
        }
      }
    }

    if capacity_hit {
      warn!("edge capacity {MAX_EDGES} reached, remaining edges dropped");
    }
    if nonmanifold {
      warn!("edge shared by more than two faces, extra faces ignored");
    }
  }
}

impl Polyhedron {
  pub fn nvertices(&self) -> usize {
    self.vertices.len()
  }
  pub fn nedges(&self) -> usize {
    self.edges.len()
  }
  pub fn nfaces(&self) -> usize {
    self.faces.len()
  }
  pub fn is_empty(&self) -> bool {
    self.vertices.is_empty()
  }

  pub fn vertices(&self) -> &[Vector3] {
    &self.vertices
  }
  pub fn vertex(&self, ivertex: VertexIdx) -> &Vector3 {
    &self.vertices[ivertex]
  }

  pub fn faces(&self) -> &[Vec<VertexIdx>] {
    &self.faces
  }
  pub fn face_vertices(&self, iface: FaceIdx) -> &[VertexIdx] {
    &self.faces[iface]
  }
  pub fn face_vertex_count(&self, iface: FaceIdx) -> usize {
    self.faces[iface].len()
  }

  pub fn edges(&self) -> impl ExactSizeIterator<Item = Edge> + '_ {
    self.edges.iter().copied()
  }
  pub fn edge(&self, iedge: EdgeIdx) -> Edge {
    *self.edges.get_index(iedge).unwrap()
  }
  pub fn edge_faces(&self, iedge: EdgeIdx) -> EdgeFaces {
    self.edge_faces[iedge]
  }
  /// Index of the edge joining `v0` and `v1`, in either order.
  pub fn find_edge(&self, v0: VertexIdx, v1: VertexIdx) -> Option<EdgeIdx> {
    self.edges.get_index_of(&Edge::new(v0, v1))
  }

  /// Edges incident to `ivertex`, in edge index order.
  pub fn vertex_edges(&self, ivertex: VertexIdx) -> impl Iterator<Item = EdgeIdx> + '_ {
    self
      .edges
      .iter()
      .positions(move |edge| edge.contains(ivertex))
  }

  /// Edges of a face, one per slot. Slot `i` joins face vertices `i` and `i+1`.
  pub fn face_edges(&self, iface: FaceIdx) -> impl Iterator<Item = Option<EdgeIdx>> + '_ {
    self.faces[iface]
      .iter()
      .copied()
      .circular_tuple_windows()
      .map(move |(v0, v1)| self.find_edge(v0, v1))
  }

  /// Whether the face visits the edge from its smaller to its larger endpoint.
  pub fn face_edge_is_ccw(&self, iface: FaceIdx, iedge: EdgeIdx) -> bool {
    let edge = self.edge(iedge);
    self.faces[iface]
      .iter()
      .copied()
      .circular_tuple_windows()
      .any(|(v0, v1)| v0 == edge.a && v1 == edge.b)
  }

  pub fn edge_length(&self, iedge: EdgeIdx) -> f32 {
    let edge = self.edge(iedge);
    (self.vertices[edge.b] - self.vertices[edge.a]).norm()
  }
  pub fn max_edge_length(&self) -> f32 {
    (0..self.nedges())
      .map(|iedge| self.edge_length(iedge))
      .fold(0.0, f32::max)
  }
  pub fn edge_midpoint(&self, iedge: EdgeIdx) -> Vector3 {
    let edge = self.edge(iedge);
    (self.vertices[edge.a] + self.vertices[edge.b]) / 2.0
  }

  pub fn face_centroid(&self, iface: FaceIdx) -> Vector3 {
    let face = &self.faces[iface];
    let sum: Vector3 = face.iter().map(|&v| self.vertices[v]).sum();
    sum / face.len().max(1) as f32
  }

  /// Newell normal, unit length unless the face is degenerate.
  pub fn face_normal(&self, iface: FaceIdx) -> Vector3 {
    let normal: Vector3 = self.faces[iface]
      .iter()
      .copied()
      .circular_tuple_windows()
      .map(|(i0, i1)| {
        let (v0, v1) = (self.vertices[i0], self.vertices[i1]);
        Vector3::new(
          (v0.y - v1.y) * (v0.z + v1.z),
          (v0.z - v1.z) * (v0.x + v1.x),
          (v0.x - v1.x) * (v0.y + v1.y),
        )
      })
      .sum();
    normalize_or_keep(normal)
  }

  /// Euler characteristic `V - E + F`.
  pub fn euler_characteristic(&self) -> isize {
    self.nvertices() as isize - self.nedges() as isize + self.nfaces() as isize
  }
}

#[cfg(test)]
mod test {
  use super::*;

  fn square_pyramid() -> Polyhedron {
    let vertices = vec![
      Vector3::new(1.0, 1.0, 0.0),
      Vector3::new(-1.0, 1.0, 0.0),
      Vector3::new(-1.0, -1.0, 0.0),
      Vector3::new(1.0, -1.0, 0.0),
      Vector3::new(0.0, 0.0, 1.0),
    ];
    let faces = vec![
      vec![3, 2, 1, 0],
      vec![0, 1, 4],
      vec![1, 2, 4],
      vec![2, 3, 4],
      vec![3, 0, 4],
    ];
    Polyhedron::from_parts(vertices, faces).unwrap()
  }

  #[test]
  fn edge_is_canonical() {
    let edge = Edge::new(7, 2);
    assert_eq!(edge.vertices(), [2, 7]);
    assert_eq!(edge, Edge::new(2, 7));
    assert_eq!(edge.other(7), Some(2));
    assert_eq!(edge.other(3), None);
  }

  #[test]
  fn edges_follow_face_order() {
    let poly = square_pyramid();
    assert_eq!(poly.nedges(), 8);
    assert_eq!(poly.edge(0), Edge::new(2, 3));
    assert_eq!(poly.edge(3), Edge::new(0, 3));
    assert_eq!(poly.edge_faces(0), [Some(0), Some(3)]);
    assert_eq!(poly.euler_characteristic(), 2);
  }

  #[test]
  fn find_edge_either_order() {
    let poly = square_pyramid();
    assert_eq!(poly.find_edge(4, 0), poly.find_edge(0, 4));
    assert!(poly.find_edge(0, 4).is_some());
    assert_eq!(poly.find_edge(0, 2), None);
  }

  #[test]
  fn mean_radius_is_one() {
    let poly = square_pyramid();
    let mean = poly.vertices().iter().map(|v| v.norm()).sum::<f32>() / poly.nvertices() as f32;
    approx::assert_abs_diff_eq!(mean, 1.0, epsilon = 1e-5);
  }

  #[test]
  fn ccw_follows_face_direction() {
    let poly = square_pyramid();
    let iedge = poly.find_edge(0, 1).unwrap();
    assert!(!poly.face_edge_is_ccw(0, iedge));
    assert!(poly.face_edge_is_ccw(1, iedge));
  }

  #[test]
  fn newell_normal_of_base() {
    let poly = square_pyramid();
    let normal = poly.face_normal(0);
    approx::assert_abs_diff_eq!(normal.z.abs(), 1.0, epsilon = 1e-5);
  }

  #[test]
  fn invalid_faces_rejected() {
    let vertices = vec![Vector3::x(), Vector3::y(), Vector3::z()];
    assert_eq!(
      Polyhedron::from_parts(vertices.clone(), vec![vec![0, 1]]).unwrap_err(),
      PolyError::DegenerateFace { face: 0, degree: 2 }
    );
    assert_eq!(
      Polyhedron::from_parts(vertices, vec![vec![0, 1, 5]]).unwrap_err(),
      PolyError::InvalidVertexRef {
        face: 0,
        vertex: 5,
        nvertices: 3
      }
    );
  }

  #[test]
  fn vertex_capacity_truncates() {
    let vertices = (0..MAX_VERTICES + 50)
      .map(|i| Vector3::new(i as f32, 1.0, 0.0))
      .collect();
    let poly = Polyhedron::from_parts(vertices, vec![vec![0, 1, 2]]).unwrap();
    assert_eq!(poly.nvertices(), MAX_VERTICES);
    assert_eq!(poly.nedges(), 3);
  }
}
