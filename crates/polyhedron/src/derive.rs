//! Derived solids: dual and vertex truncation.
//!
//! Both write into a caller-provided output and leave it untouched when they
//! fail. Results are projected onto the unit sphere and re-prepared.

use crate::{
  PolyError, PolyResult, Polyhedron, ScratchPool, MAX_FACES, MAX_FACE_DEGREE, MAX_VERTICES,
};

use common::{
  linalg::{lerp, normalize_or_keep},
  EdgeIdx, FaceIdx, VertexIdx,
};

use itertools::Itertools;
use tracing::warn;

impl Polyhedron {
  pub fn dual(&self) -> PolyResult<Polyhedron> {
    let mut out = Polyhedron::with_capacity();
    self.dual_into(&mut out)?;
    Ok(out)
  }

  /// One vertex per face (its centroid), one face per vertex (the faces around it).
  pub fn dual_into(&self, out: &mut Polyhedron) -> PolyResult<()> {
    if self.nfaces() > MAX_VERTICES || self.nvertices() > MAX_FACES {
      return Err(PolyError::DualCapacity {
        nvertices: self.nvertices(),
        nfaces: self.nfaces(),
      });
    }

    let vertices = (0..self.nfaces())
      .map(|iface| normalize_or_keep(self.face_centroid(iface)))
      .collect_vec();
    let faces = (0..self.nvertices())
      .map(|ivertex| self.vertex_star_cycle(ivertex))
      .collect_vec();

    out.assign(vertices, faces);
    out.normalize_radial();
    out.prepare();
    Ok(())
  }

  /// Replaces `self` with its dual.
  pub fn dual_in_place(&mut self, pool: &ScratchPool) -> PolyResult<()> {
    let mut input = pool.acquire()?;
    input.clone_from(self);
    input.dual_into(self)
  }

  /// Faces containing `ivertex`, ordered so that consecutive faces share an edge.
  fn vertex_star_cycle(&self, ivertex: VertexIdx) -> Vec<FaceIdx> {
    let star = (0..self.nfaces())
      .filter(|&iface| self.faces[iface].contains(&ivertex))
      .take(MAX_FACE_DEGREE)
      .collect_vec();
    if star.len() <= 2 {
      return star;
    }

    let mut used = vec![false; star.len()];
    let mut cycle = Vec::with_capacity(star.len());
    used[0] = true;
    cycle.push(star[0]);
    while cycle.len() < star.len() {
      let prev = cycle[cycle.len() - 1];
      let next = (0..star.len())
        .find(|&j| !used[j] && self.shared_vertex_count(prev, star[j]) == 2);
      match next {
        Some(j) => {
          used[j] = true;
          cycle.push(star[j]);
        }
        None => {
          warn!("faces around vertex {ivertex} do not form a cycle");
          cycle.extend(star.iter().zip(&used).filter(|&(_, &u)| !u).map(|(&f, _)| f));
        }
      }
    }
    cycle
  }

  fn shared_vertex_count(&self, iface: FaceIdx, jface: FaceIdx) -> usize {
    let other = &self.faces[jface];
    self.faces[iface]
      .iter()
      .filter(|&v| other.contains(v))
      .count()
  }
}

impl Polyhedron {
  pub fn truncate(&self, t: f32) -> PolyResult<Polyhedron> {
    let mut out = Polyhedron::with_capacity();
    self.truncate_into(t, &mut out)?;
    Ok(out)
  }

  /// Cuts every vertex off at fraction `t` along each incident edge.
  ///
  /// Each edge contributes two new vertices, one near each endpoint. Each
  /// original face keeps its cut points in order, and each original vertex
  /// gains a face made of the cut points around it.
  pub fn truncate_into(&self, t: f32, out: &mut Polyhedron) -> PolyResult<()> {
    if !(t > 0.0 && t <= 0.5) {
      return Err(PolyError::InvalidTruncation(t));
    }

    let vertices = self
      .edges()
      .flat_map(|edge| {
        let (pa, pb) = (&self.vertices[edge.a()], &self.vertices[edge.b()]);
        [lerp(pa, pb, t), lerp(pb, pa, t)]
      })
      .collect_vec();

    let cut_near = |iedge: EdgeIdx, ivertex: VertexIdx| {
      if self.edge(iedge).a() == ivertex {
        2 * iedge
      } else {
        2 * iedge + 1
      }
    };

    let face_faces = self.faces.iter().map(|face| {
      face
        .iter()
        .copied()
        .circular_tuple_windows()
        .filter_map(|(vi, vj)| self.find_edge(vi, vj).map(|iedge| cut_near(iedge, vi)))
        .collect_vec()
    });
    let vertex_faces = (0..self.nvertices()).map(|ivertex| {
      self
        .vertex_edges(ivertex)
        .take(MAX_FACE_DEGREE)
        .map(|iedge| cut_near(iedge, ivertex))
        .collect_vec()
    });
    let faces = face_faces.chain(vertex_faces).collect_vec();

    out.assign(vertices, faces);
    out.normalize_radial();
    out.prepare();
    Ok(())
  }

  /// Replaces `self` with its truncation.
  pub fn truncate_in_place(&mut self, t: f32, pool: &ScratchPool) -> PolyResult<()> {
    let mut input = pool.acquire()?;
    input.clone_from(self);
    input.truncate_into(t, self)
  }
}
