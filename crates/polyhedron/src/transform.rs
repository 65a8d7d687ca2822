//! Rigid rotations and orientation helpers.

use crate::Polyhedron;

use common::{
  linalg::{Rotation3, Vector3},
  EdgeIdx, FaceIdx, VertexIdx,
};

impl Polyhedron {
  /// Applies `Rz(yaw) * Ry(pitch) * Rx(roll)` to every vertex.
  pub fn rotate(&mut self, yaw: f32, pitch: f32, roll: f32) {
    let rotation = Rotation3::from_euler_angles(roll, pitch, yaw);
    self.rotate_by(&rotation);
  }

  pub fn rotate_by(&mut self, rotation: &Rotation3) {
    self.vertices.iter_mut().for_each(|v| *v = rotation * *v);
    self.prepare();
  }

  /// Rotates so that the vertex points towards -Z.
  pub fn orient_to_vertex(&mut self, ivertex: VertexIdx) {
    let target = self.vertices[ivertex];
    self.point_down(target);
  }

  /// Rotates so that the edge between `v0` and `v1` faces -Z.
  ///
  /// The edge's outward direction is the sum of its adjacent face normals, or
  /// its midpoint if those cancel. Returns the edge, or `None` (and does
  /// nothing) if the vertices aren't joined by an edge.
  pub fn orient_to_edge(&mut self, v0: VertexIdx, v1: VertexIdx) -> Option<EdgeIdx> {
    let iedge = self.find_edge(v0, v1)?;
    let normal: Vector3 = self
      .edge_faces(iedge)
      .into_iter()
      .flatten()
      .map(|iface| self.face_normal(iface))
      .sum();
    let target = if normal.norm() > 1e-6 {
      normal
    } else {
      self.edge_midpoint(iedge)
    };
    self.point_down(target);
    Some(iedge)
  }

  /// Rotates so that the face normal points towards -Z.
  pub fn orient_to_face(&mut self, iface: FaceIdx) {
    let target = self.face_normal(iface);
    self.point_down(target);
  }

  /// Yaw brings `target` into the XZ plane, then pitch swings it onto -Z.
  fn point_down(&mut self, target: Vector3) {
    let yaw = -target.y.atan2(target.x);
    let pitch = target.xy().norm().atan2(-target.z);
    self.rotate(yaw, 0.0, 0.0);
    self.rotate(0.0, pitch, 0.0);
  }
}
