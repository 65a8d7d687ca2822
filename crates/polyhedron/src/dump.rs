//! Line-oriented geometry dumps for the host tooling.
//!
//! Both formats are framed by a `#geo#` header line and an `#endgeo#` trailer.

use crate::Polyhedron;

use common::linalg::Vector3;

use std::{
  f32::consts::{PI, TAU},
  fmt,
};

const MODEL_VERTICES_PER_LINE: usize = 4;
const MODEL_EDGES_PER_LINE: usize = 10;

/// Hue (0..=255) of a vertex from its azimuth around Z, rotated by `offset`.
pub fn vertex_hue(v: &Vector3, offset: u8) -> u8 {
  let turn = (v.y.atan2(v.x) + PI) / TAU;
  ((turn * 255.0 + 0.5) as u8).wrapping_add(offset)
}

impl Polyhedron {
  /// Vertex coordinates and edge list with lengths.
  ///
  /// ```text
  /// #geo# <name> V=<n> E=<n>
  /// v <i> <x> <y> <z>
  /// e <i> <a> <b> <length>
  /// #endgeo#
  /// ```
  pub fn write_wireframe<W: fmt::Write>(&self, writer: &mut W, name: &str) -> fmt::Result {
    writeln!(writer, "#geo# {name} V={} E={}", self.nvertices(), self.nedges())?;
    for (i, v) in self.vertices.iter().enumerate() {
      writeln!(writer, "v {i} {:.6} {:.6} {:.6}", v.x, v.y, v.z)?;
    }
    for (i, edge) in self.edges().enumerate() {
      writeln!(
        writer,
        "e {i} {} {} {:.6}",
        edge.a(),
        edge.b(),
        self.edge_length(i)
      )?;
    }
    writeln!(writer, "#endgeo#")
  }

  pub fn to_wireframe_string(&self, name: &str) -> String {
    let mut string = String::new();
    let _ = self.write_wireframe(&mut string, name);
    string
  }

  /// Compact dump with per-vertex hues and face lists.
  pub fn write_model<W: fmt::Write>(
    &self,
    writer: &mut W,
    tag: &str,
    hue_offset: u8,
  ) -> fmt::Result {
    writeln!(
      writer,
      "#geo# {tag} V={} E={} F={}",
      self.nvertices(),
      self.nedges(),
      self.nfaces()
    )?;

    for (iline, chunk) in self.vertices.chunks(MODEL_VERTICES_PER_LINE).enumerate() {
      write!(writer, "V:")?;
      for (i, v) in chunk.iter().enumerate() {
        let ivertex = iline * MODEL_VERTICES_PER_LINE + i;
        let hue = vertex_hue(v, hue_offset);
        write!(writer, "{ivertex},({:.3},{:.3},{:.3},{hue}); ", v.x, v.y, v.z)?;
      }
      writeln!(writer)?;
    }

    let edges = self.edges().collect::<Vec<_>>();
    for chunk in edges.chunks(MODEL_EDGES_PER_LINE) {
      write!(writer, "E:")?;
      for edge in chunk {
        write!(writer, "({}-{}), ", edge.a(), edge.b())?;
      }
      writeln!(writer)?;
    }

    for (iface, face) in self.faces.iter().enumerate() {
      write!(writer, "f{iface}:")?;
      for v in face {
        write!(writer, "{v},")?;
      }
      writeln!(writer)?;
    }

    writeln!(writer, "#endgeo#")
  }

  pub fn to_model_string(&self, tag: &str, hue_offset: u8) -> String {
    let mut string = String::new();
    let _ = self.write_model(&mut string, tag, hue_offset);
    string
  }
}
