//! Built-in solids.
//!
//! Four solids are literal tables. The rest are derived from those through
//! [`Polyhedron::dual_into`] and [`Polyhedron::truncate_into`], using scratch
//! polyhedra for the intermediate steps.

use crate::{PolyResult, Polyhedron, ScratchPool};

use common::{linalg::Vector3, VertexIdx};

use std::{fmt, str::FromStr};

const PHI: f32 = 1.618_034;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Solid {
  Tetrahedron,
  /// Cube with every square split into two triangles.
  CubeTriangulated,
  Cube,
  Octahedron,
  Icosahedron,
  Dodecahedron,
  Icosidodecahedron,
}

impl Solid {
  pub const ALL: [Solid; 7] = [
    Solid::Tetrahedron,
    Solid::CubeTriangulated,
    Solid::Cube,
    Solid::Octahedron,
    Solid::Icosahedron,
    Solid::Dodecahedron,
    Solid::Icosidodecahedron,
  ];

  pub fn name(self) -> &'static str {
    match self {
      Solid::Tetrahedron => "tetrahedron",
      Solid::CubeTriangulated => "cube_triangulated",
      Solid::Cube => "cube",
      Solid::Octahedron => "octahedron",
      Solid::Icosahedron => "icosahedron",
      Solid::Dodecahedron => "dodecahedron",
      Solid::Icosidodecahedron => "icosidodecahedron",
    }
  }
}

impl fmt::Display for Solid {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown solid `{0}`")]
pub struct UnknownSolid(pub String);

impl FromStr for Solid {
  type Err = UnknownSolid;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Solid::ALL
      .into_iter()
      .find(|solid| solid.name().eq_ignore_ascii_case(s.trim()))
      .ok_or_else(|| UnknownSolid(s.to_string()))
  }
}

impl Polyhedron {
  pub fn tetrahedron() -> Self {
    let mut poly = Self::with_capacity();
    poly.load_tetrahedron();
    poly
  }
  /// Cube with quadrilateral faces.
  pub fn cube() -> Self {
    let mut poly = Self::with_capacity();
    poly.load_cube();
    poly
  }
  pub fn cube_triangulated() -> Self {
    let mut poly = Self::with_capacity();
    poly.load_cube_triangulated();
    poly
  }
  pub fn icosahedron() -> Self {
    let mut poly = Self::with_capacity();
    poly.load_icosahedron();
    poly
  }

  pub fn build(solid: Solid, pool: &ScratchPool) -> PolyResult<Self> {
    let mut poly = Self::with_capacity();
    poly.build_into(solid, pool)?;
    Ok(poly)
  }

  /// Replaces `self` with `solid`. On failure `self` is left unchanged.
  pub fn build_into(&mut self, solid: Solid, pool: &ScratchPool) -> PolyResult<()> {
    match solid {
      Solid::Tetrahedron => self.load_tetrahedron(),
      Solid::CubeTriangulated => self.load_cube_triangulated(),
      Solid::Cube => self.load_cube(),
      Solid::Icosahedron => self.load_icosahedron(),
      Solid::Octahedron => {
        let mut cube = pool.acquire()?;
        cube.load_cube();
        cube.dual_into(self)?;
      }
      Solid::Dodecahedron => {
        let mut icosahedron = pool.acquire()?;
        icosahedron.load_icosahedron();
        icosahedron.dual_into(self)?;
      }
      Solid::Icosidodecahedron => {
        let mut dodecahedron = pool.acquire()?;
        dodecahedron.build_into(Solid::Dodecahedron, pool)?;
        dodecahedron.truncate_into(0.5, self)?;
      }
    }
    Ok(())
  }

  fn load_table(&mut self, vertices: &[[f32; 3]], faces: &[&[VertexIdx]]) {
    self.assign(
      vertices.iter().map(|&v| Vector3::from(v)),
      faces.iter().map(|face| face.to_vec()),
    );
    self.normalize_radial();
    self.prepare();
  }

  fn load_tetrahedron(&mut self) {
    self.load_table(
      &[
        [1.0, 1.0, 1.0],
        [1.0, -1.0, -1.0],
        [-1.0, 1.0, -1.0],
        [-1.0, -1.0, 1.0],
      ],
      &[&[0, 1, 2], &[0, 3, 1], &[0, 2, 3], &[1, 3, 2]],
    );
  }

  fn load_cube(&mut self) {
    self.load_table(
      &CUBE_VERTICES,
      &[
        &[0, 2, 3, 1],
        &[4, 5, 7, 6],
        &[0, 1, 5, 4],
        &[2, 6, 7, 3],
        &[0, 4, 6, 2],
        &[1, 3, 7, 5],
      ],
    );
  }

  fn load_cube_triangulated(&mut self) {
    self.load_table(
      &CUBE_VERTICES,
      &[
        &[0, 2, 3],
        &[0, 3, 1],
        &[4, 5, 7],
        &[4, 7, 6],
        &[0, 1, 5],
        &[0, 5, 4],
        &[2, 6, 7],
        &[2, 7, 3],
        &[0, 4, 6],
        &[0, 6, 2],
        &[1, 3, 7],
        &[1, 7, 5],
      ],
    );
  }

  fn load_icosahedron(&mut self) {
    self.load_table(
      &[
        [0.0, 1.0, PHI],
        [0.0, -1.0, PHI],
        [0.0, 1.0, -PHI],
        [0.0, -1.0, -PHI],
        [1.0, PHI, 0.0],
        [-1.0, PHI, 0.0],
        [1.0, -PHI, 0.0],
        [-1.0, -PHI, 0.0],
        [PHI, 0.0, 1.0],
        [PHI, 0.0, -1.0],
        [-PHI, 0.0, 1.0],
        [-PHI, 0.0, -1.0],
      ],
      &[
        &[0, 1, 8],
        &[0, 8, 4],
        &[0, 4, 5],
        &[0, 5, 10],
        &[0, 10, 1],
        &[1, 8, 6],
        &[1, 6, 7],
        &[1, 7, 10],
        &[2, 3, 11],
        &[2, 11, 5],
        &[2, 5, 4],
        &[2, 4, 9],
        &[2, 9, 3],
        &[3, 9, 6],
        &[3, 6, 7],
        &[3, 7, 11],
        &[4, 8, 9],
        &[5, 11, 10],
        &[6, 8, 9],
        &[7, 10, 11],
      ],
    );
  }
}

const CUBE_VERTICES: [[f32; 3]; 8] = [
  [1.0, 1.0, 1.0],
  [1.0, 1.0, -1.0],
  [1.0, -1.0, 1.0],
  [1.0, -1.0, -1.0],
  [-1.0, 1.0, 1.0],
  [-1.0, 1.0, -1.0],
  [-1.0, -1.0, 1.0],
  [-1.0, -1.0, -1.0],
];
