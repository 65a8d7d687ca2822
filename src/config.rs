//! Sculpture configuration.
//!
//! Capacity limits are compile-time constants of the `polyhedron` crate. Everything
//! else is carried by [`Config`], whose `Default` describes the built hardware.

use crate::comms::{DEFAULT_DROP_CHUNK, DEFAULT_RING_SIZE};

use mapping::LEDS_LONGEST_EDGE;
use polyhedron::{ScratchPool, Solid};
use render::RenderConfig;

pub const EDGE_COUNT: usize = 30;

/// Physical slot of every logical dodecahedron edge, as wired.
#[rustfmt::skip]
pub const USER_EDGE_MAP: [usize; EDGE_COUNT] = [
   10,  29,   4,  22,   0,  19,  21,  12,
   20,  17,  28,   5,  14,  27,   6,  13,
   24,   2,  15,  26,   9,  16,   3,   7,
   25,   8,   1,  18,  11,  23,
];

/// Edges whose strip runs from the larger to the smaller vertex index.
#[rustfmt::skip]
pub const USER_FLIP_MAP: [bool; EDGE_COUNT] = [
  false, true,  true,  true,
  false, true,  false, false,
  false, true,  false, false,
  true,  true,  false, true,
  true,  true,  true,  true,
  true,  false, false, true,
  false, false, false, false,
  false, false,
];

/// Physical wiring: slot and direction per logical edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wiring {
  pub edge_map: Vec<usize>,
  pub flip_map: Vec<bool>,
}
impl Wiring {
  pub fn as_slices(&self) -> (&[usize], &[bool]) {
    (&self.edge_map, &self.flip_map)
  }
}
impl Default for Wiring {
  fn default() -> Self {
    Self {
      edge_map: USER_EDGE_MAP.to_vec(),
      flip_map: USER_FLIP_MAP.to_vec(),
    }
  }
}

#[derive(Debug, Clone)]
pub struct Config {
  pub solid: Solid,
  pub leds_longest_edge: usize,
  pub render: RenderConfig,
  /// `None` wires the edges in logical order.
  pub wiring: Option<Wiring>,
  pub log_ring_size: usize,
  pub log_drop_chunk: usize,
  pub scratch_capacity: usize,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      solid: Solid::Dodecahedron,
      leds_longest_edge: LEDS_LONGEST_EDGE,
      render: RenderConfig::default(),
      wiring: Some(Wiring::default()),
      log_ring_size: DEFAULT_RING_SIZE,
      log_drop_chunk: DEFAULT_DROP_CHUNK,
      scratch_capacity: ScratchPool::DEFAULT_CAPACITY,
    }
  }
}

impl Config {
  /// Identity wiring for `solid`.
  pub fn unwired(solid: Solid) -> Self {
    Self {
      solid,
      wiring: None,
      ..Self::default()
    }
  }
}
