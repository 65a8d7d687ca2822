//! Logical edges to physical LED indices.
//!
//! Every logical edge owns a contiguous block of the LED chain. `edge_map`
//! assigns each edge a physical slot, blocks are laid out in slot order, and
//! `flip_map` reverses the direction within a block. The derived tables
//! (`edge_info`, `pixel_map`) are rebuilt from these three inputs.

pub mod edit;

pub use edit::MappingEdit;

use common::{util, EdgeIdx};
use polyhedron::Polyhedron;

use std::{collections::TryReserveError, ops::Range};
use tracing::{debug, warn};

/// LEDs on the longest edge. Shorter edges get proportionally fewer.
pub const LEDS_LONGEST_EDGE: usize = 24;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
  #[error("failed to allocate mapping tables for {nedges} edges")]
  Alloc { nedges: usize },
  #[error("edge map is not a permutation of 0..{0}")]
  NotAPermutation(usize),
  #[error("wiring has {slots} slots and {flips} flips, expected {nedges} of each")]
  WiringLength {
    nedges: usize,
    slots: usize,
    flips: usize,
  },
}

/// Physical LED position of one logical pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PixelMapping {
  pub edge: EdgeIdx,
  pub phys: usize,
}

/// Where an edge's LEDs live: LED `i` along the edge is at `start + i * step`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeLedInfo {
  pub start: usize,
  pub count: usize,
  pub step: isize,
}
impl EdgeLedInfo {
  fn new(base: usize, count: usize, flipped: bool) -> Self {
    if flipped {
      Self {
        start: base + count - 1,
        count,
        step: -1,
      }
    } else {
      Self {
        start: base,
        count,
        step: 1,
      }
    }
  }

  pub fn phys(&self, i: usize) -> usize {
    self.start.wrapping_add_signed(i as isize * self.step)
  }
  pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
    (0..self.count).map(|i| self.phys(i))
  }
  pub fn is_reversed(&self) -> bool {
    self.step < 0
  }
  /// Physical range covered, regardless of direction.
  pub fn block(&self) -> Range<usize> {
    let first = if self.is_reversed() {
      self.start + 1 - self.count
    } else {
      self.start
    };
    first..first + self.count
  }
}

/// `round(len / max_len * leds_longest_edge)`, at least one per edge.
pub fn compute_leds_per_edge(poly: &Polyhedron, leds_longest_edge: usize) -> Vec<usize> {
  leds_per_edge_iter(poly, leds_longest_edge).collect()
}

fn leds_per_edge_iter(
  poly: &Polyhedron,
  leds_longest_edge: usize,
) -> impl Iterator<Item = usize> + '_ {
  let max_len = poly.max_edge_length();
  (0..poly.nedges()).map(move |iedge| {
    let len = poly.edge_length(iedge);
    let leds = if max_len > 0.0 {
      (len / max_len * leds_longest_edge as f32).round() as usize
    } else {
      0
    };
    let leds = leds.max(1);
    debug!("edge {iedge}: length {len:.4}, {leds} leds");
    leds
  })
}

#[derive(Debug, Clone, Default)]
pub struct LedMapping {
  leds_per_edge: Vec<usize>,
  edge_map: Vec<usize>,
  flip_map: Vec<bool>,
  edge_info: Vec<EdgeLedInfo>,
  /// Logical order: all pixels of edge 0, then edge 1, ...
  pixel_map: Vec<PixelMapping>,
  total_pixels: usize,
}

impl LedMapping {
  /// Builds the mapping for `poly`.
  ///
  /// `user` is an `(edge_map, flip_map)` pair. It is used when both tables
  /// match the edge count and `edge_map` is a permutation, otherwise the
  /// identity wiring applies.
  pub fn new(
    poly: &Polyhedron,
    user: Option<(&[usize], &[bool])>,
    leds_longest_edge: usize,
  ) -> Result<Self, MappingError> {
    let nedges = poly.nedges();
    let alloc_err = |_: TryReserveError| MappingError::Alloc { nedges };

    let mut leds_per_edge = util::try_filled_vec(nedges, 0).map_err(alloc_err)?;
    for (slot, leds) in leds_per_edge
      .iter_mut()
      .zip(leds_per_edge_iter(poly, leds_longest_edge))
    {
      *slot = leds;
    }
    let total_pixels = leds_per_edge.iter().sum();

    let mut mapping = Self {
      leds_per_edge,
      edge_map: util::try_filled_vec(nedges, 0).map_err(alloc_err)?,
      flip_map: util::try_filled_vec(nedges, false).map_err(alloc_err)?,
      edge_info: util::try_filled_vec(nedges, EdgeLedInfo::default()).map_err(alloc_err)?,
      pixel_map: util::try_filled_vec(total_pixels, PixelMapping::default()).map_err(alloc_err)?,
      total_pixels,
    };

    match user {
      Some((edge_map, flip_map))
        if edge_map.len() == nedges
          && flip_map.len() == nedges
          && util::is_permutation(edge_map) =>
      {
        mapping.edge_map.copy_from_slice(edge_map);
        mapping.flip_map.copy_from_slice(flip_map);
      }
      user => {
        if let Some((edge_map, flip_map)) = user {
          warn!(
            "user wiring ({} slots, {} flips) unusable for {nedges} edges, using identity",
            edge_map.len(),
            flip_map.len()
          );
        }
        mapping
          .edge_map
          .iter_mut()
          .enumerate()
          .for_each(|(i, slot)| *slot = i);
      }
    }

    mapping.update_mappings();
    debug!(
      "mapping: {nedges} edges, {} pixels",
      mapping.total_pixels
    );
    Ok(mapping)
  }

  /// Discards the current mapping and builds a new one.
  /// On failure the mapping is left empty.
  pub fn reinit(
    &mut self,
    poly: &Polyhedron,
    user: Option<(&[usize], &[bool])>,
    leds_longest_edge: usize,
  ) -> Result<(), MappingError> {
    self.shutdown();
    *self = Self::new(poly, user, leds_longest_edge)?;
    Ok(())
  }

  /// Releases all tables.
  pub fn shutdown(&mut self) {
    *self = Self::default();
  }

  /// Recomputes `edge_info` and `pixel_map` from the current wiring.
  pub fn update_mappings(&mut self) {
    let edge_at_slot = util::inverse_permutation(&self.edge_map);
    let slot_base = util::exclusive_cumsum(edge_at_slot.iter().map(|&e| self.leds_per_edge[e]))
      .collect::<Vec<_>>();

    for (iedge, info) in self.edge_info.iter_mut().enumerate() {
      let base = slot_base[self.edge_map[iedge]];
      *info = EdgeLedInfo::new(base, self.leds_per_edge[iedge], self.flip_map[iedge]);
    }

    let edge_info = &self.edge_info;
    let entries = edge_info.iter().enumerate().flat_map(|(edge, info)| {
      info.iter().map(move |phys| PixelMapping { edge, phys })
    });
    for (entry, new) in self.pixel_map.iter_mut().zip(entries) {
      *entry = new;
    }
  }
}

impl LedMapping {
  pub fn nedges(&self) -> usize {
    self.edge_map.len()
  }
  pub fn total_pixels(&self) -> usize {
    self.total_pixels
  }
  pub fn is_empty(&self) -> bool {
    self.edge_map.is_empty()
  }
  pub fn leds_per_edge(&self) -> &[usize] {
    &self.leds_per_edge
  }
  pub fn edge_map(&self) -> &[usize] {
    &self.edge_map
  }
  pub fn flip_map(&self) -> &[bool] {
    &self.flip_map
  }
  pub fn edge_info(&self) -> &[EdgeLedInfo] {
    &self.edge_info
  }
  pub fn pixel_map(&self) -> &[PixelMapping] {
    &self.pixel_map
  }

  /// Range of `pixel_map` holding the edge's logical pixels.
  pub fn pixel_map_block(&self, iedge: EdgeIdx) -> Range<usize> {
    let start = self.leds_per_edge[..iedge].iter().sum::<usize>();
    start..start + self.leds_per_edge[iedge]
  }

  /// Physical LED of the `i`th LED along a logical edge.
  pub fn edge_led(&self, iedge: EdgeIdx, i: usize) -> Option<usize> {
    let info = self.edge_info.get(iedge)?;
    (i < info.count).then(|| info.phys(i))
  }
}
