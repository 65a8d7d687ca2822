//! Transactional rewiring.
//!
//! All changes to `edge_map`/`flip_map` go through a [`MappingEdit`]. Committing
//! validates the wiring and rebuilds the derived tables. An edit that is
//! dropped without a successful commit restores the wiring it started from,
//! so a mapping can never be observed with stale `edge_info`/`pixel_map`.

use crate::{LedMapping, MappingError};

use common::{util, EdgeIdx};

#[derive(Debug)]
pub struct MappingEdit<'m> {
  mapping: &'m mut LedMapping,
  saved_edge_map: Vec<usize>,
  saved_flip_map: Vec<bool>,
  committed: bool,
}

impl LedMapping {
  pub fn edit(&mut self) -> MappingEdit<'_> {
    MappingEdit {
      saved_edge_map: self.edge_map.clone(),
      saved_flip_map: self.flip_map.clone(),
      mapping: self,
      committed: false,
    }
  }
}

impl MappingEdit<'_> {
  pub fn edge_map(&self) -> &[usize] {
    &self.mapping.edge_map
  }
  pub fn flip_map(&self) -> &[bool] {
    &self.mapping.flip_map
  }
  pub fn edge_map_mut(&mut self) -> &mut [usize] {
    &mut self.mapping.edge_map
  }
  pub fn flip_map_mut(&mut self) -> &mut [bool] {
    &mut self.mapping.flip_map
  }

  /// Exchanges the physical slots of two logical edges.
  /// Out-of-range edges are ignored.
  pub fn swap_slots(&mut self, iedge: EdgeIdx, jedge: EdgeIdx) {
    let nedges = self.mapping.nedges();
    if iedge < nedges && jedge < nedges {
      self.mapping.edge_map.swap(iedge, jedge);
    }
  }
  pub fn set_flip(&mut self, iedge: EdgeIdx, flipped: bool) {
    if let Some(flip) = self.mapping.flip_map.get_mut(iedge) {
      *flip = flipped;
    }
  }
  pub fn toggle_flip(&mut self, iedge: EdgeIdx) {
    if let Some(flip) = self.mapping.flip_map.get_mut(iedge) {
      *flip ^= true;
    }
  }

  /// Replaces the whole wiring. Both tables must match the edge count,
  /// otherwise nothing changes.
  pub fn load(&mut self, edge_map: &[usize], flip_map: &[bool]) -> Result<(), MappingError> {
    let nedges = self.mapping.nedges();
    if edge_map.len() != nedges || flip_map.len() != nedges {
      return Err(MappingError::WiringLength {
        nedges,
        slots: edge_map.len(),
        flips: flip_map.len(),
      });
    }
    self.mapping.edge_map.copy_from_slice(edge_map);
    self.mapping.flip_map.copy_from_slice(flip_map);
    Ok(())
  }

  /// Undoes every change made through this edit.
  pub fn revert(&mut self) {
    self.mapping.edge_map.copy_from_slice(&self.saved_edge_map);
    self.mapping.flip_map.copy_from_slice(&self.saved_flip_map);
  }

  /// Validates the wiring and rebuilds the derived tables.
  /// If `edge_map` is not a permutation the edit is reverted.
  pub fn commit(mut self) -> Result<(), MappingError> {
    if !util::is_permutation(&self.mapping.edge_map) {
      return Err(MappingError::NotAPermutation(self.mapping.nedges()));
    }
    self.committed = true;
    self.mapping.update_mappings();
    Ok(())
  }
}

impl Drop for MappingEdit<'_> {
  fn drop(&mut self) {
    if !self.committed {
      self.revert();
    }
  }
}
