//! Interactive rewiring session.
//!
//! The operator moves a cursor over the faces of the polyhedron and the edge
//! slots of the current face, then tries physical bars for the selected
//! logical edge. Every trial starts from the wiring that was in place when
//! the slot was selected, so scrolling through bars never accumulates swaps.

use common::{transport::Transport, EdgeIdx, FaceIdx};
use mapping::{LedMapping, MappingError};
use polyhedron::{dump::vertex_hue, Polyhedron};
use render::{color::hsv_to_rgb, Renderer};

use itertools::Itertools;
use std::fmt;

pub const MODE_COUNT: u8 = 7;
/// Cursor commands only act in this mode.
pub const EDIT_MODE: u8 = 0;
/// Continuously shows the current face at reduced brightness.
pub const REASSIGNMENT_MODE: u8 = 6;

pub const BLINK_MS: u64 = 300;
const SELECTED_SATURATION: u8 = 128;
const REASSIGNMENT_BRIGHTNESS: u8 = 40;

const DUMP_EDGES_PER_LINE: usize = 8;
const DUMP_FLIPS_PER_LINE: usize = 4;

/// Whole steps accumulated so far. The fractional rest carries over.
fn take_steps(acc: &mut f32, delta: f32) -> i64 {
  *acc += delta;
  let steps = acc.trunc();
  *acc -= steps;
  steps as i64
}

/// `index + steps` modulo `len`, for any step count.
fn wrap(index: usize, steps: i64, len: usize) -> usize {
  let len = len as i64;
  (index as i64 % len + steps.rem_euclid(len)).rem_euclid(len) as usize
}

fn write_table<W: fmt::Write, T>(
  writer: &mut W,
  header: &str,
  values: &[T],
  per_line: usize,
  entry: impl Fn(&T) -> String,
) -> fmt::Result {
  writeln!(writer, "{header}")?;
  for (iline, chunk) in values.chunks(per_line).enumerate() {
    write!(writer, "    ")?;
    for (j, value) in chunk.iter().enumerate() {
      let last = iline * per_line + j + 1 == values.len();
      write!(writer, " {}{}", entry(value), if last { "" } else { "," })?;
    }
    writeln!(writer)?;
  }
  writeln!(writer, "];")
}

/// Wiring tables framed by `#noprefix#` / `#endnoprefix#`.
pub fn write_dump<W: fmt::Write>(writer: &mut W, mapping: &LedMapping) -> fmt::Result {
  writeln!(writer, "#noprefix#")?;
  write_table(
    writer,
    "pub const USER_EDGE_MAP: [usize; EDGE_COUNT] = [",
    mapping.edge_map(),
    DUMP_EDGES_PER_LINE,
    |slot| format!("{slot:>3}"),
  )?;
  write_table(
    writer,
    "pub const USER_FLIP_MAP: [bool; EDGE_COUNT] = [",
    mapping.flip_map(),
    DUMP_FLIPS_PER_LINE,
    |flip| flip.to_string(),
  )?;
  writeln!(writer, "#endnoprefix#")
}

#[derive(Debug, Clone, Default)]
pub struct RemapSession {
  mode: u8,
  face: FaceIdx,
  slot: usize,
  bar: usize,
  acc_face: f32,
  acc_slot: f32,
  acc_bar: f32,
  hue_acc: f32,
  hue: u8,
  /// Wiring at the time the current slot was selected.
  saved_edge_map: Option<Vec<usize>>,
  reported_face: Option<FaceIdx>,
  blink_on: bool,
  last_blink_ms: u64,
}

impl RemapSession {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn mode(&self) -> u8 {
    self.mode
  }
  pub fn is_editing(&self) -> bool {
    self.mode == EDIT_MODE
  }
  pub fn face(&self) -> FaceIdx {
    self.face
  }
  pub fn slot(&self) -> usize {
    self.slot
  }
  pub fn bar(&self) -> usize {
    self.bar
  }
  pub fn hue(&self) -> u8 {
    self.hue
  }

  /// Back to face 0, slot 0, bar 0. Needed whenever the polyhedron changes.
  pub fn reset_cursor(&mut self) {
    *self = Self {
      mode: self.mode,
      hue_acc: self.hue_acc,
      hue: self.hue,
      ..Self::default()
    };
  }

  /// Logical edge under the cursor.
  pub fn selected_edge(&self, poly: &Polyhedron) -> Option<EdgeIdx> {
    let verts = poly.faces().get(self.face)?;
    let v0 = *verts.get(self.slot)?;
    let v1 = verts[(self.slot + 1) % verts.len()];
    poly.find_edge(v0, v1)
  }

  /// Returns whether the cursor moved.
  pub fn change_face(&mut self, delta: f32, poly: &Polyhedron) -> bool {
    if !self.is_editing() || poly.nfaces() == 0 {
      return false;
    }
    let steps = take_steps(&mut self.acc_face, delta);
    if steps == 0 {
      return false;
    }
    self.face = wrap(self.face, steps, poly.nfaces());
    self.slot = 0;
    self.saved_edge_map = None;
    true
  }

  /// The current face, if it hasn't been reported since it last changed.
  pub fn report_face(&mut self) -> Option<FaceIdx> {
    if self.reported_face == Some(self.face) {
      return None;
    }
    self.reported_face = Some(self.face);
    Some(self.face)
  }

  /// Returns whether the cursor moved.
  pub fn change_slot(&mut self, delta: f32, poly: &Polyhedron) -> bool {
    if !self.is_editing() || self.face >= poly.nfaces() {
      return false;
    }
    let steps = take_steps(&mut self.acc_slot, delta);
    if steps == 0 {
      return false;
    }
    self.slot = wrap(self.slot, steps, poly.face_vertex_count(self.face));
    self.saved_edge_map = None;
    true
  }

  /// Moves the bar cursor and gives the selected edge that bar's slot.
  /// Returns whether the wiring was changed.
  pub fn change_bar(
    &mut self,
    delta: f32,
    poly: &Polyhedron,
    mapping: &mut LedMapping,
  ) -> Result<bool, MappingError> {
    if !self.is_editing() || mapping.nedges() == 0 {
      return Ok(false);
    }
    let steps = take_steps(&mut self.acc_bar, delta);
    if steps == 0 {
      return Ok(false);
    }
    self.bar = wrap(self.bar, steps, mapping.nedges());
    let Some(iedge) = self.selected_edge(poly) else {
      return Ok(false);
    };

    let saved = self
      .saved_edge_map
      .get_or_insert_with(|| mapping.edge_map().to_vec());
    let mut edit = mapping.edit();
    edit.edge_map_mut().copy_from_slice(saved);
    edit.swap_slots(iedge, self.bar);
    edit.commit()?;
    Ok(true)
  }

  /// Reverses the selected edge. Returns whether the wiring was changed.
  pub fn toggle_flip(
    &mut self,
    poly: &Polyhedron,
    mapping: &mut LedMapping,
  ) -> Result<bool, MappingError> {
    if !self.is_editing() {
      return Ok(false);
    }
    let Some(iedge) = self.selected_edge(poly) else {
      return Ok(false);
    };

    let saved = self
      .saved_edge_map
      .get_or_insert_with(|| mapping.edge_map().to_vec());
    let mut edit = mapping.edit();
    edit.edge_map_mut().copy_from_slice(saved);
    edit.toggle_flip(iedge);
    edit.commit()?;
    Ok(true)
  }

  /// Shifts the display hue, wrapping in `[0, 255)`.
  pub fn change_hue(&mut self, delta: f32) {
    self.hue_acc = (self.hue_acc + delta).rem_euclid(255.0);
    self.hue = self.hue_acc as u8;
  }

  /// Steps the mode by the whole part of `delta`, wrapping.
  pub fn change_mode(&mut self, delta: f32) -> u8 {
    let modes = MODE_COUNT as i64;
    self.mode = (self.mode as i64 + (delta as i64).rem_euclid(modes)).rem_euclid(modes) as u8;
    self.mode
  }

  /// The current wiring as constant tables, ready to paste into the config.
  pub fn save_dump(&self, mapping: &LedMapping) -> String {
    let mut out = String::new();
    let _ = write_dump(&mut out, mapping);
    out
  }

  /// Draws the edges of the current face, each half in the hue of its
  /// nearer vertex. The selected slot blinks.
  pub fn show_edge_reassignment<T: Transport>(
    &mut self,
    poly: &Polyhedron,
    mapping: &LedMapping,
    renderer: &mut Renderer<T>,
    now_ms: u64,
  ) {
    if now_ms.saturating_sub(self.last_blink_ms) >= BLINK_MS {
      self.blink_on = !self.blink_on;
      self.last_blink_ms = now_ms;
    }

    renderer.clear();
    if let Some(face) = poly.faces().get(self.face) {
      for (slot, (v0, v1)) in face.iter().copied().circular_tuple_windows().enumerate() {
        let Some(iedge) = poly.find_edge(v0, v1) else {
          continue;
        };
        let block = mapping.pixel_map_block(iedge);
        let half = block.len() / 2;
        let ccw = poly.face_edge_is_ccw(self.face, iedge);
        let h0 = vertex_hue(poly.vertex(v0), self.hue);
        let h1 = vertex_hue(poly.vertex(v1), self.hue);
        let sat = if slot == self.slot && !self.blink_on {
          SELECTED_SATURATION
        } else {
          255
        };

        for i in 0..block.len() {
          let idx = if ccw {
            block.start + i
          } else {
            block.end - 1 - i
          };
          let hue = if i < half { h0 } else { h1 };
          renderer.set(mapping.pixel_map()[idx].phys, hsv_to_rgb(hue, sat, 255));
        }
      }
    }
    renderer.update();
  }

  /// Periodic refresh for the modes that animate.
  pub fn ui_tick<T: Transport>(
    &mut self,
    poly: &Polyhedron,
    mapping: &LedMapping,
    renderer: &mut Renderer<T>,
    now_ms: u64,
  ) {
    if self.mode == REASSIGNMENT_MODE {
      renderer.set_brightness(REASSIGNMENT_BRIGHTNESS);
      self.show_edge_reassignment(poly, mapping, renderer, now_ms);
    } else {
      renderer.set_brightness(255);
    }
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn fractional_steps_accumulate() {
    let mut acc = 0.0;
    assert_eq!(take_steps(&mut acc, 0.5), 0);
    assert_eq!(take_steps(&mut acc, 0.5), 1);
    assert_eq!(take_steps(&mut acc, -2.25), -2);
    assert_eq!(take_steps(&mut acc, -0.75), -1);
  }

  #[test]
  fn indices_wrap_both_ways() {
    assert_eq!(wrap(0, -1, 12), 11);
    assert_eq!(wrap(11, 1, 12), 0);
    assert_eq!(wrap(3, 25, 12), 4);
    // i64::MAX = 7 (mod 12), i64::MIN = 4 (mod 12)
    assert_eq!(wrap(5, i64::MAX, 12), 0);
    assert_eq!(wrap(5, i64::MIN, 12), 9);
  }

  #[test]
  fn mode_and_hue_wrap() {
    let mut session = RemapSession::new();
    assert_eq!(session.change_mode(-1.0), 6);
    assert_eq!(session.change_mode(1.0), 0);
    assert_eq!(session.change_mode(9.0), 2);
    // saturates to i64::MAX = 0 (mod 7) and i64::MIN = 6 (mod 7)
    assert_eq!(session.change_mode(1e30), 2);
    assert_eq!(session.change_mode(-1e30), 1);
    session.change_hue(-1.0);
    assert_eq!(session.hue(), 254);
    session.change_hue(1.5);
    assert_eq!(session.hue(), 0);
  }

  #[test]
  fn face_report_only_on_change() {
    let poly = Polyhedron::cube();
    let mut session = RemapSession::new();
    assert_eq!(session.report_face(), Some(0));
    assert_eq!(session.report_face(), None);
    assert!(session.change_face(1.0, &poly));
    assert_eq!(session.report_face(), Some(1));
    assert!(!session.change_face(0.25, &poly));
    assert_eq!(session.report_face(), None);
  }
}
