//! WS2812 bit expansion.
//!
//! Each data bit becomes three line bits (`110` for one, `100` for zero), so an
//! 8-bit channel expands to 24 bits and an LED to nine bytes. A strip frame is
//! its LEDs back to back followed by one zero latch byte.

use crate::Rgb8;

use tracing::warn;

pub const BYTES_PER_CHANNEL: usize = 3;
pub const BYTES_PER_LED: usize = 3 * BYTES_PER_CHANNEL;
pub const LATCH_BYTES: usize = 1;

const BIT_ONE: u32 = 0b110;
const BIT_ZERO: u32 = 0b100;

/// Frame length for a strip of `nleds` LEDs.
pub fn frame_bytes(nleds: usize) -> usize {
  nleds * BYTES_PER_LED + LATCH_BYTES
}

/// 24-bit line pattern of every channel value, most significant bit first.
pub type EncodeTable = [u32; 256];

pub fn encode_table() -> EncodeTable {
  std::array::from_fn(|value| {
    (0..8).rev().fold(0, |out, bit| {
      let line = if value >> bit & 1 == 1 { BIT_ONE } else { BIT_ZERO };
      out << 3 | line
    })
  })
}

/// Writes the three line bytes of `value`, big-endian.
pub fn write_channel(table: &EncodeTable, value: u8, out: &mut [u8]) {
  let bits = table[value as usize];
  out[..BYTES_PER_CHANNEL].copy_from_slice(&bits.to_be_bytes()[1..]);
}

/// Wire order of the color channels, e.g. `GRB` for most WS2812 parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorOrder([usize; 3]);

impl ColorOrder {
  pub const RGB: Self = Self([0, 1, 2]);
  pub const GRB: Self = Self([1, 0, 2]);

  /// Parses channel letters. Unknown or missing letters fall back to red.
  pub fn from_letters(order: &str) -> Self {
    let mut bytes = order.bytes();
    let indices = std::array::from_fn(|_| match bytes.next().map(|c| c.to_ascii_uppercase()) {
      Some(b'R') => 0,
      Some(b'G') => 1,
      Some(b'B') => 2,
      other => {
        warn!("color order `{order}`: invalid channel {other:?}, using R");
        0
      }
    });
    Self(indices)
  }

  pub fn indices(&self) -> [usize; 3] {
    self.0
  }

  /// Channel values in wire order.
  pub fn arrange(&self, color: Rgb8) -> [u8; 3] {
    let channels = color.channels();
    self.0.map(|i| channels[i])
  }
}

impl Default for ColorOrder {
  fn default() -> Self {
    Self::GRB
  }
}
