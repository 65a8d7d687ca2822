//! Framebuffer rendering onto parallel LED strips.
//!
//! Logical pixel `i` lives on strip `i / pixels_per_strip` at position
//! `i % pixels_per_strip`. Every strip has its own transport and its own
//! frame region in one shared encode buffer.

use crate::{
  color::{gamma_table, Rgb8},
  encode::{self, ColorOrder, EncodeTable, BYTES_PER_CHANNEL, BYTES_PER_LED},
};

use common::{
  transport::{TransmitStatus, Transport},
  util,
};

use tracing::{debug, trace, warn};

pub const BYTES_PER_PIXEL: usize = 3;
/// Default ceiling on framebuffer plus encode buffer bytes.
pub const DEFAULT_MAX_ALLOC: usize = 16 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
  pub color_order: ColorOrder,
  /// `None` disables gamma correction.
  pub gamma: Option<f32>,
  pub max_alloc: usize,
}

impl Default for RenderConfig {
  fn default() -> Self {
    Self {
      color_order: ColorOrder::GRB,
      gamma: Some(2.2),
      max_alloc: DEFAULT_MAX_ALLOC,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
  #[error("cannot render {npixels} pixels on {nstrips} strips")]
  InvalidLayout { npixels: usize, nstrips: usize },
  #[error("render buffers need {required} bytes, ceiling is {ceiling}")]
  BudgetExceeded { required: usize, ceiling: usize },
  #[error("failed to allocate {0} bytes of render buffers")]
  Alloc(usize),
}

/// Memory needed for `npixels` pixels spread over `nstrips` strips.
pub fn buffer_budget(npixels: usize, nstrips: usize) -> usize {
  let pixels_per_strip = npixels.div_ceil(nstrips.max(1));
  npixels * BYTES_PER_PIXEL + nstrips * encode::frame_bytes(pixels_per_strip)
}

#[derive(Debug)]
pub struct Renderer<T> {
  transports: Vec<T>,
  framebuffer: Vec<Rgb8>,
  encode_buffer: Vec<u8>,
  pixels_per_strip: usize,
  encode_table: EncodeTable,
  color_order: ColorOrder,
  gamma: Option<[u8; 256]>,
  brightness: u8,
  ready: bool,
}

impl<T: Transport> Renderer<T> {
  /// One strip per transport. Nothing is allocated until [`Self::init`].
  pub fn new(transports: Vec<T>) -> Self {
    Self {
      transports,
      framebuffer: Vec::new(),
      encode_buffer: Vec::new(),
      pixels_per_strip: 0,
      encode_table: encode::encode_table(),
      color_order: ColorOrder::default(),
      gamma: None,
      brightness: 255,
      ready: false,
    }
  }

  /// Sizes the buffers for `npixels` and readies rendering.
  ///
  /// Fails without retaining any buffer if the layout is empty, the buffers
  /// would exceed `config.max_alloc`, or allocation fails.
  pub fn init(&mut self, npixels: usize, config: &RenderConfig) -> Result<(), RenderError> {
    self.shutdown();

    let nstrips = self.transports.len();
    if npixels == 0 || nstrips == 0 {
      return Err(RenderError::InvalidLayout { npixels, nstrips });
    }

    let required = buffer_budget(npixels, nstrips);
    if required > config.max_alloc {
      return Err(RenderError::BudgetExceeded {
        required,
        ceiling: config.max_alloc,
      });
    }

    let pixels_per_strip = npixels.div_ceil(nstrips);
    let encode_len = nstrips * encode::frame_bytes(pixels_per_strip);
    self.framebuffer =
      util::try_filled_vec(npixels, Rgb8::BLACK).map_err(|_| RenderError::Alloc(required))?;
    self.encode_buffer = match util::try_filled_vec(encode_len, 0) {
      Ok(buffer) => buffer,
      Err(_) => {
        self.framebuffer = Vec::new();
        return Err(RenderError::Alloc(required));
      }
    };

    self.pixels_per_strip = pixels_per_strip;
    self.color_order = config.color_order;
    self.gamma = config.gamma.map(gamma_table);
    self.brightness = 255;
    self.ready = true;
    debug!(
      "render: {npixels} pixels on {nstrips} strips ({pixels_per_strip} per strip), {required} bytes"
    );
    Ok(())
  }

  /// Releases the buffers. Drawing and updates are ignored until the next init.
  pub fn shutdown(&mut self) {
    self.ready = false;
    self.framebuffer = Vec::new();
    self.encode_buffer = Vec::new();
    self.pixels_per_strip = 0;
  }

  pub fn is_ready(&self) -> bool {
    self.ready
  }
  pub fn npixels(&self) -> usize {
    self.framebuffer.len()
  }
  pub fn nstrips(&self) -> usize {
    self.transports.len()
  }
  pub fn pixels_per_strip(&self) -> usize {
    self.pixels_per_strip
  }
  pub fn framebuffer(&self) -> &[Rgb8] {
    &self.framebuffer
  }
  pub fn pixel(&self, index: usize) -> Option<Rgb8> {
    self.framebuffer.get(index).copied()
  }
  pub fn brightness(&self) -> u8 {
    self.brightness
  }
  pub fn transports(&self) -> &[T] {
    &self.transports
  }
  pub fn transports_mut(&mut self) -> &mut [T] {
    &mut self.transports
  }
  /// Encoded frame of one strip as last produced by [`Self::update`].
  pub fn strip_frame(&self, istrip: usize) -> Option<&[u8]> {
    self
      .encode_buffer
      .chunks(encode::frame_bytes(self.pixels_per_strip))
      .nth(istrip)
  }

  pub fn set_brightness(&mut self, brightness: u8) {
    self.brightness = brightness;
  }

  pub fn set(&mut self, index: usize, color: Rgb8) {
    if let Some(pixel) = self.framebuffer.get_mut(index) {
      *pixel = color;
    }
  }

  pub fn set_all(&mut self, color: Rgb8) {
    self.framebuffer.fill(color);
  }

  pub fn clear(&mut self) {
    self.set_all(Rgb8::BLACK);
  }

  /// Saturating per-channel add.
  pub fn add(&mut self, index: usize, color: Rgb8) {
    if color.is_black() {
      return;
    }
    if let Some(pixel) = self.framebuffer.get_mut(index) {
      *pixel = pixel.saturating_add(color);
    }
  }

  /// Per-channel subtract, clamped at zero.
  pub fn subtract(&mut self, index: usize, color: Rgb8) {
    if let Some(pixel) = self.framebuffer.get_mut(index) {
      *pixel = pixel.saturating_sub(color);
    }
  }

  /// Encodes the framebuffer and hands every strip frame to its transport.
  ///
  /// Waits until all transports have finished their previous frame. A strip
  /// whose transport still refuses the frame is skipped for this update.
  pub fn update(&mut self) {
    if !self.ready {
      return;
    }

    while !self.transports.iter().all(|t| t.is_ready()) {
      std::hint::spin_loop();
    }

    let pixels_per_strip = self.pixels_per_strip;
    let color_order = self.color_order;
    let brightness = self.brightness as u16;
    let Self {
      framebuffer,
      encode_buffer,
      transports,
      encode_table,
      gamma,
      ..
    } = self;
    let gamma = gamma.as_ref();

    let frame_bytes = encode::frame_bytes(pixels_per_strip);
    encode_buffer.fill(0);
    for (ipixel, &color) in framebuffer.iter().enumerate() {
      let (istrip, iled) = (ipixel / pixels_per_strip, ipixel % pixels_per_strip);
      let offset = istrip * frame_bytes + iled * BYTES_PER_LED;
      let corrected = color.map(|c| {
        let c = (c as u16 * brightness / 255) as u8;
        match gamma {
          Some(table) => table[c as usize],
          None => c,
        }
      });
      let led = &mut encode_buffer[offset..offset + BYTES_PER_LED];
      for (value, out) in color_order
        .arrange(corrected)
        .into_iter()
        .zip(led.chunks_exact_mut(BYTES_PER_CHANNEL))
      {
        encode::write_channel(encode_table, value, out);
      }
    }

    for (istrip, (transport, frame)) in transports
      .iter_mut()
      .zip(encode_buffer.chunks(frame_bytes))
      .enumerate()
    {
      if transport.transmit(frame) == TransmitStatus::Busy {
        warn!("strip {istrip} busy, frame dropped");
      }
    }
  }

  /// Completion notification from a strip transport.
  pub fn on_transmit_complete(&self, istrip: usize) {
    trace!("strip {istrip} transmit complete");
  }
}

#[cfg(test)]
mod test {
  use super::*;

  use common::transport::MemoryTransport;

  #[test]
  fn budget_formula() {
    // 720 pixels on one strip: 2160 framebuffer + 720 * 9 + 1 encode
    assert_eq!(buffer_budget(720, 1), 8641);
    assert_eq!(buffer_budget(720, 2), 2160 + 2 * (360 * 9 + 1));
    assert_eq!(buffer_budget(3, 2), 9 + 2 * 19);
  }

  #[test]
  fn drawing_before_init_is_ignored() {
    let mut renderer = Renderer::new(vec![MemoryTransport::new()]);
    renderer.set(0, Rgb8::WHITE);
    renderer.add(0, Rgb8::WHITE);
    renderer.update();
    assert_eq!(renderer.pixel(0), None);
    assert!(renderer.transports()[0].frames().is_empty());
  }
}
