//! 8-bit color arithmetic.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgb8 {
  pub r: u8,
  pub g: u8,
  pub b: u8,
}

impl Rgb8 {
  pub const BLACK: Self = Self::new(0, 0, 0);
  pub const WHITE: Self = Self::new(255, 255, 255);

  pub const fn new(r: u8, g: u8, b: u8) -> Self {
    Self { r, g, b }
  }
  pub fn is_black(self) -> bool {
    self == Self::BLACK
  }
  pub fn channels(self) -> [u8; 3] {
    [self.r, self.g, self.b]
  }
  pub fn saturating_add(self, other: Self) -> Self {
    Self::new(
      qadd8(self.r, other.r),
      qadd8(self.g, other.g),
      qadd8(self.b, other.b),
    )
  }
  pub fn saturating_sub(self, other: Self) -> Self {
    Self::new(
      self.r.saturating_sub(other.r),
      self.g.saturating_sub(other.g),
      self.b.saturating_sub(other.b),
    )
  }
  pub fn map(self, f: impl Fn(u8) -> u8) -> Self {
    Self::new(f(self.r), f(self.g), f(self.b))
  }
}

impl From<[u8; 3]> for Rgb8 {
  fn from([r, g, b]: [u8; 3]) -> Self {
    Self::new(r, g, b)
  }
}
impl From<Rgb8> for [u8; 3] {
  fn from(c: Rgb8) -> Self {
    c.channels()
  }
}

/// Saturating 8-bit add.
pub fn qadd8(a: u8, b: u8) -> u8 {
  a.saturating_add(b)
}

/// `i * scale / 256`
pub fn scale8(i: u8, scale: u8) -> u8 {
  ((i as u16 * scale as u16) >> 8) as u8
}

/// Like [`scale8`], but never scales a non-zero value down to zero.
pub fn scale8_video(i: u8, scale: u8) -> u8 {
  scale8(i, scale) + (i != 0 && scale != 0) as u8
}

/// Integer HSV to RGB with six 43-wide hue regions.
pub fn hsv_to_rgb(h: u8, s: u8, v: u8) -> Rgb8 {
  if s == 0 {
    return Rgb8::new(v, v, v);
  }
  let (h, s, v) = (h as u16, s as u16, v as u16);
  let region = h / 43;
  let rem = (h - region * 43) * 6;

  let p = ((v * (255 - s)) >> 8) as u8;
  let q = ((v * (255 - ((s * rem) >> 8))) >> 8) as u8;
  let t = ((v * (255 - ((s * (255 - rem)) >> 8))) >> 8) as u8;
  let v = v as u8;

  match region {
    0 => Rgb8::new(v, t, p),
    1 => Rgb8::new(q, v, p),
    2 => Rgb8::new(p, v, t),
    3 => Rgb8::new(p, q, v),
    4 => Rgb8::new(t, p, v),
    _ => Rgb8::new(v, p, q),
  }
}

/// Perceptual rainbow: eight 32-wide hue sections with a boosted yellow.
pub fn rainbow_hsv_to_rgb(hue: u8, sat: u8, val: u8) -> Rgb8 {
  let offset = hue & 0x1f;
  let offset8 = offset << 3;
  let third = scale8(offset8, 85);
  let twothird = scale8(offset8, 170);

  let (mut r, mut g, mut b) = match hue >> 5 {
    0 => (255 - third, third, 0),
    1 => (171, 85 + third, 0),
    2 => (171 - twothird, 170 + third, 0),
    3 => (0, 255 - third, third),
    4 => (0, 171 - twothird, 85 + twothird),
    5 => (third, 0, 255 - third),
    6 => (85 + third, 0, 171 - third),
    _ => (170 + third, 0, 85 - third),
  };

  if sat != 255 {
    if sat == 0 {
      (r, g, b) = (255, 255, 255);
    } else {
      let desat = scale8_video(255 - sat, 255 - sat);
      let satfix = 255 - desat;
      let desaturate = |c: u8| {
        let c = if c != 0 { scale8_video(c, satfix) } else { c };
        c.saturating_add(desat)
      };
      (r, g, b) = (desaturate(r), desaturate(g), desaturate(b));
    }
  }

  if val != 255 {
    if val == 0 {
      (r, g, b) = (0, 0, 0);
    } else {
      let dim = |c: u8| if c != 0 { scale8_video(c, val) } else { 0 };
      (r, g, b) = (dim(r), dim(g), dim(b));
    }
  }

  Rgb8::new(r, g, b)
}

/// Signed shortest distance from hue `a` to hue `b`, in `-128..=128`.
pub fn hue_diff(a: u8, b: u8) -> i16 {
  let d = b as i16 - a as i16;
  if d > 128 {
    d - 256
  } else if d < -128 {
    d + 256
  } else {
    d
  }
}

/// `round((i / 255)^gamma * 255)` for every 8-bit value.
pub fn gamma_table(gamma: f32) -> [u8; 256] {
  std::array::from_fn(|i| ((i as f32 / 255.0).powf(gamma) * 255.0 + 0.5) as u8)
}
