pub type Vector3 = na::Vector3<f32>;
pub type Rotation3 = na::Rotation3<f32>;

/// `a + t (b - a)`
pub fn lerp(a: &Vector3, b: &Vector3, t: f32) -> Vector3 {
  a + (b - a) * t
}

/// Scales `v` to unit length. The zero vector is returned unchanged.
pub fn normalize_or_keep(v: Vector3) -> Vector3 {
  v.try_normalize(0.0).unwrap_or(v)
}

#[cfg(test)]
mod test {
  use super::*;

  use approx::assert_relative_eq;

  #[test]
  fn lerp_endpoints() {
    let a = Vector3::new(1.0, 0.0, 0.0);
    let b = Vector3::new(0.0, 2.0, 0.0);
    assert_eq!(lerp(&a, &b, 0.0), a);
    assert_eq!(lerp(&a, &b, 1.0), b);
    assert_relative_eq!(lerp(&a, &b, 0.25).y, 0.5);
  }

  #[test]
  fn zero_vector_survives_normalization() {
    assert_eq!(normalize_or_keep(Vector3::zeros()), Vector3::zeros());
    assert_relative_eq!(normalize_or_keep(Vector3::new(0.0, 3.0, 4.0)).norm(), 1.0);
  }
}
