use std::collections::TryReserveError;

pub trait CumsumExt {
  fn cumsum(self) -> impl Iterator<Item = usize>;
}
impl<I: IntoIterator<Item = usize>> CumsumExt for I {
  fn cumsum(self) -> impl Iterator<Item = usize> {
    self.into_iter().scan(0, |acc, x| {
      *acc += x;
      Some(*acc)
    })
  }
}

/// Prefix sums starting at zero: element `i` is the sum of the first `i` values.
/// Yields one more element than the input.
pub fn exclusive_cumsum(values: impl IntoIterator<Item = usize>) -> impl Iterator<Item = usize> {
  std::iter::once(0).chain(values.cumsum())
}

pub trait IterAllEqExt<T> {
  fn all_eq(self) -> Option<T>;
}
impl<T: PartialEq, I: IntoIterator<Item = T>> IterAllEqExt<T> for I {
  fn all_eq(self) -> Option<T> {
    let mut iter = self.into_iter();
    let first = iter.next()?;
    iter.all(|elem| elem == first).then_some(first)
  }
}

/// Whether `perm` contains every index in `0..perm.len()` exactly once.
pub fn is_permutation(perm: &[usize]) -> bool {
  let mut seen = vec![false; perm.len()];
  perm
    .iter()
    .all(|&p| p < perm.len() && !std::mem::replace(&mut seen[p], true))
}

/// `inverse[perm[i]] == i`. `perm` must be a permutation.
pub fn inverse_permutation(perm: &[usize]) -> Vec<usize> {
  let mut inverse = vec![0; perm.len()];
  for (i, &p) in perm.iter().enumerate() {
    inverse[p] = i;
  }
  inverse
}

/// Allocates `len` copies of `value`, reporting allocation failure instead of aborting.
pub fn try_filled_vec<T: Clone>(len: usize, value: T) -> Result<Vec<T>, TryReserveError> {
  let mut vec = Vec::new();
  vec.try_reserve_exact(len)?;
  vec.resize(len, value);
  Ok(vec)
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn exclusive_prefix_sums() {
    let sums: Vec<_> = exclusive_cumsum([3, 1, 4]).collect();
    assert_eq!(sums, vec![0, 3, 4, 8]);
  }

  #[test]
  fn permutation_check() {
    assert!(is_permutation(&[]));
    assert!(is_permutation(&[2, 0, 1]));
    assert!(!is_permutation(&[0, 0, 1]));
    assert!(!is_permutation(&[0, 3, 1]));
  }

  #[test]
  fn inverse_undoes_permutation() {
    let perm = [2, 0, 3, 1];
    let inverse = inverse_permutation(&perm);
    for (i, &p) in perm.iter().enumerate() {
      assert_eq!(inverse[p], i);
    }
  }

  #[test]
  fn all_eq() {
    assert_eq!([24, 24, 24].all_eq(), Some(24));
    assert_eq!([24, 17].all_eq(), None);
    assert_eq!(Vec::<usize>::new().all_eq(), None);
  }
}
