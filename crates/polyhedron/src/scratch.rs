//! Fixed pool of working polyhedra.
//!
//! Derivations that need an intermediate polyhedron borrow one from the pool
//! instead of allocating. A [`Scratch`] guard returns its polyhedron to the
//! pool when dropped, on every path.

use crate::{PolyError, PolyResult, Polyhedron};

use std::{
  cell::RefCell,
  ops::{Deref, DerefMut},
};

#[derive(Debug)]
pub struct ScratchPool {
  free: RefCell<Vec<Polyhedron>>,
  capacity: usize,
}

impl ScratchPool {
  /// Enough for the deepest built-in derivation chain.
  pub const DEFAULT_CAPACITY: usize = 2;

  pub fn new(capacity: usize) -> Self {
    let free = (0..capacity).map(|_| Polyhedron::with_capacity()).collect();
    Self {
      free: RefCell::new(free),
      capacity,
    }
  }

  pub fn capacity(&self) -> usize {
    self.capacity
  }
  pub fn available(&self) -> usize {
    self.free.borrow().len()
  }

  /// Borrows an empty polyhedron.
  pub fn acquire(&self) -> PolyResult<Scratch<'_>> {
    let poly = self
      .free
      .borrow_mut()
      .pop()
      .ok_or(PolyError::ScratchExhausted {
        capacity: self.capacity,
      })?;
    Ok(Scratch { pool: self, poly })
  }
}

impl Default for ScratchPool {
  fn default() -> Self {
    Self::new(Self::DEFAULT_CAPACITY)
  }
}

#[derive(Debug)]
pub struct Scratch<'p> {
  pool: &'p ScratchPool,
  poly: Polyhedron,
}

impl Deref for Scratch<'_> {
  type Target = Polyhedron;
  fn deref(&self) -> &Polyhedron {
    &self.poly
  }
}
impl DerefMut for Scratch<'_> {
  fn deref_mut(&mut self) -> &mut Polyhedron {
    &mut self.poly
  }
}

impl Drop for Scratch<'_> {
  fn drop(&mut self) {
    let mut poly = std::mem::take(&mut self.poly);
    poly.clear();
    self.pool.free.borrow_mut().push(poly);
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn guards_return_to_pool() {
    let pool = ScratchPool::new(2);
    {
      let _a = pool.acquire().unwrap();
      let _b = pool.acquire().unwrap();
      assert_eq!(pool.available(), 0);
      assert_eq!(
        pool.acquire().unwrap_err(),
        PolyError::ScratchExhausted { capacity: 2 }
      );
    }
    assert_eq!(pool.available(), 2);
  }

  #[test]
  fn released_scratch_is_empty() {
    let pool = ScratchPool::new(1);
    {
      let mut scratch = pool.acquire().unwrap();
      scratch.clone_from(&Polyhedron::tetrahedron());
      assert_eq!(scratch.nvertices(), 4);
    }
    assert!(pool.acquire().unwrap().is_empty());
  }
}
