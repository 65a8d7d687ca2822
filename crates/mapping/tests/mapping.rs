use common::util::IterAllEqExt;
use mapping::{LedMapping, MappingError, PixelMapping, LEDS_LONGEST_EDGE};
use polyhedron::{Polyhedron, ScratchPool, Solid};

use itertools::Itertools;

fn check_bijection(mapping: &LedMapping) {
  let total = mapping.total_pixels();
  assert_eq!(total, mapping.leds_per_edge().iter().sum::<usize>());
  assert_eq!(mapping.pixel_map().len(), total);
  let physical = mapping.pixel_map().iter().map(|p| p.phys).sorted().collect_vec();
  assert_eq!(physical, (0..total).collect_vec());
}

fn check_contiguous_blocks(mapping: &LedMapping) {
  // blocks tile 0..total in slot order
  let mut blocks = mapping
    .edge_info()
    .iter()
    .enumerate()
    .map(|(iedge, info)| (mapping.edge_map()[iedge], info.block()))
    .collect_vec();
  blocks.sort_by_key(|(slot, _)| *slot);
  let mut next = 0;
  for (_, block) in blocks {
    assert_eq!(block.start, next);
    next = block.end;
  }
  assert_eq!(next, mapping.total_pixels());
}

#[test]
fn dodecahedron_has_720_pixels() {
  let pool = ScratchPool::default();
  let dodeca = Polyhedron::build(Solid::Dodecahedron, &pool).unwrap();
  let mapping = LedMapping::new(&dodeca, None, LEDS_LONGEST_EDGE).unwrap();
  assert_eq!(mapping.leds_per_edge().iter().copied().all_eq(), Some(24));
  assert_eq!(mapping.total_pixels(), 720);
  check_bijection(&mapping);
  check_contiguous_blocks(&mapping);
}

#[test]
fn identity_wiring_is_sequential() {
  let cube = Polyhedron::cube_triangulated();
  let mapping = LedMapping::new(&cube, None, LEDS_LONGEST_EDGE).unwrap();
  let counts = mapping.leds_per_edge();
  assert_eq!(counts.iter().filter(|&&c| c == 24).count(), 6);
  assert_eq!(counts.iter().filter(|&&c| c == 17).count(), 12);
  assert_eq!(mapping.total_pixels(), 6 * 24 + 12 * 17);

  let phys = mapping.pixel_map().iter().map(|p| p.phys).collect_vec();
  assert_eq!(phys, (0..mapping.total_pixels()).collect_vec());
  check_contiguous_blocks(&mapping);
}

#[test]
fn reversed_wiring_bases() {
  let tetra = Polyhedron::tetrahedron();
  let edge_map = [5, 4, 3, 2, 1, 0];
  let flip_map = [false; 6];
  let mapping = LedMapping::new(&tetra, Some((&edge_map, &flip_map)), 24).unwrap();
  for iedge in 0..6 {
    assert_eq!(mapping.edge_info()[iedge].start, 24 * (5 - iedge));
    assert_eq!(mapping.edge_led(iedge, 0), Some(24 * (5 - iedge)));
  }
  assert_eq!(mapping.edge_led(0, 24), None);
  assert_eq!(
    mapping.pixel_map()[24],
    PixelMapping {
      edge: 1,
      phys: 96
    }
  );
}

#[test]
fn invalid_user_wiring_falls_back_to_identity() {
  let tetra = Polyhedron::tetrahedron();
  let flips = [true; 6];
  for edge_map in [&[0, 1, 2, 3, 4][..], &[0, 1, 2, 3, 4, 4][..]] {
    let mapping = LedMapping::new(&tetra, Some((edge_map, &flips[..edge_map.len()])), 24).unwrap();
    assert_eq!(mapping.edge_map(), &[0, 1, 2, 3, 4, 5]);
    assert!(mapping.flip_map().iter().all(|&f| !f));
  }
}

#[test]
fn flip_reverses_single_block() {
  let cube = Polyhedron::cube_triangulated();
  let mut mapping = LedMapping::new(&cube, None, LEDS_LONGEST_EDGE).unwrap();
  let before = mapping.clone();

  let mut edit = mapping.edit();
  edit.toggle_flip(2);
  edit.commit().unwrap();

  for iedge in 0..mapping.nedges() {
    let (old, new) = (before.edge_info()[iedge], mapping.edge_info()[iedge]);
    if iedge == 2 {
      assert_eq!(new.start, old.start + old.count - 1);
      assert_eq!(new.step, -1);
      assert_eq!(new.block(), old.block());
    } else {
      assert_eq!(new, old);
    }
  }

  let block = mapping.pixel_map_block(2);
  let reversed = before.pixel_map()[block.clone()].iter().rev().copied().collect_vec();
  assert_eq!(&mapping.pixel_map()[block], &reversed[..]);
  check_bijection(&mapping);
}

#[test]
fn swapping_slots_keeps_bijection() {
  let cube = Polyhedron::cube_triangulated();
  let mut mapping = LedMapping::new(&cube, None, LEDS_LONGEST_EDGE).unwrap();
  for (i, j) in [(0, 2), (5, 17), (3, 3), (9, 1)] {
    let mut edit = mapping.edit();
    edit.swap_slots(i, j);
    edit.toggle_flip(j);
    edit.commit().unwrap();
    check_bijection(&mapping);
    check_contiguous_blocks(&mapping);
  }
}

#[test]
fn uncommitted_edit_rolls_back() {
  let tetra = Polyhedron::tetrahedron();
  let mut mapping = LedMapping::new(&tetra, None, 24).unwrap();
  {
    let mut edit = mapping.edit();
    edit.swap_slots(0, 1);
    edit.set_flip(3, true);
  }
  assert_eq!(mapping.edge_map(), &[0, 1, 2, 3, 4, 5]);
  assert!(!mapping.flip_map()[3]);
}

#[test]
fn non_permutation_commit_is_rejected() {
  let tetra = Polyhedron::tetrahedron();
  let mut mapping = LedMapping::new(&tetra, None, 24).unwrap();
  let info = mapping.edge_info().to_vec();

  let mut edit = mapping.edit();
  edit.edge_map_mut()[0] = 1;
  assert_eq!(edit.commit(), Err(MappingError::NotAPermutation(6)));

  assert_eq!(mapping.edge_map(), &[0, 1, 2, 3, 4, 5]);
  assert_eq!(mapping.edge_info(), &info[..]);
}

#[test]
fn reinit_follows_new_geometry() {
  let mut mapping = LedMapping::new(&Polyhedron::tetrahedron(), None, 24).unwrap();
  mapping
    .reinit(&Polyhedron::cube(), None, 10)
    .unwrap();
  assert_eq!(mapping.nedges(), 12);
  assert_eq!(mapping.total_pixels(), 120);
  mapping.shutdown();
  assert!(mapping.is_empty());
  assert!(mapping.pixel_map().is_empty());
}

#[test]
fn mismatched_wiring_load_is_rejected() {
  let mut mapping = LedMapping::new(&Polyhedron::tetrahedron(), None, 24).unwrap();
  let mut edit = mapping.edit();
  assert_eq!(
    edit.load(&[1, 0, 2], &[false; 6]),
    Err(MappingError::WiringLength {
      nedges: 6,
      slots: 3,
      flips: 6
    })
  );
  assert_eq!(edit.edge_map(), &[0, 1, 2, 3, 4, 5]);

  // out-of-range edges are ignored
  edit.swap_slots(0, 6);
  edit.toggle_flip(99);
  edit.set_flip(6, true);
  assert_eq!(edit.edge_map(), &[0, 1, 2, 3, 4, 5]);
  assert_eq!(edit.flip_map(), &[false; 6]);

  edit.load(&[5, 4, 3, 2, 1, 0], &[true; 6]).unwrap();
  edit.commit().unwrap();
  assert_eq!(mapping.edge_map(), &[5, 4, 3, 2, 1, 0]);
  assert!(mapping.edge_info().iter().all(|info| info.is_reversed()));
}
