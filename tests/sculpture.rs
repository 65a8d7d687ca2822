use common::{transport::MemoryTransport, util};
use polyled::{
  command::{Command, CommandError, HELP},
  config::{Config, USER_EDGE_MAP},
  remap::REASSIGNMENT_MODE,
  Sculpture, SculptureError,
};
use polyhedron::Solid;
use render::{RenderConfig, RenderError};

fn sculpture(config: Config) -> Sculpture<MemoryTransport> {
  match Sculpture::new(config, vec![MemoryTransport::new(), MemoryTransport::new()]) {
    Ok(sculpture) => sculpture,
    Err(err) => panic!("{err}"),
  }
}

fn run(sculpture: &mut Sculpture<MemoryTransport>, msg: &str) -> Option<Result<Command, CommandError>> {
  sculpture.receive(msg.as_bytes());
  sculpture.process_commands(0)
}

fn take_log(sculpture: &Sculpture<MemoryTransport>) -> String {
  let mut link = MemoryTransport::new();
  sculpture.flush_log(&mut link, 64);
  String::from_utf8(link.bytes()).unwrap()
}

#[test]
fn default_config_drives_dodecahedron() {
  let sculpture = sculpture(Config::default());
  assert_eq!(sculpture.polyhedron().nedges(), 30);
  assert_eq!(sculpture.mapping().total_pixels(), 720);
  assert_eq!(sculpture.mapping().edge_map(), &USER_EDGE_MAP[..]);
  assert_eq!(sculpture.renderer().nstrips(), 2);
  assert_eq!(sculpture.renderer().pixels_per_strip(), 360);
}

#[test]
fn oversized_layout_is_rejected() {
  let config = Config {
    render: RenderConfig {
      max_alloc: 100,
      ..RenderConfig::default()
    },
    ..Config::default()
  };
  let result = Sculpture::new(config, vec![MemoryTransport::new()]);
  assert!(matches!(
    result,
    Err(SculptureError::Render(RenderError::BudgetExceeded { .. }))
  ));
}

#[test]
fn save_dumps_wiring_tables() {
  let mut sculpture = sculpture(Config::default());
  assert_eq!(run(&mut sculpture, "save"), Some(Ok(Command::Save)));
  let log = take_log(&sculpture);
  assert!(log.starts_with("#noprefix#\npub const USER_EDGE_MAP: [usize; EDGE_COUNT] = [\n"));
  assert!(log.contains("      10,  29,   4,  22,   0,  19,  21,  12,\n"));
  assert!(log.contains("      25,   8,   1,  18,  11,  23\n];\n"));
  assert!(log.contains("pub const USER_FLIP_MAP: [bool; EDGE_COUNT] = [\n     false, true, true, true,\n"));
  assert!(log.ends_with("     false, false\n];\n#endnoprefix#\n"));
}

#[test]
fn last_message_wins() {
  let mut sculpture = sculpture(Config::default());
  sculpture.receive(b"m");
  sculpture.receive(b"#dumpgeo#");
  assert_eq!(sculpture.process_commands(0), Some(Ok(Command::DumpModel)));
  assert_eq!(sculpture.process_commands(0), None);
  let log = take_log(&sculpture);
  assert!(log.starts_with("#geo# poly V=20 E=30 F=12\n"));
  assert!(!log.contains("Mode"));
}

#[test]
fn bad_input_answers_with_help() {
  let mut sculpture = sculpture(Config::default());
  assert!(matches!(run(&mut sculpture, "x"), Some(Err(CommandError::Unknown(_)))));
  assert_eq!(take_log(&sculpture), HELP);
  assert_eq!(run(&mut sculpture, "  \r\n"), Some(Err(CommandError::Empty)));
  assert_eq!(take_log(&sculpture), "");
}

#[test]
fn wireframe_named_after_solid() {
  let mut sculpture = sculpture(Config::default());
  run(&mut sculpture, "g");
  let log = take_log(&sculpture);
  assert!(log.starts_with("#geo# dodecahedron V=20 E=30\n"));
  assert!(log.ends_with("#endgeo#\n"));
}

#[test]
fn bar_trials_start_from_saved_wiring() {
  let mut sculpture = sculpture(Config::default());
  let before = sculpture.mapping().edge_map().to_vec();
  let iedge = sculpture
    .remap()
    .selected_edge(sculpture.polyhedron())
    .unwrap();

  run(&mut sculpture, "b");
  let mut expected = before.clone();
  expected.swap(iedge, 1);
  assert_eq!(sculpture.mapping().edge_map(), &expected[..]);

  run(&mut sculpture, "b");
  let mut expected = before.clone();
  expected.swap(iedge, 2);
  assert_eq!(sculpture.mapping().edge_map(), &expected[..]);
  assert!(util::is_permutation(sculpture.mapping().edge_map()));

  let frames = sculpture.renderer().transports()[0].frames().len();
  assert!(frames >= 2);
}

#[test]
fn flip_reverses_selected_edge() {
  let mut sculpture = sculpture(Config::default());
  let iedge = sculpture
    .remap()
    .selected_edge(sculpture.polyhedron())
    .unwrap();
  let reversed = sculpture.mapping().edge_info()[iedge].is_reversed();
  run(&mut sculpture, "r");
  assert_eq!(sculpture.mapping().edge_info()[iedge].is_reversed(), !reversed);
  run(&mut sculpture, "r");
  assert_eq!(sculpture.mapping().edge_info()[iedge].is_reversed(), reversed);
}

#[test]
fn face_changes_are_reported_once() {
  let mut sculpture = sculpture(Config::default());
  run(&mut sculpture, "f");
  assert_eq!(take_log(&sculpture), "#face# 1\n");
  run(&mut sculpture, "f 0.5");
  assert_eq!(take_log(&sculpture), "");
  assert_eq!(sculpture.remap().face(), 1);
  run(&mut sculpture, "f -2.5");
  assert_eq!(sculpture.remap().face(), 11);
  assert_eq!(take_log(&sculpture), "#face# 11\n");
}

#[test]
fn edits_ignored_outside_edit_mode() {
  let mut sculpture = sculpture(Config::default());
  run(&mut sculpture, "m --");
  assert_eq!(take_log(&sculpture), format!("Mode: {REASSIGNMENT_MODE}\n"));
  let before = sculpture.mapping().edge_map().to_vec();
  run(&mut sculpture, "b");
  run(&mut sculpture, "f");
  assert_eq!(sculpture.mapping().edge_map(), &before[..]);
  assert_eq!(sculpture.remap().face(), 0);

  sculpture.tick(0);
  assert_eq!(sculpture.renderer().brightness(), 40);
}

#[test]
fn rebuild_falls_back_to_identity_wiring() {
  let mut sculpture = sculpture(Config::default());
  run(&mut sculpture, "f");
  sculpture.rebuild(Solid::Cube).unwrap();
  assert_eq!(sculpture.remap().face(), 0);
  assert_eq!(sculpture.mapping().nedges(), 12);
  assert_eq!(sculpture.mapping().edge_map(), &(0..12).collect::<Vec<_>>()[..]);
  assert_eq!(sculpture.mapping().total_pixels(), 12 * 24);
  assert_eq!(sculpture.renderer().npixels(), 12 * 24);
}

#[test]
fn rotation_keeps_wiring() {
  let mut sculpture = sculpture(Config::default());
  sculpture
    .edit_geometry(|poly, _| {
      poly.rotate(0.3, -0.2, 0.1);
      Ok(())
    })
    .unwrap();
  assert_eq!(sculpture.mapping().edge_map(), &USER_EDGE_MAP[..]);
  assert_eq!(sculpture.mapping().total_pixels(), 720);
}

#[test]
fn huge_deltas_wrap() {
  let mut sculpture = sculpture(Config::default());
  run(&mut sculpture, "f");
  run(&mut sculpture, "e");
  run(&mut sculpture, "b");
  // 1e30 saturates to i64::MAX, which is 7 (mod 12) and 0 (mod 7)
  run(&mut sculpture, "f 1e30");
  assert_eq!(sculpture.remap().face(), 8);
  run(&mut sculpture, "e -1e30");
  assert!(sculpture.remap().slot() < 5);
  run(&mut sculpture, "b 1e30");
  assert!(sculpture.remap().bar() < 30);
  assert!(util::is_permutation(sculpture.mapping().edge_map()));
  take_log(&sculpture);

  run(&mut sculpture, "m");
  run(&mut sculpture, "m 1e30");
  assert_eq!(sculpture.remap().mode(), 1);
  assert_eq!(take_log(&sculpture), "Mode: 1\nMode: 1\n");
}
