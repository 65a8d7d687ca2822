//! The assembled sculpture.
//!
//! Owns the geometry, its LED wiring, the renderer and both host buffers.
//! Everything that needs the polyhedron and the mapping together lives here.

use crate::{
  command::{Command, CommandError, HELP},
  comms::{LogRing, Mailbox, SharedLogRing},
  config::{Config, Wiring},
  remap::RemapSession,
};

use common::transport::Transport;
use mapping::{LedMapping, MappingError};
use polyhedron::{PolyError, PolyResult, Polyhedron, ScratchPool, Solid};
use render::{RenderError, Renderer};

use tracing::{debug, info, warn};

const MODEL_TAG: &str = "poly";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SculptureError {
  #[error("geometry: {0}")]
  Geometry(#[from] PolyError),
  #[error("mapping: {0}")]
  Mapping(#[from] MappingError),
  #[error("render: {0}")]
  Render(#[from] RenderError),
}

/// The configured wiring, if it fits `poly`.
fn wiring_for<'c>(config: &'c Config, poly: &Polyhedron) -> Option<(&'c [usize], &'c [bool])> {
  config
    .wiring
    .as_ref()
    .filter(|wiring| wiring.edge_map.len() == poly.nedges())
    .map(Wiring::as_slices)
}

pub struct Sculpture<T> {
  config: Config,
  pool: ScratchPool,
  poly: Polyhedron,
  mapping: LedMapping,
  renderer: Renderer<T>,
  mailbox: Mailbox,
  log: SharedLogRing,
  remap: RemapSession,
}

impl<T: Transport> Sculpture<T> {
  /// Builds the configured solid and drives one LED strip per transport.
  pub fn new(config: Config, transports: Vec<T>) -> Result<Self, SculptureError> {
    let pool = ScratchPool::new(config.scratch_capacity);
    let poly = Polyhedron::build(config.solid, &pool)?;
    let mapping = LedMapping::new(&poly, wiring_for(&config, &poly), config.leds_longest_edge)?;
    let mut renderer = Renderer::new(transports);
    renderer.init(mapping.total_pixels(), &config.render)?;
    let log = SharedLogRing::new(LogRing::new(config.log_ring_size, config.log_drop_chunk));

    info!(
      "{}: {} vertices, {} edges, {} faces, {} leds",
      config.solid.name(),
      poly.nvertices(),
      poly.nedges(),
      poly.nfaces(),
      mapping.total_pixels()
    );
    Ok(Self {
      config,
      pool,
      poly,
      mapping,
      renderer,
      mailbox: Mailbox::new(),
      log,
      remap: RemapSession::new(),
    })
  }

  pub fn config(&self) -> &Config {
    &self.config
  }
  pub fn polyhedron(&self) -> &Polyhedron {
    &self.poly
  }
  pub fn mapping(&self) -> &LedMapping {
    &self.mapping
  }
  pub fn renderer(&self) -> &Renderer<T> {
    &self.renderer
  }
  pub fn renderer_mut(&mut self) -> &mut Renderer<T> {
    &mut self.renderer
  }
  pub fn remap(&self) -> &RemapSession {
    &self.remap
  }
  /// Handle to the outbound log, e.g. for [`crate::logging::init_ring`].
  pub fn log_ring(&self) -> SharedLogRing {
    self.log.clone()
  }

  /// Replaces the geometry with `solid` and rebuilds the wiring for it.
  pub fn rebuild(&mut self, solid: Solid) -> Result<(), SculptureError> {
    self.poly.build_into(solid, &self.pool)?;
    self.config.solid = solid;
    self.remap_geometry()
  }

  /// Runs a geometry operation, then rebuilds the wiring.
  ///
  /// ```ignore
  /// sculpture.edit_geometry(|poly, pool| poly.truncate_in_place(0.3, pool))?;
  /// ```
  pub fn edit_geometry<R>(
    &mut self,
    op: impl FnOnce(&mut Polyhedron, &ScratchPool) -> PolyResult<R>,
  ) -> Result<R, SculptureError> {
    let result = op(&mut self.poly, &self.pool)?;
    self.remap_geometry()?;
    Ok(result)
  }

  fn remap_geometry(&mut self) -> Result<(), SculptureError> {
    self.renderer.shutdown();
    self.mapping.reinit(
      &self.poly,
      wiring_for(&self.config, &self.poly),
      self.config.leds_longest_edge,
    )?;
    self.renderer.init(self.mapping.total_pixels(), &self.config.render)?;
    self.remap.reset_cursor();
    debug!(
      "remapped: {} edges, {} leds",
      self.mapping.nedges(),
      self.mapping.total_pixels()
    );
    Ok(())
  }

  /// Called by the host link with each received message.
  pub fn receive(&mut self, bytes: &[u8]) {
    self.mailbox.deposit(bytes);
  }

  /// Runs the pending command, if any, and returns how it parsed.
  pub fn process_commands(&mut self, now_ms: u64) -> Option<Result<Command, CommandError>> {
    let msg = self.mailbox.take()?;
    let parsed = msg.parse::<Command>();
    match &parsed {
      Ok(command) => self.execute(*command, now_ms),
      Err(CommandError::Empty) => {}
      Err(err) => {
        debug!("rejected: {err}");
        self.respond(HELP);
      }
    }
    Some(parsed)
  }

  pub fn execute(&mut self, command: Command, now_ms: u64) {
    match command {
      Command::Save => {
        let dump = self.remap.save_dump(&self.mapping);
        self.respond(&dump);
      }
      Command::Help => self.respond(HELP),
      Command::DumpModel => {
        let model = self.poly.to_model_string(MODEL_TAG, self.remap.hue());
        self.respond(&model);
      }
      Command::DumpWireframe => {
        let wireframe = self.poly.to_wireframe_string(self.config.solid.name());
        self.respond(&wireframe);
      }
      Command::Face(delta) => {
        if self.remap.change_face(delta, &self.poly) {
          if let Some(face) = self.remap.report_face() {
            self.respond(&format!("#face# {face}\n"));
          }
          self.show_edge_reassignment(now_ms);
        }
      }
      Command::Slot(delta) => {
        if self.remap.change_slot(delta, &self.poly) {
          self.show_edge_reassignment(now_ms);
        }
      }
      Command::Bar(delta) => {
        match self.remap.change_bar(delta, &self.poly, &mut self.mapping) {
          Ok(true) => self.show_edge_reassignment(now_ms),
          Ok(false) => {}
          Err(err) => warn!("bar change rejected: {err}"),
        }
      }
      Command::Flip => match self.remap.toggle_flip(&self.poly, &mut self.mapping) {
        Ok(true) => self.show_edge_reassignment(now_ms),
        Ok(false) => {}
        Err(err) => warn!("flip rejected: {err}"),
      },
      Command::Mode(delta) => {
        let mode = self.remap.change_mode(delta);
        self.respond(&format!("Mode: {mode}\n"));
      }
      Command::Hue(delta) => self.remap.change_hue(delta),
    }
  }

  pub fn show_edge_reassignment(&mut self, now_ms: u64) {
    self
      .remap
      .show_edge_reassignment(&self.poly, &self.mapping, &mut self.renderer, now_ms);
  }

  /// Periodic UI refresh.
  pub fn tick(&mut self, now_ms: u64) {
    self
      .remap
      .ui_tick(&self.poly, &self.mapping, &mut self.renderer, now_ms);
  }

  fn respond(&self, text: &str) {
    self.log.lock().push_str(text);
  }

  /// Sends queued log output to `link` until it is empty or `link` is busy.
  pub fn flush_log(&self, link: &mut impl Transport, max_chunk: usize) -> usize {
    self.log.lock().drain_all(link, max_chunk)
  }
}
