//! LED sculpture driver.
//!
//! A polyhedron whose edges carry addressable LED bars. The geometry engine
//! lives in the `polyhedron` crate, the logical-to-physical wiring in
//! `mapping`, and frame output in `render`. This crate ties them to the
//! host link: commands in, log text out.

pub mod command;
pub mod comms;
pub mod config;
pub mod logging;
pub mod remap;
pub mod sculpture;

pub use command::Command;
pub use config::Config;
pub use sculpture::{Sculpture, SculptureError};
