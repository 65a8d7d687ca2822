//! Framebuffer, color math and WS2812 strip encoding.

pub mod color;
pub mod encode;
pub mod renderer;

pub use color::Rgb8;
pub use encode::ColorOrder;
pub use renderer::{RenderConfig, RenderError, Renderer};
