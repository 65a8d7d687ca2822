extern crate nalgebra as na;

pub mod linalg;
pub mod transport;
pub mod util;

pub type VertexIdx = usize;
pub type EdgeIdx = usize;
pub type FaceIdx = usize;
