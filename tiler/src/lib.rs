//! A software triangle rasterizer with three interchangeable visibility strategies:
//! per-triangle parallel with thread-private buffers, tile-based forward, and tile-based deferred.

pub mod error;
pub mod math;
pub mod render;

pub use error::RenderError;
