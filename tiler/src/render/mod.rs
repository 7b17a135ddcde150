pub mod binning;
pub mod buffer;
pub mod coverage;
pub mod framebuffer;
pub mod model;
pub mod per_triangle;
pub mod region;
pub mod renderer;
pub mod rgba;
pub mod setup;
pub mod shader;
pub mod shading;
pub mod stats;
pub mod texture;
pub mod tiled;
pub mod tiled_deferred;
pub mod transform;
pub mod vertex;
pub mod viewport;

pub use binning::*;
pub use buffer::*;
pub use coverage::*;
pub use framebuffer::*;
pub use model::*;
pub use per_triangle::*;
pub use region::*;
pub use renderer::*;
pub use rgba::*;
pub use setup::*;
pub use shader::*;
pub use shading::*;
pub use stats::*;
pub use texture::*;
pub use tiled::*;
pub use tiled_deferred::*;
pub use transform::*;
pub use vertex::*;
pub use viewport::*;
