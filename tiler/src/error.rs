use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("failed to allocate {what} ({bytes} bytes)")]
    OutOfMemory { what: &'static str, bytes: usize },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),

    #[error("framebuffer has no color buffer")]
    MissingColorBuffer,

    #[error("framebuffer size {width}x{height} is not supported")]
    UnsupportedFramebufferSize { width: usize, height: usize },

    #[error("{what} buffer holds {len} elements, {required} required by its width, height and stride")]
    BufferTooSmall { what: &'static str, len: usize, required: usize },

    #[error("depth buffer is {depth_width}x{depth_height}, but color buffer is {width}x{height}")]
    SizeMismatch { width: usize, height: usize, depth_width: usize, depth_height: usize },

    #[error("invalid renderer configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid texture: {0}")]
    InvalidTexture(String),

    #[error("face {face} references vertex {index}, but the model has only {count} vertices")]
    InvalidFaceIndex { face: usize, index: u32, count: usize },
}

impl From<rayon::ThreadPoolBuildError> for RenderError {
    fn from(error: rayon::ThreadPoolBuildError) -> Self {
        RenderError::ThreadPool(error.to_string())
    }
}
