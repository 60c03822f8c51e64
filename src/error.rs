//! Error types for the renderer's boundary operations.
//!
//! Ray casting itself never fails: degenerate geometry is skipped. Only the
//! calls that accept caller-supplied buffers, textures or files validate.

use thiserror::Error;

use crate::render::textures::TextureId;

/// Errors reported by texture creation, frame setup and level/config loading.
#[derive(Error, Debug)]
pub enum RenderError {
    /// A texture was requested with a zero width or height.
    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    EmptyTexture { width: u32, height: u32 },

    /// The pixel buffer does not hold `width * height * 4` bytes.
    #[error("expected {expected} bytes of RGBA pixel data, got {actual}")]
    PixelDataLength { expected: usize, actual: usize },

    /// An edge refers to a texture the registry does not know.
    #[error("unknown texture {0:?}")]
    UnknownTexture(TextureId),

    /// The output buffer cannot hold a full frame.
    #[error("output buffer holds {actual} bytes, frame needs {expected}")]
    OutputLength { expected: usize, actual: usize },

    /// Frame parameters out of range.
    #[error("invalid view: {0}")]
    InvalidView(String),

    /// Malformed RON configuration.
    #[error("config parse error: {0}")]
    Config(#[from] ron::error::SpannedError),

    /// The config could not be written out as RON.
    #[error("config serialize error: {0}")]
    Serialize(#[from] ron::Error),

    /// Malformed maze text.
    #[error("maze parse error: {0}")]
    Maze(String),

    /// Reading a config or level file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for renderer operations.
pub type Result<T> = std::result::Result<T, RenderError>;
