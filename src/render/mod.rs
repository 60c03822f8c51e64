//! Rendering: canvas, textures, ray casting and the column compositor.
//!
//! Re-exports:
//! - `framebuffer`: CPU canvas and colour type
//! - `textures`: texture registry and handles
//! - `casters`: ray/segment intersection
//! - `render3d`: per-column frame renderer
//! - `sprites`: viewer-facing billboard edges

pub mod casters;
pub mod framebuffer;
pub mod render3d;
pub mod sprites;
pub mod textures;
