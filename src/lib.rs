//! Ray-cast pseudo-3D renderer for maps made of textured 2D wall segments.
//!
//! One ray is traced per screen column; every hit up to the first opaque
//! surface is drawn back to front as a vertically scaled texture slice.
//!
//! Modules:
//! - `core`: world data (geometry, maze levels, viewer pose)
//! - `render`: framebuffer, textures, ray caster and column compositor
//! - `config`: render tunables
//! - `ffi`: C ABI for hosts that drive the renderer from another language

pub mod config;
pub mod core;
pub mod error;
pub mod ffi;
pub mod render;

pub use config::RenderConfig;
pub use crate::core::geometry::{Coordinate, Edge, Object, distance};
pub use error::{RenderError, Result};
pub use render::casters::{Intersection, cast_ray};
pub use render::framebuffer::{Color, Framebuffer};
pub use render::render3d::{View, render_frame, update_image};
pub use render::textures::{Texture, TextureId, TextureLookup, TextureManager, TextureRef};
