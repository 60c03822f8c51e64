//! CPU canvas the column compositor draws into, plus the RGBA colour type.
use serde::{Deserialize, Serialize};

use crate::error::{RenderError, Result};

/// RGBA colour, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0, 255);
    pub const WHITE: Color = Color::new(255, 255, 255, 255);
    pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Source-over blend of `src` onto `self`, driven by `src.a`.
    #[inline]
    pub fn blend_over(self, src: Color) -> Color {
        match src.a {
            255 => src,
            0 => self,
            a => {
                let a = a as u16;
                let na = 255 - a;
                let mix = |s: u8, d: u8| -> u8 { ((s as u16 * a + d as u16 * na + 127) / 255) as u8 };
                Color::new(
                    mix(src.r, self.r),
                    mix(src.g, self.g),
                    mix(src.b, self.b),
                    (a + (self.a as u16 * na + 127) / 255) as u8,
                )
            }
        }
    }
}

#[cfg(feature = "viewer")]
impl From<Color> for raylib::prelude::Color {
    fn from(c: Color) -> Self {
        raylib::prelude::Color::new(c.r, c.g, c.b, c.a)
    }
}

#[cfg(feature = "viewer")]
impl From<raylib::prelude::Color> for Color {
    fn from(c: raylib::prelude::Color) -> Self {
        Color::new(c.r, c.g, c.b, c.a)
    }
}

pub struct Framebuffer {
    pub color_buffer: Vec<Color>,
    pub width: u32,
    pub height: u32,
    pub background_color: Color,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let size = width as usize * height as usize;
        let bg = Color::BLACK;
        Self {
            color_buffer: vec![bg; size],
            width,
            height,
            background_color: bg,
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.color_buffer.fill(self.background_color);
    }

    #[inline]
    pub fn set_background_color(&mut self, c: Color) {
        self.background_color = c;
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    pub fn set_pixel_color(&mut self, x: u32, y: u32, color: Color) {
        if x < self.width && y < self.height {
            let i = self.index(x, y);
            self.color_buffer[i] = color;
        }
    }

    /// Alpha-composite `color` over whatever is already at `(x, y)`.
    #[inline]
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x < self.width && y < self.height {
            let i = self.index(x, y);
            self.color_buffer[i] = self.color_buffer[i].blend_over(color);
        }
    }

    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Color {
        if x < self.width && y < self.height {
            return self.color_buffer[self.index(x, y)];
        }
        self.background_color
    }

    /// Number of bytes a full RGBA readback takes.
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.color_buffer.len() * 4
    }

    /// Copy the canvas into `out` as row-major RGBA8, top-left origin.
    pub fn copy_rgba_into(&self, out: &mut [u8]) -> Result<()> {
        let expected = self.byte_len();
        if out.len() != expected {
            return Err(RenderError::OutputLength { expected, actual: out.len() });
        }
        for (dst, c) in out.chunks_exact_mut(4).zip(&self.color_buffer) {
            dst.copy_from_slice(&c.to_bytes());
        }
        Ok(())
    }

    /// Owned RGBA8 readback of the canvas.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.color_buffer.iter().flat_map(|c| c.to_bytes()).collect()
    }
}
