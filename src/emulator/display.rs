//! The 64x32 monochrome framebuffer and the XOR sprite compositor.

use std::fmt;

pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

/// The framebuffer. Pixels are 0 or 1, and both axes wrap around
/// independently when drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Display {
    pixels: [[u8; WIDTH]; HEIGHT],
}

impl Display {
    pub fn new() -> Display {
        Display {
            pixels: [[0; WIDTH]; HEIGHT],
        }
    }

    /// Get the pixel at (x, y). Coordinates are taken modulo the
    /// screen dimensions.
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.pixels[y % HEIGHT][x % WIDTH]
    }

    pub fn clear(&mut self) {
        self.pixels = [[0; WIDTH]; HEIGHT];
    }

    /// XOR-composite a sprite onto the framebuffer with its top-left
    /// corner at (x, y).
    ///
    /// Each sprite byte is one row of 8 pixels, most significant bit
    /// leftmost. A set sprite bit flips the destination pixel; an unset
    /// bit leaves it unchanged. Coordinates wrap on both axes instead of
    /// clipping. Returns 1 if any pixel was flipped from set to unset
    /// anywhere in the sprite, and 0 otherwise.
    pub fn blit(&mut self, x: usize, y: usize, sprite: &[u8]) -> u8 {
        let mut collision = 0;
        for (row, &byte) in sprite.iter().enumerate() {
            for bit in 0..8 {
                let px = (x + bit) % WIDTH;
                let py = (y + row) % HEIGHT;
                let sprite_pixel = (byte >> (7 - bit)) & 1;
                let old_pixel = self.pixels[py][px];
                if old_pixel == 1 && sprite_pixel == 1 {
                    collision = 1;
                }
                self.pixels[py][px] = old_pixel ^ sprite_pixel;
            }
        }
        collision
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Display {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.pixels {
            for &pixel in row.iter() {
                write!(f, "{}", if pixel == 1 { '█' } else { ' ' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
