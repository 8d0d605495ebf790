/// Row-major 2D pixel storage shared by the color and depth buffers
use serde::{Deserialize, Serialize};

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    255
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0, a: 255 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255, a: 255 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn from_rgba(rgba: [u8; 4]) -> Self {
        Self::with_alpha(rgba[0], rgba[1], rgba[2], rgba[3])
    }
}

/// A width x height grid of `T`, row 0 first
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer<T> {
    width: usize,
    height: usize,
    pixels: Vec<T>,
}

/// Color target of the rasterizer
pub type ColorBuffer = PixelBuffer<Color>;

/// Per-pixel nearest depth, `f32::INFINITY` where nothing was drawn
pub type DepthBuffer = PixelBuffer<f32>;

impl<T: Copy> PixelBuffer<T> {
    pub fn new(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            pixels: vec![value; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn fill(&mut self, value: T) {
        self.pixels.fill(value);
    }

    /// Change dimensions; every pixel is reset to `value`
    pub fn resize(&mut self, width: usize, height: usize, value: T) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width * height, value);
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    pub fn get(&self, x: usize, y: usize) -> Option<T> {
        self.index(x, y).map(|idx| self.pixels[idx])
    }

    /// Write a pixel; out-of-range coordinates are ignored and return `false`
    pub fn set(&mut self, x: usize, y: usize, value: T) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.pixels[idx] = value;
                true
            }
            None => false,
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.pixels
    }

    /// Contiguous rows `start..end` (clamped to the buffer height)
    pub fn rows_mut(&mut self, start: usize, end: usize) -> &mut [T] {
        let end = end.min(self.height);
        let start = start.min(end);
        &mut self.pixels[start * self.width..end * self.width]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_bounds() {
        let mut buffer = ColorBuffer::new(4, 3, Color::BLACK);
        assert!(buffer.set(3, 2, Color::RED));
        assert_eq!(buffer.get(3, 2), Some(Color::RED));
        assert!(!buffer.set(4, 0, Color::RED));
        assert!(!buffer.set(0, 3, Color::RED));
        assert_eq!(buffer.get(4, 0), None);
    }

    #[test]
    fn test_resize_resets_contents() {
        let mut depth = DepthBuffer::new(2, 2, 0.5);
        depth.resize(3, 5, f32::INFINITY);
        assert_eq!(depth.width(), 3);
        assert_eq!(depth.height(), 5);
        assert_eq!(depth.as_slice().len(), 15);
        assert!(depth.as_slice().iter().all(|d| *d == f32::INFINITY));
    }

    #[test]
    fn test_rows_mut_is_row_major() {
        let mut buffer = PixelBuffer::new(3, 4, 0u32);
        for value in buffer.rows_mut(1, 3).iter_mut() {
            *value = 7;
        }
        assert_eq!(buffer.as_slice(), &[0, 0, 0, 7, 7, 7, 7, 7, 7, 0, 0, 0]);
        assert!(buffer.rows_mut(3, 99).len() == 3);
    }
}
