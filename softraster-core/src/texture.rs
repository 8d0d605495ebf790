/// Texel storage with nearest-neighbour lookup
use crate::buffer::Color;

/// RGBA texture. Row 0 is the bottom of the image so that texel
/// coordinates follow UV orientation (v = 0 at the bottom).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Texture {
    width: usize,
    height: usize,
    texels: Vec<Color>,
}

impl Texture {
    /// An empty texture stands in for a missing one; nothing samples from it
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from bottom-up rows of texels; `None` if the length does not match
    pub fn new(width: usize, height: usize, texels: Vec<Color>) -> Option<Self> {
        (texels.len() == width * height).then_some(Self {
            width,
            height,
            texels,
        })
    }

    /// Build from tightly packed RGBA8 bytes, bottom row first
    pub fn from_rgba8(width: usize, height: usize, bytes: &[u8]) -> Option<Self> {
        if bytes.len() != width * height * 4 {
            return None;
        }
        let texels = bytes
            .chunks_exact(4)
            .map(|px| Color::from_rgba([px[0], px[1], px[2], px[3]]))
            .collect();
        Self::new(width, height, texels)
    }

    /// A 1x1 texture of a single color
    pub fn solid(color: Color) -> Self {
        Self {
            width: 1,
            height: 1,
            texels: vec![color],
        }
    }

    /// `cells` x `cells` checkerboard, each cell `cell_size` texels wide
    pub fn checkerboard(cells: usize, cell_size: usize, a: Color, b: Color) -> Self {
        let size = cells * cell_size;
        let mut texels = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                let even = (x / cell_size + y / cell_size) % 2 == 0;
                texels.push(if even { a } else { b });
            }
        }
        Self {
            width: size,
            height: size,
            texels,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.texels.is_empty()
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Color> {
        (x < self.width && y < self.height).then(|| self.texels[y * self.width + x])
    }

    /// Nearest texel at texel-space coordinates, clamped to the edge.
    ///
    /// An empty texture yields transparent black.
    pub fn sample(&self, x: f32, y: f32) -> Color {
        if self.is_empty() {
            return Color::default();
        }
        // `as` saturates and maps NaN to 0
        let tx = (x.floor() as isize).clamp(0, self.width as isize - 1) as usize;
        let ty = (y.floor() as isize).clamp(0, self.height as isize - 1) as usize;
        self.texels[ty * self.width + tx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_nearest() {
        let texture = Texture::checkerboard(2, 2, Color::WHITE, Color::BLACK);
        assert_eq!(texture.width(), 4);
        assert_eq!(texture.sample(0.5, 0.5), Color::WHITE);
        assert_eq!(texture.sample(2.9, 1.2), Color::BLACK);
        assert_eq!(texture.sample(3.99, 3.99), Color::WHITE);
    }

    #[test]
    fn test_sample_clamps_out_of_range() {
        let texture = Texture::checkerboard(2, 1, Color::RED, Color::BLUE);
        assert_eq!(texture.sample(-5.0, 0.0), Color::RED);
        assert_eq!(texture.sample(2.0, 0.0), Color::BLUE);
        assert_eq!(texture.sample(100.0, 100.0), Color::RED);
        assert_eq!(texture.sample(f32::NAN, f32::NAN), Color::RED);
    }

    #[test]
    fn test_empty_texture() {
        let texture = Texture::empty();
        assert!(texture.is_empty());
        assert_eq!(texture.sample(0.0, 0.0), Color::default());
    }

    #[test]
    fn test_from_rgba8_length_check() {
        assert!(Texture::from_rgba8(2, 1, &[0; 7]).is_none());
        let texture = Texture::from_rgba8(2, 1, &[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        assert_eq!(texture.get_pixel(1, 0), Some(Color::with_alpha(5, 6, 7, 8)));
    }
}
