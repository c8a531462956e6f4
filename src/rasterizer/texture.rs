//! Decoded textures and nearest-neighbor sampling

use std::path::Path;
use image::GenericImageView;
use crate::error::AssetError;
use super::math::Vec2;
use super::types::Color;

/// Decoded image, row-major with the origin at the top-left
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Color>,
    pub name: String,
}

impl Texture {
    /// Texture filled with a single color
    pub fn solid(width: usize, height: usize, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width * height],
            name: "solid".to_string(),
        }
    }

    /// Load a texture from an image file (png, jpeg or bmp)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let img = image::open(path)?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let texture = Self::from_image(&img, name);
        log::info!("Loaded texture: {} ({}x{})", texture.name, texture.width, texture.height);
        Ok(texture)
    }

    /// Decode a texture from encoded image bytes
    pub fn from_bytes(bytes: &[u8], name: String) -> Result<Self, AssetError> {
        let img = image::load_from_memory(bytes)?;
        Ok(Self::from_image(&img, name))
    }

    fn from_image(img: &image::DynamicImage, name: String) -> Self {
        let (width, height) = img.dimensions();
        let pixels: Vec<Color> = img
            .to_rgba8()
            .pixels()
            .map(|p| Color::with_alpha(p[0], p[1], p[2], p[3]))
            .collect();

        Self {
            width: width as usize,
            height: height as usize,
            pixels,
            name,
        }
    }

    /// Create a checkerboard test texture with `cell` pixel squares
    pub fn checkerboard(width: usize, height: usize, cell: usize, color1: Color, color2: Color) -> Self {
        let cell = cell.max(1);
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let checker = ((x / cell) + (y / cell)) % 2 == 0;
                pixels.push(if checker { color1 } else { color2 });
            }
        }
        Self { width, height, pixels, name: "checkerboard".to_string() }
    }

    /// Nearest-neighbor lookup. Coordinates are clamped to [0, 1], no wrapping.
    /// An empty texture samples as black.
    pub fn sample(&self, uv: Vec2) -> Color {
        if self.width == 0 || self.height == 0 {
            return Color::BLACK;
        }

        let u = clamp_unit(uv.x);
        let v = clamp_unit(uv.y);
        let px = ((u * self.width as f32).floor() as usize).min(self.width - 1);
        let py = ((v * self.height as f32).floor() as usize).min(self.height - 1);
        self.pixels[py * self.width + px]
    }

    /// Get pixel at x,y coordinates
    pub fn get_pixel(&self, x: usize, y: usize) -> Color {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x]
        } else {
            Color::BLACK
        }
    }
}

fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// Sample `texture` at normalized coordinate `uv`
pub fn sample_texture(texture: &Texture, uv: Vec2) -> Color {
    texture.sample(uv)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: usize, height: usize) -> Texture {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                pixels.push(Color::new(x as u8, y as u8, 0));
            }
        }
        Texture { width, height, pixels, name: "gradient".to_string() }
    }

    #[test]
    fn test_sample_nearest() {
        let tex = gradient(4, 4);
        assert_eq!(tex.sample(Vec2::new(0.0, 0.0)), Color::new(0, 0, 0));
        assert_eq!(tex.sample(Vec2::new(0.3, 0.6)), Color::new(1, 2, 0));
        assert_eq!(tex.sample(Vec2::new(0.99, 0.5)), Color::new(3, 2, 0));
    }

    #[test]
    fn test_sample_clamps_out_of_range() {
        let tex = gradient(8, 8);
        let clamped = tex.sample(Vec2::new(-0.5, 1.5));
        assert_eq!(clamped, tex.sample(Vec2::new(0.0, 1.0)));
        assert_eq!(clamped, Color::new(0, 7, 0));
        assert_eq!(tex.sample(Vec2::new(1.0, 1.0)), Color::new(7, 7, 0));
    }

    #[test]
    fn test_sample_nan_and_empty() {
        let tex = gradient(2, 2);
        assert_eq!(tex.sample(Vec2::new(f32::NAN, f32::NAN)), Color::new(0, 0, 0));
        let empty = Texture::solid(0, 0, Color::WHITE);
        assert_eq!(sample_texture(&empty, Vec2::new(0.5, 0.5)), Color::BLACK);
    }

    #[test]
    fn test_checkerboard_cells() {
        let tex = Texture::checkerboard(8, 8, 4, Color::WHITE, Color::BLACK);
        assert_eq!(tex.get_pixel(0, 0), Color::WHITE);
        assert_eq!(tex.get_pixel(4, 0), Color::BLACK);
        assert_eq!(tex.get_pixel(4, 4), Color::WHITE);
        assert_eq!(tex.get_pixel(9, 9), Color::BLACK);
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        assert!(Texture::from_bytes(b"not an image", "bad".to_string()).is_err());
    }
}
