//! Frame and depth buffers
//!
//! Both are allocated once at startup and overwritten every frame.

use crate::error::RasterError;
use super::types::Color;

fn allocate<T: Clone>(width: usize, height: usize, fill: T) -> Result<Vec<T>, RasterError> {
    if width == 0 || height == 0 {
        return Err(RasterError::EmptyBuffer { width, height });
    }
    let len = width
        .checked_mul(height)
        .ok_or(RasterError::EmptyBuffer { width, height })?;

    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|source| RasterError::Allocation { width, height, source })?;
    data.resize(len, fill);
    Ok(data)
}

/// Row-major color target, one packed `0xRRGGBBAA` per pixel
pub struct FrameBuffer {
    pub pixels: Vec<u32>,
    pub width: usize,
    pub height: usize,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Result<Self, RasterError> {
        Ok(Self {
            pixels: allocate(width, height, Color::BLACK.to_u32())?,
            width,
            height,
        })
    }

    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color.to_u32());
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color.to_u32();
        }
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Color {
        if x < self.width && y < self.height {
            Color::from_u32(self.pixels[y * self.width + x])
        } else {
            Color::BLACK
        }
    }

    /// Number of pixels holding exactly `color`
    pub fn count(&self, color: Color) -> usize {
        let packed = color.to_u32();
        self.pixels.iter().filter(|&&p| p == packed).count()
    }

    /// RGBA bytes for presentation
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_be_bytes()).collect()
    }

    /// Outline the inclusive rectangle `min..=max`
    pub fn draw_rect_outline(&mut self, min_x: usize, min_y: usize, max_x: usize, max_y: usize, color: Color) {
        for x in min_x..=max_x {
            self.set_pixel(x, min_y, color);
            self.set_pixel(x, max_y, color);
        }
        for y in min_y..=max_y {
            self.set_pixel(min_x, y, color);
            self.set_pixel(max_x, y, color);
        }
    }
}

/// Row-major depth target
pub struct DepthBuffer {
    pub values: Vec<f32>,
    pub width: usize,
    pub height: usize,
}

impl DepthBuffer {
    pub fn new(width: usize, height: usize) -> Result<Self, RasterError> {
        Ok(Self {
            values: allocate(width, height, f32::MAX)?,
            width,
            height,
        })
    }

    /// Reset every value to the far-most depth
    pub fn reset(&mut self) {
        self.values.fill(f32::MAX);
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        if x < self.width && y < self.height {
            self.values[y * self.width + x]
        } else {
            f32::MAX
        }
    }

    /// Less-than depth test; writes and returns true if `z` is nearer
    pub fn test_and_set(&mut self, x: usize, y: usize, z: f32) -> bool {
        if x < self.width && y < self.height {
            let idx = y * self.width + x;
            if z < self.values[idx] {
                self.values[idx] = z;
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_sized_buffers_fail() {
        assert!(matches!(FrameBuffer::new(0, 10), Err(RasterError::EmptyBuffer { .. })));
        assert!(matches!(DepthBuffer::new(10, 0), Err(RasterError::EmptyBuffer { .. })));
    }

    #[test]
    fn test_huge_buffer_fails_instead_of_aborting() {
        assert!(FrameBuffer::new(usize::MAX / 2, 4).is_err());
    }

    #[test]
    fn test_clear_and_rgba() {
        let mut fb = FrameBuffer::new(2, 1).unwrap();
        fb.clear(Color::with_alpha(10, 20, 30, 40));
        assert_eq!(fb.to_rgba8(), vec![10, 20, 30, 40, 10, 20, 30, 40]);
        assert_eq!(fb.count(Color::with_alpha(10, 20, 30, 40)), 2);
    }

    #[test]
    fn test_depth_less_than() {
        let mut db = DepthBuffer::new(1, 1).unwrap();
        assert!(db.test_and_set(0, 0, 0.5));
        assert!(!db.test_and_set(0, 0, 0.5));
        assert!(!db.test_and_set(0, 0, 0.7));
        assert!(db.test_and_set(0, 0, 0.2));
        db.reset();
        assert_eq!(db.get(0, 0), f32::MAX);
    }

    #[test]
    fn test_rect_outline() {
        let mut fb = FrameBuffer::new(5, 5).unwrap();
        fb.clear(Color::BLACK);
        fb.draw_rect_outline(1, 1, 3, 3, Color::RED);
        assert_eq!(fb.count(Color::RED), 8);
        assert_eq!(fb.get_pixel(2, 2), Color::BLACK);
        assert_eq!(fb.get_pixel(3, 3), Color::RED);
    }
}
