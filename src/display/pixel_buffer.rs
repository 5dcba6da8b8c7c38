// ============================================================================
// Utility Functions
// ============================================================================

/// Alpha blend a single color channel
/// Uses fast approximation: (x + 1 + (x >> 8)) >> 8 instead of x / 255
#[inline]
fn blend_channel(src: u8, dst: u8, alpha: u16) -> u8 {
    let result = src as u16 * alpha + dst as u16 * (255 - alpha);
    ((result + 1 + (result >> 8)) >> 8) as u8
}

// ============================================================================
// PixelBuffer
// ============================================================================

/// RGBA8888 pixel buffer for software rendering
/// Byte order per pixel is A, B, G, R to match the SDL streaming texture.
pub struct PixelBuffer {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Create a new pixel buffer of the given resolution, cleared to black
    pub fn with_size(width: u32, height: u32) -> Self {
        let mut buffer = Self {
            pixels: vec![0; (width * height * 4) as usize],
            width,
            height,
        };
        buffer.clear(0, 0, 0);
        buffer
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Check if coordinates are within bounds
    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    /// Calculate byte offset for pixel at (x, y)
    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        ((y * self.width + x) * 4) as usize
    }

    /// Clear to a solid opaque color
    pub fn clear(&mut self, r: u8, g: u8, b: u8) {
        for chunk in self.pixels.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[255, b, g, r]);
        }
    }

    /// Set pixel with alpha blending
    #[inline]
    pub fn blend_pixel(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8, a: u8) {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            let alpha = a as u16;
            self.pixels[idx] = 255; // A - always opaque
            self.pixels[idx + 1] = blend_channel(b, self.pixels[idx + 1], alpha);
            self.pixels[idx + 2] = blend_channel(g, self.pixels[idx + 2], alpha);
            self.pixels[idx + 3] = blend_channel(r, self.pixels[idx + 3], alpha);
        }
    }

    /// Read a pixel from the buffer (bounds checked)
    /// Returns None if coordinates are out of bounds
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<(u8, u8, u8)> {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            Some((self.pixels[idx + 3], self.pixels[idx + 2], self.pixels[idx + 1]))
        } else {
            None
        }
    }

    /// Draw a horizontal line with alpha blending
    pub fn hline_blend(&mut self, x1: i32, x2: i32, y: i32, r: u8, g: u8, b: u8, a: u8) {
        if y < 0 || y >= self.height as i32 {
            return;
        }
        let (x1, x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let start = x1.max(0);
        let end = x2.min(self.width as i32 - 1);
        if start > end {
            return;
        }

        let alpha = a as u16;
        let first = self.pixel_index(start as u32, y as u32);
        let last = self.pixel_index(end as u32, y as u32) + 4;
        for px in self.pixels[first..last].chunks_exact_mut(4) {
            px[0] = 255;
            px[1] = blend_channel(b, px[1], alpha);
            px[2] = blend_channel(g, px[2], alpha);
            px[3] = blend_channel(r, px[3], alpha);
        }
    }

    /// Fill a circle with alpha blending (midpoint algorithm, span filled)
    pub fn fill_circle_blend(&mut self, cx: i32, cy: i32, radius: i32, r: u8, g: u8, b: u8, a: u8) {
        if radius <= 0 {
            if radius == 0 {
                self.blend_pixel(cx, cy, r, g, b, a);
            }
            return;
        }

        let mut xi = radius;
        let mut y = 0;
        let mut err = 1 - radius;

        while xi >= y {
            self.hline_blend(cx - xi, cx + xi, cy + y, r, g, b, a);
            if y != 0 {
                self.hline_blend(cx - xi, cx + xi, cy - y, r, g, b, a);
            }
            if xi != y {
                self.hline_blend(cx - y, cx + y, cy + xi, r, g, b, a);
                if y != 0 {
                    self.hline_blend(cx - y, cx + y, cy - xi, r, g, b, a);
                }
            }

            y += 1;
            if err < 0 {
                err += 2 * y + 1;
            } else {
                xi -= 1;
                err += 2 * (y - xi) + 1;
            }
        }
    }

    /// Raw bytes for SDL texture upload
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_and_read() {
        let mut buffer = PixelBuffer::with_size(4, 3);
        buffer.clear(10, 20, 30);
        assert_eq!(buffer.get_pixel(3, 2), Some((10, 20, 30)));
        assert_eq!(buffer.get_pixel(4, 0), None);
        assert_eq!(&buffer.as_bytes()[..4], &[255, 30, 20, 10]);
    }

    #[test]
    fn test_blend_extremes() {
        let mut buffer = PixelBuffer::with_size(2, 1);
        buffer.blend_pixel(0, 0, 200, 100, 50, 255);
        buffer.blend_pixel(1, 0, 200, 100, 50, 0);
        assert_eq!(buffer.get_pixel(0, 0), Some((200, 100, 50)));
        assert_eq!(buffer.get_pixel(1, 0), Some((0, 0, 0)));
    }

    #[test]
    fn test_blend_half() {
        let mut buffer = PixelBuffer::with_size(1, 1);
        buffer.blend_pixel(0, 0, 255, 255, 255, 128);
        let (r, _, _) = buffer.get_pixel(0, 0).unwrap_or_default();
        assert!((127..=129).contains(&r));
    }

    #[test]
    fn test_circle_clipped_at_edges() {
        let mut buffer = PixelBuffer::with_size(8, 8);
        buffer.fill_circle_blend(0, 0, 4, 255, 0, 0, 255);
        assert_eq!(buffer.get_pixel(0, 0), Some((255, 0, 0)));
        assert_eq!(buffer.get_pixel(7, 7), Some((0, 0, 0)));
    }

    #[test]
    fn test_circle_extent() {
        let mut buffer = PixelBuffer::with_size(16, 16);
        buffer.fill_circle_blend(8, 8, 2, 0, 255, 0, 255);
        assert_eq!(buffer.get_pixel(10, 8), Some((0, 255, 0)));
        assert_eq!(buffer.get_pixel(8, 6), Some((0, 255, 0)));
        assert_eq!(buffer.get_pixel(11, 8), Some((0, 0, 0)));
    }
}
