//! RGBA sprite buffers and the pixel operations the renderer builds on.

use std::path::Path;

use image::ImageEncoder;

use crate::error::Result;

/// An owned RGBA8 pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 pixel data (4 bytes per pixel).
    pub pixels: Vec<u8>,
}

impl Sprite {
    /// Create a fully transparent sprite.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; width as usize * height as usize * 4],
        }
    }

    /// Create a sprite filled with a single color.
    pub fn filled(width: u32, height: u32, color: [u8; 4]) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..width as usize * height as usize {
            pixels.extend_from_slice(&color);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Decode a sprite from PNG bytes.
    pub fn from_png_bytes(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(data)?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }

    /// Builtin debug sprite (magenta/black checkerboard), used when even the
    /// asset pack's own debug texture is missing.
    pub fn placeholder() -> Self {
        let size = 16;
        let mut sprite = Self::new(size, size);
        for y in 0..size {
            for x in 0..size {
                let is_magenta = ((x / 2) + (y / 2)) % 2 == 0;
                let color = if is_magenta {
                    [255, 0, 255, 255]
                } else {
                    [0, 0, 0, 255]
                };
                sprite.put_pixel(x, y, color);
            }
        }
        sprite
    }

    /// Get a pixel at (x, y). Out-of-bounds reads return transparent black.
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0, 0, 0, 0];
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    /// Set a pixel at (x, y). Out-of-bounds writes are ignored.
    pub fn put_pixel(&mut self, x: u32, y: u32, color: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels[idx..idx + 4].copy_from_slice(&color);
    }

    /// Fill an axis-aligned rectangle, clipped to the sprite bounds.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: [u8; 4]) {
        let x0 = x.max(0) as u32;
        let y0 = y.max(0) as u32;
        let x1 = (x.saturating_add(w as i32)).max(0) as u32;
        let y1 = (y.saturating_add(h as i32)).max(0) as u32;
        for py in y0..y1.min(self.height) {
            for px in x0..x1.min(self.width) {
                self.put_pixel(px, py, color);
            }
        }
    }

    /// Alpha-composite `src` over this sprite with its top-left corner at
    /// (x, y). Source pixels outside the canvas are clipped.
    pub fn overlay(&mut self, src: &Sprite, x: i32, y: i32) {
        for sy in 0..src.height {
            let dy = y + sy as i32;
            if dy < 0 {
                continue;
            }
            let dy = dy as u32;
            if dy >= self.height {
                break;
            }
            for sx in 0..src.width {
                let dx = x + sx as i32;
                if dx < 0 || dx as u32 >= self.width {
                    continue;
                }
                let dx = dx as u32;

                let sp = src.get_pixel(sx, sy);
                let sa = sp[3] as u32;
                if sa == 0 {
                    continue;
                }
                if sa == 255 {
                    self.put_pixel(dx, dy, sp);
                    continue;
                }

                let dp = self.get_pixel(dx, dy);
                let inv = 255 - sa;
                let blend = |s: u8, d: u8| -> u8 {
                    ((s as u32 * sa + d as u32 * inv + 127) / 255) as u8
                };
                let out_a = (sa + dp[3] as u32 * inv / 255).min(255) as u8;
                self.put_pixel(
                    dx,
                    dy,
                    [blend(sp[0], dp[0]), blend(sp[1], dp[1]), blend(sp[2], dp[2]), out_a],
                );
            }
        }
    }

    /// Copy a sub-rectangle into a new sprite. The rectangle is clipped to
    /// the source bounds.
    pub fn crop(&self, x: u32, y: u32, w: u32, h: u32) -> Sprite {
        let w = w.min(self.width.saturating_sub(x));
        let h = h.min(self.height.saturating_sub(y));
        let mut out = Sprite::new(w, h);
        for py in 0..h {
            for px in 0..w {
                out.put_pixel(px, py, self.get_pixel(x + px, y + py));
            }
        }
        out
    }

    /// Top frame of a vertically stacked two-frame sheet.
    pub fn top_half(&self) -> Sprite {
        self.crop(0, 0, self.width, self.height / 2)
    }

    /// Bottom frame of a vertically stacked two-frame sheet.
    pub fn bottom_half(&self) -> Sprite {
        let half = self.height / 2;
        self.crop(0, half, self.width, self.height - half)
    }

    /// Resize with nearest-neighbor sampling. Pixel-art sprites must never
    /// go through a smoothing filter.
    pub fn resize_nearest(&self, width: u32, height: u32) -> Sprite {
        let mut out = Sprite::new(width, height);
        if self.width == 0 || self.height == 0 {
            return out;
        }
        for y in 0..height {
            let src_y = (y as u64 * self.height as u64 / height as u64) as u32;
            for x in 0..width {
                let src_x = (x as u64 * self.width as u64 / width as u64) as u32;
                out.put_pixel(x, y, self.get_pixel(src_x, src_y));
            }
        }
        out
    }

    /// Keep only the pixels where `mask` is fully opaque; everything else
    /// becomes transparent. Used by the texture maker to cut a block sprite
    /// down to a partial-block silhouette.
    pub fn masked(&self, mask: &Sprite) -> Sprite {
        let mut out = Sprite::new(self.width, self.height);
        for y in 0..self.height.min(mask.height) {
            for x in 0..self.width.min(mask.width) {
                if mask.get_pixel(x, y)[3] == 255 {
                    out.put_pixel(x, y, self.get_pixel(x, y));
                }
            }
        }
        out
    }

    /// Encode as PNG bytes.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        let cursor = std::io::Cursor::new(&mut bytes);
        let encoder = image::codecs::png::PngEncoder::new(cursor);
        encoder.write_image(
            &self.pixels,
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
        )?;
        Ok(bytes)
    }

    /// Encode as PNG and write to disk.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_png()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder() {
        let sprite = Sprite::placeholder();
        assert_eq!(sprite.width, 16);
        assert_eq!(sprite.height, 16);
        assert_eq!(sprite.get_pixel(0, 0), [255, 0, 255, 255]);
        assert_eq!(sprite.get_pixel(2, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut sprite = Sprite::new(4, 4);
        sprite.fill_rect(-2, -2, 4, 4, [255, 0, 0, 255]);
        assert_eq!(sprite.get_pixel(0, 0), [255, 0, 0, 255]);
        assert_eq!(sprite.get_pixel(1, 1), [255, 0, 0, 255]);
        assert_eq!(sprite.get_pixel(2, 2), [0, 0, 0, 0]);
    }

    #[test]
    fn test_overlay_opaque_and_transparent() {
        let mut canvas = Sprite::filled(2, 2, [10, 10, 10, 255]);
        let mut src = Sprite::new(2, 2);
        src.put_pixel(0, 0, [200, 0, 0, 255]);
        // (1, 1) stays transparent.
        canvas.overlay(&src, 0, 0);
        assert_eq!(canvas.get_pixel(0, 0), [200, 0, 0, 255]);
        assert_eq!(canvas.get_pixel(1, 1), [10, 10, 10, 255]);
    }

    #[test]
    fn test_overlay_blends_partial_alpha() {
        let mut canvas = Sprite::filled(1, 1, [0, 0, 0, 255]);
        let src = Sprite::filled(1, 1, [255, 255, 255, 128]);
        canvas.overlay(&src, 0, 0);
        let px = canvas.get_pixel(0, 0);
        assert_eq!(px[3], 255);
        assert!(px[0] > 120 && px[0] < 136);
    }

    #[test]
    fn test_overlay_negative_offset_clips() {
        let mut canvas = Sprite::new(2, 2);
        let src = Sprite::filled(2, 2, [0, 255, 0, 255]);
        canvas.overlay(&src, -1, -1);
        assert_eq!(canvas.get_pixel(0, 0), [0, 255, 0, 255]);
        assert_eq!(canvas.get_pixel(1, 1), [0, 0, 0, 0]);
    }

    #[test]
    fn test_sheet_halves() {
        let mut sheet = Sprite::new(2, 4);
        sheet.put_pixel(0, 0, [1, 1, 1, 255]);
        sheet.put_pixel(0, 2, [2, 2, 2, 255]);

        let top = sheet.top_half();
        assert_eq!(top.height, 2);
        assert_eq!(top.get_pixel(0, 0), [1, 1, 1, 255]);

        let bottom = sheet.bottom_half();
        assert_eq!(bottom.height, 2);
        assert_eq!(bottom.get_pixel(0, 0), [2, 2, 2, 255]);
    }

    #[test]
    fn test_resize_nearest_keeps_hard_edges() {
        let mut sprite = Sprite::new(2, 1);
        sprite.put_pixel(0, 0, [255, 0, 0, 255]);
        sprite.put_pixel(1, 0, [0, 255, 0, 255]);

        let scaled = sprite.resize_nearest(4, 2);
        assert_eq!(scaled.get_pixel(0, 0), [255, 0, 0, 255]);
        assert_eq!(scaled.get_pixel(1, 1), [255, 0, 0, 255]);
        assert_eq!(scaled.get_pixel(2, 0), [0, 255, 0, 255]);
        assert_eq!(scaled.get_pixel(3, 1), [0, 255, 0, 255]);
    }

    #[test]
    fn test_masked() {
        let block = Sprite::filled(2, 2, [9, 9, 9, 255]);
        let mut mask = Sprite::new(2, 2);
        mask.put_pixel(0, 0, [0, 0, 0, 255]);
        mask.put_pixel(1, 0, [0, 0, 0, 128]); // not fully opaque

        let cut = block.masked(&mask);
        assert_eq!(cut.get_pixel(0, 0), [9, 9, 9, 255]);
        assert_eq!(cut.get_pixel(1, 0), [0, 0, 0, 0]);
        assert_eq!(cut.get_pixel(0, 1), [0, 0, 0, 0]);
    }

    #[test]
    fn test_wide_sprite_addressing() {
        let mut sprite = Sprite::new(100_000, 2);
        assert_eq!(sprite.pixels.len(), 100_000 * 2 * 4);
        sprite.put_pixel(99_999, 1, [1, 2, 3, 255]);
        assert_eq!(sprite.get_pixel(99_999, 1), [1, 2, 3, 255]);
        assert_eq!(sprite.get_pixel(99_999, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn test_png_round_trip() {
        let sprite = Sprite::placeholder();
        let bytes = sprite.to_png().unwrap();
        let decoded = Sprite::from_png_bytes(&bytes).unwrap();
        assert_eq!(decoded, sprite);
    }
}
