//! Bitmap font rasterization for legend labels.
//!
//! The font sprite is a 16x16 grid of glyph cells covering the first 256
//! byte values, the classic `ascii.png` layout. Glyph widths are measured
//! from the alpha channel so text is not drawn on a fixed pitch.

use crate::assets::Sprite;

/// Glyph data derived from a font sprite.
#[derive(Debug, Clone)]
pub struct BitmapFont {
    sprite: Sprite,
    /// Per-character glyph widths (rightmost non-transparent pixel + 1).
    glyph_widths: [u32; 256],
    cell_w: u32,
    cell_h: u32,
}

impl BitmapFont {
    /// Build a font from a glyph-grid sprite. Returns `None` when the
    /// sprite is too small to hold a 16x16 cell grid.
    pub fn from_sprite(sprite: &Sprite) -> Option<Self> {
        let cell_w = sprite.width / 16;
        let cell_h = sprite.height / 16;
        if cell_w == 0 || cell_h == 0 {
            return None;
        }

        let mut glyph_widths = [0u32; 256];
        for ch in 0..256u32 {
            let cx = (ch % 16) * cell_w;
            let cy = (ch / 16) * cell_h;

            let mut max_x = 0;
            let mut has_pixels = false;
            for py in 0..cell_h {
                for px in 0..cell_w {
                    if sprite.get_pixel(cx + px, cy + py)[3] > 0 {
                        max_x = max_x.max(px + 1);
                        has_pixels = true;
                    }
                }
            }

            glyph_widths[ch as usize] = if has_pixels {
                // +1 for inter-glyph spacing.
                (max_x + 1).min(cell_w)
            } else {
                cell_w / 2
            };
        }

        Some(Self {
            sprite: sprite.clone(),
            glyph_widths,
            cell_w,
            cell_h,
        })
    }

    /// Integer glyph magnification for a target pixel height.
    pub fn scale_for_height(&self, height: u32) -> u32 {
        (height / self.cell_h).max(1)
    }

    /// Pixel width of a line of text at the given magnification.
    pub fn line_width(&self, text: &str, glyph_scale: u32) -> u32 {
        text.bytes()
            .map(|ch| self.glyph_widths[ch as usize] * glyph_scale)
            .sum()
    }

    /// Pixel height of a line of text at the given magnification.
    pub fn line_height(&self, glyph_scale: u32) -> u32 {
        self.cell_h * glyph_scale
    }

    /// Draw a line of text onto the canvas with its top-left corner at
    /// (x, y). Glyphs falling outside the canvas are clipped.
    pub fn draw_text(
        &self,
        canvas: &mut Sprite,
        text: &str,
        x: i32,
        y: i32,
        glyph_scale: u32,
        color: [u8; 3],
    ) {
        let mut cursor_x = x;
        for ch in text.bytes() {
            self.blit_glyph(canvas, ch, cursor_x, y, glyph_scale, color);
            cursor_x += (self.glyph_widths[ch as usize] * glyph_scale) as i32;
        }
    }

    fn blit_glyph(
        &self,
        canvas: &mut Sprite,
        ch: u8,
        dst_x: i32,
        dst_y: i32,
        glyph_scale: u32,
        color: [u8; 3],
    ) {
        let glyph_w = self.glyph_widths[ch as usize] * glyph_scale;
        let glyph_h = self.cell_h * glyph_scale;
        let gx = (ch as u32 % 16) * self.cell_w;
        let gy = (ch as u32 / 16) * self.cell_h;

        for py in 0..glyph_h {
            let src_y = gy + py / glyph_scale;
            for px in 0..glyph_w {
                let src_x = gx + px / glyph_scale;
                let alpha = self.sprite.get_pixel(src_x, src_y)[3];
                if alpha == 0 {
                    continue;
                }

                let cx = dst_x + px as i32;
                let cy = dst_y + py as i32;
                if cx < 0 || cy < 0 || cx as u32 >= canvas.width || cy as u32 >= canvas.height {
                    continue;
                }
                let (cx, cy) = (cx as u32, cy as u32);

                // Blend the glyph color onto the background by the font's
                // alpha, keeping the more opaque of the two alphas.
                let dp = canvas.get_pixel(cx, cy);
                let a = alpha as u32;
                let inv = 255 - a;
                let blend =
                    |c: u8, d: u8| -> u8 { ((c as u32 * a + d as u32 * inv + 127) / 255) as u8 };
                canvas.put_pixel(
                    cx,
                    cy,
                    [
                        blend(color[0], dp[0]),
                        blend(color[1], dp[1]),
                        blend(color[2], dp[2]),
                        alpha.max(dp[3]),
                    ],
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Font with a single opaque 4x4 block in the cell of 'A' (0x41).
    fn test_font_sprite() -> Sprite {
        let mut sprite = Sprite::new(128, 128); // 8x8 cells
        let cx = (0x41 % 16) * 8;
        let cy = (0x41 / 16) * 8;
        sprite.fill_rect(cx as i32, cy as i32, 4, 4, [255, 255, 255, 255]);
        sprite
    }

    #[test]
    fn test_glyph_width_from_alpha() {
        let font = BitmapFont::from_sprite(&test_font_sprite()).unwrap();
        // Rightmost opaque pixel at x=3, so width 4, +1 spacing = 5.
        assert_eq!(font.line_width("A", 1), 5);
        // Untouched cells report half a cell (space width).
        assert_eq!(font.line_width(" ", 1), 4);
        assert_eq!(font.line_width("AA", 2), 20);
    }

    #[test]
    fn test_scale_for_height() {
        let font = BitmapFont::from_sprite(&test_font_sprite()).unwrap();
        assert_eq!(font.scale_for_height(8), 1);
        assert_eq!(font.scale_for_height(32), 4);
        // Never zero, even when the target is smaller than a cell.
        assert_eq!(font.scale_for_height(4), 1);
    }

    #[test]
    fn test_draw_text_blits_glyph_pixels() {
        let font = BitmapFont::from_sprite(&test_font_sprite()).unwrap();
        let mut canvas = Sprite::filled(16, 16, [0, 0, 0, 255]);
        font.draw_text(&mut canvas, "A", 2, 3, 1, [255, 0, 0]);
        assert_eq!(canvas.get_pixel(2, 3), [255, 0, 0, 255]);
        assert_eq!(canvas.get_pixel(5, 6), [255, 0, 0, 255]);
        assert_eq!(canvas.get_pixel(6, 7), [0, 0, 0, 255]);
    }

    #[test]
    fn test_wide_glyph_cells_keep_measured_width() {
        // 16x16 grid of 512x1 cells; a glyph wider than 255 px must keep
        // its measured width.
        let mut sprite = Sprite::new(8192, 16);
        let cx = (0x41u32 % 16) * 512;
        let cy = 0x41u32 / 16;
        sprite.put_pixel(cx + 298, cy, [255, 255, 255, 255]);

        let font = BitmapFont::from_sprite(&sprite).unwrap();
        assert_eq!(font.line_width("A", 1), 300);
    }

    #[test]
    fn test_rejects_tiny_sprite() {
        assert!(BitmapFont::from_sprite(&Sprite::new(8, 8)).is_none());
    }
}
