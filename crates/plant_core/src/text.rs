//! Bitmap text for burning labels into frames.

use font8x8::{BASIC_FONTS, UnicodeFonts};
use image::{Rgb, RgbImage};

pub const GLYPH_SIZE: u32 = 8;

/// Width and height in pixels of a single line at `scale`.
pub fn text_size(text: &str, scale: u32) -> (u32, u32) {
    let scale = scale.max(1);
    let chars = text.chars().count() as u32;
    (chars * GLYPH_SIZE * scale, GLYPH_SIZE * scale)
}

/// Draws one line with its top-left corner at (`x`, `y`). Clips at the frame edge.
pub fn draw_text(img: &mut RgbImage, x: i32, y: i32, text: &str, color: Rgb<u8>, scale: u32) {
    let scale = scale.max(1) as i32;
    let (w, h) = (img.width() as i32, img.height() as i32);
    let mut cursor_x = x;
    for ch in text.chars() {
        let glyph = BASIC_FONTS.get(ch).or_else(|| BASIC_FONTS.get('?'));
        if let Some(glyph) = glyph {
            for (row_idx, &row) in glyph.iter().enumerate() {
                for col in 0..GLYPH_SIZE as i32 {
                    if (row >> col) & 1 == 0 {
                        continue;
                    }
                    let px = cursor_x + col * scale;
                    let py = y + row_idx as i32 * scale;
                    for dy in 0..scale {
                        for dx in 0..scale {
                            let (tx, ty) = (px + dx, py + dy);
                            if tx >= 0 && ty >= 0 && tx < w && ty < h {
                                img.put_pixel(tx as u32, ty as u32, color);
                            }
                        }
                    }
                }
            }
        }
        cursor_x += GLYPH_SIZE as i32 * scale;
    }
}
