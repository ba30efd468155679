//! Pixel-level drawing primitives over a [`PixelCanvas`].
//!
//! These are deliberately small, integer-only rasterizers in the spirit of a
//! quick self-contained graphics layer: lines, circle outlines and bitmap
//! text. Everything clips through the canvas contract, so callers can draw
//! partially (or entirely) off screen without bounds checks of their own.

use crate::canvas::PixelCanvas;
use crate::foundation::Color;

/// A single glyph bitmap borrowed from a [`Font`].
///
/// The bitmap is row-major, one byte per pixel, non-zero meaning "on".
/// How the bytes came to be (BDF parsing, embedded tables, ...) is the
/// font's business, not ours.
#[derive(Clone, Copy, Debug)]
pub struct Glyph<'a> {
    width: u32,
    height: u32,
    bitmap: &'a [u8],
}

impl<'a> Glyph<'a> {
    /// Wrap a row-major bitmap. Returns `None` when `bitmap` is shorter
    /// than `width * height`.
    pub fn new(width: u32, height: u32, bitmap: &'a [u8]) -> Option<Self> {
        if bitmap.len() < width as usize * height as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            bitmap,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_set(&self, gx: u32, gy: u32) -> bool {
        if gx >= self.width || gy >= self.height {
            return false;
        }
        self.bitmap[(gy * self.width + gx) as usize] != 0
    }
}

/// Glyph-lookup capability consumed by [`draw_text`].
///
/// Injected rather than owned so the drawing layer stays testable without
/// real font files; a stub implementation over a fixed table is enough.
pub trait Font {
    /// The glyph for `code_point`, or `None` if the font has no coverage.
    fn glyph(&self, code_point: char) -> Option<Glyph<'_>>;
}

/// Direction text is laid out in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextOrientation {
    Horizontal,
    Vertical,
}

/// Draw a line from `(x0, y0)` to `(x1, y1)` inclusive.
///
/// Bresenham over the major axis: steep lines iterate by y, shallow lines by
/// x, so diagonals never come out dotted. The degenerate single-point line
/// draws exactly one pixel.
pub fn draw_line(canvas: &mut PixelCanvas, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
    // Deltas in i64: endpoint spans can exceed i32 without the line math
    // wrapping or panicking.
    let steep =
        (i64::from(y1) - i64::from(y0)).abs() > (i64::from(x1) - i64::from(x0)).abs();

    let (mut x0, mut y0, mut x1, mut y1) = if steep {
        (y0, x0, y1, x1)
    } else {
        (x0, y0, x1, y1)
    };
    if x0 > x1 {
        std::mem::swap(&mut x0, &mut x1);
        std::mem::swap(&mut y0, &mut y1);
    }

    let dx = i64::from(x1) - i64::from(x0);
    let dy = (i64::from(y1) - i64::from(y0)).abs();
    let y_step = if y0 < y1 { 1i64 } else { -1i64 };
    let mut err = dx / 2;
    let mut y = i64::from(y0);

    for x in x0..=x1 {
        // y stays between the (i32) endpoints, so the cast is lossless.
        let py = y as i32;
        if steep {
            canvas.set_pixel(py, x, color);
        } else {
            canvas.set_pixel(x, py, color);
        }
        err -= dy;
        if err < 0 {
            y += y_step;
            err += dx;
        }
    }
}

/// Draw a circle outline of `radius` centered at `(cx, cy)`.
///
/// Midpoint circle: each octant step plots the 8-way symmetric point set.
/// Radius 0 draws the single center pixel.
pub fn draw_circle(canvas: &mut PixelCanvas, cx: i32, cy: i32, radius: u32, color: Color) {
    // Saturating plots: a center near the i32 edge clips instead of
    // wrapping. Saturated coordinates are off-canvas anyway.
    fn plot(canvas: &mut PixelCanvas, x: i64, y: i64, color: Color) {
        let x = x.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
        let y = y.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
        canvas.set_pixel(x, y, color);
    }

    let cx = i64::from(cx);
    let cy = i64::from(cy);
    let mut x = i64::from(radius);
    let mut y = 0i64;
    let mut err = 1 - x;

    while y <= x {
        plot(canvas, cx + x, cy + y, color);
        plot(canvas, cx + y, cy + x, color);
        plot(canvas, cx - x, cy + y, color);
        plot(canvas, cx - y, cy + x, color);
        plot(canvas, cx - x, cy - y, color);
        plot(canvas, cx - y, cy - x, color);
        plot(canvas, cx + x, cy - y, color);
        plot(canvas, cx + y, cy - x, color);
        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x + 1);
        }
    }
}

/// Lay out `text` one glyph per code point starting at `(x, y)` (top-left of
/// the first glyph cell).
///
/// Each drawn glyph advances the cursor by `glyph width + extra_spacing`
/// along x (horizontal) or y (vertical). Code points the font has no glyph
/// for advance by nothing and never abort the rest of the string. Returns
/// the total advance in pixels, which callers use to chain or center text.
pub fn draw_text(
    canvas: &mut PixelCanvas,
    font: &dyn Font,
    x: i32,
    y: i32,
    color: Color,
    text: &str,
    extra_spacing: i32,
    orientation: TextOrientation,
) -> i32 {
    let mut cx = x;
    let mut cy = y;
    let mut advanced: i32 = 0;

    for code_point in text.chars() {
        let Some(glyph) = font.glyph(code_point) else {
            continue;
        };
        for gy in 0..glyph.height() {
            for gx in 0..glyph.width() {
                if glyph.is_set(gx, gy) {
                    // A cursor near the i32 edge clips instead of
                    // wrapping back on canvas.
                    let px = i64::from(cx) + i64::from(gx);
                    let py = i64::from(cy) + i64::from(gy);
                    if px <= i64::from(i32::MAX) && py <= i64::from(i32::MAX) {
                        canvas.set_pixel(px as i32, py as i32, color);
                    }
                }
            }
        }
        let advance = (glyph.width().min(i32::MAX as u32) as i32).saturating_add(extra_spacing);
        match orientation {
            TextOrientation::Horizontal => cx = cx.saturating_add(advance),
            TextOrientation::Vertical => cy = cy.saturating_add(advance),
        }
        advanced = advanced.saturating_add(advance);
    }
    advanced
}
