use crate::error::{LedgridError, LedgridResult};
use crate::foundation::{Color, Geometry};

/// An owned 24-bit RGB pixel surface with a fixed size.
///
/// This is the unit of exchange in ledgrid: the application draws into a
/// canvas, hands it to the display through
/// [`BufferExchange::swap_on_vsync`](crate::exchange::BufferExchange::swap_on_vsync),
/// and gets the previously displayed canvas back for reuse. The stream codec
/// snapshots and restores canvases byte-for-byte.
///
/// All per-pixel operations clip silently on out-of-range coordinates; they
/// never panic. Width and height never change after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelCanvas {
    geometry: Geometry,
    data: Vec<u8>, // row-major, 3 bytes per pixel
}

impl PixelCanvas {
    /// Create a black canvas. Fails with `InvalidDimension` if either side
    /// is zero.
    pub fn new(width: u32, height: u32) -> LedgridResult<Self> {
        Ok(Self::with_geometry(Geometry::new(width, height)?))
    }

    /// Create a black canvas from an already-validated geometry.
    pub fn with_geometry(geometry: Geometry) -> Self {
        Self {
            data: vec![0; geometry.byte_len()],
            geometry,
        }
    }

    pub fn size(&self) -> Geometry {
        self.geometry
    }

    pub fn width(&self) -> u32 {
        self.geometry.width
    }

    pub fn height(&self) -> u32 {
        self.geometry.height
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.geometry.width as usize + x as usize) * 3
    }

    /// Set one pixel. Out-of-range coordinates are a no-op.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if !self.geometry.contains(x, y) {
            return;
        }
        let i = self.offset(x as u32, y as u32);
        self.data[i] = color.r;
        self.data[i + 1] = color.g;
        self.data[i + 2] = color.b;
    }

    /// Read one pixel back, or `None` out of range.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        if !self.geometry.contains(x, y) {
            return None;
        }
        let i = self.offset(x as u32, y as u32);
        Some(Color::new(self.data[i], self.data[i + 1], self.data[i + 2]))
    }

    /// Bulk-copy a row-major `w*h` block of colors into the rectangle at
    /// `(x, y)`, intersected with the canvas bounds.
    ///
    /// Fails with `BufferTooSmall` (without writing anything) when `colors`
    /// holds fewer than `w*h` entries. Pixels falling outside the canvas are
    /// dropped; a partial overlap copies the in-bounds subset with correct
    /// row/column alignment.
    pub fn set_region(
        &mut self,
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        colors: &[Color],
    ) -> LedgridResult<()> {
        let needed = w as usize * h as usize;
        if colors.len() < needed {
            return Err(LedgridError::BufferTooSmall {
                needed,
                got: colors.len(),
            });
        }
        // Target coordinates in i64: an origin near i32::MAX must clip,
        // not wrap or panic.
        for row in 0..h {
            let ty = i64::from(y) + i64::from(row);
            if ty < 0 || ty >= i64::from(self.geometry.height) {
                continue;
            }
            let src_row = row as usize * w as usize;
            for col in 0..w {
                let tx = i64::from(x) + i64::from(col);
                if tx < 0 || tx >= i64::from(self.geometry.width) {
                    continue;
                }
                let color = colors[src_row + col as usize];
                let i = self.offset(tx as u32, ty as u32);
                self.data[i] = color.r;
                self.data[i + 1] = color.g;
                self.data[i + 2] = color.b;
            }
        }
        Ok(())
    }

    /// Fill the rectangle at `(x, y)` with one color, clipped like
    /// [`set_region`](Self::set_region).
    pub fn fill_region(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) {
        for row in 0..h {
            let ty = i64::from(y) + i64::from(row);
            if ty < 0 || ty >= i64::from(self.geometry.height) {
                continue;
            }
            for col in 0..w {
                let tx = i64::from(x) + i64::from(col);
                if tx < 0 || tx >= i64::from(self.geometry.width) {
                    continue;
                }
                let i = self.offset(tx as u32, ty as u32);
                self.data[i] = color.r;
                self.data[i + 1] = color.g;
                self.data[i + 2] = color.b;
            }
        }
    }

    /// Set every pixel to black.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Set every pixel to `color`.
    pub fn fill(&mut self, color: Color) {
        for px in self.data.chunks_exact_mut(3) {
            px[0] = color.r;
            px[1] = color.g;
            px[2] = color.b;
        }
    }

    /// The raw packed RGB bytes, row-major. This is the exact payload the
    /// stream codec writes per frame.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Overwrite the whole canvas from packed RGB bytes. Fails with
    /// `InvalidFormat` when the length is not exactly `width*height*3`.
    pub fn copy_from_bytes(&mut self, bytes: &[u8]) -> LedgridResult<()> {
        if bytes.len() != self.data.len() {
            return Err(LedgridError::invalid_format(format!(
                "pixel payload is {} bytes, a {} canvas needs {}",
                bytes.len(),
                self.geometry,
                self.data.len()
            )));
        }
        self.data.copy_from_slice(bytes);
        Ok(())
    }
}
