use std::fmt;

use crate::error::{LedgridError, LedgridResult};

/// Display or canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Geometry {
    pub width: u32,
    pub height: u32,
}

impl Geometry {
    pub fn new(width: u32, height: u32) -> LedgridResult<Self> {
        if width == 0 || height == 0 {
            return Err(LedgridError::invalid_dimension(format!(
                "geometry must be non-zero, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Length in bytes of a packed 24-bit RGB buffer of this size.
    pub fn byte_len(self) -> usize {
        self.pixel_count() * 3
    }

    pub fn contains(self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// 24-bit RGB color. Value type, no identity.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    pub const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
    };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scale all channels by `level / 255` with rounding.
    pub fn scaled(self, level: u8) -> Self {
        fn scale(c: u8, level: u8) -> u8 {
            let c = u16::from(c);
            let level = u16::from(level);
            (((c * level) + 127) / 255) as u8
        }

        Self {
            r: scale(self.r, level),
            g: scale(self.g, level),
            b: scale(self.b, level),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_rejects_zero_dimensions() {
        assert!(Geometry::new(0, 8).is_err());
        assert!(Geometry::new(8, 0).is_err());
        assert!(Geometry::new(0, 0).is_err());
        assert!(Geometry::new(1, 1).is_ok());
    }

    #[test]
    fn geometry_byte_len_is_three_per_pixel() {
        let g = Geometry::new(4, 3).unwrap();
        assert_eq!(g.pixel_count(), 12);
        assert_eq!(g.byte_len(), 36);
    }

    #[test]
    fn geometry_contains_checks_all_edges() {
        let g = Geometry::new(4, 4).unwrap();
        assert!(g.contains(0, 0));
        assert!(g.contains(3, 3));
        assert!(!g.contains(-1, 0));
        assert!(!g.contains(0, -1));
        assert!(!g.contains(4, 0));
        assert!(!g.contains(0, 4));
    }

    #[test]
    fn color_scaled_full_and_zero() {
        let c = Color::new(10, 128, 255);
        assert_eq!(c.scaled(255), c);
        assert_eq!(c.scaled(0), Color::BLACK);
        // Half brightness rounds to nearest.
        assert_eq!(Color::new(255, 0, 0).scaled(128), Color::new(128, 0, 0));
    }
}
