//! Matrix configuration, decoupled from the core data model.
//!
//! One versioned struct with explicit defaults replaces the pile of
//! near-duplicate option shapes that panel configuration tends to grow.
//! The core never reads these fields; callers validate into a
//! [`Geometry`] and wire the rest to their hardware driver.

use crate::error::{LedgridError, LedgridResult};
use crate::foundation::Geometry;

/// Current `MatrixOptions.version` value.
pub const OPTIONS_VERSION: u32 = 1;

/// Panel configuration for a chained/parallel LED matrix setup.
///
/// Defaults describe a single 32x32 panel at full brightness. Fields absent
/// from older JSON files fall back to these defaults, so a bare `{}` is a
/// valid configuration.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MatrixOptions {
    /// Configuration schema version; bump when fields change meaning.
    pub version: u32,
    /// Rows per panel (the multiplexed scan height), typically 16/32/64.
    pub rows: u32,
    /// Columns per panel, typically 32/64.
    pub cols: u32,
    /// Panels daisy-chained to the right of the first one.
    pub chain_length: u32,
    /// Parallel chains stacked below each other.
    pub parallel: u32,
    /// Display brightness in percent, 0–100.
    pub brightness: u8,
    /// Name of the GPIO wiring profile the hardware driver should use.
    pub hardware_mapping: String,
}

impl Default for MatrixOptions {
    fn default() -> Self {
        Self {
            version: OPTIONS_VERSION,
            rows: 32,
            cols: 32,
            chain_length: 1,
            parallel: 1,
            brightness: 100,
            hardware_mapping: "regular".to_string(),
        }
    }
}

impl MatrixOptions {
    /// Parse options from JSON.
    pub fn from_json_reader(reader: impl std::io::Read) -> LedgridResult<Self> {
        serde_json::from_reader(reader)
            .map_err(|e| LedgridError::invalid_format(format!("options JSON: {e}")))
    }

    /// Check field ranges and compute the overall display geometry:
    /// `cols * chain_length` wide, `rows * parallel` tall.
    pub fn validate(&self) -> LedgridResult<Geometry> {
        if self.version == 0 || self.version > OPTIONS_VERSION {
            return Err(LedgridError::invalid_format(format!(
                "unsupported options version {} (this build understands up to {OPTIONS_VERSION})",
                self.version
            )));
        }
        if self.brightness > 100 {
            return Err(LedgridError::invalid_format(format!(
                "brightness must be 0..=100, got {}",
                self.brightness
            )));
        }
        if self.rows == 0 || self.cols == 0 || self.chain_length == 0 || self.parallel == 0 {
            return Err(LedgridError::invalid_dimension(format!(
                "rows/cols/chain_length/parallel must all be non-zero \
                 (got {}x{}, chain {}, parallel {})",
                self.cols, self.rows, self.chain_length, self.parallel
            )));
        }
        let width = self.cols.checked_mul(self.chain_length);
        let height = self.rows.checked_mul(self.parallel);
        let (Some(width), Some(height)) = (width, height) else {
            return Err(LedgridError::invalid_dimension(format!(
                "display geometry overflows: {} cols x chain {}, {} rows x parallel {}",
                self.cols, self.chain_length, self.rows, self.parallel
            )));
        };
        Geometry::new(width, height)
    }

    /// The brightness percentage mapped onto the driver's opaque 0–255
    /// byte property.
    pub fn display_brightness(&self) -> u8 {
        ((u16::from(self.brightness) * 255) / 100).min(255) as u8
    }
}
