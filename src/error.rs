use crate::foundation::Geometry;

/// Convenience result type used across ledgrid.
pub type LedgridResult<T> = Result<T, LedgridError>;

/// Top-level error taxonomy used by the library APIs.
///
/// Per-pixel out-of-range access never errors (it clips, matching hardware
/// buffer tolerance); structural mismatches of geometry or format always do.
#[derive(thiserror::Error, Debug)]
pub enum LedgridError {
    /// Zero-sized canvas or display dimension.
    #[error("invalid dimension: {0}")]
    InvalidDimension(String),

    /// Bulk copy source holds fewer pixels than the target rectangle.
    #[error("pixel source too small: need {needed} pixels, got {got}")]
    BufferTooSmall { needed: usize, got: usize },

    /// Canvas, stream and display sizes disagree.
    #[error("geometry mismatch: expected {expected}, got {got}")]
    GeometryMismatch { expected: Geometry, got: Geometry },

    /// Bad or missing magic value, or otherwise unparseable data.
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// Wrapped filesystem or transport error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The display exchange was torn down while the operation waited on it.
    #[error("display driver is shutting down")]
    ShuttingDown,

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LedgridError {
    /// Build a [`LedgridError::InvalidDimension`] value.
    pub fn invalid_dimension(msg: impl Into<String>) -> Self {
        Self::InvalidDimension(msg.into())
    }

    /// Build a [`LedgridError::InvalidFormat`] value.
    pub fn invalid_format(msg: impl Into<String>) -> Self {
        Self::InvalidFormat(msg.into())
    }

    /// Build a [`LedgridError::GeometryMismatch`] value.
    pub fn geometry_mismatch(expected: Geometry, got: Geometry) -> Self {
        Self::GeometryMismatch { expected, got }
    }
}
