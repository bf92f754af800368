use thiserror::Error;

use crate::bounds::Bounds;

/// Errors raised while validating profile construction inputs.
///
/// Every variant corresponds to malformed caller input and is raised before
/// any profile state is built; degenerate but well-formed inputs (zero flux,
/// empty refinement scans) produce sentinel values instead of errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProfileError {
    /// Sample array shape does not match the declared bounds.
    #[error("grid is {actual_rows}x{actual_cols} but bounds {bounds:?} describe {expected_rows}x{expected_cols}")]
    SizeMismatch {
        /// Rows in the supplied array.
        actual_rows: usize,
        /// Columns in the supplied array.
        actual_cols: usize,
        /// Rows implied by the bounds.
        expected_rows: usize,
        /// Columns implied by the bounds.
        expected_cols: usize,
        /// The declared bounds.
        bounds: Bounds,
    },

    /// Bounds describe an empty region.
    #[error("bounds {0:?} describe an empty region")]
    UndefinedBounds(Bounds),

    /// The nonzero-flux bounds extend outside the stored bounds.
    #[error("nonzero bounds {nonzero:?} extend outside stored bounds {init:?}")]
    BoundsNotContained {
        /// The declared nonzero-flux sub-rectangle.
        nonzero: Bounds,
        /// The full stored extent.
        init: Bounds,
    },

    /// The grid holds no finite samples at all.
    #[error("grid contains no finite samples")]
    NoFiniteSamples,

    /// Pixel scale must be strictly positive.
    #[error("pixel scale must be positive, got {0}")]
    InvalidPixelScale(f64),

    /// Fourier sampling interval must be strictly positive (or zero where
    /// zero means "derive automatically").
    #[error("stepk must be positive, got {0}")]
    InvalidStepK(f64),

    /// Bandwidth override must be non-negative.
    #[error("maxk override must be non-negative, got {0}")]
    InvalidMaxK(f64),

    /// Requested enclosed-flux fraction outside (0, 1].
    #[error("flux fraction must lie in (0, 1], got {0}")]
    InvalidFluxFraction(f64),

    /// Real-space evaluation of a Fourier-sampled profile would require an
    /// inverse transform, which this engine does not perform.
    #[error("real-space evaluation is not available for a Fourier-sampled profile")]
    RealSpaceUnavailable,

    /// Accuracy-configuration validation failure.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
