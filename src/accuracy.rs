//! Numeric tolerances governing real-space truncation and Fourier bandwidth.
//!
//! A single immutable bundle is shared by value across every profile built
//! from it. The defaults reproduce the accuracy floor of the wider simulation
//! stack: roughly 1e-3 relative photometric error on rendered images.

use serde::{Deserialize, Serialize};

use crate::error::ProfileError;

/// Tolerance bundle for interpolated-profile construction.
///
/// Tighter values cost larger Fourier transforms downstream (smaller `stepK`,
/// larger `maxK`); looser values admit more aliased flux and kernel
/// truncation error. All fields must be strictly positive and the fractional
/// thresholds below one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccuracyConfig {
    /// Acceptable fraction of total flux aliased by the periodic replication
    /// of a finite image; drives the derived `stepK`.
    pub folding_threshold: f64,
    /// Fraction of total flux below which Fourier amplitude is treated as
    /// negligible; drives `maxK` refinement.
    pub maxk_threshold: f64,
    /// Fractional accuracy of kernel Fourier values; sets each kernel's
    /// guaranteed bandwidth `u_max`.
    pub kvalue_accuracy: f64,
    /// Fractional accuracy of real-space kernel values; sets the truncation
    /// radius of the kernels with unbounded support (sinc, delta).
    pub xvalue_accuracy: f64,
    /// Minimum represented image diameter in units of the half-light radius,
    /// a floor on the extent used when deriving `stepK`.
    pub stepk_minimum_hlr: f64,
}

impl Default for AccuracyConfig {
    fn default() -> Self {
        Self {
            folding_threshold: 5e-3,
            maxk_threshold: 1e-3,
            kvalue_accuracy: 1e-5,
            xvalue_accuracy: 1e-5,
            stepk_minimum_hlr: 5.0,
        }
    }
}

impl AccuracyConfig {
    /// Validate the bundle, reporting the first offending field.
    pub fn validate(&self) -> Result<(), ProfileError> {
        let fractions = [
            ("folding_threshold", self.folding_threshold),
            ("maxk_threshold", self.maxk_threshold),
            ("kvalue_accuracy", self.kvalue_accuracy),
            ("xvalue_accuracy", self.xvalue_accuracy),
        ];
        for (name, value) in fractions {
            if !(value > 0.0 && value < 1.0) {
                return Err(ProfileError::InvalidConfig(format!(
                    "{name} must lie in (0, 1), got {value}"
                )));
            }
        }
        if !(self.stepk_minimum_hlr > 0.0 && self.stepk_minimum_hlr.is_finite()) {
            return Err(ProfileError::InvalidConfig(format!(
                "stepk_minimum_hlr must be positive and finite, got {}",
                self.stepk_minimum_hlr
            )));
        }
        Ok(())
    }

    /// Copy of the bundle with a different folding threshold.
    pub fn with_folding_threshold(mut self, folding_threshold: f64) -> Self {
        self.folding_threshold = folding_threshold;
        self
    }

    /// Copy of the bundle with a different maxk threshold.
    pub fn with_maxk_threshold(mut self, maxk_threshold: f64) -> Self {
        self.maxk_threshold = maxk_threshold;
        self
    }
}
