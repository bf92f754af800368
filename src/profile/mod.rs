//! Surface-brightness profiles backed by interpolated sample grids.
//!
//! Both profile kinds — real-space pixel images and already-transformed
//! Fourier sample grids — expose the same capability surface, which is what
//! the surrounding composition framework consumes: point evaluation in real
//! and Fourier space plus the scalars (`stepK`, `maxK`, flux) that size
//! downstream transforms.

use num_complex::Complex64;

use crate::error::ProfileError;

pub mod kspace;
pub mod real;

pub use kspace::InterpolatedKProfile;
pub use real::InterpolatedRealProfile;

/// Capability surface shared by every profile kind.
pub trait SurfaceBrightnessProfile {
    /// Surface brightness at the real-space position `(x, y)` in physical
    /// units. Fourier-sampled profiles cannot answer this without an inverse
    /// transform and report `RealSpaceUnavailable`.
    fn x_value(&self, x: f64, y: f64) -> Result<f64, ProfileError>;

    /// Fourier amplitude at frequency `(kx, ky)` in radians per physical
    /// unit.
    fn k_value(&self, kx: f64, ky: f64) -> Complex64;

    /// Fourier sampling interval required to keep folding error within the
    /// configured tolerance.
    fn step_k(&self) -> f64;

    /// Frequency beyond which the profile's Fourier amplitude is negligible.
    fn max_k(&self) -> f64;

    /// Total flux of the profile.
    fn flux(&self) -> f64;
}
