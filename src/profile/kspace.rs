//! Profile defined directly by a grid of Fourier samples.
//!
//! When a profile's transform is already in hand — typically the output of an
//! earlier rendering pass — it can be treated as a first-class profile
//! without a round trip through real space. The samples live on a lattice
//! with spacing `stepK`, which is an input here rather than something derived
//! from image content, and evaluation at off-lattice frequencies
//! interpolates the complex samples with the kernel's real-space weights.

use std::f64::consts::PI;

use num_complex::Complex64;

use crate::accuracy::AccuracyConfig;
use crate::error::ProfileError;
use crate::grid::KGrid;
use crate::interpolant::Interpolant;
use crate::profile::SurfaceBrightnessProfile;

/// Interpolated Fourier-space surface-brightness profile.
#[derive(Debug)]
pub struct InterpolatedKProfile {
    grid: KGrid,
    step_k: f64,
    k_interp: Interpolant,
    accuracy: AccuracyConfig,
    max_k: f64,
    flux: f64,
}

impl InterpolatedKProfile {
    /// Construct a profile over a Fourier-sample grid.
    ///
    /// # Arguments
    /// * `grid` - shared read-only complex sample grid
    /// * `step_k` - lattice spacing in radians per physical unit; mandatory
    ///   and strictly positive, it describes the supplied grid rather than
    ///   being derived
    /// * `k_interp` - kernel used to interpolate between lattice points
    /// * `accuracy` - tolerance bundle
    ///
    /// # Errors
    /// `InvalidStepK` for a non-positive or non-finite `step_k`; accuracy
    /// validation failures propagate unchanged.
    pub fn new(
        grid: KGrid,
        step_k: f64,
        k_interp: Interpolant,
        accuracy: AccuracyConfig,
    ) -> Result<Self, ProfileError> {
        accuracy.validate()?;
        if !(step_k > 0.0 && step_k.is_finite()) {
            return Err(ProfileError::InvalidStepK(step_k));
        }

        // the largest sampled frequency, clipped by the kernel's own reach on
        // the lattice
        let grid_max_k = grid.bounds().half_extent() * step_k;
        let interp_max_k = 2.0 * PI * k_interp.u_max() * step_k;
        let max_k = grid_max_k.min(interp_max_k);

        let flux = interpolate(&grid, &k_interp, step_k, 0.0, 0.0).re;
        Ok(Self {
            grid,
            step_k,
            k_interp,
            accuracy,
            max_k,
            flux,
        })
    }

    /// The wrapped Fourier-sample grid.
    pub fn grid(&self) -> &KGrid {
        &self.grid
    }

    /// Kernel used to interpolate between lattice points.
    pub fn k_interp(&self) -> &Interpolant {
        &self.k_interp
    }

    /// Tolerance bundle this profile was built with.
    pub fn accuracy(&self) -> &AccuracyConfig {
        &self.accuracy
    }
}

/// Separable kernel interpolation of the complex samples at `(kx, ky)`.
fn interpolate(
    grid: &KGrid,
    k_interp: &Interpolant,
    step_k: f64,
    kx: f64,
    ky: f64,
) -> Complex64 {
    let sx = kx / step_k;
    let sy = ky / step_k;
    let bounds = grid.bounds();
    let h = k_interp.half_support();
    let i_lo = ((sx - h).ceil() as i64).max(bounds.xmin as i64) as i32;
    let i_hi = ((sx + h).floor() as i64).min(bounds.xmax as i64) as i32;
    let j_lo = ((sy - h).ceil() as i64).max(bounds.ymin as i64) as i32;
    let j_hi = ((sy + h).floor() as i64).min(bounds.ymax as i64) as i32;

    let mut sum = Complex64::new(0.0, 0.0);
    for j in j_lo..=j_hi {
        let wy = k_interp.x_val(sy - j as f64);
        if wy == 0.0 {
            continue;
        }
        for i in i_lo..=i_hi {
            let wx = k_interp.x_val(sx - i as f64);
            if wx == 0.0 {
                continue;
            }
            sum += grid.value(i, j) * (wx * wy);
        }
    }
    sum
}

impl SurfaceBrightnessProfile for InterpolatedKProfile {
    fn x_value(&self, _x: f64, _y: f64) -> Result<f64, ProfileError> {
        Err(ProfileError::RealSpaceUnavailable)
    }

    fn k_value(&self, kx: f64, ky: f64) -> Complex64 {
        interpolate(&self.grid, &self.k_interp, self.step_k, kx, ky)
    }

    fn step_k(&self) -> f64 {
        self.step_k
    }

    fn max_k(&self) -> f64 {
        self.max_k
    }

    fn flux(&self) -> f64 {
        self.flux
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Array2;
    use std::sync::Arc;

    fn gaussian_k_grid(size: usize, width: f64) -> KGrid {
        // transform of a unit-flux Gaussian, real and positive
        let center = (size / 2) as f64;
        let data = Array2::<Complex64>::from_shape_fn((size, size), |(row, col)| {
            let u = col as f64 - center;
            let v = row as f64 - center;
            Complex64::new((-(u * u + v * v) / (2.0 * width * width)).exp(), 0.0)
        });
        KGrid::centered(Arc::new(data)).unwrap()
    }

    #[test]
    fn test_zero_step_k_is_rejected() {
        // spec boundary scenario
        let acc = AccuracyConfig::default();
        let grid = gaussian_k_grid(17, 4.0);
        let err = InterpolatedKProfile::new(grid, 0.0, Interpolant::quintic(&acc), acc)
            .unwrap_err();
        assert!(matches!(err, ProfileError::InvalidStepK(_)));
    }

    #[test]
    fn test_negative_step_k_is_rejected() {
        let acc = AccuracyConfig::default();
        let grid = gaussian_k_grid(17, 4.0);
        let err = InterpolatedKProfile::new(grid, -0.5, Interpolant::quintic(&acc), acc)
            .unwrap_err();
        assert!(matches!(err, ProfileError::InvalidStepK(_)));
    }

    #[test]
    fn test_flux_is_origin_sample() {
        let acc = AccuracyConfig::default();
        let grid = gaussian_k_grid(17, 4.0);
        let origin = grid.value(0, 0).re;
        let profile =
            InterpolatedKProfile::new(grid, 0.25, Interpolant::quintic(&acc), acc).unwrap();
        // quintic is Kronecker on the lattice, so the DC sample comes back exactly
        assert_relative_eq!(profile.flux(), origin, epsilon = 1e-9);
        assert_relative_eq!(profile.flux(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_k_value_reproduces_lattice_samples() {
        let acc = AccuracyConfig::default();
        let grid = gaussian_k_grid(17, 4.0);
        let profile =
            InterpolatedKProfile::new(grid, 0.25, Interpolant::quintic(&acc), acc).unwrap();
        for (i, j) in [(0, 0), (3, -2), (-5, 5)] {
            let expected = profile.grid().value(i, j);
            let measured = profile.k_value(i as f64 * 0.25, j as f64 * 0.25);
            assert_relative_eq!(measured.re, expected.re, epsilon = 1e-9);
            assert_relative_eq!(measured.im, expected.im, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_k_value_interpolates_between_samples() {
        let acc = AccuracyConfig::default();
        let grid = gaussian_k_grid(33, 6.0);
        let step_k = 0.25;
        let profile =
            InterpolatedKProfile::new(grid, step_k, Interpolant::quintic(&acc), acc).unwrap();
        // halfway between lattice points the smooth Gaussian should be
        // recovered to interpolation accuracy
        let k = 1.5 * step_k;
        let expected: f64 = (-(1.5_f64 * 1.5) / (2.0 * 6.0 * 6.0)).exp();
        let measured = profile.k_value(k, 0.0).re;
        assert_relative_eq!(measured, expected, epsilon = 1e-3);
    }

    #[test]
    fn test_max_k_tracks_grid_extent() {
        let acc = AccuracyConfig::default();
        let step_k = 0.5;
        let profile = InterpolatedKProfile::new(
            gaussian_k_grid(17, 4.0),
            step_k,
            Interpolant::quintic(&acc),
            acc,
        )
        .unwrap();
        // 17-wide centered lattice reaches index 8
        assert_relative_eq!(profile.max_k(), 8.0 * step_k, epsilon = 1e-12);

        // a much wider lattice is clipped by the kernel's reach instead
        let wide = InterpolatedKProfile::new(
            gaussian_k_grid(257, 40.0),
            step_k,
            Interpolant::quintic(&acc),
            acc,
        )
        .unwrap();
        let interp_cap = 2.0 * PI * Interpolant::quintic(&acc).u_max() * step_k;
        assert!(wide.max_k() <= interp_cap + 1e-12);
        assert!(wide.max_k() < 128.0 * step_k);
    }

    #[test]
    fn test_x_value_reports_unavailable() {
        let acc = AccuracyConfig::default();
        let profile = InterpolatedKProfile::new(
            gaussian_k_grid(17, 4.0),
            0.25,
            Interpolant::quintic(&acc),
            acc,
        )
        .unwrap();
        assert_eq!(
            profile.x_value(0.0, 0.0).unwrap_err(),
            ProfileError::RealSpaceUnavailable
        );
    }
}
