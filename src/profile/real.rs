//! Continuous profile reconstructed from a real-space pixel grid.
//!
//! The profile is the separable-kernel sum over the stored pixels,
//!
//! ```text
//! f(x, y) = (1/Δ²) · Σ_ij I[i,j] · K(x/Δ − i) · K(y/Δ − j)
//! ```
//!
//! with Δ the pixel scale, so that integrating the profile over the plane
//! returns the plain pixel sum. Its Fourier transform factorizes into the
//! discrete image transform times the kernel envelope,
//!
//! ```text
//! F(kx, ky) = K̃(kxΔ/2π) · K̃(kyΔ/2π) · Σ_ij I[i,j] · e^{i(kx·iΔ + ky·jΔ)}
//! ```
//!
//! which is what couples the kernel's guaranteed bandwidth to the profile's
//! `maxK` and the image's spatial extent to its `stepK`.

use std::f64::consts::PI;

use num_complex::Complex64;
use once_cell::sync::OnceCell;

use crate::accuracy::AccuracyConfig;
use crate::error::ProfileError;
use crate::flux::flux_containment_radius;
use crate::grid::PixelGrid;
use crate::interpolant::{Interpolant, Separable2d};
use crate::profile::SurfaceBrightnessProfile;

/// Interpolated real-space surface-brightness profile.
///
/// Wraps a shared pixel grid, a real-space kernel used for point evaluation,
/// a Fourier-space kernel carried for downstream transform interpolation, and
/// the accuracy configuration from which the sampling scalars are derived.
/// Immutable after construction apart from the lazily derived `stepK` and the
/// in-place tightening of `maxK` by [`refine_max_k`](Self::refine_max_k).
#[derive(Debug)]
pub struct InterpolatedRealProfile {
    grid: PixelGrid,
    kernel: Separable2d,
    k_interp: Interpolant,
    pixel_scale: f64,
    accuracy: AccuracyConfig,
    flux: f64,
    centroid: (f64, f64),
    step_k_override: f64,
    step_k: OnceCell<f64>,
    max_k: f64,
}

impl InterpolatedRealProfile {
    /// Construct a profile over a pixel grid.
    ///
    /// # Arguments
    /// * `grid` - shared read-only pixel grid
    /// * `x_interp` - real-space reconstruction kernel
    /// * `k_interp` - Fourier-space kernel for downstream transform lookup
    /// * `step_k` - Fourier sampling interval override; 0 derives it from the
    ///   image's flux extent
    /// * `max_k` - bandwidth cutoff override; 0 derives it from the k-space
    ///   kernel's guaranteed bandwidth
    /// * `pixel_scale` - physical units per sample, strictly positive
    /// * `accuracy` - tolerance bundle
    ///
    /// # Errors
    /// Validation failures: invalid accuracy bundle, non-positive pixel
    /// scale, negative overrides. Grid consistency is validated when the
    /// `PixelGrid` itself is built.
    pub fn new(
        grid: PixelGrid,
        x_interp: Interpolant,
        k_interp: Interpolant,
        step_k: f64,
        max_k: f64,
        pixel_scale: f64,
        accuracy: AccuracyConfig,
    ) -> Result<Self, ProfileError> {
        accuracy.validate()?;
        if !(pixel_scale > 0.0 && pixel_scale.is_finite()) {
            return Err(ProfileError::InvalidPixelScale(pixel_scale));
        }
        if !(step_k >= 0.0 && step_k.is_finite()) {
            return Err(ProfileError::InvalidStepK(step_k));
        }
        if !(max_k >= 0.0 && max_k.is_finite()) {
            return Err(ProfileError::InvalidMaxK(max_k));
        }

        let flux = grid.total_flux();
        let (cx, cy) = grid.centroid();
        let default_max_k = 2.0 * PI * k_interp.u_max() / pixel_scale;
        let profile = Self {
            grid,
            kernel: Separable2d::isotropic(x_interp),
            k_interp,
            pixel_scale,
            accuracy,
            flux,
            centroid: (cx * pixel_scale, cy * pixel_scale),
            step_k_override: step_k,
            step_k: OnceCell::new(),
            max_k: if max_k > 0.0 { max_k } else { default_max_k },
        };
        Ok(profile)
    }

    /// The wrapped pixel grid.
    pub fn grid(&self) -> &PixelGrid {
        &self.grid
    }

    /// Real-space reconstruction kernel.
    pub fn x_interp(&self) -> &Interpolant {
        self.kernel.x()
    }

    /// Fourier-space kernel carried for downstream transform lookup.
    pub fn k_interp(&self) -> &Interpolant {
        &self.k_interp
    }

    /// Physical units per sample.
    pub fn pixel_scale(&self) -> f64 {
        self.pixel_scale
    }

    /// Tolerance bundle this profile was built with.
    pub fn accuracy(&self) -> &AccuracyConfig {
        &self.accuracy
    }

    /// Flux-weighted centroid in physical units.
    pub fn centroid(&self) -> (f64, f64) {
        self.centroid
    }

    /// Derive the Fourier sampling interval from the image's flux extent.
    ///
    /// The periodic replication of a discrete transform folds flux from
    /// beyond the represented diameter back onto the profile, so the
    /// represented radius must enclose all but `folding_threshold` of the
    /// flux. The kernel itself spreads flux `half_support` samples past the
    /// nonzero pixels, and the represented diameter is floored at
    /// `stepk_minimum_hlr` half-light radii.
    fn derive_step_k(&self) -> f64 {
        let support = self.kernel.x().half_support();
        let radius = if self.flux > 0.0 {
            let contained = flux_containment_radius(&self.grid, 1.0 - self.accuracy.folding_threshold)
                .unwrap_or_else(|_| self.grid.nonzero_bounds().half_extent());
            let hlr = flux_containment_radius(&self.grid, 0.5).unwrap_or(0.0);
            contained.max(0.5 * self.accuracy.stepk_minimum_hlr * hlr)
        } else {
            // degenerate flux distribution: fall back to the stored extent
            self.grid.init_bounds().half_extent()
        };
        let step_k = PI / ((radius + support) * self.pixel_scale);
        log::debug!(
            "derived stepk={:.6} (radius={:.2} samples, support={:.2}, folding_threshold={:.1e})",
            step_k,
            radius,
            support,
            self.accuracy.folding_threshold
        );
        step_k
    }

    /// Tighten the bandwidth cutoff by measuring actual Fourier amplitude.
    ///
    /// Scans outward in steps of `stepK`, sampling the amplitude along both
    /// axes and both diagonals (interpolated-image spectra are not radially
    /// monotone), and keeps one scan step beyond the last frequency whose
    /// amplitude exceeds `maxk_threshold` times the total flux. The result
    /// never exceeds the current bound, nor `max_maxk` when that is nonzero;
    /// refining twice with the same ceiling is idempotent. Degenerate grids
    /// (non-positive flux) leave the bound unchanged.
    ///
    /// # Arguments
    /// * `max_maxk` - optional ceiling on the refined bound; 0 means none
    ///
    /// # Returns
    /// The refined `maxK`, also stored on the profile.
    pub fn refine_max_k(&mut self, max_maxk: f64) -> f64 {
        if !(self.flux > 0.0) || !self.flux.is_finite() {
            return self.max_k;
        }

        let mut ceiling = self.max_k;
        if max_maxk > 0.0 {
            ceiling = ceiling.min(max_maxk);
        }
        let dk = self.step_k();
        if !(dk > 0.0) || ceiling < dk {
            return self.max_k;
        }

        let threshold = self.accuracy.maxk_threshold * self.flux.abs();
        let inv_sqrt2 = std::f64::consts::FRAC_1_SQRT_2;
        let mut last_above = 0.0;
        let steps = (ceiling / dk).floor() as usize;
        for step in 1..=steps {
            let k = step as f64 * dk;
            let kd = k * inv_sqrt2;
            let amplitude = [
                self.k_value(k, 0.0),
                self.k_value(0.0, k),
                self.k_value(kd, kd),
                self.k_value(-kd, kd),
            ]
            .iter()
            .map(|c| c.norm())
            .fold(0.0_f64, f64::max);
            if amplitude > threshold {
                last_above = k;
            }
        }

        let refined = (last_above + dk).min(ceiling);
        log::debug!(
            "refined maxk {:.6} -> {:.6} (ceiling={:.6}, threshold={:.3e})",
            self.max_k,
            refined,
            ceiling,
            threshold
        );
        self.max_k = refined;
        refined
    }
}

impl SurfaceBrightnessProfile for InterpolatedRealProfile {
    fn x_value(&self, x: f64, y: f64) -> Result<f64, ProfileError> {
        let xs = x / self.pixel_scale;
        let ys = y / self.pixel_scale;
        let bounds = self.grid.init_bounds();

        let hx = self.kernel.x().half_support();
        let hy = self.kernel.y().half_support();
        let ix_lo = ((xs - hx).ceil() as i64).max(bounds.xmin as i64) as i32;
        let ix_hi = ((xs + hx).floor() as i64).min(bounds.xmax as i64) as i32;
        let iy_lo = ((ys - hy).ceil() as i64).max(bounds.ymin as i64) as i32;
        let iy_hi = ((ys + hy).floor() as i64).min(bounds.ymax as i64) as i32;

        let mut sum = 0.0;
        for iy in iy_lo..=iy_hi {
            let wy = self.kernel.y().x_val(ys - iy as f64);
            if wy == 0.0 {
                continue;
            }
            for ix in ix_lo..=ix_hi {
                let v = self.grid.value(ix, iy);
                if v == 0.0 || !v.is_finite() {
                    continue;
                }
                sum += v * self.kernel.x().x_val(xs - ix as f64) * wy;
            }
        }
        Ok(sum / (self.pixel_scale * self.pixel_scale))
    }

    fn k_value(&self, kx: f64, ky: f64) -> Complex64 {
        let scale = self.pixel_scale;
        let envelope = self
            .kernel
            .k_val(kx * scale / (2.0 * PI), ky * scale / (2.0 * PI));
        if envelope == 0.0 {
            return Complex64::new(0.0, 0.0);
        }

        let bounds = self.grid.nonzero_bounds();
        let mut transform = Complex64::new(0.0, 0.0);
        for iy in bounds.ymin..=bounds.ymax {
            let phase_y = ky * iy as f64 * scale;
            for ix in bounds.xmin..=bounds.xmax {
                let v = self.grid.value(ix, iy);
                if v == 0.0 || !v.is_finite() {
                    continue;
                }
                let phase = kx * ix as f64 * scale + phase_y;
                transform += Complex64::from_polar(v, phase);
            }
        }
        transform * envelope
    }

    fn step_k(&self) -> f64 {
        if self.step_k_override > 0.0 {
            self.step_k_override
        } else {
            *self.step_k.get_or_init(|| self.derive_step_k())
        }
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
    use crate::bounds::Bounds;
    use approx::assert_relative_eq;
    use ndarray::Array2;
    use std::sync::Arc;

    fn gaussian_grid(size: usize, sigma: f64, flux: f64) -> PixelGrid {
        let center = (size / 2) as f64;
        let mut data = Array2::<f64>::zeros((size, size));
        for ((row, col), v) in data.indexed_iter_mut() {
            let dx = col as f64 - center;
            let dy = row as f64 - center;
            *v = (-(dx * dx + dy * dy) / (2.0 * sigma * sigma)).exp();
        }
        let sum: f64 = data.iter().sum();
        data.mapv_inplace(|v| v * flux / sum);
        PixelGrid::centered(Arc::new(data)).unwrap()
    }

    fn gaussian_profile(accuracy: AccuracyConfig) -> InterpolatedRealProfile {
        let grid = gaussian_grid(33, 2.5, 100.0);
        InterpolatedRealProfile::new(
            grid,
            Interpolant::quintic(&accuracy),
            Interpolant::quintic(&accuracy),
            0.0,
            0.0,
            1.0,
            accuracy,
        )
        .unwrap()
    }

    #[test]
    fn test_flux_and_centroid() {
        let profile = gaussian_profile(AccuracyConfig::default());
        assert_relative_eq!(profile.flux(), 100.0, epsilon = 1e-9);
        let (cx, cy) = profile.centroid();
        assert_relative_eq!(cx, 0.0, epsilon = 1e-9);
        assert_relative_eq!(cy, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rejects_bad_scalars() {
        let acc = AccuracyConfig::default();
        let grid = gaussian_grid(9, 1.5, 1.0);
        let quintic = Interpolant::quintic(&acc);
        assert!(matches!(
            InterpolatedRealProfile::new(grid.clone(), quintic, quintic, 0.0, 0.0, 0.0, acc),
            Err(ProfileError::InvalidPixelScale(_))
        ));
        assert!(matches!(
            InterpolatedRealProfile::new(grid.clone(), quintic, quintic, -1.0, 0.0, 1.0, acc),
            Err(ProfileError::InvalidStepK(_))
        ));
        assert!(matches!(
            InterpolatedRealProfile::new(grid, quintic, quintic, 0.0, -2.0, 1.0, acc),
            Err(ProfileError::InvalidMaxK(_))
        ));
    }

    #[test]
    fn test_rejects_escaping_nonzero_bounds() {
        // spec boundary scenario: nonzero bounds exceeding the stored bounds
        let data = Arc::new(Array2::<f64>::ones((5, 5)));
        let err = PixelGrid::new(
            data,
            Bounds::centered(5, 5),
            Bounds::new(-2, 3, -2, 2),
        )
        .unwrap_err();
        assert!(matches!(err, ProfileError::BoundsNotContained { .. }));
    }

    #[test]
    fn test_x_value_reproduces_samples_at_pixel_centers() {
        let profile = gaussian_profile(AccuracyConfig::default());
        // quintic is Kronecker at integer offsets, so the profile at a pixel
        // center is exactly that pixel over the pixel area
        for (ix, iy) in [(0, 0), (2, -1), (-3, 4)] {
            let expected = profile.grid().value(ix, iy);
            let measured = profile
                .x_value(ix as f64, iy as f64)
                .unwrap();
            assert_relative_eq!(measured, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_x_value_respects_pixel_scale() {
        let acc = AccuracyConfig::default();
        let grid = gaussian_grid(33, 2.5, 100.0);
        let scaled = InterpolatedRealProfile::new(
            grid,
            Interpolant::quintic(&acc),
            Interpolant::quintic(&acc),
            0.0,
            0.0,
            0.5,
            acc,
        )
        .unwrap();
        let unscaled = gaussian_profile(acc);
        // halving the pixel scale quadruples the surface brightness
        let a = scaled.x_value(0.0, 0.0).unwrap();
        let b = unscaled.x_value(0.0, 0.0).unwrap();
        assert_relative_eq!(a, 4.0 * b, epsilon = 1e-9);
    }

    #[test]
    fn test_k_value_at_origin_is_flux() {
        let profile = gaussian_profile(AccuracyConfig::default());
        let dc = profile.k_value(0.0, 0.0);
        assert_relative_eq!(dc.re, profile.flux(), epsilon = 1e-9);
        assert_relative_eq!(dc.im, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_k_value_decays_for_smooth_image() {
        let profile = gaussian_profile(AccuracyConfig::default());
        let near = profile.k_value(0.1, 0.0).norm();
        let far = profile.k_value(1.5, 0.0).norm();
        assert!(near < profile.flux());
        assert!(far < near);
    }

    #[test]
    fn test_step_k_override_wins() {
        let acc = AccuracyConfig::default();
        let grid = gaussian_grid(33, 2.5, 100.0);
        let profile = InterpolatedRealProfile::new(
            grid,
            Interpolant::quintic(&acc),
            Interpolant::quintic(&acc),
            0.37,
            4.2,
            1.0,
            acc,
        )
        .unwrap();
        assert_eq!(profile.step_k(), 0.37);
        assert_eq!(profile.max_k(), 4.2);
    }

    #[test]
    fn test_step_k_tightens_with_folding_threshold() {
        let tolerances = [1e-2, 1e-3, 1e-4];
        let steps: Vec<f64> = tolerances
            .iter()
            .map(|&tol| {
                let acc = AccuracyConfig::default().with_folding_threshold(tol);
                gaussian_profile(acc).step_k()
            })
            .collect();
        println!("stepk by folding threshold: {:?}", steps);
        for pair in steps.windows(2) {
            assert!(
                pair[1] < pair[0],
                "stepk did not strictly decrease: {:?}",
                steps
            );
        }
    }

    #[test]
    fn test_default_max_k_follows_k_interp_bandwidth() {
        let acc = AccuracyConfig::default();
        let profile = gaussian_profile(acc);
        let expected = 2.0 * PI * Interpolant::quintic(&acc).u_max();
        assert_relative_eq!(profile.max_k(), expected, epsilon = 1e-12);

        let grid = gaussian_grid(33, 2.5, 100.0);
        let halved = InterpolatedRealProfile::new(
            grid,
            Interpolant::quintic(&acc),
            Interpolant::quintic(&acc),
            0.0,
            0.0,
            2.0,
            acc,
        )
        .unwrap();
        assert_relative_eq!(halved.max_k(), expected / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_refine_max_k_never_grows() {
        let mut profile = gaussian_profile(AccuracyConfig::default());
        let before = profile.max_k();
        let refined = profile.refine_max_k(0.0);
        assert!(refined <= before);
        assert_eq!(profile.max_k(), refined);
    }

    #[test]
    fn test_refine_max_k_honors_ceiling() {
        let mut profile = gaussian_profile(AccuracyConfig::default());
        let ceiling = profile.max_k() / 2.0;
        let refined = profile.refine_max_k(ceiling);
        assert!(refined <= ceiling);
    }

    #[test]
    fn test_refine_max_k_idempotent() {
        let mut profile = gaussian_profile(AccuracyConfig::default());
        let ceiling = profile.max_k() * 0.8;
        let first = profile.refine_max_k(ceiling);
        let second = profile.refine_max_k(ceiling);
        assert_relative_eq!(first, second, epsilon = 1e-12);
    }

    #[test]
    fn test_refine_max_k_keeps_significant_content() {
        let mut profile = gaussian_profile(AccuracyConfig::default());
        let refined = profile.refine_max_k(0.0);
        let threshold = profile.accuracy().maxk_threshold * profile.flux();
        // just inside the refined bound the amplitude may still be large;
        // well outside it must have dropped below the threshold
        let outside = profile.k_value(refined * 1.5, 0.0).norm();
        assert!(
            outside < threshold * 10.0,
            "amplitude {} far above threshold {} outside refined bound",
            outside,
            threshold
        );
        assert!(refined > profile.step_k());
    }

    #[test]
    fn test_half_light_radius_round_trip() {
        // spec round-trip scenario: Gaussian of known flux and half-light radius
        let sigma = 3.0;
        let grid = gaussian_grid(65, sigma, 100.0);
        let acc = AccuracyConfig::default();
        let profile = InterpolatedRealProfile::new(
            grid,
            Interpolant::quintic(&acc),
            Interpolant::quintic(&acc),
            0.0,
            0.0,
            1.0,
            acc,
        )
        .unwrap();
        assert_relative_eq!(profile.flux(), 100.0, epsilon = 1e-9);

        let expected_hlr = sigma * (2.0 * 2.0_f64.ln()).sqrt();
        let measured = flux_containment_radius(profile.grid(), 0.5).unwrap();
        assert_relative_eq!(measured, expected_hlr, epsilon = 0.25);
    }
}
