//! Shared read-only sample grids for real and Fourier space.
//!
//! Profiles never own their pixel data: the caller hands in a
//! reference-counted `ndarray` buffer which is treated as immutable for the
//! profile's lifetime. A real-space grid carries two extents — the full
//! stored rectangle and the sub-rectangle guaranteed to contain all nonzero
//! flux — while a Fourier grid carries a single frequency-index extent.
//!
//! Coordinates follow the crate-wide convention: array `[row, col]` maps to
//! pixel `(x = xmin + col, y = ymin + row)`. Samples outside the stored
//! bounds read as zero; non-finite samples are ignored by the flux and
//! centroid reductions rather than poisoning them.

use std::sync::Arc;

use ndarray::{Array2, ArrayView2};
use num_complex::Complex64;

use crate::bounds::Bounds;
use crate::error::ProfileError;

fn check_shape<T>(
    data: &Array2<T>,
    bounds: &Bounds,
) -> Result<(), ProfileError> {
    if !bounds.is_defined() {
        return Err(ProfileError::UndefinedBounds(*bounds));
    }
    let (rows, cols) = data.dim();
    if rows != bounds.height() || cols != bounds.width() {
        return Err(ProfileError::SizeMismatch {
            actual_rows: rows,
            actual_cols: cols,
            expected_rows: bounds.height(),
            expected_cols: bounds.width(),
            bounds: *bounds,
        });
    }
    Ok(())
}

/// Real-valued pixel grid with stored and nonzero-flux extents.
#[derive(Debug, Clone)]
pub struct PixelGrid {
    data: Arc<Array2<f64>>,
    init_bounds: Bounds,
    nonzero_bounds: Bounds,
}

impl PixelGrid {
    /// Wrap a shared sample buffer with explicit extents.
    ///
    /// # Arguments
    /// * `data` - samples, `init_bounds.height()` rows by `init_bounds.width()` columns
    /// * `init_bounds` - full stored pixel extent
    /// * `nonzero_bounds` - sub-rectangle containing all nonzero flux
    ///
    /// # Errors
    /// Rejects empty bounds, a shape mismatch, nonzero bounds that escape the
    /// stored bounds, and grids without a single finite sample.
    pub fn new(
        data: Arc<Array2<f64>>,
        init_bounds: Bounds,
        nonzero_bounds: Bounds,
    ) -> Result<Self, ProfileError> {
        check_shape(&data, &init_bounds)?;
        if !nonzero_bounds.is_defined() {
            return Err(ProfileError::UndefinedBounds(nonzero_bounds));
        }
        if !init_bounds.contains(&nonzero_bounds) {
            return Err(ProfileError::BoundsNotContained {
                nonzero: nonzero_bounds,
                init: init_bounds,
            });
        }
        if !data.iter().any(|v| v.is_finite()) {
            return Err(ProfileError::NoFiniteSamples);
        }
        Ok(Self {
            data,
            init_bounds,
            nonzero_bounds,
        })
    }

    /// Wrap a bare array with origin-centered bounds and no nonzero-flux
    /// information (the nonzero extent defaults to the full extent).
    pub fn centered(data: Arc<Array2<f64>>) -> Result<Self, ProfileError> {
        let (rows, cols) = data.dim();
        let bounds = Bounds::centered(cols, rows);
        Self::new(data, bounds, bounds)
    }

    /// Full stored extent.
    pub fn init_bounds(&self) -> Bounds {
        self.init_bounds
    }

    /// Sub-rectangle guaranteed to contain all nonzero flux.
    pub fn nonzero_bounds(&self) -> Bounds {
        self.nonzero_bounds
    }

    /// Borrow the raw samples.
    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    /// Sample at pixel `(x, y)`; zero outside the stored bounds.
    pub fn value(&self, x: i32, y: i32) -> f64 {
        if !self.init_bounds.contains_point(x, y) {
            return 0.0;
        }
        let row = (y - self.init_bounds.ymin) as usize;
        let col = (x - self.init_bounds.xmin) as usize;
        self.data[[row, col]]
    }

    /// Sum of all finite samples.
    pub fn total_flux(&self) -> f64 {
        self.data.iter().filter(|v| v.is_finite()).sum()
    }

    /// Flux-weighted centroid in pixel coordinates.
    ///
    /// Falls back to the center of the nonzero bounds when the total flux is
    /// not positive, so downstream radial measurements always have an anchor.
    pub fn centroid(&self) -> (f64, f64) {
        let mut m00 = 0.0;
        let mut m10 = 0.0;
        let mut m01 = 0.0;
        for ((row, col), &v) in self.data.indexed_iter() {
            if !v.is_finite() {
                continue;
            }
            let x = (self.init_bounds.xmin + col as i32) as f64;
            let y = (self.init_bounds.ymin + row as i32) as f64;
            m00 += v;
            m10 += x * v;
            m01 += y * v;
        }
        if m00 > 0.0 {
            (m10 / m00, m01 / m00)
        } else {
            self.nonzero_bounds.center()
        }
    }
}

/// Complex-valued Fourier sample grid on a frequency-index lattice.
#[derive(Debug, Clone)]
pub struct KGrid {
    data: Arc<Array2<Complex64>>,
    bounds: Bounds,
}

impl KGrid {
    /// Wrap a shared Fourier-sample buffer with its lattice extent.
    pub fn new(data: Arc<Array2<Complex64>>, bounds: Bounds) -> Result<Self, ProfileError> {
        check_shape(&data, &bounds)?;
        if !data.iter().any(|v| v.re.is_finite() && v.im.is_finite()) {
            return Err(ProfileError::NoFiniteSamples);
        }
        Ok(Self { data, bounds })
    }

    /// Wrap a bare array with origin-centered lattice bounds.
    pub fn centered(data: Arc<Array2<Complex64>>) -> Result<Self, ProfileError> {
        let (rows, cols) = data.dim();
        let bounds = Bounds::centered(cols, rows);
        Self::new(data, bounds)
    }

    /// Lattice extent of the stored samples.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Borrow the raw samples.
    pub fn view(&self) -> ArrayView2<'_, Complex64> {
        self.data.view()
    }

    /// Sample at lattice point `(i, j)`; zero outside the stored bounds.
    pub fn value(&self, i: i32, j: i32) -> Complex64 {
        if !self.bounds.contains_point(i, j) {
            return Complex64::new(0.0, 0.0);
        }
        let row = (j - self.bounds.ymin) as usize;
        let col = (i - self.bounds.xmin) as usize;
        self.data[[row, col]]
    }
}
