//! Interpolated surface-brightness profiles for synthetic telescope imagery.
//!
//! This crate turns a discretely sampled pixel image into a continuous
//! profile that can be evaluated at arbitrary real-space positions or
//! Fourier frequencies, convolved with other profiles, and rendered onto new
//! pixel grids by downstream code. It provides the reconstruction-kernel
//! family, the real- and Fourier-space profile objects with their derived
//! sampling scalars (`stepK`, `maxK`), and the enclosed-flux radius solver
//! used to size antialiased transforms.
//!
//! Rendering, compositing, noise and image I/O live elsewhere in the
//! simulation stack; this crate only consumes a read-only pixel grid and an
//! accuracy configuration.

pub mod accuracy;
pub mod bounds;
pub mod error;
pub mod flux;
pub mod grid;
pub mod interpolant;
pub mod profile;

// Re-exports for easier access
pub use accuracy::AccuracyConfig;
pub use bounds::Bounds;
pub use error::ProfileError;
pub use flux::flux_containment_radius;
pub use grid::{KGrid, PixelGrid};
pub use interpolant::{Interpolant, InterpolantKind, Separable2d};
pub use profile::{InterpolatedKProfile, InterpolatedRealProfile, SurfaceBrightnessProfile};
