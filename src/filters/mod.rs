//! Filter modules for grayscale image processing.
//!
//! ## Image Format
//!
//! | Format | Shape | Type | Description |
//! |--------|-------|------|-------------|
//! | Grayscale float | (H, W) | f32 | Single luminance channel, 0.0-1.0 |
//!
//! Inputs are borrowed as `ArrayView2<f32>`; every filter returns a new
//! `Array2<f32>` of the same shape.
//!
//! ## Filter Categories
//!
//! - **Tonal**: histogram, cumulative distribution, equalize_hist
//! - **Spatial**: box_kernel, disk_kernel, convolve
//! - **Diagnostics**: ImageInfo, difference

pub mod core;
pub mod histogram;
pub mod equalize;
pub mod kernel;
pub mod convolve;

pub use self::convolve::{convolve, convolve_with};
pub use self::core::{difference, BorderMode, ImageInfo};
pub use self::equalize::{equalize_hist, EqualizeParams};
pub use self::histogram::{cumulative_distribution, histogram, Cdf, Histogram, SourceRange};
pub use self::kernel::{box_kernel, circular_mask, disk_kernel, Kernel};
