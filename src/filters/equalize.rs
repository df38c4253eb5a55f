//! Histogram equalization.
//!
//! Remaps intensities through the image's own cumulative distribution so the
//! output histogram is approximately flat. The mapping is monotonic and
//! continuous: pixel values are interpolated linearly between bin centers.

use ndarray::{Array2, ArrayView2};
use tracing::{debug, instrument};

use super::core::{ensure_non_empty, ensure_unit_range};
use super::histogram::{
    cumulative_distribution, ensure_nbins, histogram, SourceRange, DEFAULT_NBINS,
};
use crate::error::Result;

/// Parameters for [`equalize_hist`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EqualizeParams {
    /// Histogram bin count, at least 2.
    pub nbins: usize,
    /// Accumulate `sqrt(count)` instead of `count`, damping histogram peaks.
    pub use_sqrt: bool,
    /// Range covered by the histogram bins.
    pub source_range: SourceRange,
}

impl Default for EqualizeParams {
    fn default() -> Self {
        EqualizeParams {
            nbins: DEFAULT_NBINS,
            use_sqrt: false,
            source_range: SourceRange::Unit,
        }
    }
}

impl EqualizeParams {
    pub fn with_nbins(mut self, nbins: usize) -> Self {
        self.nbins = nbins;
        self
    }

    pub fn with_sqrt(mut self, use_sqrt: bool) -> Self {
        self.use_sqrt = use_sqrt;
        self
    }

    pub fn with_source_range(mut self, source_range: SourceRange) -> Self {
        self.source_range = source_range;
        self
    }
}

/// Equalize the histogram of a grayscale image.
///
/// # Arguments
/// * `image` - Grayscale image (height, width), values 0.0-1.0
/// * `params` - Bin count, square-root damping and histogram range
///
/// # Returns
/// New image of the same shape with values in [0, 1]
///
/// # Errors
/// * `InvalidArgument` - `nbins` outside `2..=MAX_NBINS`, or a sample outside
///   [0, 1]
/// * `DegenerateInput` - empty image
///
/// Parameter errors are reported before input errors.
#[instrument(skip(image), fields(shape = ?image.dim()))]
pub fn equalize_hist(image: ArrayView2<f32>, params: &EqualizeParams) -> Result<Array2<f32>> {
    ensure_nbins(params.nbins)?;
    ensure_non_empty(image)?;
    ensure_unit_range(image)?;

    let hist = histogram(image, params.nbins, params.source_range)?;
    let cdf = cumulative_distribution(&hist, params.use_sqrt)?;

    let output = image.mapv(|v| cdf.map(v));

    debug!(
        nbins = params.nbins,
        use_sqrt = params.use_sqrt,
        first = cdf.values()[0],
        "histogram equalized"
    );
    Ok(output)
}
