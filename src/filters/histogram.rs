//! Intensity histograms and cumulative distributions.
//!
//! Histograms partition a value range into equal-width bins. The last bin is
//! closed on the right, so the range maximum is counted in bin `nbins - 1`.
//! Samples outside the range (and NaN) are not counted.

use ndarray::ArrayView2;
use tracing::debug;

use super::core::min_max;
use crate::error::{FilterError, Result};

/// Default bin count for histograms and equalization.
pub const DEFAULT_NBINS: usize = 256;

/// Upper bound on the bin count.
pub const MAX_NBINS: usize = 1 << 20;

/// Which value range the histogram bins cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceRange {
    /// Fixed [0, 1], the domain of normalized images.
    #[default]
    Unit,
    /// The image's own `[min, max]`. A constant image `v` widens to
    /// `[v - 0.5, v + 0.5]`.
    Image,
}

/// Bin counts paired with ascending bin centers.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    counts: Vec<u64>,
    bin_centers: Vec<f32>,
    range: (f32, f32),
}

impl Histogram {
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn bin_centers(&self) -> &[f32] {
        &self.bin_centers
    }

    /// Lower and upper bound covered by the bins.
    pub fn range(&self) -> (f32, f32) {
        self.range
    }

    pub fn nbins(&self) -> usize {
        self.counts.len()
    }

    /// Number of samples counted.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// Compute an `nbins`-bin histogram of `image`.
///
/// # Arguments
/// * `image` - Grayscale image (height, width)
/// * `nbins` - Number of bins, in `2..=MAX_NBINS`
/// * `source` - Range covered by the bins
///
/// # Errors
/// `InvalidArgument` if `nbins` is outside `2..=MAX_NBINS`, `DegenerateInput`
/// if the image is empty and `source` is [`SourceRange::Image`].
pub fn histogram(image: ArrayView2<f32>, nbins: usize, source: SourceRange) -> Result<Histogram> {
    ensure_nbins(nbins)?;

    let (lo, hi) = match source {
        SourceRange::Unit => (0.0f32, 1.0f32),
        SourceRange::Image => {
            let (lo, hi) = min_max(image)
                .ok_or_else(|| FilterError::degenerate("cannot derive a range from an empty image"))?;
            if hi > lo {
                (lo, hi)
            } else {
                (lo - 0.5, hi + 0.5)
            }
        }
    };

    let span = (hi - lo) as f64;
    let scale = nbins as f64 / span;

    let mut counts = vec![0u64; nbins];
    for &v in image.iter() {
        if !(lo..=hi).contains(&v) {
            continue;
        }
        let bin = (((v - lo) as f64 * scale) as usize).min(nbins - 1);
        counts[bin] += 1;
    }

    let width = span / nbins as f64;
    let bin_centers = (0..nbins)
        .map(|i| (lo as f64 + (i as f64 + 0.5) * width) as f32)
        .collect();

    debug!(nbins, lo, hi, samples = image.len(), "histogram computed");

    Ok(Histogram {
        counts,
        bin_centers,
        range: (lo, hi),
    })
}

pub(crate) fn ensure_nbins(nbins: usize) -> Result<()> {
    if !(2..=MAX_NBINS).contains(&nbins) {
        return Err(FilterError::invalid(format!(
            "nbins must be in 2..={MAX_NBINS}, got {nbins}"
        )));
    }
    Ok(())
}

// ============================================================================
// Cumulative Distribution
// ============================================================================

/// Normalized cumulative distribution over histogram bin centers.
///
/// Values are non-decreasing and the last one is exactly 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct Cdf {
    values: Vec<f32>,
    bin_centers: Vec<f32>,
}

impl Cdf {
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn bin_centers(&self) -> &[f32] {
        &self.bin_centers
    }

    /// Piecewise-linear interpolation of `v` over `(center, cdf)` pairs.
    ///
    /// Clamps to the first/last CDF value outside the center range. NaN maps
    /// to NaN.
    pub fn map(&self, v: f32) -> f32 {
        if v.is_nan() {
            return f32::NAN;
        }
        let centers = &self.bin_centers;
        let last = centers.len() - 1;
        if v <= centers[0] {
            return self.values[0];
        }
        if v >= centers[last] {
            return self.values[last];
        }

        // First center strictly above v; always in 1..=last here
        let hi = centers.partition_point(|&c| c <= v);
        let lo = hi - 1;
        let t = (v - centers[lo]) / (centers[hi] - centers[lo]);
        let (a, b) = (self.values[lo], self.values[hi]);
        // Rounding must not overshoot the next breakpoint
        (a + t * (b - a)).min(b)
    }
}

/// Build the normalized CDF of `hist`.
///
/// With `use_sqrt`, each count contributes `sqrt(count)` instead of `count`,
/// which damps dominant peaks.
///
/// # Errors
/// `DegenerateInput` if the weighted counts sum to zero.
pub fn cumulative_distribution(hist: &Histogram, use_sqrt: bool) -> Result<Cdf> {
    let mut running = 0.0f64;
    let cumulative: Vec<f64> = hist
        .counts
        .iter()
        .map(|&c| {
            running += if use_sqrt { (c as f64).sqrt() } else { c as f64 };
            running
        })
        .collect();

    let total = running;
    if total <= 0.0 {
        return Err(FilterError::degenerate(
            "histogram has zero total weight, CDF is undefined",
        ));
    }

    let values = cumulative.iter().map(|&c| (c / total) as f32).collect();

    Ok(Cdf {
        values,
        bin_centers: hist.bin_centers.clone(),
    })
}
