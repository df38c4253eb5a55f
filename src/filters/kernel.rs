//! Blur kernels: box (uniform) and disk (inverse distance).
//!
//! Every [`Kernel`] is square. The box and disk constructors and
//! [`Kernel::from_weights`] normalize the weights to sum 1.0, which keeps the
//! mean intensity of a convolved image unchanged; [`Kernel::from_raw_weights`]
//! keeps them as given.

use ndarray::Array2;
use tracing::debug;

use crate::error::{FilterError, Result};

/// Square 2D weight matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    weights: Array2<f32>,
}

impl Kernel {
    /// Wrap caller-supplied weights, normalizing them to sum 1.
    ///
    /// # Errors
    /// `InvalidArgument` if the weights are empty, not square, non-finite,
    /// or sum to zero.
    pub fn from_weights(weights: Array2<f32>) -> Result<Self> {
        Self::normalized(Self::from_raw_weights(weights)?.weights)
    }

    /// Wrap caller-supplied weights unchanged. Zero-sum kernels such as a
    /// Laplacian are accepted.
    ///
    /// # Errors
    /// `InvalidArgument` if the weights are empty, not square, or non-finite.
    pub fn from_raw_weights(weights: Array2<f32>) -> Result<Self> {
        let (rows, cols) = weights.dim();
        if rows == 0 || rows != cols {
            return Err(FilterError::invalid(format!(
                "kernel must be square and non-empty, got ({rows}, {cols})"
            )));
        }
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(FilterError::invalid("kernel weights must be finite"));
        }
        Ok(Kernel { weights })
    }

    fn normalized(mut weights: Array2<f32>) -> Result<Self> {
        let sum: f32 = weights.sum();
        if sum == 0.0 {
            return Err(FilterError::invalid("kernel weights sum to zero"));
        }
        weights.mapv_inplace(|w| w / sum);
        Ok(Kernel { weights })
    }

    /// Side length.
    pub fn size(&self) -> usize {
        self.weights.nrows()
    }

    /// Sum of all weights (1.0 up to rounding).
    pub fn sum(&self) -> f32 {
        self.weights.sum()
    }

    pub fn weights(&self) -> &Array2<f32> {
        &self.weights
    }

    pub fn into_inner(self) -> Array2<f32> {
        self.weights
    }
}

/// Uniform `n x n` kernel, every weight `1 / (n * n)`.
///
/// Even sizes are allowed; the convolver centers them at `n / 2`.
///
/// # Errors
/// `InvalidArgument` if `n == 0`.
pub fn box_kernel(n: usize) -> Result<Kernel> {
    if n == 0 {
        return Err(FilterError::invalid("box kernel size must be positive"));
    }
    let value = 1.0 / (n * n) as f32;
    debug!(size = n, "box kernel");
    Ok(Kernel {
        weights: Array2::from_elem((n, n), value),
    })
}

/// Circular mask of odd side `n`: `true` where `x² + y² <= r²`,
/// with `r = (n - 1) / 2` and offsets measured from the center cell.
///
/// # Errors
/// `InvalidArgument` if `n` is zero or even.
pub fn circular_mask(n: usize) -> Result<Array2<bool>> {
    let r = odd_radius(n)?;
    let r_sq = r * r;
    Ok(Array2::from_shape_fn((n, n), |(row, col)| {
        let (dy, dx) = (row as isize - r, col as isize - r);
        dx * dx + dy * dy <= r_sq
    }))
}

/// Disk kernel of odd side `n`.
///
/// Cells inside the circular mask weigh `1 / distance` to the center (the
/// center itself weighs 1); cells outside weigh 0. Weights are normalized.
///
/// # Errors
/// `InvalidArgument` if `n` is zero or even.
pub fn disk_kernel(n: usize) -> Result<Kernel> {
    let r = odd_radius(n)?;
    let mask = circular_mask(n)?;

    let weights = Array2::from_shape_fn((n, n), |(row, col)| {
        if !mask[[row, col]] {
            return 0.0;
        }
        let (dy, dx) = ((row as isize - r) as f32, (col as isize - r) as f32);
        let dist = (dx * dx + dy * dy).sqrt();
        if dist == 0.0 {
            1.0
        } else {
            1.0 / dist
        }
    });

    debug!(size = n, radius = r, "disk kernel");
    Kernel::normalized(weights)
}

fn odd_radius(n: usize) -> Result<isize> {
    if n == 0 || n % 2 == 0 {
        return Err(FilterError::invalid(format!(
            "kernel size must be a positive odd integer, got {n}"
        )));
    }
    Ok(((n - 1) / 2) as isize)
}
