//! Core utilities shared by the filters.
//!
//! This module provides:
//! - Border extension for sampling outside the image
//! - Input validation for normalized grayscale images
//! - Diagnostics (shape and data range) and difference images

use std::fmt;

use ndarray::{Array2, ArrayView2, Zip};
use tracing::warn;

use crate::error::{FilterError, Result};

// ============================================================================
// Border Handling
// ============================================================================

/// How samples outside the image are synthesized during convolution.
///
/// Names follow `scipy.ndimage`:
///
/// | Mode | Extension of `a b c d` |
/// |------|------------------------|
/// | `Reflect` | `d c b a \| a b c d \| d c b a` |
/// | `Nearest` | `a a a a \| a b c d \| d d d d` |
/// | `Constant(k)` | `k k k k \| a b c d \| k k k k` |
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BorderMode {
    /// Half-sample symmetric reflection (edge pixel repeated once).
    Reflect,
    /// Edge replication.
    Nearest,
    /// Fixed value outside the image.
    Constant(f32),
}

impl Default for BorderMode {
    fn default() -> Self {
        BorderMode::Reflect
    }
}

impl BorderMode {
    /// Parse a scipy-style mode name. `cval` is used for `"constant"`.
    pub fn from_name(name: &str, cval: f32) -> Result<Self> {
        match name {
            "reflect" => Ok(BorderMode::Reflect),
            "nearest" => Ok(BorderMode::Nearest),
            "constant" => Ok(BorderMode::Constant(cval)),
            other => Err(FilterError::invalid(format!(
                "unknown border mode {other:?} (expected reflect, nearest or constant)"
            ))),
        }
    }

    /// Map a possibly out-of-range coordinate onto `0..len`.
    ///
    /// Returns `None` when the sample should take the constant value.
    /// `len` must be non-zero.
    #[inline]
    pub fn index(self, i: isize, len: usize) -> Option<usize> {
        let n = len as isize;
        if (0..n).contains(&i) {
            return Some(i as usize);
        }
        match self {
            BorderMode::Reflect => {
                let period = 2 * n;
                let m = i.rem_euclid(period);
                let j = if m < n { m } else { period - 1 - m };
                Some(j as usize)
            }
            BorderMode::Nearest => Some(i.clamp(0, n - 1) as usize),
            BorderMode::Constant(_) => None,
        }
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Reject images with samples outside [0, 1] (NaN included).
pub fn ensure_unit_range(image: ArrayView2<f32>) -> Result<()> {
    if let Some(((y, x), &v)) = image
        .indexed_iter()
        .find(|(_, v)| !(0.0..=1.0).contains(*v))
    {
        warn!(y, x, value = v, "sample outside [0, 1]");
        return Err(FilterError::invalid(format!(
            "sample at ({y}, {x}) is {v}, expected a value in [0, 1]"
        )));
    }
    Ok(())
}

/// Reject images with no pixels.
pub fn ensure_non_empty(image: ArrayView2<f32>) -> Result<()> {
    if image.is_empty() {
        let (h, w) = image.dim();
        return Err(FilterError::degenerate(format!("image of shape ({h}, {w}) has no pixels")));
    }
    Ok(())
}

/// Minimum and maximum sample, or `None` for an empty image.
pub fn min_max(image: ArrayView2<f32>) -> Option<(f32, f32)> {
    image.iter().fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

// ============================================================================
// Diagnostics
// ============================================================================

/// Shape and data range of an image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageInfo {
    pub height: usize,
    pub width: usize,
    /// `None` for an empty image.
    pub range: Option<(f32, f32)>,
}

impl ImageInfo {
    pub fn of(image: ArrayView2<f32>) -> Self {
        let (height, width) = image.dim();
        ImageInfo {
            height,
            width,
            range: min_max(image),
        }
    }
}

impl fmt::Display for ImageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) f32, data range: ", self.height, self.width)?;
        match self.range {
            Some((lo, hi)) => write!(f, "{lo} to {hi}"),
            None => write!(f, "empty"),
        }
    }
}

/// Elementwise `a - b`. Values are not clamped and may be negative.
pub fn difference(a: ArrayView2<f32>, b: ArrayView2<f32>) -> Result<Array2<f32>> {
    if a.dim() != b.dim() {
        return Err(FilterError::invalid(format!(
            "shape mismatch: {:?} vs {:?}",
            a.dim(),
            b.dim()
        )));
    }
    Ok(Zip::from(&a).and(&b).map_collect(|&x, &y| x - y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_reflect_index() {
        // d c b a | a b c d | d c b a
        let m = BorderMode::Reflect;
        let got: Vec<usize> = (-4..8).map(|i| m.index(i, 4).unwrap()).collect();
        assert_eq!(got, vec![3, 2, 1, 0, 0, 1, 2, 3, 3, 2, 1, 0]);
    }

    #[test]
    fn test_reflect_index_wraps_for_short_axis() {
        // Length-1 axis always maps to 0
        for i in -5..5 {
            assert_eq!(BorderMode::Reflect.index(i, 1), Some(0));
        }
        // Length 2: b a a b | a b | b a a b
        assert_eq!(BorderMode::Reflect.index(-3, 2), Some(1));
        assert_eq!(BorderMode::Reflect.index(5, 2), Some(1));
    }

    #[test]
    fn test_nearest_and_constant_index() {
        assert_eq!(BorderMode::Nearest.index(-3, 4), Some(0));
        assert_eq!(BorderMode::Nearest.index(9, 4), Some(3));
        assert_eq!(BorderMode::Constant(0.0).index(-1, 4), None);
        assert_eq!(BorderMode::Constant(0.0).index(2, 4), Some(2));
    }

    #[test]
    fn test_mode_from_name() {
        assert_eq!(BorderMode::from_name("reflect", 0.0).unwrap(), BorderMode::Reflect);
        assert_eq!(
            BorderMode::from_name("constant", 0.25).unwrap(),
            BorderMode::Constant(0.25)
        );
        assert!(matches!(
            BorderMode::from_name("wrap", 0.0),
            Err(FilterError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_unit_range_validation() {
        assert!(ensure_unit_range(array![[0.0, 1.0], [0.5, 0.25]].view()).is_ok());
        assert!(ensure_unit_range(array![[0.0, 1.01]].view()).is_err());
        assert!(ensure_unit_range(array![[-0.1]].view()).is_err());
        assert!(ensure_unit_range(array![[f32::NAN]].view()).is_err());
    }

    #[test]
    fn test_image_info_display() {
        let img = array![[0.25f32, 0.5], [0.75, 0.125]];
        let info = ImageInfo::of(img.view());
        assert_eq!(info.range, Some((0.125, 0.75)));
        assert_eq!(info.to_string(), "(2, 2) f32, data range: 0.125 to 0.75");

        let empty = Array2::<f32>::zeros((0, 3));
        assert_eq!(ImageInfo::of(empty.view()).to_string(), "(0, 3) f32, data range: empty");
    }

    #[test]
    fn test_difference_allows_negative() {
        let a = array![[0.2f32, 0.9]];
        let b = array![[0.5f32, 0.4]];
        let d = difference(a.view(), b.view()).unwrap();
        assert!((d[[0, 0]] + 0.3).abs() < 1e-6);
        assert!((d[[0, 1]] - 0.5).abs() < 1e-6);

        let c = array![[0.5f32], [0.4]];
        assert!(difference(a.view(), c.view()).is_err());
    }
}
