//! 2D convolution of grayscale images with square kernels.
//!
//! Computes `out[y, x] = Σ k[i, j] · in[y + c - i, x + c - j]` with
//! `c = size / 2`, i.e. a true convolution (kernel flipped), matching
//! `scipy.ndimage.convolve` for odd kernels. Samples outside the image come
//! from the [`BorderMode`]; the default is [`BorderMode::Reflect`].
//!
//! Output values are not clamped.

use ndarray::{Array2, ArrayView2};
use rayon::prelude::*;
use tracing::{debug, instrument};

use super::core::BorderMode;
use super::kernel::Kernel;
use crate::error::{FilterError, Result};

/// Convolve `image` with `kernel` using reflected borders.
///
/// # Arguments
/// * `image` - Grayscale image (height, width)
/// * `kernel` - Square kernel
///
/// # Returns
/// Filtered image with the same shape
pub fn convolve(image: ArrayView2<f32>, kernel: &Kernel) -> Result<Array2<f32>> {
    convolve_with(image, kernel, BorderMode::default())
}

/// Convolve `image` with `kernel` using the given border mode.
///
/// Kernels larger than the image are allowed; border extension repeats as
/// needed. An empty image yields an empty output of the same shape.
#[instrument(skip(image, kernel), fields(shape = ?image.dim(), size = kernel.size()))]
pub fn convolve_with(
    image: ArrayView2<f32>,
    kernel: &Kernel,
    mode: BorderMode,
) -> Result<Array2<f32>> {
    let (height, width) = image.dim();
    if image.is_empty() {
        return Ok(Array2::zeros((height, width)));
    }

    let weights = kernel.weights();
    let size = kernel.size();
    let center = (size / 2) as isize;
    let cval = match mode {
        BorderMode::Constant(v) => v,
        _ => 0.0,
    };

    // Non-zero taps only; disk kernels are mostly zero in the corners
    let taps: Vec<(isize, isize, f32)> = weights
        .indexed_iter()
        .filter(|(_, &w)| w != 0.0)
        .map(|((ky, kx), &w)| (center - ky as isize, center - kx as isize, w))
        .collect();

    let mut data = vec![0.0f32; height * width];
    data.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        for (x, out) in row.iter_mut().enumerate() {
            let mut sum = 0.0f32;
            for &(dy, dx, w) in &taps {
                let sy = mode.index(y as isize + dy, height);
                let sx = mode.index(x as isize + dx, width);
                let v = match (sy, sx) {
                    (Some(sy), Some(sx)) => image[[sy, sx]],
                    _ => cval,
                };
                sum += w * v;
            }
            *out = sum;
        }
    });

    debug!(taps = taps.len(), ?mode, "convolved");
    Array2::from_shape_vec((height, width), data)
        .map_err(|e| FilterError::invalid(format!("output shape: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::kernel::{box_kernel, disk_kernel};
    use ndarray::{array, Array2};

    fn assert_close(a: &Array2<f32>, b: &Array2<f32>, tol: f32) {
        assert_eq!(a.dim(), b.dim());
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < tol, "{x} vs {y}");
        }
    }

    /// 5x5 kernel whose middle row is `row`, zeros elsewhere.
    fn row_kernel(row: [f32; 5]) -> Kernel {
        let mut w = Array2::<f32>::zeros((5, 5));
        for (i, v) in row.iter().enumerate() {
            w[[2, i]] = *v;
        }
        Kernel::from_weights(w).unwrap()
    }

    #[test]
    fn test_constant_image_unchanged() {
        let img = Array2::<f32>::from_elem((4, 4), 0.5);
        let result = convolve(img.view(), &box_kernel(3).unwrap()).unwrap();
        assert_close(&result, &img, 1e-6);
    }

    #[test]
    fn test_kernel_is_flipped() {
        // Raw taps [0, 2, 1, 1, 0] -> [0, 0.5, 0.25, 0.25, 0]
        // out[x] = 0.5 in[x+1] + 0.25 in[x] + 0.25 in[x-1]
        let img = array![[0.1f32, 0.2, 0.3]];
        let k = row_kernel([0.0, 2.0, 1.0, 1.0, 0.0]);
        let result = convolve(img.view(), &k).unwrap();
        assert_close(&result, &array![[0.15f32, 0.225, 0.275]], 1e-6);
    }

    #[test]
    fn test_border_modes() {
        // out[x] = 0.5 in[x+2] + 0.5 in[x-2]
        let img = array![[0.1f32, 0.2, 0.3]];
        let k = row_kernel([0.5, 0.0, 0.0, 0.0, 0.5]);

        // Reflect: 0.2 0.1 | 0.1 0.2 0.3 | 0.3 0.2
        let reflect = convolve_with(img.view(), &k, BorderMode::Reflect).unwrap();
        assert_close(&reflect, &array![[0.25f32, 0.2, 0.15]], 1e-6);

        // Nearest: 0.1 0.1 | 0.1 0.2 0.3 | 0.3 0.3
        let nearest = convolve_with(img.view(), &k, BorderMode::Nearest).unwrap();
        assert_close(&nearest, &array![[0.2f32, 0.2, 0.2]], 1e-6);

        let constant = convolve_with(img.view(), &k, BorderMode::Constant(0.0)).unwrap();
        assert_close(&constant, &array![[0.15f32, 0.0, 0.05]], 1e-6);

        let constant_one = convolve_with(img.view(), &k, BorderMode::Constant(1.0)).unwrap();
        assert_close(&constant_one, &array![[0.65f32, 1.0, 0.55]], 1e-6);
    }

    #[test]
    fn test_impulse_response_is_kernel() {
        let mut img = Array2::<f32>::zeros((7, 7));
        img[[3, 3]] = 1.0;
        let k = disk_kernel(5).unwrap();
        let result = convolve_with(img.view(), &k, BorderMode::Constant(0.0)).unwrap();

        let center = result.slice(ndarray::s![1..6, 1..6]).to_owned();
        assert_close(&center, k.weights(), 1e-7);
        assert_eq!(result[[0, 0]], 0.0);
        assert!((result.sum() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_kernel_larger_than_image() {
        let img = array![[0.4f32]];
        let result = convolve(img.view(), &box_kernel(15).unwrap()).unwrap();
        assert_eq!(result.dim(), (1, 1));
        assert!((result[[0, 0]] - 0.4).abs() < 1e-5);
    }

    #[test]
    fn test_shape_preserved() {
        let img = Array2::from_shape_fn((9, 13), |(y, x)| ((y * 13 + x) % 7) as f32 / 6.0);
        for k in [box_kernel(3).unwrap(), disk_kernel(5).unwrap(), box_kernel(4).unwrap()] {
            let result = convolve(img.view(), &k).unwrap();
            assert_eq!(result.dim(), img.dim());
        }
    }

    #[test]
    fn test_zero_sum_kernel() {
        // Laplacian of a constant image is zero everywhere
        let k = Kernel::from_raw_weights(array![
            [0.0f32, 1.0, 0.0],
            [1.0, -4.0, 1.0],
            [0.0, 1.0, 0.0]
        ])
        .unwrap();
        let flat = Array2::<f32>::from_elem((5, 5), 0.3);
        let result = convolve(flat.view(), &k).unwrap();
        assert_close(&result, &Array2::zeros((5, 5)), 1e-6);

        let mut img = Array2::<f32>::zeros((3, 3));
        img[[1, 1]] = 1.0;
        let result = convolve_with(img.view(), &k, BorderMode::Constant(0.0)).unwrap();
        assert_close(&result, k.weights(), 1e-7);
    }

    #[test]
    fn test_empty_image() {
        let img = Array2::<f32>::zeros((0, 5));
        let result = convolve(img.view(), &box_kernel(3).unwrap()).unwrap();
        assert_eq!(result.dim(), (0, 5));
    }
}
