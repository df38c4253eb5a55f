//! WebAssembly exports for graytone filters.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. Images travel
//! as flat row-major `f32` buffers (length = width * height, values 0.0-1.0).
//! Errors are returned as JavaScript strings.

use ndarray::Array2;
use wasm_bindgen::prelude::*;

use crate::error::FilterError;
use crate::filters::{box_kernel, convolve, disk_kernel, equalize_hist, EqualizeParams, Kernel};

fn to_array(data: &[f32], width: usize, height: usize) -> Result<Array2<f32>, JsValue> {
    Array2::from_shape_vec((height, width), data.to_vec())
        .map_err(|e| JsValue::from_str(&format!("invalid dimensions: {e}")))
}

fn js_error(err: FilterError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn blur(data: &[f32], width: usize, height: usize, kernel: Kernel) -> Result<Vec<f32>, JsValue> {
    let input = to_array(data, width, height)?;
    let result = convolve(input.view(), &kernel).map_err(js_error)?;
    Ok(result.into_raw_vec_and_offset().0)
}

// ============================================================================
// Histogram Equalization
// ============================================================================

/// Equalize a grayscale image.
///
/// # Arguments
/// * `data` - Flat array of floats (length = width * height), values 0.0-1.0
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `nbins` - Histogram bin count (256 is the usual choice)
/// * `use_sqrt` - Accumulate sqrt of bin counts
///
/// # Returns
/// Flat array of equalized floats
#[wasm_bindgen]
pub fn equalize_hist_wasm(
    data: &[f32],
    width: usize,
    height: usize,
    nbins: usize,
    use_sqrt: bool,
) -> Result<Vec<f32>, JsValue> {
    let input = to_array(data, width, height)?;
    let params = EqualizeParams::default()
        .with_nbins(nbins)
        .with_sqrt(use_sqrt);
    let result = equalize_hist(input.view(), &params).map_err(js_error)?;
    Ok(result.into_raw_vec_and_offset().0)
}

// ============================================================================
// Kernel Blur
// ============================================================================

/// Blur with an `n x n` box kernel (reflected borders).
#[wasm_bindgen]
pub fn box_blur_wasm(data: &[f32], width: usize, height: usize, n: usize) -> Result<Vec<f32>, JsValue> {
    let kernel = box_kernel(n).map_err(js_error)?;
    blur(data, width, height, kernel)
}

/// Blur with an odd `n x n` disk kernel (reflected borders).
#[wasm_bindgen]
pub fn disk_blur_wasm(data: &[f32], width: usize, height: usize, n: usize) -> Result<Vec<f32>, JsValue> {
    let kernel = disk_kernel(n).map_err(js_error)?;
    blur(data, width, height, kernel)
}
