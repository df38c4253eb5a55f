//! Loading and saving grayscale images.
//!
//! Decoding is delegated to the `image` crate; color inputs are reduced to
//! luma. Loaded samples are `f32` in [0, 1].

use std::path::Path;

use ndarray::{Array2, ArrayView2};
use tracing::{debug, instrument};

use crate::error::{FilterError, Result};
use crate::visualize::{render_gray, DisplayRange};

/// Decode an image file into a single-channel `f32` array in [0, 1].
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_gray(path: impl AsRef<Path>) -> Result<Array2<f32>> {
    let luma = image::open(path.as_ref())?.to_luma32f();
    let (width, height) = luma.dimensions();
    let mut pixels = Array2::from_shape_vec((height as usize, width as usize), luma.into_raw())
        .map_err(|e| FilterError::invalid(format!("decoded buffer: {e}")))?;

    // Float-valued sources may exceed the unit range
    pixels.mapv_inplace(|v| v.clamp(0.0, 1.0));

    debug!(width, height, "image loaded");
    Ok(pixels)
}

/// Write `image` as an 8-bit grayscale file; the format follows the extension.
#[instrument(skip_all, fields(path = %path.as_ref().display(), shape = ?image.dim()))]
pub fn save_gray(path: impl AsRef<Path>, image: ArrayView2<f32>, range: DisplayRange) -> Result<()> {
    render_gray(image, range)?.save(path.as_ref())?;
    debug!("image saved");
    Ok(())
}
