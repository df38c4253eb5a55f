//! graytone
//!
//! Grayscale histogram equalization and box/disk kernel filtering on
//! `ndarray` images, with Python bindings via PyO3 and WASM bindings for
//! JavaScript.
//!
//! ## Image Format
//! Images are 2D `f32` arrays of shape (height, width) holding normalized
//! luminance in 0.0-1.0. Filters borrow their input and return a new array
//! of the same shape.
//!
//! ## Features
//! - `python`: PyO3 extension module `graytone`
//! - `wasm`: wasm-bindgen exports over flat `f32` buffers
//! - `io`: file loading/saving and the image + histogram grid renderer

pub mod error;
pub mod filters;

#[cfg(feature = "io")]
pub mod io;

#[cfg(feature = "io")]
pub mod visualize;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{FilterError, Result};
pub use filters::{
    box_kernel, convolve, convolve_with, disk_kernel, equalize_hist, BorderMode, EqualizeParams,
    ImageInfo, Kernel, SourceRange,
};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray1, PyArray2, PyReadonlyArray2};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::error::FilterError;
    use crate::filters::{self, BorderMode, EqualizeParams, Kernel, SourceRange};

    impl From<FilterError> for PyErr {
        fn from(err: FilterError) -> PyErr {
            PyValueError::new_err(err.to_string())
        }
    }

    // ========================================================================
    // Histogram Equalization
    // ========================================================================

    /// Equalize a grayscale f32 image (values 0.0-1.0).
    ///
    /// # Arguments
    /// * `image` - 2D array (height, width)
    /// * `nbins` - Histogram bin count (default: 256)
    /// * `use_sqrt` - Accumulate sqrt of bin counts (default: False)
    #[pyfunction]
    #[pyo3(signature = (image, nbins=256, use_sqrt=false))]
    pub fn equalize_hist<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, f32>,
        nbins: usize,
        use_sqrt: bool,
    ) -> PyResult<Bound<'py, PyArray2<f32>>> {
        let params = EqualizeParams::default()
            .with_nbins(nbins)
            .with_sqrt(use_sqrt);
        let result = filters::equalize_hist(image.as_array(), &params)?;
        Ok(result.into_pyarray(py))
    }

    /// Histogram over [0, 1]: returns (counts, bin_centers).
    #[pyfunction]
    #[pyo3(signature = (image, nbins=256))]
    pub fn histogram<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, f32>,
        nbins: usize,
    ) -> PyResult<(Bound<'py, PyArray1<u64>>, Bound<'py, PyArray1<f32>>)> {
        let hist = filters::histogram(image.as_array(), nbins, SourceRange::Unit)?;
        Ok((
            hist.counts().to_vec().into_pyarray(py),
            hist.bin_centers().to_vec().into_pyarray(py),
        ))
    }

    // ========================================================================
    // Kernels & Convolution
    // ========================================================================

    /// Uniform n x n kernel summing to 1.
    #[pyfunction]
    pub fn box_kernel<'py>(py: Python<'py>, n: usize) -> PyResult<Bound<'py, PyArray2<f32>>> {
        Ok(filters::box_kernel(n)?.into_inner().into_pyarray(py))
    }

    /// Inverse-distance disk kernel of odd size n, summing to 1.
    #[pyfunction]
    pub fn disk_kernel<'py>(py: Python<'py>, n: usize) -> PyResult<Bound<'py, PyArray2<f32>>> {
        Ok(filters::disk_kernel(n)?.into_inner().into_pyarray(py))
    }

    /// Convolve a grayscale image with a square kernel.
    ///
    /// Weights are used as given, like `scipy.ndimage.convolve`.
    ///
    /// # Arguments
    /// * `image` - 2D array (height, width)
    /// * `kernel` - Square 2D weights
    /// * `mode` - "reflect" (default), "nearest" or "constant"
    /// * `cval` - Fill value for "constant" mode (default: 0.0)
    #[pyfunction]
    #[pyo3(signature = (image, kernel, mode="reflect", cval=0.0))]
    pub fn convolve<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, f32>,
        kernel: PyReadonlyArray2<'py, f32>,
        mode: &str,
        cval: f32,
    ) -> PyResult<Bound<'py, PyArray2<f32>>> {
        let kernel = Kernel::from_raw_weights(kernel.as_array().to_owned())?;
        let mode = BorderMode::from_name(mode, cval)?;
        let result = filters::convolve_with(image.as_array(), &kernel, mode)?;
        Ok(result.into_pyarray(py))
    }

    /// graytone extension module
    #[pymodule]
    pub fn graytone(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(equalize_hist, m)?)?;
        m.add_function(wrap_pyfunction!(histogram, m)?)?;
        m.add_function(wrap_pyfunction!(box_kernel, m)?)?;
        m.add_function(wrap_pyfunction!(disk_kernel, m)?)?;
        m.add_function(wrap_pyfunction!(convolve, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::graytone;
