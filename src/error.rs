//! Error type shared by all filters.

use thiserror::Error;

/// Errors raised by the histogram and kernel filters.
///
/// Every error is detected at the violated precondition, before any output
/// is produced.
#[derive(Debug, Error)]
pub enum FilterError {
    /// A parameter or sample is outside its valid domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The input carries no usable mass (empty image, zero histogram weight).
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// Decoding or encoding an image file failed.
    #[cfg(feature = "io")]
    #[error("image I/O failed: {0}")]
    Image(#[from] image::ImageError),
}

impl FilterError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        FilterError::InvalidArgument(msg.into())
    }

    pub(crate) fn degenerate(msg: impl Into<String>) -> Self {
        FilterError::DegenerateInput(msg.into())
    }
}

/// Alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FilterError>;
