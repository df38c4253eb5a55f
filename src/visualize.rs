//! Image + histogram grid rendering.
//!
//! Each [`Panel`] becomes one column: the image scaled through its
//! [`DisplayRange`] on top, a 256-bin histogram over [0, 1] below it.
//! Samples outside [0, 1] are left out of the histogram, the way a plot
//! clipped to that x-range would hide them.

use image::{GrayImage, Luma};
use ndarray::ArrayView2;

use crate::error::{FilterError, Result};
use crate::filters::core::min_max;
use crate::filters::histogram::{histogram, SourceRange};

const HIST_BINS: usize = 256;
const HIST_HEIGHT: u32 = 96;
const GAP: u32 = 8;
const BACKGROUND: u8 = 255;
const BAR: u8 = 0;

/// Intensity window mapped to black..white (`vmin`/`vmax`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayRange {
    vmin: f32,
    vmax: f32,
}

impl DisplayRange {
    /// # Errors
    /// `InvalidArgument` unless both bounds are finite and `vmax > vmin`.
    pub fn new(vmin: f32, vmax: f32) -> Result<Self> {
        if !(vmin.is_finite() && vmax.is_finite() && vmax > vmin) {
            return Err(FilterError::invalid(format!(
                "display range needs finite vmin < vmax, got {vmin}..{vmax}"
            )));
        }
        Ok(DisplayRange { vmin, vmax })
    }

    /// The normalized [0, 1] window.
    pub fn unit() -> Self {
        DisplayRange { vmin: 0.0, vmax: 1.0 }
    }

    /// The image's own min..max. Constant and empty images get a window
    /// one unit wide around their value (or [0, 1]).
    pub fn of(image: ArrayView2<f32>) -> Self {
        match min_max(image) {
            Some((lo, hi)) if hi > lo && lo.is_finite() && hi.is_finite() => {
                DisplayRange { vmin: lo, vmax: hi }
            }
            Some((v, _)) if v.is_finite() => DisplayRange {
                vmin: v - 0.5,
                vmax: v + 0.5,
            },
            _ => Self::unit(),
        }
    }

    pub fn vmin(&self) -> f32 {
        self.vmin
    }

    pub fn vmax(&self) -> f32 {
        self.vmax
    }

    /// Map a sample to an 8-bit gray level, saturating outside the window.
    #[inline]
    pub fn to_u8(&self, v: f32) -> u8 {
        let t = ((v - self.vmin) / (self.vmax - self.vmin)).clamp(0.0, 1.0);
        (t * 255.0).round() as u8
    }
}

impl Default for DisplayRange {
    fn default() -> Self {
        Self::unit()
    }
}

/// One column of the grid.
#[derive(Debug, Clone, Copy)]
pub struct Panel<'a> {
    pub image: ArrayView2<'a, f32>,
    pub range: DisplayRange,
}

impl<'a> Panel<'a> {
    pub fn new(image: ArrayView2<'a, f32>, range: DisplayRange) -> Self {
        Panel { image, range }
    }
}

/// Render an 8-bit view of `image` through `range`.
pub fn render_gray(image: ArrayView2<f32>, range: DisplayRange) -> Result<GrayImage> {
    let (height, width) = image.dim();
    let (w, h) = (dim_u32(width)?, dim_u32(height)?);
    Ok(GrayImage::from_fn(w, h, |x, y| {
        Luma([range.to_u8(image[[y as usize, x as usize]])])
    }))
}

/// Compose panels side by side, each image above its histogram.
///
/// # Errors
/// `InvalidArgument` if `panels` is empty or an image is too large to render.
pub fn render_imghist(panels: &[Panel]) -> Result<GrayImage> {
    if panels.is_empty() {
        return Err(FilterError::invalid("at least one panel is required"));
    }

    let mut image_height = 0u32;
    let mut column_widths = Vec::with_capacity(panels.len());
    for panel in panels {
        let (h, w) = panel.image.dim();
        image_height = image_height.max(dim_u32(h)?);
        column_widths.push(dim_u32(w)?.max(HIST_BINS as u32));
    }

    let total_width = column_widths.iter().sum::<u32>() + GAP * (panels.len() as u32 + 1);
    let total_height = image_height + HIST_HEIGHT + 3 * GAP;
    let mut canvas = GrayImage::from_pixel(total_width, total_height, Luma([BACKGROUND]));

    let mut left = GAP;
    for (panel, &column_width) in panels.iter().zip(&column_widths) {
        let tile = render_gray(panel.image, panel.range)?;
        for (x, y, px) in tile.enumerate_pixels() {
            canvas.put_pixel(left + x, GAP + y, *px);
        }

        let hist = histogram(panel.image, HIST_BINS, SourceRange::Unit)?;
        let peak = hist.counts().iter().copied().max().unwrap_or(0);
        let hist_top = GAP * 2 + image_height;
        if peak > 0 {
            for (bin, &count) in hist.counts().iter().enumerate() {
                let bar = ((count as f64 / peak as f64) * HIST_HEIGHT as f64).round() as u32;
                let x = left + bin as u32;
                for dy in 0..bar {
                    canvas.put_pixel(x, hist_top + HIST_HEIGHT - 1 - dy, Luma([BAR]));
                }
            }
        }

        left += column_width + GAP;
    }

    Ok(canvas)
}

fn dim_u32(n: usize) -> Result<u32> {
    u32::try_from(n).map_err(|_| FilterError::invalid(format!("dimension {n} exceeds u32")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn test_display_range_mapping() {
        let r = DisplayRange::unit();
        assert_eq!(r.to_u8(0.0), 0);
        assert_eq!(r.to_u8(1.0), 255);
        assert_eq!(r.to_u8(-3.0), 0);
        assert_eq!(r.to_u8(0.5), 128);

        let r = DisplayRange::new(-0.5, 0.5).unwrap();
        assert_eq!(r.to_u8(0.0), 128);
        assert!(DisplayRange::new(1.0, 1.0).is_err());
    }

    #[test]
    fn test_display_range_of_image() {
        let img = array![[-0.2f32, 0.3], [0.1, 0.0]];
        let r = DisplayRange::of(img.view());
        assert_eq!((r.vmin(), r.vmax()), (-0.2, 0.3));

        let flat = Array2::<f32>::from_elem((2, 2), 0.5);
        let r = DisplayRange::of(flat.view());
        assert_eq!((r.vmin(), r.vmax()), (0.0, 1.0));
    }

    #[test]
    fn test_render_gray() {
        let img = array![[0.0f32, 1.0, 0.5]];
        let out = render_gray(img.view(), DisplayRange::unit()).unwrap();
        assert_eq!(out.dimensions(), (3, 1));
        assert_eq!(out.get_pixel(1, 0)[0], 255);
    }

    #[test]
    fn test_render_imghist_layout() {
        let a = Array2::<f32>::from_elem((10, 20), 0.25);
        let b = Array2::<f32>::from_elem((30, 300), 0.75);
        let grid = render_imghist(&[
            Panel::new(a.view(), DisplayRange::unit()),
            Panel::new(b.view(), DisplayRange::unit()),
        ])
        .unwrap();

        // Columns: max(20, 256) and max(300, 256), three gaps
        assert_eq!(grid.width(), 256 + 300 + 3 * GAP);
        assert_eq!(grid.height(), 30 + HIST_HEIGHT + 3 * GAP);

        // First image pixel, and the full-height bar for 0.25 (bin 64)
        assert_eq!(grid.get_pixel(GAP, GAP)[0], 64);
        let hist_bottom = 2 * GAP + 30 + HIST_HEIGHT - 1;
        assert_eq!(grid.get_pixel(GAP + 64, hist_bottom)[0], BAR);
        assert_eq!(grid.get_pixel(GAP + 64, hist_bottom - HIST_HEIGHT + 1)[0], BAR);
        assert_eq!(grid.get_pixel(GAP + 10, hist_bottom)[0], BACKGROUND);
    }

    #[test]
    fn test_render_imghist_requires_panels() {
        assert!(render_imghist(&[]).is_err());
    }
}
