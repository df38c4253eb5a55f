//! Equalize and blur a grayscale image, then write image + histogram grids.
//!
//! ```text
//! cargo run --example blur_compare --features io -- --image cars.jpg --out out/
//! ```

use std::path::PathBuf;

use clap::Parser;
use graytone::filters::{difference, ImageInfo};
use graytone::io::{load_gray, save_gray};
use graytone::visualize::{render_imghist, DisplayRange, Panel};
use graytone::{box_kernel, convolve, disk_kernel, equalize_hist, EqualizeParams};
use tracing::info;

type DemoResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "blur_compare")]
#[command(about = "Histogram equalization and box vs. disk blur on one image")]
struct Cli {
    /// Path to the input image (converted to grayscale).
    #[arg(long)]
    image: PathBuf,

    /// Directory for the rendered PNGs.
    #[arg(long, default_value = "out")]
    out: PathBuf,

    /// Blur kernel size (odd).
    #[arg(long, default_value = "15")]
    size: usize,

    /// Histogram bins for equalization.
    #[arg(long, default_value = "256")]
    nbins: usize,

    /// Accumulate sqrt of bin counts when equalizing.
    #[arg(long)]
    use_sqrt: bool,
}

fn main() -> DemoResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    std::fs::create_dir_all(&cli.out)?;

    let original = load_gray(&cli.image)?;
    info!(info = %ImageInfo::of(original.view()), "original");

    // Equalization: original and equalized side by side, both on [0, 1]
    let params = EqualizeParams::default()
        .with_nbins(cli.nbins)
        .with_sqrt(cli.use_sqrt);
    let equalized = equalize_hist(original.view(), &params)?;
    info!(info = %ImageInfo::of(equalized.view()), "equalized");
    render_imghist(&[
        Panel::new(original.view(), DisplayRange::unit()),
        Panel::new(equalized.view(), DisplayRange::unit()),
    ])?
    .save(cli.out.join("equalize.png"))?;

    // Box vs. disk blur, each with its difference image. The difference is
    // shown through the blurred image's own range.
    for (name, kernel) in [("box", box_kernel(cli.size)?), ("disk", disk_kernel(cli.size)?)] {
        let blurred = convolve(original.view(), &kernel)?;
        let diff = difference(blurred.view(), original.view())?;
        info!(kernel = name, info = %ImageInfo::of(blurred.view()), "blurred");
        info!(kernel = name, info = %ImageInfo::of(diff.view()), "blurred - original");

        let range = DisplayRange::of(blurred.view());
        save_gray(cli.out.join(format!("{name}_blur.png")), blurred.view(), range)?;
        render_imghist(&[
            Panel::new(blurred.view(), range),
            Panel::new(diff.view(), range),
        ])?
        .save(cli.out.join(format!("{name}_grid.png")))?;
    }

    info!(out = %cli.out.display(), "done");
    Ok(())
}
