//! Final raster assembly and on-disk artifacts.
//!
//! Takes the drawn pixmap, flattens it onto the requested background,
//! crops away empty border rows and columns, and writes the PNG plus a
//! plain-text sidecar carrying the geographic corner coordinates of the
//! render extent.

use std::path::{Path, PathBuf};

use image::{ImageBuffer, Rgba, RgbaImage};
use tiny_skia::Pixmap;

use track_common::{BoundingBox, TrackResult};

use crate::png;

/// Extension of the coordinate sidecar written next to the PNG.
pub const SIDECAR_EXTENSION: &str = "coordsGPS.txt";

/// Paths and dimensions of a finished render.
#[derive(Debug, Clone)]
pub struct FinishedOutput {
    pub image_path: PathBuf,
    pub sidecar_path: PathBuf,
    /// Final raster width after cropping, px.
    pub width: u32,
    /// Final raster height after cropping, px.
    pub height: u32,
}

/// Flatten, crop, and write both output files.
pub fn finish(
    pixmap: Pixmap,
    extent: &BoundingBox,
    output: &Path,
    transparent: bool,
) -> TrackResult<FinishedOutput> {
    let flattened = flatten(&pixmap, transparent);
    let cropped = crop_to_content(&flattened, transparent);
    let (width, height) = cropped.dimensions();

    let encoded = png::encode_auto(cropped.as_raw(), width as usize, height as usize)?;
    std::fs::write(output, &encoded)?;

    let sidecar_path = sidecar_path(output);
    std::fs::write(&sidecar_path, sidecar_contents(extent))?;

    tracing::info!(
        image = %output.display(),
        sidecar = %sidecar_path.display(),
        width,
        height,
        "Wrote render output"
    );

    Ok(FinishedOutput {
        image_path: output.to_path_buf(),
        sidecar_path,
        width,
        height,
    })
}

/// Resolve premultiplied pixmap storage into straight RGBA, compositing
/// onto opaque white unless a transparent background was requested.
fn flatten(pixmap: &Pixmap, transparent: bool) -> RgbaImage {
    let (w, h) = (pixmap.width(), pixmap.height());
    let mut img: RgbaImage = if transparent {
        ImageBuffer::from_pixel(w, h, Rgba([0, 0, 0, 0]))
    } else {
        ImageBuffer::from_pixel(w, h, Rgba([255, 255, 255, 255]))
    };

    for (i, px) in pixmap.pixels().iter().enumerate() {
        let c = px.demultiply();
        let (x, y) = (i as u32 % w, i as u32 / w);
        if transparent {
            img.put_pixel(x, y, Rgba([c.red(), c.green(), c.blue(), c.alpha()]));
        } else if c.alpha() > 0 {
            // Source-over onto white.
            let a = c.alpha() as u32;
            let blend = |s: u8| ((s as u32 * a + 255 * (255 - a)) / 255) as u8;
            img.put_pixel(
                x,
                y,
                Rgba([blend(c.red()), blend(c.green()), blend(c.blue()), 255]),
            );
        }
    }

    img
}

/// Crop away fully-background rows and columns at every edge.
///
/// Background is transparent pixels on a transparent render, opaque
/// white otherwise. An image that is entirely background is returned
/// unchanged, and a second pass over an already-cropped image is a
/// no-op.
pub fn crop_to_content(img: &RgbaImage, transparent: bool) -> RgbaImage {
    let is_background = |p: &Rgba<u8>| {
        if transparent {
            p.0[3] == 0
        } else {
            p.0 == [255, 255, 255, 255]
        }
    };

    let (w, h) = img.dimensions();
    let mut min_x = w;
    let mut min_y = h;
    let mut max_x = 0u32;
    let mut max_y = 0u32;

    for (x, y, p) in img.enumerate_pixels() {
        if !is_background(p) {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }

    if min_x > max_x {
        return img.clone();
    }

    image::imageops::crop_imm(img, min_x, min_y, max_x - min_x + 1, max_y - min_y + 1).to_image()
}

/// Sidecar path for an output image: the image's extension is replaced,
/// so `route.png` pairs with `route.coordsGPS.txt`.
pub fn sidecar_path(output: &Path) -> PathBuf {
    output.with_extension(SIDECAR_EXTENSION)
}

/// Corner coordinates of the render extent, one corner per line in the
/// order top-left, top-right, bottom-right, bottom-left. Fifteen
/// decimals, semicolon-separated, no trailing newline.
pub fn sidecar_contents(extent: &BoundingBox) -> String {
    extent
        .corners()
        .iter()
        .map(|c| format!("{:.15};{:.15}", c.lat, c.lon))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white_image(w: u32, h: u32) -> RgbaImage {
        ImageBuffer::from_pixel(w, h, Rgba([255, 255, 255, 255]))
    }

    #[test]
    fn test_crop_trims_background_border() {
        let mut img = white_image(100, 100);
        img.put_pixel(30, 40, Rgba([0, 0, 255, 255]));
        img.put_pixel(60, 70, Rgba([255, 0, 0, 255]));

        let cropped = crop_to_content(&img, false);
        assert_eq!(cropped.dimensions(), (31, 31));
        assert_eq!(cropped.get_pixel(0, 0), &Rgba([0, 0, 255, 255]));
        assert_eq!(cropped.get_pixel(30, 30), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_crop_is_idempotent() {
        let mut img = white_image(50, 50);
        img.put_pixel(10, 10, Rgba([0, 0, 0, 255]));
        img.put_pixel(20, 25, Rgba([0, 0, 0, 255]));

        let once = crop_to_content(&img, false);
        let twice = crop_to_content(&once, false);
        assert_eq!(once.dimensions(), twice.dimensions());
        assert_eq!(once.as_raw(), twice.as_raw());
    }

    #[test]
    fn test_crop_all_background_unchanged() {
        let img = white_image(20, 20);
        assert_eq!(crop_to_content(&img, false).dimensions(), (20, 20));

        let clear: RgbaImage = ImageBuffer::from_pixel(20, 20, Rgba([0, 0, 0, 0]));
        assert_eq!(crop_to_content(&clear, true).dimensions(), (20, 20));
    }

    #[test]
    fn test_transparent_crop_keys_on_alpha() {
        // A white-but-translucent pixel is content on a transparent
        // background.
        let mut img: RgbaImage = ImageBuffer::from_pixel(10, 10, Rgba([0, 0, 0, 0]));
        img.put_pixel(5, 5, Rgba([255, 255, 255, 128]));
        assert_eq!(crop_to_content(&img, true).dimensions(), (1, 1));
    }

    #[test]
    fn test_sidecar_path_replaces_extension() {
        assert_eq!(
            sidecar_path(Path::new("/tmp/out.png")),
            PathBuf::from("/tmp/out.coordsGPS.txt")
        );
    }

    #[test]
    fn test_sidecar_contents_shape() {
        let extent = BoundingBox::new(45.0, 6.0, 45.1, 6.1);
        let contents = sidecar_contents(&extent);

        let lines: Vec<&str> = contents.split('\n').collect();
        assert_eq!(lines.len(), 4);
        assert!(!contents.ends_with('\n'));
        // Top-left first: max lat, min lon.
        assert_eq!(lines[0], "45.100000000000000;6.000000000000000");
        // Bottom-left last: min lat, min lon.
        assert_eq!(lines[3], "45.000000000000000;6.000000000000000");
        for line in lines {
            let parts: Vec<&str> = line.split(';').collect();
            assert_eq!(parts.len(), 2);
            for part in parts {
                assert_eq!(part.split('.').nth(1).unwrap().len(), 15);
            }
        }
    }

    #[test]
    fn test_flatten_composites_onto_white() {
        let mut pixmap = Pixmap::new(4, 4).unwrap();
        pixmap.fill(tiny_skia::Color::TRANSPARENT);
        let img = flatten(&pixmap, false);
        assert_eq!(img.get_pixel(0, 0), &Rgba([255, 255, 255, 255]));

        let img = flatten(&pixmap, true);
        assert_eq!(img.get_pixel(0, 0), &Rgba([0, 0, 0, 0]));
    }
}
