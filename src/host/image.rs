//! Image decoding into a task queue.
//!
//! Decodes and downsizes an image preserving aspect ratio, never upscaling.
//! Pixels whose alpha falls below the threshold produce no task at all, as
//! opposed to a zero-colour task.

use std::path::Path;

use image::{DynamicImage, RgbaImage};

use crate::error::{PlacerError, Result};
use crate::types::{Colour, PixelTask, TaskQueue};

/// Pixels with alpha below this are omitted from the task set.
pub const ALPHA_THRESHOLD: u8 = 128;

/// Decode an image file into a normalized task queue.
pub fn decode_image(path: &Path, max_width: u32, max_height: u32) -> Result<TaskQueue> {
    let img = image::open(path).map_err(|e| PlacerError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to decode image: {}", e),
    })?;

    Ok(queue_from_rgba(&fit(img, max_width, max_height).to_rgba8()))
}

/// Downscale to fit within the bounds, preserving aspect ratio.
///
/// Images already inside the bounds pass through untouched; this never
/// upscales.
fn fit(img: DynamicImage, max_width: u32, max_height: u32) -> DynamicImage {
    if img.width() <= max_width && img.height() <= max_height {
        return img;
    }
    img.thumbnail(max_width.max(1), max_height.max(1))
}

fn queue_from_rgba(img: &RgbaImage) -> TaskQueue {
    let mut tasks = Vec::new();

    for (x, y, pixel) in img.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        if a < ALPHA_THRESHOLD {
            continue;
        }
        tasks.push(PixelTask::new(x, y, Colour::rgb(r, g, b)));
    }

    TaskQueue::from_tasks(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::tempdir;

    fn write_test_png(path: &Path, width: u32, height: u32, pixels: &[(u32, u32, [u8; 4])]) {
        let mut img = RgbaImage::new(width, height);
        for &(x, y, rgba) in pixels {
            img.put_pixel(x, y, Rgba(rgba));
        }
        img.save(path).unwrap();
    }

    #[test]
    fn test_decode_skips_transparent_pixels() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sprite.png");
        write_test_png(
            &path,
            2,
            1,
            &[(0, 0, [255, 0, 0, 255]), (1, 0, [0, 255, 0, 10])],
        );

        let queue = decode_image(&path, 64, 64).unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.get(0).unwrap().colour, Colour::rgb(255, 0, 0));
    }

    #[test]
    fn test_alpha_threshold_is_inclusive() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("edge.png");
        write_test_png(
            &path,
            2,
            1,
            &[(0, 0, [1, 2, 3, 128]), (1, 0, [4, 5, 6, 127])],
        );

        let queue = decode_image(&path, 64, 64).unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.get(0).unwrap().x, 0);
    }

    #[test]
    fn test_small_image_is_not_upscaled() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        write_test_png(&path, 2, 2, &[
            (0, 0, [255, 0, 0, 255]),
            (1, 0, [255, 0, 0, 255]),
            (0, 1, [255, 0, 0, 255]),
            (1, 1, [255, 0, 0, 255]),
        ]);

        let queue = decode_image(&path, 100, 100).unwrap();
        // 2x2 stays 2x2 even with a 100x100 budget.
        assert_eq!(queue.len(), 4);
        let max_x = queue.iter().map(|t| t.x).max().unwrap();
        assert_eq!(max_x, 1);
    }

    #[test]
    fn test_large_image_is_downscaled_within_bounds() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("big.png");
        let mut img = RgbaImage::new(40, 20);
        for pixel in img.pixels_mut() {
            *pixel = Rgba([0, 0, 255, 255]);
        }
        img.save(&path).unwrap();

        let queue = decode_image(&path, 10, 10).unwrap();
        assert!(!queue.is_empty());
        let max_x = queue.iter().map(|t| t.x).max().unwrap();
        let max_y = queue.iter().map(|t| t.y).max().unwrap();
        assert!(max_x < 10);
        assert!(max_y < 10);
    }

    #[test]
    fn test_decode_missing_file_fails() {
        let dir = tempdir().unwrap();
        assert!(decode_image(&dir.path().join("absent.png"), 10, 10).is_err());
    }

    #[test]
    fn test_tasks_ordered_row_major() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("order.png");
        write_test_png(
            &path,
            2,
            2,
            &[(1, 0, [255, 0, 0, 255]), (0, 1, [0, 255, 0, 255])],
        );

        let queue = decode_image(&path, 64, 64).unwrap();
        let coords: Vec<(u32, u32)> = queue.iter().map(|t| (t.x, t.y)).collect();
        assert_eq!(coords, vec![(1, 0), (0, 1)]);
    }
}
