//! Drawable surface collaborators.
//!
//! The engine places at device coordinates through the [`Surface`] trait.
//! [`PngSurface`] is the reference implementation: an in-process canvas that
//! paints each placement with the shared brush colour and can be saved as a
//! PNG for inspection.

use std::path::{Path, PathBuf};

use image::{ImageBuffer, Rgba, RgbaImage};

use crate::error::{PlacerError, Result};

use super::palette::Brush;

pub trait Surface {
    /// Try to locate the drawable surface. `false` means not found.
    fn locate(&mut self) -> Result<bool>;

    /// Place one cell at device coordinates relative to the surface origin.
    fn place(&mut self, x: i64, y: i64) -> Result<()>;
}

/// Simulated canvas backed by an RGBA image buffer.
#[derive(Debug)]
pub struct PngSurface {
    canvas: RgbaImage,
    brush: Brush,
    placements: usize,
}

impl PngSurface {
    pub fn new(width: u32, height: u32, brush: Brush) -> Self {
        Self {
            canvas: ImageBuffer::new(width, height),
            brush,
            placements: 0,
        }
    }

    /// Number of successful placements so far.
    pub fn placements(&self) -> usize {
        self.placements
    }

    /// Write the canvas to a PNG file.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.canvas.save(path).map_err(|e| PlacerError::Io {
            path: PathBuf::from(path),
            message: format!("Failed to write PNG: {}", e),
        })
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.canvas.get_pixel(x, y).0
    }
}

impl Surface for PngSurface {
    fn locate(&mut self) -> Result<bool> {
        Ok(self.canvas.width() > 0 && self.canvas.height() > 0)
    }

    fn place(&mut self, x: i64, y: i64) -> Result<()> {
        if x < 0 || y < 0 || x >= self.canvas.width() as i64 || y >= self.canvas.height() as i64 {
            return Err(PlacerError::Surface {
                message: format!("Placement ({}, {}) is outside the canvas", x, y),
                help: Some("Check the start offset and cell calibration".to_string()),
            });
        }

        let colour = self.brush.get();
        self.canvas.put_pixel(x as u32, y as u32, Rgba(colour.to_rgba()));
        self.placements += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::palette::brush;
    use crate::types::Colour;
    use tempfile::tempdir;

    #[test]
    fn test_place_paints_brush_colour() {
        let b = brush();
        b.set(Colour::rgb(255, 0, 0));
        let mut surface = PngSurface::new(4, 4, b);

        assert!(surface.locate().unwrap());
        surface.place(1, 2).unwrap();

        assert_eq!(surface.pixel(1, 2), [255, 0, 0, 255]);
        assert_eq!(surface.placements(), 1);
    }

    #[test]
    fn test_place_out_of_bounds_fails() {
        let mut surface = PngSurface::new(2, 2, brush());
        assert!(surface.place(2, 0).is_err());
        assert!(surface.place(-1, 0).is_err());
        assert_eq!(surface.placements(), 0);
    }

    #[test]
    fn test_zero_sized_surface_is_not_located() {
        let mut surface = PngSurface::new(0, 0, brush());
        assert!(!surface.locate().unwrap());
    }

    #[test]
    fn test_save_and_read_back() {
        let b = brush();
        b.set(Colour::rgb(0, 255, 0));
        let mut surface = PngSurface::new(2, 1, b);
        surface.place(0, 0).unwrap();

        let dir = tempdir().unwrap();
        let path = dir.path().join("canvas.png");
        surface.save(&path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.get_pixel(0, 0).0, [0, 255, 0, 255]);
        assert_eq!(img.get_pixel(1, 0).0, [0, 0, 0, 0]);
    }
}
