//! Palette source collaborators.
//!
//! The engine talks to a [`PaletteSource`]: something that can enumerate the
//! currently selectable swatches (with their locked state) and activate one
//! of them. Swatch ids are valid only for the scan that produced them.

use std::cell::Cell;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use serde::Deserialize;

use crate::error::{PlacerError, Result};
use crate::types::{Colour, PaletteEntry, SwatchId};

/// Shared "currently active colour" between a palette source and a surface.
///
/// Mirrors the host UI, where selecting a swatch changes what subsequent
/// placements paint. Single-threaded by design.
pub type Brush = Rc<Cell<Colour>>;

/// Create a brush with the default (black) colour active.
pub fn brush() -> Brush {
    Rc::new(Cell::new(Colour::BLACK))
}

pub trait PaletteSource {
    /// Discover the currently selectable swatches.
    ///
    /// Every call is a fresh snapshot; ids from earlier scans are stale.
    fn scan(&mut self) -> Vec<PaletteEntry>;

    /// Activate the swatch behind `id`.
    fn select(&mut self, id: SwatchId) -> Result<()>;
}

/// A configured, in-process palette: a list of colours with a locked subset.
///
/// Selecting a swatch paints it onto the shared [`Brush`]. Locked swatches
/// still appear in scans but refuse selection, like their UI counterparts.
#[derive(Debug, Clone)]
pub struct FixedPalette {
    swatches: Vec<(Colour, bool)>,
    brush: Brush,
}

impl FixedPalette {
    pub fn new(swatches: Vec<(Colour, bool)>, brush: Brush) -> Self {
        Self { swatches, brush }
    }

    /// A palette with no swatches at all.
    pub fn empty(brush: Brush) -> Self {
        Self::new(Vec::new(), brush)
    }

    /// Load a palette description from a YAML file.
    ///
    /// ```yaml
    /// colours:
    ///   - "#ff0000"
    ///   - "#00ff00"
    /// locked:
    ///   - "#ff0000"
    /// ```
    pub fn from_yaml(path: &Path, brush: Brush) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| PlacerError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let file: PaletteFile = serde_yaml::from_str(&content).map_err(|e| PlacerError::Parse {
            message: format!("Invalid palette file: {}", e),
            help: Some("Expected `colours:` (and optional `locked:`) lists of hex colours".to_string()),
        })?;

        let mut locked = Vec::with_capacity(file.locked.len());
        for hex in &file.locked {
            locked.push(Colour::from_hex(hex)?);
        }

        let mut swatches = Vec::with_capacity(file.colours.len());
        for hex in &file.colours {
            let colour = Colour::from_hex(hex)?;
            swatches.push((colour, locked.contains(&colour)));
        }

        Ok(Self::new(swatches, brush))
    }

    /// The colour most recently selected through this palette.
    pub fn active(&self) -> Colour {
        self.brush.get()
    }
}

impl PaletteSource for FixedPalette {
    fn scan(&mut self) -> Vec<PaletteEntry> {
        self.swatches
            .iter()
            .enumerate()
            .map(|(i, &(colour, locked))| PaletteEntry::new(SwatchId::new(i), colour, locked))
            .collect()
    }

    fn select(&mut self, id: SwatchId) -> Result<()> {
        let (colour, locked) =
            *self
                .swatches
                .get(id.index())
                .ok_or_else(|| PlacerError::Surface {
                    message: format!("Stale swatch id {}", id.index()),
                    help: Some("Rescan the palette before selecting".to_string()),
                })?;

        if locked {
            return Err(PlacerError::Surface {
                message: format!("Swatch {} is locked", colour),
                help: None,
            });
        }

        self.brush.set(colour);
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PaletteFile {
    colours: Vec<String>,
    #[serde(default)]
    locked: Vec<String>,
}
