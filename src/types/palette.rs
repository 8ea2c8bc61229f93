//! Palette snapshot and nearest-colour lookup.
//!
//! The snapshot holds whatever swatches the palette source discovered on its
//! last scan. It is replaced wholesale on every rescan; swatch ids from an
//! earlier snapshot must not be carried across a replace.

use super::colour::{distance, Colour};

/// Opaque reference to a selectable swatch.
///
/// Valid only for the scan that produced it. The core never persists one or
/// compares ids across scans; only the owning palette source can interpret it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwatchId(usize);

impl SwatchId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

/// One selectable swatch: its id, colour, and whether the acting session is
/// currently permitted to select it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteEntry {
    pub id: SwatchId,
    pub colour: Colour,
    pub locked: bool,
}

impl PaletteEntry {
    pub const fn new(id: SwatchId, colour: Colour, locked: bool) -> Self {
        Self { id, colour, locked }
    }
}

/// The current snapshot of selectable swatches.
#[derive(Debug, Clone, Default)]
pub struct PaletteSnapshot {
    entries: Vec<PaletteEntry>,
}

impl PaletteSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire stored set with a fresh scan.
    ///
    /// This is an idempotent snapshot replace, not a merge. All entries from
    /// the previous snapshot become invalid.
    pub fn replace(&mut self, entries: Vec<PaletteEntry>) {
        self.entries = entries;
    }

    /// The entry closest to `target` by Euclidean RGB distance.
    ///
    /// When `restrict_to_unlocked` is set, locked entries are excluded from
    /// consideration entirely. Ties keep the first entry in scan order.
    /// Returns `None` when no candidate exists; callers treat that as "no
    /// automatic selection possible", not as an error.
    pub fn nearest(&self, target: Colour, restrict_to_unlocked: bool) -> Option<&PaletteEntry> {
        let mut best: Option<(&PaletteEntry, f64)> = None;

        for entry in &self.entries {
            if restrict_to_unlocked && entry.locked {
                continue;
            }
            let d = distance(target, entry.colour);
            match best {
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((entry, d)),
            }
        }

        best.map(|(entry, _)| entry)
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
