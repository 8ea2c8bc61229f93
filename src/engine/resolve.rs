//! Lock-aware colour resolution policy.
//!
//! Given one task's target colour and the current palette snapshot, decide
//! what selection action to take. The policy is re-evaluated independently
//! per task, so a rescan that unlocks more swatches can change outcomes
//! mid-run.

use crate::types::{Colour, LockedMode, PaletteEntry, PaletteSnapshot};

/// The outcome of resolving one target colour.
///
/// A tagged variant rather than a sentinel value: "selection intentionally
/// skipped" and "no automatic selection possible" are different things.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Select this swatch, then place.
    Selected(PaletteEntry),
    /// Advance past the task without placing anything.
    Skip,
    /// Place with whatever colour is active externally; the session
    /// downgrades to manual mode.
    DeferToManual,
}

/// Resolve `target` against the snapshot under the given locked-colour mode.
pub fn resolve(palette: &PaletteSnapshot, target: Colour, mode: LockedMode) -> Resolution {
    if palette.is_empty() {
        return Resolution::DeferToManual;
    }

    let closest = match palette.nearest(target, false) {
        Some(entry) => *entry,
        None => return Resolution::DeferToManual,
    };

    if !closest.locked {
        return Resolution::Selected(closest);
    }

    match mode {
        LockedMode::Skip => Resolution::Skip,
        LockedMode::Manual => Resolution::DeferToManual,
        LockedMode::Map => match palette.nearest(target, true) {
            Some(alt) => Resolution::Selected(*alt),
            None => Resolution::DeferToManual,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SwatchId;

    fn snapshot(colours: &[(Colour, bool)]) -> PaletteSnapshot {
        let mut snap = PaletteSnapshot::new();
        snap.replace(
            colours
                .iter()
                .enumerate()
                .map(|(i, &(colour, locked))| PaletteEntry::new(SwatchId::new(i), colour, locked))
                .collect(),
        );
        snap
    }

    // Palette from the policy table: A locked at distance 1, B unlocked at
    // distance 5 from the target.
    fn table_palette() -> (PaletteSnapshot, Colour) {
        let target = Colour::rgb(100, 0, 0);
        let snap = snapshot(&[
            (Colour::rgb(101, 0, 0), true),
            (Colour::rgb(105, 0, 0), false),
        ]);
        (snap, target)
    }

    #[test]
    fn test_unlocked_closest_selected() {
        let snap = snapshot(&[
            (Colour::rgb(255, 0, 0), false),
            (Colour::rgb(0, 0, 255), false),
        ]);

        let result = resolve(&snap, Colour::rgb(250, 0, 0), LockedMode::Skip);
        match result {
            Resolution::Selected(entry) => assert_eq!(entry.colour, Colour::rgb(255, 0, 0)),
            other => panic!("expected Selected, got {:?}", other),
        }
    }

    #[test]
    fn test_locked_closest_skip_mode() {
        let (snap, target) = table_palette();
        assert_eq!(resolve(&snap, target, LockedMode::Skip), Resolution::Skip);
    }

    #[test]
    fn test_locked_closest_manual_mode() {
        let (snap, target) = table_palette();
        assert_eq!(
            resolve(&snap, target, LockedMode::Manual),
            Resolution::DeferToManual
        );
    }

    #[test]
    fn test_locked_closest_map_mode_substitutes() {
        let (snap, target) = table_palette();
        match resolve(&snap, target, LockedMode::Map) {
            Resolution::Selected(entry) => {
                assert_eq!(entry.colour, Colour::rgb(105, 0, 0));
                assert!(!entry.locked);
            }
            other => panic!("expected Selected, got {:?}", other),
        }
    }

    #[test]
    fn test_map_mode_with_everything_locked_defers() {
        let snap = snapshot(&[(Colour::BLACK, true), (Colour::WHITE, true)]);
        assert_eq!(
            resolve(&snap, Colour::BLACK, LockedMode::Map),
            Resolution::DeferToManual
        );
    }

    #[test]
    fn test_empty_palette_defers_in_every_mode() {
        let snap = PaletteSnapshot::new();
        for mode in [LockedMode::Skip, LockedMode::Map, LockedMode::Manual] {
            assert_eq!(resolve(&snap, Colour::BLACK, mode), Resolution::DeferToManual);
        }
    }
}
