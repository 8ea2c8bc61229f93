//! Core data model: colours, tasks, palette snapshots, and sessions.

pub mod colour;
pub mod palette;
pub mod session;
pub mod task;

pub use colour::{distance, Colour};
pub use palette::{PaletteEntry, PaletteSnapshot, SwatchId};
pub use session::{LockedMode, Profile, SessionConfig, PROFILE_FILENAME};
pub use task::{PixelTask, RawPixel, TaskQueue};
