//! Collaborator contracts the engine depends on, with reference
//! implementations for the CLI and tests.
//!
//! Discovery of a real drawable surface and its palette widgets lives in the
//! host UI, outside this crate; the engine only sees these traits.

pub mod image;
pub mod kv;
pub mod palette;
pub mod surface;

pub use image::{decode_image, ALPHA_THRESHOLD};
pub use kv::{FileStore, KvStore, MemoryStore};
pub use palette::{brush, Brush, FixedPalette, PaletteSource};
pub use surface::{PngSurface, Surface};
