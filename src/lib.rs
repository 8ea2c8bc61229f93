//! placer - Resumable pixel placement driver
//!
//! A library for normalizing pixel task batches, resolving target colours
//! against a lock-aware palette, and driving a sequential, checkpointed
//! drawing session over a calibrated device grid.

pub mod checkpoint;
pub mod cli;
pub mod engine;
pub mod error;
pub mod host;
pub mod output;
pub mod types;
pub mod validation;

pub use checkpoint::{Checkpoint, CheckpointStore, CHECKPOINT_VERSION, DEFAULT_QUEUE_CAP};
pub use engine::{
    resolve, Clock, Engine, InstantClock, Resolution, RunReport, RunState, StopHandle, SystemClock,
};
pub use error::{PlacerError, Result};
pub use host::{
    brush, decode_image, Brush, FileStore, FixedPalette, KvStore, MemoryStore, PaletteSource,
    PngSurface, Surface,
};
pub use types::{
    Colour, LockedMode, PaletteEntry, PaletteSnapshot, PixelTask, Profile, RawPixel,
    SessionConfig, SwatchId, TaskQueue,
};
pub use validation::{check_plan, Diagnostic, Severity};
