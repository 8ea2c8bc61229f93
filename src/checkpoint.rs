//! Checkpoint persistence for resumable drawing sessions.
//!
//! One JSON record per keyed slot, overwritten on every save. The persisted
//! cursor is always zero: the remaining queue already excludes consumed
//! tasks, so a restore starts at the front of the trimmed list.
//!
//! Known boundary: the remaining queue is truncated to [`DEFAULT_QUEUE_CAP`]
//! tasks at save time. For a queue longer than the cap, a crash can
//! permanently lose the untruncated tail unless a later autosave captures a
//! shorter remainder first. `check_plan` warns when a plan crosses the cap.

use serde::{Deserialize, Serialize};

use crate::host::KvStore;
use crate::types::{PixelTask, SessionConfig};

/// Schema tag for the persisted record.
pub const CHECKPOINT_VERSION: u32 = 1;

/// Maximum number of remaining tasks persisted in one record.
pub const DEFAULT_QUEUE_CAP: usize = 50_000;

/// Default slot key.
pub const DEFAULT_KEY: &str = "placer::checkpoint";

/// The persisted session snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    pub version: u32,
    pub image_name: String,
    pub start_x: i64,
    pub start_y: i64,
    pub delay_ms: u64,
    /// Always 0 in the persisted form; the live cursor is engine state.
    pub cursor: u32,
    pub total_tasks: usize,
    pub remaining_queue: Vec<PixelTask>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cell_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cell_height: Option<u32>,
    pub saved_at: u64,
}

impl Checkpoint {
    /// Build a record from the live session.
    pub fn new(
        config: &SessionConfig,
        remaining: &[PixelTask],
        total_tasks: usize,
        saved_at: u64,
    ) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            image_name: config.image_name.clone(),
            start_x: config.start_x,
            start_y: config.start_y,
            delay_ms: config.delay_ms,
            cursor: 0,
            total_tasks,
            remaining_queue: remaining.to_vec(),
            cell_width: config.cell_width,
            cell_height: config.cell_height,
            saved_at,
        }
    }

    /// Apply the persisted configuration fields back onto a session config.
    ///
    /// The locked-colour mode is not part of the schema and is left as-is.
    pub fn apply_to(&self, config: &mut SessionConfig) {
        config.image_name = self.image_name.clone();
        config.start_x = self.start_x;
        config.start_y = self.start_y;
        config.delay_ms = self.delay_ms;
        config.cell_width = self.cell_width;
        config.cell_height = self.cell_height;
    }
}

/// Single-slot checkpoint store over any [`KvStore`].
#[derive(Debug)]
pub struct CheckpointStore<K: KvStore> {
    kv: K,
    key: String,
    cap: usize,
}

impl<K: KvStore> CheckpointStore<K> {
    pub fn new(kv: K) -> Self {
        Self {
            kv,
            key: DEFAULT_KEY.to_string(),
            cap: DEFAULT_QUEUE_CAP,
        }
    }

    /// Use a profile-specific slot key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Override the remaining-queue truncation cap.
    pub fn with_cap(mut self, cap: usize) -> Self {
        self.cap = cap;
        self
    }

    /// Persist the record, overwriting any prior value.
    ///
    /// Best-effort: serialization or storage failures are swallowed. The
    /// remaining queue is truncated to the cap if longer.
    pub fn save(&mut self, checkpoint: &Checkpoint) {
        let record = if checkpoint.remaining_queue.len() > self.cap {
            let mut truncated = checkpoint.clone();
            truncated.remaining_queue.truncate(self.cap);
            serde_json::to_string(&truncated)
        } else {
            serde_json::to_string(checkpoint)
        };

        if let Ok(json) = record {
            self.kv.set(&self.key, &json);
        }
    }

    /// Load the persisted record, if a valid one exists.
    ///
    /// Fails soft: a missing key, parse error, or schema-version mismatch
    /// all yield `None`.
    pub fn load(&self) -> Option<Checkpoint> {
        let json = self.kv.get(&self.key)?;
        let checkpoint: Checkpoint = serde_json::from_str(&json).ok()?;
        if checkpoint.version != CHECKPOINT_VERSION {
            return None;
        }
        Some(checkpoint)
    }

    /// Remove the slot. Best-effort.
    pub fn clear(&mut self) {
        self.kv.remove(&self.key);
    }
}
