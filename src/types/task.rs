//! Pixel tasks and the canonical task queue.
//!
//! Raw pixel descriptions are normalized into a deduplicated queue ordered
//! ascending by `(y, x)`. The queue is replaced wholesale by each successful
//! load and consumed from the front by the drawing engine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{PlacerError, Result};

use super::Colour;

/// One unit of work: place `colour` at logical coordinate `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelTask {
    pub x: u32,
    pub y: u32,
    #[serde(rename = "color")]
    pub colour: Colour,
}

impl PixelTask {
    pub const fn new(x: u32, y: u32, colour: Colour) -> Self {
        Self { x, y, colour }
    }
}

/// An unvalidated pixel description, as found in raw task-list input.
///
/// Coordinates are signed so that negative values can be rejected with a
/// validation error rather than a type error at the parse boundary.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPixel {
    pub x: i64,
    pub y: i64,
    #[serde(rename = "color")]
    pub colour: String,
}

/// An ordered, deduplicated sequence of [`PixelTask`].
///
/// Invariants: no two tasks share `(x, y)` (the last-specified colour wins
/// during construction) and tasks are sorted ascending by `(y, x)`, so the
/// order is deterministic and stable across reloads.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskQueue {
    tasks: Vec<PixelTask>,
}

impl TaskQueue {
    /// Normalize a list of tasks into a canonical queue.
    ///
    /// Later entries for the same `(x, y)` replace earlier ones.
    pub fn from_tasks(tasks: impl IntoIterator<Item = PixelTask>) -> Self {
        let mut by_coord: BTreeMap<(u32, u32), Colour> = BTreeMap::new();
        for task in tasks {
            by_coord.insert((task.y, task.x), task.colour);
        }

        let tasks = by_coord
            .into_iter()
            .map(|((y, x), colour)| PixelTask::new(x, y, colour))
            .collect();

        Self { tasks }
    }

    /// Validate and normalize a batch of raw pixel descriptions.
    ///
    /// Validation is atomic: a single malformed entry (negative coordinate
    /// or unparseable colour) rejects the whole batch and no queue is built.
    pub fn from_raw(pixels: &[RawPixel]) -> Result<Self> {
        let mut tasks = Vec::with_capacity(pixels.len());

        const COORD_MAX: i64 = u32::MAX as i64;

        for (index, raw) in pixels.iter().enumerate() {
            if raw.x < 0 || raw.y < 0 || raw.x > COORD_MAX || raw.y > COORD_MAX {
                return Err(PlacerError::Validation {
                    message: format!(
                        "Task {}: coordinate out of range ({}, {})",
                        index, raw.x, raw.y
                    ),
                    help: Some(format!(
                        "Task coordinates must be integers in 0..={}",
                        COORD_MAX
                    )),
                });
            }

            let colour = Colour::from_hex(&raw.colour).map_err(|_| PlacerError::Validation {
                message: format!("Task {}: unparseable colour {:?}", index, raw.colour),
                help: Some("Colours must be six hex digits, e.g. #ff0000".to_string()),
            })?;

            tasks.push(PixelTask::new(raw.x as u32, raw.y as u32, colour));
        }

        Ok(Self::from_tasks(tasks))
    }

    /// Parse a JSON array of `{x, y, color}` objects into a queue.
    pub fn from_raw_json(text: &str) -> Result<Self> {
        let pixels: Vec<RawPixel> = serde_json::from_str(text).map_err(|e| PlacerError::Parse {
            message: format!("Invalid task list: {}", e),
            help: Some("Expected a JSON array of {x, y, color} objects".to_string()),
        })?;
        Self::from_raw(&pixels)
    }

    /// Parse a flat colour matrix into a queue.
    ///
    /// Each line is a row of whitespace-separated cells; a cell is either a
    /// hex colour or `.` for "no task at this coordinate". Parsing is atomic
    /// like [`TaskQueue::from_raw`].
    pub fn from_matrix(text: &str) -> Result<Self> {
        let mut tasks = Vec::new();

        for (y, line) in text.lines().enumerate() {
            for (x, cell) in line.split_whitespace().enumerate() {
                if cell == "." {
                    continue;
                }
                let colour = Colour::from_hex(cell).map_err(|_| PlacerError::Validation {
                    message: format!("Matrix cell ({}, {}): unparseable colour {:?}", x, y, cell),
                    help: Some("Cells must be six hex digits or `.` for empty".to_string()),
                })?;
                tasks.push(PixelTask::new(x as u32, y as u32, colour));
            }
        }

        Ok(Self::from_tasks(tasks))
    }

    /// Number of tasks in the queue.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Task at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&PixelTask> {
        self.tasks.get(index)
    }

    /// All tasks in order.
    pub fn tasks(&self) -> &[PixelTask] {
        &self.tasks
    }

    /// The not-yet-consumed suffix starting at `cursor`.
    pub fn remaining_from(&self, cursor: usize) -> &[PixelTask] {
        &self.tasks[cursor.min(self.tasks.len())..]
    }

    pub fn iter(&self) -> impl Iterator<Item = &PixelTask> {
        self.tasks.iter()
    }
}
