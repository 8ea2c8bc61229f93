//! Plan diagnostics.
//!
//! Structural problems with a task batch are hard errors raised by the queue
//! builder; this layer covers the softer class of "this plan will probably
//! not do what you want" findings, reported before a run starts.

use std::fmt;

use crate::checkpoint::DEFAULT_QUEUE_CAP;
use crate::types::{SessionConfig, TaskQueue};

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single plan diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Machine-readable code, e.g. "placer::plan::over-cap".
    pub code: String,
    pub message: String,
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code: code.into(),
            message: message.into(),
            help: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code: code.into(),
            message: message.into(),
            help: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// Inspect a plan before running it.
pub fn check_plan(queue: &TaskQueue, config: &SessionConfig) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    if queue.is_empty() {
        diagnostics.push(
            Diagnostic::warning("placer::plan::empty", "the task queue is empty")
                .with_help("Nothing will be placed; check the input source"),
        );
    }

    if queue.len() > DEFAULT_QUEUE_CAP {
        diagnostics.push(
            Diagnostic::warning(
                "placer::plan::over-cap",
                format!(
                    "{} tasks exceed the checkpoint cap of {}; an interrupted run can lose the tail",
                    queue.len(),
                    DEFAULT_QUEUE_CAP
                ),
            )
            .with_help("Split the image, or accept that early checkpoints are partial"),
        );
    }

    if config.delay_ms == 0 {
        diagnostics.push(
            Diagnostic::warning("placer::plan::no-delay", "inter-task delay is zero")
                .with_help("Most shared canvases rate-limit; consider a positive delay"),
        );
    }

    if config.cell_width == Some(0) || config.cell_height == Some(0) {
        diagnostics.push(
            Diagnostic::warning(
                "placer::plan::degenerate-cell",
                "cell calibration has a zero dimension; all placements collapse onto one line",
            )
            .with_help("Recalibrate the grid cell size"),
        );
    }

    diagnostics
}
