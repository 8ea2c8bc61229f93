//! Plan command implementation.
//!
//! Builds the task queue without driving it, reporting statistics and
//! plan diagnostics.

use std::collections::HashSet;
use std::path::PathBuf;

use clap::Args;

use crate::error::Result;
use crate::output::{display_path, plural, Printer};
use crate::types::{Profile, SessionConfig, TaskQueue};
use crate::validation::{check_plan, Severity};

/// Build a task queue from a source and report plan statistics
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Input source: image, .json task list, or .txt colour matrix
    pub source: PathBuf,

    /// Maximum plan width when decoding an image
    #[arg(long, default_value = "128")]
    pub max_width: u32,

    /// Maximum plan height when decoding an image
    #[arg(long, default_value = "128")]
    pub max_height: u32,

    /// Emit machine-readable JSON on stdout
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: PlanArgs, printer: &Printer) -> Result<()> {
    let profile = Profile::load_or_default(&std::env::current_dir()?)?;

    printer.status("Planning", &display_path(&args.source));
    let (name, queue) = super::load_source(&args.source, args.max_width, args.max_height)?;
    let config = profile.to_config(&name);

    let diagnostics = check_plan(&queue, &config);
    for diagnostic in &diagnostics {
        let label = printer.severity(
            &diagnostic.severity.to_string(),
            diagnostic.severity == Severity::Error,
        );
        printer.warning("Plan", &format!("{}: {}", label, diagnostic.message));
        if let Some(help) = &diagnostic.help {
            printer.info("Help", help);
        }
    }

    let stats = PlanStats::gather(&queue, &config);

    if args.json {
        let warnings: Vec<&str> = diagnostics.iter().map(|d| d.code.as_str()).collect();
        let record = serde_json::json!({
            "source": name,
            "tasks": stats.tasks,
            "width": stats.width,
            "height": stats.height,
            "colours": stats.colours,
            "estimatedMs": stats.estimated_ms,
            "warnings": warnings,
        });
        println!("{}", record);
    } else {
        printer.info(
            "Plan",
            &format!(
                "{} across {}x{} cells, {}",
                plural(stats.tasks, "task", "tasks"),
                stats.width,
                stats.height,
                plural(stats.colours, "colour", "colours"),
            ),
        );
        printer.info(
            "Estimate",
            &format!("{:.1}s at {}ms per task", stats.estimated_ms as f64 / 1000.0, config.delay_ms),
        );
    }

    Ok(())
}

struct PlanStats {
    tasks: usize,
    width: u32,
    height: u32,
    colours: usize,
    estimated_ms: u64,
}

impl PlanStats {
    fn gather(queue: &TaskQueue, config: &SessionConfig) -> Self {
        let width = queue.iter().map(|t| t.x + 1).max().unwrap_or(0);
        let height = queue.iter().map(|t| t.y + 1).max().unwrap_or(0);
        let colours: HashSet<_> = queue.iter().map(|t| t.colour).collect();

        Self {
            tasks: queue.len(),
            width,
            height,
            colours: colours.len(),
            estimated_ms: queue.len() as u64 * config.delay_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Colour, PixelTask};

    #[test]
    fn test_stats_gather() {
        let queue = TaskQueue::from_tasks([
            PixelTask::new(0, 0, Colour::rgb(255, 0, 0)),
            PixelTask::new(4, 2, Colour::rgb(255, 0, 0)),
            PixelTask::new(1, 1, Colour::rgb(0, 0, 255)),
        ]);
        let config = SessionConfig {
            delay_ms: 100,
            ..SessionConfig::default()
        };

        let stats = PlanStats::gather(&queue, &config);
        assert_eq!(stats.tasks, 3);
        assert_eq!(stats.width, 5);
        assert_eq!(stats.height, 3);
        assert_eq!(stats.colours, 2);
        assert_eq!(stats.estimated_ms, 300);
    }

    #[test]
    fn test_stats_empty_queue() {
        let stats = PlanStats::gather(&TaskQueue::default(), &SessionConfig::default());
        assert_eq!(stats.tasks, 0);
        assert_eq!(stats.width, 0);
        assert_eq!(stats.height, 0);
    }
}
