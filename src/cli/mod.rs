pub mod clear;
pub mod completions;
pub mod init;
pub mod plan;
pub mod run;
pub mod status;

use std::fs;
use std::path::Path;

use clap::{Parser, Subcommand};

use crate::error::{PlacerError, Result};
use crate::host::decode_image;
use crate::types::TaskQueue;

/// placer - resumable pixel placement driver
#[derive(Parser, Debug)]
#[command(name = "placer")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a project (generates placer.yaml)
    Init(init::InitArgs),

    /// Build a task queue from a source and report plan statistics
    Plan(plan::PlanArgs),

    /// Drive a plan against the simulated canvas
    Run(run::RunArgs),

    /// Continue from the saved checkpoint
    Resume(run::ResumeArgs),

    /// Inspect the checkpoint slot
    Status(status::StatusArgs),

    /// Remove the checkpoint slot
    Clear(clear::ClearArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Load a task source by file extension.
///
/// `.json` is a raw task list, `.txt`/`.matrix` a flat colour matrix, and
/// anything else is decoded as an image.
pub(crate) fn load_source(
    path: &Path,
    max_width: u32,
    max_height: u32,
) -> Result<(String, TaskQueue)> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("source")
        .to_string();

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    let queue = match ext {
        "json" => TaskQueue::from_raw_json(&read_source(path)?)?,
        "txt" | "matrix" => TaskQueue::from_matrix(&read_source(path)?)?,
        _ => decode_image(path, max_width, max_height)?,
    };

    Ok((name, queue))
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| PlacerError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_source_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(&path, r##"[{"x": 0, "y": 0, "color": "#ff0000"}]"##).unwrap();

        let (name, queue) = load_source(&path, 64, 64).unwrap();
        assert_eq!(name, "tasks.json");
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_load_source_matrix() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("grid.txt");
        fs::write(&path, "ff0000 .\n. 00ff00\n").unwrap();

        let (_, queue) = load_source(&path, 64, 64).unwrap();
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_load_source_missing_file() {
        let dir = tempdir().unwrap();
        assert!(load_source(&dir.path().join("absent.json"), 64, 64).is_err());
    }
}
