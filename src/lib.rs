use clap::builder::NonEmptyStringValueParser;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Task file kept in the working directory.
pub const TASKS_FILE: &str = "tasks.json";

// Task struct holding the in memory representation of a task.
// The fields double as the on-disk schema, so their names are load-bearing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: u32,
    pub name: String,
    pub done: bool,
}

// Rendered as `[id] name - status` with a two-glyph status column
impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.done { "✓" } else { "✗" };
        write!(f, "[{}] {} - {}", self.id, self.name, status)
    }
}

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("task {0} not found")]
    NotFound(u32),
    #[error("corrupt task file {}: {}", .path.display(), .source)]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not write task file {}: {}", .path.display(), .source)]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },
}

// Enum Commands holds the different commands for the CLI that we can use
#[derive(Subcommand)]
pub enum Commands {
    /// Add a new task
    Add {
        /// What needs doing
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        name: String,
    },
    /// List all tasks
    List,
    /// Mark a task as completed
    Done {
        /// Id of the task to complete
        id: u32,
    },
}

// Struct CLI holds the command line arguments of type Commands
#[derive(Parser)]
#[command(name = "tasks")]
#[command(about = "Simple CLI task list manager")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// The full task collection plus the file it came from. One instance per
/// process run; mutations stay in memory until `save` is called.
#[derive(Debug)]
pub struct TaskList {
    tasks: Vec<Task>,
    path: PathBuf,
}

impl TaskList {
    /// Load the collection from `tasks.json` in the working directory.
    pub fn load() -> Result<Self, TaskError> {
        Self::load_from(Path::new(TASKS_FILE))
    }

    /// Load the collection from `path`. A missing file is a first run and
    /// yields an empty collection; a file that exists but does not parse is
    /// reported as corrupt rather than discarded.
    pub fn load_from(path: &Path) -> Result<Self, TaskError> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) => {
                if err.kind() != ErrorKind::NotFound {
                    log::warn!("could not read {}: {err}, starting empty", path.display());
                }
                return Ok(Self {
                    tasks: Vec::new(),
                    path: path.to_path_buf(),
                });
            }
        };
        let reader = BufReader::new(file);
        let tasks = serde_json::from_reader(reader).map_err(|source| TaskError::Corrupt {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            tasks,
            path: path.to_path_buf(),
        })
    }

    /// Rewrite the whole collection to disk, pretty-printed for human
    /// inspection.
    pub fn save(&self) -> Result<(), TaskError> {
        self.write_atomic().map_err(|source| TaskError::Persist {
            path: self.path.clone(),
            source,
        })
    }

    // Write to a temp file next to the target, then rename over it, so a
    // crash mid-write cannot truncate the existing file. Concurrent
    // invocations can still race; last rename wins.
    fn write_atomic(&self) -> std::io::Result<()> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let tmp = NamedTempFile::new_in(dir)?;
        let mut writer = BufWriter::new(tmp.as_file());
        serde_json::to_writer_pretty(&mut writer, &self.tasks)?;
        writer.flush()?;
        drop(writer);
        tmp.persist(&self.path)?;
        log::debug!("wrote {} tasks to {}", self.tasks.len(), self.path.display());
        Ok(())
    }

    /// Append a new pending task and return its id.
    pub fn add(&mut self, name: String) -> u32 {
        let id = self.next_id();
        self.tasks.push(Task {
            id,
            name,
            done: false,
        });
        id
    }

    // One past the highest id in the collection, so ids stay unique even if
    // the file was edited by hand.
    fn next_id(&self) -> u32 {
        self.tasks.iter().map(|task| task.id).max().unwrap_or(0) + 1
    }

    /// Mark the task with `id` as done. Linear scan; task lists stay small.
    pub fn complete(&mut self, id: u32) -> Result<(), TaskError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or(TaskError::NotFound(id))?;
        task.done = true;
        Ok(())
    }

    /// Tasks in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
