//! Blocking filesystem work run off the UI loop.
//!
//! The controller queues `Task`s; the main loop hands them to `spawn`, which
//! runs each on tokio's blocking pool and posts a single
//! `Event::TaskComplete` back when it finishes. Tasks are not cancellable.

use std::path::{Path, PathBuf};

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::error::Result;
use crate::event::Event;
use crate::fs::operations::{self, SizeSummary};

/// A unit of blocking work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    Copy { source: PathBuf, dest_dir: PathBuf },
    Move { source: PathBuf, dest_dir: PathBuf },
    Size { path: PathBuf, max_depth: usize },
}

/// What a finished task reports back.
#[derive(Debug)]
pub enum TaskOutcome {
    Copied {
        source: PathBuf,
        result: Result<PathBuf>,
    },
    Moved {
        source: PathBuf,
        result: Result<PathBuf>,
    },
    Sized {
        path: PathBuf,
        result: Result<SizeSummary>,
    },
}

impl Task {
    /// Whether the task changes the filesystem (and so holds the busy flag).
    pub fn is_mutating(&self) -> bool {
        matches!(self, Task::Copy { .. } | Task::Move { .. })
    }

    /// Busy-indicator text.
    pub fn label(&self) -> String {
        match self {
            Task::Copy { source, .. } => format!("Copying {}…", short(source)),
            Task::Move { source, .. } => format!("Moving {}…", short(source)),
            Task::Size { path, .. } => format!("Measuring {}…", short(path)),
        }
    }

    /// Run to completion on the current thread.
    pub fn run(self) -> TaskOutcome {
        debug!(task = ?self, "running task");
        match self {
            Task::Copy { source, dest_dir } => {
                let result = operations::copy(&source, &dest_dir);
                TaskOutcome::Copied { source, result }
            }
            Task::Move { source, dest_dir } => {
                let result = operations::move_entry(&source, &dest_dir);
                TaskOutcome::Moved { source, result }
            }
            Task::Size { path, max_depth } => {
                let result = operations::recursive_size(&path, max_depth);
                TaskOutcome::Sized { path, result }
            }
        }
    }
}

/// Run `task` on the blocking pool and report through `tx`.
pub fn spawn(task: Task, tx: UnboundedSender<Event>) {
    tokio::task::spawn_blocking(move || {
        let outcome = task.run();
        if tx.send(Event::TaskComplete(outcome)).is_err() {
            warn!("event channel closed before task completion was delivered");
        }
    });
}

fn short(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
