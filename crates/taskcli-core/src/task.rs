use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle state of a task. Serialized as `todo`, `in-progress`, `done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Todo,
    InProgress,
    Done,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::InProgress => "in-progress",
            Status::Done => "done",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One tracked unit of work. Field names on disk are camelCase; unknown
/// fields reject the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Task {
    pub id: u64,
    pub description: String,
    pub status: Status,
    pub created_at: String,
    pub updated_at: String,
}

/// The persisted aggregate: every task in insertion order plus the counter
/// for the next id to assign. `next_id` stays strictly greater than every
/// assigned id; ids are never reused after deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TaskData {
    pub tasks: Vec<Task>,
    pub next_id: u64,
}

impl Default for TaskData {
    fn default() -> Self {
        TaskData {
            tasks: Vec::new(),
            next_id: 1,
        }
    }
}

impl TaskData {
    pub fn find(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn find_mut(&mut self, id: u64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid status filter \"{0}\". Use 'all', 'todo', 'in-progress', or 'done'.")]
pub struct InvalidStatusFilter(pub String);

/// Filter argument accepted by the `list` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Only(Status),
}

impl StatusFilter {
    pub fn matches(self, status: Status) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => status == wanted,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Only(status) => status.as_str(),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = InvalidStatusFilter;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "all" => Ok(StatusFilter::All),
            "todo" => Ok(StatusFilter::Only(Status::Todo)),
            "in-progress" => Ok(StatusFilter::Only(Status::InProgress)),
            "done" => Ok(StatusFilter::Only(Status::Done)),
            other => Err(InvalidStatusFilter(other.to_string())),
        }
    }
}
