use chrono::{SecondsFormat, Utc};
use thiserror::Error;

use crate::task::{Status, StatusFilter, Task, TaskData};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("Task with ID {0} not found.")]
    NotFound(u64),
}

/// Outcome of a mark operation. `AlreadyMarked` means nothing changed and
/// the caller must not persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    Updated,
    AlreadyMarked,
}

/// Current time as RFC 3339 UTC with millisecond precision.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Appends a new `todo` task, consuming the next id. Returns the assigned id.
pub fn add_task(data: &mut TaskData, description: &str) -> u64 {
    let now = now_timestamp();
    let id = data.next_id;
    data.tasks.push(Task {
        id,
        description: description.to_string(),
        status: Status::Todo,
        created_at: now.clone(),
        updated_at: now,
    });
    data.next_id += 1;
    id
}

/// Replaces the description of the matching task and refreshes `updated_at`.
pub fn update_description(
    data: &mut TaskData,
    id: u64,
    description: &str,
) -> Result<(), TaskError> {
    let task = data.find_mut(id).ok_or(TaskError::NotFound(id))?;
    task.description = description.to_string();
    task.updated_at = now_timestamp();
    Ok(())
}

/// Removes the matching task. The id counter is untouched, so deleted ids
/// are never handed out again.
pub fn delete_task(data: &mut TaskData, id: u64) -> Result<(), TaskError> {
    let before = data.tasks.len();
    data.tasks.retain(|task| task.id != id);
    if data.tasks.len() == before {
        return Err(TaskError::NotFound(id));
    }
    Ok(())
}

/// Moves the matching task to `status`. Marking a task with its current
/// status is a no-op reported as `AlreadyMarked`.
pub fn mark_status(
    data: &mut TaskData,
    id: u64,
    status: Status,
) -> Result<MarkOutcome, TaskError> {
    let task = data.find_mut(id).ok_or(TaskError::NotFound(id))?;
    if task.status == status {
        return Ok(MarkOutcome::AlreadyMarked);
    }
    task.status = status;
    task.updated_at = now_timestamp();
    Ok(MarkOutcome::Updated)
}

/// Filters by exact status match, preserving insertion order.
pub fn filter_tasks(tasks: &[Task], filter: StatusFilter) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| filter.matches(task.status))
        .collect()
}

/// One display line per task; the status column is padded so descriptions
/// line up.
pub fn render_task_line(task: &Task) -> String {
    format!(
        "ID: {}, Status: {:<12}, Description: {}",
        task.id,
        task.status.as_str(),
        task.description
    )
}

pub fn tasks_to_json(tasks: &[&Task]) -> String {
    serde_json::to_string_pretty(tasks).unwrap_or_else(|_| "[]".to_string())
}
