use crate::task::Task;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone)]
pub struct TaskValidationError {
    message: String,
}

impl TaskValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for TaskValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TaskValidationError {}

pub fn validate_task(task: &Task) -> Result<(), TaskValidationError> {
    if task.id.trim().is_empty() {
        return Err(TaskValidationError::new("task has an empty id"));
    }

    if task.duration_days < 0 {
        return Err(TaskValidationError::new(format!(
            "task {} has negative duration {}",
            task.id, task.duration_days
        )));
    }

    if task.start > task.end {
        return Err(TaskValidationError::new(format!(
            "task {} starts {} after it ends {}",
            task.id, task.start, task.end
        )));
    }

    if task.is_milestone() {
        if task.start != task.end {
            return Err(TaskValidationError::new(format!(
                "milestone {} must have matching start and end (got {} and {})",
                task.id, task.start, task.end
            )));
        }
    } else {
        // The original plan stores the raw span without working-day gaps.
        let expected_span = task.duration_days;
        if task.span_days() != expected_span {
            return Err(TaskValidationError::new(format!(
                "task {} span {}..{} covers {} days but duration is {}",
                task.id,
                task.start,
                task.end,
                task.span_days(),
                expected_span
            )));
        }
    }

    let mut seen_predecessors = HashSet::with_capacity(task.predecessors.len());
    for predecessor in &task.predecessors {
        if predecessor.trim().is_empty() {
            return Err(TaskValidationError::new(format!(
                "task {} lists an empty predecessor id",
                task.id
            )));
        }
        if !seen_predecessors.insert(predecessor.as_str()) {
            return Err(TaskValidationError::new(format!(
                "task {} lists predecessor {} more than once",
                task.id, predecessor
            )));
        }
    }

    Ok(())
}

pub fn validate_task_collection(tasks: &[Task]) -> Result<(), TaskValidationError> {
    let mut seen_ids = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if !seen_ids.insert(task.id.as_str()) {
            return Err(TaskValidationError::new(format!(
                "duplicate task id {}",
                task.id
            )));
        }
        validate_task(task)?;
    }
    Ok(())
}
