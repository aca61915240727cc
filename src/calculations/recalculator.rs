use crate::calendar::{CalendarError, WorkCalendar};
use crate::graph::TaskGraph;
use crate::report::{RevisedSchedule, RevisedTask};
use crate::task::Task;
use chrono::{Duration, NaiveDate};
use log::error;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecalcError {
    /// A working-day walk ran past the calendar's materialized range. The
    /// caller can widen the window and re-run.
    CalendarExhausted {
        task_id: String,
        reached: NaiveDate,
    },
    /// A task was processed before one of its predecessors was resolved.
    /// Signals a topological-order bug upstream, never user input.
    InvariantViolation {
        task_id: String,
        predecessor_id: String,
    },
    Calendar(CalendarError),
}

impl fmt::Display for RecalcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecalcError::CalendarExhausted { task_id, reached } => write!(
                f,
                "calendar exhausted at {reached} while rescheduling task {task_id}"
            ),
            RecalcError::InvariantViolation {
                task_id,
                predecessor_id,
            } => write!(
                f,
                "task {task_id} was processed before its predecessor {predecessor_id} was resolved"
            ),
            RecalcError::Calendar(err) => write!(f, "calendar error: {err}"),
        }
    }
}

impl std::error::Error for RecalcError {}

impl From<CalendarError> for RecalcError {
    fn from(value: CalendarError) -> Self {
        Self::Calendar(value)
    }
}

/// Recomputes the schedule so no unit of work lands on a non-working day,
/// propagating shifts through dependencies. Runs strictly in topological
/// order: predecessor revised ends are read-dependencies for successors.
pub struct ScheduleRecalculator<'a> {
    graph: &'a TaskGraph,
    calendar: &'a WorkCalendar,
}

impl<'a> ScheduleRecalculator<'a> {
    pub fn new(graph: &'a TaskGraph, calendar: &'a WorkCalendar) -> Self {
        Self { graph, calendar }
    }

    pub fn execute(&self) -> Result<RevisedSchedule, RecalcError> {
        let mut revised: BTreeMap<String, RevisedTask> = BTreeMap::new();

        for task in self.graph.topological_order() {
            let earliest = self.earliest_allowed_start(task, &revised)?;
            let start = self
                .calendar
                .first_working_on_or_after(earliest)
                .map_err(|err| Self::walk_error(task, err))?;

            // A milestone takes the adjusted start as both ends; anything else
            // consumes its working-day duration from there.
            let end = if task.is_milestone() {
                start
            } else {
                self.calendar
                    .add_working_days(start, task.duration_days - 1)
                    .map_err(|err| Self::walk_error(task, err))?
            };

            revised.insert(
                task.id.clone(),
                RevisedTask {
                    start,
                    end,
                    start_slip_days: (start - task.start).num_days(),
                    finish_slip_days: (end - task.end).num_days(),
                },
            );
        }

        Ok(RevisedSchedule::new(revised))
    }

    /// Latest of: the original start, the task's own earliest-start
    /// constraint, and the day after the latest predecessor's revised end.
    /// Flooring at the original start keeps slip non-negative.
    fn earliest_allowed_start(
        &self,
        task: &Task,
        revised: &BTreeMap<String, RevisedTask>,
    ) -> Result<NaiveDate, RecalcError> {
        let mut earliest = task.start;

        if let Some(floor) = task.earliest_start {
            if floor > earliest {
                earliest = floor;
            }
        }

        for predecessor in &task.predecessors {
            let Some(done) = revised.get(predecessor) else {
                error!(
                    "topological order violated: task {} reached before predecessor {}",
                    task.id, predecessor
                );
                return Err(RecalcError::InvariantViolation {
                    task_id: task.id.clone(),
                    predecessor_id: predecessor.clone(),
                });
            };
            let candidate = done.end + Duration::days(1);
            if candidate > earliest {
                earliest = candidate;
            }
        }

        Ok(earliest)
    }

    fn walk_error(task: &Task, err: CalendarError) -> RecalcError {
        match err {
            CalendarError::OutOfRange { date, .. } => RecalcError::CalendarExhausted {
                task_id: task.id.clone(),
                reached: date,
            },
            other => RecalcError::Calendar(other),
        }
    }
}
