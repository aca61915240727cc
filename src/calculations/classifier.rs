use crate::calendar::{CalendarError, WorkCalendar};
use crate::graph::TaskGraph;
use crate::report::{ImpactRecord, NonWorkingDay};
use crate::task::Task;
use rayon::prelude::*;

/// Intersects every task's original span with the calendar's non-working set.
/// Classification is read-only and independent per task, so tasks are scanned
/// in parallel; the output keeps topological order.
pub struct ImpactClassifier<'a> {
    graph: &'a TaskGraph,
    calendar: &'a WorkCalendar,
}

impl<'a> ImpactClassifier<'a> {
    pub fn new(graph: &'a TaskGraph, calendar: &'a WorkCalendar) -> Self {
        Self { graph, calendar }
    }

    pub fn execute(&self) -> Result<Vec<ImpactRecord>, CalendarError> {
        self.graph
            .topological_order()
            .into_par_iter()
            .map(|task| self.classify(task))
            .collect()
    }

    fn classify(&self, task: &Task) -> Result<ImpactRecord, CalendarError> {
        let dates = self
            .calendar
            .non_working_days_in_range(task.start, task.end)?;

        let mut overlap = Vec::with_capacity(dates.len());
        for date in dates {
            // Every date came back non-working, so a reason always exists.
            if let Some(reason) = self.calendar.non_working_reason(date)? {
                overlap.push(NonWorkingDay { date, reason });
            }
        }

        let exposure_ratio = overlap.len() as f64 / task.span_days() as f64;
        let starts_non_working = self.calendar.is_non_working(task.start)?;
        let ends_non_working = self.calendar.is_non_working(task.end)?;

        Ok(ImpactRecord {
            task_id: task.id.clone(),
            task_name: task.name.clone(),
            original_start: task.start,
            original_end: task.end,
            overlap,
            exposure_ratio,
            starts_non_working,
            ends_non_working,
        })
    }
}
