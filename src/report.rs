use crate::calendar::NonWorkingReason;
use crate::graph::TaskGraph;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// One non-working date inside a task's original span, with the reason it is
/// non-working.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NonWorkingDay {
    pub date: NaiveDate,
    pub reason: NonWorkingReason,
}

/// Per-task exposure to non-working days. One record exists for every task,
/// including tasks with no overlap at all.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactRecord {
    pub task_id: String,
    pub task_name: String,
    pub original_start: NaiveDate,
    pub original_end: NaiveDate,
    /// Overlapping non-working dates, ordered by date.
    pub overlap: Vec<NonWorkingDay>,
    /// Overlap count / raw span length, in `[0, 1]`.
    pub exposure_ratio: f64,
    pub starts_non_working: bool,
    pub ends_non_working: bool,
}

impl ImpactRecord {
    pub fn overlap_count(&self) -> usize {
        self.overlap.len()
    }

    pub fn is_impacted(&self) -> bool {
        !self.overlap.is_empty()
    }

    pub fn overlaps_holiday(&self) -> bool {
        self.overlap
            .iter()
            .any(|day| matches!(day.reason, NonWorkingReason::Holiday(_)))
    }

    pub fn overlaps_weekend(&self) -> bool {
        self.overlap
            .iter()
            .any(|day| day.reason == NonWorkingReason::Weekend)
    }
}

/// Revised dates for one task after recalculation. Slips are in calendar
/// days and never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RevisedTask {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub start_slip_days: i64,
    pub finish_slip_days: i64,
}

/// Task id -> revised dates for a whole recalculation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RevisedSchedule {
    tasks: BTreeMap<String, RevisedTask>,
}

impl RevisedSchedule {
    pub(crate) fn new(tasks: BTreeMap<String, RevisedTask>) -> Self {
        Self { tasks }
    }

    pub fn get(&self, task_id: &str) -> Option<&RevisedTask> {
        self.tasks.get(task_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RevisedTask)> {
        self.tasks.iter().map(|(id, dates)| (id.as_str(), dates))
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// The result of one analysis run. Immutable once built; a new run builds a
/// new report, so callers holding an old one keep seeing consistent data.
#[derive(Debug, Clone, Serialize)]
pub struct ImpactReport {
    records: Vec<ImpactRecord>,
    revised: RevisedSchedule,
    total_tasks: usize,
    impacted_tasks: usize,
    total_project_slip_days: i64,
    summary: String,
    generated_at: DateTime<Utc>,
}

impl ImpactReport {
    /// Records in topological order of their tasks.
    pub fn records(&self) -> &[ImpactRecord] {
        &self.records
    }

    pub fn record(&self, task_id: &str) -> Option<&ImpactRecord> {
        self.records.iter().find(|record| record.task_id == task_id)
    }

    pub fn revised_schedule(&self) -> &RevisedSchedule {
        &self.revised
    }

    pub fn total_tasks(&self) -> usize {
        self.total_tasks
    }

    pub fn impacted_tasks(&self) -> usize {
        self.impacted_tasks
    }

    /// Max finish slip over terminal tasks, in calendar days.
    pub fn total_project_slip_days(&self) -> i64 {
        self.total_project_slip_days
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// JSON rendering for the UI collaborator. Read-only view; nothing in the
    /// report can be changed through it.
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Zips classification output with the revised schedule and computes the
/// aggregate totals. Pure aggregation; any failure happened upstream.
pub struct ImpactReportBuilder<'a> {
    graph: &'a TaskGraph,
    records: Vec<ImpactRecord>,
    revised: RevisedSchedule,
}

impl<'a> ImpactReportBuilder<'a> {
    pub fn new(
        graph: &'a TaskGraph,
        records: Vec<ImpactRecord>,
        revised: RevisedSchedule,
    ) -> Self {
        Self {
            graph,
            records,
            revised,
        }
    }

    pub fn build(self) -> ImpactReport {
        let total_tasks = self.graph.len();
        let impacted_tasks = self
            .records
            .iter()
            .filter(|record| record.is_impacted())
            .count();

        let total_project_slip_days = self
            .graph
            .terminal_tasks()
            .iter()
            .filter_map(|task| self.revised.get(&task.id))
            .map(|dates| dates.finish_slip_days)
            .max()
            .unwrap_or(0);

        let summary = format!(
            "{impacted_tasks} of {total_tasks} tasks overlap non-working days; \
             the project finish slips {total_project_slip_days} calendar day(s) \
             with weekend and holiday work excluded"
        );

        ImpactReport {
            records: self.records,
            revised: self.revised,
            total_tasks,
            impacted_tasks,
            total_project_slip_days,
            summary,
            generated_at: Utc::now(),
        }
    }
}
