use crate::report::{ImpactRecord, ImpactReport, RevisedTask};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    UnknownTask { task_id: String },
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::UnknownTask { task_id } => {
                write!(f, "no task {task_id} in this report")
            }
        }
    }
}

impl std::error::Error for QueryError {}

/// Typed request shape the external language layer binds free-text questions
/// to. The engine never sees the question itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScheduleQuery {
    /// Tasks whose original span overlaps a listed holiday.
    HolidayImpact,
    /// Tasks whose original span overlaps a weekend day.
    WeekendImpact,
    /// Tasks active on one specific date.
    SpecificDate { date: NaiveDate },
    /// Slippage for one task.
    TaskSlip { task_id: String },
    /// Aggregate project delay.
    ProjectSlip,
}

/// Structured answer to a [`ScheduleQuery`], ready for the language layer to
/// phrase back to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResponse {
    pub matching_task_ids: Vec<String>,
    pub delay_days: Option<i64>,
    pub summary: String,
}

/// The only surface the natural-language layer is permitted to call. Borrows
/// a report; queries never mutate it and never expose engine internals beyond
/// the report's own records.
pub struct QueryInterface<'a> {
    report: &'a ImpactReport,
}

impl<'a> QueryInterface<'a> {
    pub fn new(report: &'a ImpactReport) -> Self {
        Self { report }
    }

    /// Records with exposure ratio >= the threshold, in report order. A
    /// threshold of 0.0 returns every task.
    pub fn impacted_tasks(&self, min_exposure_ratio: f64) -> Vec<&'a ImpactRecord> {
        self.report
            .records()
            .iter()
            .filter(|record| record.exposure_ratio >= min_exposure_ratio)
            .collect()
    }

    pub fn slip_of(&self, task_id: &str) -> Result<&'a RevisedTask, QueryError> {
        self.report
            .revised_schedule()
            .get(task_id)
            .ok_or_else(|| QueryError::UnknownTask {
                task_id: task_id.to_string(),
            })
    }

    pub fn total_project_slip(&self) -> i64 {
        self.report.total_project_slip_days()
    }

    /// Tasks whose finish slips by strictly more than `days` calendar days,
    /// in report order.
    pub fn tasks_slipping_more_than(&self, days: i64) -> Vec<(&'a str, &'a RevisedTask)> {
        self.report
            .records()
            .iter()
            .filter_map(|record| {
                let revised = self.report.revised_schedule().get(&record.task_id)?;
                (revised.finish_slip_days > days).then_some((record.task_id.as_str(), revised))
            })
            .collect()
    }

    /// Tasks whose original span contains `date`.
    pub fn tasks_active_on(&self, date: NaiveDate) -> Vec<&'a ImpactRecord> {
        self.report
            .records()
            .iter()
            .filter(|record| record.original_start <= date && date <= record.original_end)
            .collect()
    }

    /// Tasks that start or end on a non-working day.
    pub fn tasks_touching_non_working(&self) -> Vec<&'a ImpactRecord> {
        self.report
            .records()
            .iter()
            .filter(|record| record.starts_non_working || record.ends_non_working)
            .collect()
    }

    pub fn dispatch(&self, query: ScheduleQuery) -> Result<QueryResponse, QueryError> {
        match query {
            ScheduleQuery::HolidayImpact => {
                let matches: Vec<String> = self
                    .report
                    .records()
                    .iter()
                    .filter(|record| record.overlaps_holiday())
                    .map(|record| record.task_id.clone())
                    .collect();
                Ok(QueryResponse {
                    summary: format!("{} task(s) overlap listed holidays", matches.len()),
                    matching_task_ids: matches,
                    delay_days: None,
                })
            }
            ScheduleQuery::WeekendImpact => {
                let matches: Vec<String> = self
                    .report
                    .records()
                    .iter()
                    .filter(|record| record.overlaps_weekend())
                    .map(|record| record.task_id.clone())
                    .collect();
                Ok(QueryResponse {
                    summary: format!(
                        "{} task(s) span weekend days; {}",
                        matches.len(),
                        self.report.summary()
                    ),
                    matching_task_ids: matches,
                    delay_days: Some(self.total_project_slip()),
                })
            }
            ScheduleQuery::SpecificDate { date } => {
                let matches: Vec<String> = self
                    .tasks_active_on(date)
                    .into_iter()
                    .map(|record| record.task_id.clone())
                    .collect();
                Ok(QueryResponse {
                    summary: format!("{} task(s) active on {date}", matches.len()),
                    matching_task_ids: matches,
                    delay_days: None,
                })
            }
            ScheduleQuery::TaskSlip { task_id } => {
                let revised = self.slip_of(&task_id)?;
                Ok(QueryResponse {
                    summary: format!(
                        "task {task_id} starts {} day(s) late and finishes {} day(s) late",
                        revised.start_slip_days, revised.finish_slip_days
                    ),
                    matching_task_ids: vec![task_id],
                    delay_days: Some(revised.finish_slip_days),
                })
            }
            ScheduleQuery::ProjectSlip => Ok(QueryResponse {
                matching_task_ids: Vec::new(),
                delay_days: Some(self.total_project_slip()),
                summary: self.report.summary().to_string(),
            }),
        }
    }
}
