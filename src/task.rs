use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// A raw schedule row after ingestion. Dates are the *original* plan; the
/// recalculator never mutates them, it produces revised dates alongside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Working days of effort. The original plan stores the raw span
    /// `end = start + duration_days - 1` without regard for non-working days;
    /// milestones have duration 0 and `start == end`.
    pub duration_days: i64,
    #[serde(default)]
    pub predecessors: Vec<String>,
    /// Optional must-start-no-earlier-than constraint.
    #[serde(default)]
    pub earliest_start: Option<NaiveDate>,
}

impl Task {
    /// Build a task from its start date and duration; the end date is derived
    /// as the raw calendar span (`start` for a milestone).
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        start: NaiveDate,
        duration_days: i64,
    ) -> Self {
        let end = if duration_days > 0 {
            start + Duration::days(duration_days - 1)
        } else {
            start
        };
        Self {
            id: id.into(),
            name: name.into(),
            start,
            end,
            duration_days,
            predecessors: Vec::new(),
            earliest_start: None,
        }
    }

    pub fn with_predecessors<I, S>(mut self, predecessors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.predecessors = predecessors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_earliest_start(mut self, date: NaiveDate) -> Self {
        self.earliest_start = Some(date);
        self
    }

    /// Raw calendar length of the original span, in days (always >= 1).
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn is_milestone(&self) -> bool {
        self.duration_days == 0
    }
}
