use crate::calculations::{ImpactClassifier, RecalcError, ScheduleRecalculator};
use crate::calendar::{CalendarError, WorkCalendar};
use crate::graph::{GraphError, TaskGraph};
use crate::report::{ImpactReport, ImpactReportBuilder};
use crate::task::Task;
use log::info;
use std::fmt;

#[derive(Debug)]
pub enum AnalysisError {
    Graph(GraphError),
    Calendar(CalendarError),
    Recalculation(RecalcError),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::Graph(err) => write!(f, "graph construction failed: {err}"),
            AnalysisError::Calendar(err) => write!(f, "calendar lookup failed: {err}"),
            AnalysisError::Recalculation(err) => write!(f, "recalculation failed: {err}"),
        }
    }
}

impl std::error::Error for AnalysisError {}

impl From<GraphError> for AnalysisError {
    fn from(value: GraphError) -> Self {
        Self::Graph(value)
    }
}

impl From<CalendarError> for AnalysisError {
    fn from(value: CalendarError) -> Self {
        Self::Calendar(value)
    }
}

impl From<RecalcError> for AnalysisError {
    fn from(value: RecalcError) -> Self {
        Self::Recalculation(value)
    }
}

/// Full pipeline for one batch of ingested records: graph construction,
/// classification, recalculation, report build. Any stage failing aborts the
/// run; no partial report is ever produced.
pub fn analyze(tasks: Vec<Task>, calendar: &WorkCalendar) -> Result<ImpactReport, AnalysisError> {
    let graph = TaskGraph::build(tasks)?;
    analyze_graph(&graph, calendar)
}

/// Same pipeline over an already-built graph, for callers that keep the graph
/// around for dependency lookups.
pub fn analyze_graph(
    graph: &TaskGraph,
    calendar: &WorkCalendar,
) -> Result<ImpactReport, AnalysisError> {
    info!(
        "analyzing {} task(s) against calendar [{}, {}]",
        graph.len(),
        calendar.range_start(),
        calendar.range_end()
    );

    let records = ImpactClassifier::new(graph, calendar).execute()?;
    let revised = ScheduleRecalculator::new(graph, calendar).execute()?;
    let report = ImpactReportBuilder::new(graph, records, revised).build();

    info!("analysis complete: {}", report.summary());
    Ok(report)
}
