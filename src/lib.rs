pub mod analyzer;
pub mod calculations;
pub mod calendar;
pub mod graph;
pub mod query;
pub mod report;
pub mod task;
pub(crate) mod task_validation;

pub use analyzer::{AnalysisError, analyze, analyze_graph};
pub use calculations::{ImpactClassifier, RecalcError, ScheduleRecalculator};
pub use calendar::{CalendarError, NonWorkingReason, WorkCalendar};
pub use graph::{GraphError, TaskGraph};
pub use query::{QueryError, QueryInterface, QueryResponse, ScheduleQuery};
pub use report::{
    ImpactRecord, ImpactReport, ImpactReportBuilder, NonWorkingDay, RevisedSchedule, RevisedTask,
};
pub use task::Task;
