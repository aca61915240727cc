pub mod classifier;
pub mod recalculator;

pub use classifier::ImpactClassifier;
pub use recalculator::{RecalcError, ScheduleRecalculator};
