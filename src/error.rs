use chrono::NaiveDate;
use thiserror::Error;

/// Structural failures surfaced to the caller. Data-quality problems (missing
/// columns, unparseable cells) never end up here; the pipeline degrades instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// Ingestion was called without a single input table.
    #[error("No input tables were provided")]
    NoInputTables,

    /// Every input table was empty or skipped.
    #[error("No data rows found in the provided input; supply new input to continue")]
    EmptyInput,

    /// The requested date range ends before it starts.
    #[error("Invalid date range: end {end} is before start {start}")]
    InvalidFilterRange { start: NaiveDate, end: NaiveDate },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
