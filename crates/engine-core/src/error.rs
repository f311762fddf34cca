use connectors::{
    file::dbf::error::DbfError, influx::error::InfluxError, process::error::ProcessError,
};
use model::core::{time::TimestampError, value::CoercionError};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("DBF error: {0}")]
    Dbf(#[from] DbfError),

    #[error("Source read task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Source unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to read source: {0}")]
    Source(#[from] SourceError),

    #[error("Row {row} has no '{column}' column")]
    MissingColumn { row: usize, column: String },

    #[error("Row {row}: {source}")]
    Timestamp {
        row: usize,
        #[source]
        source: TimestampError,
    },
}

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("InfluxDB error: {0}")]
    Influx(#[from] InfluxError),

    #[error("Sink unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
#[error("Column '{column}' value '{value}' dropped: {source}")]
pub struct MappingError {
    pub column: String,
    pub value: String,
    #[source]
    pub source: CoercionError,
}

#[derive(Error, Debug)]
pub enum SupervisorError {
    #[error("Process error: {0}")]
    Process(#[from] ProcessError),

    #[error("Failed to terminate process {name} within {} seconds", .timeout.as_secs())]
    TerminationTimeout { name: String, timeout: Duration },
}
