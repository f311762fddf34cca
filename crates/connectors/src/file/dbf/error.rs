use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbfError {
    #[error("Failed to open DBF file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: dbase::Error,
    },

    #[error("Failed to read records from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: dbase::Error,
    },
}
