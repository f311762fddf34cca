use crate::error::SourceError;
use async_trait::async_trait;
use connectors::file::dbf::reader::DbfReader;
use model::records::row::RawField;
use std::path::PathBuf;

/// Any table of station rows that can be re-read in full.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Returns every row currently in the source, in source order.
    async fn read_rows(&self) -> Result<Vec<Vec<RawField>>, SourceError>;

    fn describe(&self) -> String;
}

pub struct DbfSource {
    reader: DbfReader,
}

impl DbfSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            reader: DbfReader::new(path),
        }
    }
}

#[async_trait]
impl RecordSource for DbfSource {
    async fn read_rows(&self) -> Result<Vec<Vec<RawField>>, SourceError> {
        let reader = self.reader.clone();
        let table = tokio::task::spawn_blocking(move || reader.read_table()).await??;
        Ok(table.rows)
    }

    fn describe(&self) -> String {
        format!("dbf:{}", self.reader.path().display())
    }
}
