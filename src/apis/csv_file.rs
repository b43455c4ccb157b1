use crate::common::error::Result;
use crate::common::types::RowSource;
use crate::domain::TableRow;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Local CSV export of the plan sheet
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows from any CSV reader. No header row; ragged rows are kept as they are.
    pub fn read_rows<R: std::io::Read>(reader: R) -> Result<Vec<TableRow>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            rows.push(TableRow::new(record.iter()));
        }
        Ok(rows)
    }
}

#[async_trait::async_trait]
impl RowSource for CsvFileSource {
    fn source_name(&self) -> &str {
        "csv_file"
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn fetch_rows(&self) -> Result<Vec<TableRow>> {
        debug!("Reading plan rows from CSV");
        let content = tokio::fs::read(&self.path).await?;
        let rows = Self::read_rows(content.as_slice())?;
        info!("Read {} rows from {}", rows.len(), self.path.display());
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_rows_keeps_ragged_rows_and_newlines() {
        let csv = ",\"Week 1\n22 Dec - 28 Dec\"\n,Activity,Easy 30 mins,Rest\n,Purpose\n";
        let rows = CsvFileSource::read_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].raw_label(), "Week 1\n22 Dec - 28 Dec");
        assert_eq!(rows[1].day_cells()[1], "Rest");
        assert_eq!(rows[2].len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_rows_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, ",Activity,Recovery 30 mins").unwrap();

        let source = CsvFileSource::new(file.path());
        let rows = source.fetch_rows().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].label(), "activity");
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let source = CsvFileSource::new("/definitely/not/here.csv");
        let err = source.fetch_rows().await.unwrap_err();
        assert!(matches!(err, crate::common::error::PlanError::Io(_)));
    }
}
