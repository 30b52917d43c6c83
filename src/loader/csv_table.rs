use super::{RawRow, TableReader};
use crate::core::config::TableSource;
use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};

/// Reads a headed CSV file into raw rows.
pub struct CsvTableReader;

impl TableReader for CsvTableReader {
    fn read_rows(&self, source: &TableSource) -> Result<Vec<RawRow>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_path(&source.path)
            .with_context(|| format!("Failed to open CSV file: {}", source.path.display()))?;

        let headers: Vec<String> = reader
            .headers()
            .with_context(|| format!("Failed to read CSV header: {}", source.path.display()))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record
                .with_context(|| format!("Failed to read CSV record: {}", source.path.display()))?;
            let row: RawRow = headers
                .iter()
                .cloned()
                .zip(record.iter().map(str::to_string))
                .collect();

            if row.values().all(|v| v.is_empty()) {
                continue;
            }
            rows.push(row);
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_reads_rows_and_skips_blank_lines() -> Result<()> {
        let mut file = NamedTempFile::with_suffix(".csv")?;
        writeln!(file, "Date, Commodity ,Commodity_Price")?;
        writeln!(file, "2023-01-31,Corn, 101.5")?;
        writeln!(file, ",,")?;
        writeln!(file, "2023-02-28,Corn,99")?;

        let source = TableSource {
            path: file.path().to_path_buf(),
            sheet: None,
        };
        let rows = CsvTableReader.read_rows(&source)?;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Commodity"], "Corn");
        assert_eq!(rows[0]["Commodity_Price"], "101.5");
        assert_eq!(rows[1]["Date"], "2023-02-28");
        Ok(())
    }

    #[test]
    fn test_missing_file_fails() {
        let source = TableSource {
            path: "/nonexistent/prices.csv".into(),
            sheet: None,
        };
        let err = CsvTableReader.read_rows(&source).unwrap_err();
        assert!(err.to_string().contains("Failed to open CSV file"));
    }
}
