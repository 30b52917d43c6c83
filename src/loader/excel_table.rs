use super::{RawRow, TableReader};
use crate::core::config::TableSource;
use anyhow::{Context, Result, anyhow};
use calamine::{Data, Reader, Xlsx, open_workbook};
use chrono::{Days, NaiveDate};

/// Reads one sheet of an `.xlsx` workbook into raw rows.
///
/// Without a configured sheet the first sheet is used.
pub struct ExcelTableReader;

/// Excel stores dates as days since 1899-12-30.
fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(serial.trunc() as u64))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::DateTime(dt) => serial_to_date(dt.as_f64())
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

impl TableReader for ExcelTableReader {
    fn read_rows(&self, source: &TableSource) -> Result<Vec<RawRow>> {
        let mut workbook: Xlsx<_> = open_workbook(&source.path)
            .with_context(|| format!("Failed to open workbook: {}", source.path.display()))?;

        let sheet_name = match &source.sheet {
            Some(name) => name.clone(),
            None => workbook
                .sheet_names()
                .first()
                .cloned()
                .ok_or_else(|| anyhow!("Workbook has no sheets: {}", source.path.display()))?,
        };
        let range = workbook.worksheet_range(&sheet_name).with_context(|| {
            format!(
                "Failed to read sheet '{sheet_name}' from {}",
                source.path.display()
            )
        })?;

        let mut sheet_rows = range.rows();
        let Some(header_row) = sheet_rows.next() else {
            return Ok(Vec::new());
        };
        let headers: Vec<String> = header_row.iter().map(cell_text).collect();

        let mut rows = Vec::new();
        for data_row in sheet_rows {
            let row: RawRow = headers
                .iter()
                .cloned()
                .zip(data_row.iter().map(cell_text))
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

    #[test]
    fn test_serial_to_date() {
        assert_eq!(
            serial_to_date(45291.0),
            NaiveDate::from_ymd_opt(2023, 12, 31)
        );
        assert_eq!(
            serial_to_date(43496.75),
            NaiveDate::from_ymd_opt(2019, 1, 31)
        );
        assert_eq!(serial_to_date(-1.0), None);
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::String(" Corn ".to_string())), "Corn");
        assert_eq!(cell_text(&Data::Float(101.5)), "101.5");
        assert_eq!(cell_text(&Data::Empty), "");
    }

    #[test]
    fn test_missing_workbook_fails() {
        let source = TableSource {
            path: "/nonexistent/books.xlsx".into(),
            sheet: Some("Expense Report".to_string()),
        };
        let err = ExcelTableReader.read_rows(&source).unwrap_err();
        assert!(err.to_string().contains("Failed to open workbook"));
    }
}
