use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::config::ExportColumn;
use crate::domain::error::{AppError, Result};
use crate::domain::record::ResultSet;
use crate::infrastructure::export::{render_csv, render_workbook};

const FILE_STEM: &str = "violations";
const SHEET_NAME: &str = "勞動法令裁處資料";

pub const EMPTY_EXPORT_MESSAGE: &str = "No data to export";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    /// HTML-table workbook, saved as `.xls`
    Xls,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xls => "xls",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Xls => "application/vnd.ms-excel",
        }
    }
}

/// Finished export, ready for the host's download sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub content: String,
    pub filename: String,
    pub mime_type: String,
}

/// Serializes the current ResultSet. Works only on in-memory results.
pub struct Exporter {
    columns: Vec<ExportColumn>,
}

impl Exporter {
    pub fn new(columns: Vec<ExportColumn>) -> Self {
        Self { columns }
    }

    pub fn filename(format: ExportFormat, date: NaiveDate) -> String {
        format!("{}_{}.{}", FILE_STEM, date.format("%Y-%m-%d"), format.extension())
    }

    /// Fails with a user-facing error when there is nothing to export
    pub fn export(&self, results: &ResultSet, format: ExportFormat, today: NaiveDate) -> Result<ExportFile> {
        if results.is_empty() {
            return Err(AppError::UserInput(EMPTY_EXPORT_MESSAGE.to_string()));
        }

        let content = match format {
            // BOM so spreadsheet apps detect UTF-8
            ExportFormat::Csv => format!("\u{FEFF}{}", render_csv(&self.columns, results.records())?),
            ExportFormat::Xls => render_workbook(SHEET_NAME, &self.columns, results.records()),
        };

        let file = ExportFile {
            content,
            filename: Self::filename(format, today),
            mime_type: format.mime_type().to_string(),
        };

        info!(
            format = format.extension(),
            rows = results.len(),
            filename = %file.filename,
            "Export ready"
        );
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::export::test_support::labor_record;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    #[test]
    fn test_empty_result_is_rejected() {
        let exporter = Exporter::new(ExportColumn::default_columns());
        let err = exporter
            .export(&ResultSet::default(), ExportFormat::Csv, today())
            .unwrap_err();

        assert!(matches!(&err, AppError::UserInput(msg) if msg == EMPTY_EXPORT_MESSAGE));
        assert!(err.is_user_facing());
    }

    #[test]
    fn test_csv_export_file() {
        let exporter = Exporter::new(ExportColumn::default_columns());
        let results = ResultSet::new(vec![
            labor_record(10, "Acme", "2024-01-05", "20,000"),
            labor_record(11, "Beta", "2024-01-04", "500"),
        ]);

        let file = exporter.export(&results, ExportFormat::Csv, today()).unwrap();

        assert_eq!(file.filename, "violations_2024-06-30.csv");
        assert_eq!(file.mime_type, "text/csv; charset=utf-8");

        let lines: Vec<&str> = file.content.trim_start_matches('\u{FEFF}').lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("序號,主管機關,處分日期"));
        assert_eq!(
            lines[1],
            r#"1,"臺北市政府","2024-01-05","Acme","勞動基準法","","未依規定給付工資",20000,"""#
        );
        assert!(lines[2].starts_with("2,"));
    }

    #[test]
    fn test_workbook_export_file() {
        let exporter = Exporter::new(ExportColumn::default_columns());
        let results = ResultSet::new(vec![labor_record(1, "Acme", "2024-01-05", "1000")]);

        let file = exporter.export(&results, ExportFormat::Xls, today()).unwrap();

        assert_eq!(file.filename, "violations_2024-06-30.xls");
        assert_eq!(file.mime_type, "application/vnd.ms-excel");
        assert!(file.content.contains("<td>Acme</td>"));
    }
}
