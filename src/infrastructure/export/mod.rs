// ============================================================
// EXPORT SERIALIZERS
// ============================================================
// CSV text and HTML-table workbook for a result set

mod csv_writer;
mod workbook;

pub use csv_writer::render_csv;
pub use workbook::render_workbook;

use crate::domain::config::{ColumnSource, ExportColumn};
use crate::domain::record::Record;
use crate::infrastructure::normalize::export_amount;

/// One exported cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// Free text
    Text(String),
    /// Machine-readable value (sequence, calendar date, amount)
    Raw(String),
}

impl Cell {
    pub fn as_str(&self) -> &str {
        match self {
            Cell::Text(s) | Cell::Raw(s) => s,
        }
    }

    pub fn into_string(self) -> String {
        match self {
            Cell::Text(s) | Cell::Raw(s) => s,
        }
    }
}

/// Cell for `column` of the record at 1-based `position`
pub fn cell_for(column: &ExportColumn, record: &Record, position: usize) -> Cell {
    match &column.source {
        ColumnSource::Sequence => Cell::Raw(position.to_string()),
        ColumnSource::Text { field } => Cell::Text(record.value(field).to_string()),
        // Unparsed dates are passthrough text
        ColumnSource::Date => match record.primary_date() {
            Some(_) => Cell::Raw(record.date().to_string()),
            None => Cell::Text(record.date().to_string()),
        },
        ColumnSource::Amount => Cell::Raw(export_amount(record.amount())),
        ColumnSource::CompanyName => Cell::Text(record.company_name().to_string()),
        ColumnSource::Authority => Cell::Text(record.authority().to_string()),
        ColumnSource::DatasetTag => Cell::Text(record.dataset_tag.clone()),
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::labor_record;
    use super::*;

    #[test]
    fn test_cells_follow_column_kind() {
        let record = labor_record(1, "Acme", "2024-01-05", "NT$20,000");

        let amount = ExportColumn::new("罰鍰金額", ColumnSource::Amount);
        assert_eq!(cell_for(&amount, &record, 3), Cell::Raw("20000".to_string()));

        let seq = ExportColumn::new("序號", ColumnSource::Sequence);
        assert_eq!(cell_for(&seq, &record, 3), Cell::Raw("3".to_string()));

        let tag = ExportColumn::new("法規類型", ColumnSource::DatasetTag);
        assert_eq!(cell_for(&tag, &record, 3), Cell::Text("勞動基準法".to_string()));

        let missing = ExportColumn::new(
            "備註說明",
            ColumnSource::Text {
                field: "備註說明".to_string(),
            },
        );
        assert_eq!(cell_for(&missing, &record, 3).as_str(), "");
    }

    #[test]
    fn test_date_cell_is_raw_only_for_calendar_dates() {
        let date = ExportColumn::new("處分日期", ColumnSource::Date);

        let parsed = labor_record(1, "Acme", "2024-01-05", "1");
        assert_eq!(cell_for(&date, &parsed, 1), Cell::Raw("2024-01-05".to_string()));

        let passthrough = labor_record(2, "Acme", "113年1月5日,更正", "1");
        assert_eq!(
            cell_for(&date, &passthrough, 2),
            Cell::Text("113年1月5日,更正".to_string())
        );
    }
}
