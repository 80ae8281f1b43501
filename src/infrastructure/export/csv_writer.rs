use std::sync::Arc;

use csv::{QuoteStyle, Terminator, WriterBuilder};

use super::cell_for;
use crate::domain::config::ExportColumn;
use crate::domain::error::{AppError, Result};
use crate::domain::record::Record;

fn builder(style: QuoteStyle) -> WriterBuilder {
    let mut builder = WriterBuilder::new();
    builder.quote_style(style).terminator(Terminator::Any(b'\n'));
    builder
}

/// Header line plus one line per record. Headers are quoted only when
/// needed; in rows every non-numeric cell is quoted and numbers are bare.
pub fn render_csv(columns: &[ExportColumn], records: &[Arc<Record>]) -> Result<String> {
    let mut header = builder(QuoteStyle::Necessary).from_writer(Vec::new());
    header.write_record(columns.iter().map(|c| c.header.as_str()))?;
    let buf = header
        .into_inner()
        .map_err(|e| AppError::Io(format!("Failed to flush CSV header: {}", e)))?;

    let mut writer = builder(QuoteStyle::NonNumeric).from_writer(buf);
    for (index, record) in records.iter().enumerate() {
        let row: Vec<String> = columns
            .iter()
            .map(|column| cell_for(column, record, index + 1).into_string())
            .collect();
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Io(format!("Failed to flush CSV rows: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| AppError::Io(format!("CSV output is not UTF-8: {}", e)))
}
