// ============================================================
// CSV PARSER
// ============================================================
// Logical lines -> fields -> tagged, normalized records

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use super::line_assembler::{LogicalLine, LogicalLines};
use super::tokenizer::tokenize_with;
use crate::domain::dataset::SourceConfig;
use crate::infrastructure::sources::{build_record, ParsedSource};

/// CSV parser for disclosure feeds
pub struct CsvParser {
    /// Field separator (default: comma)
    delimiter: char,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self { delimiter: ',' }
    }
}

impl CsvParser {
    /// Create a new CSV parser with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Parse a whole CSV body. The first non-blank line is the header.
    ///
    /// Malformed rows (unterminated quotes, surplus non-empty cells) are
    /// logged and skipped; short rows are padded with empty values.
    pub fn parse(&self, text: &str, source: &SourceConfig) -> ParsedSource {
        let mut parsed = ParsedSource::default();
        let mapping = Arc::new(source.fields.clone());
        let mut headers: Option<Vec<String>> = None;

        for (index, line) in LogicalLines::new(text).enumerate() {
            let line = match line {
                LogicalLine::Complete(line) => line,
                LogicalLine::Unterminated(_) => {
                    warn!(source = %source.key, line = index + 1, "Skipping row with unterminated quote");
                    parsed.skipped_rows += 1;
                    continue;
                }
            };
            if line.trim().is_empty() {
                continue;
            }

            let values = tokenize_with(&line, self.delimiter);
            let Some(headers) = headers.as_ref() else {
                headers = Some(clean_headers(values));
                continue;
            };

            match row_fields(headers, values) {
                Some(fields) => parsed.records.push(build_record(fields, source, &mapping)),
                None => {
                    warn!(source = %source.key, line = index + 1, "Skipping row with more cells than headers");
                    parsed.skipped_rows += 1;
                }
            }
        }

        debug!(
            source = %source.key,
            rows = parsed.records.len(),
            skipped = parsed.skipped_rows,
            "Parsed CSV body"
        );
        parsed
    }
}

fn clean_headers(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|h| h.trim_start_matches('\u{feff}').replace('"', "").trim().to_string())
        .collect()
}

fn row_fields(headers: &[String], mut values: Vec<String>) -> Option<HashMap<String, String>> {
    if values.len() > headers.len() && values[headers.len()..].iter().any(|v| !v.is_empty()) {
        return None;
    }
    values.resize(headers.len(), String::new());

    Some(headers.iter().cloned().zip(values).collect())
}
