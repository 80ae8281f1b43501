// ============================================================
// SOURCE PAYLOADS
// ============================================================
// Turn a fetched body into tagged, normalized records

mod json_records;

use std::collections::HashMap;
use std::sync::Arc;

use encoding_rs::{Encoding, BIG5};
use tracing::warn;

use crate::domain::dataset::{FieldMapping, SourceConfig, SourceFormat};
use crate::domain::error::Result;
use crate::domain::record::Record;
use crate::infrastructure::csv::CsvParser;
use crate::infrastructure::normalize::standardize_date;

pub use json_records::parse_json_records;

/// Records parsed from one source body
#[derive(Debug, Default)]
pub struct ParsedSource {
    pub records: Vec<Record>,
    /// Rows dropped as malformed
    pub skipped_rows: usize,
}

/// Decode a response body to text.
///
/// A BOM picks the encoding and is removed. Without one, UTF-8 is tried
/// first and Big5 is the fallback for legacy government feeds.
pub fn decode_body(bytes: &[u8]) -> String {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return text.into_owned();
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (text, had_errors) = BIG5.decode_without_bom_handling(bytes);
            if had_errors {
                warn!("Body is neither valid UTF-8 nor Big5; undecodable bytes were replaced");
            }
            text.into_owned()
        }
    }
}

/// Parse a decoded body according to the source's format
pub fn parse_source(text: &str, source: &SourceConfig) -> Result<ParsedSource> {
    match source.format {
        SourceFormat::Csv => Ok(CsvParser::new().parse(text, source)),
        SourceFormat::Json => parse_json_records(text, source),
    }
}

/// Normalize the mapped date columns and stamp the dataset tag
pub(crate) fn build_record(
    mut fields: HashMap<String, String>,
    source: &SourceConfig,
    mapping: &Arc<FieldMapping>,
) -> Record {
    for column in mapping.date_fields() {
        if let Some(value) = fields.get_mut(column) {
            *value = standardize_date(value);
        }
    }
    Record::new(source.dataset_tag.clone(), fields, Arc::clone(mapping))
}
