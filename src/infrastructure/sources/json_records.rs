use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use super::{build_record, ParsedSource};
use crate::domain::dataset::SourceConfig;
use crate::domain::error::{AppError, Result};

/// Parse a JSON payload: either a top-level array of objects or an object
/// carrying a `records` array (open-data API shape).
///
/// Entries that are not objects are skipped and counted.
pub fn parse_json_records(text: &str, source: &SourceConfig) -> Result<ParsedSource> {
    let json: Value = serde_json::from_str(text)
        .map_err(|e| AppError::Parse(format!("{}: invalid JSON: {}", source.key, e)))?;

    let entries = match json {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("records") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(AppError::Parse(format!(
                    "{}: JSON object has no records array",
                    source.key
                )))
            }
        },
        _ => {
            return Err(AppError::Parse(format!(
                "{}: unexpected JSON payload",
                source.key
            )))
        }
    };

    let mapping = Arc::new(source.fields.clone());
    let mut parsed = ParsedSource::default();

    for (index, entry) in entries.into_iter().enumerate() {
        let Value::Object(object) = entry else {
            warn!(source = %source.key, index, "Skipping non-object JSON record");
            parsed.skipped_rows += 1;
            continue;
        };

        let fields: HashMap<String, String> = object
            .into_iter()
            .map(|(key, value)| (key, stringify(value)))
            .collect();
        parsed.records.push(build_record(fields, source, &mapping));
    }

    Ok(parsed)
}

fn stringify(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
