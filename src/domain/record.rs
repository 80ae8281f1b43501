// ============================================================
// RECORD TYPES
// ============================================================
// Dynamic string-keyed records, the per-load store and the
// filtered view derived from it

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use super::dataset::FieldMapping;

/// Synthetic field name under which the dataset tag is exposed
pub const DATASET_TAG_FIELD: &str = "lawType";

/// Canonical date layout produced by the normalizer
pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d";

/// One disclosure record.
///
/// Field sets differ between datasets, so values live in a plain map and
/// the dataset's [`FieldMapping`] tells the accessors which column is which.
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    /// Parse-order ordinal, unique within one load cycle
    pub id: u64,

    /// Dataset the record came from, never empty
    pub dataset_tag: String,

    /// Every column the source delivered
    pub fields: HashMap<String, String>,

    #[serde(skip)]
    mapping: Arc<FieldMapping>,

    #[serde(skip)]
    primary_date: Option<NaiveDate>,
}

impl Record {
    /// Build a record from already-normalized fields. The id is assigned
    /// later, when all sources are merged.
    pub fn new(
        dataset_tag: impl Into<String>,
        fields: HashMap<String, String>,
        mapping: Arc<FieldMapping>,
    ) -> Self {
        let primary_date = fields
            .get(&mapping.date)
            .and_then(|value| NaiveDate::parse_from_str(value, CANONICAL_DATE_FORMAT).ok());

        Self {
            id: 0,
            dataset_tag: dataset_tag.into(),
            fields,
            mapping,
            primary_date,
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    /// Raw lookup by column name; the dataset tag is reachable as `lawType`
    pub fn get(&self, name: &str) -> Option<&str> {
        if name == DATASET_TAG_FIELD {
            return Some(self.dataset_tag.as_str());
        }
        self.fields.get(name).map(String::as_str)
    }

    /// Lookup that treats a missing column as empty
    pub fn value(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    pub fn mapping(&self) -> &FieldMapping {
        &self.mapping
    }

    /// Normalized primary date text (may be a raw passthrough)
    pub fn date(&self) -> &str {
        self.value(&self.mapping.date)
    }

    /// Primary date, when it normalized to a real calendar date
    pub fn primary_date(&self) -> Option<NaiveDate> {
        self.primary_date
    }

    pub fn company_name(&self) -> &str {
        self.value(&self.mapping.company_name)
    }

    pub fn authority(&self) -> &str {
        self.value(&self.mapping.authority)
    }

    pub fn amount(&self) -> &str {
        self.value(&self.mapping.amount)
    }

    pub fn violation(&self) -> &str {
        match &self.mapping.violation {
            Some(column) => self.value(column),
            None => "",
        }
    }
}

/// All records of one load cycle. Rebuilt on refresh, immutable otherwise.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Arc<Record>>,
}

impl RecordStore {
    pub fn new(records: Vec<Arc<Record>>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Arc<Record>] {
        &self.records
    }

    /// Sorted distinct non-empty authorities
    pub fn authorities(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.authority())
            .filter(|a| !a.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Sorted distinct dataset tags present in the store
    pub fn dataset_tags(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.dataset_tag.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

/// Filtered and sorted view of the store for one query
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    records: Vec<Arc<Record>>,
}

impl ResultSet {
    pub fn new(records: Vec<Arc<Record>>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Arc<Record>] {
        &self.records
    }
}
