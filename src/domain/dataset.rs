// ============================================================
// DATASET DESCRIPTIONS
// ============================================================
// Remote sources and the dataset-specific column names used to
// read the handful of fields the query engine cares about

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Payload shape served by a source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    #[default]
    Csv,
    Json,
}

/// Column names a dataset uses for the fields the engine reads.
///
/// Upstream feeds rename and add columns freely, so records keep every
/// column they arrive with and only these names are interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Primary date column (filter and sort key)
    pub date: String,

    /// Other date columns that are normalized but not queried
    #[serde(default)]
    pub extra_dates: Vec<String>,

    /// Column matched by the company-name substring filter
    pub company_name: String,

    /// Column matched by the authority filter
    pub authority: String,

    /// Penalty amount column
    pub amount: String,

    /// Free-text violation description shown next to each record
    #[serde(default)]
    pub violation: Option<String>,
}

impl FieldMapping {
    /// Column names of the Ministry of Labor announcement feeds
    pub fn labor_announcement() -> Self {
        Self {
            date: "處分日期".to_string(),
            extra_dates: Vec::new(),
            company_name: "事業單位名稱或負責人".to_string(),
            authority: "主管機關".to_string(),
            amount: "罰鍰金額".to_string(),
            violation: Some("違反法規內容".to_string()),
        }
    }

    /// Column names of the environmental penalty open-data API
    pub fn environmental_penalty() -> Self {
        Self {
            date: "penalty_date".to_string(),
            extra_dates: vec!["transgress_date".to_string()],
            company_name: "fac_name".to_string(),
            authority: "county_name".to_string(),
            amount: "penalty_money".to_string(),
            violation: Some("transgress_law".to_string()),
        }
    }

    /// Every column that holds a date
    pub fn date_fields(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.date.as_str()).chain(self.extra_dates.iter().map(String::as_str))
    }
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self::labor_announcement()
    }
}

/// One configured remote source
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SourceConfig {
    /// Short stable key, e.g. `a0101`
    #[validate(length(min = 1))]
    pub key: String,

    /// Human-readable name used in logs and messages
    #[validate(length(min = 1))]
    pub name: String,

    #[validate(length(min = 1))]
    pub url: String,

    /// Discriminator stamped on every record from this source
    #[validate(length(min = 1))]
    pub dataset_tag: String,

    #[serde(default)]
    pub format: SourceFormat,

    #[serde(default)]
    pub fields: FieldMapping,
}

impl SourceConfig {
    fn labor(key: &str, act: &str) -> Self {
        Self {
            key: key.to_string(),
            name: act.to_string(),
            url: format!("https://announcement.mol.gov.tw/data/announcement_{key}.csv"),
            dataset_tag: act.to_string(),
            format: SourceFormat::Csv,
            fields: FieldMapping::labor_announcement(),
        }
    }

    /// The three labor-law announcement feeds
    pub fn default_sources() -> Vec<Self> {
        vec![
            Self::labor("a0101", "勞動基準法"),
            Self::labor("a0201", "性別工作平等法"),
            Self::labor("a0901", "最低工資法"),
        ]
    }
}
