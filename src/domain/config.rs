// ============================================================
// APPLICATION CONFIGURATION
// ============================================================
// Values the core depends on but does not own: sources, paging,
// chunking, debounce and retry settings

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::dataset::SourceConfig;
use super::error::{AppError, Result};
use super::query::MissingDatePolicy;

/// Retry policy applied per source
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    #[validate(range(min = 1, max = 10))]
    pub max_attempts: u32,

    /// Delay before the second attempt
    pub delay_ms: u64,

    /// Multiplier applied to the delay after each failed attempt (1.0 = fixed)
    #[validate(range(min = 1.0, max = 10.0))]
    pub backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 2000,
            backoff_factor: 1.0,
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after failed attempt number `attempt` (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1) as i32;
        let millis = self.delay_ms as f64 * self.backoff_factor.powi(exponent);
        Duration::from_millis(millis.round() as u64)
    }
}

/// Where an export column takes its value from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnSource {
    /// 1-based position in the result set
    Sequence,
    /// Raw column by name, written as quoted text
    Text { field: String },
    /// The dataset's primary date, written raw
    Date,
    /// The dataset's amount column, written as bare digits
    Amount,
    CompanyName,
    Authority,
    DatasetTag,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportColumn {
    pub header: String,
    pub source: ColumnSource,
}

impl ExportColumn {
    pub fn new(header: &str, source: ColumnSource) -> Self {
        Self {
            header: header.to_string(),
            source,
        }
    }

    pub fn default_columns() -> Vec<Self> {
        vec![
            Self::new("序號", ColumnSource::Sequence),
            Self::new("主管機關", ColumnSource::Authority),
            Self::new("處分日期", ColumnSource::Date),
            Self::new("事業單位名稱或負責人", ColumnSource::CompanyName),
            Self::new("法規類型", ColumnSource::DatasetTag),
            Self::new(
                "違法法規法條",
                ColumnSource::Text {
                    field: "違法法規法條".to_string(),
                },
            ),
            Self::new(
                "違反法規內容",
                ColumnSource::Text {
                    field: "違反法規內容".to_string(),
                },
            ),
            Self::new("罰鍰金額", ColumnSource::Amount),
            Self::new(
                "備註說明",
                ColumnSource::Text {
                    field: "備註說明".to_string(),
                },
            ),
        ]
    }
}

/// Full application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    #[validate(length(min = 1), nested)]
    pub sources: Vec<SourceConfig>,

    /// Records per page
    #[validate(range(min = 1, max = 10000))]
    pub page_size: usize,

    /// Page sizes offered to the user
    pub page_size_options: Vec<usize>,

    /// Length of the default query window
    pub default_date_range_days: u32,

    /// Records processed between two yields
    #[validate(range(min = 1))]
    pub chunk_size: usize,

    /// Quiet period before a search request runs
    pub debounce_ms: u64,

    /// Result size above which the host is warned
    pub max_display_items: usize,

    #[validate(nested)]
    pub retry: RetryPolicy,

    #[validate(range(min = 1))]
    pub request_timeout_secs: u64,

    pub user_agent: String,

    pub missing_date_policy: MissingDatePolicy,

    pub export_columns: Vec<ExportColumn>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sources: SourceConfig::default_sources(),
            page_size: 50,
            page_size_options: vec![20, 50, 100],
            default_date_range_days: 365,
            chunk_size: 1000,
            debounce_ms: 300,
            max_display_items: 1000,
            retry: RetryPolicy::default(),
            request_timeout_secs: 30,
            user_agent: concat!("violation-query/", env!("CARGO_PKG_VERSION")).to_string(),
            missing_date_policy: MissingDatePolicy::default(),
            export_columns: ExportColumn::default_columns(),
        }
    }
}

impl AppConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Field-level rules plus the cross-field checks derive cannot express
    pub fn check(&self) -> Result<()> {
        self.validate()?;

        let mut tags = HashSet::new();
        let mut keys = HashSet::new();
        for source in &self.sources {
            url::Url::parse(&source.url).map_err(|e| {
                AppError::Config(format!("Source {} has an invalid url: {}", source.key, e))
            })?;
            if !keys.insert(source.key.as_str()) {
                return Err(AppError::Config(format!(
                    "Duplicate source key: {}",
                    source.key
                )));
            }
            if !tags.insert(source.dataset_tag.as_str()) {
                return Err(AppError::Config(format!(
                    "Duplicate dataset tag: {}",
                    source.dataset_tag
                )));
            }
        }

        if self.export_columns.is_empty() {
            return Err(AppError::Config(
                "export_columns must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
