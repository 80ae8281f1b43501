use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// How a date constraint treats records whose date is missing or unparseable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MissingDatePolicy {
    /// Undated records pass any date range
    #[default]
    Include,
    /// Undated records fail any date range
    Exclude,
}

/// Immutable snapshot of the user's filter inputs.
///
/// Empty or absent fields mean "no constraint on this dimension".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Query {
    pub company_name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub authority: Option<String>,
    pub dataset_tag: Option<String>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Query covering the last `days` days up to and including `today`
    pub fn default_window(today: NaiveDate, days: u32) -> Self {
        Self {
            start_date: Some(today - Duration::days(i64::from(days))),
            end_date: Some(today),
            ..Self::default()
        }
    }

    pub fn with_company_name(mut self, name: impl Into<String>) -> Self {
        self.company_name = non_empty(name.into());
        self
    }

    pub fn with_date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = non_empty(authority.into());
        self
    }

    pub fn with_dataset_tag(mut self, tag: impl Into<String>) -> Self {
        self.dataset_tag = non_empty(tag.into());
        self
    }

    /// Company-name needle, lowercased; `None` when unconstrained
    pub fn company_needle(&self) -> Option<String> {
        self.company_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    pub fn has_date_constraint(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Human description of a date window
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateRangeLabel {
    /// The window equals the configured default length
    LastDays(u32),
    Span {
        start: NaiveDate,
        end: NaiveDate,
        days: i64,
    },
}

impl DateRangeLabel {
    pub fn describe(start: NaiveDate, end: NaiveDate, default_days: u32) -> Self {
        let days = (end - start).num_days();
        if days == i64::from(default_days) {
            DateRangeLabel::LastDays(default_days)
        } else {
            DateRangeLabel::Span { start, end, days }
        }
    }
}

impl std::fmt::Display for DateRangeLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateRangeLabel::LastDays(days) => write!(f, "last {} days", days),
            DateRangeLabel::Span { start, end, days } => {
                write!(f, "{} to {} ({} days)", start, end, days)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_window_spans_configured_days() {
        let q = Query::default_window(date(2024, 12, 31), 365);
        assert_eq!(q.start_date, Some(date(2024, 1, 1)));
        assert_eq!(q.end_date, Some(date(2024, 12, 31)));
        assert!(q.company_name.is_none());
    }

    #[test]
    fn test_blank_inputs_mean_no_constraint() {
        let q = Query::new()
            .with_company_name("   ")
            .with_authority("")
            .with_dataset_tag(" 勞動基準法 ");

        assert!(q.company_name.is_none());
        assert!(q.authority.is_none());
        assert_eq!(q.dataset_tag.as_deref(), Some("勞動基準法"));
        assert!(q.company_needle().is_none());
    }

    #[test]
    fn test_date_range_label() {
        let end = date(2024, 6, 30);
        let start = end - Duration::days(365);
        assert_eq!(
            DateRangeLabel::describe(start, end, 365),
            DateRangeLabel::LastDays(365)
        );

        let label = DateRangeLabel::describe(date(2024, 6, 1), end, 365);
        assert_eq!(label.to_string(), "2024-06-01 to 2024-06-30 (29 days)");
    }
}
