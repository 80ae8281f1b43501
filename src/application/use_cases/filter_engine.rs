use std::cmp::Ordering;
use std::sync::Arc;

use tracing::debug;

use super::scheduler::{for_each_chunk, ChunkOutcome, Progress, Ticket};
use crate::domain::query::{MissingDatePolicy, Query};
use crate::domain::record::{Record, RecordStore, ResultSet};

/// Applies a [`Query`] to the store and sorts the matches
#[derive(Debug, Clone)]
pub struct FilterEngine {
    chunk_size: usize,
    missing_dates: MissingDatePolicy,
}

impl FilterEngine {
    pub fn new(chunk_size: usize, missing_dates: MissingDatePolicy) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            missing_dates,
        }
    }

    /// All supplied constraints, ANDed
    pub fn matches(&self, query: &Query, needle: Option<&str>, record: &Record) -> bool {
        if let Some(needle) = needle {
            if !record.company_name().to_lowercase().contains(needle) {
                return false;
            }
        }

        if query.has_date_constraint() {
            match record.primary_date() {
                Some(date) => {
                    if query.start_date.is_some_and(|start| date < start) {
                        return false;
                    }
                    if query.end_date.is_some_and(|end| date > end) {
                        return false;
                    }
                }
                None => {
                    if self.missing_dates == MissingDatePolicy::Exclude {
                        return false;
                    }
                }
            }
        }

        if let Some(authority) = &query.authority {
            if record.authority() != authority {
                return false;
            }
        }

        if let Some(tag) = &query.dataset_tag {
            if &record.dataset_tag != tag {
                return false;
            }
        }

        true
    }

    /// Filter in chunks, then sort. `None` when a newer search superseded
    /// this one before it finished.
    pub async fn run(
        &self,
        store: &RecordStore,
        query: &Query,
        ticket: &Ticket,
        progress: &dyn Progress,
    ) -> Option<ResultSet> {
        let needle = query.company_needle();
        let mut matched: Vec<Arc<Record>> = Vec::new();

        let outcome = for_each_chunk(store.records(), self.chunk_size, ticket, progress, |chunk| {
            matched.extend(
                chunk
                    .iter()
                    .filter(|r| self.matches(query, needle.as_deref(), r))
                    .cloned(),
            );
        })
        .await;

        if let ChunkOutcome::Superseded { processed } = outcome {
            debug!(ticket = ticket.value(), processed, "Search superseded, result discarded");
            return None;
        }

        sort_by_date_desc(&mut matched);
        debug!(matched = matched.len(), store = store.len(), "Search finished");
        Some(ResultSet::new(matched))
    }
}

/// Newest first; undated records last. Stable, so equal dates keep
/// their store order.
pub fn sort_by_date_desc(records: &mut [Arc<Record>]) {
    records.sort_by(|a, b| match (a.primary_date(), b.primary_date()) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::scheduler::{Generation, NullProgress};
    use crate::domain::dataset::FieldMapping;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn record(id: u64, tag: &str, company: &str, date: &str, authority: &str) -> Arc<Record> {
        let fields: HashMap<String, String> = [
            ("事業單位名稱或負責人", company),
            ("處分日期", date),
            ("主管機關", authority),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Arc::new(Record::new(tag, fields, Arc::new(FieldMapping::labor_announcement())).with_id(id))
    }

    fn store() -> RecordStore {
        RecordStore::new(vec![
            record(1, "勞動基準法", "Acme Ltd", "2024-01-05", "臺北市政府"),
            record(2, "勞動基準法", "Beta Corp", "2024-03-01", "高雄市政府"),
            record(3, "最低工資法", "ACME Trading", "2024-03-01", "臺北市政府"),
            record(4, "勞動基準法", "Gamma", "", "臺北市政府"),
            record(5, "最低工資法", "acme west", "2023-12-31", "新北市政府"),
        ])
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ids(results: &ResultSet) -> Vec<u64> {
        results.records().iter().map(|r| r.id).collect()
    }

    async fn search(engine: &FilterEngine, store: &RecordStore, query: &Query) -> ResultSet {
        let ticket = Generation::new().bump();
        engine.run(store, query, &ticket, &NullProgress).await.unwrap()
    }

    #[tokio::test]
    async fn test_company_match_is_case_insensitive_substring() {
        let engine = FilterEngine::new(2, MissingDatePolicy::Include);
        let results = search(&engine, &store(), &Query::new().with_company_name("acme")).await;
        assert_eq!(ids(&results), vec![3, 1, 5]);
    }

    #[tokio::test]
    async fn test_date_bounds_are_inclusive() {
        let engine = FilterEngine::new(2, MissingDatePolicy::Exclude);
        let query = Query::new().with_date_range(Some(date(2024, 1, 5)), Some(date(2024, 3, 1)));
        let results = search(&engine, &store(), &query).await;
        assert_eq!(ids(&results), vec![2, 3, 1]);
    }

    #[tokio::test]
    async fn test_missing_date_policy() {
        let query = Query::new().with_date_range(Some(date(2024, 1, 1)), None);

        let include = FilterEngine::new(10, MissingDatePolicy::Include);
        assert_eq!(ids(&search(&include, &store(), &query).await), vec![2, 3, 1, 4]);

        let exclude = FilterEngine::new(10, MissingDatePolicy::Exclude);
        assert_eq!(ids(&search(&exclude, &store(), &query).await), vec![2, 3, 1]);
    }

    #[tokio::test]
    async fn test_authority_and_tag_are_exact() {
        let engine = FilterEngine::new(10, MissingDatePolicy::Include);

        let query = Query::new().with_authority("臺北市政府").with_dataset_tag("勞動基準法");
        assert_eq!(ids(&search(&engine, &store(), &query).await), vec![1, 4]);

        let partial = Query::new().with_authority("臺北");
        assert!(search(&engine, &store(), &partial).await.is_empty());
    }

    #[tokio::test]
    async fn test_filtering_is_idempotent_and_bounded() {
        let engine = FilterEngine::new(3, MissingDatePolicy::Include);
        let store = store();
        let query = Query::new().with_company_name("a");

        let first = search(&engine, &store, &query).await;
        let second = search(&engine, &store, &query).await;
        assert_eq!(ids(&first), ids(&second));
        assert!(first.len() <= store.len());

        let everything = search(&engine, &store, &Query::new()).await;
        assert_eq!(everything.len(), store.len());
    }

    #[test]
    fn test_sort_is_stable_for_equal_dates() {
        let mut records = vec![
            record(1, "t", "a", "2024-01-01", ""),
            record(2, "t", "b", "2024-05-01", ""),
            record(3, "t", "c", "2024-01-01", ""),
            record(4, "t", "d", "", ""),
            record(5, "t", "e", "2024-01-01", ""),
        ];
        sort_by_date_desc(&mut records);
        let order: Vec<u64> = records.iter().map(|r| r.id).collect();
        assert_eq!(order, vec![2, 1, 3, 5, 4]);
    }

    #[tokio::test]
    async fn test_superseded_search_returns_none() {
        let engine = FilterEngine::new(1, MissingDatePolicy::Include);
        let generation = Generation::new();
        let stale = generation.bump();
        generation.bump();

        let result = engine.run(&store(), &Query::new(), &stale, &NullProgress).await;
        assert!(result.is_none());
    }
}
