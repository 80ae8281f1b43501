use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::domain::config::RetryPolicy;
use crate::domain::dataset::SourceConfig;
use crate::domain::error::{AppError, Result};
use crate::domain::record::Record;
use crate::infrastructure::http::Fetcher;
use crate::infrastructure::sources::{decode_body, parse_source, ParsedSource};

/// Result of loading one source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceOutcome {
    Loaded { rows: usize, skipped: usize },
    Failed { attempts: u32, error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    pub key: String,
    pub name: String,
    pub dataset_tag: String,
    pub outcome: SourceOutcome,
}

/// Everything one load cycle produced. Failed sources contribute a report
/// and no records.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub sources: Vec<SourceReport>,
    /// Parsed records per successful source, in configuration order
    pub batches: Vec<Vec<Record>>,
}

impl LoadReport {
    pub fn total_rows(&self) -> usize {
        self.batches.iter().map(Vec::len).sum()
    }

    pub fn failed(&self) -> impl Iterator<Item = &SourceReport> {
        self.sources
            .iter()
            .filter(|s| matches!(s.outcome, SourceOutcome::Failed { .. }))
    }

    pub fn all_failed(&self) -> bool {
        !self.sources.is_empty() && self.failed().count() == self.sources.len()
    }
}

/// Fetches every configured source concurrently, with per-source retries
pub struct SourceLoader {
    fetcher: Arc<dyn Fetcher>,
    retry: RetryPolicy,
}

impl SourceLoader {
    pub fn new(fetcher: Arc<dyn Fetcher>, retry: RetryPolicy) -> Self {
        Self { fetcher, retry }
    }

    /// Load all sources. Never fails: a source that cannot be fetched or
    /// parsed ends up as `SourceOutcome::Failed`.
    pub async fn load_all(&self, sources: &[SourceConfig]) -> LoadReport {
        let handles: Vec<(SourceConfig, JoinHandle<(u32, Result<ParsedSource>)>)> = sources
            .iter()
            .cloned()
            .map(|source| {
                let fetcher = Arc::clone(&self.fetcher);
                let retry = self.retry.clone();
                let task_source = source.clone();
                let handle =
                    tokio::spawn(async move { load_source(fetcher, retry, task_source).await });
                (source, handle)
            })
            .collect();

        let mut report = LoadReport::default();

        for (source, handle) in handles {
            let (attempts, result) = match handle.await {
                Ok(done) => done,
                Err(e) => (
                    0,
                    Err(AppError::System(format!("Source task aborted: {}", e))),
                ),
            };

            let outcome = match result {
                Ok(parsed) => {
                    info!(
                        source = %source.key,
                        rows = parsed.records.len(),
                        skipped = parsed.skipped_rows,
                        "Source loaded"
                    );
                    let outcome = SourceOutcome::Loaded {
                        rows: parsed.records.len(),
                        skipped: parsed.skipped_rows,
                    };
                    report.batches.push(parsed.records);
                    outcome
                }
                Err(e) => {
                    error!(source = %source.key, attempts, error = %e, "Source failed, continuing without it");
                    SourceOutcome::Failed {
                        attempts,
                        error: e.to_string(),
                    }
                }
            };

            report.sources.push(SourceReport {
                key: source.key,
                name: source.name,
                dataset_tag: source.dataset_tag,
                outcome,
            });
        }

        report
    }
}

async fn load_source(
    fetcher: Arc<dyn Fetcher>,
    retry: RetryPolicy,
    source: SourceConfig,
) -> (u32, Result<ParsedSource>) {
    let (attempts, body) = fetch_with_retry(fetcher.as_ref(), &retry, &source).await;
    let result = body.and_then(|bytes| parse_source(&decode_body(&bytes), &source));
    (attempts, result)
}

/// Transport failures are retried; the attempt count is returned either way
async fn fetch_with_retry(
    fetcher: &dyn Fetcher,
    retry: &RetryPolicy,
    source: &SourceConfig,
) -> (u32, Result<Vec<u8>>) {
    let max_attempts = retry.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match fetcher.fetch(&source.url).await {
            Ok(bytes) => return (attempt, Ok(bytes)),
            Err(e) if attempt < max_attempts => {
                let delay = retry.delay_after(attempt);
                warn!(
                    source = %source.key,
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Fetch failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return (attempt, Err(e)),
        }
    }
}
