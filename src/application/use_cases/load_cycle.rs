use std::sync::Arc;

use tracing::info;

use super::chunked_merge::merge_batches;
use super::scheduler::Progress;
use super::source_loader::{LoadReport, SourceLoader};
use crate::domain::config::AppConfig;
use crate::domain::dataset::SourceConfig;
use crate::domain::error::{AppError, Result};
use crate::domain::host::{MessageChannel, MessageLevel};
use crate::domain::record::RecordStore;
use crate::infrastructure::http::Fetcher;

pub const ALL_SOURCES_FAILED_MESSAGE: &str =
    "None of the data sources could be loaded. Check the network connection and reload.";

/// One load cycle: fetch every source, then merge into a new store
pub struct LoadCycle {
    loader: SourceLoader,
    sources: Vec<SourceConfig>,
    chunk_size: usize,
}

impl LoadCycle {
    pub fn new(config: &AppConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            loader: SourceLoader::new(fetcher, config.retry.clone()),
            sources: config.sources.clone(),
            chunk_size: config.chunk_size,
        }
    }

    /// Partial failures are reported on the message channel and
    /// tolerated. Fails only when no source could be loaded.
    pub async fn run(
        &self,
        progress: &dyn Progress,
        messages: &dyn MessageChannel,
    ) -> Result<(RecordStore, LoadReport)> {
        progress.log(&format!("Loading {} sources", self.sources.len()));
        let mut report = self.loader.load_all(&self.sources).await;

        for failed in report.failed() {
            messages.notify(
                MessageLevel::Warning,
                &format!("Could not load {}; continuing without it", failed.name),
            );
        }

        if report.all_failed() {
            return Err(AppError::System(ALL_SOURCES_FAILED_MESSAGE.to_string()));
        }

        progress.log("Merging records");
        let batches = std::mem::take(&mut report.batches);
        let store = merge_batches(batches, self.chunk_size, progress).await;

        info!(
            records = store.len(),
            sources = report.sources.len(),
            failed = report.failed().count(),
            "Load cycle finished"
        );
        Ok((store, report))
    }
}
