//! Query session
//!
//! Owns the state one user works with: the record store of the current
//! load cycle, the active query, its ResultSet and the page position.
//! Every search bumps the session's generation, so a search that was
//! overtaken by a newer one never replaces the newer result.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use super::exporter::{ExportFile, ExportFormat, Exporter};
use super::filter_engine::FilterEngine;
use super::pager::Pager;
use super::scheduler::{Generation, Progress, Ticket};
use crate::domain::config::AppConfig;
use crate::domain::error::{AppError, Result};
use crate::domain::host::{MessageChannel, MessageLevel};
use crate::domain::page::{Page, PageLinks};
use crate::domain::query::{DateRangeLabel, Query};
use crate::domain::record::{RecordStore, ResultSet};

/// Filter choices offered to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facets {
    pub authorities: Vec<String>,
    pub dataset_tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    Completed { total: usize },
    /// A newer search started first; this result was discarded
    Superseded,
}

pub struct QuerySession {
    store: Arc<RecordStore>,
    query: Query,
    results: ResultSet,
    pager: Pager,
    engine: FilterEngine,
    exporter: Exporter,
    generation: Generation,
    configured_tags: Vec<String>,
    page_size_options: Vec<usize>,
    default_date_range_days: u32,
    max_display_items: usize,
}

impl QuerySession {
    pub fn new(config: &AppConfig, store: RecordStore) -> Self {
        Self {
            store: Arc::new(store),
            query: Query::new(),
            results: ResultSet::default(),
            pager: Pager::new(config.page_size),
            engine: FilterEngine::new(config.chunk_size, config.missing_date_policy),
            exporter: Exporter::new(config.export_columns.clone()),
            generation: Generation::new(),
            configured_tags: config.sources.iter().map(|s| s.dataset_tag.clone()).collect(),
            page_size_options: config.page_size_options.clone(),
            default_date_range_days: config.default_date_range_days,
            max_display_items: config.max_display_items,
        }
    }

    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    /// Handle for superseding this session's searches from elsewhere
    pub fn generation(&self) -> Generation {
        self.generation.clone()
    }

    pub fn engine(&self) -> &FilterEngine {
        &self.engine
    }

    pub fn facets(&self) -> Facets {
        Facets {
            authorities: self.store.authorities(),
            dataset_tags: self.configured_tags.clone(),
        }
    }

    pub fn default_query(&self, today: NaiveDate) -> Query {
        Query::default_window(today, self.default_date_range_days)
    }

    /// Label for the active query's date window, if it has both bounds
    pub fn date_label(&self) -> Option<DateRangeLabel> {
        match (self.query.start_date, self.query.end_date) {
            (Some(start), Some(end)) => Some(DateRangeLabel::describe(
                start,
                end,
                self.default_date_range_days,
            )),
            _ => None,
        }
    }

    /// Run `query` now and make it the active one
    pub async fn search(
        &mut self,
        query: Query,
        progress: &dyn Progress,
        messages: &dyn MessageChannel,
    ) -> SearchStatus {
        let ticket = self.generation.bump();
        let store = Arc::clone(&self.store);
        match self.engine.run(&store, &query, &ticket, progress).await {
            Some(results) => self.apply_results(query, results, &ticket, messages),
            None => SearchStatus::Superseded,
        }
    }

    /// Back to the default window with no other constraint
    pub async fn reset_query(
        &mut self,
        today: NaiveDate,
        progress: &dyn Progress,
        messages: &dyn MessageChannel,
    ) -> SearchStatus {
        let query = self.default_query(today);
        self.search(query, progress, messages).await
    }

    /// Install a finished search, unless a newer one was issued meanwhile
    pub fn apply_results(
        &mut self,
        query: Query,
        results: ResultSet,
        ticket: &Ticket,
        messages: &dyn MessageChannel,
    ) -> SearchStatus {
        if !ticket.is_current() {
            return SearchStatus::Superseded;
        }

        let total = results.len();
        info!(total, store = self.store.len(), "Search results applied");

        if total > self.max_display_items {
            warn!(total, cap = self.max_display_items, "Result set exceeds display cap");
            messages.notify(
                MessageLevel::Warning,
                &format!(
                    "{} records match; consider narrowing the query (more than {})",
                    total, self.max_display_items
                ),
            );
        }

        self.query = query;
        self.results = results;
        self.pager.reset();
        SearchStatus::Completed { total }
    }

    /// Start a new load cycle with a fresh store. Any in-flight search
    /// is superseded and the current results are dropped.
    pub fn replace_store(&mut self, store: RecordStore) {
        self.generation.bump();
        self.store = Arc::new(store);
        self.results = ResultSet::default();
        self.pager.reset();
    }

    pub fn current_page(&self) -> Page<'_> {
        self.pager.page(&self.results)
    }

    pub fn page_links(&self) -> PageLinks {
        self.pager.links(self.results.len())
    }

    pub fn go_to_page(&mut self, page: usize) -> bool {
        self.pager.go_to(page, self.results.len())
    }

    pub fn next_page(&mut self) -> bool {
        self.pager.next(self.results.len())
    }

    pub fn previous_page(&mut self) -> bool {
        self.pager.previous(self.results.len())
    }

    /// Only sizes from the configured options are accepted
    pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        if !self.page_size_options.is_empty() && !self.page_size_options.contains(&page_size) {
            return Err(AppError::UserInput(format!(
                "Page size {} is not one of {:?}",
                page_size, self.page_size_options
            )));
        }
        self.pager.set_page_size(page_size);
        Ok(())
    }

    pub fn export(&self, format: ExportFormat, today: NaiveDate) -> Result<ExportFile> {
        self.exporter.export(&self.results, format, today)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Mutex;

    use crate::domain::host::{MessageChannel, MessageLevel};

    #[derive(Default)]
    pub struct RecordingMessages {
        pub messages: Mutex<Vec<(MessageLevel, String)>>,
    }

    impl MessageChannel for RecordingMessages {
        fn notify(&self, level: MessageLevel, message: &str) {
            self.messages.lock().unwrap().push((level, message.to_string()));
        }
    }
}
