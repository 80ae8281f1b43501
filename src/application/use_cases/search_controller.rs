use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::debug;

use super::query_session::{QuerySession, SearchStatus};
use super::scheduler::{Debouncer, Generation, Progress};
use crate::domain::host::{MessageChannel, Renderer};
use crate::domain::query::Query;

/// Debounced search front for interactive hosts.
///
/// Every request bumps the generation immediately, so a search already
/// running stops at its next chunk boundary. The new search itself only
/// starts once input has been quiet for the debounce delay.
pub struct SearchController {
    session: Arc<Mutex<QuerySession>>,
    generation: Generation,
    debouncer: Debouncer,
    renderer: Arc<dyn Renderer>,
    messages: Arc<dyn MessageChannel>,
    progress: Arc<dyn Progress>,
}

impl SearchController {
    pub fn new(
        session: QuerySession,
        debounce: Duration,
        renderer: Arc<dyn Renderer>,
        messages: Arc<dyn MessageChannel>,
        progress: Arc<dyn Progress>,
    ) -> Self {
        let generation = session.generation();
        Self {
            session: Arc::new(Mutex::new(session)),
            generation,
            debouncer: Debouncer::new(debounce),
            renderer,
            messages,
            progress,
        }
    }

    pub fn session(&self) -> Arc<Mutex<QuerySession>> {
        Arc::clone(&self.session)
    }

    pub fn request_search(&mut self, query: Query) {
        let ticket = self.generation.bump();
        debug!(ticket = ticket.value(), "Search requested");

        let session = Arc::clone(&self.session);
        let renderer = Arc::clone(&self.renderer);
        let messages = Arc::clone(&self.messages);
        let progress = Arc::clone(&self.progress);

        self.debouncer.schedule(async move {
            let (store, engine) = {
                let session = session.lock().await;
                (Arc::clone(session.store()), session.engine().clone())
            };

            let Some(results) = engine.run(&store, &query, &ticket, progress.as_ref()).await else {
                return;
            };

            let mut session = session.lock().await;
            if let SearchStatus::Completed { .. } =
                session.apply_results(query, results, &ticket, messages.as_ref())
            {
                let page = session.current_page();
                renderer.render(page.records, &page.meta);
            }
        });
    }

    /// Wait until the last requested search has finished. Returns `false`
    /// when that search panicked.
    pub async fn settle(&mut self) -> bool {
        self.debouncer.flush().await
    }

    /// Navigate and re-render; out-of-range pages are ignored
    pub async fn go_to_page(&self, page: usize) -> bool {
        let mut session = self.session.lock().await;
        if !session.go_to_page(page) {
            return false;
        }
        let current = session.current_page();
        self.renderer.render(current.records, &current.meta);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::query_session::test_support::RecordingMessages;
    use crate::application::use_cases::scheduler::NullProgress;
    use crate::domain::config::AppConfig;
    use crate::domain::dataset::FieldMapping;
    use crate::domain::page::PaginationMeta;
    use crate::domain::record::{Record, RecordStore};
    use std::collections::HashMap;
    use std::sync::Mutex as StdMutex;

    #[derive(Default)]
    struct RecordingRenderer {
        pages: StdMutex<Vec<(Vec<String>, PaginationMeta)>>,
    }

    impl Renderer for RecordingRenderer {
        fn render(&self, records: &[Arc<Record>], meta: &PaginationMeta) {
            let names = records.iter().map(|r| r.company_name().to_string()).collect();
            self.pages.lock().unwrap().push((names, *meta));
        }
    }

    fn controller(renderer: Arc<RecordingRenderer>) -> SearchController {
        let mapping = Arc::new(FieldMapping::labor_announcement());
        let records = ["Acme", "Beta", "Acme Two", "Gamma"]
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let fields: HashMap<String, String> =
                    [("事業單位名稱或負責人".to_string(), name.to_string())]
                        .into_iter()
                        .collect();
                Arc::new(Record::new("勞動基準法", fields, Arc::clone(&mapping)).with_id(i as u64 + 1))
            })
            .collect();

        let config = AppConfig {
            page_size: 20,
            chunk_size: 1,
            ..AppConfig::default()
        };
        SearchController::new(
            QuerySession::new(&config, RecordStore::new(records)),
            Duration::from_millis(300),
            renderer,
            Arc::new(RecordingMessages::default()),
            Arc::new(NullProgress),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_the_last_rapid_request_runs() {
        let renderer = Arc::new(RecordingRenderer::default());
        let mut controller = controller(Arc::clone(&renderer));

        controller.request_search(Query::new().with_company_name("a"));
        tokio::time::sleep(Duration::from_millis(100)).await;
        controller.request_search(Query::new().with_company_name("ac"));
        tokio::time::sleep(Duration::from_millis(100)).await;
        controller.request_search(Query::new().with_company_name("acme"));
        assert!(controller.settle().await);

        let pages = renderer.pages.lock().unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].0, vec!["Acme", "Acme Two"]);
        assert_eq!(pages[0].1.total, 2);

        let session = controller.session();
        let session = session.lock().await;
        assert_eq!(session.query().company_name.as_deref(), Some("acme"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_navigation_renders_valid_pages_only() {
        let renderer = Arc::new(RecordingRenderer::default());
        let mut controller = controller(Arc::clone(&renderer));

        controller.request_search(Query::new());
        assert!(controller.settle().await);

        assert!(controller.go_to_page(1).await);
        assert!(!controller.go_to_page(2).await);
        assert_eq!(renderer.pages.lock().unwrap().len(), 2);
    }
}
