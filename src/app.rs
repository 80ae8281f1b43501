use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{error, info};

use crate::application::{LoadCycle, Progress, QuerySession};
use crate::domain::config::AppConfig;
use crate::domain::error::{AppError, Result};
use crate::domain::host::{DownloadSink, MessageChannel, MessageLevel, Renderer};
use crate::infrastructure::config::ConfigService;
use crate::infrastructure::http::{Fetcher, HttpFetcher};
use crate::interfaces::{Cli, ConsoleMessages, ConsoleProgress, ConsoleRenderer, FileDownloadSink};

/// Collaborators one run talks to
pub struct App {
    config: AppConfig,
    fetcher: Arc<dyn Fetcher>,
    renderer: Arc<dyn Renderer>,
    downloads: Arc<dyn DownloadSink>,
    messages: Arc<dyn MessageChannel>,
    progress: Arc<dyn Progress>,
}

impl App {
    pub fn new(
        config: AppConfig,
        fetcher: Arc<dyn Fetcher>,
        renderer: Arc<dyn Renderer>,
        downloads: Arc<dyn DownloadSink>,
        messages: Arc<dyn MessageChannel>,
        progress: Arc<dyn Progress>,
    ) -> Self {
        Self {
            config,
            fetcher,
            renderer,
            downloads,
            messages,
            progress,
        }
    }

    /// Load every source, run the query from the arguments, render the
    /// requested page and export when asked
    pub async fn execute(&self, cli: &Cli, today: NaiveDate) -> Result<()> {
        let (store, _report) = LoadCycle::new(&self.config, Arc::clone(&self.fetcher))
            .run(self.progress.as_ref(), self.messages.as_ref())
            .await?;
        let mut session = QuerySession::new(&self.config, store);

        if cli.list_facets {
            let facets = session.facets();
            self.messages.notify(
                MessageLevel::Info,
                &format!("Authorities: {}", facets.authorities.join(", ")),
            );
            self.messages.notify(
                MessageLevel::Info,
                &format!("Datasets: {}", facets.dataset_tags.join(", ")),
            );
            return Ok(());
        }

        if let Some(size) = cli.page_size {
            session.set_page_size(size)?;
        }

        let query = cli.query(today, self.config.default_date_range_days);
        session
            .search(query, self.progress.as_ref(), self.messages.as_ref())
            .await;
        if let Some(label) = session.date_label() {
            info!(range = %label, results = session.results().len(), "Query applied");
        }

        if cli.page != 1 && !session.go_to_page(cli.page) {
            self.messages.notify(
                MessageLevel::Warning,
                &format!("Page {} is out of range; showing page 1", cli.page),
            );
        }

        let page = session.current_page();
        self.renderer.render(page.records, &page.meta);
        self.renderer.render_links(&session.page_links());

        if let Some(format) = cli.export {
            match session.export(format.into(), today) {
                Ok(file) => {
                    self.downloads
                        .trigger_download(&file.content, &file.filename, &file.mime_type)?;
                    self.messages.notify(
                        MessageLevel::Info,
                        &format!("Exported {} records to {}", session.results().len(), file.filename),
                    );
                }
                Err(e) if e.is_user_facing() => {
                    self.messages.notify(MessageLevel::Error, &e.to_string());
                }
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }
}

/// Terminal entry point: console host, `reqwest` transport
pub async fn run(cli: Cli) -> Result<()> {
    let service = match &cli.config {
        Some(path) => ConfigService::with_file(path),
        None => ConfigService::new(),
    };
    let config = service.load().map_err(|e| {
        error!(error = %e, "Failed to load configuration");
        AppError::System(format!("Failed to load configuration: {}", e))
    })?;

    let fetcher = HttpFetcher::new(config.request_timeout(), &config.user_agent)?;
    let app = App::new(
        config,
        Arc::new(fetcher),
        Arc::new(ConsoleRenderer::stdout()),
        Arc::new(FileDownloadSink::new(&cli.out_dir)),
        Arc::new(ConsoleMessages),
        Arc::new(ConsoleProgress),
    );

    app.execute(&cli, Local::now().date_naive()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::query_session::test_support::RecordingMessages;
    use crate::application::use_cases::test_support::{labor_csv, FakeFetcher};
    use crate::application::NullProgress;
    use crate::domain::page::PaginationMeta;
    use crate::domain::record::Record;
    use clap::Parser;
    use std::sync::Mutex;
    use tempfile::tempdir;

    #[derive(Default)]
    struct RecordingRenderer {
        metas: Mutex<Vec<PaginationMeta>>,
    }

    impl Renderer for RecordingRenderer {
        fn render(&self, _records: &[Arc<Record>], meta: &PaginationMeta) {
            self.metas.lock().unwrap().push(*meta);
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    fn fetcher(config: &AppConfig) -> Arc<FakeFetcher> {
        Arc::new(
            FakeFetcher::new()
                .with_body(
                    &config.sources[0].url,
                    labor_csv(&[
                        ("2024/1/5", "Acme", "臺北市政府", "1,000"),
                        ("2024/3/9", "Beta", "臺北市政府", "2,000"),
                    ]),
                )
                .with_body(
                    &config.sources[1].url,
                    labor_csv(&[("2024/6/1", "Acme East", "新北市政府", "3000")]),
                )
                .with_body(&config.sources[2].url, labor_csv(&[("2019/1/1", "Acme Old", "臺北市政府", "10")])),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_render_and_export() {
        let config = AppConfig::default();
        let dir = tempdir().unwrap();
        let renderer = Arc::new(RecordingRenderer::default());
        let messages = Arc::new(RecordingMessages::default());
        let app = App::new(
            config.clone(),
            fetcher(&config),
            renderer.clone(),
            Arc::new(FileDownloadSink::new(dir.path())),
            messages.clone(),
            Arc::new(NullProgress),
        );

        let cli = Cli::try_parse_from(["violation-query", "--company", "acme", "--export", "csv"]).unwrap();
        app.execute(&cli, today()).await.unwrap();

        let metas = renderer.metas.lock().unwrap();
        assert_eq!(metas.len(), 1);
        assert_eq!(metas[0].total, 2);

        let csv = std::fs::read_to_string(dir.path().join("violations_2024-06-30.csv")).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("1,\"新北市政府\",\"2024-06-01\",\"Acme East\""));
        assert!(lines[2].ends_with(",1000,\"\""));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_export_is_reported_not_written() {
        let config = AppConfig::default();
        let dir = tempdir().unwrap();
        let messages = Arc::new(RecordingMessages::default());
        let app = App::new(
            config.clone(),
            fetcher(&config),
            Arc::new(RecordingRenderer::default()),
            Arc::new(FileDownloadSink::new(dir.path())),
            messages.clone(),
            Arc::new(NullProgress),
        );

        let cli = Cli::try_parse_from(["violation-query", "--company", "nobody", "--export", "xls"]).unwrap();
        app.execute(&cli, today()).await.unwrap();

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
        let sent = messages.messages.lock().unwrap();
        assert_eq!(sent.last().unwrap(), &(MessageLevel::Error, "No data to export".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_sources_down_is_fatal() {
        let app = App::new(
            AppConfig::default(),
            Arc::new(FakeFetcher::new()),
            Arc::new(RecordingRenderer::default()),
            Arc::new(FileDownloadSink::new(".")),
            Arc::new(RecordingMessages::default()),
            Arc::new(NullProgress),
        );

        let cli = Cli::try_parse_from(["violation-query"]).unwrap();
        let err = app.execute(&cli, today()).await.unwrap_err();
        assert!(matches!(err, AppError::System(_)));
    }
}
