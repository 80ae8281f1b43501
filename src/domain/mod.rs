// ============================================================
// DOMAIN LAYER
// ============================================================
// Records, queries, configuration, errors and host ports
// No I/O, no async

pub mod config;
pub mod dataset;
pub mod error;
pub mod host;
pub mod page;
pub mod query;
pub mod record;

pub use config::{AppConfig, ColumnSource, ExportColumn, RetryPolicy};
pub use dataset::{FieldMapping, SourceConfig, SourceFormat};
pub use error::{AppError, Result};
pub use host::{DownloadSink, MessageChannel, MessageLevel, Renderer};
pub use page::{Page, PageLinks, PaginationMeta};
pub use query::{DateRangeLabel, MissingDatePolicy, Query};
pub use record::{Record, RecordStore, ResultSet, DATASET_TAG_FIELD};
