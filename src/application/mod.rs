pub mod use_cases;

pub use use_cases::exporter::{ExportFile, ExportFormat, Exporter};
pub use use_cases::load_cycle::LoadCycle;
pub use use_cases::query_session::{Facets, QuerySession, SearchStatus};
pub use use_cases::scheduler::{NullProgress, Progress};
pub use use_cases::search_controller::SearchController;
pub use use_cases::source_loader::{LoadReport, SourceOutcome, SourceReport};
