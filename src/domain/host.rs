// ============================================================
// HOST PORTS
// ============================================================
// What the core needs from whoever embeds it: a surface to draw a
// page on, a way to hand over export files and one message channel

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::error::Result;
use super::page::{PageLinks, PaginationMeta};
use super::record::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Warning,
    Error,
}

/// Draws one page of results. Called only after a search has finished.
pub trait Renderer: Send + Sync {
    fn render(&self, records: &[Arc<Record>], meta: &PaginationMeta);

    /// Page navigation around the current page; hosts without
    /// navigation ignore it
    fn render_links(&self, _links: &PageLinks) {}
}

/// Receives finished export content
pub trait DownloadSink: Send + Sync {
    fn trigger_download(&self, content: &str, filename: &str, mime_type: &str) -> Result<()>;
}

/// The single user-visible message channel
pub trait MessageChannel: Send + Sync {
    fn notify(&self, level: MessageLevel, message: &str);
}
