// ============================================================
// TERMINAL HOST
// ============================================================
// Results table on stdout; messages and progress on stderr

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crate::application::Progress;
use crate::domain::host::{MessageChannel, MessageLevel, Renderer};
use crate::domain::page::{PageLinks, PaginationMeta};
use crate::domain::record::Record;
use crate::infrastructure::normalize::format_amount;

const HEADERS: [&str; 6] = ["處分日期", "主管機關", "事業單位名稱或負責人", "法規類型", "罰鍰金額", "違反法規內容"];

fn or_dash(value: &str) -> String {
    if value.trim().is_empty() {
        "-".to_string()
    } else {
        value.replace('\n', " ")
    }
}

/// Display cells of one record
pub fn display_row(record: &Record) -> [String; 6] {
    [
        or_dash(record.date()),
        or_dash(record.authority()),
        or_dash(record.company_name()),
        or_dash(&record.dataset_tag),
        format_amount(record.amount()),
        or_dash(record.violation()),
    ]
}

/// Tab-separated table writer
pub struct ConsoleRenderer<W: Write + Send> {
    out: Mutex<W>,
}

impl ConsoleRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_page(out: &mut W, records: &[Arc<Record>], meta: &PaginationMeta) -> io::Result<()> {
        if records.is_empty() {
            writeln!(out, "No matching records.")?;
            return Ok(());
        }

        writeln!(out, "#\t{}", HEADERS.join("\t"))?;
        for (offset, record) in records.iter().enumerate() {
            writeln!(out, "{}\t{}", meta.first_item + offset, display_row(record).join("\t"))?;
        }
        writeln!(
            out,
            "Page {} of {} (items {}-{} of {})",
            meta.current_page, meta.page_count, meta.first_item, meta.last_item, meta.total
        )
    }
}

impl<W: Write + Send> Renderer for ConsoleRenderer<W> {
    fn render(&self, records: &[Arc<Record>], meta: &PaginationMeta) {
        let Ok(mut out) = self.out.lock() else {
            return;
        };
        if let Err(e) = Self::write_page(&mut *out, records, meta) {
            tracing::error!(error = %e, "Failed to write results");
        }
    }

    fn render_links(&self, links: &PageLinks) {
        if links.pages.is_empty() {
            return;
        }
        let mut parts = Vec::new();
        if links.leading_ellipsis {
            parts.push("...".to_string());
        }
        parts.extend(links.pages.iter().map(usize::to_string));
        if links.trailing_ellipsis {
            parts.push("...".to_string());
        }
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "Pages: {}", parts.join(" "));
        }
    }
}

/// Writes user-visible messages to stderr
pub struct ConsoleMessages;

impl MessageChannel for ConsoleMessages {
    fn notify(&self, level: MessageLevel, message: &str) {
        let label = match level {
            MessageLevel::Info => "info",
            MessageLevel::Warning => "warning",
            MessageLevel::Error => "error",
        };
        eprintln!("[{}] {}", label, message);
    }
}

/// Single updating progress line on stderr
pub struct ConsoleProgress;

impl Progress for ConsoleProgress {
    fn chunk_done(&self, processed: usize, total: usize) {
        let percent = if total == 0 { 100 } else { processed * 100 / total };
        eprint!("\rProcessing... {}% ({}/{})", percent, processed, total);
        if processed >= total {
            eprintln!();
        }
    }

    fn log(&self, msg: &str) {
        eprintln!("{}", msg);
    }
}
