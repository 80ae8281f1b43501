pub mod cli;
pub mod console;
pub mod download;

pub use cli::Cli;
pub use console::{ConsoleMessages, ConsoleProgress, ConsoleRenderer};
pub use download::FileDownloadSink;
