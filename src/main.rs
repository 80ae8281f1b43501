use clap::Parser;
use tracing_subscriber::EnvFilter;

use violation_query_lib::domain::host::{MessageChannel, MessageLevel};
use violation_query_lib::interfaces::{Cli, ConsoleMessages};

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    if let Err(e) = violation_query_lib::run(cli).await {
        ConsoleMessages.notify(MessageLevel::Error, &e.to_string());
        std::process::exit(1);
    }
}
