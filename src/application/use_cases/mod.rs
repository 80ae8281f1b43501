pub mod chunked_merge;
pub mod exporter;
pub mod filter_engine;
pub mod load_cycle;
pub mod pager;
pub mod query_session;
pub mod scheduler;
pub mod search_controller;
pub mod source_loader;

#[cfg(test)]
pub(crate) mod test_support;
