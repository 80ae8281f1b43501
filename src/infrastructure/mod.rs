pub mod config;
pub mod csv;
pub mod export;
pub mod http;
pub mod normalize;
pub mod sources;
