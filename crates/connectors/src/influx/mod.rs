pub mod client;
pub mod config;
pub mod error;
pub mod line_protocol;
pub mod query;
