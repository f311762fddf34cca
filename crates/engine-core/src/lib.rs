pub mod connectors;
pub mod error;
pub mod extract;
pub mod mapping;
pub mod metrics;
pub mod retry;
pub mod supervisor;
pub mod watermark;
pub mod writer;
