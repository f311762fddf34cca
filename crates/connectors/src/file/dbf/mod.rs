pub mod error;
pub mod reader;
