pub mod process;
pub mod sink;
pub mod source;
