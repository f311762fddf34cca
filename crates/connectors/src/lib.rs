pub mod file;
pub mod influx;
pub mod process;
