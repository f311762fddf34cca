pub mod time;
pub mod value;
