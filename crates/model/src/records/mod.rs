pub mod batch;
pub mod point;
pub mod row;
