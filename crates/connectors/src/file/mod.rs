pub mod dbf;
