#![forbid(unsafe_code)]

pub mod csv_file;
pub mod repository;
