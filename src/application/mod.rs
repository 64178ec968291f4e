//! Application services layer.

pub mod error;
pub mod generate;
pub mod posts;
pub mod repos;
