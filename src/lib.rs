pub mod calculator;
pub mod config;
pub mod format;
pub mod input;
pub mod output;
pub mod plan;
pub mod server;
pub mod summary;
