pub mod app;
pub mod config;
pub mod data_source;
pub mod import;
pub mod logging;
pub mod utils;
