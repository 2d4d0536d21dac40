pub mod aggregate;
pub mod chart;
pub mod config;
pub mod date;
pub mod error;
pub mod fetch;
pub mod loader;
pub mod records;
pub mod render;
pub mod scale;
