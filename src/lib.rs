pub mod aggregator;
pub mod config;
pub mod error;
pub mod fetch;
pub mod infra;
pub mod model;
pub mod output;
pub mod render;
pub mod scoring;
pub mod services;
