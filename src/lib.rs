pub mod commands;
pub mod composer;
pub mod config;
pub mod error;
pub mod fs;
pub mod interpolate;
pub mod library;
pub mod params;
pub mod pipeline;
pub mod plan;
pub mod processor;
pub mod scenario;
