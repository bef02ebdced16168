//! Shared bootstrap utilities for client front-ends.
//!
//! Provides configuration loading and pipeline assembly that can be reused by
//! CLI, UI, or other front-end crates.
pub mod builder;
pub mod config;

pub use builder::{PipelineBuilder, PipelineSetup};
pub use config::PipelineConfig;
