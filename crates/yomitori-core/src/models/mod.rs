//! Data models shared across the pipeline.

pub mod candidate;
pub mod config;
pub mod record;
