//! Pipeline orchestration.

pub mod runner;

pub use runner::{ReviewPipeline, RunOutput};
