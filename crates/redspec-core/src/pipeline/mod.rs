pub mod config;
mod orchestrator;

pub use config::PipelineConfig;
pub use orchestrator::{run_pipeline, PipelineOutput};
