pub mod collector;
pub mod config;
pub mod lifecycle;

pub use collector::{CollectStats, Collector};
pub use config::PipelineConfig;
pub use lifecycle::{Pipeline, RunSummary};
