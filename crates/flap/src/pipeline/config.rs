use crate::config::Config;
use crate::worker::pool::{DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKER_COUNT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub worker_count: usize,
    pub queue_capacity: usize,
    pub ordered_output: bool,
}

impl PipelineConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            worker_count: config.worker_count,
            queue_capacity: config.queue_capacity,
            ordered_output: config.ordered_output,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            worker_count: DEFAULT_WORKER_COUNT,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            ordered_output: false,
        }
    }
}
