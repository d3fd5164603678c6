pub mod annotate;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod resolver;
pub mod runner;
pub mod worker;

pub use annotate::{Annotator, Tag};
pub use config::{load_config, Config, ResolverConfig};
pub use error::{ConfigError, FlapError, ResolveError, RunnerError, WorkerError};
pub use pipeline::{Pipeline, PipelineConfig, RunSummary};
pub use resolver::{CommandResolver, ProcfsResolver, Resolve, ResolverCache};
pub use runner::{CommandRunner, LineSource};
pub use worker::{Job, JobResult, WorkerPool};
