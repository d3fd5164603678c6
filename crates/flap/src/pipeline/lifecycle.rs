use std::io::Write;
use std::process::ExitStatus;
use std::sync::Arc;
use std::thread;

use crossbeam_channel::Sender;
use tracing::{debug, info, info_span, warn};

use crate::annotate::Annotator;
use crate::config::Config;
use crate::error::{FlapError, WorkerError};
use crate::resolver::ResolverCache;
use crate::runner::CommandRunner;
use crate::worker::{Job, WorkerPool};

use super::collector::Collector;
use super::config::PipelineConfig;

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub lines_read: u64,
    pub lines_written: u64,
    pub lines_dropped: u64,
    /// Set when the lines came from a child process.
    pub exit_status: Option<ExitStatus>,
}

/// Owns the dispatcher, worker pool and collector for one run.
pub struct Pipeline {
    config: PipelineConfig,
    cache: Arc<ResolverCache>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig, cache: Arc<ResolverCache>) -> Self {
        Self { config, cache }
    }

    /// Production constructor: builds the resolver described by `config`.
    pub fn from_config(config: &Config) -> Self {
        let cache = Arc::new(ResolverCache::new(config.resolver.build()));
        Self::new(PipelineConfig::from_config(config), cache)
    }

    /// Runs `program` and streams its annotated stdout into `out`.
    ///
    /// A non-zero exit of the child is reported only after all of its
    /// output has been written.
    pub fn run<S, W>(&self, program: &str, args: &[S], out: W) -> Result<RunSummary, FlapError>
    where
        S: AsRef<str>,
        W: Write,
    {
        let _span = info_span!("run", program).entered();

        let (runner, lines) = CommandRunner::spawn(program, args)?;
        let processed = self.process(lines, out);

        let status = runner.wait();
        let mut summary = processed?;
        summary.exit_status = Some(status?);

        info!(
            lines_read = summary.lines_read,
            lines_written = summary.lines_written,
            "command finished"
        );
        Ok(summary)
    }

    /// Pushes `lines` through the worker pool into `out` until `lines` is
    /// exhausted and every result has been written.
    pub fn process<I, W>(&self, lines: I, out: W) -> Result<RunSummary, FlapError>
    where
        I: Iterator<Item = Vec<u8>> + Send,
        W: Write,
    {
        let mut pool = WorkerPool::new(
            Annotator::new(Arc::clone(&self.cache)),
            self.config.worker_count,
            self.config.queue_capacity,
        )?;
        let submitter = pool.submitter()?;
        // From here on the dispatcher holds the only job sender.
        pool.close();

        let mut collector = Collector::new(out, self.config.ordered_output);

        let lines_read = thread::scope(|scope| -> Result<u64, WorkerError> {
            let dispatcher = thread::Builder::new()
                .name("flap-dispatcher".to_string())
                .spawn_scoped(scope, move || dispatch(lines, submitter))
                .map_err(|e| WorkerError::SpawnFailed(e.to_string()))?;

            // Disconnects once every worker has exited.
            for result in pool.results().iter() {
                collector.accept(result);
            }

            dispatcher.join().map_err(|_| WorkerError::DispatcherPanicked)
        })?;

        pool.wait();

        let stats = collector.finish().map_err(FlapError::Output)?;
        debug!(
            lines_read,
            written = stats.written,
            dropped = stats.dropped,
            "pipeline drained"
        );

        Ok(RunSummary {
            lines_read,
            lines_written: stats.written,
            lines_dropped: stats.dropped,
            exit_status: None,
        })
    }
}

/// Feeds lines into the job queue in the order they are read. Dropping
/// `submitter` on return closes the queue.
fn dispatch<I>(lines: I, submitter: Sender<Job>) -> u64
where
    I: Iterator<Item = Vec<u8>>,
{
    let mut seq = 0u64;
    for line in lines {
        if submitter.send(Job::new(seq, line)).is_err() {
            warn!("Job queue closed early, stopping dispatch at line {}", seq);
            break;
        }
        seq += 1;
    }

    debug!("Dispatched {} lines", seq);
    seq
}
