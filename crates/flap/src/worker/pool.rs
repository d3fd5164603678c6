use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender};
use tracing::{debug, debug_span, error, info, info_span, trace};

use crate::annotate::Annotator;
use crate::error::WorkerError;
use crate::worker::job::{Job, JobResult};

pub const DEFAULT_WORKER_COUNT: usize = 10;
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Fixed set of annotation workers sharing one job queue and one result queue.
///
/// The result queue disconnects once every worker has exited, which happens
/// after the job queue is closed and drained.
pub struct WorkerPool {
    job_sender: Option<Sender<Job>>,
    result_receiver: Receiver<JobResult>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    pub fn new(
        annotator: Annotator,
        worker_count: usize,
        queue_capacity: usize,
    ) -> Result<Self, WorkerError> {
        if worker_count == 0 {
            return Err(WorkerError::InvalidWorkerCount(worker_count));
        }

        let (job_sender, job_receiver) = bounded::<Job>(queue_capacity);
        let (result_sender, result_receiver) = bounded::<JobResult>(queue_capacity);

        let mut workers = Vec::with_capacity(worker_count);

        for worker_id in 0..worker_count {
            let job_rx = job_receiver.clone();
            let result_tx = result_sender.clone();
            let worker_annotator = annotator.clone();

            let handle = thread::Builder::new()
                .name(format!("flap-worker-{}", worker_id))
                .spawn(move || run_worker(worker_id, job_rx, result_tx, worker_annotator))
                .map_err(|e| WorkerError::SpawnFailed(e.to_string()))?;

            workers.push(handle);
        }

        info!("Started {} workers", worker_count);

        Ok(Self {
            job_sender: Some(job_sender),
            result_receiver,
            workers,
        })
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Returns a handle for feeding jobs from another thread.
    pub fn submitter(&self) -> Result<Sender<Job>, WorkerError> {
        self.job_sender.clone().ok_or(WorkerError::ChannelClosed)
    }

    /// Blocks while the job queue is full.
    pub fn submit(&self, job: Job) -> Result<(), WorkerError> {
        self.job_sender
            .as_ref()
            .ok_or(WorkerError::ChannelClosed)?
            .send(job)
            .map_err(|_| WorkerError::ChannelClosed)
    }

    /// Drops the pool's own job sender. Workers exit once every submitter
    /// handle is gone and the queue is empty.
    pub fn close(&mut self) {
        self.job_sender = None;
    }

    pub fn results(&self) -> &Receiver<JobResult> {
        &self.result_receiver
    }

    /// Blocks until a result arrives; `None` once all workers have exited.
    pub fn recv_result(&self) -> Option<JobResult> {
        self.result_receiver.recv().ok()
    }

    /// Closes the job queue and joins every worker.
    ///
    /// Results must be drained first, otherwise workers stay blocked on a full
    /// result queue.
    pub fn wait(mut self) {
        self.close();

        for (i, worker) in self.workers.into_iter().enumerate() {
            if let Err(e) = worker.join() {
                error!("Worker {} panicked: {:?}", i, e);
            } else {
                debug!("Worker {} finished", i);
            }
        }

        info!("All workers have stopped");
    }
}

fn run_worker(
    worker_id: usize,
    job_receiver: Receiver<Job>,
    result_sender: Sender<JobResult>,
    annotator: Annotator,
) {
    let _span = info_span!("worker", worker_id).entered();
    debug!("worker started");

    while let Ok(job) = job_receiver.recv() {
        let _job_span = debug_span!("job", seq = job.seq).entered();
        trace!(line = %String::from_utf8_lossy(&job.line), "processing line");

        let result = match annotator.annotate(&job.line) {
            Some(output) => JobResult::emitted(job, output),
            None => {
                debug!("dropped malformed tag");
                JobResult::dropped(job)
            }
        };

        if let Err(e) = result_sender.send(result) {
            error!(error = %e, "failed to send result");
            break;
        }
    }

    debug!("worker stopped");
}
