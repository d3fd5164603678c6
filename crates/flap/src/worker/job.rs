/// One raw line of child output waiting for a worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Position of the line in the child's output, starting at 0.
    pub seq: u64,
    /// Line bytes without the terminator.
    pub line: Vec<u8>,
}

impl Job {
    pub fn new(seq: u64, line: Vec<u8>) -> Self {
        Self { seq, line }
    }
}

/// What a worker made of one [`Job`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobResult {
    pub seq: u64,
    pub original: Vec<u8>,
    /// `None` when the line was dropped.
    pub output: Option<Vec<u8>>,
}

impl JobResult {
    pub fn emitted(job: Job, output: Vec<u8>) -> Self {
        Self {
            seq: job.seq,
            original: job.line,
            output: Some(output),
        }
    }

    pub fn dropped(job: Job) -> Self {
        Self {
            seq: job.seq,
            original: job.line,
            output: None,
        }
    }

    pub fn is_dropped(&self) -> bool {
        self.output.is_none()
    }
}
