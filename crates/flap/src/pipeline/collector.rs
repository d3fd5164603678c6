use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::io::Write;

use log::error;

use crate::worker::JobResult;

/// Counters reported once the collector has drained everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectStats {
    pub written: u64,
    pub dropped: u64,
}

/// Writes worker results to the program output, one line each.
///
/// By default results are written in arrival order, which is not the order
/// the lines were read in. In ordered mode results are held back in a
/// reorder buffer until every earlier line has been written or dropped.
/// The buffer is unbounded: a line stuck behind a slow resolution keeps every
/// later result in memory until it completes.
pub struct Collector<W: Write> {
    out: W,
    ordered: bool,
    pending: BinaryHeap<Reverse<(u64, Option<Vec<u8>>)>>,
    next_seq: u64,
    stats: CollectStats,
    error: Option<std::io::Error>,
}

impl<W: Write> Collector<W> {
    pub fn new(out: W, ordered: bool) -> Self {
        Self {
            out,
            ordered,
            pending: BinaryHeap::new(),
            next_seq: 0,
            stats: CollectStats::default(),
            error: None,
        }
    }

    pub fn accept(&mut self, result: JobResult) {
        if !self.ordered {
            self.emit(result.output);
            return;
        }

        self.pending.push(Reverse((result.seq, result.output)));
        while let Some(Reverse((seq, _))) = self.pending.peek() {
            if *seq != self.next_seq {
                break;
            }
            if let Some(Reverse((_, output))) = self.pending.pop() {
                self.emit(output);
            }
            self.next_seq += 1;
        }
    }

    /// Number of results held back waiting for an earlier line.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Writes anything still buffered, flushes, and reports the first write
    /// error if one occurred.
    pub fn finish(mut self) -> Result<CollectStats, std::io::Error> {
        while let Some(Reverse((_, output))) = self.pending.pop() {
            self.emit(output);
        }

        if self.error.is_none() {
            if let Err(e) = self.out.flush() {
                self.error = Some(e);
            }
        }

        match self.error {
            Some(e) => Err(e),
            None => Ok(self.stats),
        }
    }

    fn emit(&mut self, output: Option<Vec<u8>>) {
        let Some(line) = output else {
            self.stats.dropped += 1;
            return;
        };

        // Keep draining after a failed write so the workers and the child
        // are not left blocked on full queues.
        if self.error.is_some() {
            return;
        }

        let written = self
            .out
            .write_all(&line)
            .and_then(|()| self.out.write_all(b"\n"));
        match written {
            Ok(()) => self.stats.written += 1,
            Err(e) => {
                error!("Failed to write output: {}", e);
                self.error = Some(e);
            }
        }
    }
}
