//! Spawning the wrapped command and reading its standard output.

use std::io::{BufRead, BufReader, Read};
use std::process::{Child, ChildStdout, Command, ExitStatus, Stdio};

use log::{debug, warn};

use crate::error::RunnerError;

/// A running child process whose stdout is consumed through a [`LineSource`].
pub struct CommandRunner {
    program: String,
    child: Child,
}

impl CommandRunner {
    /// Starts `program` with `args`, piping its stdout back to us.
    ///
    /// Stdin and stderr are inherited so interactive tools and their
    /// diagnostics behave as if run directly.
    pub fn spawn<S: AsRef<str>>(
        program: &str,
        args: &[S],
    ) -> Result<(Self, LineSource<ChildStdout>), RunnerError> {
        let mut child = Command::new(program)
            .args(args.iter().map(|a| a.as_ref()))
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| RunnerError::Spawn {
                program: program.to_string(),
                source: e,
            })?;

        let Some(stdout) = child.stdout.take() else {
            // Reap the child before giving up on it.
            let _ = child.kill();
            let _ = child.wait();
            return Err(RunnerError::StdoutUnavailable {
                program: program.to_string(),
            });
        };

        debug!("Started '{}' as pid {}", program, child.id());

        Ok((
            Self {
                program: program.to_string(),
                child,
            },
            LineSource::new(stdout),
        ))
    }

    /// Blocks until the child exits. A non-zero status is an error.
    pub fn wait(mut self) -> Result<ExitStatus, RunnerError> {
        let status = self.child.wait().map_err(|e| RunnerError::Wait {
            program: self.program.clone(),
            source: e,
        })?;

        debug!("'{}' exited with {}", self.program, status);

        if !status.success() {
            return Err(RunnerError::Exited {
                program: self.program,
                status,
            });
        }

        Ok(status)
    }
}

/// Lazy sequence of the lines of a byte stream.
///
/// Lines are split on `\n`, and a `\r` left at the end of a line is dropped.
/// The bytes are otherwise passed on untouched. A read error ends the
/// sequence.
pub struct LineSource<R> {
    reader: BufReader<R>,
}

impl<R: Read> LineSource<R> {
    pub fn new(inner: R) -> Self {
        Self {
            reader: BufReader::new(inner),
        }
    }
}

impl<R: Read> Iterator for LineSource<R> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        let mut line = Vec::new();
        match self.reader.read_until(b'\n', &mut line) {
            Ok(0) => None,
            Ok(_) => {
                if line.last() == Some(&b'\n') {
                    line.pop();
                }
                if line.last() == Some(&b'\r') {
                    line.pop();
                }
                Some(line)
            }
            Err(e) => {
                warn!("Stopped reading command output: {}", e);
                None
            }
        }
    }
}
