use std::process::{Command, Stdio};

use log::debug;

use super::Resolve;
use crate::error::ResolveError;

pub const DEFAULT_RESOLVER_PROGRAM: &str = "sudo";
pub const DEFAULT_RESOLVER_SCRIPT: &str = "./utils/rlink.sh";

/// Resolves by running `<program> [args...] <pid> <fd>` and reading the path
/// from its standard output.
#[derive(Debug, Clone)]
pub struct CommandResolver {
    program: String,
    args: Vec<String>,
}

impl CommandResolver {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Default for CommandResolver {
    fn default() -> Self {
        Self::new(
            DEFAULT_RESOLVER_PROGRAM,
            vec![DEFAULT_RESOLVER_SCRIPT.to_string()],
        )
    }
}

impl Resolve for CommandResolver {
    fn resolve(&self, pid: &str, fd: &str) -> Result<String, ResolveError> {
        debug!("Running resolver {} for ({}, {})", self.program, pid, fd);

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(pid)
            .arg(fd)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| ResolveError::Spawn {
                program: self.program.clone(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(ResolveError::Failed {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
