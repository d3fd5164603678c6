use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlapError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Command error: {0}")]
    Runner(#[from] RunnerError),

    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    #[error("Failed to write output: {0}")]
    Output(#[source] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },
}

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("no command supplied")]
    MissingCommand,

    #[error("error starting command '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("error getting stdout pipe of '{program}'")]
    StdoutUnavailable { program: String },

    #[error("error waiting for command '{program}': {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command '{program}' failed: {status}")]
    Exited { program: String, status: ExitStatus },
}

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Failed to spawn worker: {0}")]
    SpawnFailed(String),

    #[error("Worker channel closed unexpectedly")]
    ChannelClosed,

    #[error("Invalid worker count: {0}")]
    InvalidWorkerCount(usize),

    #[error("Dispatcher thread panicked")]
    DispatcherPanicked,
}

/// Failure of a single `(pid, fd)` lookup. Never surfaced past the cache.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("failed to run resolver '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("resolver '{program}' exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("failed to read link '{path}': {source}")]
    ReadLink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Other(String),
}
