use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::resolver::command::{DEFAULT_RESOLVER_PROGRAM, DEFAULT_RESOLVER_SCRIPT};
use crate::resolver::procfs::DEFAULT_PROC_ROOT;
use crate::resolver::{CommandResolver, ProcfsResolver, Resolve};
use crate::worker::pool::{DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKER_COUNT};

pub const CONFIG_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    #[serde(default)]
    pub ordered_output: bool,
    #[serde(default)]
    pub resolver: ResolverConfig,
}

fn default_version() -> String {
    CONFIG_VERSION.to_string()
}

fn default_worker_count() -> usize {
    DEFAULT_WORKER_COUNT
}

fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            worker_count: DEFAULT_WORKER_COUNT,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            ordered_output: false,
            resolver: ResolverConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ResolverConfig {
    /// Run an external program with `pid` and `fd` appended to `args`.
    Command {
        #[serde(default = "default_resolver_program")]
        program: String,
        #[serde(default = "default_resolver_args")]
        args: Vec<String>,
    },
    /// Read `<root>/<pid>/fd/<fd>` directly.
    Procfs {
        #[serde(default = "default_proc_root")]
        root: PathBuf,
    },
}

fn default_resolver_program() -> String {
    DEFAULT_RESOLVER_PROGRAM.to_string()
}

fn default_resolver_args() -> Vec<String> {
    vec![DEFAULT_RESOLVER_SCRIPT.to_string()]
}

fn default_proc_root() -> PathBuf {
    PathBuf::from(DEFAULT_PROC_ROOT)
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::Command {
            program: default_resolver_program(),
            args: default_resolver_args(),
        }
    }
}

impl ResolverConfig {
    pub fn build(&self) -> Arc<dyn Resolve> {
        match self {
            Self::Command { program, args } => {
                Arc::new(CommandResolver::new(program.clone(), args.clone()))
            }
            Self::Procfs { root } => Arc::new(ProcfsResolver::new(root.clone())),
        }
    }
}
