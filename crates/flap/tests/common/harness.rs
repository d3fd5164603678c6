//! Test harness for isolated test execution.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use flap::config::{Config, ResolverConfig};
use flap::{CommandResolver, Pipeline, PipelineConfig, ResolverCache};

/// Temp directory with a resolver script and its call log.
pub struct TestHarness {
    temp_dir: TempDir,
    /// Shell script answering `<pid> <fd>` lookups.
    pub resolver_script: PathBuf,
    /// One line per resolver invocation: `<pid> <fd>`.
    pub call_log: PathBuf,
}

impl TestHarness {
    /// Resolver knowing `(123, 4) -> /var/log/app.log` and `(5, 6) -> /x`,
    /// sleeping a second for `(1, 1)` and failing for anything else.
    pub fn new() -> Self {
        Self::with_mappings(&[
            ("123", "4", "/var/log/app.log"),
            ("5", "6", "/x"),
            ("1", "1", "/slow"),
        ])
    }

    pub fn with_mappings(mappings: &[(&str, &str, &str)]) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let resolver_script = temp_dir.path().join("rlink.sh");
        let call_log = temp_dir.path().join("calls.log");

        let mut cases = String::new();
        for (pid, fd, path) in mappings {
            let delay = if *path == "/slow" { "sleep 1; " } else { "" };
            cases.push_str(&format!("  {}:{}) {}echo '{}' ;;\n", pid, fd, delay, path));
        }

        let script = format!(
            "#!/bin/sh\necho \"$1 $2\" >> '{}'\ncase \"$1:$2\" in\n{}  *) exit 1 ;;\nesac\n",
            call_log.display(),
            cases
        );
        std::fs::write(&resolver_script, script).expect("Failed to write resolver script");

        Self {
            temp_dir,
            resolver_script,
            call_log,
        }
    }

    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Resolver config running the script through `sh`.
    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig::Command {
            program: "sh".to_string(),
            args: vec![self.resolver_script.display().to_string()],
        }
    }

    pub fn config(&self, worker_count: usize, ordered_output: bool) -> Config {
        Config {
            worker_count,
            ordered_output,
            resolver: self.resolver_config(),
            ..Config::default()
        }
    }

    pub fn pipeline(&self, worker_count: usize, ordered_output: bool) -> Pipeline {
        let resolver = CommandResolver::new(
            "sh",
            vec![self.resolver_script.display().to_string()],
        );
        let cache = Arc::new(ResolverCache::new(Arc::new(resolver)));
        Pipeline::new(
            PipelineConfig {
                worker_count,
                ordered_output,
                ..PipelineConfig::default()
            },
            cache,
        )
    }

    /// Writes `config` as JSON and returns its path.
    pub fn write_config(&self, config: &Config) -> PathBuf {
        let path = self.temp_dir.path().join("flap.json");
        let json = serde_json::to_string_pretty(config).expect("Failed to serialize config");
        std::fs::write(&path, json).expect("Failed to write config file");
        path
    }

    /// Writes the lines a child should print and returns a `sh` script
    /// printing them with `cat`.
    pub fn write_child_output(&self, lines: &[&str]) -> PathBuf {
        let path = self.temp_dir.path().join("child_output.txt");
        let mut content = lines.join("\n");
        content.push('\n');
        std::fs::write(&path, content).expect("Failed to write child output");
        path
    }

    /// Resolver invocations recorded so far.
    pub fn resolver_calls(&self) -> Vec<String> {
        std::fs::read_to_string(&self.call_log)
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}
