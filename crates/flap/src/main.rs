use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use log::info;

use flap::config::loader::validate_config;
use flap::config::ResolverConfig;
use flap::logging::{self, LogConfig};
use flap::{load_config, Config, FlapError, Pipeline, RunnerError};

/// Runs a command and rewrites its `@un_*[pid, fd]: ...` trace lines with the
/// path each descriptor points at.
///
/// Everything from COMMAND onward is passed to the child unchanged, so flap's
/// own options must come first.
#[derive(Parser, Debug)]
#[command(name = "flap", version, about)]
struct Cli {
    /// JSON configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Number of annotation workers
    #[arg(short = 'w', long)]
    workers: Option<usize>,

    /// Capacity of the job and result queues
    #[arg(long)]
    queue_capacity: Option<usize>,

    /// Program used to resolve a pid and fd into a path
    #[arg(long, value_name = "PROGRAM")]
    resolver: Option<String>,

    /// Leading argument for the resolver program (repeatable)
    #[arg(long = "resolver-arg", value_name = "ARG", allow_hyphen_values = true)]
    resolver_args: Vec<String>,

    /// Resolve descriptors by reading /proc instead of running a program
    #[arg(long, conflicts_with_all = ["resolver", "resolver_args"])]
    procfs: bool,

    /// Write lines in the order the command printed them
    #[arg(long)]
    ordered: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Command to run, followed by its arguments
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    command: Vec<String>,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    logging::init(LogConfig::from_verbosity(cli.verbose).with_env_overrides());

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("flap: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), FlapError> {
    let Some((program, args)) = cli.command.split_first() else {
        eprintln!("Usage: flap [OPTIONS] <command> [args...]");
        return Err(RunnerError::MissingCommand.into());
    };

    let config = build_config(&cli)?;
    info!(
        "Running '{}' with {} workers (ordered output: {})",
        program, config.worker_count, config.ordered_output
    );

    let pipeline = Pipeline::from_config(&config);
    let stdout = std::io::stdout();
    let summary = pipeline.run(program, args, stdout.lock())?;

    info!(
        "Done: {} lines read, {} written, {} dropped",
        summary.lines_read, summary.lines_written, summary.lines_dropped
    );
    Ok(())
}

fn build_config(cli: &Cli) -> Result<Config, FlapError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };

    if let Some(workers) = cli.workers {
        config.worker_count = workers;
    }
    if let Some(capacity) = cli.queue_capacity {
        config.queue_capacity = capacity;
    }
    if cli.ordered {
        config.ordered_output = true;
    }

    if cli.procfs {
        config.resolver = ResolverConfig::Procfs {
            root: PathBuf::from(flap::resolver::procfs::DEFAULT_PROC_ROOT),
        };
    } else if let Some(program) = &cli.resolver {
        config.resolver = ResolverConfig::Command {
            program: program.clone(),
            args: cli.resolver_args.clone(),
        };
    } else if !cli.resolver_args.is_empty() {
        if let ResolverConfig::Command { args, .. } = &mut config.resolver {
            *args = cli.resolver_args.clone();
        }
    }

    validate_config(&config)?;
    Ok(config)
}
