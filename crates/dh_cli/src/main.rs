// crates/dh_cli/src/main.rs
//
// Wires up: exit codes, typed error mapping, config, tracing, dispatch.

mod args;
mod commands;
mod config;

mod exitcodes {
    pub const OK: u8 = 0;
    /// Bad request, bad name, bad JSON, unknown coalition member.
    pub const VALIDATION: u8 = 2;
    /// Missing simulation or name already taken.
    pub const NOT_FOUND: u8 = 3;
    pub const IO: u8 = 4;
    /// Valid input that the rules cannot allocate (threshold excludes everyone).
    pub const RULE: u8 = 5;
    /// The allocator refused input that passed validation; a bug.
    pub const INTERNAL: u8 = 6;
}

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;

use dh_algo::CoalitionError;
use dh_io::{IoError, ServiceError};
use dh_pipeline::PipelineError;
use dh_report::ReportError;

use args::Args;
use config::{Config, ConfigError};

/// Central error type for CLI → exit-code mapping.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Reading or decoding the request document.
    #[error(transparent)]
    Input(#[from] IoError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Coalition(#[from] CoalitionError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("cannot write {}: {source}", .path.display())]
    Output { path: PathBuf, source: std::io::Error },
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        use exitcodes::*;
        match self {
            CliError::Config(ConfigError::Parse { .. }) => VALIDATION,
            CliError::Config(_) => IO,
            CliError::Input(IoError::Json { .. }) => VALIDATION,
            CliError::Input(_) => IO,
            CliError::Pipeline(e) => pipeline_exit_code(e),
            CliError::Service(e) => match e {
                ServiceError::InvalidName(_) => VALIDATION,
                ServiceError::DuplicateName(_) | ServiceError::NotFound(_) => NOT_FOUND,
                ServiceError::Pipeline(p) => pipeline_exit_code(p),
                ServiceError::Store(_) => IO,
            },
            CliError::Coalition(_) => VALIDATION,
            CliError::Report(_) | CliError::Output { .. } => IO,
        }
    }

    /// Stable code printed next to the message when one exists.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            CliError::Pipeline(e) => Some(e.code()),
            CliError::Service(e) => Some(e.code()),
            _ => None,
        }
    }
}

fn pipeline_exit_code(e: &PipelineError) -> u8 {
    match e {
        PipelineError::InvalidInput(_) => exitcodes::VALIDATION,
        PipelineError::ThresholdExclusion { .. } => exitcodes::RULE,
        PipelineError::Allocate(_) => exitcodes::INTERNAL,
    }
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(default_filter: &str) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .finish();

    // Already set only happens in tests that call main twice; keep the first.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn report(e: &CliError) -> ExitCode {
    match e.code() {
        Some(code) => eprintln!("dhondt: error [{code}]: {e}"),
        None => eprintln!("dhondt: error: {e}"),
    }
    ExitCode::from(e.exit_code())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let cfg = match Config::load(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => return report(&CliError::from(e)),
    };
    init_tracing(cfg.log_filter(args.verbose));
    tracing::debug!(?args, "starting");

    match commands::run(&args, &cfg) {
        Ok(()) => ExitCode::from(exitcodes::OK),
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            report(&e)
        }
    }
}
