use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// A traffic profile that cannot be turned into simulator arguments.
///
/// Raised before any external process is launched, so a bad scenario
/// definition never produces partial filesystem output.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("UE {ue_index}: GBR profile is missing required field '{field}'")]
pub struct ValidationError {
    pub ue_index: usize,
    pub field: &'static str,
}

/// An output directory could not be created or written.
#[derive(Debug, Error)]
#[error("failed to create output directory '{}'", path.display())]
pub struct FilesystemError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// A simulator invocation that did not run to a successful exit.
///
/// These are collected per invocation rather than raised, so one failed
/// parameter combination never aborts the rest of a sweep.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to start simulator process: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("simulator process exited with {status}")]
    Failed { status: ExitStatus },
}
