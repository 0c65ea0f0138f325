use std::path::{Path, PathBuf};

use nr_sweep_core::prelude::ProcessError;

use crate::command::{FlagSet, SimCommand};

/// Runs one simulator program through the ns-3 wrapper, synchronously.
///
/// The call blocks until the external process exits; there is no timeout, a
/// hung simulation occupies its caller. The exit status is always surfaced
/// to the caller as a [`ProcessError`] outcome, never discarded.
#[derive(Debug, Clone)]
pub struct Invoker {
    binary: PathBuf,
    program: String,
}

impl Invoker {
    pub fn new(binary: impl Into<PathBuf>, program: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            program: program.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn invoke(&self, flags: FlagSet) -> Result<(), ProcessError> {
        let command = SimCommand::new(self.binary.clone(), self.program.clone(), flags);
        log::debug!("Invoking {command}");
        let status = command
            .to_std_command()
            .status()
            .map_err(ProcessError::Spawn)?;
        if status.success() {
            Ok(())
        } else {
            Err(ProcessError::Failed { status })
        }
    }
}
