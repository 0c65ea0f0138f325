use std::path::PathBuf;

use clap::Parser;

use crate::executor::{ExecutionMode, DEFAULT_WORKERS};

/// Command line for sweep binaries.
///
/// The axes and fixed simulation parameters are compiled into each sweep
/// binary; the CLI only controls how the sweep is dispatched and where the
/// pieces live on this machine.
#[derive(Parser, Debug)]
#[command(about, long_about = None)]
pub struct SweepCli {
    /// Path to the ns-3 wrapper script, overriding discovery via ./ns3,
    /// PATH, or the NS3_SWEEP_PATH environment variable
    #[clap(long)]
    pub ns3: Option<PathBuf>,

    /// Run jobs one at a time in grid order instead of on the worker pool
    #[clap(long, default_value = "false")]
    pub sequential: bool,

    /// Worker pool size for parallel execution. Workers spend nearly all
    /// their time blocked on simulator processes, so this can exceed the
    /// core count by a wide margin.
    #[clap(long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Root directory for sweep output, overriding the sweep's default
    #[clap(long)]
    pub output_root: Option<PathBuf>,

    /// Do not show a progress bar on the CLI.
    ///
    /// This is recommended for CI/CD environments where the progress bar isn't
    /// being looked at by anyone and is just adding noise to the logs.
    #[clap(long, default_value = "false")]
    pub no_progress: bool,
}

impl SweepCli {
    pub fn execution_mode(&self) -> ExecutionMode {
        if self.sequential {
            ExecutionMode::Sequential
        } else {
            ExecutionMode::Parallel {
                workers: self.workers,
            }
        }
    }
}

/// Command line for single-scenario binaries.
#[derive(Parser, Debug)]
#[command(about, long_about = None)]
pub struct ScenarioCli {
    /// Path to the ns-3 wrapper script, overriding discovery via ./ns3,
    /// PATH, or the NS3_SWEEP_PATH environment variable
    #[clap(long)]
    pub ns3: Option<PathBuf>,

    /// Root directory for scenario output
    #[clap(long, default_value = "./results")]
    pub output_root: PathBuf,

    /// Name of the scenario directory created under the UE-count directory
    #[clap(long, default_value = "test_")]
    pub scenario_name: String,
}
