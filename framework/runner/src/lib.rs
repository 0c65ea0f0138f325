mod cli;
mod command;
mod executor;
mod grid;
mod init;
mod invoke;
mod ns3;
mod output;
mod progress;
mod report;
mod run;
mod scenario;
mod shutdown;

pub mod prelude {
    pub use crate::cli::{ScenarioCli, SweepCli};
    pub use crate::command::{FlagError, FlagSet, SimCommand, SIM_FLAG_SCHEMA};
    pub use crate::executor::{ExecutionMode, SweepConfig, SweepExecutor, DEFAULT_WORKERS};
    pub use crate::grid::{Axis, Job, SchedulerVariant, SweepGrid};
    pub use crate::init::init;
    pub use crate::invoke::Invoker;
    pub use crate::ns3::{ns3_path, NS3_PATH_ENV};
    pub use crate::output::OutputPathResolver;
    pub use crate::report::{FailureRow, JobOutcome, JobReport, SweepReport};
    pub use crate::run::run_sweep;
    pub use crate::scenario::{
        run_scenario, validate_profiles, RadioParams, RunMetadata, ScenarioConfig,
        ScenarioOutcome, TrafficProfile, TrafficType,
    };
    pub use nr_sweep_core::prelude::*;
}
