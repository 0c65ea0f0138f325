use std::collections::VecDeque;
use std::path::PathBuf;

use indicatif::ProgressBar;
use nr_sweep_core::prelude::{DelegatedShutdownListener, ShutdownHandle};
use parking_lot::Mutex;

use crate::command::{FlagError, FlagSet};
use crate::grid::{Job, SchedulerVariant, SweepGrid};
use crate::invoke::Invoker;
use crate::output::OutputPathResolver;
use crate::report::{JobOutcome, JobReport, SweepReport};

/// Default worker count for parallel execution. Most of a worker's life is
/// spent blocked on a simulator process, so the pool is sized well above the
/// machine's core count.
pub const DEFAULT_WORKERS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Sequential,
    Parallel { workers: usize },
}

/// Everything a data-rate/GFBR sweep needs beyond the grid itself: which
/// program to run, the flags held constant across the sweep, and where
/// output lands. Built once by the sweep binary and passed by reference;
/// nothing here is ambient state.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub program: String,
    pub grid: SweepGrid,
    pub output_root: PathBuf,
    pub app_duration_ms: u32,
    pub ar_ue_count: u32,
    pub enable_ofdma: bool,
}

impl SweepConfig {
    /// The full simulator flag set for one job/variant pair.
    pub fn flags_for(&self, job: &Job, variant: SchedulerVariant) -> Result<FlagSet, FlagError> {
        let mut flags = FlagSet::new();
        flags.set("Datarate", job.data_rate_mbps)?;
        flags.set("appDuration", self.app_duration_ms)?;
        flags.set("arUeNum", self.ar_ue_count)?;
        flags.set("vrUeNum", job.vr_ue_count)?;
        flags.set("cgUeNum", job.cg_ue_count)?;
        flags.set("enableOfdma", self.enable_ofdma)?;
        flags.set("schedulerType", variant.as_flag_value())?;
        flags.set("CGgbrDL", job.gbr_dl_bps)?;
        Ok(flags)
    }
}

/// A job with both variant flag sets already built and schema-checked.
#[derive(Debug, Clone)]
struct PreparedJob {
    job: Job,
    runs: Vec<(SchedulerVariant, FlagSet)>,
}

/// Drives a sweep to completion, sequentially or on a bounded worker pool.
///
/// Both modes perform the identical per-job sequence: ensure the output
/// directory, invoke the DPP scheduler, invoke the QoS scheduler. Job
/// outcomes are collected, never raised, so the sweep always runs to the end
/// of the grid (or to a shutdown signal).
pub struct SweepExecutor {
    config: SweepConfig,
    invoker: Invoker,
    resolver: OutputPathResolver,
}

impl SweepExecutor {
    pub fn new(config: SweepConfig, binary: impl Into<PathBuf>) -> Self {
        let invoker = Invoker::new(binary, config.program.clone());
        let resolver = OutputPathResolver::new(config.output_root.clone());
        Self {
            config,
            invoker,
            resolver,
        }
    }

    pub fn resolver(&self) -> &OutputPathResolver {
        &self.resolver
    }

    pub fn total_jobs(&self) -> usize {
        self.config.grid.len()
    }

    /// Build and schema-check every invocation before any process runs, so
    /// a bad flag mapping aborts the sweep up front rather than mid-grid.
    fn prepare(&self) -> Result<Vec<PreparedJob>, FlagError> {
        self.config
            .grid
            .jobs()
            .into_iter()
            .map(|job| {
                let runs = SchedulerVariant::ALL
                    .iter()
                    .map(|&variant| Ok((variant, self.config.flags_for(&job, variant)?)))
                    .collect::<Result<Vec<_>, FlagError>>()?;
                Ok(PreparedJob { job, runs })
            })
            .collect()
    }

    pub fn run(
        &self,
        mode: ExecutionMode,
        shutdown: &ShutdownHandle,
        progress: Option<ProgressBar>,
    ) -> anyhow::Result<SweepReport> {
        let prepared = self.prepare()?;
        let total_jobs = prepared.len();
        log::info!(
            "Starting sweep of {total_jobs} jobs ({} invocations) with program '{}'",
            total_jobs * SchedulerVariant::ALL.len(),
            self.config.program
        );

        let reports = match mode {
            ExecutionMode::Sequential => {
                self.run_serial(prepared, shutdown.new_listener(), progress.as_ref())
            }
            ExecutionMode::Parallel { workers } => {
                self.run_pool(prepared, workers, shutdown, progress.as_ref())
            }
        };

        if let Some(progress) = progress {
            progress.finish_and_clear();
        }

        Ok(SweepReport { total_jobs, reports })
    }

    fn run_serial(
        &self,
        prepared: Vec<PreparedJob>,
        mut shutdown: DelegatedShutdownListener,
        progress: Option<&ProgressBar>,
    ) -> Vec<JobReport> {
        let mut reports = Vec::with_capacity(prepared.len());
        for prepared_job in &prepared {
            if shutdown.should_shutdown() {
                log::info!("Shutdown requested, stopping sweep");
                break;
            }
            reports.push(self.run_job(prepared_job));
            if let Some(progress) = progress {
                progress.inc(1);
            }
        }
        reports
    }

    fn run_pool(
        &self,
        prepared: Vec<PreparedJob>,
        workers: usize,
        shutdown: &ShutdownHandle,
        progress: Option<&ProgressBar>,
    ) -> Vec<JobReport> {
        let workers = workers.clamp(1, prepared.len().max(1));
        let queue = Mutex::new(VecDeque::from(prepared));
        let reports = Mutex::new(Vec::new());

        std::thread::scope(|scope| {
            for worker_index in 0..workers {
                let queue = &queue;
                let reports = &reports;
                let mut shutdown_listener = shutdown.new_listener();
                std::thread::Builder::new()
                    .name(format!("sweep-worker-{worker_index}"))
                    .spawn_scoped(scope, move || loop {
                        if shutdown_listener.should_shutdown() {
                            log::debug!("Worker {worker_index} stopping on shutdown signal");
                            break;
                        }
                        let next = queue.lock().pop_front();
                        let Some(prepared_job) = next else {
                            break;
                        };
                        let report = self.run_job(&prepared_job);
                        reports.lock().push(report);
                        if let Some(progress) = progress {
                            progress.inc(1);
                        }
                    })
                    .expect("Failed to spawn sweep worker thread");
            }
        });

        reports.into_inner()
    }

    /// Ensure the job's output directory, then run both scheduler variants
    /// in order. A directory failure skips the job's invocations; an
    /// invocation failure is recorded and the other variant still runs.
    fn run_job(&self, prepared_job: &PreparedJob) -> JobReport {
        let job = prepared_job.job;
        if let Err(e) = self.resolver.ensure_job_dir(&job) {
            log::error!("Skipping job [{job}]: {e}");
            return JobReport {
                job,
                outcome: JobOutcome::OutputUnavailable(e),
            };
        }

        let mut invocations = Vec::with_capacity(prepared_job.runs.len());
        for (variant, flags) in &prepared_job.runs {
            let result = self.invoker.invoke(flags.clone());
            match &result {
                Ok(()) => log::debug!("Completed {variant} for job [{job}]"),
                Err(e) => log::error!("{variant} for job [{job}] failed: {e}"),
            }
            invocations.push((*variant, result));
        }
        JobReport {
            job,
            outcome: JobOutcome::Ran { invocations },
        }
    }
}

