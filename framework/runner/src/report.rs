use nr_sweep_core::prelude::{FilesystemError, ProcessError};
use tabled::{Table, Tabled};

use crate::grid::{Job, SchedulerVariant};

/// What happened to one job.
#[derive(Debug)]
pub enum JobOutcome {
    /// The output directory was available and both variants were invoked.
    /// Individual invocations may still have failed.
    Ran {
        invocations: Vec<(SchedulerVariant, Result<(), ProcessError>)>,
    },
    /// The output directory could not be created; no process was launched
    /// for this job.
    OutputUnavailable(FilesystemError),
}

#[derive(Debug)]
pub struct JobReport {
    pub job: Job,
    pub outcome: JobOutcome,
}

impl JobReport {
    pub fn is_success(&self) -> bool {
        match &self.outcome {
            JobOutcome::Ran { invocations } => invocations.iter().all(|(_, r)| r.is_ok()),
            JobOutcome::OutputUnavailable(_) => false,
        }
    }
}

/// Everything the executor collected over one sweep.
///
/// `total_jobs` is the grid size; `reports` can be shorter when the sweep
/// was shut down before draining the grid.
#[derive(Debug)]
pub struct SweepReport {
    pub total_jobs: usize,
    pub reports: Vec<JobReport>,
}

#[derive(Tabled)]
pub struct FailureRow {
    #[tabled(rename = "Datarate (Mbps)")]
    pub data_rate_mbps: u32,
    #[tabled(rename = "CGgbrDL (Mbps)")]
    pub gbr_dl_mbps: u64,
    #[tabled(rename = "CG UEs")]
    pub cg_ue_count: u32,
    #[tabled(rename = "VR UEs")]
    pub vr_ue_count: u32,
    #[tabled(rename = "Scheduler")]
    pub scheduler: String,
    #[tabled(rename = "Error")]
    pub error: String,
}

impl SweepReport {
    pub fn completed(&self) -> usize {
        self.reports.len()
    }

    pub fn skipped(&self) -> usize {
        self.total_jobs - self.reports.len()
    }

    pub fn successes(&self) -> usize {
        self.reports.iter().filter(|r| r.is_success()).count()
    }

    pub fn is_clean(&self) -> bool {
        self.skipped() == 0 && self.successes() == self.total_jobs
    }

    /// One row per failed invocation (or per job whose directory could not
    /// be created), naming the parameter combination that needs re-running.
    pub fn failures(&self) -> Vec<FailureRow> {
        let mut rows = Vec::new();
        for report in &self.reports {
            let job = &report.job;
            match &report.outcome {
                JobOutcome::OutputUnavailable(e) => rows.push(FailureRow {
                    data_rate_mbps: job.data_rate_mbps,
                    gbr_dl_mbps: job.gbr_dl_bps / 1_000_000,
                    cg_ue_count: job.cg_ue_count,
                    vr_ue_count: job.vr_ue_count,
                    scheduler: "-".to_string(),
                    error: e.to_string(),
                }),
                JobOutcome::Ran { invocations } => {
                    for (variant, result) in invocations {
                        if let Err(e) = result {
                            rows.push(FailureRow {
                                data_rate_mbps: job.data_rate_mbps,
                                gbr_dl_mbps: job.gbr_dl_bps / 1_000_000,
                                cg_ue_count: job.cg_ue_count,
                                vr_ue_count: job.vr_ue_count,
                                scheduler: variant.to_string(),
                                error: e.to_string(),
                            });
                        }
                    }
                }
            }
        }
        rows
    }

    /// Render the failure summary, or `None` when every invocation passed.
    pub fn failure_table(&self) -> Option<String> {
        let failures = self.failures();
        if failures.is_empty() {
            None
        } else {
            Some(Table::new(failures).to_string())
        }
    }
}
