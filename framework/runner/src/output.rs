use std::fs;
use std::path::{Path, PathBuf};

use nr_sweep_core::prelude::FilesystemError;

use crate::grid::{Job, SchedulerVariant};

/// Maps jobs to output directories under a fixed root.
///
/// The directory is a function of the UE counts only, so every data-rate and
/// GFBR combination for the same UE mix lands in one directory. Result files
/// carry the remaining parameters in their names (see
/// [`OutputPathResolver::result_file_name`]) so runs never overwrite each
/// other.
#[derive(Debug, Clone)]
pub struct OutputPathResolver {
    root: PathBuf,
}

impl OutputPathResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The directory for a job, derived from its UE counts alone.
    pub fn job_dir(&self, job: &Job) -> PathBuf {
        self.root
            .join(format!("{}_CG_{}_VR", job.cg_ue_count, job.vr_ue_count))
    }

    /// Create the job's directory if it does not exist yet.
    ///
    /// Safe to call from any number of workers at once: `create_dir_all`
    /// succeeds when another worker created the directory first. Existing
    /// directory contents are never touched.
    pub fn ensure_job_dir(&self, job: &Job) -> Result<PathBuf, FilesystemError> {
        let dir = self.job_dir(job);
        fs::create_dir_all(&dir).map_err(|source| FilesystemError {
            path: dir.clone(),
            source,
        })?;
        Ok(dir)
    }

    /// The fully parameterised result file name for one invocation.
    ///
    /// Encodes every sweep parameter plus the scheduler variant, because the
    /// directory itself only distinguishes UE counts.
    pub fn result_file_name(job: &Job, variant: SchedulerVariant) -> String {
        format!(
            "res{}_{}_DR_{}_GFBR_{}_CG_{}_VR.txt",
            variant.as_flag_value(),
            job.data_rate_mbps,
            job.gbr_dl_bps / 1_000_000,
            job.cg_ue_count,
            job.vr_ue_count
        )
    }

    pub fn result_path(&self, job: &Job, variant: SchedulerVariant) -> PathBuf {
        self.job_dir(job).join(Self::result_file_name(job, variant))
    }
}
