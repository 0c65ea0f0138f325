use indicatif::{ProgressBar, ProgressStyle};

/// A job-count progress bar for a sweep. Workers tick it once per completed
/// job; the executor clears it when the sweep drains.
pub(crate) fn sweep_progress_bar(total_jobs: u64) -> ProgressBar {
    let pb = ProgressBar::new(total_jobs);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{wide_bar:.cyan/blue}] {pos}/{len} jobs [{elapsed_precise}]",
        )
        .expect("Failed to set progress style")
        .progress_chars("#>-"),
    );
    pb
}
