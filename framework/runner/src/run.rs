use anyhow::Context;

use crate::cli::SweepCli;
use crate::executor::{SweepConfig, SweepExecutor};
use crate::ns3::ns3_path;
use crate::progress::sweep_progress_bar;
use crate::report::SweepReport;
use crate::shutdown::start_shutdown_listener;

/// Run a full sweep: resolve the simulator binary, wire up Ctrl-C handling
/// and progress, dispatch every job, and print the failure summary.
///
/// The returned report is the caller's to act on; a sweep with failed
/// invocations still returns `Ok` so the binary can choose its exit code.
pub fn run_sweep(mut config: SweepConfig, cli: &SweepCli) -> anyhow::Result<SweepReport> {
    if let Some(output_root) = &cli.output_root {
        config.output_root = output_root.clone();
    }
    let binary = match &cli.ns3 {
        Some(path) => path.clone(),
        None => ns3_path()?,
    };

    let runtime = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    let shutdown_handle = start_shutdown_listener(&runtime)?;

    let executor = SweepExecutor::new(config, binary);
    let total_jobs = executor.total_jobs();
    let progress = (!cli.no_progress).then(|| sweep_progress_bar(total_jobs as u64));

    let report = executor.run(cli.execution_mode(), &shutdown_handle, progress)?;

    log::info!(
        "Sweep finished: {} of {} jobs completed, {} fully successful",
        report.completed(),
        report.total_jobs,
        report.successes()
    );
    if let Some(table) = report.failure_table() {
        println!("Failed parameter combinations:\n{table}");
    }

    Ok(report)
}
