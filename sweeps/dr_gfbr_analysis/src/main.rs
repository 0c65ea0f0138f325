use nr_sweep_runner::prelude::*;

/// The reference study grid: 9 data rates x 9 GFBR thresholds x 4 CG UE
/// counts x 5 VR UE counts = 1620 jobs, two scheduler runs each.
fn study_config() -> SweepConfig {
    SweepConfig {
        program: "cttc-nr-traffic-3gpp-xr-qos-sched_sergi".to_string(),
        grid: SweepGrid::new(
            Axis::new("Datarate", [1, 5, 10, 15, 20, 25, 30, 35, 40]),
            Axis::new(
                "CGgbrDL",
                [
                    1_000_000u64,
                    5_000_000,
                    10_000_000,
                    15_000_000,
                    20_000_000,
                    25_000_000,
                    30_000_000,
                    35_000_000,
                    40_000_000,
                ],
            ),
            Axis::new("cgUeNum", [1, 2, 3, 4]),
            Axis::new("vrUeNum", [0, 1, 2, 3, 4]),
        ),
        output_root: "sim_DR_GFBR_analysis".into(),
        app_duration_ms: 10_000,
        ar_ue_count: 0,
        enable_ofdma: true,
    }
}

fn main() -> anyhow::Result<()> {
    let cli: SweepCli = init();

    let report = run_sweep(study_config(), &cli)?;
    if !report.is_clean() {
        log::warn!(
            "{} of {} jobs need re-running",
            report.total_jobs - report.successes(),
            report.total_jobs
        );
        std::process::exit(1);
    }

    Ok(())
}
