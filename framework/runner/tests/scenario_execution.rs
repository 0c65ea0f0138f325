#![cfg(unix)]

use std::os::unix::fs::PermissionsExt as _;
use std::path::{Path, PathBuf};

use nr_sweep_runner::prelude::*;

fn fake_ns3(dir: &Path, log: &Path) -> PathBuf {
    let path = dir.join("ns3");
    let script = format!("#!/bin/sh\necho \"$2\" >> \"{}\"\nexit 0\n", log.display());
    std::fs::write(&path, script).expect("failed to write fake ns3");
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

fn config(output_root: &Path) -> ScenarioConfig {
    ScenarioConfig {
        program: "cttc-nr-simple-qos".to_string(),
        scenario_name: "saturation_check".to_string(),
        output_root: output_root.to_path_buf(),
        profiles: vec![
            TrafficProfile::gbr("GBR_CONV_VOICE", 5_000_000, 30_000_000, 3000, 1000),
            TrafficProfile::ngbr("NGBR_LOW_LAT_EMBB", 3000, 1000),
        ],
        radio: RadioParams::default(),
        sim_time_s: 3,
        gnb_count: 1,
        logging: false,
        priority_traffic_scenario: 0,
    }
}

#[test]
fn scenario_runs_once_and_writes_metadata_sidecar() {
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let log = tmp.path().join("invocations.log");
    let binary = fake_ns3(tmp.path(), &log);
    let output_root = tmp.path().join("results");

    let outcome =
        run_scenario(&config(&output_root), binary).expect("scenario failed to run");
    assert!(outcome.result.is_ok());
    assert_eq!(
        outcome.scenario_dir,
        output_root.join("Check_GFBR/2_UE/saturation_check")
    );

    // Exactly one invocation, carrying the per-UE vectors in profile order.
    let invocations: Vec<String> = std::fs::read_to_string(&log)
        .unwrap()
        .lines()
        .map(|l| l.to_string())
        .collect();
    assert_eq!(invocations.len(), 1);
    assert!(invocations[0].starts_with("cttc-nr-simple-qos --ueNumPergNb=2"));
    assert!(invocations[0].contains("--ueTypeVec=GBR,NGBR"));
    assert!(invocations[0].contains("--gbrDlVec=5000000,0"));
    assert!(invocations[0].contains("--logging=false"));

    let metadata: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&outcome.metadata_path).unwrap()).unwrap();
    assert_eq!(metadata["ue_count"], 2);
    assert_eq!(metadata["traffic"][0]["offered_load_mbps"], 24.0);
    assert_eq!(metadata["traffic"][1]["type"], "NGBR");
    assert!(metadata["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[test]
fn invalid_gbr_profile_aborts_before_any_invocation() {
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let log = tmp.path().join("invocations.log");
    let binary = fake_ns3(tmp.path(), &log);
    let output_root = tmp.path().join("results");

    let mut config = config(&output_root);
    config.profiles[0].gbr_dl_bps = None;

    let err = run_scenario(&config, binary).unwrap_err();
    assert_eq!(
        err.downcast_ref::<ValidationError>(),
        Some(&ValidationError {
            ue_index: 0,
            field: "gbrDl",
        })
    );

    // No process ran and no directory was created.
    assert!(!log.exists());
    assert!(!output_root.exists());
}
