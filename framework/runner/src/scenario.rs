use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{SecondsFormat, Utc};
use itertools::Itertools;
use nr_sweep_core::prelude::{FilesystemError, ProcessError, ValidationError};
use serde::Serialize;

use crate::command::{FlagError, FlagSet};
use crate::invoke::Invoker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrafficType {
    Gbr,
    Ngbr,
}

impl TrafficType {
    pub fn as_flag_value(&self) -> &'static str {
        match self {
            TrafficType::Gbr => "GBR",
            TrafficType::Ngbr => "NGBR",
        }
    }
}

/// One UE's downlink traffic profile.
///
/// The simulator binds the i-th entry of every comma-separated vector to UE
/// index i, so a scenario's profile list order is significant and preserved
/// everywhere below.
#[derive(Debug, Clone)]
pub struct TrafficProfile {
    pub traffic_type: TrafficType,
    pub five_qi: String,
    pub gbr_dl_bps: Option<u64>,
    pub mbr_dl_bps: Option<u64>,
    pub packet_size_bytes: u32,
    pub lambda_pkt_per_s: u32,
}

impl TrafficProfile {
    pub fn gbr(
        five_qi: impl Into<String>,
        gbr_dl_bps: u64,
        mbr_dl_bps: u64,
        packet_size_bytes: u32,
        lambda_pkt_per_s: u32,
    ) -> Self {
        Self {
            traffic_type: TrafficType::Gbr,
            five_qi: five_qi.into(),
            gbr_dl_bps: Some(gbr_dl_bps),
            mbr_dl_bps: Some(mbr_dl_bps),
            packet_size_bytes,
            lambda_pkt_per_s,
        }
    }

    pub fn ngbr(
        five_qi: impl Into<String>,
        packet_size_bytes: u32,
        lambda_pkt_per_s: u32,
    ) -> Self {
        Self {
            traffic_type: TrafficType::Ngbr,
            five_qi: five_qi.into(),
            gbr_dl_bps: None,
            mbr_dl_bps: None,
            packet_size_bytes,
            lambda_pkt_per_s,
        }
    }

    /// Offered downlink load in Mbps. Always computed from the profile,
    /// never cached, so metadata reflects exactly what was configured.
    pub fn offered_load_mbps(&self) -> f64 {
        self.packet_size_bytes as f64 * self.lambda_pkt_per_s as f64 * 8.0 / 1e6
    }
}

/// Check that every GBR profile carries its guaranteed and maximum bit
/// rates. Runs before any directory is created or process launched.
pub fn validate_profiles(profiles: &[TrafficProfile]) -> Result<(), ValidationError> {
    for (ue_index, profile) in profiles.iter().enumerate() {
        if profile.traffic_type == TrafficType::Gbr {
            if profile.gbr_dl_bps.is_none() {
                return Err(ValidationError {
                    ue_index,
                    field: "gbrDl",
                });
            }
            if profile.mbr_dl_bps.is_none() {
                return Err(ValidationError {
                    ue_index,
                    field: "mbrDl",
                });
            }
        }
    }
    Ok(())
}

/// Scalar radio parameters of the single-cell scenario topology.
#[derive(Debug, Clone)]
pub struct RadioParams {
    pub numerology: u32,
    pub central_frequency_hz: f64,
    pub bandwidth_hz: f64,
    pub total_tx_power_dbm: i32,
    pub enable_ofdma: bool,
}

impl Default for RadioParams {
    fn default() -> Self {
        Self {
            numerology: 0,
            central_frequency_hz: 4e9,
            bandwidth_hz: 10e6,
            // Lower than a macro cell's 43 dBm so the QoS scheduler's effect
            // is visible at saturation.
            total_tx_power_dbm: 40,
            enable_ofdma: true,
        }
    }
}

/// A complete single-invocation scenario definition.
#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    pub program: String,
    pub scenario_name: String,
    pub output_root: PathBuf,
    pub profiles: Vec<TrafficProfile>,
    pub radio: RadioParams,
    pub sim_time_s: u32,
    pub gnb_count: u32,
    pub logging: bool,
    pub priority_traffic_scenario: u32,
}

impl ScenarioConfig {
    /// UE count per gNB is implied by the profile list length.
    pub fn ue_count(&self) -> usize {
        self.profiles.len()
    }

    /// `<root>/Check_GFBR/<N>_UE/<scenario_name>/`
    pub fn scenario_dir(&self) -> PathBuf {
        self.output_root
            .join("Check_GFBR")
            .join(format!("{}_UE", self.ue_count()))
            .join(&self.scenario_name)
    }

    fn join_profiles(&self, f: impl Fn(&TrafficProfile) -> String) -> String {
        self.profiles.iter().map(f).join(",")
    }

    /// The full flag set for the scenario program. Vector flags carry one
    /// comma-separated entry per profile, in list order; NGBR profiles
    /// contribute `0` to the GBR/MBR vectors.
    pub fn flags(&self, scenario_dir: &Path) -> Result<FlagSet, FlagError> {
        let mut flags = FlagSet::new();
        flags.set("ueNumPergNb", self.ue_count())?;
        flags.set(
            "gbrDlVec",
            self.join_profiles(|p| p.gbr_dl_bps.unwrap_or(0).to_string()),
        )?;
        flags.set(
            "mbrDlVec",
            self.join_profiles(|p| p.mbr_dl_bps.unwrap_or(0).to_string()),
        )?;
        flags.set("fiveQiVec", self.join_profiles(|p| p.five_qi.clone()))?;
        flags.set(
            "ueTypeVec",
            self.join_profiles(|p| p.traffic_type.as_flag_value().to_string()),
        )?;
        flags.set(
            "packetSizeVec",
            self.join_profiles(|p| p.packet_size_bytes.to_string()),
        )?;
        flags.set(
            "lambdaVec",
            self.join_profiles(|p| p.lambda_pkt_per_s.to_string()),
        )?;
        flags.set("simTime", self.sim_time_s)?;
        flags.set("outputDir", scenario_dir.display())?;
        flags.set("gNbNum", self.gnb_count)?;
        flags.set("logging", self.logging)?;
        flags.set("numerology", self.radio.numerology)?;
        flags.set("centralFrequency", self.radio.central_frequency_hz)?;
        flags.set("bandwidth", self.radio.bandwidth_hz)?;
        flags.set("totalTxPower", self.radio.total_tx_power_dbm)?;
        flags.set("enableOfdma", self.radio.enable_ofdma)?;
        flags.set("priorityTrafficScenario", self.priority_traffic_scenario)?;
        Ok(flags)
    }
}

#[derive(Debug, Serialize)]
pub struct RunMetadata {
    pub timestamp: String,
    pub ue_count: usize,
    #[serde(rename = "gNbNum")]
    pub gnb_num: u32,
    pub radio: RadioMetadata,
    pub traffic: Vec<TrafficEntry>,
    pub simulation: SimulationMetadata,
}

#[derive(Debug, Serialize)]
pub struct RadioMetadata {
    pub numerology: u32,
    pub bandwidth_hz: f64,
    pub central_frequency_hz: f64,
    pub total_tx_power_dbm: i32,
    pub ofdma_enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct TrafficEntry {
    pub ue_id: usize,
    #[serde(rename = "type")]
    pub traffic_type: String,
    pub five_qi: String,
    pub packet_size_bytes: u32,
    pub lambda_pkt_per_s: u32,
    pub offered_load_mbps: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gbr_dl_bps: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mbr_dl_bps: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct SimulationMetadata {
    pub sim_time_s: u32,
    #[serde(rename = "priorityTrafficScenario")]
    pub priority_traffic_scenario: u32,
}

impl RunMetadata {
    /// Snapshot the scenario's full parameterisation. Taken after the
    /// simulator returns; written once and never mutated.
    pub fn capture(config: &ScenarioConfig) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            ue_count: config.ue_count(),
            gnb_num: config.gnb_count,
            radio: RadioMetadata {
                numerology: config.radio.numerology,
                bandwidth_hz: config.radio.bandwidth_hz,
                central_frequency_hz: config.radio.central_frequency_hz,
                total_tx_power_dbm: config.radio.total_tx_power_dbm,
                ofdma_enabled: config.radio.enable_ofdma,
            },
            traffic: config
                .profiles
                .iter()
                .enumerate()
                .map(|(ue_id, p)| TrafficEntry {
                    ue_id,
                    traffic_type: p.traffic_type.as_flag_value().to_string(),
                    five_qi: p.five_qi.clone(),
                    packet_size_bytes: p.packet_size_bytes,
                    lambda_pkt_per_s: p.lambda_pkt_per_s,
                    offered_load_mbps: p.offered_load_mbps(),
                    gbr_dl_bps: p.gbr_dl_bps,
                    mbr_dl_bps: p.mbr_dl_bps,
                })
                .collect(),
            simulation: SimulationMetadata {
                sim_time_s: config.sim_time_s,
                priority_traffic_scenario: config.priority_traffic_scenario,
            },
        }
    }

    /// Render as 4-space-indented JSON, the sidecar format the analysis
    /// tooling reads.
    pub fn to_json_pretty(&self) -> serde_json::Result<Vec<u8>> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        Ok(buf)
    }
}

#[derive(Debug)]
pub struct ScenarioOutcome {
    pub scenario_dir: PathBuf,
    pub metadata_path: PathBuf,
    pub result: Result<(), ProcessError>,
}

/// Run one scenario end to end: validate, create the scenario directory,
/// invoke the simulator once, then write `metadata.json` beside the
/// simulator's own output.
///
/// Metadata is written even when the simulator fails, so a partial run is
/// still identifiable; the process outcome is carried in the return value.
pub fn run_scenario(config: &ScenarioConfig, binary: PathBuf) -> anyhow::Result<ScenarioOutcome> {
    validate_profiles(&config.profiles)?;

    let scenario_dir = config.scenario_dir();
    fs::create_dir_all(&scenario_dir).map_err(|source| FilesystemError {
        path: scenario_dir.clone(),
        source,
    })?;

    let flags = config.flags(&scenario_dir)?;
    let invoker = Invoker::new(binary, config.program.clone());
    log::info!(
        "Running scenario '{}' with {} UEs",
        config.scenario_name,
        config.ue_count()
    );
    let result = invoker.invoke(flags);
    if let Err(e) = &result {
        log::error!("Scenario '{}' failed: {e}", config.scenario_name);
    }

    let metadata = RunMetadata::capture(config);
    let metadata_path = scenario_dir.join("metadata.json");
    let json = metadata
        .to_json_pretty()
        .context("Failed to serialize scenario metadata")?;
    fs::write(&metadata_path, json).with_context(|| {
        format!(
            "Failed to write scenario metadata to '{}'",
            metadata_path.display()
        )
    })?;

    Ok(ScenarioOutcome {
        scenario_dir,
        metadata_path,
        result,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn reference_profiles() -> Vec<TrafficProfile> {
        vec![
            TrafficProfile::gbr("GBR_CONV_VOICE", 5_000_000, 30_000_000, 3000, 1000),
            TrafficProfile::gbr("GBR_CONV_VOICE", 5_000_000, 30_000_000, 3000, 1000),
            TrafficProfile::ngbr("NGBR_LOW_LAT_EMBB", 1500, 500),
        ]
    }

    fn config() -> ScenarioConfig {
        ScenarioConfig {
            program: "cttc-nr-simple-qos".to_string(),
            scenario_name: "test_".to_string(),
            output_root: PathBuf::from("./results"),
            profiles: reference_profiles(),
            radio: RadioParams::default(),
            sim_time_s: 3,
            gnb_count: 1,
            logging: false,
            priority_traffic_scenario: 0,
        }
    }

    #[test]
    fn gbr_profile_missing_rates_fails_validation_with_ue_index() {
        let mut profiles = reference_profiles();
        profiles[1].mbr_dl_bps = None;
        let err = validate_profiles(&profiles).unwrap_err();
        assert_eq!(
            err,
            ValidationError {
                ue_index: 1,
                field: "mbrDl",
            }
        );
        assert_eq!(
            err.to_string(),
            "UE 1: GBR profile is missing required field 'mbrDl'"
        );

        profiles[1].gbr_dl_bps = None;
        let err = validate_profiles(&profiles).unwrap_err();
        assert_eq!(err.field, "gbrDl");
    }

    #[test]
    fn ngbr_profiles_do_not_require_rates() {
        assert!(validate_profiles(&reference_profiles()).is_ok());
    }

    #[test]
    fn offered_load_is_exact() {
        let profile = TrafficProfile::gbr("GBR_CONV_VIDEO", 12_000_000, 25_000_000, 3000, 1000);
        assert_eq!(profile.offered_load_mbps(), 24.0);
    }

    #[test]
    fn vectors_have_one_entry_per_profile_in_list_order() {
        let config = config();
        let flags = config.flags(Path::new("out")).unwrap();
        assert_eq!(flags.get("ueNumPergNb"), Some("3"));
        assert_eq!(flags.get("ueTypeVec"), Some("GBR,GBR,NGBR"));
        assert_eq!(
            flags.get("fiveQiVec"),
            Some("GBR_CONV_VOICE,GBR_CONV_VOICE,NGBR_LOW_LAT_EMBB")
        );
        assert_eq!(flags.get("gbrDlVec"), Some("5000000,5000000,0"));
        assert_eq!(flags.get("mbrDlVec"), Some("30000000,30000000,0"));
        assert_eq!(flags.get("packetSizeVec"), Some("3000,3000,1500"));
        assert_eq!(flags.get("lambdaVec"), Some("1000,1000,500"));
    }

    #[test]
    fn scenario_flags_carry_radio_and_simulation_settings() {
        let config = config();
        let flags = config.flags(Path::new("results/Check_GFBR/3_UE/test_")).unwrap();
        assert_eq!(flags.get("simTime"), Some("3"));
        assert_eq!(flags.get("gNbNum"), Some("1"));
        assert_eq!(flags.get("logging"), Some("false"));
        assert_eq!(flags.get("enableOfdma"), Some("true"));
        assert_eq!(flags.get("numerology"), Some("0"));
        assert_eq!(flags.get("centralFrequency"), Some("4000000000"));
        assert_eq!(flags.get("bandwidth"), Some("10000000"));
        assert_eq!(flags.get("totalTxPower"), Some("40"));
        assert_eq!(flags.get("outputDir"), Some("results/Check_GFBR/3_UE/test_"));
        assert_eq!(flags.get("priorityTrafficScenario"), Some("0"));
    }

    #[test]
    fn scenario_dir_encodes_ue_count_and_name() {
        assert_eq!(
            config().scenario_dir(),
            PathBuf::from("./results/Check_GFBR/3_UE/test_")
        );
    }

    #[test]
    fn metadata_matches_schema() {
        let metadata = RunMetadata::capture(&config());
        let value = serde_json::to_value(&metadata).unwrap();

        assert_eq!(value["ue_count"], 3);
        assert_eq!(value["gNbNum"], 1);
        assert_eq!(value["radio"]["numerology"], 0);
        assert_eq!(value["radio"]["bandwidth_hz"], 10e6);
        assert_eq!(value["radio"]["central_frequency_hz"], 4e9);
        assert_eq!(value["radio"]["total_tx_power_dbm"], 40);
        assert_eq!(value["radio"]["ofdma_enabled"], true);
        assert_eq!(value["simulation"]["sim_time_s"], 3);
        assert_eq!(value["simulation"]["priorityTrafficScenario"], 0);

        let traffic = value["traffic"].as_array().unwrap();
        assert_eq!(traffic.len(), 3);
        assert_eq!(traffic[0]["ue_id"], 0);
        assert_eq!(traffic[0]["type"], "GBR");
        assert_eq!(traffic[0]["five_qi"], "GBR_CONV_VOICE");
        assert_eq!(traffic[0]["offered_load_mbps"], 24.0);
        assert_eq!(traffic[0]["gbr_dl_bps"], 5_000_000);
        assert_eq!(traffic[0]["mbr_dl_bps"], 30_000_000);
        // NGBR entries omit the rate fields entirely.
        assert!(traffic[2].get("gbr_dl_bps").is_none());
        assert!(traffic[2].get("mbr_dl_bps").is_none());
        assert_eq!(traffic[2]["offered_load_mbps"], 6.0);
    }

    #[test]
    fn metadata_json_uses_four_space_indentation() {
        let metadata = RunMetadata::capture(&config());
        let json = String::from_utf8(metadata.to_json_pretty().unwrap()).unwrap();
        assert!(json.contains("\n    \"ue_count\""));
        assert!(json.contains("\n        \"numerology\""));
    }
}
