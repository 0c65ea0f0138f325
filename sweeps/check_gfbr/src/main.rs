use nr_sweep_runner::prelude::*;

/// The reference traffic mix: three identical conversational-voice GBR UEs
/// at saturation. Edit this list to change the scenario; the UE count and
/// all per-UE simulator vectors follow from it.
fn ue_profiles() -> Vec<TrafficProfile> {
    vec![
        TrafficProfile::gbr("GBR_CONV_VOICE", 5_000_000, 30_000_000, 3000, 1000),
        TrafficProfile::gbr("GBR_CONV_VOICE", 5_000_000, 30_000_000, 3000, 1000),
        TrafficProfile::gbr("GBR_CONV_VOICE", 5_000_000, 30_000_000, 3000, 1000),
    ]
}

fn scenario_config(cli: &ScenarioCli) -> ScenarioConfig {
    ScenarioConfig {
        program: "cttc-nr-simple-qos-SERGI".to_string(),
        scenario_name: cli.scenario_name.clone(),
        output_root: cli.output_root.clone(),
        profiles: ue_profiles(),
        radio: RadioParams::default(),
        sim_time_s: 3,
        gnb_count: 1,
        logging: false,
        priority_traffic_scenario: 0,
    }
}

fn main() -> anyhow::Result<()> {
    let cli: ScenarioCli = init();

    let config = scenario_config(&cli);

    let binary = match &cli.ns3 {
        Some(path) => path.clone(),
        None => ns3_path()?,
    };

    let outcome = run_scenario(&config, binary)?;
    match outcome.result {
        Ok(()) => {
            log::info!(
                "Scenario complete, metadata at {}",
                outcome.metadata_path.display()
            );
            Ok(())
        }
        Err(e) => {
            log::error!("Simulator failed: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_targets_the_registered_simulator_program() {
        // Must match the program name the ns-3 build registers for
        // contrib/nr/examples/cttc-nr-simple-qos-SERGI.cc.
        let cli = ScenarioCli {
            ns3: None,
            output_root: "./results".into(),
            scenario_name: "test_".to_string(),
        };
        let config = scenario_config(&cli);
        assert_eq!(config.program, "cttc-nr-simple-qos-SERGI");
        assert_eq!(config.ue_count(), 3);
    }
}
