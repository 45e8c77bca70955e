use anyhow::Result;
use rockfield_core::input::{encode_input_byte, FrameInput};
use rockfield_core::EngineConfig;
use rockfield_harness::runner::{
    demo_report, replay_report, run_sweep, snapshot_after, SweepConfig, SweepReport,
};
use rockfield_harness::util::{emit_json, load_config, read_tape, seed_range};
use std::fs;
use std::path::Path;

fn write_tape(path: &Path, tape: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, tape)?;
    Ok(())
}

fn firing_tape(len: usize) -> Vec<u8> {
    (0..len)
        .map(|tick| {
            encode_input_byte(FrameInput {
                left: tick % 100 < 15,
                fire: tick % 10 < 4,
                ..FrameInput::default()
            })
        })
        .collect()
}

#[test]
fn config_file_keeps_defaults_for_missing_fields() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("engine.json");
    fs::write(&path, r#"{ "difficulty": 0.9, "initial_rocks": 4 }"#)?;

    let config = load_config(&path)?;
    assert_eq!(config.difficulty, 0.9);
    assert_eq!(config.initial_rocks, 4);
    assert_eq!(config.width, EngineConfig::default().width);
    Ok(())
}

#[test]
fn out_of_range_config_is_rejected() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("engine.json");
    fs::write(&path, r#"{ "difficulty": 1.5 }"#)?;

    let err = load_config(&path).expect_err("difficulty above one");
    assert!(format!("{err:#}").contains("difficulty out of range"), "{err:#}");
    Ok(())
}

#[test]
fn tape_files_replay_identically() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("tapes/run.tape");
    write_tape(&path, &firing_tape(900))?;

    let tape = read_tape(&path)?;
    assert_eq!(tape.len(), 900);

    let config = EngineConfig::default();
    let first = replay_report(0xC0DE, &config, &tape, 30, true)?;
    let second = replay_report(0xC0DE, &config, &tape, 30, false)?;
    assert_eq!(first.fingerprint, second.fingerprint);
    assert_eq!(first.result, second.result);
    assert_eq!(first.result.ticks, 900);
    assert_eq!(first.checkpoints.last().map(|c| c.tick), Some(900));
    assert!(second.checkpoints.is_empty());
    Ok(())
}

#[test]
fn sweep_reports_every_seed_in_order() -> Result<()> {
    let engine = EngineConfig {
        initial_rocks: 3,
        ..EngineConfig::default()
    };
    let seeds = seed_range(40, 4);
    let report = run_sweep(&SweepConfig {
        seeds: seeds.clone(),
        seconds: 2,
        engine: engine.clone(),
        jobs: Some(2),
    })?;

    assert_eq!(report.runs, 4);
    assert_eq!(report.unfinished, 0);
    assert_eq!(report.records[0].seed, "0x00000028");
    for (record, seed) in report.records.iter().zip(&seeds) {
        assert_eq!(record.result, demo_report(*seed, &engine, 2).result);
    }
    assert!(report.records.iter().any(|r| r.seed == report.best_seed));
    Ok(())
}

#[test]
fn sweep_rejects_empty_input() {
    let config = SweepConfig {
        seeds: Vec::new(),
        seconds: 1,
        engine: EngineConfig::default(),
        jobs: None,
    };
    assert!(run_sweep(&config).is_err());
    assert!(run_sweep(&SweepConfig {
        seeds: vec![1],
        jobs: Some(0),
        ..config.clone()
    })
    .is_err());

    let err = run_sweep(&SweepConfig {
        seeds: vec![1],
        seconds: u64::MAX,
        ..config
    })
    .expect_err("demo length past the bound");
    assert!(format!("{err:#}").contains("demo length out of range"), "{err:#}");
}

#[test]
fn reports_round_trip_through_json_files() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("out/sweep.json");
    let report = run_sweep(&SweepConfig {
        seeds: vec![7],
        seconds: 1,
        engine: EngineConfig::default(),
        jobs: None,
    })?;
    emit_json(&report, Some(&path))?;

    let decoded: SweepReport = serde_json::from_slice(&fs::read(&path)?)?;
    assert_eq!(decoded.records[0].result, report.records[0].result);
    assert_eq!(decoded.best_seed, "0x00000007");
    Ok(())
}

#[test]
fn snapshot_shows_the_launched_ship() -> Result<()> {
    let config = EngineConfig {
        initial_rocks: 0,
        ..EngineConfig::default()
    };
    let snapshot = snapshot_after(3, &config, &[0; 80]);
    let json = serde_json::to_value(&snapshot)?;

    assert_eq!(json["tick"], 80);
    assert_eq!(json["lives"], 3);
    let entities = json["entities"].as_array().expect("entity list");
    assert!(entities.iter().any(|e| e["kind"] == "Ship" && e["dead"] == false));
    Ok(())
}
