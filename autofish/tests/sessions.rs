use anyhow::Result;
use autofish::benchmark::{run_benchmark, BenchmarkConfig};
use autofish::profiles::{create_profile, profile_ids};
use autofish::runner::{run_profile, run_session, write_tape};
use autofish::util::{load_config, resolve_seeds};
use autofish_core::constants::MAX_TICKS_DEFAULT;
use autofish_core::input::{Pulse, Released};
use autofish_core::sim::SessionOutcome;
use autofish_core::speed::SpeedStrategy;
use autofish_core::tape::parse_tape;
use autofish_core::{verify_tape, AutoFishConfig, TapeError};
use std::fs;

#[test]
fn every_profile_records_a_replayable_tape_on_smoke_seed() -> Result<()> {
    let seed = 0xDEAD_BEEF;
    for profile in profile_ids() {
        // Short budget: this touches every profile on every test run.
        let artifact = run_profile(profile, seed, 600, &mut Released)?;
        assert!(artifact.metrics.ticks > 0, "profile={profile}");
        assert_eq!(artifact.metrics.profile_id, profile);

        let config = create_profile(profile).expect("listed profile exists");
        let journal = verify_tape(&artifact.tape, 600, config)?;
        assert_eq!(journal.tick_count, artifact.metrics.ticks, "profile={profile}");
        assert_eq!(journal.outcome, artifact.metrics.outcome, "profile={profile}");
    }
    Ok(())
}

#[test]
fn tape_written_to_disk_verifies_after_reload() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("nested/dir/session.tape");
    let mut input = Pulse { period: 17, duty: 5 };
    let artifact = run_profile("faster", 0xC0FF_EE11, 3_000, &mut input)?;
    write_tape(&path, &artifact.tape)?;

    let bytes = fs::read(&path)?;
    assert_eq!(bytes, artifact.tape);
    let tape = parse_tape(&bytes, 3_000)?;
    assert_eq!(tape.header.seed, 0xC0FF_EE11);
    assert_eq!(tape.press_flags(), artifact.presses);

    let config = create_profile("faster").expect("faster profile");
    verify_tape(&bytes, 3_000, config)?;
    Ok(())
}

#[test]
fn tape_does_not_replay_under_a_different_profile() -> Result<()> {
    // Look for a seed whose session diverges between profiles; most do.
    let mut diverged = false;
    for seed in [0xDEAD_BEEF, 0xC0FF_EE11, 0x1234_5678, 0xA57E_0001, 0x0BAD_F00D] {
        let artifact = run_profile("default", seed, 4_000, &mut Released)?;
        let faster = create_profile("faster").expect("faster profile");
        match verify_tape(&artifact.tape, 4_000, faster) {
            Ok(_) => {}
            Err(err) => {
                assert!(
                    matches!(
                        err,
                        TapeError::OutcomeMismatch { .. }
                            | TapeError::TreasureMismatch { .. }
                            | TapeError::DistanceMismatch { .. }
                            | TapeError::TickCountMismatch { .. }
                    ),
                    "unexpected error {err}"
                );
                diverged = true;
            }
        }
    }
    assert!(diverged);
    Ok(())
}

fn session_signature(profile: &str, seed: u32) -> Result<(SessionOutcome, u32, u32)> {
    let artifact = run_profile(profile, seed, MAX_TICKS_DEFAULT, &mut Released)?;
    let m = artifact.metrics;
    Ok((m.outcome, m.ticks, m.final_distance.to_bits()))
}

#[test]
fn band_profile_steers_differently_from_aim_and_lower_bias() -> Result<()> {
    let seeds = resolve_seeds(None, None, Some("0xB0BB0001"), 16)?;
    let mut differs_from_default = false;
    let mut differs_from_lower = false;
    let mut band_caught = 0;
    let mut lower_caught = 0;

    for seed in seeds {
        let band = session_signature("legacy-band", seed)?;
        let default = session_signature("default", seed)?;
        let lower = session_signature("lower-bias", seed)?;
        differs_from_default |= band != default;
        differs_from_lower |= band != lower;
        band_caught += usize::from(band.0 == SessionOutcome::Caught);
        lower_caught += usize::from(lower.0 == SessionOutcome::Caught);
    }

    assert!(differs_from_default, "band strategy never changed a session");
    assert!(differs_from_lower, "band profile replays the lower-bias sessions");
    assert!(
        band_caught > lower_caught,
        "band caught {band_caught}, lower-bias caught {lower_caught}"
    );
    Ok(())
}

#[test]
fn config_file_round_trip_drives_a_session() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("autofish.json");
    fs::write(&path, r#"{ "catch_treasure": false, "faster_speed": true }"#)?;

    let config = load_config(&path)?;
    assert!(!config.catch_treasure);
    assert!(config.faster_speed);
    assert!(config.auto_hit);

    let artifact = run_session("file", config, 0x1234_5678, 2_000, &mut Released)?;
    assert_eq!(artifact.metrics.diverted_ticks, 0);
    assert_ne!(artifact.metrics.outcome, SessionOutcome::Running);
    Ok(())
}

#[test]
fn invalid_config_files_are_rejected() -> Result<()> {
    let tmp = tempfile::tempdir()?;

    let unknown = tmp.path().join("unknown.json");
    fs::write(&unknown, r#"{ "catchTreasure": true }"#)?;
    assert!(load_config(&unknown).is_err());

    let conflicting = tmp.path().join("conflict.json");
    fs::write(
        &conflicting,
        r#"{ "strategy": "band", "overshoot_damping": true }"#,
    )?;
    assert!(load_config(&conflicting).is_err());

    assert!(load_config(&tmp.path().join("missing.json")).is_err());

    let bad = AutoFishConfig {
        strategy: SpeedStrategy::Band,
        overshoot_damping: true,
        ..AutoFishConfig::default()
    };
    assert!(run_session("bad", bad, 1, 100, &mut Released).is_err());
    Ok(())
}

#[test]
fn benchmark_smoke_outputs_expected_reports() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let report = run_benchmark(BenchmarkConfig {
        profiles: vec!["default".to_string(), "legacy-band".to_string()],
        seeds: vec![0xDEAD_BEEF, 0xC0FF_EE11, 0x1234_5678],
        max_ticks: 1_500,
        input: "pulse:20:4".to_string(),
        out_dir: tmp.path().to_path_buf(),
        jobs: Some(2),
    })?;

    assert_eq!(report.run_count, 6);
    assert_eq!(report.profile_rankings.len(), 2);
    for agg in &report.profile_rankings {
        assert_eq!(agg.runs, 3);
        assert!((0.0..=1.0).contains(&agg.catch_rate));
        assert!(agg.catch_rate + agg.escape_rate <= 1.0 + 1e-9);
    }
    assert!(tmp.path().join("summary.json").exists());
    assert!(tmp.path().join("runs.csv").exists());
    assert!(tmp.path().join("rankings.csv").exists());

    let runs_csv = fs::read_to_string(tmp.path().join("runs.csv"))?;
    assert_eq!(runs_csv.lines().count(), 1 + 6);
    let summary: serde_json::Value =
        serde_json::from_slice(&fs::read(tmp.path().join("summary.json"))?)?;
    assert_eq!(summary["run_count"], 6);
    Ok(())
}

#[test]
fn benchmark_rejects_bad_arguments() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let base = BenchmarkConfig {
        profiles: vec!["default".to_string()],
        seeds: vec![1],
        max_ticks: 100,
        input: "released".to_string(),
        out_dir: tmp.path().to_path_buf(),
        jobs: None,
    };
    assert!(run_benchmark(BenchmarkConfig {
        seeds: Vec::new(),
        ..base.clone()
    })
    .is_err());
    assert!(run_benchmark(BenchmarkConfig {
        jobs: Some(0),
        ..base.clone()
    })
    .is_err());
    assert!(run_benchmark(BenchmarkConfig {
        input: "mash".to_string(),
        ..base.clone()
    })
    .is_err());
    assert!(run_benchmark(BenchmarkConfig {
        profiles: vec!["nope".to_string()],
        ..base
    })
    .is_err());
}
