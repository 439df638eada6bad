use crate::profiles::{config_fingerprint, create_profile};
use crate::util::seed_to_hex;
use anyhow::{anyhow, Context, Result};
use autofish_core::input::ActuationInput;
use autofish_core::sim::{play_session, SessionOutcome, SessionSetup};
use autofish_core::tape::serialize_tape;
use autofish_core::{verify_tape, AutoFishConfig, BobberController};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

#[derive(Clone, Debug, Serialize)]
pub struct RunMetrics {
    pub profile_id: String,
    pub config_hash: String,
    pub seed: u32,
    pub max_ticks: u32,
    pub ticks: u32,
    pub outcome: SessionOutcome,
    pub treasure_appeared: bool,
    pub treasure_caught: bool,
    pub final_distance: f32,
    pub perfect: bool,
    pub is_boss_fish: bool,
    pub press_ticks: u32,
    pub diverted_ticks: u32,
    pub diversion_switches: u32,
    pub final_rng_state: u32,
    pub tape_checksum: u32,
}

#[derive(Clone, Debug)]
pub struct SessionArtifact {
    pub metrics: RunMetrics,
    pub presses: Vec<bool>,
    pub tape: Vec<u8>,
}

pub fn run_profile(
    profile_id: &str,
    seed: u32,
    max_ticks: u32,
    input: &mut dyn ActuationInput,
) -> Result<SessionArtifact> {
    let config =
        create_profile(profile_id).ok_or_else(|| anyhow!("unknown profile '{profile_id}'"))?;
    run_session(profile_id, config, seed, max_ticks, input)
}

/// Plays one session against the reference host and checks that its tape replays.
pub fn run_session(
    label: &str,
    config: AutoFishConfig,
    seed: u32,
    max_ticks: u32,
    input: &mut dyn ActuationInput,
) -> Result<SessionArtifact> {
    if max_ticks == 0 {
        return Err(anyhow!("max_ticks must be > 0"));
    }
    config
        .validate()
        .with_context(|| format!("invalid config for '{label}'"))?;

    let setup = SessionSetup::from_seed(seed);
    info!(
        profile = label,
        seed = %seed_to_hex(seed),
        bar_height = setup.bar_height,
        hook = ?setup.hook_variant,
        motion = ?setup.motion,
        boss = setup.is_boss_fish,
        "session start"
    );

    let mut controller = BobberController::new(config);
    let mut tick = 0u32;
    let mut diverted_ticks = 0u32;
    let mut diversion_switches = 0u32;
    let (result, presses) = play_session(setup, &mut controller, input, max_ticks, |state, report| {
        tick += 1;
        if report.diverting {
            diverted_ticks += 1;
        }
        if report.diversion_changed {
            diversion_switches += 1;
            debug!(
                tick,
                diverting = report.diverting,
                progress = state.distance_from_catching,
                target = report.target_pos,
                "treasure diversion changed"
            );
        }
    });

    let tape = serialize_tape(&presses, &result);
    let journal = verify_tape(&tape, max_ticks.max(result.ticks).max(1), config)
        .map_err(|err| anyhow!("generated tape failed verification: {err}"))?;

    let press_ticks = presses.iter().filter(|p| **p).count() as u32;
    info!(
        profile = label,
        seed = %seed_to_hex(seed),
        ticks = result.ticks,
        outcome = %result.outcome,
        treasure = result.treasure_caught,
        perfect = result.perfect,
        "session end"
    );

    Ok(SessionArtifact {
        metrics: RunMetrics {
            profile_id: label.to_string(),
            config_hash: config_fingerprint(&config)?,
            seed,
            max_ticks,
            ticks: result.ticks,
            outcome: result.outcome,
            treasure_appeared: result.treasure_appeared,
            treasure_caught: result.treasure_caught,
            final_distance: result.final_distance,
            perfect: result.perfect,
            is_boss_fish: result.is_boss_fish,
            press_ticks,
            diverted_ticks,
            diversion_switches,
            final_rng_state: result.rng_state,
            tape_checksum: journal.tape_checksum,
        },
        presses,
        tape,
    })
}

pub fn write_tape(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating directory {}", parent.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("failed writing {}", path.display()))?;
    debug!(path = %path.display(), bytes = bytes.len(), "wrote tape");
    Ok(())
}
