//! Named controller presets used by `simulate`, `replay` and `benchmark`.

use anyhow::{Context, Result};
use autofish_core::speed::{PressBias, SpeedStrategy};
use autofish_core::tape::crc32;
use autofish_core::AutoFishConfig;
use serde::Serialize;

#[derive(Clone, Copy, Debug)]
pub struct Profile {
    pub id: &'static str,
    pub description: &'static str,
    pub config: AutoFishConfig,
}

#[derive(Clone, Debug, Serialize)]
pub struct ProfileManifestEntry {
    pub id: String,
    pub description: String,
    pub config_hash: String,
    pub config: serde_json::Value,
}

fn profile_table() -> [Profile; 6] {
    let base = AutoFishConfig::default();
    [
        Profile {
            id: "default",
            description: "Shipped settings: hook-scaled acceleration, treasure diversion on",
            config: base,
        },
        Profile {
            id: "faster",
            description: "Fixed high acceleration regardless of hook",
            config: AutoFishConfig {
                faster_speed: true,
                ..base
            },
        },
        Profile {
            id: "no-treasure",
            description: "Never leaves the fish for a chest",
            config: AutoFishConfig {
                catch_treasure: false,
                ..base
            },
        },
        Profile {
            id: "damped",
            description: "Halves speed on moves that would run off the track",
            config: AutoFishConfig {
                overshoot_damping: true,
                ..base
            },
        },
        Profile {
            id: "legacy-band",
            description: "Min/max displacement window instead of a single target speed",
            config: AutoFishConfig {
                strategy: SpeedStrategy::Band,
                ..base
            },
        },
        // For hosts that do not apply their own press response. Against the
        // reference host the two steps stack and the bar sinks to the bottom.
        Profile {
            id: "lower-bias",
            description: "Press step subtracts while held; for hosts without a press response",
            config: AutoFishConfig {
                press_bias: PressBias::Lower,
                ..base
            },
        },
    ]
}

pub fn profile_ids() -> Vec<&'static str> {
    profile_table().iter().map(|p| p.id).collect()
}

pub fn describe_profiles() -> Vec<(&'static str, &'static str)> {
    profile_table()
        .iter()
        .map(|p| (p.id, p.description))
        .collect()
}

pub fn create_profile(id: &str) -> Option<AutoFishConfig> {
    profile_table()
        .into_iter()
        .find(|p| p.id == id)
        .map(|p| p.config)
}

pub fn config_fingerprint(config: &AutoFishConfig) -> Result<String> {
    let encoded = serde_json::to_vec(config).context("failed to serialize config")?;
    Ok(format!(
        "crc32:{:08x}:len:{}",
        crc32(&encoded),
        encoded.len()
    ))
}

pub fn profile_manifest_entries() -> Result<Vec<ProfileManifestEntry>> {
    profile_table()
        .iter()
        .map(|p| {
            let config = serde_json::to_value(p.config)
                .with_context(|| format!("failed to serialize profile '{}'", p.id))?;
            Ok(ProfileManifestEntry {
                id: p.id.to_string(),
                description: p.description.to_string(),
                config_hash: config_fingerprint(&p.config)?,
                config,
            })
        })
        .collect()
}
