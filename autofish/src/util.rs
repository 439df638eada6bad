use anyhow::{anyhow, Context, Result};
use autofish_core::input::{ActuationInput, Held, Pulse, Released};
use autofish_core::AutoFishConfig;
use std::fs;
use std::path::Path;

pub const DEFAULT_SEED_START: u32 = 0xF15B_0001;

pub fn parse_seed(seed: &str) -> Result<u32> {
    let s = seed.trim();
    if s.is_empty() {
        return Err(anyhow!("empty seed"));
    }
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).with_context(|| format!("invalid hex seed: {s}"))
    } else {
        s.parse::<u32>()
            .with_context(|| format!("invalid decimal seed: {s}"))
    }
}

pub fn seed_to_hex(seed: u32) -> String {
    format!("0x{seed:08x}")
}

pub fn parse_seed_csv(input: &str) -> Result<Vec<u32>> {
    let seeds = input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(parse_seed)
        .collect::<Result<Vec<_>>>()?;
    if seeds.is_empty() {
        return Err(anyhow!("no seeds parsed from --seeds"));
    }
    Ok(seeds)
}

pub fn parse_seed_file(path: &Path) -> Result<Vec<u32>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed reading seed file {}", path.display()))?;
    let seeds = data
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(parse_seed)
        .collect::<Result<Vec<_>>>()?;
    if seeds.is_empty() {
        return Err(anyhow!("seed file {} had no seeds", path.display()));
    }
    Ok(seeds)
}

/// Seeds from an explicit file or list, else an LCG sequence from `seed_start`.
pub fn resolve_seeds(
    seeds: Option<&str>,
    seed_file: Option<&Path>,
    seed_start: Option<&str>,
    seed_count: u32,
) -> Result<Vec<u32>> {
    if let Some(path) = seed_file {
        return parse_seed_file(path);
    }
    if let Some(csv) = seeds {
        return parse_seed_csv(csv);
    }
    if seed_count == 0 {
        return Err(anyhow!("--seed-count must be >= 1"));
    }

    let start = match seed_start {
        Some(start) => parse_seed(start)?,
        None => DEFAULT_SEED_START,
    };

    let mut out = Vec::with_capacity(seed_count as usize);
    let mut cur = start;
    for _ in 0..seed_count {
        out.push(cur);
        cur = cur.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
    }
    Ok(out)
}

pub fn load_config(path: &Path) -> Result<AutoFishConfig> {
    let data = fs::read(path).with_context(|| format!("failed reading {}", path.display()))?;
    let config: AutoFishConfig = serde_json::from_slice(&data)
        .with_context(|| format!("invalid config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("rejected config {}", path.display()))?;
    Ok(config)
}

/// Parses `released`, `held`, or `pulse:<period>:<duty>`.
pub fn parse_input(raw: &str) -> Result<Box<dyn ActuationInput + Send>> {
    let raw = raw.trim();
    match raw {
        "released" => return Ok(Box::new(Released)),
        "held" => return Ok(Box::new(Held)),
        _ => {}
    }

    let Some(rest) = raw.strip_prefix("pulse:") else {
        return Err(anyhow!(
            "unknown input '{raw}'. expected released, held or pulse:<period>:<duty>"
        ));
    };
    let (period, duty) = rest
        .split_once(':')
        .ok_or_else(|| anyhow!("pulse input needs <period>:<duty>, got '{rest}'"))?;
    let period: u32 = period
        .parse()
        .with_context(|| format!("invalid pulse period '{period}'"))?;
    let duty: u32 = duty
        .parse()
        .with_context(|| format!("invalid pulse duty '{duty}'"))?;
    if period == 0 || duty > period {
        return Err(anyhow!(
            "pulse needs period >= 1 and duty <= period, got {period}:{duty}"
        ));
    }
    Ok(Box::new(Pulse { period, duty }))
}
