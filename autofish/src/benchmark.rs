use crate::profiles::profile_ids;
use crate::runner::{run_profile, RunMetrics};
use crate::util::{parse_input, seed_to_hex};
use anyhow::{anyhow, Context, Result};
use autofish_core::sim::SessionOutcome;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

#[derive(Clone, Debug)]
pub struct BenchmarkConfig {
    pub profiles: Vec<String>,
    pub seeds: Vec<u32>,
    pub max_ticks: u32,
    pub input: String,
    pub out_dir: PathBuf,
    pub jobs: Option<usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunRecord {
    pub profile_id: String,
    pub config_hash: String,
    pub seed: u32,
    pub seed_hex: String,
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
}

impl From<&RunMetrics> for RunRecord {
    fn from(m: &RunMetrics) -> Self {
        Self {
            profile_id: m.profile_id.clone(),
            config_hash: m.config_hash.clone(),
            seed: m.seed,
            seed_hex: seed_to_hex(m.seed),
            ticks: m.ticks,
            outcome: m.outcome,
            treasure_appeared: m.treasure_appeared,
            treasure_caught: m.treasure_caught,
            final_distance: m.final_distance,
            perfect: m.perfect,
            is_boss_fish: m.is_boss_fish,
            press_ticks: m.press_ticks,
            diverted_ticks: m.diverted_ticks,
            diversion_switches: m.diversion_switches,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProfileAggregate {
    pub profile_id: String,
    pub config_hash: String,
    pub runs: usize,
    pub catch_rate: f64,
    pub escape_rate: f64,
    pub perfect_rate: f64,
    /// Caught chests over sessions where a chest appeared.
    pub treasure_rate: f64,
    pub avg_ticks: f64,
    pub avg_ticks_to_catch: f64,
    pub avg_final_distance: f64,
    pub avg_diverted_ticks: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub generated_unix_s: u64,
    pub max_ticks: u32,
    pub input: String,
    pub jobs: Option<usize>,
    pub profiles: Vec<String>,
    pub seeds: Vec<u32>,
    pub run_count: usize,
    pub profile_rankings: Vec<ProfileAggregate>,
    pub runs: Vec<RunRecord>,
}

pub fn resolve_profiles(input: Option<&str>) -> Result<Vec<String>> {
    let Some(raw) = input else {
        return Ok(profile_ids().iter().map(|id| (*id).to_string()).collect());
    };
    let profiles: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect();
    if profiles.is_empty() {
        return Err(anyhow!("--profiles resolved to empty list"));
    }
    Ok(profiles)
}

pub fn run_benchmark(config: BenchmarkConfig) -> Result<BenchmarkReport> {
    if config.seeds.is_empty() {
        return Err(anyhow!("benchmark requires at least one seed"));
    }
    if config.profiles.is_empty() {
        return Err(anyhow!("benchmark requires at least one profile"));
    }
    if config.jobs == Some(0) {
        return Err(anyhow!("benchmark --jobs must be >= 1 when provided"));
    }
    // Reject a bad --input once, before fanning out.
    parse_input(&config.input)?;

    fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("failed creating {}", config.out_dir.display()))?;

    info!(
        profiles = config.profiles.len(),
        seeds = config.seeds.len(),
        max_ticks = config.max_ticks,
        "benchmark start"
    );

    let run_jobs: Vec<(String, u32)> = config
        .profiles
        .iter()
        .flat_map(|profile| config.seeds.iter().map(move |seed| (profile.clone(), *seed)))
        .collect();

    let run_one = |(profile_id, seed): &(String, u32)| -> Result<RunMetrics> {
        let mut input = parse_input(&config.input)?;
        let artifact = run_profile(profile_id, *seed, config.max_ticks, &mut *input)
            .with_context(|| {
                format!("benchmark run failed for profile={profile_id} seed={seed:#x}")
            })?;
        Ok(artifact.metrics)
    };

    let run_results: Vec<Result<RunMetrics>> = if let Some(jobs) = config.jobs {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .context("failed to build rayon threadpool")?;
        pool.install(|| run_jobs.par_iter().map(run_one).collect())
    } else {
        run_jobs.par_iter().map(run_one).collect()
    };

    let runs = run_results.into_iter().collect::<Result<Vec<_>>>()?;

    let mut grouped: HashMap<&str, Vec<&RunMetrics>> = HashMap::new();
    for run in &runs {
        grouped.entry(run.profile_id.as_str()).or_default().push(run);
    }

    let mut rankings: Vec<ProfileAggregate> = grouped
        .into_iter()
        .map(|(profile_id, profile_runs)| aggregate(profile_id, &profile_runs))
        .collect();

    rankings.sort_by(|a, b| {
        b.catch_rate
            .total_cmp(&a.catch_rate)
            .then_with(|| b.treasure_rate.total_cmp(&a.treasure_rate))
            .then_with(|| a.avg_ticks_to_catch.total_cmp(&b.avg_ticks_to_catch))
            .then_with(|| a.profile_id.cmp(&b.profile_id))
    });

    let mut run_records: Vec<RunRecord> = runs.iter().map(RunRecord::from).collect();
    run_records.sort_by(|a, b| {
        a.profile_id
            .cmp(&b.profile_id)
            .then_with(|| a.seed.cmp(&b.seed))
    });

    write_runs_csv(&config.out_dir.join("runs.csv"), &run_records)?;
    write_rankings_csv(&config.out_dir.join("rankings.csv"), &rankings)?;

    let report = BenchmarkReport {
        generated_unix_s: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs(),
        max_ticks: config.max_ticks,
        input: config.input,
        jobs: config.jobs,
        profiles: config.profiles,
        seeds: config.seeds,
        run_count: run_records.len(),
        profile_rankings: rankings,
        runs: run_records,
    };

    let report_path = config.out_dir.join("summary.json");
    fs::write(
        &report_path,
        serde_json::to_vec_pretty(&report).context("failed to serialize summary json")?,
    )
    .with_context(|| format!("failed writing {}", report_path.display()))?;

    info!(runs = report.run_count, out_dir = %config.out_dir.display(), "benchmark done");
    Ok(report)
}

fn aggregate(profile_id: &str, runs: &[&RunMetrics]) -> ProfileAggregate {
    let count = runs.len().max(1) as f64;
    let caught: Vec<&&RunMetrics> = runs
        .iter()
        .filter(|r| r.outcome == SessionOutcome::Caught)
        .collect();
    let escaped = runs
        .iter()
        .filter(|r| r.outcome == SessionOutcome::Escaped)
        .count();
    let perfect = runs.iter().filter(|r| r.perfect).count();
    let with_treasure = runs.iter().filter(|r| r.treasure_appeared).count();
    let treasure_caught = runs.iter().filter(|r| r.treasure_caught).count();

    let sum_ticks: u64 = runs.iter().map(|r| r.ticks as u64).sum();
    let sum_catch_ticks: u64 = caught.iter().map(|r| r.ticks as u64).sum();
    let sum_distance: f64 = runs.iter().map(|r| r.final_distance as f64).sum();
    let sum_diverted: u64 = runs.iter().map(|r| r.diverted_ticks as u64).sum();

    ProfileAggregate {
        profile_id: profile_id.to_string(),
        config_hash: runs
            .first()
            .map(|r| r.config_hash.clone())
            .unwrap_or_else(|| "unknown".to_string()),
        runs: runs.len(),
        catch_rate: caught.len() as f64 / count,
        escape_rate: escaped as f64 / count,
        perfect_rate: perfect as f64 / count,
        treasure_rate: if with_treasure == 0 {
            0.0
        } else {
            treasure_caught as f64 / with_treasure as f64
        },
        avg_ticks: sum_ticks as f64 / count,
        avg_ticks_to_catch: if caught.is_empty() {
            0.0
        } else {
            sum_catch_ticks as f64 / caught.len() as f64
        },
        avg_final_distance: sum_distance / count,
        avg_diverted_ticks: sum_diverted as f64 / count,
    }
}

fn write_runs_csv(path: &Path, rows: &[RunRecord]) -> Result<()> {
    let mut csv = String::from(
        "profile_id,config_hash,seed_hex,seed,ticks,outcome,treasure_appeared,treasure_caught,final_distance,perfect,is_boss_fish,press_ticks,diverted_ticks,diversion_switches\n",
    );
    for row in rows {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{},{},{:.4},{},{},{},{},{}\n",
            row.profile_id,
            row.config_hash,
            row.seed_hex,
            row.seed,
            row.ticks,
            row.outcome,
            row.treasure_appeared,
            row.treasure_caught,
            row.final_distance,
            row.perfect,
            row.is_boss_fish,
            row.press_ticks,
            row.diverted_ticks,
            row.diversion_switches
        ));
    }
    fs::write(path, csv).with_context(|| format!("failed writing {}", path.display()))
}

fn write_rankings_csv(path: &Path, rows: &[ProfileAggregate]) -> Result<()> {
    let mut csv = String::from(
        "rank,profile_id,config_hash,runs,catch_rate,escape_rate,perfect_rate,treasure_rate,avg_ticks,avg_ticks_to_catch,avg_final_distance,avg_diverted_ticks\n",
    );
    for (idx, row) in rows.iter().enumerate() {
        csv.push_str(&format!(
            "{},{},{},{},{:.4},{:.4},{:.4},{:.4},{:.1},{:.1},{:.4},{:.1}\n",
            idx + 1,
            row.profile_id,
            row.config_hash,
            row.runs,
            row.catch_rate,
            row.escape_rate,
            row.perfect_rate,
            row.treasure_rate,
            row.avg_ticks,
            row.avg_ticks_to_catch,
            row.avg_final_distance,
            row.avg_diverted_ticks
        ));
    }
    fs::write(path, csv).with_context(|| format!("failed writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_list_is_full_roster() {
        let all = resolve_profiles(None).unwrap();
        assert_eq!(all.len(), profile_ids().len());
        assert_eq!(
            resolve_profiles(Some("default, faster,")).unwrap(),
            vec!["default".to_string(), "faster".to_string()]
        );
        assert!(resolve_profiles(Some(" , ")).is_err());
    }
}
