use anyhow::{anyhow, Context, Result};
use autofish::benchmark::{resolve_profiles, run_benchmark, BenchmarkConfig};
use autofish::profiles::{create_profile, describe_profiles, profile_ids};
use autofish::runner::{run_session, write_tape};
use autofish::util::{load_config, parse_input, parse_seed, resolve_seeds, seed_to_hex};
use autofish_core::constants::MAX_TICKS_DEFAULT;
use autofish_core::tape::parse_tape;
use autofish_core::{verify_tape, AutoFishConfig};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "autofish")]
#[command(about = "Bobber-bar controller lab: deterministic sessions, press tapes and benchmarks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the effective controller config as JSON
    ShowConfig {
        #[arg(long, conflicts_with = "config")]
        profile: Option<String>,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List built-in controller profiles
    ListProfiles,
    /// Play one session against the reference host and record its press tape
    Simulate {
        #[arg(long)]
        seed: String,
        #[arg(long, conflicts_with = "config")]
        profile: Option<String>,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, default_value_t = MAX_TICKS_DEFAULT)]
        max_ticks: u32,
        /// released, held, or pulse:<period>:<duty>
        #[arg(long, default_value = "released")]
        input: String,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Re-run a press tape and check it reproduces the recorded outcome
    Replay {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, conflicts_with = "config")]
        profile: Option<String>,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, default_value_t = MAX_TICKS_DEFAULT)]
        max_ticks: u32,
    },
    /// Run every profile across a seed set
    Benchmark {
        #[arg(long)]
        profiles: Option<String>,
        #[arg(long)]
        seeds: Option<String>,
        #[arg(long)]
        seed_file: Option<PathBuf>,
        #[arg(long)]
        seed_start: Option<String>,
        #[arg(long, default_value_t = 32)]
        seed_count: u32,
        #[arg(long, default_value_t = MAX_TICKS_DEFAULT)]
        max_ticks: u32,
        #[arg(long, default_value = "released")]
        input: String,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long)]
        jobs: Option<usize>,
    },
}

fn resolve_config(profile: Option<&str>, config: Option<&Path>) -> Result<(String, AutoFishConfig)> {
    if let Some(path) = config {
        return Ok((path.display().to_string(), load_config(path)?));
    }
    let id = profile.unwrap_or("default");
    let cfg = create_profile(id).ok_or_else(|| {
        let available = profile_ids().join(", ");
        anyhow!("unknown profile '{id}'. available: {available}")
    })?;
    Ok((id.to_string(), cfg))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let Cli { command } = Cli::parse();

    match command {
        Commands::ShowConfig { profile, config } => {
            let (_, cfg) = resolve_config(profile.as_deref(), config.as_deref())?;
            let encoded =
                serde_json::to_string_pretty(&cfg).context("failed to serialize config")?;
            println!("{encoded}");
        }
        Commands::ListProfiles => {
            for (id, description) in describe_profiles() {
                println!("{id:14} {description}");
            }
        }
        Commands::Simulate {
            seed,
            profile,
            config,
            max_ticks,
            input,
            output,
        } => {
            let (label, cfg) = resolve_config(profile.as_deref(), config.as_deref())?;
            let seed = parse_seed(&seed)?;
            let mut input = parse_input(&input)?;
            let artifact = run_session(&label, cfg, seed, max_ticks, &mut *input)?;
            let metrics = &artifact.metrics;

            let output_path = output.unwrap_or_else(|| {
                PathBuf::from(format!(
                    "tapes/{}-{}-{}-ticks{}.tape",
                    metrics.profile_id.replace(['/', '\\'], "_"),
                    seed_to_hex(seed).replace("0x", "seed"),
                    metrics.outcome,
                    metrics.ticks
                ))
            });
            write_tape(&output_path, &artifact.tape)?;

            println!("profile={}", metrics.profile_id);
            println!("config_hash={}", metrics.config_hash);
            println!("seed={}", seed_to_hex(seed));
            println!("ticks={}", metrics.ticks);
            println!("outcome={}", metrics.outcome);
            println!("perfect={}", metrics.perfect);
            println!("boss={}", metrics.is_boss_fish);
            println!("treasure_appeared={}", metrics.treasure_appeared);
            println!("treasure_caught={}", metrics.treasure_caught);
            println!("final_distance={:.4}", metrics.final_distance);
            println!("press_ticks={}", metrics.press_ticks);
            println!("diverted_ticks={}", metrics.diverted_ticks);
            println!("diversion_switches={}", metrics.diversion_switches);
            println!("rng={:#010x}", metrics.final_rng_state);
            println!("output={}", output_path.display());
        }
        Commands::Replay {
            input,
            profile,
            config,
            max_ticks,
        } => {
            let (label, cfg) = resolve_config(profile.as_deref(), config.as_deref())?;
            let bytes =
                fs::read(&input).with_context(|| format!("failed reading {}", input.display()))?;
            let tape = parse_tape(&bytes, max_ticks)
                .with_context(|| format!("invalid tape {}", input.display()))?;
            let journal = verify_tape(&bytes, max_ticks, cfg)
                .with_context(|| format!("replay of {} under '{label}' diverged", input.display()))?;

            println!("input={}", input.display());
            println!("profile={label}");
            println!("seed={}", seed_to_hex(tape.header.seed));
            println!("ticks={}", journal.tick_count);
            println!("outcome={}", journal.outcome);
            println!("treasure_caught={}", journal.treasure_caught);
            println!("final_distance={:.4}", journal.final_distance);
            println!("press_ticks={}", journal.press_ticks);
            println!("checksum={:#010x}", journal.tape_checksum);
        }
        Commands::Benchmark {
            profiles,
            seeds,
            seed_file,
            seed_start,
            seed_count,
            max_ticks,
            input,
            out_dir,
            jobs,
        } => {
            let profiles = resolve_profiles(profiles.as_deref())?;
            for id in &profiles {
                if create_profile(id).is_none() {
                    let available = profile_ids().join(", ");
                    return Err(anyhow!("unknown profile '{id}'. available: {available}"));
                }
            }
            let seeds = resolve_seeds(
                seeds.as_deref(),
                seed_file.as_deref(),
                seed_start.as_deref(),
                seed_count,
            )?;
            let out_dir = out_dir
                .unwrap_or_else(|| PathBuf::from(format!("benchmarks/run-{}", timestamp_suffix())));

            let report = run_benchmark(BenchmarkConfig {
                profiles,
                seeds,
                max_ticks,
                input,
                out_dir: out_dir.clone(),
                jobs,
            })?;

            println!("runs={}", report.run_count);
            println!(
                "jobs={}",
                report
                    .jobs
                    .map(|value| value.to_string())
                    .unwrap_or_else(|| "auto".to_string())
            );
            println!("out_dir={}", out_dir.display());
            println!("profiles:");
            for (idx, agg) in report.profile_rankings.iter().enumerate() {
                println!(
                    "  {}. {}  catch={:.1}% perfect={:.1}% treasure={:.1}% avg_ticks={:.1} avg_to_catch={:.1}",
                    idx + 1,
                    agg.profile_id,
                    agg.catch_rate * 100.0,
                    agg.perfect_rate * 100.0,
                    agg.treasure_rate * 100.0,
                    agg.avg_ticks,
                    agg.avg_ticks_to_catch,
                );
            }
        }
    }

    Ok(())
}

fn timestamp_suffix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
