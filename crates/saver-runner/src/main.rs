//! Headless runner driving the Life Saver simulation at a fixed frame rate.

mod telemetry;

use anyhow::{bail, Context, Result};
use clap::Parser;
use saver_core::{SaverConfig, SeedConfig};
use saver_world::{FrameDelays, Simulation};
use std::path::PathBuf;
use std::time::Instant;
use tokio::signal;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    name = "saver-runner",
    version,
    about = "Run the Game of Life screensaver simulation without a window",
    allow_negative_numbers = true
)]
struct Cli {
    /// Maximum number of bouncing entities
    max_entities: i64,
    /// Gliders stamped onto the initial grid
    num_gliders: i64,
    /// Glider guns stamped onto the initial grid
    num_guns: i64,
    /// Small gliders stamped onto the initial grid
    num_small_gliders: i64,

    /// Stop after this many ticks (0 runs until Ctrl+C)
    #[arg(long, default_value_t = 0)]
    ticks: u64,

    /// Target ticks per second (0 runs unpaced)
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Worker threads for the simulation pool (defaults to one per core)
    #[arg(long)]
    threads: Option<usize>,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// JSON configuration file; positional arguments override its counts
    #[arg(long, env = "SAVER_CONFIG")]
    config: Option<PathBuf>,

    /// Number of frames in the sprite animation
    #[arg(long, default_value_t = 6)]
    frames: usize,

    /// Delay between sprite animation frames in milliseconds
    #[arg(long, default_value_t = 70)]
    frame_delay_ms: u32,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn build_config(&self) -> Result<SaverConfig> {
        let mut config = match &self.config {
            Some(path) => SaverConfig::from_json_file(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => SaverConfig::default(),
        };

        config.population = config
            .population
            .with_max_population(self.max_entities)
            .context("the number of entities must be greater than 0")?;
        config.seed = SeedConfig::from_signed(self.num_gliders, self.num_guns, self.num_small_gliders)?;
        if let Some(seed) = self.seed {
            config.rng_seed = seed;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    telemetry::init_telemetry(cli.json)?;

    let config = cli.build_config()?;
    let delays = FrameDelays::uniform(cli.frames, cli.frame_delay_ms)?;

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure worker pool")?;
    }

    info!("Starting Life Saver runner");
    info!(
        max_entities = config.population.max_population,
        gliders = config.seed.num_gliders,
        guns = config.seed.num_guns,
        small_gliders = config.seed.num_small_gliders,
        workers = rayon::current_num_threads(),
        "Configuration loaded"
    );

    let mut sim = Simulation::new(config)?;
    let started = Instant::now();

    if cli.fps == 0 {
        if cli.ticks == 0 {
            bail!("an unpaced run needs --ticks");
        }
        sim.run(cli.ticks);
    } else {
        run_paced(&mut sim, &cli, &delays, started).await;
    }

    let elapsed = started.elapsed();
    info!(
        ticks = sim.tick_count(),
        population = sim.population().len(),
        live_cells = sim.grid().live_count(),
        elapsed_ms = elapsed.as_millis() as u64,
        "Shutting down runner"
    );
    println!("Total Execution Time: {} ms", elapsed.as_millis());

    Ok(())
}

async fn run_paced(sim: &mut Simulation, cli: &Cli, delays: &FrameDelays, started: Instant) {
    let mut frames = interval(frame_period(cli.fps));
    frames.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    let mut window_start = Instant::now();
    let mut window_ticks = 0u32;

    loop {
        tokio::select! {
            _ = frames.tick() => {
                let report = sim.tick();
                sim.population_mut().animate(started.elapsed().as_millis() as u64, delays);

                window_ticks += 1;
                let window = window_start.elapsed();
                if window >= Duration::from_secs(1) {
                    let fps = window_ticks as f32 / window.as_secs_f32();
                    info!(
                        fps = format!("{:.2}", fps),
                        tick = report.tick,
                        population = report.population,
                        "Frame rate"
                    );
                    window_start = Instant::now();
                    window_ticks = 0;
                }

                if cli.ticks > 0 && report.tick >= cli.ticks {
                    info!("Reached {} ticks", cli.ticks);
                    break;
                }
            }
            _ = &mut shutdown => {
                break;
            }
        }
    }
}

/// Time between paced ticks, never zero
fn frame_period(fps: u32) -> Duration {
    (Duration::from_secs(1) / fps.max(1)).max(Duration::from_nanos(1))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("saver-runner").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_positional_arguments_build_config() {
        let cli = parse(&["25", "3", "1", "7", "--seed", "9"]);
        let config = cli.build_config().unwrap();

        assert_eq!(config.population.max_population, 25);
        assert_eq!(config.seed, SeedConfig::new(3, 1, 7));
        assert_eq!(config.rng_seed, 9);
    }

    #[test]
    fn test_non_positive_cap_rejected() {
        assert!(parse(&["0", "1", "1", "1"]).build_config().is_err());
        assert!(parse(&["-4", "1", "1", "1"]).build_config().is_err());
    }

    #[test]
    fn test_negative_pattern_count_rejected() {
        assert!(parse(&["10", "1", "-1", "1"]).build_config().is_err());
    }

    #[test]
    fn test_missing_arguments_is_usage_error() {
        assert!(Cli::try_parse_from(["saver-runner", "10", "1"]).is_err());
    }

    #[test]
    fn test_frame_period_is_never_zero() {
        assert_eq!(frame_period(60), Duration::from_secs(1) / 60);
        assert_eq!(frame_period(1), Duration::from_secs(1));
        assert_eq!(frame_period(2_000_000_000), Duration::from_nanos(1));
        assert_eq!(frame_period(u32::MAX), Duration::from_nanos(1));
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["10", "0", "0", "0"]);
        assert_eq!(cli.fps, 60);
        assert_eq!(cli.ticks, 0);
        assert!(cli.threads.is_none());
    }
}
