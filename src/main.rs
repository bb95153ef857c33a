//! Lava Runner entry point
//!
//! Headless demo: plays a few autopilot runs and prints the leaderboard.
//!
//! Usage: `lava-runner [config.json|-] [cooldown|per-platform]`. Set
//! `LAVA_RUNNER_SEED` for a reproducible session and `RUST_LOG=debug` for
//! spawn details.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::error::Error;
    use std::time::{SystemTime, UNIX_EPOCH};

    use lava_runner::sim::{FixedStepper, GameEvent, GamePhase, Simulation, TickInput};
    use lava_runner::{HighScores, SimConfig, SpawnPolicy};

    /// Runs per session
    const RUNS: usize = 5;
    /// Display frame time fed to the fixed-step driver
    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Give up on a run after two simulated minutes
    const MAX_FRAMES: u32 = 60 * 120;

    fn load_config() -> Result<SimConfig, Box<dyn Error>> {
        let mut args = std::env::args().skip(1);
        let mut config = match args.next().filter(|path| path.as_str() != "-") {
            Some(path) => {
                let json = std::fs::read_to_string(&path)
                    .map_err(|e| format!("Cannot read config {}: {}", path, e))?;
                SimConfig::from_json(&json)?
            }
            None => SimConfig::default(),
        };
        if let Some(name) = args.next() {
            config.spawn_policy = SpawnPolicy::from_str(&name)
                .ok_or_else(|| format!("Unknown coin policy '{}'", name))?;
            log::info!("Coin policy {}", config.spawn_policy.as_str());
        }
        Ok(config)
    }

    fn session_seed() -> u64 {
        if let Some(seed) = std::env::var("LAVA_RUNNER_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            return seed;
        }
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }

    /// Play one run to death or the frame limit, returning the score
    fn play_run(sim: &mut Simulation, stepper: &mut FixedStepper) -> u32 {
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        let mut jumps = 0;

        for frame in 0..MAX_FRAMES {
            let events = stepper.advance(sim, &input, FRAME_DT);
            for event in &events.events {
                match event {
                    GameEvent::JumpStarted => jumps += 1,
                    GameEvent::CoinCollected { coin } => {
                        log::debug!("Coin at y={:.0} (score {})", coin.pos.y, sim.score())
                    }
                    _ => {}
                }
            }
            if sim.phase() == GamePhase::GameOver {
                log::info!(
                    "Run over after {:.1}s: {} coins, {} jumps",
                    frame as f32 * FRAME_DT,
                    sim.score(),
                    jumps
                );
                return sim.score();
            }
        }

        log::info!("Run survived the frame limit with {} coins", sim.score());
        sim.score()
    }

    pub fn run() -> Result<(), Box<dyn Error>> {
        let config = load_config()?;
        let seed = session_seed();
        let mut sim = Simulation::new(config, seed)?;
        let mut stepper = FixedStepper::new();
        let mut scores = HighScores::new();

        sim.begin_run();
        for run in 1..=RUNS {
            if run > 1 {
                sim.reset();
            }
            let score = play_run(&mut sim, &mut stepper);
            if let Some(rank) = scores.add_score(&format!("autopilot-{run}"), score) {
                log::info!("Run {} placed #{}", run, rank);
            }
        }

        println!("Seed {seed}");
        for (i, entry) in scores.entries.iter().enumerate() {
            println!("{:>2}. {:<16} {}", i + 1, entry.name, entry.score);
        }
        log::debug!("Leaderboard JSON: {}", scores.to_json()?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Lava Runner (headless) starting...");

    if let Err(e) = native::run() {
        log::error!("{}", e);
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is embedded by a host page; nothing to run here
}
