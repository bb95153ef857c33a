//! Game state and core simulation types
//!
//! `Simulation` owns every piece of world state. Collaborators (renderer,
//! HUD, sound) only read it through the accessors here and react to the
//! events each tick returns.

use serde::{Deserialize, Serialize};

use super::collectibles::{Collectible, CollectibleSpawner};
use super::parallax::ParallaxBackground;
use super::platforms::{Platform, PlatformTrack};
use super::player::{PlayerBody, PlayerPose};
use super::rng::SimRng;
use super::score::ScoreTracker;
use crate::{ConfigResult, SimConfig};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Start screen: player idles, nothing scrolls
    Start,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Player died; only the death animation advances until reset
    GameOver,
}

/// One-shot notifications for sound/effects collaborators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A run started from the start screen
    RunStarted,
    JumpStarted,
    /// Touched down after being airborne
    Landed { platform: Platform },
    CoinCollected { coin: Collectible },
    /// Fell into the lava (play the game over sound once)
    Died { score: u32 },
}

/// Summary of one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickEvents {
    /// 0 or 1: at most one coin is collected per tick
    pub score_delta: u32,
    pub died: bool,
    /// Touched down this tick after being airborne
    pub landed: bool,
    pub events: Vec<GameEvent>,
}

impl TickEvents {
    pub fn push(&mut self, event: GameEvent) {
        match event {
            GameEvent::CoinCollected { .. } => self.score_delta += 1,
            GameEvent::Died { .. } => self.died = true,
            GameEvent::Landed { .. } => self.landed = true,
            GameEvent::RunStarted | GameEvent::JumpStarted => {}
        }
        self.events.push(event);
    }

    /// Fold another tick's events into this one (used across substeps)
    pub fn absorb(&mut self, other: TickEvents) {
        for event in other.events {
            self.push(event);
        }
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct Simulation {
    pub(crate) config: SimConfig,
    pub(crate) rng: SimRng,
    pub(crate) phase: GamePhase,
    pub(crate) track: PlatformTrack,
    pub(crate) spawner: CollectibleSpawner,
    pub(crate) player: PlayerBody,
    pub(crate) score: ScoreTracker,
    pub(crate) parallax: ParallaxBackground,
    /// Player stood on a platform at the end of the previous tick. Runs
    /// start on the initial platform row.
    pub(crate) grounded: bool,
    /// Simulated ticks this run
    pub(crate) time_ticks: u64,
    /// Simulated seconds this run
    pub(crate) elapsed: f32,
}

impl Simulation {
    /// Validate the config and build a simulation on the start screen
    pub fn new(config: SimConfig, seed: u64) -> ConfigResult<Self> {
        config.validate()?;
        log::info!(
            "Simulation created with seed {} (coin policy {})",
            seed,
            config.spawn_policy.as_str()
        );
        Ok(Self {
            rng: SimRng::new(seed),
            phase: GamePhase::Start,
            track: PlatformTrack::new(&config),
            spawner: CollectibleSpawner::new(&config),
            player: PlayerBody::new(&config),
            score: ScoreTracker::new(),
            parallax: ParallaxBackground::new(&config),
            grounded: false,
            time_ticks: 0,
            elapsed: 0.0,
            config,
        })
    }

    /// Build with default tuning
    pub fn with_seed(seed: u64) -> ConfigResult<Self> {
        Self::new(SimConfig::default(), seed)
    }

    /// Leave the start screen. Returns false if not on the start screen.
    pub fn begin_run(&mut self) -> bool {
        if self.phase != GamePhase::Start {
            return false;
        }
        self.phase = GamePhase::Playing;
        self.player.start_running();
        self.grounded = true;
        log::info!("Run started");
        true
    }

    /// Throw away the current run and start a fresh one. The random stream
    /// continues, so consecutive runs get different worlds.
    ///
    /// Only call between ticks.
    pub fn reset(&mut self) {
        self.track.reset();
        self.spawner.reset();
        self.player.reset();
        self.score.reset();
        self.parallax.reset();
        self.grounded = true;
        self.time_ticks = 0;
        self.elapsed = 0.0;
        self.phase = GamePhase::Playing;
        log::info!("Run reset");
    }

    /// Reset and reseed, for reproducible runs
    pub fn reset_with_seed(&mut self, seed: u64) {
        self.rng = SimRng::new(seed);
        self.reset();
    }

    /// Toggle pause. Only a live run can be paused.
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            other => other,
        };
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Live platforms in ascending x order
    pub fn platforms(&self) -> &[Platform] {
        self.track.platforms()
    }

    /// Live coins
    pub fn collectibles(&self) -> &[Collectible] {
        self.spawner.coins()
    }

    pub fn player_pose(&self) -> PlayerPose {
        self.player.pose()
    }

    pub fn score(&self) -> u32 {
        self.score.score()
    }

    pub fn track(&self) -> &PlatformTrack {
        &self.track
    }

    pub fn spawner(&self) -> &CollectibleSpawner {
        &self.spawner
    }

    pub fn parallax(&self) -> &ParallaxBackground {
        &self.parallax
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}
