//! Lava Runner - A side-scrolling auto-runner platformer
//!
//! Core modules:
//! - `sim`: Headless simulation (platform generation, physics, collisions, game state)
//! - `config`: Data-driven tuning with construction-time validation
//! - `error`: Configuration error types
//! - `highscores`: Top-10 leaderboard model

pub mod config;
pub mod error;
pub mod highscores;
pub mod sim;

pub use config::{SimConfig, SpawnPolicy};
pub use error::{ConfigError, ConfigResult};
pub use highscores::HighScores;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep for the optional fixed-step driver (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest step a single tick simulates; longer frames are clamped
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Logical world dimensions (the visible screen)
    pub const WORLD_WIDTH: f32 = 1171.0;
    pub const WORLD_HEIGHT: f32 = 659.0;

    /// Tile defaults
    pub const TILE_WIDTH: f32 = 230.0;
    pub const TILE_HEIGHT: f32 = 40.0;
    /// Starting straight run: count, spacing and height
    pub const INITIAL_TILE_COUNT: usize = 15;
    pub const INITIAL_TILE_STEP: f32 = 100.0;
    pub const INITIAL_TILE_HEIGHT: f32 = 100.0;
    /// Platforms must already exist this far past the right screen edge
    pub const LOOKAHEAD_MARGIN: f32 = 500.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 120.0;
    pub const PLAYER_HEIGHT: f32 = 150.0;
    /// Collision box is narrower than the sprite
    pub const PLAYER_HITBOX_SCALE: f32 = 0.8;
    pub const PLAYER_SPAWN_Y: f32 = 135.0;

    /// Gravity (units/s², pulls toward the lava)
    pub const GRAVITY: f32 = 980.0;
    /// Upward velocity applied on jump
    pub const JUMP_VELOCITY: f32 = 600.0;
    /// World scroll speed (units/s)
    pub const BACKGROUND_SPEED: f32 = 300.0;

    /// Fraction of the platform height that must be below the player's feet to land
    pub const LANDING_THRESHOLD: f32 = 0.6;

    /// Coin defaults
    pub const COIN_SIZE: f32 = 60.0;
    pub const COIN_VERTICAL_OFFSET: f32 = 50.0;
    pub const COIN_CEILING: f32 = WORLD_HEIGHT - 150.0;
    pub const COOLDOWN_DEFAULT: f32 = 2.0;
    pub const COOLDOWN_MIN: f32 = 2.0;
    pub const COOLDOWN_MAX: f32 = 5.0;
}

/// Axis-aligned overlap test on raw extents (strict, touching edges don't overlap)
#[inline]
pub fn spans_overlap(a_min: f32, a_len: f32, b_min: f32, b_len: f32) -> bool {
    a_min < b_min + b_len && a_min + a_len > b_min
}
