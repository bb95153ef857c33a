//! Configuration error types.
//!
//! Every tuning combination that would make a rejection-sampling loop spin
//! forever is caught here, before a simulation is ever built.

/// Why a [`SimConfig`](crate::SimConfig) was rejected.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Tile distance range is invalid: min {min} must be positive and not above max {max}")]
    TileDistance { min: f32, max: f32 },

    #[error("Vertical distance range is empty: min {min} must be below max {max}")]
    VerticalDistance { min: f32, max: f32 },

    #[error("Height range is empty: min height {min} must be below max height {max}")]
    HeightRange { min: f32, max: f32 },

    #[error(
        "No reachable tile height exists: half the height range ({half_range}) must exceed the minimum vertical distance ({min_vertical})"
    )]
    UnreachableHeight { half_range: f32, min_vertical: f32 },

    #[error(
        "Platform heights are too hard to hit: a legal step covers only {share} of the height range, at least {min_share} is required"
    )]
    NarrowHeightWindow { share: f32, min_share: f32 },

    #[error("Background speed must be finite and not negative, got {0}")]
    BackgroundSpeed(f32),

    #[error("Lookahead margin must be finite and not negative, got {0}")]
    LookaheadMargin(f32),

    #[error(
        "Scrolling is too fast: one tick can move {step}, which must stay below lookahead + screen + tile width ({limit})"
    )]
    ScrollTooFast { step: f32, limit: f32 },

    #[error("Initial tile offset must be finite and not negative, got {0}")]
    InitialOffset(f32),

    #[error("Initial tile height {height} lies outside [{min}, {max}]")]
    InitialHeight { height: f32, min: f32, max: f32 },

    #[error("Coin window is empty: highest tile {max_height} + offset {offset} reaches the ceiling {ceiling}")]
    CoinWindow {
        max_height: f32,
        offset: f32,
        ceiling: f32,
    },

    #[error("Cooldown range is invalid: min {min} must be positive and below max {max}")]
    CooldownRange { min: f32, max: f32 },

    #[error("Probability {name} = {value} is outside [0, 1]")]
    Probability { name: &'static str, value: f32 },

    #[error("{name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f32 },

    #[error("Landing threshold {0} must lie in (0, 1]")]
    LandingThreshold(f32),

    #[error("Config parsing failed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
