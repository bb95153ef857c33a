//! Simulation tuning
//!
//! Consumed once at construction and validated there; the simulation never
//! re-checks it at runtime.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, ConfigResult};

/// Smallest share of height draws that must be legal platform steps.
/// At this share, exhausting `MAX_SAMPLING_ATTEMPTS` has odds around e^-1000.
pub const MIN_HEIGHT_ACCEPTANCE: f32 = 1e-3;

/// How coins enter the world. One policy is picked per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SpawnPolicy {
    /// One spawn opportunity each time a random cooldown runs out
    #[default]
    Cooldown,
    /// Each freshly generated platform may carry a coin
    PerPlatform,
}

impl SpawnPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpawnPolicy::Cooldown => "Cooldown",
            SpawnPolicy::PerPlatform => "PerPlatform",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cooldown" => Some(SpawnPolicy::Cooldown),
            "perplatform" | "per_platform" | "per-platform" => Some(SpawnPolicy::PerPlatform),
            _ => None,
        }
    }
}

/// Full simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === World ===
    /// Visible screen width; its right edge is the generation reference
    pub world_width: f32,
    /// Visible screen height
    pub world_height: f32,
    /// World scroll speed (units/s)
    pub background_speed: f32,

    // === Platforms ===
    pub tile_width: f32,
    pub tile_height: f32,
    pub min_tile_distance: f32,
    pub max_tile_distance: f32,
    pub min_vertical_distance: f32,
    pub max_vertical_distance: f32,
    /// Lowest y any generated platform may have
    pub min_height: f32,
    /// Highest y any generated platform may have
    pub max_height: f32,
    pub initial_tile_count: usize,
    pub initial_tile_step: f32,
    pub initial_tile_height: f32,
    /// x of the first platform of the starting run
    pub initial_tile_offset: f32,
    pub lookahead_margin: f32,

    // === Player ===
    pub player_x: f32,
    pub player_spawn_y: f32,
    pub player_width: f32,
    pub player_height: f32,
    pub player_hitbox_scale: f32,
    pub gravity: f32,
    pub jump_velocity: f32,
    /// Share of the platform height that must be below the feet to count as landed
    pub landing_threshold: f32,

    // === Coins ===
    pub spawn_policy: SpawnPolicy,
    pub coin_width: f32,
    pub coin_height: f32,
    /// Cooldown coins spawn at least this far above the newest platform
    pub coin_vertical_offset: f32,
    /// Cooldown coins never spawn above this y
    pub coin_ceiling: f32,
    /// Chance of a spawn when the cooldown runs out
    pub cooldown_spawn_probability: f32,
    /// Chance a new platform carries a coin
    pub per_platform_probability: f32,
    /// Height of an attached coin above its platform's top
    pub attached_offset: f32,
    pub cooldown_default: f32,
    pub cooldown_min: f32,
    pub cooldown_max: f32,

    // === Background ===
    /// Width of one parallax layer image
    pub layer_width: f32,
    /// Width of one ground strip segment
    pub ground_width: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            // World
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            background_speed: BACKGROUND_SPEED,

            // Platforms
            tile_width: TILE_WIDTH,
            tile_height: TILE_HEIGHT,
            min_tile_distance: 300.0,
            max_tile_distance: 600.0,
            min_vertical_distance: 130.0,
            max_vertical_distance: 170.0,
            min_height: 64.0,
            max_height: WORLD_HEIGHT - 300.0,
            initial_tile_count: INITIAL_TILE_COUNT,
            initial_tile_step: INITIAL_TILE_STEP,
            initial_tile_height: INITIAL_TILE_HEIGHT,
            initial_tile_offset: 0.0,
            lookahead_margin: LOOKAHEAD_MARGIN,

            // Player
            player_x: WORLD_WIDTH / 2.0,
            player_spawn_y: PLAYER_SPAWN_Y,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            player_hitbox_scale: PLAYER_HITBOX_SCALE,
            gravity: GRAVITY,
            jump_velocity: JUMP_VELOCITY,
            landing_threshold: LANDING_THRESHOLD,

            // Coins
            spawn_policy: SpawnPolicy::Cooldown,
            coin_width: COIN_SIZE,
            coin_height: COIN_SIZE,
            coin_vertical_offset: COIN_VERTICAL_OFFSET,
            coin_ceiling: COIN_CEILING,
            cooldown_spawn_probability: 0.5,
            per_platform_probability: 0.3,
            attached_offset: PLAYER_HEIGHT / 2.0,
            cooldown_default: COOLDOWN_DEFAULT,
            cooldown_min: COOLDOWN_MIN,
            cooldown_max: COOLDOWN_MAX,

            // Background
            layer_width: WORLD_WIDTH,
            ground_width: 128.0,
        }
    }
}

impl SimConfig {
    /// Default tuning with a different coin policy
    pub fn with_policy(policy: SpawnPolicy) -> Self {
        Self {
            spawn_policy: policy,
            ..Self::default()
        }
    }

    /// Parse a (possibly partial) JSON config and validate it
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        log::info!(
            "Loaded config (policy {}, tiles {}-{})",
            config.spawn_policy.as_str(),
            config.min_tile_distance,
            config.max_tile_distance
        );
        Ok(config)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// x of the right screen edge, the generation reference point
    #[inline]
    pub fn screen_right_edge(&self) -> f32 {
        self.world_width
    }

    /// Reject every combination that would leave a rejection-sampling
    /// acceptance region empty or vanishingly small, let the generation
    /// frontier fall behind the screen, or feed NaN into the world.
    pub fn validate(&self) -> ConfigResult<()> {
        let positives = [
            ("world_width", self.world_width),
            ("world_height", self.world_height),
            ("tile_width", self.tile_width),
            ("tile_height", self.tile_height),
            ("initial_tile_count", self.initial_tile_count as f32),
            ("initial_tile_step", self.initial_tile_step),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("player_hitbox_scale", self.player_hitbox_scale),
            ("gravity", self.gravity),
            ("jump_velocity", self.jump_velocity),
            ("coin_width", self.coin_width),
            ("coin_height", self.coin_height),
            ("cooldown_default", self.cooldown_default),
            ("layer_width", self.layer_width),
            ("ground_width", self.ground_width),
        ];
        for (name, value) in positives {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        if !(self.background_speed >= 0.0 && self.background_speed.is_finite()) {
            return Err(ConfigError::BackgroundSpeed(self.background_speed));
        }
        if !(self.lookahead_margin >= 0.0 && self.lookahead_margin.is_finite()) {
            return Err(ConfigError::LookaheadMargin(self.lookahead_margin));
        }
        if !(self.initial_tile_offset >= 0.0 && self.initial_tile_offset.is_finite()) {
            return Err(ConfigError::InitialOffset(self.initial_tile_offset));
        }

        // The frontier never sits further right than this, and each step
        // must still move it there in f32
        let farthest = self.world_width + self.lookahead_margin + self.max_tile_distance;
        if !(self.min_tile_distance > 0.0
            && self.min_tile_distance <= self.max_tile_distance
            && farthest.is_finite()
            && farthest + self.min_tile_distance > farthest)
        {
            return Err(ConfigError::TileDistance {
                min: self.min_tile_distance,
                max: self.max_tile_distance,
            });
        }

        if !(self.min_vertical_distance >= 0.0
            && self.min_vertical_distance < self.max_vertical_distance
            && self.max_vertical_distance.is_finite())
        {
            return Err(ConfigError::VerticalDistance {
                min: self.min_vertical_distance,
                max: self.max_vertical_distance,
            });
        }

        if !(self.min_height < self.max_height
            && self.min_height.is_finite()
            && self.max_height.is_finite())
        {
            return Err(ConfigError::HeightRange {
                min: self.min_height,
                max: self.max_height,
            });
        }

        // From the middle of the range, both directions are shortest. If even
        // the longer one can't fit the minimum step, some heights are dead ends.
        let range = self.max_height - self.min_height;
        let half_range = range / 2.0;
        if !(half_range > self.min_vertical_distance) {
            return Err(ConfigError::UnreachableHeight {
                half_range,
                min_vertical: self.min_vertical_distance,
            });
        }

        // From any height the side facing the far end of the range has at
        // least half the range of room, so this many draws land in a legal
        // step however unlucky the previous platform was.
        let window = (self.max_vertical_distance - self.min_vertical_distance)
            .min(half_range - self.min_vertical_distance);
        let share = window / range;
        if !(share >= MIN_HEIGHT_ACCEPTANCE) {
            return Err(ConfigError::NarrowHeightWindow {
                share,
                min_share: MIN_HEIGHT_ACCEPTANCE,
            });
        }

        // After a tick the frontier is at least lookahead past the screen; the
        // next tick's scroll must not carry it off the left edge
        let step = self.background_speed * MAX_FRAME_DT;
        let limit = self.lookahead_margin + self.world_width + self.tile_width;
        if !(step < limit) {
            return Err(ConfigError::ScrollTooFast { step, limit });
        }

        if !(self.initial_tile_height >= self.min_height
            && self.initial_tile_height <= self.max_height)
        {
            return Err(ConfigError::InitialHeight {
                height: self.initial_tile_height,
                min: self.min_height,
                max: self.max_height,
            });
        }

        if !(self.max_height + self.coin_vertical_offset < self.coin_ceiling) {
            return Err(ConfigError::CoinWindow {
                max_height: self.max_height,
                offset: self.coin_vertical_offset,
                ceiling: self.coin_ceiling,
            });
        }

        if !(self.cooldown_min > 0.0 && self.cooldown_min < self.cooldown_max) {
            return Err(ConfigError::CooldownRange {
                min: self.cooldown_min,
                max: self.cooldown_max,
            });
        }

        for (name, value) in [
            ("cooldown_spawn_probability", self.cooldown_spawn_probability),
            ("per_platform_probability", self.per_platform_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Probability { name, value });
            }
        }

        if !(self.landing_threshold > 0.0 && self.landing_threshold <= 1.0) {
            return Err(ConfigError::LandingThreshold(self.landing_threshold));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_height, 359.0);
        assert_eq!(config.screen_right_edge(), 1171.0);
    }

    #[test]
    fn test_inverted_vertical_distance_rejected() {
        let config = SimConfig {
            min_vertical_distance: 170.0,
            max_vertical_distance: 130.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::VerticalDistance { .. })
        ));
    }

    #[test]
    fn test_empty_height_range_rejected() {
        let config = SimConfig {
            min_height: 300.0,
            max_height: 300.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::HeightRange { .. })
        ));
    }

    #[test]
    fn test_height_range_too_narrow_for_min_step() {
        // 64..300 has a midpoint 118 away from both ends, below the 130 step
        let config = SimConfig {
            max_height: 300.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnreachableHeight { .. })
        ));
    }

    #[test]
    fn test_coin_window_must_clear_highest_tile() {
        let config = SimConfig {
            coin_ceiling: 400.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CoinWindow { .. })
        ));
    }

    #[test]
    fn test_nan_is_rejected() {
        let config = SimConfig {
            gravity: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { name: "gravity", .. })
        ));
    }

    #[test]
    fn test_background_speed_must_be_finite() {
        for speed in [f32::NAN, f32::INFINITY, -1.0] {
            let config = SimConfig {
                background_speed: speed,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::BackgroundSpeed(_))
            ));
        }
    }

    #[test]
    fn test_lookahead_margin_must_be_finite() {
        for margin in [f32::NAN, f32::INFINITY, -10.0] {
            let config = SimConfig {
                lookahead_margin: margin,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::LookaheadMargin(_))
            ));
        }
    }

    #[test]
    fn test_scroll_faster_than_lookahead_rejected() {
        // 3000 per tick against 500 + 1171 + 230
        let config = SimConfig {
            background_speed: 30_000.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ScrollTooFast { .. })
        ));

        let config = SimConfig {
            background_speed: 18_000.0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_hairline_vertical_window_rejected() {
        let config = SimConfig {
            max_vertical_distance: 130.00003,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NarrowHeightWindow { .. })
        ));
    }

    #[test]
    fn test_min_step_just_under_half_range_rejected() {
        // 64..359: half range 147.5 leaves 0.01 of room above the minimum step
        let config = SimConfig {
            min_vertical_distance: 147.49,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NarrowHeightWindow { .. })
        ));
    }

    #[test]
    fn test_unbounded_tile_distance_rejected() {
        let config = SimConfig {
            max_tile_distance: f32::INFINITY,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TileDistance { .. })
        ));
    }

    #[test]
    fn test_negative_initial_offset_rejected() {
        let config = SimConfig {
            initial_tile_offset: -300.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InitialOffset(_))
        ));
    }

    #[test]
    fn test_probability_bounds() {
        let config = SimConfig {
            per_platform_probability: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Probability { .. })
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SimConfig::from_json(r#"{ "background_speed": 250.0, "spawn_policy": "PerPlatform" }"#)
            .expect("valid config");
        assert_eq!(config.background_speed, 250.0);
        assert_eq!(config.spawn_policy, SpawnPolicy::PerPlatform);
        assert_eq!(config.tile_width, TILE_WIDTH);
    }

    #[test]
    fn test_json_invalid_values_rejected() {
        let result = SimConfig::from_json(r#"{ "min_height": 500.0 }"#);
        assert!(matches!(result, Err(ConfigError::HeightRange { .. })));

        let result = SimConfig::from_json("not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_json_roundtrip_preserves_policy() {
        let config = SimConfig::with_policy(SpawnPolicy::PerPlatform);
        let json = config.to_json().unwrap();
        let back = SimConfig::from_json(&json).unwrap();
        assert_eq!(back.spawn_policy, SpawnPolicy::PerPlatform);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(SpawnPolicy::from_str("COOLDOWN"), Some(SpawnPolicy::Cooldown));
        assert_eq!(SpawnPolicy::from_str("per-platform"), Some(SpawnPolicy::PerPlatform));
        assert_eq!(SpawnPolicy::from_str("poisson"), None);
    }
}
