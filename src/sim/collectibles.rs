//! Coin spawning and lifetime
//!
//! Two spawn policies exist and a run uses exactly one:
//! - `Cooldown`: when a random cooldown (2-5 s) runs out there is a single
//!   spawn opportunity at the right screen edge. This is "one chance per
//!   window", not a Poisson process: the cooldown is redrawn whether or not
//!   the coin flip succeeded.
//! - `PerPlatform`: every freshly generated platform may carry a coin.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Aabb;
use super::platforms::{Platform, PlatformTrack};
use super::rng::{RandomSource, rejection_sample};
use crate::{SimConfig, SpawnPolicy};

/// A collectible coin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    /// Bottom-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl Collectible {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb {
            min: self.pos,
            size: self.size,
        }
    }
}

/// Spawn tuning copied out of [`SimConfig`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnRules {
    pub coin_size: Vec2,
    pub vertical_offset: f32,
    pub ceiling: f32,
    pub cooldown_probability: f32,
    pub per_platform_probability: f32,
    pub attached_offset: f32,
    pub cooldown_default: f32,
    pub cooldown_min: f32,
    pub cooldown_max: f32,
    pub tile_size: Vec2,
}

impl SpawnRules {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            coin_size: Vec2::new(config.coin_width, config.coin_height),
            vertical_offset: config.coin_vertical_offset,
            ceiling: config.coin_ceiling,
            cooldown_probability: config.cooldown_spawn_probability,
            per_platform_probability: config.per_platform_probability,
            attached_offset: config.attached_offset,
            cooldown_default: config.cooldown_default,
            cooldown_min: config.cooldown_min,
            cooldown_max: config.cooldown_max,
            tile_size: Vec2::new(config.tile_width, config.tile_height),
        }
    }
}

/// Owns every live coin and decides when new ones appear
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectibleSpawner {
    policy: SpawnPolicy,
    rules: SpawnRules,
    coins: Vec<Collectible>,
    /// Seconds until the next spawn opportunity (cooldown policy only)
    cooldown: f32,
    /// Shared clock for the coin spin animation
    animation_time: f32,
}

impl CollectibleSpawner {
    pub fn new(config: &SimConfig) -> Self {
        let rules = SpawnRules::from_config(config);
        Self {
            policy: config.spawn_policy,
            cooldown: rules.cooldown_default,
            rules,
            coins: Vec::new(),
            animation_time: 0.0,
        }
    }

    /// Advance spawning by one tick.
    ///
    /// `fresh` is how many platforms `track` gained this tick. Returns the
    /// number of coins spawned.
    pub fn update<R>(
        &mut self,
        dt: f32,
        track: &PlatformTrack,
        fresh: usize,
        screen_right_edge: f32,
        rng: &mut R,
    ) -> usize
    where
        R: RandomSource + ?Sized,
    {
        self.animation_time += dt;

        match self.policy {
            SpawnPolicy::Cooldown => {
                let Some(frontier) = track.frontier() else {
                    return 0;
                };
                self.update_cooldown(dt, frontier, screen_right_edge, rng) as usize
            }
            SpawnPolicy::PerPlatform => track
                .newest(fresh)
                .iter()
                .filter(|platform| self.try_attach(platform, &mut *rng))
                .count(),
        }
    }

    /// Count the cooldown down; when it hits zero, take the one spawn chance
    /// of this window and draw the next cooldown.
    fn update_cooldown<R>(
        &mut self,
        dt: f32,
        frontier: &Platform,
        screen_right_edge: f32,
        rng: &mut R,
    ) -> bool
    where
        R: RandomSource + ?Sized,
    {
        self.cooldown = (self.cooldown - dt).max(0.0);
        if self.cooldown > 0.0 {
            return false;
        }

        let spawned = rng.chance(self.rules.cooldown_probability);
        if spawned {
            let low = frontier.pos.y + self.rules.vertical_offset;
            let high = self.rules.ceiling;
            let y = rejection_sample(rng, low, high, "coin height", |y| y >= low && y <= high);
            self.coins.push(Collectible::new(
                screen_right_edge,
                y,
                self.rules.coin_size.x,
                self.rules.coin_size.y,
            ));
            log::debug!("Spawned coin at y={:.1}", y);
        }
        self.cooldown = rng.uniform(self.rules.cooldown_min, self.rules.cooldown_max);
        spawned
    }

    /// Maybe place a coin centred above a new platform
    fn try_attach<R>(&mut self, platform: &Platform, rng: &mut R) -> bool
    where
        R: RandomSource + ?Sized,
    {
        if !rng.chance(self.rules.per_platform_probability) {
            return false;
        }
        let rules = &self.rules;
        let x = platform.pos.x + rules.tile_size.x / 2.0 - rules.coin_size.x / 2.0;
        let y = platform.pos.y + rules.tile_size.y + rules.attached_offset;
        self.coins
            .push(Collectible::new(x, y, rules.coin_size.x, rules.coin_size.y));
        true
    }

    /// Drop coins that scrolled past the left edge
    pub fn evict(&mut self) -> usize {
        let before = self.coins.len();
        self.coins.retain(|coin| !coin.aabb().is_behind_left_edge());
        before - self.coins.len()
    }

    /// Move every coin left by `delta_x`
    pub fn scroll(&mut self, delta_x: f32) {
        for coin in &mut self.coins {
            coin.pos.x -= delta_x;
        }
    }

    /// Remove a coin that was picked up
    pub fn take(&mut self, index: usize) -> Collectible {
        self.coins.remove(index)
    }

    /// Clear all coins and restore the default cooldown
    pub fn reset(&mut self) {
        self.coins.clear();
        self.cooldown = self.rules.cooldown_default;
        self.animation_time = 0.0;
    }

    pub fn coins(&self) -> &[Collectible] {
        &self.coins
    }

    pub fn policy(&self) -> SpawnPolicy {
        self.policy
    }

    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }

    pub fn animation_time(&self) -> f32 {
        self.animation_time
    }

    #[cfg(test)]
    pub(crate) fn push(&mut self, coin: Collectible) {
        self.coins.push(coin);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::SimRng;
    use crate::sim::rng::testing::ScriptedRandom;
    use proptest::prelude::*;

    fn setup(policy: SpawnPolicy) -> (SimConfig, PlatformTrack, CollectibleSpawner) {
        let config = SimConfig::with_policy(policy);
        let track = PlatformTrack::new(&config);
        let spawner = CollectibleSpawner::new(&config);
        (config, track, spawner)
    }

    #[test]
    fn test_cooldown_counts_down_without_drawing() {
        let (_, track, mut spawner) = setup(SpawnPolicy::Cooldown);
        let mut rng = ScriptedRandom::new(&[0.0]);
        assert_eq!(spawner.update(1.5, &track, 0, 1171.0, &mut rng), 0);
        assert!((spawner.cooldown() - 0.5).abs() < 1e-6);
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_cooldown_spawn_at_screen_edge() {
        let (_, track, mut spawner) = setup(SpawnPolicy::Cooldown);
        // coin flip 0.2 (< 0.5 succeeds), height 0.5, next cooldown 0.0
        let mut rng = ScriptedRandom::new(&[0.2, 0.5, 0.0]);
        assert_eq!(spawner.update(2.5, &track, 0, 1171.0, &mut rng), 1);

        let coin = spawner.coins()[0];
        assert_eq!(coin.pos.x, 1171.0);
        // Frontier y is 100: window is [150, 509)
        assert!((coin.pos.y - 329.5).abs() < 1e-3);
        assert_eq!(coin.size, Vec2::new(60.0, 60.0));
        assert!((spawner.cooldown() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_failed_flip_still_redraws_cooldown() {
        let (_, track, mut spawner) = setup(SpawnPolicy::Cooldown);
        let mut rng = ScriptedRandom::new(&[0.9, 0.5]);
        assert_eq!(spawner.update(2.0, &track, 0, 1171.0, &mut rng), 0);
        assert!(spawner.coins().is_empty());
        assert!((spawner.cooldown() - 3.5).abs() < 1e-6);
    }

    #[test]
    fn test_cooldown_policy_ignores_fresh_platforms() {
        let (config, mut track, mut spawner) = setup(SpawnPolicy::Cooldown);
        let mut rng = SimRng::new(11);
        let fresh = track.generate_ahead(config.screen_right_edge(), &mut rng);
        assert_eq!(spawner.update(0.016, &track, fresh, 1171.0, &mut rng), 0);
    }

    #[test]
    fn test_per_platform_attaches_above_tile() {
        let (config, mut track, mut spawner) = setup(SpawnPolicy::PerPlatform);
        let mut rng = SimRng::new(4);
        let fresh = track.generate_ahead(config.screen_right_edge(), &mut rng);
        assert!(fresh > 0);

        // Always succeed
        let mut always = ScriptedRandom::new(&[0.0]);
        let spawned = spawner.update(0.016, &track, fresh, 1171.0, &mut always);
        assert_eq!(spawned, fresh);

        for (coin, platform) in spawner.coins().iter().zip(track.newest(fresh)) {
            assert_eq!(coin.pos.x, platform.pos.x + 115.0 - 30.0);
            assert_eq!(coin.pos.y, platform.pos.y + 40.0 + 75.0);
        }
    }

    #[test]
    fn test_per_platform_respects_probability() {
        let (_, track, mut spawner) = setup(SpawnPolicy::PerPlatform);
        // 0.29 < 0.3 succeeds, 0.31 fails
        let mut rng = ScriptedRandom::new(&[0.29, 0.31]);
        let spawned = spawner.update(0.016, &track, 2, 1171.0, &mut rng);
        assert_eq!(spawned, 1);
        // Only the older of the two newest platforms got one
        assert_eq!(spawner.coins()[0].pos.x, 1300.0 + 85.0);
    }

    #[test]
    fn test_scroll_and_evict() {
        let (_, _, mut spawner) = setup(SpawnPolicy::Cooldown);
        spawner.coins.push(Collectible::new(10.0, 200.0, 60.0, 60.0));
        spawner.coins.push(Collectible::new(500.0, 200.0, 60.0, 60.0));

        spawner.scroll(69.0);
        assert_eq!(spawner.evict(), 0);
        spawner.scroll(2.0);
        assert_eq!(spawner.evict(), 1);
        assert_eq!(spawner.coins().len(), 1);
        assert_eq!(spawner.coins()[0].pos.x, 429.0);
    }

    #[test]
    fn test_take_and_reset() {
        let (_, _, mut spawner) = setup(SpawnPolicy::Cooldown);
        spawner.coins.push(Collectible::new(10.0, 200.0, 60.0, 60.0));
        spawner.cooldown = 0.3;
        spawner.animation_time = 4.0;

        let coin = spawner.take(0);
        assert_eq!(coin.pos.x, 10.0);
        assert!(spawner.coins().is_empty());

        spawner.coins.push(coin);
        spawner.reset();
        assert!(spawner.coins().is_empty());
        assert_eq!(spawner.cooldown(), 2.0);
        assert_eq!(spawner.animation_time(), 0.0);
    }

    proptest! {
        #[test]
        fn prop_cooldown_coins_are_reachable(seed in any::<u64>(), ticks in 1usize..600) {
            let (config, mut track, mut spawner) = setup(SpawnPolicy::Cooldown);
            let mut rng = SimRng::new(seed);
            let dt = 1.0 / 60.0;
            let edge = config.screen_right_edge();

            for _ in 0..ticks {
                let fresh = track.generate_ahead(edge, &mut rng);
                track.evict_behind();
                let frontier_y = track.frontier().unwrap().pos.y;
                let before = spawner.coins().len();
                spawner.update(dt, &track, fresh, edge, &mut rng);
                if spawner.coins().len() > before {
                    let coin = spawner.coins().last().unwrap();
                    prop_assert!(coin.pos.y >= frontier_y + config.coin_vertical_offset);
                    prop_assert!(coin.pos.y <= config.coin_ceiling);
                }
                prop_assert!(spawner.cooldown() <= config.cooldown_max);
                spawner.evict();
                let step = config.background_speed * dt;
                track.scroll(step);
                spawner.scroll(step);
            }
        }
    }
}
