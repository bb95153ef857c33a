//! Procedural platform track
//!
//! Platforms are kept in ascending x order: generation only appends past the
//! frontier and eviction only removes from the front, so the oldest platform
//! is always the one closest to scrolling off.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Aabb;
use super::rng::{RandomSource, rejection_sample};
use crate::SimConfig;

/// A single platform (tile), anchored at its bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub pos: Vec2,
}

impl Platform {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
        }
    }
}

/// Spacing rules for generated platforms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackRules {
    pub min_tile_distance: f32,
    pub max_tile_distance: f32,
    pub min_vertical_distance: f32,
    pub max_vertical_distance: f32,
    pub min_height: f32,
    pub max_height: f32,
    pub lookahead_margin: f32,
    pub initial_count: usize,
    pub initial_step: f32,
    pub initial_height: f32,
    pub initial_offset: f32,
}

impl TrackRules {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            min_tile_distance: config.min_tile_distance,
            max_tile_distance: config.max_tile_distance,
            min_vertical_distance: config.min_vertical_distance,
            max_vertical_distance: config.max_vertical_distance,
            min_height: config.min_height,
            max_height: config.max_height,
            lookahead_margin: config.lookahead_margin,
            initial_count: config.initial_tile_count,
            initial_step: config.initial_tile_step,
            initial_height: config.initial_tile_height,
            initial_offset: config.initial_tile_offset,
        }
    }

    /// Whether a height step between neighbouring platforms is allowed
    #[inline]
    pub fn accepts_step(&self, from_y: f32, to_y: f32) -> bool {
        let dy = (to_y - from_y).abs();
        dy >= self.min_vertical_distance && dy <= self.max_vertical_distance
    }
}

/// The ordered, endlessly extended sequence of platforms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformTrack {
    rules: TrackRules,
    width: f32,
    height: f32,
    platforms: Vec<Platform>,
}

impl PlatformTrack {
    /// Build a track holding the starting run
    pub fn new(config: &SimConfig) -> Self {
        let mut track = Self {
            rules: TrackRules::from_config(config),
            width: config.tile_width,
            height: config.tile_height,
            platforms: Vec::new(),
        };
        track.initialize();
        track
    }

    /// Lay out the safe starting run: evenly spaced, all at the same low height
    pub fn initialize(&mut self) {
        let rules = &self.rules;
        self.platforms.extend((0..rules.initial_count).map(|i| {
            Platform::new(
                rules.initial_offset + i as f32 * rules.initial_step,
                rules.initial_height,
            )
        }));
    }

    /// Append platforms until the frontier lies `lookahead_margin` past the
    /// right screen edge. Returns how many were appended; they are the last
    /// entries of [`platforms`](Self::platforms).
    pub fn generate_ahead<R>(&mut self, screen_right_edge: f32, rng: &mut R) -> usize
    where
        R: RandomSource + ?Sized,
    {
        let mut last = *self
            .platforms
            .last()
            .expect("generate_ahead on an empty track: the frontier was evicted");
        assert!(
            last.pos.x + self.width >= 0.0,
            "generation frontier x={} is behind the left screen edge",
            last.pos.x
        );

        let target = screen_right_edge + self.rules.lookahead_margin;
        let mut added = 0;
        while last.pos.x < target {
            let distance = rng.uniform(self.rules.min_tile_distance, self.rules.max_tile_distance);
            let y = self.sample_height(last.pos.y, rng);
            last = Platform::new(last.pos.x + distance, y);
            self.platforms.push(last);
            added += 1;
        }

        if added > 0 {
            log::trace!("Generated {} platforms, frontier at x={:.1}", added, last.pos.x);
        }
        added
    }

    /// Rejection-sample a height within range and a legal step from `last_y`
    fn sample_height<R>(&self, last_y: f32, rng: &mut R) -> f32
    where
        R: RandomSource + ?Sized,
    {
        let rules = &self.rules;
        rejection_sample(rng, rules.min_height, rules.max_height, "platform height", |y| {
            rules.accepts_step(last_y, y)
        })
    }

    /// Drop platforms that have scrolled fully past the left edge.
    ///
    /// The frontier platform is never evicted; generation needs it.
    pub fn evict_behind(&mut self) -> usize {
        assert!(!self.platforms.is_empty(), "evict_behind on an empty track");

        let keep_last = self.platforms.len() - 1;
        let stale = self.platforms[..keep_last]
            .iter()
            .take_while(|p| p.pos.x + self.width < 0.0)
            .count();
        self.platforms.drain(..stale);
        stale
    }

    /// Move every platform left by `delta_x`
    pub fn scroll(&mut self, delta_x: f32) {
        for platform in &mut self.platforms {
            platform.pos.x -= delta_x;
        }
    }

    /// Clear and lay out the starting run again
    pub fn reset(&mut self) {
        self.platforms.clear();
        self.initialize();
    }

    /// All live platforms, ordered by ascending x
    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    /// The most recently generated platform
    pub fn frontier(&self) -> Option<&Platform> {
        self.platforms.last()
    }

    /// The `count` most recently generated platforms
    pub fn newest(&self, count: usize) -> &[Platform] {
        let start = self.platforms.len().saturating_sub(count);
        &self.platforms[start..]
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn rules(&self) -> &TrackRules {
        &self.rules
    }

    /// Collision box of a platform on this track
    #[inline]
    pub fn aabb(&self, platform: &Platform) -> Aabb {
        Aabb::new(platform.pos.x, platform.pos.y, self.width, self.height)
    }
}
