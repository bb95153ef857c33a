//! Collision detection and response
//!
//! One authoritative pass per tick, always in this order:
//! 1. Platform landing, only while falling or resting (rising through a
//!    platform from below never collides).
//! 2. Coin pickup, at most one per tick.
//! 3. Lava check: touching y <= 0 kills the player.

use super::collectibles::{Collectible, CollectibleSpawner};
use super::geometry::Aabb;
use super::platforms::PlatformTrack;
use super::player::PlayerBody;
use super::score::ScoreTracker;

/// What the collision pass did this tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    /// Index (in track order) of the platform landed on
    pub landed_on: Option<usize>,
    /// Coin picked up this tick
    pub collected: Option<Collectible>,
    /// Player hit the lava this tick
    pub died: bool,
}

impl CollisionReport {
    pub fn landed(&self) -> bool {
        self.landed_on.is_some()
    }
}

/// Find the first platform the player lands on.
///
/// Landing needs an overlap AND the feet at or above `threshold` of the
/// platform's height, so brushing a platform's side never counts. Platforms
/// are in spatial order, so the first hit is the nearest one.
pub fn find_landing(player_box: &Aabb, track: &PlatformTrack, threshold: f32) -> Option<usize> {
    let min_feet = track.height() * threshold;
    track.platforms().iter().position(|platform| {
        let tile = track.aabb(platform);
        player_box.overlaps(&tile) && player_box.min.y >= tile.min.y + min_feet
    })
}

/// Find the first coin overlapping the player
pub fn find_pickup(player_box: &Aabb, coins: &[Collectible]) -> Option<usize> {
    coins.iter().position(|coin| player_box.overlaps(&coin.aabb()))
}

/// Whether the feet have reached the lava
#[inline]
pub fn touches_lava(player: &PlayerBody) -> bool {
    player.pos.y <= 0.0
}

/// Resolves player/world interactions. Borrows its collaborators for the
/// duration of one pass and keeps nothing between ticks.
pub struct CollisionResolver<'a> {
    pub player: &'a mut PlayerBody,
    pub track: &'a PlatformTrack,
    pub spawner: &'a mut CollectibleSpawner,
    pub score: &'a mut ScoreTracker,
    pub landing_threshold: f32,
}

impl CollisionResolver<'_> {
    pub fn resolve(self) -> CollisionReport {
        let Self {
            player,
            track,
            spawner,
            score,
            landing_threshold,
        } = self;

        let mut report = CollisionReport::default();
        if !player.is_simulated() {
            return report;
        }

        if player.vertical_velocity <= 0.0 {
            if let Some(index) = find_landing(&player.hitbox(), track, landing_threshold) {
                let top = track.aabb(&track.platforms()[index]).top();
                player.land_on(top);
                report.landed_on = Some(index);
            }
        }

        if let Some(index) = find_pickup(&player.hitbox(), spawner.coins()) {
            report.collected = Some(spawner.take(index));
            score.increase();
        }

        if touches_lava(player) {
            player.kill();
            report.died = true;
            log::info!("Player fell into the lava (score {})", score.score());
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SimConfig;

    struct World {
        player: PlayerBody,
        track: PlatformTrack,
        spawner: CollectibleSpawner,
        score: ScoreTracker,
        config: SimConfig,
    }

    impl World {
        fn new() -> Self {
            let config = SimConfig::default();
            let mut player = PlayerBody::new(&config);
            player.start_running();
            Self {
                player,
                track: PlatformTrack::new(&config),
                spawner: CollectibleSpawner::new(&config),
                score: ScoreTracker::new(),
                config,
            }
        }

        fn resolve(&mut self) -> CollisionReport {
            CollisionResolver {
                player: &mut self.player,
                track: &self.track,
                spawner: &mut self.spawner,
                score: &mut self.score,
                landing_threshold: self.config.landing_threshold,
            }
            .resolve()
        }
    }

    #[test]
    fn test_lands_on_first_overlapping_platform() {
        let mut world = World::new();
        // Hitbox spans x 525.5..621.5; tiles at 300..700 overlap, 300 is first
        world.player.pos.y = 130.0;
        world.player.vertical_velocity = -50.0;

        let report = world.resolve();
        assert_eq!(report.landed_on, Some(3));
        assert_eq!(world.player.pos.y, 140.0);
        assert_eq!(world.player.vertical_velocity, 0.0);
        assert!(!world.player.is_jumping);
    }

    #[test]
    fn test_rising_player_passes_through() {
        let mut world = World::new();
        world.player.start_jump();
        world.player.pos.y = 130.0;

        let report = world.resolve();
        assert!(!report.landed());
        assert_eq!(world.player.pos.y, 130.0);
        assert!(world.player.is_jumping);
    }

    #[test]
    fn test_side_contact_below_threshold_does_not_land() {
        let mut world = World::new();
        // Feet at 123.5: overlap, but below 100 + 40 * 0.6 = 124
        world.player.pos.y = 123.5;
        world.player.vertical_velocity = -10.0;
        assert!(!world.resolve().landed());
        assert_eq!(world.player.pos.y, 123.5);

        world.player.pos.y = 124.5;
        assert!(world.resolve().landed());
        assert_eq!(world.player.pos.y, 140.0);
    }

    #[test]
    fn test_no_landing_without_horizontal_overlap() {
        let mut world = World::new();
        world.track.scroll(5_000.0);
        world.player.pos.y = 130.0;
        world.player.vertical_velocity = -10.0;
        assert!(!world.resolve().landed());
    }

    #[test]
    fn test_pickup_removes_coin_and_scores_once() {
        let mut world = World::new();
        let coin = Collectible::new(550.0, 200.0, 60.0, 60.0);
        world.spawner.push(coin);
        world.spawner.push(Collectible::new(560.0, 210.0, 60.0, 60.0));
        world.player.land_on(140.0);

        let report = world.resolve();
        assert_eq!(report.collected, Some(coin));
        assert_eq!(world.score.score(), 1);
        // Overlapping second coin waits for the next tick
        assert_eq!(world.spawner.coins().len(), 1);

        world.resolve();
        assert_eq!(world.score.score(), 2);
        assert!(world.spawner.coins().is_empty());

        world.resolve();
        assert_eq!(world.score.score(), 2);
    }

    #[test]
    fn test_lava_kills() {
        let mut world = World::new();
        world.track.scroll(5_000.0);
        world.player.pos.y = -3.0;
        world.player.vertical_velocity = -200.0;

        let report = world.resolve();
        assert!(report.died);
        assert!(world.player.is_dead);
        assert_eq!(world.player.pos.y, 0.0);
        assert_eq!(world.player.vertical_velocity, 0.0);

        // Dead players are skipped entirely
        assert_eq!(world.resolve(), CollisionReport::default());
    }
}
