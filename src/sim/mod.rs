//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay headless:
//! - Seeded RNG only, so a seed reproduces a world
//! - Platforms and coins kept in ascending x order
//! - No rendering, audio or platform dependencies

pub mod collectibles;
pub mod collision;
pub mod geometry;
pub mod parallax;
pub mod platforms;
pub mod player;
pub mod rng;
pub mod score;
pub mod state;
pub mod tick;

pub use collectibles::{Collectible, CollectibleSpawner};
pub use collision::{CollisionReport, CollisionResolver};
pub use geometry::Aabb;
pub use parallax::{GroundStrip, ParallaxBackground, ParallaxLayer};
pub use platforms::{Platform, PlatformTrack};
pub use player::{PlayerBody, PlayerPose, PlayerState};
pub use rng::{RandomSource, SimRng};
pub use score::ScoreTracker;
pub use state::{GameEvent, GamePhase, Simulation, TickEvents};
pub use tick::{FixedStepper, TickInput, tick};
