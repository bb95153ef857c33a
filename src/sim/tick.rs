//! Simulation tick
//!
//! Advances the world by one frame in a fixed order: jump, gravity,
//! collision, generation, eviction, coin spawning, then scrolling. The order
//! matters: collision runs against the platforms that were on screen when
//! gravity moved the player, and new platforms only appear after the
//! collision pass.

use super::collision::CollisionResolver;
use super::state::{GameEvent, GamePhase, Simulation, TickEvents};
use crate::consts::*;
use crate::spans_overlap;

/// How early (in seconds of scrolling) the autopilot jumps before its
/// platform ends
const AUTOPILOT_LEAD_TIME: f32 = 0.05;

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Jump request (space/tap)
    pub jump: bool,
    /// Leave the start screen
    pub start: bool,
    /// Pause toggle
    pub pause: bool,
    /// Demo mode: jump automatically at platform edges
    pub autopilot: bool,
}

impl TickInput {
    /// Input carrying only a jump request
    pub fn jump() -> Self {
        Self {
            jump: true,
            ..Default::default()
        }
    }

    /// Fold the one-shot requests of `other` into this input
    fn merge(&mut self, other: &TickInput) {
        self.jump |= other.jump;
        self.start |= other.start;
        self.pause |= other.pause;
        self.autopilot = other.autopilot;
    }
}

/// Advance the simulation by `dt` seconds.
///
/// `dt` is clamped to [`MAX_FRAME_DT`]; a longer step could carry a resting
/// player through the landing band of a platform.
pub fn tick(sim: &mut Simulation, input: &TickInput, dt: f32) -> TickEvents {
    let dt = if dt.is_finite() {
        dt.clamp(0.0, MAX_FRAME_DT)
    } else {
        0.0
    };
    let mut events = TickEvents::default();

    if input.pause {
        sim.toggle_pause();
        if sim.phase == GamePhase::Paused {
            return events;
        }
    }

    match sim.phase {
        GamePhase::Paused => return events,
        GamePhase::GameOver => {
            sim.player.update_animation_time(dt);
            return events;
        }
        GamePhase::Start => {
            sim.player.update_animation_time(dt);
            if !input.start {
                return events;
            }
            sim.begin_run();
            events.push(GameEvent::RunStarted);
        }
        GamePhase::Playing => {}
    }

    sim.time_ticks += 1;
    sim.elapsed += dt;
    sim.player.update_animation_time(dt);

    // Jump
    let wants_jump = input.jump || (input.autopilot && autopilot_wants_jump(sim));
    if wants_jump && sim.player.start_jump() {
        events.push(GameEvent::JumpStarted);
    }

    sim.player.integrate_gravity(dt);

    // Collision
    let report = CollisionResolver {
        player: &mut sim.player,
        track: &sim.track,
        spawner: &mut sim.spawner,
        score: &mut sim.score,
        landing_threshold: sim.config.landing_threshold,
    }
    .resolve();

    if let Some(index) = report.landed_on {
        if !sim.grounded {
            events.push(GameEvent::Landed {
                platform: sim.track.platforms()[index],
            });
        }
    }
    sim.grounded = report.landed();

    if let Some(coin) = report.collected {
        events.push(GameEvent::CoinCollected { coin });
    }

    if report.died {
        sim.phase = GamePhase::GameOver;
        events.push(GameEvent::Died {
            score: sim.score.score(),
        });
        return events;
    }

    // Generation and cleanup
    let screen_right_edge = sim.config.screen_right_edge();
    let fresh = sim.track.generate_ahead(screen_right_edge, &mut sim.rng);
    sim.track.evict_behind();

    sim.spawner
        .update(dt, &sim.track, fresh, screen_right_edge, &mut sim.rng);
    sim.spawner.evict();

    // Scroll
    let delta_x = sim.config.background_speed * dt;
    sim.track.scroll(delta_x);
    sim.spawner.scroll(delta_x);
    sim.parallax.scroll(dt);

    events
}

/// Jump once the rightmost platform under the player is about to end
fn autopilot_wants_jump(sim: &Simulation) -> bool {
    let player = &sim.player;
    if player.is_jumping || !player.is_simulated() {
        return false;
    }

    let hitbox = player.hitbox();
    let support_end = sim
        .track
        .platforms()
        .iter()
        .map(|platform| sim.track.aabb(platform))
        .filter(|tile| {
            tile.top() == player.pos.y
                && spans_overlap(tile.min.x, tile.size.x, hitbox.min.x, hitbox.size.x)
        })
        .map(|tile| tile.right())
        .fold(f32::NEG_INFINITY, f32::max);

    let lead = sim.config.background_speed * AUTOPILOT_LEAD_TIME;
    support_end.is_finite() && support_end <= hitbox.right() + lead
}

impl Simulation {
    /// Advance by `dt` with the full input set
    pub fn tick(&mut self, input: &TickInput, dt: f32) -> TickEvents {
        tick(self, input, dt)
    }

    /// Advance by `dt`, optionally requesting a jump
    pub fn on_tick(&mut self, dt: f32, jump_requested: bool) -> TickEvents {
        let input = TickInput {
            jump: jump_requested,
            ..Default::default()
        };
        tick(self, &input, dt)
    }
}

/// Accumulator that feeds the simulation fixed [`SIM_DT`] steps from
/// variable frame times.
///
/// One-shot requests (jump, start, pause) reach only the first substep of a
/// frame. If a frame is too short for any substep they are held for the next.
/// Time a capped frame could not simulate is dropped, so the world slows down
/// under load rather than spiralling.
#[derive(Debug, Clone, Default)]
pub struct FixedStepper {
    accumulator: f32,
    pending: TickInput,
}

impl FixedStepper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run as many fixed steps as `frame_dt` covers, at most [`MAX_SUBSTEPS`]
    pub fn advance(&mut self, sim: &mut Simulation, input: &TickInput, frame_dt: f32) -> TickEvents {
        self.pending.merge(input);
        if frame_dt.is_finite() {
            self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);
        }

        let mut events = TickEvents::default();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let step_input = std::mem::replace(
                &mut self.pending,
                TickInput {
                    autopilot: input.autopilot,
                    ..Default::default()
                },
            );
            events.absorb(tick(sim, &step_input, SIM_DT));
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            // Too slow to catch up: drop the backlog instead of carrying it
            self.accumulator %= SIM_DT;
        }
        events
    }

    /// Unsimulated time carried into the next frame
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }
}
