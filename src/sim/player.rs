//! Player kinematics
//!
//! The player never moves horizontally; the world scrolls past instead.
//! Only vertical motion is simulated: gravity, jump impulses, and the
//! landing/death clamps applied by the collision pass.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Aabb;
use crate::SimConfig;

/// What the player is doing, for animation selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    /// Pre-game idle pose, no physics
    Idle,
    /// Grounded on a platform
    Running,
    /// In the air after a jump
    Jumping,
    /// Touched the lava; only the death animation plays
    Dead,
}

/// Read-only snapshot for the renderer/animator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerPose {
    pub x: f32,
    pub y: f32,
    pub is_jumping: bool,
    pub is_dead: bool,
    pub state: PlayerState,
    pub animation_time: f32,
}

/// Kinematic tuning copied out of [`SimConfig`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyRules {
    pub spawn: Vec2,
    pub width: f32,
    pub height: f32,
    pub hitbox_scale: f32,
    pub gravity: f32,
    pub jump_velocity: f32,
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerBody {
    /// Feet position; x is horizontally centred and fixed
    pub pos: Vec2,
    /// Positive is up
    pub vertical_velocity: f32,
    pub is_jumping: bool,
    pub is_dead: bool,
    /// Still on the start screen
    pub is_idle: bool,
    /// Time since the current animation started
    pub animation_time: f32,
    rules: BodyRules,
}

impl PlayerBody {
    /// Create an idle player at the spawn point
    pub fn new(config: &SimConfig) -> Self {
        let rules = BodyRules {
            spawn: Vec2::new(config.player_x, config.player_spawn_y),
            width: config.player_width,
            height: config.player_height,
            hitbox_scale: config.player_hitbox_scale,
            gravity: config.gravity,
            jump_velocity: config.jump_velocity,
        };
        Self {
            pos: rules.spawn,
            vertical_velocity: 0.0,
            is_jumping: false,
            is_dead: false,
            is_idle: true,
            animation_time: 0.0,
            rules,
        }
    }

    /// Leave the idle pose and start running
    pub fn start_running(&mut self) {
        self.is_idle = false;
        self.animation_time = 0.0;
    }

    pub fn state(&self) -> PlayerState {
        if self.is_dead {
            PlayerState::Dead
        } else if self.is_idle {
            PlayerState::Idle
        } else if self.is_jumping {
            PlayerState::Jumping
        } else {
            PlayerState::Running
        }
    }

    /// Whether gravity and jumps apply
    #[inline]
    pub fn is_simulated(&self) -> bool {
        !self.is_dead && !self.is_idle
    }

    /// Semi-implicit Euler step: velocity first, then position
    pub fn integrate_gravity(&mut self, dt: f32) {
        if !self.is_simulated() {
            return;
        }
        self.vertical_velocity -= self.rules.gravity * dt;
        self.pos.y += self.vertical_velocity * dt;
    }

    /// Start a jump if grounded. A request while airborne, dead or idle is
    /// ignored. Returns whether a jump started.
    pub fn start_jump(&mut self) -> bool {
        if self.is_jumping || !self.is_simulated() {
            return false;
        }
        // Each jump starts at the first animation frame
        self.animation_time = 0.0;
        self.is_jumping = true;
        self.vertical_velocity = self.rules.jump_velocity;
        true
    }

    /// Put the feet on a platform top and stop falling
    pub fn land_on(&mut self, top: f32) {
        self.pos.y = top;
        self.vertical_velocity = 0.0;
        self.is_jumping = false;
    }

    /// Clamp to the lava surface and switch to the death animation
    pub fn kill(&mut self) {
        self.pos.y = 0.0;
        self.vertical_velocity = 0.0;
        self.is_jumping = false;
        self.is_dead = true;
        self.animation_time = 0.0;
    }

    pub fn update_animation_time(&mut self, dt: f32) {
        self.animation_time += dt;
    }

    /// Back to the spawn point, alive and grounded
    pub fn reset(&mut self) {
        self.pos = self.rules.spawn;
        self.vertical_velocity = 0.0;
        self.is_dead = false;
        self.is_jumping = false;
        self.is_idle = false;
        self.animation_time = 0.0;
    }

    /// Collision box: left edge at the sprite's left side, narrower than the sprite
    pub fn hitbox(&self) -> Aabb {
        Aabb::new(
            self.pos.x - self.rules.width / 2.0,
            self.pos.y,
            self.rules.width * self.rules.hitbox_scale,
            self.rules.height,
        )
    }

    pub fn pose(&self) -> PlayerPose {
        PlayerPose {
            x: self.pos.x,
            y: self.pos.y,
            is_jumping: self.is_jumping,
            is_dead: self.is_dead,
            state: self.state(),
            animation_time: self.animation_time,
        }
    }
}
