//! Parallax background scrolling
//!
//! Pure position bookkeeping; the renderer draws each layer image at the
//! offsets held here. Far layers move slower than the world, the ground
//! strip moves with it.

use serde::{Deserialize, Serialize};

use crate::SimConfig;

/// Speed of each layer relative to the world scroll speed, far to near
pub const LAYER_SPEED_FACTORS: [f32; 6] = [0.10, 0.15, 0.20, 0.45, 0.45, 0.8];

/// One image layer, tiled three times side by side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParallaxLayer {
    pub speed: f32,
    pub width: f32,
    /// Left x of each of the three copies
    pub offsets: [f32; 3],
}

impl ParallaxLayer {
    pub fn new(speed: f32, width: f32) -> Self {
        Self {
            speed,
            width,
            offsets: [0.0, width, 2.0 * width],
        }
    }

    /// Move left; a copy that left the screen is placed after its neighbour
    pub fn scroll(&mut self, dt: f32) {
        let step = self.speed * dt;
        for offset in &mut self.offsets {
            *offset -= step;
        }

        let w = self.width;
        if self.offsets[0] + w <= 0.0 {
            self.offsets[0] = self.offsets[2] + w;
        }
        if self.offsets[1] + w <= 0.0 {
            self.offsets[1] = self.offsets[0] + w;
        }
        if self.offsets[2] + w <= 0.0 {
            self.offsets[2] = self.offsets[1] + w;
        }
    }
}

/// The repeating lava ground strip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundStrip {
    pub x: f32,
    pub speed: f32,
    pub segment_width: f32,
    /// Whole segments that fit on the screen; the strip wraps by this many
    pub segment_count: usize,
    pub world_width: f32,
}

impl GroundStrip {
    pub fn new(speed: f32, segment_width: f32, world_width: f32) -> Self {
        Self {
            x: 0.0,
            speed,
            segment_width,
            segment_count: ((world_width / segment_width) as usize).max(1),
            world_width,
        }
    }

    /// Move left; x stays within [-world_width, 0]
    pub fn scroll(&mut self, dt: f32) {
        self.x -= self.speed * dt;
        if self.x < -self.world_width {
            let wrap = self.segment_count as f32 * self.segment_width;
            self.x = -self.world_width + (self.x + self.world_width).rem_euclid(wrap);
        }
    }

    /// Left x of every segment that is at least partly on screen
    pub fn visible_segments(&self) -> impl Iterator<Item = f32> + '_ {
        // From x >= -world_width this reaches past the right edge
        let total = (2.0 * self.world_width / self.segment_width).ceil() as usize + 2;
        (0..total)
            .map(move |i| self.x + self.segment_width * i as f32)
            .filter(move |&x| x > -self.segment_width && x < self.world_width)
    }
}

/// All background layers plus the ground
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParallaxBackground {
    pub layers: Vec<ParallaxLayer>,
    pub ground: GroundStrip,
}

impl ParallaxBackground {
    pub fn new(config: &SimConfig) -> Self {
        let layers = LAYER_SPEED_FACTORS
            .iter()
            .map(|factor| ParallaxLayer::new(config.background_speed * factor, config.layer_width))
            .collect();
        Self {
            layers,
            ground: GroundStrip::new(
                config.background_speed,
                config.ground_width,
                config.world_width,
            ),
        }
    }

    pub fn scroll(&mut self, dt: f32) {
        for layer in &mut self.layers {
            layer.scroll(dt);
        }
        self.ground.scroll(dt);
    }

    pub fn reset(&mut self) {
        for layer in &mut self.layers {
            *layer = ParallaxLayer::new(layer.speed, layer.width);
        }
        self.ground.x = 0.0;
    }
}
