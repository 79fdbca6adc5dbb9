//! Kinematic body of a fighter.
//!
//! A small arcade-style integrator: gravity, a per-axis speed
//! ceiling, a floor and two side walls. Hosts that run their own physics can
//! ignore [`Body::integrate`] and write `position`/`velocity` back each frame
//! instead; the fighter only ever reads velocity signs to derive its state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::{MotionTunables, StageConfig};

/// Axis-aligned rectangle given by its centre and size.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Centre point
    pub center: Vec2,
    /// Full width and height
    pub size: Vec2,
}

impl Rect {
    /// Creates a rectangle from its centre and size.
    #[must_use]
    pub const fn new(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    /// Top-left corner.
    #[must_use]
    pub fn min(&self) -> Vec2 {
        self.center - self.size * 0.5
    }

    /// Bottom-right corner.
    #[must_use]
    pub fn max(&self) -> Vec2 {
        self.center + self.size * 0.5
    }

    /// Returns `true` if the rectangles share any area.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x < b_max.x && b_min.x < a_max.x && a_min.y < b_max.y && b_min.y < a_max.y
    }
}

/// Position, velocity and collision box of a fighter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Centre of the collision box
    pub position: Vec2,
    /// px/s, `y` grows downward
    pub velocity: Vec2,
    /// Collision box size
    pub size: Vec2,
    /// Cleared when the fighter dies
    pub gravity_enabled: bool,
    min_x: f32,
    max_x: f32,
    floor_y: f32,
}

impl Body {
    /// Creates a resting body at `position`, confined to `stage`.
    #[must_use]
    pub fn new(position: Vec2, size: Vec2, stage: &StageConfig) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            size,
            gravity_enabled: true,
            min_x: size.x * 0.5,
            max_x: stage.width - size.x * 0.5,
            floor_y: stage.floor_y - size.y * 0.5,
        }
    }

    /// Collision box in world space.
    #[must_use]
    pub fn hitbox(&self) -> Rect {
        Rect::new(self.position, self.size)
    }

    /// Returns `true` while resting on the floor.
    #[must_use]
    pub fn on_floor(&self) -> bool {
        self.position.y >= self.floor_y
    }

    /// Advances one step of `dt` seconds.
    ///
    /// Landing on the floor zeroes vertical velocity; touching a wall zeroes
    /// horizontal velocity.
    pub fn integrate(&mut self, dt: f32, motion: &MotionTunables) {
        if self.gravity_enabled {
            self.velocity.y += motion.gravity * dt;
        }
        self.velocity = self
            .velocity
            .clamp(Vec2::splat(-motion.max_speed), Vec2::splat(motion.max_speed));

        self.position += self.velocity * dt;

        if self.position.y >= self.floor_y {
            self.position.y = self.floor_y;
            if self.velocity.y > 0.0 {
                self.velocity.y = 0.0;
            }
        }
        if self.position.x <= self.min_x {
            self.position.x = self.min_x;
            if self.velocity.x < 0.0 {
                self.velocity.x = 0.0;
            }
        } else if self.position.x >= self.max_x {
            self.position.x = self.max_x;
            if self.velocity.x > 0.0 {
                self.velocity.x = 0.0;
            }
        }
    }

    /// Puts the body on top of `support`; a fall onto it stops there.
    pub fn rest_on(&mut self, support: &Rect) {
        self.position.y = support.min().y - self.size.y * 0.5;
        if self.velocity.y > 0.0 {
            self.velocity.y = 0.0;
        }
    }

    /// Stops all motion and disables gravity.
    pub fn freeze(&mut self) {
        self.velocity = Vec2::ZERO;
        self.gravity_enabled = false;
    }

    /// Moves the body back to `position` at rest with gravity on.
    pub fn reset(&mut self, position: Vec2) {
        self.position = position;
        self.velocity = Vec2::ZERO;
        self.gravity_enabled = true;
    }
}
