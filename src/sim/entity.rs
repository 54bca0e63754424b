//! Kinematic base shared by every simulated object, plus the cosmetic
//! thruster flame that follows ship-like entities.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::THRUSTER_FLICKER_TICKS;
use crate::heading_vector;

/// Colour tags carried by entities; the renderer maps them to real colours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tint {
    White,
    Grey,
    Orange,
    OrangePeel,
    Yellow,
    Red,
    Blue,
    Green,
    /// Reddish wash applied to kamikaze hulls
    Crimson,
}

/// Position, motion and lifecycle of an entity.
///
/// `angle` is in degrees, clockwise, with 0 pointing up (+Y).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    /// World units per second
    pub vel: Vec2,
    pub angle: f32,
    /// Collision radius
    pub radius: f32,
    /// Cleared when the entity is destroyed; the owning group drops it at the
    /// next retain pass and nothing may match it in between
    pub alive: bool,
}

impl Body {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            angle: 0.0,
            radius,
            alive: true,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    /// Advance position by velocity
    #[inline]
    pub fn integrate(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    /// Direction this body is facing
    #[inline]
    pub fn forward(&self) -> Vec2 {
        heading_vector(self.angle)
    }

    /// Circle overlap test
    #[inline]
    pub fn overlaps(&self, other: &Body) -> bool {
        let reach = self.radius + other.radius;
        self.pos.distance_squared(other.pos) < reach * reach
    }

    #[inline]
    pub fn kill(&mut self) {
        self.alive = false;
    }
}

/// Anything living in a collidable group
pub trait Collider {
    fn body(&self) -> &Body;

    fn is_alive(&self) -> bool {
        self.body().alive
    }
}

/// Indices of live members of `group` overlapping `body`, in group order
pub fn overlapping<T: Collider>(body: &Body, group: &[T]) -> Vec<usize> {
    group
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_alive() && body.overlaps(e.body()))
        .map(|(i, _)| i)
        .collect()
}

/// Which of the two alternating flame looks is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Flare {
    /// Orange, larger
    Wide,
    /// Yellow, smaller
    Narrow,
}

impl Flare {
    pub fn tint(self) -> Tint {
        match self {
            Flare::Wide => Tint::OrangePeel,
            Flare::Narrow => Tint::Yellow,
        }
    }

    pub fn scale(self) -> f32 {
        match self {
            Flare::Wide => 0.9,
            Flare::Narrow => 0.6,
        }
    }
}

/// Engine flame drawn behind a ship. Owned by its ship and moved only by it,
/// so it disappears in the same operation that drops the owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thruster {
    pub pos: Vec2,
    pub angle: f32,
    /// Distance behind the owner's centre
    pub offset_dist: f32,
    pub flare: Flare,
    timer: u32,
}

impl Thruster {
    pub fn new(offset_dist: f32) -> Self {
        Self {
            pos: Vec2::ZERO,
            angle: 0.0,
            offset_dist,
            flare: Flare::Wide,
            timer: 0,
        }
    }

    /// Snap behind the owner and advance the flicker animation
    pub fn follow(&mut self, owner: &Body) {
        self.pos = owner.pos - owner.forward() * self.offset_dist;
        self.angle = owner.angle;

        self.timer += 1;
        if self.timer > THRUSTER_FLICKER_TICKS {
            self.timer = 0;
            self.flare = match self.flare {
                Flare::Wide => Flare::Narrow,
                Flare::Narrow => Flare::Wide,
            };
        }
    }
}
