//! Per-kind movement rules
//!
//! Enemies never touch their own group while updating. They read a
//! snapshot of squadmate positions through `SteerContext` and report shots
//! as `EnemyAction`s that the tick applies once every enemy has moved.

use glam::Vec2;

use super::state::{Asteroid, Bullet, Enemy, EnemyKind, Particle, Player};
use crate::consts::*;
use crate::{bearing, bearing_vector, facing_for_bearing};

/// Held turn input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Turn {
    #[default]
    None,
    Left,
    Right,
}

impl Turn {
    /// Degrees per tick (clockwise positive)
    pub fn rate(self) -> f32 {
        match self {
            Turn::None => 0.0,
            Turn::Left => -PLAYER_TURN_RATE,
            Turn::Right => PLAYER_TURN_RATE,
        }
    }
}

impl Player {
    /// Thrust accumulation, friction decay and turn rate for this tick
    pub fn apply_input(&mut self, thrust: bool, turn: Turn) {
        if thrust {
            let forward = self.body.forward();
            self.body.vel += forward * PLAYER_THRUST;
        }
        self.body.vel *= 1.0 - PLAYER_FRICTION;
        self.turn_rate = turn.rate();
    }

    pub fn update(&mut self, dt: f32) {
        self.body.angle += self.turn_rate;
        self.body.integrate(dt);
        self.thruster.follow(&self.body);
    }
}

impl Asteroid {
    pub fn update(&mut self, dt: f32) {
        self.body.integrate(dt);
        self.body.angle += self.spin;
    }
}

impl Bullet {
    /// Fly straight and expire when the lifetime runs out
    pub fn update(&mut self, dt: f32) {
        self.body.integrate(dt);
        self.ttl -= dt;
        if self.ttl <= 0.0 {
            self.body.kill();
        }
    }
}

impl Particle {
    /// Drift, spin and fade; gone at zero opacity
    pub fn update(&mut self, dt: f32) {
        self.body.integrate(dt);
        self.body.angle += self.spin;
        self.alpha = self.alpha.saturating_sub(self.fade_rate);
        if self.alpha == 0 {
            self.body.kill();
        }
    }
}

/// Read-only view of the world an enemy steers by
#[derive(Debug, Clone, Copy)]
pub struct SteerContext<'a> {
    pub player_pos: Vec2,
    /// (id, position) of every live enemy at the start of the pass
    pub squad: &'a [(u32, Vec2)],
}

/// Requests an enemy makes during its update
#[derive(Debug, Clone, PartialEq)]
pub enum EnemyAction {
    /// Launch a hostile bullet
    Fire { pos: Vec2, vel: Vec2, angle: f32 },
}

impl Enemy {
    pub fn update(&mut self, dt: f32, ctx: &SteerContext, actions: &mut Vec<EnemyAction>) {
        let bearing = bearing(self.body.pos, ctx.player_pos);
        let dir = bearing_vector(bearing);
        let speed = self.kind.speed();
        self.body.angle = facing_for_bearing(bearing);

        match self.kind {
            EnemyKind::Chaser => {
                self.body.pos += dir * speed * dt;
            }
            EnemyKind::Shooter => {
                let distance = self.body.pos.distance(ctx.player_pos);
                if distance > SHOOTER_KEEP_DISTANCE + SHOOTER_DISTANCE_TOLERANCE {
                    self.body.pos += dir * speed * dt;
                } else if distance < SHOOTER_KEEP_DISTANCE - SHOOTER_DISTANCE_TOLERANCE {
                    self.body.pos -= dir * speed * SHOOTER_RETREAT_FACTOR * dt;
                }
            }
            EnemyKind::Kamikaze => {
                self.wobble += dt * KAMIKAZE_WOBBLE_RATE;
                self.body.angle += self.wobble.sin() * KAMIKAZE_WOBBLE_AMPLITUDE;
                self.body.pos += dir * speed * dt;
            }
        }

        if self.kind.separates() {
            self.separate(ctx.squad);
        }

        if self.kind == EnemyKind::Shooter {
            self.fire_timer -= dt;
            if self.fire_timer <= 0.0 {
                actions.push(EnemyAction::Fire {
                    pos: self.body.pos + dir * BULLET_MUZZLE_OFFSET,
                    vel: dir * HOSTILE_BULLET_SPEED,
                    angle: self.body.angle + 90.0,
                });
                self.fire_timer = SHOOTER_FIRE_DELAY;
            }
        }

        self.thruster.follow(&self.body);
    }

    /// Nudge away from every squadmate inside the separation radius
    fn separate(&mut self, squad: &[(u32, Vec2)]) {
        for &(id, other) in squad {
            if id == self.id {
                continue;
            }
            let offset = self.body.pos - other;
            if offset.length() < SEPARATION_RADIUS {
                self.body.pos += offset * SEPARATION_STRENGTH;
            }
        }
    }
}
