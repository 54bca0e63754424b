//! Space Scavenger - a top-down arcade space game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, behaviors, spawning, collisions)
//! - `game`: Host loop that drives a session and forwards its events
//! - `renderer`: Draw-order contract for whatever draws the world
//! - `audio`: Fire-and-forget sound playback with missing-asset tolerance
//! - `platform`: Input events folded into per-tick commands
//! - `persistence`: JSON files with atomic replace
//! - `highscores`: Best score per level

pub mod audio;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use highscores::{LevelRecords, ScoreStore};
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Ticks per second, used to convert per-frame tuning into per-second units
    pub const TICK_RATE: f32 = 60.0;

    /// Half-extent of the square world
    pub const MAP_SIZE: f32 = 2500.0;

    /// Spawns are rejected closer than this to the player
    pub const SPAWN_CLEARANCE: f32 = 600.0;
    /// Rejection-sampling ceiling before a spawn is skipped
    pub const SPAWN_MAX_ATTEMPTS: u32 = 64;

    /// Initial population
    pub const STAR_COUNT: usize = 300;
    pub const ASTEROID_COUNT: usize = 35;
    pub const TRASH_COUNT: usize = 20;

    /// Player
    pub const PLAYER_MAX_HP: u32 = 100;
    pub const PLAYER_RADIUS: f32 = 24.0;
    /// Velocity added per tick of held thrust (0.2 units/frame)
    pub const PLAYER_THRUST: f32 = 0.2 * TICK_RATE;
    /// Fraction of velocity lost every tick
    pub const PLAYER_FRICTION: f32 = 0.04;
    /// Degrees per tick while a turn key is held
    pub const PLAYER_TURN_RATE: f32 = 4.0;
    /// Velocity multiplier on the clamped axis when hitting the world edge
    pub const PLAYER_WALL_BOUNCE: f32 = -0.5;

    /// Bullets
    pub const BULLET_RADIUS: f32 = 6.0;
    pub const BULLET_MUZZLE_OFFSET: f32 = 30.0;
    pub const PLAYER_BULLET_SPEED: f32 = 12.0 * TICK_RATE;
    pub const PLAYER_BULLET_TTL: f32 = 1.0;
    pub const HOSTILE_BULLET_SPEED: f32 = 6.0 * TICK_RATE;
    pub const HOSTILE_BULLET_TTL: f32 = 2.0;

    /// Kamikaze death nova
    pub const NOVA_BULLETS: u32 = 9;
    pub const NOVA_SPEED: f32 = 5.0 * TICK_RATE;

    /// Asteroids drift up to this many units/second per axis
    pub const ASTEROID_MAX_DRIFT: f32 = 1.5 * TICK_RATE;
    /// Asteroid spin range, degrees per tick
    pub const ASTEROID_MAX_SPIN: f32 = 1.0;

    /// Pickups
    pub const PICKUP_RADIUS: f32 = 24.0;
    pub const REPAIR_HEAL: u32 = 30;
    pub const ENDLESS_REPAIR_KIT_LIMIT: usize = 5;
    pub const ENDLESS_REPAIR_RESPAWN_CHANCE: f64 = 0.01;

    /// Score awards
    pub const SCORE_TRASH: u64 = 50;
    pub const SCORE_ASTEROID: u64 = 5;
    pub const SCORE_ENEMY: u64 = 100;

    /// Damage to the player
    pub const DAMAGE_HOSTILE_BULLET: u32 = 10;
    pub const DAMAGE_ASTEROID_RAM: u32 = 20;

    /// Enemy steering
    pub const SEPARATION_RADIUS: f32 = 60.0;
    pub const SEPARATION_STRENGTH: f32 = 0.05;
    pub const SHOOTER_KEEP_DISTANCE: f32 = 350.0;
    pub const SHOOTER_DISTANCE_TOLERANCE: f32 = 50.0;
    pub const SHOOTER_RETREAT_FACTOR: f32 = 0.8;
    pub const SHOOTER_FIRE_DELAY: f32 = 2.5;
    pub const SHOOTER_MAX_INITIAL_PHASE: f32 = 2.0;
    pub const KAMIKAZE_WOBBLE_RATE: f32 = 10.0;
    pub const KAMIKAZE_WOBBLE_AMPLITUDE: f32 = 10.0;

    /// Endless-mode population control
    pub const ENDLESS_SPAWN_CHANCE: f64 = 0.05;

    /// Thruster flicker period in ticks
    pub const THRUSTER_FLICKER_TICKS: u32 = 4;

    /// Particles
    pub const PARTICLE_MIN_SPEED: f32 = 2.0 * TICK_RATE;
    pub const PARTICLE_MAX_SPEED: f32 = 6.0 * TICK_RATE;
    pub const PARTICLE_MAX_SPIN: f32 = 5.0;

    /// Idle/demo autopilot
    pub const AUTOPILOT_AIM_TOLERANCE: f32 = 6.0;
    pub const AUTOPILOT_THRUST_CONE: f32 = 30.0;
    pub const AUTOPILOT_FIRE_RANGE: f32 = 600.0;
    pub const AUTOPILOT_FIRE_INTERVAL: u64 = 12;
    /// Below this hull the autopilot heads for repair kits first
    pub const AUTOPILOT_REPAIR_HP: u32 = 50;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    angle.rem_euclid(360.0)
}

/// Signed shortest turn from `from` to `to`, in (-180, 180] (positive is clockwise)
#[inline]
pub fn angle_delta(from: f32, to: f32) -> f32 {
    let d = normalize_degrees(to - from);
    if d > 180.0 { d - 360.0 } else { d }
}

/// Unit vector a ship facing `angle_deg` moves along (0 = up, clockwise)
#[inline]
pub fn heading_vector(angle_deg: f32) -> Vec2 {
    let rad = angle_deg.to_radians();
    Vec2::new(rad.sin(), rad.cos())
}

/// Facing angle (degrees) for a bearing given in math radians (atan2 of a delta)
#[inline]
pub fn facing_for_bearing(bearing: f32) -> f32 {
    90.0 - bearing.to_degrees()
}

/// Bearing in radians from `from` toward `to`
#[inline]
pub fn bearing(from: Vec2, to: Vec2) -> f32 {
    let delta = to - from;
    delta.y.atan2(delta.x)
}

/// Unit vector for a bearing in radians
#[inline]
pub fn bearing_vector(bearing: f32) -> Vec2 {
    Vec2::new(bearing.cos(), bearing.sin())
}
