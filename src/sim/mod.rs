//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded session RNG only
//! - Stable iteration order (group order, entity IDs increase)
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod behavior;
pub mod collision;
pub mod entity;
pub mod level;
pub mod spawner;
pub mod state;
pub mod tick;

pub use behavior::{EnemyAction, SteerContext, Turn};
pub use collision::{clamp_to_world, nearest, resolve_collisions};
pub use entity::{Body, Collider, Flare, Thruster, Tint};
pub use level::Level;
pub use spawner::{choose_enemy_kind, enemy_cap, spawn_position};
pub use state::{
    Asteroid, Bullet, DeathEffect, Enemy, EnemyKind, GameEvent, GamePhase, MusicTrack, Outcome,
    Particle, Pickup, PickupKind, Player, Session, SessionConfig, SoundEffect, Star,
};
pub use tick::{TickInput, tick};
