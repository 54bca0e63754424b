//! Fixed timestep simulation tick
//!
//! Core game loop that advances a session deterministically. The order of
//! steps inside `tick` is load-bearing: terminal checks come first so a
//! finished session is never mutated again.

use glam::Vec2;

use super::autopilot;
use super::behavior::{EnemyAction, SteerContext, Turn};
use super::collision::{clamp_to_world, resolve_collisions};
use super::state::{Bullet, GameEvent, GamePhase, Outcome, Session, SoundEffect};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Thrust held
    pub thrust: bool,
    /// Turn held
    pub turn: Turn,
    /// Fire pressed since the last tick (one bullet)
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - the autopilot flies the ship
    pub idle_mode: bool,
}

/// Advance the session by one fixed timestep
pub fn tick(state: &mut Session, input: &TickInput, dt: f32) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Running => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Running,
            _ => {}
        }
    }

    if state.phase != GamePhase::Running {
        return;
    }

    // 1. A session that already reached an outcome stops here
    if settle_outcome(state) {
        return;
    }

    let input = if input.idle_mode {
        autopilot::drive(state)
    } else {
        input.clone()
    };

    state.time_ticks += 1;

    // 2. Endless-mode population control
    state.maintain_population();

    // 3. Player input
    state.player.apply_input(input.thrust, input.turn);
    if input.fire {
        fire_player_bullet(state);
    }

    // 4. Behaviors
    update_entities(state, dt);

    // 5. Viewport follows the player
    state.camera_focus = state.player.body.pos;

    // 6. World bounds
    clamp_to_world(&mut state.player.body, PLAYER_WALL_BOUNCE);
    for asteroid in &mut state.asteroids {
        clamp_to_world(&mut asteroid.body, -1.0);
    }

    // 7. Collisions
    resolve_collisions(state);

    // Report the outcome on the tick it happens
    settle_outcome(state);
}

fn fire_player_bullet(state: &mut Session) {
    let forward = state.player.body.forward();
    let id = state.next_entity_id();
    let bullet = Bullet::new(
        id,
        state.player.body.pos + forward * BULLET_MUZZLE_OFFSET,
        state.player.body.vel + forward * PLAYER_BULLET_SPEED,
        state.player.body.angle,
        false,
    );
    state.bullets.push(bullet);
    state.play(SoundEffect::Laser, 0.3);
}

fn update_entities(state: &mut Session, dt: f32) {
    state.player.update(dt);

    for asteroid in &mut state.asteroids {
        asteroid.update(dt);
    }
    for bullet in &mut state.bullets {
        bullet.update(dt);
    }

    let squad: Vec<(u32, Vec2)> = state
        .enemies
        .iter()
        .filter(|e| e.body.alive)
        .map(|e| (e.id, e.body.pos))
        .collect();
    let ctx = SteerContext {
        player_pos: state.player.body.pos,
        squad: &squad,
    };
    let mut actions = Vec::new();
    for enemy in &mut state.enemies {
        enemy.update(dt, &ctx, &mut actions);
    }
    for action in actions {
        match action {
            EnemyAction::Fire { pos, vel, angle } => {
                let id = state.next_entity_id();
                state.bullets.push(Bullet::new(id, pos, vel, angle, true));
                state.play(SoundEffect::EnemyLaser, 0.2);
            }
        }
    }

    for particle in &mut state.particles {
        particle.update(dt);
    }

    state.bullets.retain(|b| b.body.alive);
    state.particles.retain(|p| p.body.alive);
}

/// Move into a terminal phase if the hull is gone or the goal is met.
///
/// Loss is checked first. Returns true if the session is (now) over.
fn settle_outcome(state: &mut Session) -> bool {
    if state.phase.is_terminal() {
        return true;
    }

    let outcome = if state.player.is_destroyed() {
        Outcome::Lost
    } else {
        match state.level.goal() {
            Some(goal) if state.score >= goal => Outcome::Won,
            _ => return false,
        }
    };

    state.phase = match outcome {
        Outcome::Won => GamePhase::Won,
        Outcome::Lost => GamePhase::Lost,
    };
    state.events.push(GameEvent::StopMusic);
    let stinger = match outcome {
        Outcome::Won => SoundEffect::Win,
        Outcome::Lost => SoundEffect::Defeat,
    };
    state.play(stinger, 0.7);
    state.events.push(GameEvent::SessionEnded {
        outcome,
        level: state.level,
        score: state.score,
    });

    log::info!(
        "Session over: {:?} on level {} with score {} after {} ticks",
        outcome,
        state.level,
        state.score,
        state.time_ticks
    );
    true
}
