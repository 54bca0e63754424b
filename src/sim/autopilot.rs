//! Idle/demo autopilot
//!
//! Produces the same `TickInput` a player would: turn toward the nearest
//! pickup worth having, thrust once roughly facing it, and take a shot at
//! any enemy lined up within range.

use glam::Vec2;

use super::behavior::Turn;
use super::collision::nearest;
use super::state::Session;
use super::tick::TickInput;
use crate::consts::*;
use crate::{angle_delta, bearing, facing_for_bearing};

/// Compute this tick's input for the player ship
pub fn drive(session: &Session) -> TickInput {
    let player = &session.player.body;
    let mut input = TickInput::default();

    if let Some(target) = pick_target(session) {
        let error = turn_error(player.pos, player.angle, target);
        input.turn = if error > AUTOPILOT_AIM_TOLERANCE {
            Turn::Right
        } else if error < -AUTOPILOT_AIM_TOLERANCE {
            Turn::Left
        } else {
            Turn::None
        };
        input.thrust = error.abs() < AUTOPILOT_THRUST_CONE;
    }

    if session.time_ticks % AUTOPILOT_FIRE_INTERVAL == 0 {
        input.fire = session.enemies.iter().any(|e| {
            e.body.alive
                && e.body.pos.distance(player.pos) < AUTOPILOT_FIRE_RANGE
                && turn_error(player.pos, player.angle, e.body.pos).abs()
                    < AUTOPILOT_AIM_TOLERANCE * 2.0
        });
    }

    input
}

/// Repair kits when the hull is low, otherwise trash
fn pick_target(session: &Session) -> Option<Vec2> {
    let from = session.player.body.pos;
    let trash = || nearest(from, session.trash.iter().map(|p| &p.body)).map(|b| b.pos);

    if session.player.hp < AUTOPILOT_REPAIR_HP {
        nearest(from, session.repair_kits.iter().map(|p| &p.body))
            .map(|b| b.pos)
            .or_else(trash)
    } else {
        trash()
    }
}

/// Degrees the ship must turn (clockwise positive) to face `target`
fn turn_error(pos: Vec2, angle: f32, target: Vec2) -> f32 {
    angle_delta(angle, facing_for_bearing(bearing(pos, target)))
}
