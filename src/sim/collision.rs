//! Collision detection and response
//!
//! Runs once per tick after movement, in a fixed order:
//! pickups (repair, trash), bullets, asteroid rams, enemy rams.
//! A destroyed entity has its alive flag cleared on the spot, so no later
//! test in the same pass can match it again; groups are compacted at the end.

use glam::Vec2;

use super::entity::{Body, Tint, overlapping};
use super::state::{DeathEffect, PickupKind, Session, SoundEffect};
use crate::consts::*;

/// Clamp a body inside the world square, scaling velocity on each clamped axis.
///
/// Returns true if the body touched a wall.
pub fn clamp_to_world(body: &mut Body, restitution: f32) -> bool {
    let limit = MAP_SIZE - body.radius;
    let mut touched = false;

    if body.pos.x < -limit {
        body.pos.x = -limit;
        body.vel.x *= restitution;
        touched = true;
    } else if body.pos.x > limit {
        body.pos.x = limit;
        body.vel.x *= restitution;
        touched = true;
    }

    if body.pos.y < -limit {
        body.pos.y = -limit;
        body.vel.y *= restitution;
        touched = true;
    } else if body.pos.y > limit {
        body.pos.y = limit;
        body.vel.y *= restitution;
        touched = true;
    }

    touched
}

/// Run every collision stage for this tick
pub fn resolve_collisions(session: &mut Session) {
    collect_repair_kits(session);
    collect_trash(session);
    resolve_bullets(session);
    resolve_asteroid_rams(session);
    resolve_enemy_rams(session);
    session.retain_alive();
}

fn collect_repair_kits(s: &mut Session) {
    for i in overlapping(&s.player.body, &s.repair_kits) {
        s.repair_kits[i].body.kill();
        s.player.heal(REPAIR_HEAL);
        s.play(SoundEffect::Heal, 1.0);

        if s.level.is_endless() {
            // Kits are scarce in survival
            let remaining = s.repair_kits.iter().filter(|k| k.body.alive).count();
            if remaining < ENDLESS_REPAIR_KIT_LIMIT && s.rng_chance(ENDLESS_REPAIR_RESPAWN_CHANCE) {
                s.spawn_pickup(PickupKind::RepairKit);
            }
        } else if s.level.initial_repair_kits() > 0 {
            s.spawn_pickup(PickupKind::RepairKit);
        }
    }
}

fn collect_trash(s: &mut Session) {
    for i in overlapping(&s.player.body, &s.trash) {
        s.trash[i].body.kill();
        s.play(SoundEffect::Collect, 0.5);
        s.score = s.score.saturating_add(SCORE_TRASH);
        s.spawn_pickup(PickupKind::Trash);
    }
}

fn resolve_bullets(s: &mut Session) {
    // Bullets added while resolving (death novas) wait for the next tick
    let count = s.bullets.len();
    for i in 0..count {
        if !s.bullets[i].body.alive {
            continue;
        }
        let bullet = s.bullets[i].body;

        if s.bullets[i].hostile {
            if bullet.overlaps(&s.player.body) {
                s.bullets[i].body.kill();
                s.player.damage(DAMAGE_HOSTILE_BULLET);
                s.play(SoundEffect::Hit, 0.5);
                let at = s.player.body.pos;
                s.emit_burst(at, Tint::Orange, 5);
            }
        } else {
            let hits = overlapping(&bullet, &s.enemies);
            if !hits.is_empty() {
                s.bullets[i].body.kill();
                for e in hits {
                    s.emit_burst(bullet.pos, Tint::White, 3);
                    if s.enemies[e].hit() {
                        destroy_enemy(s, e);
                    }
                }
            }
        }

        if !s.bullets[i].body.alive {
            continue;
        }
        let hits = overlapping(&bullet, &s.asteroids);
        if !hits.is_empty() {
            s.bullets[i].body.kill();
            for a in hits {
                s.play(SoundEffect::Explosion, 0.4);
                let at = s.asteroids[a].body.pos;
                s.emit_burst(at, Tint::Grey, 10);
                s.asteroids[a].body.kill();
                s.score = s.score.saturating_add(SCORE_ASTEROID);
                s.spawn_asteroid();
            }
        }
    }
}

/// Shot down: score, debris, death effect and (outside endless mode) a replacement
fn destroy_enemy(s: &mut Session, index: usize) {
    let kind = s.enemies[index].kind;
    let at = s.enemies[index].body.pos;

    s.play(SoundEffect::Explosion, 0.6);
    s.emit_burst(at, kind.explosion_tint(), 15);
    if kind.death_effect() == DeathEffect::Nova {
        s.emit_nova(at);
    }

    s.enemies[index].body.kill();
    s.score = s.score.saturating_add(SCORE_ENEMY);
    log::debug!("{kind:?} #{} destroyed, score {}", s.enemies[index].id, s.score);

    if !s.level.is_endless() {
        s.spawn_enemy();
    }
}

fn resolve_asteroid_rams(s: &mut Session) {
    for i in overlapping(&s.player.body, &s.asteroids) {
        s.asteroids[i].body.kill();
        s.play(SoundEffect::Hit, 1.0);
        let at = s.asteroids[i].body.pos;
        s.emit_burst(at, Tint::Grey, 15);
        s.player.damage(DAMAGE_ASTEROID_RAM);
        s.spawn_asteroid();
    }
}

fn resolve_enemy_rams(s: &mut Session) {
    for i in overlapping(&s.player.body, &s.enemies) {
        let kind = s.enemies[i].kind;
        s.play(SoundEffect::Hit, 1.0);
        let at = s.enemies[i].body.pos;
        s.emit_burst(at, Tint::Red, 20);
        s.player.damage(kind.ram_damage());
        s.enemies[i].body.kill();

        if !s.level.is_endless() {
            s.spawn_enemy();
        }
    }
}

/// Nearest live member of `bodies` to `from`
pub fn nearest<'a, I>(from: Vec2, bodies: I) -> Option<&'a Body>
where
    I: IntoIterator<Item = &'a Body>,
{
    bodies
        .into_iter()
        .filter(|b| b.alive)
        .min_by(|a, b| {
            a.pos
                .distance_squared(from)
                .partial_cmp(&b.pos.distance_squared(from))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::Level;
    use crate::sim::state::{Asteroid, Bullet, Enemy, EnemyKind, GameEvent, Pickup, SessionConfig};

    fn empty_session(level: u8) -> Session {
        Session::new(SessionConfig {
            empty_world: true,
            ..SessionConfig::new(Level::new(level).unwrap(), 42)
        })
    }

    fn player_bullet(s: &mut Session, pos: Vec2) {
        let id = s.next_entity_id();
        s.bullets.push(Bullet::new(id, pos, Vec2::ZERO, 0.0, false));
    }

    fn sounds(s: &Session) -> Vec<SoundEffect> {
        s.events
            .iter()
            .filter_map(|e| match e {
                GameEvent::Sound { effect, .. } => Some(*effect),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_clamp_reflects_on_clamped_axis() {
        let mut body = Body::new(Vec2::new(MAP_SIZE + 50.0, 10.0), 20.0)
            .with_velocity(Vec2::new(100.0, 30.0));
        assert!(clamp_to_world(&mut body, PLAYER_WALL_BOUNCE));
        assert_eq!(body.pos.x, MAP_SIZE - 20.0);
        assert_eq!(body.vel, Vec2::new(-50.0, 30.0));

        let mut inside = Body::new(Vec2::ZERO, 20.0).with_velocity(Vec2::ONE);
        assert!(!clamp_to_world(&mut inside, PLAYER_WALL_BOUNCE));
        assert_eq!(inside.vel, Vec2::ONE);
    }

    #[test]
    fn test_trash_pickup_scores_and_respawns() {
        let mut s = empty_session(1);
        let id = s.next_entity_id();
        s.trash.push(Pickup {
            id,
            kind: PickupKind::Trash,
            body: Body::new(Vec2::new(10.0, 0.0), PICKUP_RADIUS),
        });

        resolve_collisions(&mut s);

        assert_eq!(s.score, SCORE_TRASH);
        assert_eq!(s.trash.len(), 1);
        assert_ne!(s.trash[0].id, id);
        assert!(s.trash[0].body.pos.length() >= SPAWN_CLEARANCE);
        assert!(sounds(&s).contains(&SoundEffect::Collect));
    }

    #[test]
    fn test_repair_kit_heals_to_cap() {
        let mut s = empty_session(2);
        s.player.hp = 90;
        let id = s.next_entity_id();
        s.repair_kits.push(Pickup {
            id,
            kind: PickupKind::RepairKit,
            body: Body::new(Vec2::ZERO, PICKUP_RADIUS),
        });

        resolve_collisions(&mut s);

        assert_eq!(s.player.hp, PLAYER_MAX_HP);
        // Level 2 always replaces the kit
        assert_eq!(s.repair_kits.len(), 1);
        assert_ne!(s.repair_kits[0].id, id);
    }

    #[test]
    fn test_bullet_damages_enemy_without_killing() {
        let mut s = empty_session(1);
        let id = s.next_entity_id();
        s.enemies
            .push(Enemy::new(id, EnemyKind::Chaser, Vec2::new(1000.0, 0.0), 0.0));
        player_bullet(&mut s, Vec2::new(1000.0, 5.0));

        resolve_collisions(&mut s);

        assert!(s.bullets.is_empty());
        assert_eq!(s.enemies.len(), 1);
        assert_eq!(s.enemies[0].hp, EnemyKind::Chaser.max_hp() - 1);
        assert_eq!(s.score, 0);
        assert_eq!(s.particles.len(), 3);
    }

    #[test]
    fn test_destroyed_enemy_is_replaced_outside_endless() {
        let mut s = empty_session(1);
        let id = s.next_entity_id();
        let mut enemy = Enemy::new(id, EnemyKind::Chaser, Vec2::new(1000.0, 0.0), 0.0);
        enemy.hp = 1;
        s.enemies.push(enemy);
        player_bullet(&mut s, Vec2::new(1000.0, 0.0));

        resolve_collisions(&mut s);

        assert_eq!(s.score, SCORE_ENEMY);
        assert_eq!(s.enemies.len(), 1);
        assert_ne!(s.enemies[0].id, id);
        assert!(sounds(&s).contains(&SoundEffect::Explosion));
        // 3 impact + 15 debris
        assert_eq!(s.particles.len(), 18);
    }

    #[test]
    fn test_destroyed_enemy_not_replaced_in_endless() {
        let mut s = empty_session(4);
        let id = s.next_entity_id();
        let mut enemy = Enemy::new(id, EnemyKind::Shooter, Vec2::new(1000.0, 0.0), 1.0);
        enemy.hp = 1;
        s.enemies.push(enemy);
        player_bullet(&mut s, Vec2::new(1000.0, 0.0));

        resolve_collisions(&mut s);

        assert_eq!(s.score, SCORE_ENEMY);
        assert!(s.enemies.is_empty());
    }

    #[test]
    fn test_one_bullet_hits_every_overlapping_enemy() {
        let mut s = empty_session(4);
        for x in [1000.0, 1010.0] {
            let id = s.next_entity_id();
            s.enemies.push(Enemy::new(id, EnemyKind::Chaser, Vec2::new(x, 0.0), 0.0));
        }
        player_bullet(&mut s, Vec2::new(1005.0, 0.0));

        resolve_collisions(&mut s);

        assert!(s.enemies.iter().all(|e| e.hp == EnemyKind::Chaser.max_hp() - 1));
    }

    #[test]
    fn test_spent_bullet_does_not_hit_asteroid() {
        let mut s = empty_session(1);
        let id = s.next_entity_id();
        s.enemies.push(Enemy::new(id, EnemyKind::Chaser, Vec2::new(1000.0, 0.0), 0.0));
        let id = s.next_entity_id();
        s.asteroids.push(Asteroid {
            id,
            body: Body::new(Vec2::new(1000.0, 0.0), 30.0),
            spin: 0.0,
            scale: 0.6,
        });
        player_bullet(&mut s, Vec2::new(1000.0, 0.0));

        resolve_collisions(&mut s);

        assert_eq!(s.asteroids.len(), 1);
        assert_eq!(s.asteroids[0].id, id);
    }

    #[test]
    fn test_shot_enemy_is_not_rammed() {
        let mut s = empty_session(1);
        let id = s.next_entity_id();
        let mut enemy = Enemy::new(id, EnemyKind::Chaser, Vec2::new(10.0, 0.0), 0.0);
        enemy.hp = 1;
        s.enemies.push(enemy);
        player_bullet(&mut s, Vec2::new(10.0, 0.0));

        resolve_collisions(&mut s);

        // Killed by the bullet, so the ram stage skips it
        assert_eq!(s.player.hp, PLAYER_MAX_HP);
        assert_eq!(s.score, SCORE_ENEMY);
        assert!(s.enemies.iter().all(|e| e.id != id));
        assert!(!sounds(&s).contains(&SoundEffect::Hit));
    }

    #[test]
    fn test_shot_asteroid_is_not_rammed() {
        let mut s = empty_session(0);
        let id = s.next_entity_id();
        s.asteroids.push(Asteroid {
            id,
            body: Body::new(Vec2::new(0.0, 20.0), 30.0),
            spin: 0.0,
            scale: 0.6,
        });
        player_bullet(&mut s, Vec2::new(0.0, 20.0));

        resolve_collisions(&mut s);

        assert_eq!(s.player.hp, PLAYER_MAX_HP);
        assert_eq!(s.score, SCORE_ASTEROID);
        assert!(s.asteroids.iter().all(|a| a.id != id));
        assert!(!sounds(&s).contains(&SoundEffect::Hit));
    }

    #[test]
    fn test_bullet_destroys_asteroid() {
        let mut s = empty_session(0);
        let id = s.next_entity_id();
        s.asteroids.push(Asteroid {
            id,
            body: Body::new(Vec2::new(900.0, 900.0), 30.0),
            spin: 0.0,
            scale: 0.6,
        });
        player_bullet(&mut s, Vec2::new(900.0, 880.0));

        resolve_collisions(&mut s);

        assert_eq!(s.score, SCORE_ASTEROID);
        assert_eq!(s.asteroids.len(), 1);
        assert_ne!(s.asteroids[0].id, id);
        assert!(s.bullets.is_empty());
    }

    #[test]
    fn test_hostile_bullet_damages_player() {
        let mut s = empty_session(2);
        let id = s.next_entity_id();
        s.bullets
            .push(Bullet::new(id, Vec2::new(5.0, 0.0), Vec2::ZERO, 0.0, true));

        resolve_collisions(&mut s);

        assert_eq!(s.player.hp, PLAYER_MAX_HP - DAMAGE_HOSTILE_BULLET);
        assert!(s.bullets.is_empty());
        assert_eq!(s.particles.len(), 5);
    }

    #[test]
    fn test_player_bullet_ignores_player() {
        let mut s = empty_session(2);
        player_bullet(&mut s, Vec2::ZERO);

        resolve_collisions(&mut s);

        assert_eq!(s.player.hp, PLAYER_MAX_HP);
        assert_eq!(s.bullets.len(), 1);
    }

    #[test]
    fn test_asteroid_ram() {
        let mut s = empty_session(1);
        let id = s.next_entity_id();
        s.asteroids.push(Asteroid {
            id,
            body: Body::new(Vec2::new(20.0, 0.0), 30.0),
            spin: 0.0,
            scale: 0.6,
        });

        resolve_collisions(&mut s);

        assert_eq!(s.player.hp, PLAYER_MAX_HP - DAMAGE_ASTEROID_RAM);
        assert_eq!(s.asteroids.len(), 1);
        assert_ne!(s.asteroids[0].id, id);
        assert_eq!(s.score, 0);
    }

    #[test]
    fn test_kamikaze_ram_hurts_more() {
        let mut s = empty_session(3);
        let id = s.next_entity_id();
        s.enemies
            .push(Enemy::new(id, EnemyKind::Kamikaze, Vec2::new(10.0, 0.0), 0.0));

        resolve_collisions(&mut s);

        assert_eq!(s.player.hp, PLAYER_MAX_HP - 30);
        // Ramming earns nothing and does not trigger the nova
        assert_eq!(s.score, 0);
        assert!(s.bullets.is_empty());
        assert_eq!(s.enemies.len(), 1);
        assert_ne!(s.enemies[0].id, id);
    }

    #[test]
    fn test_nearest_skips_dead() {
        let mut a = Body::new(Vec2::new(1.0, 0.0), 1.0);
        a.kill();
        let b = Body::new(Vec2::new(5.0, 0.0), 1.0);
        let c = Body::new(Vec2::new(9.0, 0.0), 1.0);
        let bodies = [a, b, c];
        let found = nearest(Vec2::ZERO, bodies.iter()).unwrap();
        assert_eq!(found.pos, b.pos);
    }
}
