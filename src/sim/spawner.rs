//! Entity placement and population policy
//!
//! New entities land at uniform random positions in the world, rejected
//! while too close to the player. Sampling gives up after a fixed number of
//! attempts and the spawn is skipped for this tick.

use glam::Vec2;
use rand::Rng;

use super::entity::{Body, Tint};
use super::level::Level;
use super::state::{
    Asteroid, Bullet, Enemy, EnemyKind, Particle, Pickup, PickupKind, Session, Star,
};
use crate::consts::*;

/// Sample a position at least `clearance` away from `avoid`.
///
/// Returns `None` after `max_attempts` rejections.
pub fn spawn_position<R: Rng>(
    rng: &mut R,
    avoid: Vec2,
    clearance: f32,
    max_attempts: u32,
) -> Option<Vec2> {
    (0..max_attempts).find_map(|_| {
        let candidate = Vec2::new(
            rng.random_range(-MAP_SIZE..MAP_SIZE),
            rng.random_range(-MAP_SIZE..MAP_SIZE),
        );
        (candidate.distance(avoid) >= clearance).then_some(candidate)
    })
}

/// Enemy mix for a level, decided by `roll` in [0, 1).
///
/// Endless mode escalates with score instead of level.
pub fn choose_enemy_kind(level: Level, score: u64, roll: f64) -> Option<EnemyKind> {
    use EnemyKind::*;

    match level.index() {
        0 => None,
        1 => Some(Chaser),
        2 => Some(if roll < 0.7 { Chaser } else { Shooter }),
        3 => Some(if roll < 0.5 {
            Chaser
        } else if roll < 0.8 {
            Shooter
        } else {
            Kamikaze
        }),
        _ => Some(if score < 500 {
            Chaser
        } else if score < 2000 {
            if roll < 0.6 { Chaser } else { Shooter }
        } else if roll < 0.4 {
            Chaser
        } else if roll < 0.7 {
            Shooter
        } else {
            Kamikaze
        }),
    }
}

/// Endless-mode enemy cap as a step function of score.
///
/// Past 5000 the cap grows by one per 1000 points without bound; sessions
/// can bound it through `SessionConfig::enemy_ceiling`.
pub fn enemy_cap(score: u64) -> usize {
    if score > 5000 {
        12 + ((score - 5000) / 1000) as usize
    } else if score > 2000 {
        12
    } else if score > 500 {
        7
    } else {
        4
    }
}

impl Session {
    /// Effective endless-mode cap for the current score
    pub fn enemy_limit(&self) -> usize {
        let cap = enemy_cap(self.score);
        match self.config.enemy_ceiling {
            Some(ceiling) => cap.min(ceiling),
            None => cap,
        }
    }

    /// Bernoulli draw from the session RNG
    pub(crate) fn rng_chance(&mut self, p: f64) -> bool {
        self.rng.random_bool(p)
    }

    /// Random spawn position clear of the player
    fn clear_position(&mut self) -> Option<Vec2> {
        let found = spawn_position(
            &mut self.rng,
            self.player.body.pos,
            self.config.spawn_clearance,
            SPAWN_MAX_ATTEMPTS,
        );
        if found.is_none() {
            log::debug!("No clear spawn position after {SPAWN_MAX_ATTEMPTS} attempts, skipping");
        }
        found
    }

    /// Fill a fresh world
    pub(crate) fn populate(&mut self) {
        for _ in 0..STAR_COUNT {
            let pos = Vec2::new(
                self.rng.random_range(-MAP_SIZE..MAP_SIZE),
                self.rng.random_range(-MAP_SIZE..MAP_SIZE),
            );
            let alpha = self.rng.random_range(50..=180u8);
            self.stars.push(Star { pos, alpha });
        }

        for _ in 0..ASTEROID_COUNT {
            self.spawn_asteroid();
        }
        for _ in 0..TRASH_COUNT {
            self.spawn_pickup(PickupKind::Trash);
        }
        let mut enemies = self.level.initial_enemies();
        if self.level.is_endless() {
            enemies = enemies.min(self.enemy_limit());
        }
        for _ in 0..enemies {
            self.spawn_enemy();
        }
        for _ in 0..self.level.initial_repair_kits() {
            self.spawn_pickup(PickupKind::RepairKit);
        }
    }

    /// Place a drifting asteroid; returns false when placement was skipped
    pub fn spawn_asteroid(&mut self) -> bool {
        let Some(pos) = self.clear_position() else {
            return false;
        };
        let id = self.next_entity_id();
        let scale = self.rng.random_range(0.5..0.8);
        let vel = Vec2::new(
            self.rng.random_range(-ASTEROID_MAX_DRIFT..ASTEROID_MAX_DRIFT),
            self.rng.random_range(-ASTEROID_MAX_DRIFT..ASTEROID_MAX_DRIFT),
        );
        let spin = self.rng.random_range(-ASTEROID_MAX_SPIN..ASTEROID_MAX_SPIN);
        self.asteroids.push(Asteroid {
            id,
            body: Body::new(pos, 50.0 * scale).with_velocity(vel),
            spin,
            scale,
        });
        true
    }

    /// Place a trash or repair pickup; returns false when placement was skipped
    pub fn spawn_pickup(&mut self, kind: PickupKind) -> bool {
        let Some(pos) = self.clear_position() else {
            return false;
        };
        let id = self.next_entity_id();
        let pickup = Pickup {
            id,
            kind,
            body: Body::new(pos, PICKUP_RADIUS),
        };
        match kind {
            PickupKind::Trash => self.trash.push(pickup),
            PickupKind::RepairKit => self.repair_kits.push(pickup),
        }
        true
    }

    /// Place an enemy chosen by the level's mix; returns false when nothing spawned
    pub fn spawn_enemy(&mut self) -> bool {
        let roll = self.rng.random::<f64>();
        let Some(kind) = choose_enemy_kind(self.level, self.score, roll) else {
            return false;
        };
        self.spawn_enemy_of(kind)
    }

    /// Place an enemy of a given kind
    pub fn spawn_enemy_of(&mut self, kind: EnemyKind) -> bool {
        let Some(pos) = self.clear_position() else {
            return false;
        };
        let id = self.next_entity_id();
        let fire_phase = match kind {
            EnemyKind::Shooter => self.rng.random_range(0.0..SHOOTER_MAX_INITIAL_PHASE),
            _ => 0.0,
        };
        log::debug!("Spawned {kind:?} #{id} at ({:.0}, {:.0})", pos.x, pos.y);
        self.enemies.push(Enemy::new(id, kind, pos, fire_phase));
        true
    }

    /// Endless mode: occasionally top the enemy group up toward the cap
    pub fn maintain_population(&mut self) {
        if !self.level.is_endless() {
            return;
        }
        if self.enemies.len() < self.enemy_limit() && self.rng.random_bool(ENDLESS_SPAWN_CHANCE) {
            self.spawn_enemy();
        }
    }

    /// Scatter `count` fading fragments from `pos`
    pub fn emit_burst(&mut self, pos: Vec2, tint: Tint, count: usize) {
        for _ in 0..count {
            let speed = self.rng.random_range(PARTICLE_MIN_SPEED..PARTICLE_MAX_SPEED);
            let dir = self.rng.random_range(0.0..std::f32::consts::TAU);
            let spin = self.rng.random_range(-PARTICLE_MAX_SPIN..PARTICLE_MAX_SPIN);
            let fade_rate = self.rng.random_range(5..=10u8);
            self.particles.push(Particle {
                body: Body::new(pos, 2.0).with_velocity(Vec2::new(dir.cos(), dir.sin()) * speed),
                spin,
                alpha: u8::MAX,
                fade_rate,
                tint,
            });
        }

        let max = self.config.max_particles;
        if self.particles.len() > max {
            let excess = self.particles.len() - max;
            self.particles.drain(..excess);
        }
    }

    /// Ring of hostile bullets, evenly spaced, leaving `pos`
    pub fn emit_nova(&mut self, pos: Vec2) {
        let step = 360.0 / NOVA_BULLETS as f32;
        for i in 0..NOVA_BULLETS {
            let deg = i as f32 * step;
            let dir = Vec2::new(deg.to_radians().cos(), deg.to_radians().sin());
            let id = self.next_entity_id();
            self.bullets
                .push(Bullet::new(id, pos, dir * NOVA_SPEED, deg - 90.0, true));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::SessionConfig;
    use crate::sim::tick::{TickInput, tick};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_position_respects_clearance() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..200 {
            let pos = spawn_position(&mut rng, Vec2::ZERO, SPAWN_CLEARANCE, SPAWN_MAX_ATTEMPTS)
                .expect("world is much larger than the clearance");
            assert!(pos.length() >= SPAWN_CLEARANCE);
            assert!(pos.x.abs() <= MAP_SIZE && pos.y.abs() <= MAP_SIZE);
        }
    }

    #[test]
    fn test_spawn_position_gives_up() {
        let mut rng = Pcg32::seed_from_u64(3);
        // No point in the world is this far from the origin
        assert!(spawn_position(&mut rng, Vec2::ZERO, MAP_SIZE * 3.0, 16).is_none());
    }

    #[test]
    fn test_spawn_skipped_when_no_room() {
        let mut session = Session::new(SessionConfig {
            empty_world: true,
            spawn_clearance: MAP_SIZE * 4.0,
            ..SessionConfig::new(Level::new(1).unwrap(), 5)
        });

        assert!(!session.spawn_enemy());
        assert!(!session.spawn_asteroid());
        assert!(!session.spawn_pickup(PickupKind::Trash));
        assert!(session.enemies.is_empty());
        assert!(session.asteroids.is_empty());
        assert!(session.trash.is_empty());
    }

    #[test]
    fn test_spawned_entities_clear_of_player() {
        let mut session = Session::new(SessionConfig::new(Level::new(3).unwrap(), 11));
        session.player.body.pos = Vec2::new(1200.0, -900.0);
        for _ in 0..50 {
            session.spawn_enemy();
            session.spawn_asteroid();
        }
        let player = session.player.body.pos;
        // Only the spawns made after the player moved are checked
        for enemy in session.enemies.iter().skip(10) {
            assert!(enemy.body.pos.distance(player) >= SPAWN_CLEARANCE);
        }
        for asteroid in session.asteroids.iter().skip(ASTEROID_COUNT) {
            assert!(asteroid.body.pos.distance(player) >= SPAWN_CLEARANCE);
        }
    }

    #[test]
    fn test_choose_enemy_kind_by_level() {
        use EnemyKind::*;
        let lvl = |n| Level::new(n).unwrap();

        for roll in [0.0, 0.3, 0.69, 0.99] {
            assert_eq!(choose_enemy_kind(lvl(0), 10_000, roll), None);
            assert_eq!(choose_enemy_kind(lvl(1), 0, roll), Some(Chaser));
        }

        assert_eq!(choose_enemy_kind(lvl(2), 0, 0.69), Some(Chaser));
        assert_eq!(choose_enemy_kind(lvl(2), 0, 0.7), Some(Shooter));

        assert_eq!(choose_enemy_kind(lvl(3), 0, 0.49), Some(Chaser));
        assert_eq!(choose_enemy_kind(lvl(3), 0, 0.5), Some(Shooter));
        assert_eq!(choose_enemy_kind(lvl(3), 0, 0.8), Some(Kamikaze));
    }

    #[test]
    fn test_choose_enemy_kind_endless_escalates() {
        use EnemyKind::*;
        let endless = Level::ENDLESS;

        assert_eq!(choose_enemy_kind(endless, 499, 0.99), Some(Chaser));
        assert_eq!(choose_enemy_kind(endless, 500, 0.59), Some(Chaser));
        assert_eq!(choose_enemy_kind(endless, 500, 0.6), Some(Shooter));
        assert_eq!(choose_enemy_kind(endless, 1999, 0.99), Some(Shooter));
        assert_eq!(choose_enemy_kind(endless, 2000, 0.39), Some(Chaser));
        assert_eq!(choose_enemy_kind(endless, 2000, 0.4), Some(Shooter));
        assert_eq!(choose_enemy_kind(endless, 2000, 0.7), Some(Kamikaze));
    }

    #[test]
    fn test_enemy_cap_steps() {
        assert_eq!(enemy_cap(0), 4);
        assert_eq!(enemy_cap(500), 4);
        assert_eq!(enemy_cap(501), 7);
        assert_eq!(enemy_cap(2001), 12);
        assert_eq!(enemy_cap(5999), 12);
        assert_eq!(enemy_cap(6000), 13);
        assert_eq!(enemy_cap(15_000), 22);
    }

    #[test]
    fn test_enemy_ceiling_bounds_cap() {
        let mut config = SessionConfig::new(Level::ENDLESS, 1);
        config.enemy_ceiling = Some(15);
        config.empty_world = true;
        let mut session = Session::new(config);
        session.score = 100_000;
        assert_eq!(session.enemy_limit(), 15);
    }

    #[test]
    fn test_enemy_ceiling_limits_initial_population() {
        let mut config = SessionConfig::new(Level::ENDLESS, 1);
        config.enemy_ceiling = Some(2);
        let mut session = Session::new(config);
        assert_eq!(session.enemies.len(), 2);

        for _ in 0..120 {
            tick(&mut session, &TickInput::default(), SIM_DT);
            assert!(session.enemies.len() <= session.enemy_limit());
        }
    }

    #[test]
    fn test_nova_ring() {
        let mut session = Session::new(SessionConfig {
            empty_world: true,
            ..SessionConfig::new(Level::new(3).unwrap(), 2)
        });
        let origin = Vec2::new(800.0, -300.0);
        session.emit_nova(origin);

        assert_eq!(session.bullets.len(), NOVA_BULLETS as usize);
        for bullet in &session.bullets {
            assert!(bullet.hostile);
            assert_eq!(bullet.body.pos, origin);
            assert!((bullet.body.vel.length() - NOVA_SPEED).abs() < 1e-2);
        }
        // Evenly spread: the directions sum to zero
        let sum: Vec2 = session.bullets.iter().map(|b| b.body.vel).sum();
        assert!(sum.length() < 1e-2);
    }

    #[test]
    fn test_particle_cap_drops_oldest() {
        let mut session = Session::new(SessionConfig {
            max_particles: 10,
            empty_world: true,
            ..SessionConfig::new(Level::TUTORIAL, 2)
        });
        session.emit_burst(Vec2::ZERO, Tint::Grey, 8);
        session.emit_burst(Vec2::ONE, Tint::Red, 8);
        assert_eq!(session.particles.len(), 10);
        assert_eq!(session.particles.last().map(|p| p.tint), Some(Tint::Red));
        assert_eq!(session.particles[0].tint, Tint::Grey);
    }
}
