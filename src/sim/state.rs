//! Game state and core simulation types
//!
//! A `Session` owns every entity group of one playthrough. Groups are plain
//! vectors; an entity lives in exactly one of them and leaves it only when
//! its `alive` flag is cleared and the group is retained.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Body, Collider, Thruster, Tint};
use super::level::Level;
use crate::consts::*;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Running,
    Paused,
    /// Non-endless goal reached
    Won,
    /// Player hull destroyed
    Lost,
}

impl GamePhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Lost)
    }
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Won,
    Lost,
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Player fires
    Laser,
    /// Shooter fires
    EnemyLaser,
    /// Asteroid or enemy destroyed
    Explosion,
    /// Player takes damage
    Hit,
    /// Trash collected
    Collect,
    /// Repair kit collected
    Heal,
    /// Level won
    Win,
    /// Player destroyed
    Defeat,
}

/// Looping background music
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MusicTrack {
    Menu,
    Level(u8),
}

/// Side effects for collaborators outside the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Sound { effect: SoundEffect, volume: f32 },
    Music(MusicTrack),
    StopMusic,
    /// Emitted once, on the tick the session turns terminal
    SessionEnded {
        outcome: Outcome,
        level: Level,
        score: u64,
    },
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    /// Hull points, 0..=100
    pub hp: u32,
    /// Degrees per tick, set by turn input edges
    pub turn_rate: f32,
    pub thruster: Thruster,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            body: Body::new(Vec2::ZERO, PLAYER_RADIUS),
            hp: PLAYER_MAX_HP,
            turn_rate: 0.0,
            thruster: Thruster::new(35.0),
        }
    }
}

impl Player {
    /// Subtract hull points, stopping at zero
    pub fn damage(&mut self, amount: u32) {
        self.hp = self.hp.saturating_sub(amount);
    }

    /// Add hull points, stopping at the maximum
    pub fn heal(&mut self, amount: u32) {
        self.hp = self.hp.saturating_add(amount).min(PLAYER_MAX_HP);
    }

    pub fn is_destroyed(&self) -> bool {
        self.hp == 0
    }
}

impl Collider for Player {
    fn body(&self) -> &Body {
        &self.body
    }
}

/// A drifting rock, destroyed in one hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asteroid {
    pub id: u32,
    pub body: Body,
    /// Degrees per tick
    pub spin: f32,
    /// Draw scale (0.5..0.8)
    pub scale: f32,
}

impl Collider for Asteroid {
    fn body(&self) -> &Body {
        &self.body
    }
}

/// A projectile fired by the player or an enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub body: Body,
    /// Seconds left before the bullet expires
    pub ttl: f32,
    /// Fired by an enemy (hits the player) rather than by the player (hits enemies)
    pub hostile: bool,
}

impl Bullet {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, angle: f32, hostile: bool) -> Self {
        Self {
            id,
            body: Body::new(pos, BULLET_RADIUS)
                .with_velocity(vel)
                .with_angle(angle),
            ttl: if hostile {
                HOSTILE_BULLET_TTL
            } else {
                PLAYER_BULLET_TTL
            },
            hostile,
        }
    }

    pub fn tint(&self) -> Tint {
        if self.hostile { Tint::Blue } else { Tint::Red }
    }
}

impl Collider for Bullet {
    fn body(&self) -> &Body {
        &self.body
    }
}

/// Pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    /// Worth score
    Trash,
    /// Restores hull
    RepairKit,
}

/// A stationary collectible
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: PickupKind,
    pub body: Body,
}

impl Collider for Pickup {
    fn body(&self) -> &Body {
        &self.body
    }
}

/// Decorative background star
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
    /// 50..=180
    pub alpha: u8,
}

/// A fading explosion fragment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub body: Body,
    /// Degrees per tick
    pub spin: f32,
    pub alpha: u8,
    /// Alpha lost per tick
    pub fade_rate: u8,
    pub tint: Tint,
}

/// What an enemy leaves behind when shot down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathEffect {
    /// Particle burst only
    Debris,
    /// Particle burst plus a ring of hostile bullets
    Nova,
}

/// Enemy variants. Everything that differs between them is answered here as
/// data so the resolver never inspects concrete types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Flies straight at the player
    Chaser,
    /// Holds range and fires periodically
    Shooter,
    /// Fast, fragile, wobbles toward the player and bursts on death
    Kamikaze,
}

impl EnemyKind {
    pub fn max_hp(self) -> u8 {
        match self {
            EnemyKind::Chaser => 3,
            EnemyKind::Shooter => 2,
            EnemyKind::Kamikaze => 1,
        }
    }

    /// Cruise speed, units per second
    pub fn speed(self) -> f32 {
        match self {
            EnemyKind::Chaser => 3.0 * TICK_RATE,
            EnemyKind::Shooter => 2.0 * TICK_RATE,
            EnemyKind::Kamikaze => 4.0 * TICK_RATE,
        }
    }

    pub fn radius(self) -> f32 {
        match self {
            EnemyKind::Chaser | EnemyKind::Shooter => 24.0,
            EnemyKind::Kamikaze => 19.0,
        }
    }

    pub fn thruster_offset(self) -> f32 {
        match self {
            EnemyKind::Chaser | EnemyKind::Shooter => 35.0,
            EnemyKind::Kamikaze => 25.0,
        }
    }

    /// Hull tint
    pub fn tint(self) -> Tint {
        match self {
            EnemyKind::Chaser => Tint::Blue,
            EnemyKind::Shooter => Tint::Green,
            EnemyKind::Kamikaze => Tint::Crimson,
        }
    }

    pub fn explosion_tint(self) -> Tint {
        match self {
            EnemyKind::Chaser => Tint::Blue,
            EnemyKind::Shooter => Tint::Green,
            EnemyKind::Kamikaze => Tint::Red,
        }
    }

    pub fn death_effect(self) -> DeathEffect {
        match self {
            EnemyKind::Kamikaze => DeathEffect::Nova,
            _ => DeathEffect::Debris,
        }
    }

    /// Hull damage dealt to the player on contact
    pub fn ram_damage(self) -> u32 {
        match self {
            EnemyKind::Kamikaze => 30,
            _ => 15,
        }
    }

    /// Whether the kind pushes away from nearby squadmates
    pub fn separates(self) -> bool {
        !matches!(self, EnemyKind::Kamikaze)
    }
}

/// A hostile ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub body: Body,
    pub hp: u8,
    /// Seconds until the next shot (shooters)
    pub fire_timer: f32,
    /// Oscillator phase (kamikazes)
    pub wobble: f32,
    pub thruster: Thruster,
}

impl Enemy {
    /// `fire_phase` staggers the first shot so co-spawned shooters don't fire together
    pub fn new(id: u32, kind: EnemyKind, pos: Vec2, fire_phase: f32) -> Self {
        Self {
            id,
            kind,
            body: Body::new(pos, kind.radius()),
            hp: kind.max_hp(),
            fire_timer: fire_phase,
            wobble: 0.0,
            thruster: Thruster::new(kind.thruster_offset()),
        }
    }

    /// Take one point of damage; returns true when this destroys the ship
    pub fn hit(&mut self) -> bool {
        self.hp = self.hp.saturating_sub(1);
        self.hp == 0
    }
}

impl Collider for Enemy {
    fn body(&self) -> &Body {
        &self.body
    }
}

/// Per-playthrough configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub level: Level,
    /// Run seed for reproducibility
    pub seed: u64,
    /// Oldest particles are dropped beyond this count
    pub max_particles: usize,
    /// Minimum distance between a new spawn and the player
    pub spawn_clearance: f32,
    /// Optional ceiling on the endless-mode enemy cap
    #[serde(default)]
    pub enemy_ceiling: Option<usize>,
    /// Skip the initial star/asteroid/trash/enemy placement
    #[serde(default)]
    pub empty_world: bool,
}

impl SessionConfig {
    pub fn new(level: Level, seed: u64) -> Self {
        Self {
            level,
            seed,
            max_particles: 500,
            spawn_clearance: SPAWN_CLEARANCE,
            enemy_ceiling: None,
            empty_world: false,
        }
    }
}

/// Complete state of one playthrough
#[derive(Debug, Clone)]
pub struct Session {
    pub config: SessionConfig,
    pub level: Level,
    pub phase: GamePhase,
    pub score: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Where the viewport should be centred
    pub camera_focus: Vec2,
    pub player: Player,
    pub stars: Vec<Star>,
    pub asteroids: Vec<Asteroid>,
    pub bullets: Vec<Bullet>,
    pub trash: Vec<Pickup>,
    pub repair_kits: Vec<Pickup>,
    pub enemies: Vec<Enemy>,
    pub particles: Vec<Particle>,
    /// Pending events for the host; drained after every tick
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl Session {
    /// Create a session and populate its world
    pub fn new(config: SessionConfig) -> Self {
        let mut session = Self {
            level: config.level,
            rng: Pcg32::seed_from_u64(config.seed),
            config,
            phase: GamePhase::Running,
            score: 0,
            time_ticks: 0,
            camera_focus: Vec2::ZERO,
            player: Player::default(),
            stars: Vec::new(),
            asteroids: Vec::new(),
            bullets: Vec::new(),
            trash: Vec::new(),
            repair_kits: Vec::new(),
            enemies: Vec::new(),
            particles: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        };

        if !session.config.empty_world {
            session.populate();
        }
        session.events.push(GameEvent::Music(session.level.music()));

        log::info!(
            "Session started: level {} seed {} ({} asteroids, {} trash, {} enemies)",
            session.level,
            session.config.seed,
            session.asteroids.len(),
            session.trash.len(),
            session.enemies.len()
        );

        session
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Queue a sound for the host
    pub fn play(&mut self, effect: SoundEffect, volume: f32) {
        self.events.push(GameEvent::Sound { effect, volume });
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Outcome once the session is over
    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            GamePhase::Won => Some(Outcome::Won),
            GamePhase::Lost => Some(Outcome::Lost),
            _ => None,
        }
    }

    /// Drop every entity whose alive flag was cleared
    pub fn retain_alive(&mut self) {
        self.asteroids.retain(|a| a.body.alive);
        self.bullets.retain(|b| b.body.alive);
        self.trash.retain(|p| p.body.alive);
        self.repair_kits.retain(|p| p.body.alive);
        self.enemies.retain(|e| e.body.alive);
        self.particles.retain(|p| p.body.alive);
    }

    /// HUD text for the host
    pub fn status_line(&self) -> String {
        format!(
            "Score: {}  |  Hull: {}%  |  Level: {}",
            self.score, self.player.hp, self.level
        )
    }

    /// Goal caption for the HUD
    pub fn goal_line(&self) -> String {
        match self.level.goal() {
            Some(goal) => format!("GOAL: {goal}"),
            None => "GOAL: SURVIVE".to_string(),
        }
    }
}
