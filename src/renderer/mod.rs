//! Draw-order contract
//!
//! The simulation has no idea how anything looks. `render` flattens a session
//! into sprite batches and hands them to a `Renderer` back to front:
//! background, pickups, particles, thrusters, asteroids, enemies, bullets,
//! player. Thrusters go before the ships so flames sit underneath hulls.

use glam::Vec2;

use crate::sim::{EnemyKind, Session, Thruster, Tint};

/// One batch in the fixed draw order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawGroup {
    Background,
    Pickups,
    Particles,
    Thrusters,
    Asteroids,
    Enemies,
    Bullets,
    Player,
}

/// Back-to-front order of every frame
pub const DRAW_ORDER: [DrawGroup; 8] = [
    DrawGroup::Background,
    DrawGroup::Pickups,
    DrawGroup::Particles,
    DrawGroup::Thrusters,
    DrawGroup::Asteroids,
    DrawGroup::Enemies,
    DrawGroup::Bullets,
    DrawGroup::Player,
];

/// What texture/shape a sprite stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    Star,
    Trash,
    RepairKit,
    Particle,
    Flame,
    Asteroid,
    Enemy(EnemyKind),
    Bullet,
    Player,
}

/// A drawable instance in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub kind: SpriteKind,
    pub pos: Vec2,
    /// Degrees, clockwise, 0 = up
    pub angle: f32,
    pub scale: f32,
    pub tint: Tint,
    pub alpha: u8,
}

impl Sprite {
    fn new(kind: SpriteKind, pos: Vec2, angle: f32, tint: Tint) -> Self {
        Self {
            kind,
            pos,
            angle,
            scale: 1.0,
            tint,
            alpha: u8::MAX,
        }
    }

    fn flame(thruster: &Thruster) -> Self {
        Self {
            scale: thruster.flare.scale(),
            ..Self::new(SpriteKind::Flame, thruster.pos, thruster.angle, thruster.flare.tint())
        }
    }
}

/// Whatever puts sprites on screen
pub trait Renderer {
    /// Called once per frame before any group, with the point to centre on
    fn begin_frame(&mut self, _camera_focus: Vec2) {}

    fn draw_group(&mut self, group: DrawGroup, sprites: &[Sprite]);

    /// Screen-space HUD text, drawn after the world
    fn draw_hud(&mut self, _lines: &[String]) {}
}

/// Sprites for one draw group
pub fn sprites_for(session: &Session, group: DrawGroup) -> Vec<Sprite> {
    match group {
        DrawGroup::Background => session
            .stars
            .iter()
            .map(|s| Sprite {
                alpha: s.alpha,
                ..Sprite::new(SpriteKind::Star, s.pos, 0.0, Tint::White)
            })
            .collect(),
        DrawGroup::Pickups => session
            .trash
            .iter()
            .map(|p| Sprite::new(SpriteKind::Trash, p.body.pos, p.body.angle, Tint::White))
            .chain(session.repair_kits.iter().map(|p| {
                Sprite::new(SpriteKind::RepairKit, p.body.pos, p.body.angle, Tint::Green)
            }))
            .collect(),
        DrawGroup::Particles => session
            .particles
            .iter()
            .map(|p| Sprite {
                alpha: p.alpha,
                ..Sprite::new(SpriteKind::Particle, p.body.pos, p.body.angle, p.tint)
            })
            .collect(),
        DrawGroup::Thrusters => std::iter::once(&session.player.thruster)
            .chain(session.enemies.iter().map(|e| &e.thruster))
            .map(Sprite::flame)
            .collect(),
        DrawGroup::Asteroids => session
            .asteroids
            .iter()
            .map(|a| Sprite {
                scale: a.scale,
                ..Sprite::new(SpriteKind::Asteroid, a.body.pos, a.body.angle, Tint::White)
            })
            .collect(),
        DrawGroup::Enemies => session
            .enemies
            .iter()
            .map(|e| {
                Sprite::new(SpriteKind::Enemy(e.kind), e.body.pos, e.body.angle, e.kind.tint())
            })
            .collect(),
        DrawGroup::Bullets => session
            .bullets
            .iter()
            .map(|b| Sprite::new(SpriteKind::Bullet, b.body.pos, b.body.angle, b.tint()))
            .collect(),
        DrawGroup::Player => vec![Sprite::new(
            SpriteKind::Player,
            session.player.body.pos,
            session.player.body.angle,
            Tint::White,
        )],
    }
}

/// Draw a whole frame in `DRAW_ORDER`, then the HUD.
///
/// With `starfield` off the background group is still drawn, but empty.
pub fn render<R: Renderer + ?Sized>(session: &Session, renderer: &mut R, starfield: bool) {
    renderer.begin_frame(session.camera_focus);
    for group in DRAW_ORDER {
        let sprites = if group == DrawGroup::Background && !starfield {
            Vec::new()
        } else {
            sprites_for(session, group)
        };
        renderer.draw_group(group, &sprites);
    }
    renderer.draw_hud(&[session.status_line(), session.goal_line()]);
}
