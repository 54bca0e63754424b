//! End-to-end session scenarios driven through the public tick API

use glam::Vec2;

use space_scavenger::consts::*;
use space_scavenger::sim::{
    Body, Bullet, Enemy, EnemyKind, GameEvent, GamePhase, Level, Outcome, Pickup, PickupKind,
    Session, SessionConfig, TickInput, choose_enemy_kind, tick,
};

fn empty_session(level: u8, seed: u64) -> Session {
    Session::new(SessionConfig {
        empty_world: true,
        ..SessionConfig::new(Level::new(level).unwrap(), seed)
    })
}

fn session_ended(session: &Session) -> Vec<(Outcome, u64)> {
    session
        .events
        .iter()
        .filter_map(|e| match e {
            GameEvent::SessionEnded { outcome, score, .. } => Some((*outcome, *score)),
            _ => None,
        })
        .collect()
}

#[test]
fn tutorial_never_spawns_enemies() {
    let mut session = Session::new(SessionConfig::new(Level::TUTORIAL, 2024));
    let autopilot = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    for _ in 0..2_000 {
        tick(&mut session, &autopilot, SIM_DT);
        assert!(session.enemies.is_empty());
        session.events.clear();
    }

    for roll in [0.0, 0.3, 0.99] {
        for score in [0, 1_000, 100_000] {
            assert_eq!(choose_enemy_kind(Level::TUTORIAL, score, roll), None);
        }
    }
}

#[test]
fn ram_below_zero_hull_loses_with_score_kept() {
    let mut session = empty_session(1, 11);
    session.score = 300;
    session.player.hp = 10;
    let id = session.next_entity_id();
    session
        .enemies
        .push(Enemy::new(id, EnemyKind::Chaser, Vec2::new(10.0, 0.0), 0.0));

    tick(&mut session, &TickInput::default(), SIM_DT);

    assert_eq!(session.player.hp, 0);
    assert_eq!(session.phase, GamePhase::Lost);
    assert_eq!(session.score, 300);
    assert_eq!(session_ended(&session), vec![(Outcome::Lost, 300)]);
}

#[test]
fn reaching_goal_wins_on_same_tick() {
    let mut session = empty_session(0, 12);
    session.score = 450;
    let id = session.next_entity_id();
    session.trash.push(Pickup {
        id,
        kind: PickupKind::Trash,
        body: Body::new(Vec2::new(5.0, 5.0), PICKUP_RADIUS),
    });

    tick(&mut session, &TickInput::default(), SIM_DT);

    assert_eq!(session.score, 500);
    assert_eq!(session.phase, GamePhase::Won);
    assert_eq!(session.time_ticks, 1);
    assert_eq!(session_ended(&session), vec![(Outcome::Won, 500)]);
}

#[test]
fn overshooting_goal_also_wins() {
    let mut session = empty_session(1, 13);
    session.score = 1_480;
    let id = session.next_entity_id();
    session.trash.push(Pickup {
        id,
        kind: PickupKind::Trash,
        body: Body::new(Vec2::ZERO, PICKUP_RADIUS),
    });

    tick(&mut session, &TickInput::default(), SIM_DT);

    assert_eq!(session.score, 1_530);
    assert_eq!(session.phase, GamePhase::Won);
}

#[test]
fn kamikaze_death_releases_nova() {
    let mut session = empty_session(3, 14);
    let kamikaze_id = session.next_entity_id();
    session
        .enemies
        .push(Enemy::new(kamikaze_id, EnemyKind::Kamikaze, Vec2::new(0.0, 500.0), 0.0));
    let bullet_id = session.next_entity_id();
    session.bullets.push(Bullet::new(
        bullet_id,
        Vec2::new(0.0, 500.0),
        Vec2::ZERO,
        0.0,
        false,
    ));

    tick(&mut session, &TickInput::default(), SIM_DT);

    assert_eq!(session.score, SCORE_ENEMY);
    assert!(session.enemies.iter().all(|e| e.id != kamikaze_id));

    let nova: Vec<&Bullet> = session.bullets.iter().filter(|b| b.hostile).collect();
    assert_eq!(nova.len(), NOVA_BULLETS as usize);
    assert!(session.bullets.iter().all(|b| b.id != bullet_id));
    for bullet in &nova {
        assert!((bullet.body.vel.length() - NOVA_SPEED).abs() < 1e-2);
        assert!((bullet.body.pos - Vec2::new(0.0, 496.0)).length() < 1.0);
    }
    // Evenly spread: every pair of headings differs
    for (i, a) in nova.iter().enumerate() {
        for b in &nova[i + 1..] {
            assert!(a.body.vel.normalize().dot(b.body.vel.normalize()) < 0.95);
        }
    }
}

#[test]
fn autopilot_session_keeps_invariants() {
    let mut session = Session::new(SessionConfig::new(Level::new(2).unwrap(), 31337));
    let autopilot = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    let mut ended = 0;
    let mut last_score = 0;

    for _ in 0..3_000 {
        tick(&mut session, &autopilot, SIM_DT);

        assert!(session.player.hp <= PLAYER_MAX_HP);
        assert!(session.score >= last_score);
        last_score = session.score;
        assert!(session.particles.len() <= session.config.max_particles);
        assert!(session.player.body.pos.x.abs() <= MAP_SIZE);
        assert!(session.player.body.pos.y.abs() <= MAP_SIZE);
        // Groups never hold destroyed entities between ticks
        assert!(session.enemies.iter().all(|e| e.body.alive));
        assert!(session.bullets.iter().all(|b| b.body.alive));

        ended += session_ended(&session).len();
        session.events.clear();
        if session.phase.is_terminal() {
            break;
        }
    }

    assert!(ended <= 1);
    assert_eq!(ended == 1, session.phase.is_terminal());
}
