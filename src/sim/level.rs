//! Level table: goals, starting populations and music

use serde::{Deserialize, Serialize};

use super::state::MusicTrack;

/// A playable level, 0 (tutorial) through 4 (endless survival)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Level(u8);

impl Level {
    pub const TUTORIAL: Level = Level(0);
    pub const ENDLESS: Level = Level(4);
    pub const ALL: [Level; 5] = [Level(0), Level(1), Level(2), Level(3), Level(4)];

    pub fn new(index: u8) -> Option<Self> {
        (index <= Self::ENDLESS.0).then_some(Level(index))
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Score that wins the level; endless mode has none
    pub fn goal(self) -> Option<u64> {
        match self.0 {
            0 => Some(500),
            1 => Some(1500),
            2 => Some(2500),
            3 => Some(4000),
            _ => None,
        }
    }

    pub fn is_endless(self) -> bool {
        self == Self::ENDLESS
    }

    /// Enemies placed when the session starts
    pub fn initial_enemies(self) -> usize {
        match self.0 {
            0 => 0,
            4 => 4,
            n => 4 + n as usize * 2,
        }
    }

    /// Repair kits placed when the session starts
    pub fn initial_repair_kits(self) -> usize {
        match self.0 {
            0 | 1 => 0,
            4 => 5,
            _ => 3,
        }
    }

    pub fn music(self) -> MusicTrack {
        MusicTrack::Level(self.0)
    }

    /// Menu description
    pub fn title(self) -> &'static str {
        match self.0 {
            0 => "Level 0: Training (no enemies)",
            1 => "Level 1: Asteroids and rammers",
            2 => "Level 2: + Shooters + Repair kits",
            3 => "Level 3: Maximum danger",
            _ => "Endless mode: Survival",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
