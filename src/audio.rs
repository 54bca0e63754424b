//! Sound and music playback
//!
//! The simulation only emits `GameEvent`s; the host forwards them to an
//! `AudioSink`. `AudioManager` maps effects and tracks to files under
//! `<assets>/sounds/`, applies the volume settings, and quietly skips any
//! asset that is missing on disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::settings::Settings;
use crate::sim::{MusicTrack, SoundEffect};

/// Receiver for the simulation's audio requests
pub trait AudioSink {
    /// Fire-and-forget sound at a relative volume (0.0 - 1.0)
    fn play(&mut self, effect: SoundEffect, volume: f32);
    /// Start a looping track, replacing any current one
    fn play_music(&mut self, track: MusicTrack);
    fn stop_music(&mut self);
}

/// Device that actually plays files
pub trait AudioBackend {
    fn play_file(&mut self, path: &Path, volume: f32, looping: bool);
    fn stop_looping(&mut self);
}

/// Backend that only logs what it would play (headless runs)
#[derive(Debug, Default)]
pub struct LogBackend;

impl AudioBackend for LogBackend {
    fn play_file(&mut self, path: &Path, volume: f32, looping: bool) {
        log::trace!("play {} vol={volume:.2} loop={looping}", path.display());
    }

    fn stop_looping(&mut self) {
        log::trace!("stop music");
    }
}

/// Relative file name for a sound effect
fn effect_file(effect: SoundEffect) -> &'static str {
    match effect {
        SoundEffect::Laser => "laser.wav",
        SoundEffect::EnemyLaser => "enemy_laser.wav",
        SoundEffect::Explosion => "explosion.wav",
        SoundEffect::Hit => "hit.wav",
        SoundEffect::Collect => "coin.wav",
        SoundEffect::Heal => "upgrade.wav",
        SoundEffect::Win => "win_ost.mp3",
        SoundEffect::Defeat => "defeat_ost.mp3",
    }
}

fn music_file(track: MusicTrack) -> String {
    match track {
        MusicTrack::Menu => "menu_ost.mp3".to_string(),
        MusicTrack::Level(n) => format!("level_{n}_ost.mp3"),
    }
}

const ALL_EFFECTS: [SoundEffect; 8] = [
    SoundEffect::Laser,
    SoundEffect::EnemyLaser,
    SoundEffect::Explosion,
    SoundEffect::Hit,
    SoundEffect::Collect,
    SoundEffect::Heal,
    SoundEffect::Win,
    SoundEffect::Defeat,
];

/// Audio manager for the game
pub struct AudioManager<B: AudioBackend> {
    backend: B,
    sounds_dir: PathBuf,
    effects: HashMap<SoundEffect, PathBuf>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
}

impl<B: AudioBackend> AudioManager<B> {
    /// Resolve every effect under `<assets_dir>/sounds`, disabling missing ones
    pub fn new(backend: B, assets_dir: &Path) -> Self {
        let sounds_dir = assets_dir.join("sounds");
        let mut effects = HashMap::new();
        for effect in ALL_EFFECTS {
            let path = sounds_dir.join(effect_file(effect));
            if path.is_file() {
                effects.insert(effect, path);
            } else {
                log::warn!("Sound {} missing - {effect:?} disabled", path.display());
            }
        }

        Self {
            backend,
            sounds_dir,
            effects,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.5,
            muted: false,
        }
    }

    pub fn from_settings(backend: B, settings: &Settings) -> Self {
        let mut manager = Self::new(backend, &settings.assets_dir);
        manager.apply_settings(settings);
        manager
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_music_volume(settings.music_volume);
        self.set_muted(settings.muted);
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if muted {
            self.backend.stop_looping();
        }
    }

    pub fn is_available(&self, effect: SoundEffect) -> bool {
        self.effects.contains_key(&effect)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn effective_volume(&self, channel: f32) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * channel
        }
    }
}

impl<B: AudioBackend> AudioSink for AudioManager<B> {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        let vol = self.effective_volume(self.sfx_volume) * volume;
        if vol <= 0.0 {
            return;
        }
        let Some(path) = self.effects.get(&effect) else {
            return;
        };
        self.backend.play_file(path, vol, false);
    }

    fn play_music(&mut self, track: MusicTrack) {
        self.backend.stop_looping();
        let vol = self.effective_volume(self.music_volume);
        if vol <= 0.0 {
            return;
        }
        let path = self.sounds_dir.join(music_file(track));
        if !path.is_file() {
            log::warn!("Music {} missing - playing in silence", path.display());
            return;
        }
        self.backend.play_file(&path, vol, true);
    }

    fn stop_music(&mut self) {
        self.backend.stop_looping();
    }
}
