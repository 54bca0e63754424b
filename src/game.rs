//! Host loop around a session
//!
//! Owns the fixed-timestep accumulator, folds platform input into tick
//! commands, and forwards simulation events to the audio sink and score store.

use crate::audio::AudioSink;
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::highscores::ScoreStore;
use crate::platform::{InputEvent, InputSource, InputState};
use crate::renderer::{self, Renderer};
use crate::settings::Settings;
use crate::sim::{GameEvent, Session, SessionConfig, tick};

/// Longest frame the accumulator will accept, in seconds
const MAX_FRAME_DT: f32 = 0.1;

pub struct Game<A: AudioSink, S: ScoreStore> {
    session: Session,
    input: InputState,
    accumulator: f32,
    audio: A,
    scores: S,
    /// Final score already handed to the store
    recorded: bool,
    fullscreen: bool,
    /// Draw the star background
    starfield: bool,
    quit_requested: bool,
}

impl<A: AudioSink, S: ScoreStore> Game<A, S> {
    pub fn new(config: SessionConfig, audio: A, scores: S) -> Self {
        let mut game = Self {
            session: Session::new(config),
            input: InputState::new(),
            accumulator: 0.0,
            audio,
            scores,
            recorded: false,
            fullscreen: false,
            starfield: true,
            quit_requested: false,
        };
        game.dispatch_events();
        game
    }

    /// Throw away the current session and start another
    pub fn restart(&mut self, config: SessionConfig) {
        self.audio.stop_music();
        self.session = Session::new(config);
        self.input = InputState {
            idle_mode: self.input.idle_mode,
            ..InputState::new()
        };
        self.accumulator = 0.0;
        self.recorded = false;
        self.quit_requested = false;
        self.dispatch_events();
    }

    /// Take display preferences from the user's settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.fullscreen = settings.fullscreen;
        self.starfield = settings.quality.starfield_enabled();
    }

    pub fn handle_event(&mut self, event: InputEvent) {
        self.input.apply(event);
    }

    /// Drain one frame of events from `source`
    pub fn pump<I: InputSource + ?Sized>(&mut self, source: &mut I) {
        for event in source.poll() {
            self.handle_event(event);
        }
    }

    /// Hand the ship to the autopilot
    pub fn set_idle_mode(&mut self, idle: bool) {
        self.input.idle_mode = idle;
    }

    /// Advance by a frame's worth of wall time. Returns the ticks simulated.
    pub fn update(&mut self, dt: f32) -> u32 {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        if self.input.toggle_fullscreen {
            self.fullscreen = !self.fullscreen;
            log::info!("Fullscreen {}", if self.fullscreen { "on" } else { "off" });
        }
        if self.input.quit && !self.quit_requested {
            self.quit_requested = true;
            self.audio.stop_music();
            log::info!("Quit requested");
        }
        self.input.clear_one_shots();

        substeps
    }

    /// Run exactly one simulation tick
    pub fn step(&mut self) {
        let input = self.input.next_tick_input();
        tick(&mut self.session, &input, SIM_DT);
        self.dispatch_events();
    }

    fn dispatch_events(&mut self) {
        for event in self.session.drain_events() {
            match event {
                GameEvent::Sound { effect, volume } => self.audio.play(effect, volume),
                GameEvent::Music(track) => self.audio.play_music(track),
                GameEvent::StopMusic => self.audio.stop_music(),
                GameEvent::SessionEnded { level, score, .. } => {
                    if !self.recorded {
                        self.scores.record_score(level, score);
                        self.recorded = true;
                    }
                }
            }
        }
    }

    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        renderer::render(&self.session, renderer, self.starfield);
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Direct access for tools and tests
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn is_over(&self) -> bool {
        self.session.phase.is_terminal()
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn scores(&self) -> &S {
        &self.scores
    }
}
