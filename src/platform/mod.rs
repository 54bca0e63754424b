//! Platform abstraction layer
//!
//! Windowing backends report raw key transitions as `InputEvent`s.
//! `InputState` folds them into the held/one-shot commands the simulation
//! consumes once per tick.

use std::collections::VecDeque;

use crate::sim::{TickInput, Turn};

/// Logical keys (W/Up, A/Left, D/Right, Space, P, Escape, F11)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Thrust,
    TurnLeft,
    TurnRight,
    Fire,
    Pause,
    Quit,
    ToggleFullscreen,
}

/// A key transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Pressed(Key),
    Released(Key),
}

/// Anything that produces input events once per frame
pub trait InputSource {
    fn poll(&mut self) -> Vec<InputEvent>;
}

/// Pre-recorded frames of input, one batch per `poll`
#[derive(Debug, Default)]
pub struct ScriptedInput {
    frames: VecDeque<Vec<InputEvent>>,
}

impl ScriptedInput {
    pub fn new(frames: impl IntoIterator<Item = Vec<InputEvent>>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.frames.is_empty()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Vec<InputEvent> {
        self.frames.pop_front().unwrap_or_default()
    }
}

/// Accumulated input between ticks
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub thrust: bool,
    pub turn: Turn,
    /// Fire presses not yet turned into bullets
    pub fire_presses: u32,
    pub pause: bool,
    pub quit: bool,
    pub toggle_fullscreen: bool,
    /// Let the autopilot fly
    pub idle_mode: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::Pressed(key) => match key {
                Key::Thrust => self.thrust = true,
                Key::TurnLeft => self.turn = Turn::Left,
                Key::TurnRight => self.turn = Turn::Right,
                Key::Fire => self.fire_presses = self.fire_presses.saturating_add(1),
                Key::Pause => self.pause = !self.pause,
                Key::Quit => self.quit = true,
                Key::ToggleFullscreen => self.toggle_fullscreen = true,
            },
            InputEvent::Released(key) => match key {
                Key::Thrust => self.thrust = false,
                // Releasing either turn key stops the turn
                Key::TurnLeft | Key::TurnRight => self.turn = Turn::None,
                _ => {}
            },
        }
    }

    /// Commands for the next tick, consuming at most one fire press
    pub fn next_tick_input(&mut self) -> TickInput {
        let fire = self.fire_presses > 0;
        if fire {
            self.fire_presses -= 1;
        }
        let input = TickInput {
            thrust: self.thrust,
            turn: self.turn,
            fire,
            pause: self.pause,
            idle_mode: self.idle_mode,
        };
        self.pause = false;
        input
    }

    /// Clear one-shot inputs the host handles itself
    pub fn clear_one_shots(&mut self) {
        self.quit = false;
        self.toggle_fullscreen = false;
    }
}
