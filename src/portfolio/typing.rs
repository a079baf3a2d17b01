//! Typewriter intro animation.

use std::time::Duration;

use super::{Animation, Tick};

/// Default delay between revealed characters.
pub const TYPING_INTERVAL: Duration = Duration::from_millis(60);

/// Reveals a text one character per tick.
#[derive(Debug, Clone)]
pub struct Typewriter {
    chars: Vec<char>,
    shown: usize,
}

impl Typewriter {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            shown: 0,
        }
    }

    /// Text visible right now.
    pub fn visible(&self) -> String {
        self.chars[..self.shown].iter().collect()
    }

    pub fn is_finished(&self) -> bool {
        self.shown >= self.chars.len()
    }
}

impl Animation for Typewriter {
    type Frame = String;

    fn tick(&mut self) -> Tick {
        if !self.is_finished() {
            self.shown += 1;
        }
        if self.is_finished() {
            Tick::Finished
        } else {
            Tick::Continue
        }
    }

    fn frame(&self) -> String {
        self.visible()
    }

    fn interval(&self) -> Duration {
        TYPING_INTERVAL
    }
}
