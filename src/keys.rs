//! Mapping of window key codes to calculator commands.

use crate::{
    constants::{KEY_ESCAPE, KEY_NONE},
    session::Command,
    Error, Result,
};
use opencv::highgui;
use serde::{Deserialize, Serialize};

/// Source of raw key codes, polled once per frame
pub trait KeySource {
    /// Return the pressed key code, or `-1` when no key was pressed
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be polled.
    fn poll(&mut self) -> Result<i32>;
}

/// Keys typed into the OpenCV window
#[derive(Debug, Default)]
pub struct WindowKeys;

impl KeySource for WindowKeys {
    fn poll(&mut self) -> Result<i32> {
        Ok(highgui::wait_key(1)?)
    }
}

/// Event produced by a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Stop the application loop
    Quit,
    /// Forward to the session
    Command(Command),
}

/// Keys bound to each command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub show: char,
    pub add: char,
    pub sub: char,
    pub clear: char,
    pub quit: char,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            show: '1',
            add: '2',
            sub: '3',
            clear: 'c',
            quit: 'q',
        }
    }
}

impl KeyBindings {
    /// Translate a key code as returned by `highgui::wait_key`.
    ///
    /// Only the low byte is compared, so modifier bits reported by some
    /// backends do not hide a binding.
    #[must_use]
    pub fn map(&self, key_code: i32) -> Option<InputEvent> {
        if key_code == KEY_NONE {
            return None;
        }
        let key = key_code & 0xFF;
        if key == KEY_ESCAPE {
            return Some(InputEvent::Quit);
        }

        self.entries()
            .into_iter()
            .find(|(bound, _)| *bound as i32 == key)
            .map(|(_, event)| event)
    }

    /// On-screen help line
    #[must_use]
    pub fn instructions(&self) -> String {
        format!(
            "Press '{}'=Show, '{}'=Add, '{}'=Sub, '{}'=Clear, '{}'=Quit",
            self.show, self.add, self.sub, self.clear, self.quit
        )
    }

    /// Validate bindings
    ///
    /// # Errors
    ///
    /// Returns an error if a key is not a single-byte character or is bound twice.
    pub fn validate(&self) -> Result<()> {
        let entries = self.entries();
        for (i, (key, _)) in entries.iter().enumerate() {
            if !key.is_ascii() || *key as i32 == KEY_ESCAPE {
                return Err(Error::ConfigError(format!("Key {key:?} cannot be bound")));
            }
            if entries[..i].iter().any(|(other, _)| other == key) {
                return Err(Error::ConfigError(format!("Key {key:?} is bound more than once")));
            }
        }
        Ok(())
    }

    fn entries(&self) -> [(char, InputEvent); 5] {
        [
            (self.show, InputEvent::Command(Command::Show)),
            (self.add, InputEvent::Command(Command::Add)),
            (self.sub, InputEvent::Command(Command::Sub)),
            (self.clear, InputEvent::Command(Command::Clear)),
            (self.quit, InputEvent::Quit),
        ]
    }
}
