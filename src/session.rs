//! Modal calculator driven by finger counts.
//!
//! The session is threaded explicitly through [`SessionState::step`], which
//! folds one frame's finger count and an optional command into the state and
//! reports what should be shown for that frame. [`SessionController`] owns a
//! state for the application loop and logs captures and results.

use crate::{constants::OPERAND_COUNT, finger_counter::FingerCount};
use log::{debug, info};
use std::fmt;

/// Active calculator operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Idle
    #[default]
    None,
    /// Only display the finger count
    ShowNumbers,
    /// Capture two counts and add them
    Addition,
    /// Capture two counts and subtract the second from the first
    Subtraction,
}

impl Mode {
    /// Label shown on screen
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::ShowNumbers => "Show Numbers",
            Self::Addition => "Addition",
            Self::Subtraction => "Subtraction",
        }
    }

    /// Whether finger counts are captured in this mode
    #[must_use]
    pub const fn accumulates(self) -> bool {
        matches!(self, Self::Addition | Self::Subtraction)
    }

    /// Combine captured values in capture order
    fn evaluate(self, values: &[FingerCount]) -> Option<i32> {
        match (self, values) {
            (Self::Addition, values) => Some(values.iter().copied().map(i32::from).sum()),
            (Self::Subtraction, [first, second]) => Some(i32::from(*first) - i32::from(*second)),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// User command, one per frame at most
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Show,
    Add,
    Sub,
    Clear,
}

impl Command {
    /// Parse a command name as accepted on the command line
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "show" => Some(Self::Show),
            "add" => Some(Self::Add),
            "sub" => Some(Self::Sub),
            "clear" => Some(Self::Clear),
            _ => None,
        }
    }
}

/// Distinct nonzero finger counts in capture order, at most two.
///
/// Membership is what prevents a held pose from being captured twice: a
/// value already present is refused no matter how many frames it persists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingValues {
    values: [FingerCount; OPERAND_COUNT],
    len: usize,
}

impl PendingValues {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            values: [FingerCount::ZERO; OPERAND_COUNT],
            len: 0,
        }
    }

    /// Append `count` unless it is zero, already present, or the set is full.
    /// Returns whether it was appended.
    pub fn insert(&mut self, count: FingerCount) -> bool {
        if count.is_zero() || self.is_full() || self.contains(count) {
            return false;
        }
        self.values[self.len] = count;
        self.len += 1;
        true
    }

    #[must_use]
    pub fn contains(&self, count: FingerCount) -> bool {
        self.as_slice().contains(&count)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[FingerCount] {
        &self.values[..self.len]
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.len == OPERAND_COUNT
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

/// What a frame should display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameOutput {
    /// Fingers counted this frame
    pub finger_count: FingerCount,
    /// Mode after the step
    pub mode: Mode,
    /// Value captured this frame, if any
    pub captured: Option<FingerCount>,
    /// Result computed this frame, if any
    pub result: Option<i32>,
}

/// Calculator state carried between frames
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionState {
    pub mode: Mode,
    pub pending: PendingValues,
}

impl SessionState {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mode: Mode::None,
            pending: PendingValues::new(),
        }
    }

    /// Advance one frame.
    ///
    /// The command, if any, is applied first; the finger count is then
    /// captured when the mode accumulates. Once two values are held the
    /// result is emitted and the state returns to idle.
    #[must_use]
    pub fn step(mut self, finger_count: FingerCount, command: Option<Command>) -> (Self, FrameOutput) {
        if let Some(command) = command {
            self.apply(command);
        }

        let captured = (self.mode.accumulates() && self.pending.insert(finger_count)).then_some(finger_count);

        let mut result = None;
        if self.pending.is_full() {
            result = self.mode.evaluate(self.pending.as_slice());
            self.pending.clear();
            self.mode = Mode::None;
        }

        let output = FrameOutput {
            finger_count,
            mode: self.mode,
            captured,
            result,
        };
        (self, output)
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::Show => self.mode = Mode::ShowNumbers,
            Command::Add => {
                self.mode = Mode::Addition;
                self.pending.clear();
            }
            Command::Sub => {
                self.mode = Mode::Subtraction;
                self.pending.clear();
            }
            Command::Clear => {
                self.mode = Mode::None;
                self.pending.clear();
            }
        }
    }
}

/// Owns the session state for the application loop
#[derive(Debug, Default)]
pub struct SessionController {
    state: SessionState,
}

impl SessionController {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: SessionState::new(),
        }
    }

    /// Advance one frame and log captures and results
    pub fn step(&mut self, finger_count: FingerCount, command: Option<Command>) -> FrameOutput {
        if let Some(command) = command {
            debug!("Command {:?} in mode {}", command, self.state.mode);
        }
        let mode_before = self.state.mode;
        let (state, output) = self.state.step(finger_count, command);
        self.state = state;

        if let Some(value) = output.captured {
            info!("Captured: {value}");
        }
        if let Some(result) = output.result {
            // A result never fires on the frame its mode was entered
            info!("{mode_before} Result: {result}");
        }
        output
    }

    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.state.mode
    }
}
