//! Webcam finger counting with a small gesture-driven calculator.
//!
//! A hand landmark detector supplies 21 landmarks per hand; this library
//! turns them into a finger count and folds that count into a modal
//! calculator:
//! 1. Hand detection in a helper process running the MediaPipe hand landmarker
//! 2. Finger counting from landmark geometry
//! 3. A session that captures two distinct counts and adds or subtracts them
//!
//! # Examples
//!
//! ## Counting fingers
//!
//! ```
//! use finger_calc::{finger_counter::count_fingers, landmarks::{Landmark, LandmarkSet}};
//!
//! # fn main() -> finger_calc::Result<()> {
//! let landmarks = LandmarkSet::new(&[Landmark::new(0.5, 0.5, 0.0); 21])?;
//! assert_eq!(count_fingers(Some(&landmarks)).get(), 0);
//! assert_eq!(count_fingers(None).get(), 0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Driving the calculator
//!
//! ```
//! use finger_calc::{finger_counter::FingerCount, session::{Command, Mode, SessionState}};
//!
//! # fn main() -> finger_calc::Result<()> {
//! let state = SessionState::new();
//! let (state, _) = state.step(FingerCount::ZERO, Some(Command::Add));
//! let (state, _) = state.step(FingerCount::new(2)?, None);
//! let (state, output) = state.step(FingerCount::new(3)?, None);
//!
//! assert_eq!(output.result, Some(5));
//! assert_eq!(state.mode, Mode::None);
//! # Ok(())
//! # }
//! ```
//!
//! ## Running the webcam application
//!
//! ```no_run
//! use finger_calc::{app::{AppConfig, FingerCalcApp}, config::Config};
//!
//! # fn main() -> finger_calc::Result<()> {
//! let config = AppConfig::from_config(&Config::default());
//! let mut app = FingerCalcApp::new(config)?;
//! app.run()?;
//! # Ok(())
//! # }
//! ```

/// Hand landmark types and indices
pub mod landmarks;

/// Finger counting from landmark geometry
pub mod finger_counter;

/// Modal calculator state machine
pub mod session;

/// Key code to command mapping
pub mod keys;

/// Hand detection through the MediaPipe helper process
pub mod hand_detection;

/// Coordinate helpers for drawing
pub mod utils;

/// Error types and result handling
pub mod error;

/// Main application module
pub mod app;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
