//! Configuration management for the finger calculator

use crate::{
    constants::{
        DEFAULT_MAX_HANDS, DEFAULT_MIN_DETECTION_CONFIDENCE, DEFAULT_MIN_TRACKING_CONFIDENCE,
        DEFAULT_WINDOW_TITLE,
    },
    keys::KeyBindings,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Camera configuration
    pub camera: CameraConfig,

    /// Hand detector configuration
    pub detector: DetectorConfig,

    /// Display configuration
    pub display: DisplayConfig,

    /// Key bindings
    pub keys: KeyBindings,
}

/// Camera parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Camera index
    pub index: i32,

    /// Capture buffer size (1 keeps latency low)
    pub buffer_size: u32,
}

/// Hand detector parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Helper program and its arguments
    pub command: Vec<String>,

    /// Maximum number of hands to report
    pub max_hands: u32,

    /// Minimum confidence for a hand detection (0.0-1.0)
    pub min_detection_confidence: f32,

    /// Minimum confidence for tracking a hand between frames (0.0-1.0)
    pub min_tracking_confidence: f32,
}

/// Display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Window title
    pub window_title: String,

    /// Flip image horizontally for a mirror view
    pub mirror: bool,

    /// Draw the hand skeleton
    pub show_landmarks: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: 0,
            buffer_size: 1,
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            command: vec!["python3".to_string(), "scripts/hand_detect.py".to_string()],
            max_hands: DEFAULT_MAX_HANDS,
            min_detection_confidence: DEFAULT_MIN_DETECTION_CONFIDENCE,
            min_tracking_confidence: DEFAULT_MIN_TRACKING_CONFIDENCE,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            window_title: DEFAULT_WINDOW_TITLE.to_string(),
            mirror: true,
            show_landmarks: true,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid configuration.
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        if self.camera.index < 0 {
            return Err(Error::ConfigError("Camera index must not be negative".to_string()));
        }

        if self.detector.command.is_empty() {
            return Err(Error::ConfigError("Detector command must not be empty".to_string()));
        }
        if self.detector.max_hands == 0 {
            return Err(Error::ConfigError("Max hands must be greater than 0".to_string()));
        }
        if !(0.0..=1.0).contains(&self.detector.min_detection_confidence) {
            return Err(Error::ConfigError(
                "Minimum detection confidence must be between 0.0 and 1.0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.detector.min_tracking_confidence) {
            return Err(Error::ConfigError(
                "Minimum tracking confidence must be between 0.0 and 1.0".to_string(),
            ));
        }

        self.keys.validate()
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Finger Calculator Configuration

# Video capture
camera:
  index: 0
  buffer_size: 1

# Hand landmark helper process
detector:
  command: ["python3", "scripts/hand_detect.py"]
  max_hands: 1
  min_detection_confidence: 0.5
  min_tracking_confidence: 0.5

# Display settings
display:
  window_title: "Finger Operations"
  mirror: true
  show_landmarks: true

# Key bindings
keys:
  show: "1"
  add: "2"
  sub: "3"
  clear: "c"
  quit: "q"
"#;
