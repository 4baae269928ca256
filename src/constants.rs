//! Constants used throughout the application

/// Number of landmarks in the MediaPipe hand model
pub const NUM_HAND_LANDMARKS: usize = 21;

/// Largest finger count a single hand can show
pub const MAX_FINGER_COUNT: u8 = 5;

/// Number of captured values needed to compute a result
pub const OPERAND_COUNT: usize = 2;

/// Bytes in the per-frame header sent to the detector (width, height, channels)
pub const FRAME_HEADER_LEN: usize = 12;

/// Line the detector prints once its model is loaded
pub const DETECTOR_READY_SIGNAL: &str = "READY";

/// Default detector thresholds
pub const DEFAULT_MIN_DETECTION_CONFIDENCE: f32 = 0.5;
pub const DEFAULT_MIN_TRACKING_CONFIDENCE: f32 = 0.5;
pub const DEFAULT_MAX_HANDS: u32 = 1;

/// Default window title
pub const DEFAULT_WINDOW_TITLE: &str = "Finger Operations";

/// Key code reported for escape
pub const KEY_ESCAPE: i32 = 27;

/// Key code reported by `wait_key` when nothing was pressed
pub const KEY_NONE: i32 = -1;
