//! Hand landmark detection through an out-of-process MediaPipe hand landmarker.
//!
//! The landmark model itself runs in a helper process. The protocol is:
//!
//! 1. The helper prints `READY` on stdout once its model is loaded.
//! 2. For every frame we write a 12-byte header (width, height, channels as
//!    little-endian `u32`) followed by the raw BGR pixels.
//! 3. The helper answers with one JSON line:
//!    `{"hands": [{"handedness": "Left", "score": 0.97, "landmarks": [{"x": .., "y": .., "z": ..}, ...]}], "error": null}`
//!
//! Landmark coordinates are normalized to the frame.

use crate::{
    config::DetectorConfig,
    constants::{DETECTOR_READY_SIGNAL, FRAME_HEADER_LEN, NUM_HAND_LANDMARKS},
    landmarks::{HandLandmarks, Handedness, Landmark, LandmarkSet},
    Error, Result,
};
use log::{debug, info, warn};
use opencv::{core::Mat, prelude::*};
use serde::Deserialize;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

/// Source of hand landmarks for a frame
pub trait HandDetector {
    /// Detect hands in a BGR frame, in the detector's order
    ///
    /// # Errors
    ///
    /// Returns an error if the detector cannot process the frame.
    fn detect(&mut self, frame: &Mat) -> Result<Vec<HandLandmarks>>;
}

#[derive(Deserialize, Debug)]
struct LandmarkJson {
    x: f32,
    y: f32,
    #[serde(default)]
    z: f32,
}

#[derive(Deserialize, Debug)]
struct HandJson {
    #[serde(default)]
    handedness: String,
    #[serde(default)]
    score: f32,
    landmarks: Vec<LandmarkJson>,
}

#[derive(Deserialize, Debug)]
struct DetectionReply {
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

/// Decode one reply line from the helper.
///
/// Hands that do not carry exactly 21 landmarks are dropped. A reply that
/// reports an error yields no hands.
///
/// # Errors
///
/// Returns an error if the line is not valid JSON of the expected shape.
pub fn parse_detection(line: &str) -> Result<Vec<HandLandmarks>> {
    let reply: DetectionReply = serde_json::from_str(line.trim())?;

    if let Some(error) = reply.error {
        warn!("Hand detector reported: {}", error);
        return Ok(Vec::new());
    }

    let mut hands = Vec::with_capacity(reply.hands.len());
    for hand in reply.hands {
        let points: Vec<Landmark> = hand
            .landmarks
            .iter()
            .map(|lm| Landmark::new(lm.x, lm.y, lm.z))
            .collect();
        let landmarks = match LandmarkSet::new(&points) {
            Ok(set) => set,
            Err(e) => {
                warn!("Skipping hand: {}", e);
                continue;
            }
        };
        hands.push(HandLandmarks {
            landmarks,
            handedness: Handedness::from_label(&hand.handedness),
            score: hand.score,
        });
    }

    Ok(hands)
}

/// Encode the per-frame header
fn frame_header(width: u32, height: u32, channels: u32) -> [u8; FRAME_HEADER_LEN] {
    let mut header = [0u8; FRAME_HEADER_LEN];
    header[0..4].copy_from_slice(&width.to_le_bytes());
    header[4..8].copy_from_slice(&height.to_le_bytes());
    header[8..12].copy_from_slice(&channels.to_le_bytes());
    header
}

fn dimension(value: i32, what: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::InvalidInput(format!("Invalid frame {what}: {value}")))
}

/// Hand detector backed by a MediaPipe helper process
pub struct MediaPipeBridge {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl MediaPipeBridge {
    /// Start the helper process and wait for it to become ready
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configured command is empty or cannot be spawned
    /// - The helper exits or prints anything other than `READY` first
    pub fn new(config: &DetectorConfig) -> Result<Self> {
        let (program, args) = config
            .command
            .split_first()
            .ok_or_else(|| Error::DetectorError("Detector command is empty".to_string()))?;

        info!("Starting hand detector: {}", config.command.join(" "));

        let mut process = Command::new(program)
            .args(args)
            .arg("--max-hands")
            .arg(config.max_hands.to_string())
            .arg("--min-detection-confidence")
            .arg(config.min_detection_confidence.to_string())
            .arg("--min-tracking-confidence")
            .arg(config.min_tracking_confidence.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| Error::DetectorError(format!("Failed to start {program}: {e}")))?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| Error::DetectorError("Detector stdin unavailable".to_string()))?;
        let stdout = process
            .stdout
            .take()
            .ok_or_else(|| Error::DetectorError("Detector stdout unavailable".to_string()))?;

        let mut bridge = Self {
            process,
            stdin,
            stdout: BufReader::new(stdout),
        };

        let ready = bridge.read_line()?;
        if ready.trim() != DETECTOR_READY_SIGNAL {
            return Err(Error::DetectorError(format!(
                "Detector did not signal ready, got: {}",
                ready.trim()
            )));
        }

        info!("Hand detector ready");
        Ok(bridge)
    }

    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        if self.stdout.read_line(&mut line)? == 0 {
            return Err(Error::DetectorError("Detector process closed its output".to_string()));
        }
        Ok(line)
    }
}

impl HandDetector for MediaPipeBridge {
    fn detect(&mut self, frame: &Mat) -> Result<Vec<HandLandmarks>> {
        if frame.empty() {
            return Ok(Vec::new());
        }

        let (width, height, channels) = (
            dimension(frame.cols(), "width")?,
            dimension(frame.rows(), "height")?,
            dimension(frame.channels(), "channels")?,
        );

        // ROI views and some flips are not contiguous
        let owned;
        let frame = if frame.is_continuous() {
            frame
        } else {
            owned = frame.try_clone()?;
            &owned
        };

        let pixels = frame.data_bytes()?;
        if pixels.len() != frame_payload_len(width, height, channels) {
            return Err(Error::InvalidInput(format!(
                "Frame holds {} bytes, expected {}x{}x{} 8-bit pixels",
                pixels.len(),
                width,
                height,
                channels
            )));
        }

        self.stdin.write_all(&frame_header(width, height, channels))?;
        self.stdin.write_all(pixels)?;
        self.stdin.flush()?;

        let reply = self.read_line()?;
        let hands = parse_detection(&reply)?;
        if let Some(hand) = hands.first() {
            debug!(
                "Detected {} hand(s), first: {:?} (score={:.2})",
                hands.len(),
                hand.handedness,
                hand.score
            );
        }
        Ok(hands)
    }
}

impl Drop for MediaPipeBridge {
    fn drop(&mut self) {
        if let Err(e) = self.process.kill() {
            debug!("Detector process already stopped: {}", e);
        }
        let _ = self.process.wait();
    }
}

/// Number of bytes the helper expects after the header for a frame
#[must_use]
pub fn frame_payload_len(width: u32, height: u32, channels: u32) -> usize {
    (width as usize) * (height as usize) * (channels as usize)
}
