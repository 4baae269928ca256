//! Main application module: capture, detection, counting and display.

use crate::{
    config::{Config, DetectorConfig},
    error::Result,
    finger_counter::count_fingers,
    hand_detection::{HandDetector, MediaPipeBridge},
    keys::{InputEvent, KeyBindings, KeySource, WindowKeys},
    landmarks::{HandLandmarks, HAND_CONNECTIONS},
    session::{Command, FrameOutput, Mode, SessionController},
    utils::landmark_to_pixel,
};
use log::{debug, info, warn};
use opencv::{
    core::{Mat, Point, Scalar},
    highgui::{self, WINDOW_AUTOSIZE},
    imgproc::{self, FONT_HERSHEY_SIMPLEX, LINE_8},
    prelude::*,
    videoio::{self, VideoCapture, CAP_PROP_BUFFERSIZE},
};
use std::time::Instant;

/// Consecutive failed camera reads before giving up
const MAX_READ_FAILURES: u32 = 30;

const GREEN: (f64, f64, f64) = (0.0, 255.0, 0.0);
const YELLOW: (f64, f64, f64) = (0.0, 255.0, 255.0);
const WHITE: (f64, f64, f64) = (255.0, 255.0, 255.0);
const RED: (f64, f64, f64) = (0.0, 0.0, 255.0);
const LIGHT_GRAY: (f64, f64, f64) = (224.0, 224.0, 224.0);

fn bgr((b, g, r): (f64, f64, f64)) -> Scalar {
    Scalar::new(b, g, r, 0.0)
}

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Camera index or video file path
    pub video_source: VideoSource,
    /// GUI display mode
    pub gui_mode: GuiMode,
    /// Mirror frames before detection
    pub mirror: bool,
    /// Draw the hand skeleton
    pub show_landmarks: bool,
    /// Window title
    pub window_title: String,
    /// Camera capture buffer size
    pub buffer_size: u32,
    /// Hand detector settings
    pub detector: DetectorConfig,
    /// Key bindings
    pub keys: KeyBindings,
    /// Command applied on the first frame
    pub start_command: Option<Command>,
}

impl AppConfig {
    /// Build from a loaded configuration file, reading from its camera
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            video_source: VideoSource::Camera(config.camera.index),
            gui_mode: GuiMode::Window,
            mirror: config.display.mirror,
            show_landmarks: config.display.show_landmarks,
            window_title: config.display.window_title.clone(),
            buffer_size: config.camera.buffer_size,
            detector: config.detector.clone(),
            keys: config.keys.clone(),
            start_command: None,
        }
    }
}

/// Video source type
#[derive(Debug, Clone, PartialEq)]
pub enum VideoSource {
    /// Webcam index
    Camera(i32),
    /// Video file path
    File(String),
}

/// GUI display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuiMode {
    /// Show the annotated camera window and read keys from it
    Window,
    /// No GUI (headless); keys are not polled and captures and results
    /// are only logged, so the calculator is driven by the start command
    None,
}

/// A line of text drawn over the frame
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayText {
    pub text: String,
    pub origin: Point,
    pub scale: f64,
    pub color: Scalar,
    pub thickness: i32,
}

impl OverlayText {
    fn new(text: String, origin: Point, scale: f64, color: (f64, f64, f64), thickness: i32) -> Self {
        Self {
            text,
            origin,
            scale,
            color: bgr(color),
            thickness,
        }
    }
}

/// Text overlays for one frame of a `frame_height` pixel tall image
#[must_use]
pub fn overlay_texts(output: &FrameOutput, instructions: &str, frame_height: i32) -> Vec<OverlayText> {
    let mut texts = vec![
        OverlayText::new(
            format!("Fingers: {}", output.finger_count),
            Point::new(10, 50),
            1.0,
            GREEN,
            2,
        ),
        OverlayText::new(
            format!("Mode: {}", output.mode),
            Point::new(10, frame_height - 50),
            1.0,
            WHITE,
            2,
        ),
    ];

    if output.mode == Mode::ShowNumbers {
        texts.push(OverlayText::new(
            format!("Fingers: {}", output.finger_count),
            Point::new(10, 100),
            1.0,
            YELLOW,
            2,
        ));
    }

    if let Some(result) = output.result {
        texts.push(OverlayText::new(
            format!("Result: {result}"),
            Point::new(10, 150),
            1.0,
            YELLOW,
            2,
        ));
    }

    texts.push(OverlayText::new(
        instructions.to_string(),
        Point::new(10, frame_height - 20),
        0.5,
        WHITE,
        1,
    ));

    texts
}

/// Per-frame processing: mirror, detect, count the first hand and step the
/// session. A command taken from a key poll is held until the next frame.
pub struct FramePipeline {
    detector: Box<dyn HandDetector>,
    session: SessionController,
    keys: KeyBindings,
    mirror: bool,
    pending_command: Option<Command>,
    last_result: Option<i32>,
}

impl FramePipeline {
    #[must_use]
    pub fn new(detector: Box<dyn HandDetector>, keys: KeyBindings, mirror: bool, start_command: Option<Command>) -> Self {
        Self {
            detector,
            session: SessionController::new(),
            keys,
            mirror,
            pending_command: start_command,
            last_result: None,
        }
    }

    /// Mirror `frame` in place if configured, then detect and step the session
    ///
    /// # Errors
    ///
    /// Returns an error if flipping or detection fails.
    pub fn process(&mut self, frame: &mut Mat) -> Result<(Vec<HandLandmarks>, FrameOutput)> {
        if self.mirror {
            let raw = frame.try_clone()?;
            opencv::core::flip(&raw, frame, 1)?;
        }

        let hands = self.detector.detect(frame)?;
        let finger_count = count_fingers(hands.first().map(|hand| &hand.landmarks));
        let output = self.session.step(finger_count, self.pending_command.take());
        if output.result.is_some() {
            self.last_result = output.result;
        }
        debug!(
            "hands={} fingers={} mode={}",
            hands.len(),
            output.finger_count,
            output.mode
        );
        Ok((hands, output))
    }

    /// Handle a polled key code. Returns `true` when the key asks to quit.
    pub fn handle_key(&mut self, key_code: i32) -> bool {
        match self.keys.map(key_code) {
            Some(InputEvent::Quit) => true,
            Some(InputEvent::Command(command)) => {
                self.pending_command = Some(command);
                false
            }
            None => false,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.session.mode()
    }

    /// Most recent calculator result
    #[must_use]
    pub const fn last_result(&self) -> Option<i32> {
        self.last_result
    }
}

/// Main application struct
pub struct FingerCalcApp {
    config: AppConfig,
    pipeline: FramePipeline,
    key_source: Option<Box<dyn KeySource>>,
    video_capture: VideoCapture,
    instructions: String,
}

impl FingerCalcApp {
    /// Create the application with the MediaPipe helper as detector
    ///
    /// # Errors
    ///
    /// Returns an error if the video source cannot be opened, the detector
    /// fails to start, or the window cannot be created.
    pub fn new(config: AppConfig) -> Result<Self> {
        let detector = MediaPipeBridge::new(&config.detector)?;
        Self::with_detector(config, Box::new(detector))
    }

    /// Create the application with a caller-provided detector
    ///
    /// # Errors
    ///
    /// Returns an error if the video source cannot be opened or the window
    /// cannot be created.
    pub fn with_detector(config: AppConfig, detector: Box<dyn HandDetector>) -> Result<Self> {
        info!("Initializing Finger Calculator application");

        let video_capture = match &config.video_source {
            VideoSource::Camera(index) => {
                info!("Opening camera {}", index);
                let mut cap = VideoCapture::new(*index, videoio::CAP_ANY)?;
                cap.set(CAP_PROP_BUFFERSIZE, f64::from(config.buffer_size))?;
                cap
            }
            VideoSource::File(path) => {
                info!("Opening video file: {}", path);
                VideoCapture::from_file(path, videoio::CAP_ANY)?
            }
        };

        if !video_capture.is_opened()? {
            return Err(crate::Error::InvalidInput(format!(
                "Could not open video source {:?}",
                config.video_source
            )));
        }

        let key_source: Option<Box<dyn KeySource>> = match config.gui_mode {
            GuiMode::Window => {
                highgui::named_window(&config.window_title, WINDOW_AUTOSIZE)?;
                Some(Box::new(WindowKeys))
            }
            GuiMode::None => None,
        };

        if let Some(command) = config.start_command {
            info!("Starting with command {:?}", command);
        }

        let instructions = config.keys.instructions();
        let pipeline = FramePipeline::new(detector, config.keys.clone(), config.mirror, config.start_command);

        Ok(Self {
            config,
            pipeline,
            key_source,
            video_capture,
            instructions,
        })
    }

    /// Replace the key source, e.g. to script key presses in a headless run
    #[must_use]
    pub fn with_key_source(mut self, key_source: Box<dyn KeySource>) -> Self {
        self.key_source = Some(key_source);
        self
    }

    #[must_use]
    pub const fn pipeline(&self) -> &FramePipeline {
        &self.pipeline
    }

    /// Log the key bindings
    fn print_instructions(&self) {
        let keys = &self.config.keys;
        info!("Instructions:");
        info!("- Press '{}' for Showing Numbers mode.", keys.show);
        info!("- Press '{}' for Addition mode.", keys.add);
        info!("- Press '{}' for Subtraction mode.", keys.sub);
        info!("- Press '{}' to clear values.", keys.clear);
        info!("- Press '{}' to quit.", keys.quit);
    }

    /// Run the main application loop
    ///
    /// # Errors
    ///
    /// Returns an error if capture, detection or display fails.
    pub fn run(&mut self) -> Result<()> {
        if self.config.gui_mode == GuiMode::Window {
            self.print_instructions();
        }

        let start_time = Instant::now();
        let mut frame_count: u64 = 0;
        let mut read_failures = 0;

        info!("Entering main loop");
        loop {
            let mut frame = Mat::default();
            if !self.video_capture.read(&mut frame)? || frame.empty() {
                if matches!(self.config.video_source, VideoSource::File(_)) {
                    info!("End of video file reached");
                    break;
                }
                read_failures += 1;
                if read_failures >= MAX_READ_FAILURES {
                    warn!("Camera stopped delivering frames");
                    break;
                }
                warn!("Failed to read frame, retrying...");
                continue;
            }
            read_failures = 0;

            let (hands, output) = self.pipeline.process(&mut frame)?;
            frame_count += 1;

            if self.config.gui_mode == GuiMode::Window {
                self.display_results(&mut frame, &hands, &output)?;
            }

            if let Some(keys) = self.key_source.as_mut() {
                if self.pipeline.handle_key(keys.poll()?) {
                    info!("Exit requested by user");
                    break;
                }
            }
        }

        let elapsed = start_time.elapsed().as_secs_f64();
        #[allow(clippy::cast_precision_loss)]
        let fps = if elapsed > 0.0 { frame_count as f64 / elapsed } else { 0.0 };
        info!("Processed {} frames ({:.1} FPS)", frame_count, fps);

        if self.config.gui_mode == GuiMode::Window {
            highgui::destroy_all_windows()?;
        }
        info!("Application shutting down");
        Ok(())
    }

    /// Draw overlays and show the frame
    fn display_results(&self, frame: &mut Mat, hands: &[HandLandmarks], output: &FrameOutput) -> Result<()> {
        if self.config.show_landmarks {
            for hand in hands {
                Self::draw_hand(frame, hand)?;
            }
        }

        for overlay in overlay_texts(output, &self.instructions, frame.rows()) {
            imgproc::put_text(
                frame,
                &overlay.text,
                overlay.origin,
                FONT_HERSHEY_SIMPLEX,
                overlay.scale,
                overlay.color,
                overlay.thickness,
                LINE_8,
                false,
            )?;
        }

        highgui::imshow(&self.config.window_title, &*frame)?;
        Ok(())
    }

    /// Draw the hand skeleton and landmark dots
    fn draw_hand(frame: &mut Mat, hand: &HandLandmarks) -> Result<()> {
        let (width, height) = (frame.cols(), frame.rows());
        let points: Vec<Point> = hand
            .landmarks
            .iter()
            .map(|lm| landmark_to_pixel(lm, width, height))
            .collect();

        for (a, b) in HAND_CONNECTIONS {
            imgproc::line(frame, points[a], points[b], bgr(LIGHT_GRAY), 2, LINE_8, 0)?;
        }
        for point in &points {
            imgproc::circle(frame, *point, 2, bgr(RED), -1, LINE_8, 0)?;
        }
        Ok(())
    }
}
