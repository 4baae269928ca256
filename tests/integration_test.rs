//! Integration tests for the counting pipeline


use finger_calc::{
    app::{AppConfig, FingerCalcApp, FramePipeline, GuiMode, VideoSource},
    config::Config,
    finger_counter::count_fingers,
    hand_detection::{parse_detection, HandDetector},
    keys::{KeyBindings, KeySource},
    landmarks::{HandLandmarks, Handedness, LandmarkSet},
    session::{Command, Mode, SessionController},
    Result,
};
use opencv::{
    core::{Mat, Scalar, Size, Vec3b, VecN, CV_8UC3},
    prelude::*,
    videoio::{VideoWriter, VideoWriterTrait},
};
use std::cell::Cell;
use std::rc::Rc;
use test_helpers::{count, hand_showing};

/// Serialize a landmark set the way the detector helper does
fn reply_for(hands: &[&LandmarkSet]) -> String {
    let hands: Vec<String> = hands
        .iter()
        .map(|set| {
            let points: Vec<String> = set
                .iter()
                .map(|lm| format!(r#"{{"x": {}, "y": {}, "z": {}}}"#, lm.x, lm.y, lm.z))
                .collect();
            format!(
                r#"{{"handedness": "Right", "score": 0.95, "landmarks": [{}]}}"#,
                points.join(", ")
            )
        })
        .collect();
    format!(r#"{{"hands": [{}], "error": null}}"#, hands.join(", "))
}

#[test]
fn test_detector_reply_to_result() {
    let mut session = SessionController::new();
    session.step(count(0), Some(Command::Add));

    let mut result = None;
    for fingers in [3, 3, 2] {
        let hand = hand_showing(fingers);
        let hands = parse_detection(&reply_for(&[&hand])).unwrap();
        let finger_count = count_fingers(hands.first().map(|h| &h.landmarks));
        result = session.step(finger_count, None).result.or(result);
    }

    assert_eq!(result, Some(5));
    assert_eq!(session.mode(), Mode::None);
}

#[test]
fn test_first_hand_is_counted() {
    let first = hand_showing(4);
    let second = hand_showing(1);
    let hands = parse_detection(&reply_for(&[&first, &second])).unwrap();

    assert_eq!(hands.len(), 2);
    assert_eq!(count_fingers(hands.first().map(|h| &h.landmarks)), count(4));
}

#[test]
fn test_frame_without_hands_counts_zero() {
    let hands = parse_detection(r#"{"hands": [], "error": null}"#).unwrap();
    assert_eq!(count_fingers(hands.first().map(|h| &h.landmarks)), count(0));
}

/// Detector that replays a fixed script of hands per frame
struct ScriptedDetector {
    script: Vec<Vec<usize>>,
    calls: Rc<Cell<usize>>,
}

impl ScriptedDetector {
    fn one_hand(counts: &[usize], calls: &Rc<Cell<usize>>) -> Self {
        Self {
            script: counts.iter().map(|&n| vec![n]).collect(),
            calls: Rc::clone(calls),
        }
    }
}

fn detected(fingers: usize) -> HandLandmarks {
    HandLandmarks {
        landmarks: hand_showing(fingers),
        handedness: Handedness::Right,
        score: 1.0,
    }
}

impl HandDetector for ScriptedDetector {
    fn detect(&mut self, _frame: &Mat) -> Result<Vec<HandLandmarks>> {
        let call = self.calls.get();
        self.calls.set(call + 1);
        Ok(self
            .script
            .get(call)
            .map(|hands| hands.iter().map(|&n| detected(n)).collect())
            .unwrap_or_default())
    }
}

/// Shows one finger when the top-left pixel is bright, two otherwise
struct LeftEdgeDetector;

impl HandDetector for LeftEdgeDetector {
    fn detect(&mut self, frame: &Mat) -> Result<Vec<HandLandmarks>> {
        let bright = frame.at_2d::<Vec3b>(0, 0)?.0[0] > 127;
        Ok(vec![detected(if bright { 1 } else { 2 })])
    }
}

fn blank_frame() -> Mat {
    Mat::new_rows_cols_with_default(4, 4, CV_8UC3, Scalar::all(0.0)).unwrap()
}

/// Frame with a white left column
fn left_lit_frame() -> Mat {
    let mut frame = blank_frame();
    for row in 0..frame.rows() {
        *frame.at_2d_mut::<Vec3b>(row, 0).unwrap() = VecN([255, 255, 255]);
    }
    frame
}

fn build_pipeline(detector: impl HandDetector + 'static, mirror: bool, start: Option<Command>) -> FramePipeline {
    FramePipeline::new(Box::new(detector), KeyBindings::default(), mirror, start)
}

#[test]
fn test_key_is_applied_on_next_frame() {
    let calls = Rc::new(Cell::new(0));
    let mut pipeline = build_pipeline(ScriptedDetector::one_hand(&[2, 2, 3], &calls), false, None);

    let (_, first) = pipeline.process(&mut blank_frame()).unwrap();
    assert!(!pipeline.handle_key(i32::from(b'2')));
    assert_eq!(first.mode, Mode::None);
    assert_eq!(first.captured, None);

    let (_, second) = pipeline.process(&mut blank_frame()).unwrap();
    assert_eq!(second.mode, Mode::Addition);
    assert_eq!(second.captured, Some(count(2)));

    let (_, third) = pipeline.process(&mut blank_frame()).unwrap();
    assert_eq!(third.captured, Some(count(3)));
    assert_eq!(third.result, Some(5));
    assert_eq!(pipeline.mode(), Mode::None);
    assert_eq!(pipeline.last_result(), Some(5));
}

#[test]
fn test_quit_key_stops() {
    let calls = Rc::new(Cell::new(0));
    let mut pipeline = build_pipeline(ScriptedDetector::one_hand(&[], &calls), false, None);

    assert!(!pipeline.handle_key(-1));
    assert!(pipeline.handle_key(i32::from(b'q')));
    assert!(pipeline.handle_key(27));
}

#[test]
fn test_first_detected_hand_is_counted_in_loop() {
    let calls = Rc::new(Cell::new(0));
    let detector = ScriptedDetector {
        script: vec![vec![4, 1]],
        calls: Rc::clone(&calls),
    };
    let mut pipeline = build_pipeline(detector, false, None);

    let (hands, output) = pipeline.process(&mut blank_frame()).unwrap();
    assert_eq!(hands.len(), 2);
    assert_eq!(output.finger_count, count(4));
}

#[test]
fn test_mirror_flips_before_detection() {
    let mut frame = left_lit_frame();
    let (_, output) = build_pipeline(LeftEdgeDetector, false, None).process(&mut frame).unwrap();
    assert_eq!(output.finger_count, count(1));

    let mut frame = left_lit_frame();
    let (_, output) = build_pipeline(LeftEdgeDetector, true, None).process(&mut frame).unwrap();
    assert_eq!(output.finger_count, count(2));
    // The displayed frame is the mirrored one
    assert_eq!(frame.at_2d::<Vec3b>(0, 3).unwrap().0, [255, 255, 255]);
}

#[test]
fn test_start_command_drives_headless_session() {
    let calls = Rc::new(Cell::new(0));
    let mut pipeline = build_pipeline(
        ScriptedDetector::one_hand(&[5, 5, 1], &calls),
        false,
        Some(Command::Sub),
    );

    let outputs: Vec<_> = (0..3)
        .map(|_| pipeline.process(&mut blank_frame()).unwrap().1)
        .collect();

    assert_eq!(outputs[0].captured, Some(count(5)));
    assert_eq!(outputs[1].captured, None);
    assert_eq!(outputs[2].result, Some(4));
    assert_eq!(pipeline.last_result(), Some(4));
}

fn write_blank_video(path: &str, frames: usize) -> Result<()> {
    let fourcc = VideoWriter::fourcc('M', 'J', 'P', 'G')?;
    let mut writer = VideoWriter::new(path, fourcc, 30.0, Size::new(320, 240), true)?;
    let frame = Mat::new_rows_cols_with_default(240, 320, CV_8UC3, Scalar::all(0.0))?;
    for _ in 0..frames {
        writer.write(&frame)?;
    }
    writer.release()?;
    Ok(())
}

#[test]
#[ignore = "Requires OpenCV built with video codec support"]
fn test_headless_run_over_video_file() {
    let path = std::env::temp_dir().join(format!("finger_calc_{}.avi", std::process::id()));
    let path_str = path.to_string_lossy().to_string();
    write_blank_video(&path_str, 5).expect("Failed to write test video");

    let calls = Rc::new(Cell::new(0));
    let detector = ScriptedDetector::one_hand(&[0, 2, 3, 3, 0], &calls);

    let mut config = AppConfig::from_config(&Config::default());
    config.video_source = VideoSource::File(path_str);
    config.gui_mode = GuiMode::None;
    config.start_command = Some(Command::Add);

    let mut app = FingerCalcApp::with_detector(config, Box::new(detector)).expect("Failed to create app");
    app.run().expect("Run failed");
    std::fs::remove_file(&path).ok();

    assert_eq!(calls.get(), 5);
    assert_eq!(app.pipeline().last_result(), Some(5));
    assert_eq!(app.pipeline().mode(), Mode::None);
}

/// Key source replaying fixed key codes, then no key
struct ScriptedKeys(std::vec::IntoIter<i32>);

impl KeySource for ScriptedKeys {
    fn poll(&mut self) -> Result<i32> {
        Ok(self.0.next().unwrap_or(-1))
    }
}

#[test]
#[ignore = "Requires OpenCV built with video codec support"]
fn test_scripted_keys_over_video_file() {
    let path = std::env::temp_dir().join(format!("finger_calc_keys_{}.avi", std::process::id()));
    let path_str = path.to_string_lossy().to_string();
    write_blank_video(&path_str, 6).expect("Failed to write test video");

    let calls = Rc::new(Cell::new(0));
    let detector = ScriptedDetector::one_hand(&[1, 4, 1, 0, 0, 0], &calls);

    let mut config = AppConfig::from_config(&Config::default());
    config.video_source = VideoSource::File(path_str);
    config.gui_mode = GuiMode::None;

    // Sub after frame 1, quit after frame 4
    let keys = ScriptedKeys(vec![i32::from(b'3'), -1, -1, i32::from(b'q')].into_iter());
    let mut app = FingerCalcApp::with_detector(config, Box::new(detector))
        .expect("Failed to create app")
        .with_key_source(Box::new(keys));
    app.run().expect("Run failed");
    std::fs::remove_file(&path).ok();

    assert_eq!(calls.get(), 4);
    assert_eq!(app.pipeline().last_result(), Some(3));
}
