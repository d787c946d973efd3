extern crate autointell;

use std::io;
use std::path::PathBuf;
use std::time::Duration;
use image::{Rgb, RgbImage};
use autointell::common::Frame;
use autointell::data::send_channels::{Job, WorkerEvent};
use autointell::error::DecodeError;
use autointell::gui::{Action, AppState, Mode};

fn frame(shade: u8) -> Frame {
    Frame::from(RgbImage::from_pixel(8, 6, Rgb([shade, shade, shade])))
}

fn presented(action: Option<Action>) -> Frame {
    match action {
        Some(Action::Present(frame)) => frame,
        other => panic!("expected a frame to present, got {:?}", other),
    }
}

fn detect_epoch(action: Option<Action>) -> u64 {
    match action {
        Some(Action::Submit(Job::Detect { epoch, .. })) => epoch,
        other => panic!("expected a detection job, got {:?}", other),
    }
}

fn import_epoch(action: Option<Action>) -> u64 {
    match action {
        Some(Action::Submit(Job::Import { epoch, .. })) => epoch,
        other => panic!("expected an import job, got {:?}", other),
    }
}

fn detected(epoch: u64, frame: Frame) -> WorkerEvent {
    WorkerEvent::Detected {
        epoch,
        frame,
        elapsed: Duration::from_millis(5),
    }
}

#[test]
fn capture_then_retake_returns_to_live() {
    let mut state = AppState::new(0.5);

    assert_eq!(presented(state.on_tick(Some(frame(1)))), frame(1));

    assert_eq!(presented(state.on_capture_pressed()), frame(1));
    assert_eq!(state.mode(), Mode::Captured);
    assert_eq!(state.dimensions(), Some((8, 6)));
    assert!(state.on_tick(Some(frame(2))).is_none());

    assert!(state.on_capture_pressed().is_none());
    assert_eq!(state.mode(), Mode::Live);
    assert_eq!(state.button_label(), "Take a picture");

    // live behaves exactly as before the first capture
    assert_eq!(presented(state.on_tick(Some(frame(3)))), frame(3));
    assert!(state.on_tick(None).is_none());
    assert_eq!(presented(state.on_capture_pressed()), frame(3));
}

#[test]
fn failed_import_leaves_retained_frame_unchanged() {
    let mut state = AppState::new(0.5);
    state.on_tick(Some(frame(1)));
    state.on_capture_pressed();

    let epoch = import_epoch(state.on_import_requested(PathBuf::from("missing.png")));
    assert!(state.import_pending());

    let error = DecodeError::Unreadable {
        path: PathBuf::from("missing.png"),
        source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
    };
    assert!(state.on_worker_event(WorkerEvent::ImportFailed { epoch, error }).is_none());

    assert!(!state.import_pending());
    assert_eq!(state.mode(), Mode::Captured);
    assert_eq!(state.retained(), Some(&frame(1)));
    assert!(state.status().contains("Import failed"));
}

#[test]
fn import_replaces_retained_frame() {
    let mut state = AppState::new(0.5);
    let epoch = import_epoch(state.on_import_requested(PathBuf::from("photo.png")));

    let imported = Frame::from(RgbImage::new(20, 10));
    let action = state.on_worker_event(WorkerEvent::Imported {
        epoch,
        frame: imported.clone(),
        annotated: None,
    });

    assert_eq!(presented(action), imported);
    assert_eq!(state.mode(), Mode::Captured);
    assert_eq!(state.width_text(), "Width: 20");
    assert_eq!(state.height_text(), "Height: 10");
    assert_eq!(state.retained(), Some(&imported));
}

#[test]
fn stale_live_result_never_overwrites_a_capture() {
    let mut state = AppState::new(0.5);
    state.set_detection(true);

    let live_epoch = detect_epoch(state.on_tick(Some(frame(1))));
    let captured_epoch = detect_epoch(state.on_capture_pressed());
    assert_ne!(live_epoch, captured_epoch);

    assert!(state.on_worker_event(detected(live_epoch, frame(9))).is_none());
    assert_eq!(presented(state.on_worker_event(detected(captured_epoch, frame(7)))), frame(7));
}

#[test]
fn pending_import_blocks_live_submissions_and_other_imports() {
    let mut state = AppState::new(0.5);
    state.set_detection(true);
    state.on_import_requested(PathBuf::from("a.png"));

    assert!(state.on_tick(Some(frame(1))).is_none());
    assert!(state.on_import_requested(PathBuf::from("b.png")).is_none());
    assert!(state.on_capture_pressed().is_none());
    assert_eq!(state.mode(), Mode::Live);
}

#[test]
fn detection_failure_switches_detection_off() {
    let mut state = AppState::new(0.5);
    state.set_detection(true);
    let epoch = detect_epoch(state.on_tick(Some(frame(1))));

    let action = state.on_worker_event(WorkerEvent::DetectFailed {
        epoch,
        reason: "model artifact not found: models/yolov3.onnx".to_string(),
    });

    assert!(action.is_none());
    assert!(!state.detection_enabled());
    assert!(state.status().contains("model artifact not found"));
    // live frames go straight to the display again
    assert_eq!(presented(state.on_tick(Some(frame(2)))), frame(2));
}

#[test]
fn toggling_detection_rerenders_the_retained_frame() {
    let mut state = AppState::new(0.5);
    state.on_tick(Some(frame(4)));
    state.on_capture_pressed();

    let epoch = detect_epoch(state.set_detection(true));
    assert_eq!(epoch, state.epoch());

    let epoch = detect_epoch(state.set_threshold(0.25));
    assert_eq!(epoch, state.epoch());

    assert_eq!(presented(state.set_detection(false)), frame(4));
}

#[test]
fn annotated_import_is_shown_directly() {
    let mut state = AppState::new(0.5);
    state.set_detection(true);

    let epoch = import_epoch(state.on_import_requested(PathBuf::from("street.jpg")));
    let action = state.on_worker_event(WorkerEvent::Imported {
        epoch,
        frame: frame(1),
        annotated: Some(Ok(frame(2))),
    });

    assert_eq!(presented(action), frame(2));
    assert_eq!(state.retained(), Some(&frame(1)));
}

#[test]
fn failed_detection_on_import_shows_the_raw_image() {
    let mut state = AppState::new(0.5);
    state.set_detection(true);

    let epoch = import_epoch(state.on_import_requested(PathBuf::from("street.jpg")));
    let action = state.on_worker_event(WorkerEvent::Imported {
        epoch,
        frame: frame(3),
        annotated: Some(Err("model artifact not found: models/yolov3.onnx".to_string())),
    });

    assert_eq!(presented(action), frame(3));
    assert_eq!(state.mode(), Mode::Captured);
    assert_eq!(state.retained(), Some(&frame(3)));
    assert!(!state.detection_enabled());
    assert!(state.status().contains("model artifact not found"));
}

#[test]
fn import_is_redetected_when_the_threshold_moved_meanwhile() {
    let mut state = AppState::new(0.5);
    state.set_detection(true);

    let epoch = import_epoch(state.on_import_requested(PathBuf::from("street.jpg")));
    // the import stays pending, so nothing is re-rendered yet
    assert!(state.set_threshold(0.3).is_none());
    assert!(state.import_pending());

    let action = state.on_worker_event(WorkerEvent::Imported {
        epoch,
        frame: frame(1),
        annotated: Some(Ok(frame(2))),
    });

    match action {
        Some(Action::Submit(Job::Detect { epoch, frame: submitted, threshold })) => {
            assert_eq!(epoch, state.epoch());
            assert_eq!(submitted, frame(1));
            assert_eq!(threshold, 0.3);
        }
        other => panic!("expected a detection job, got {:?}", other),
    }
}

#[test]
fn import_is_shown_raw_when_detection_was_switched_off_meanwhile() {
    let mut state = AppState::new(0.5);
    state.set_detection(true);

    let epoch = import_epoch(state.on_import_requested(PathBuf::from("street.jpg")));
    assert!(state.set_detection(false).is_none());

    let action = state.on_worker_event(WorkerEvent::Imported {
        epoch,
        frame: frame(1),
        annotated: Some(Ok(frame(2))),
    });

    assert_eq!(presented(action), frame(1));
}
