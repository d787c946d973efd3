extern crate autointell;


use fake_network::{detector, grey_frame, row, rows_output};

#[test]
fn no_detections() {
    let output = rows_output(&[
        row(0.5, 0.5, 0.2, 0.2, 0.0, &[0.0, 0.0, 0.0]),
        row(0.1, 0.9, 0.3, 0.1, 0.0, &[0.0, 0.0, 0.0]),
    ]);
    let mut yolo = detector(vec![output]);
    let frame = grey_frame(320, 240);

    let detections = yolo.detections(&frame, 0.0).unwrap();
    assert!(detections.is_empty());

    let annotated = yolo.detect(&frame, 0.0).unwrap();
    assert_eq!(annotated, frame);
}

#[test]
fn full_threshold_never_detects() {
    let output = rows_output(&[row(0.5, 0.5, 0.2, 0.2, 1.0, &[1.0, 1.0, 1.0])]);
    let mut yolo = detector(vec![output]);
    let frame = grey_frame(64, 64);

    let annotated = yolo.detect(&frame, 1.0).unwrap();
    assert_eq!(annotated, frame);
}
