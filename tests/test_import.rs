extern crate autointell;

use std::fs;
use image::{GrayImage, Luma, Rgb, RgbImage};
use autointell::decoder::{self, SUPPORTED_EXTENSIONS};
use autointell::error::DecodeError;

#[test]
fn png_keeps_native_size_and_pixels() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("street.png");
    let mut image = RgbImage::from_pixel(37, 21, Rgb([10, 20, 30]));
    image.put_pixel(36, 20, Rgb([255, 0, 128]));
    image.save(&path).unwrap();

    let frame = decoder::load(&path).unwrap();

    assert_eq!(frame.dimensions(), (37, 21));
    assert_eq!(frame.get_pixel(0, 0), &Rgb([10, 20, 30]));
    assert_eq!(frame.get_pixel(36, 20), &Rgb([255, 0, 128]));
}

#[test]
fn grayscale_is_expanded_to_rgb() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grey.png");
    GrayImage::from_pixel(4, 3, Luma([77])).save(&path).unwrap();

    let frame = decoder::load(&path).unwrap();

    assert_eq!(frame.as_raw().len(), 4 * 3 * 3);
    assert!(frame.pixels().all(|pixel| pixel.0 == [77, 77, 77]));
}

#[test]
fn missing_file_is_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gone.jpg");

    match decoder::load(&path) {
        Err(DecodeError::Unreadable { path: failed, .. }) => assert_eq!(failed, path),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn garbage_with_an_image_extension_is_unsupported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.jpg");
    fs::write(&path, b"this is not a jpeg").unwrap();

    let err = decoder::load(&path).unwrap_err();
    assert!(matches!(err, DecodeError::Unsupported { .. }));
    assert!(err.to_string().contains("notes.jpg"));
}

#[test]
fn dialog_offers_common_still_formats() {
    for ext in ["jpg", "jpeg", "png", "bmp"] {
        assert!(SUPPORTED_EXTENSIONS.contains(&ext));
    }
}
