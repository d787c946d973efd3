//! Functions to preprocess images.

use anyhow::{bail, Result};
use image::imageops::{self, FilterType};
use image::RgbImage;
use ndarray::Array4;

/// Main preprocessing entry point. Stretches to the target size (no letterbox)
/// and produces a `[1, 3, h, w]` tensor scaled to `[0, 1]`.
pub fn preprocess(img: &RgbImage, target_w: u32, target_h: u32) -> Result<Array4<f32>> {
    if img.width() == 0 || img.height() == 0 {
        bail!("Cannot preprocess an empty image");
    }

    let resized = resize_image(img, target_w, target_h);
    let flat = nchw_normalize_flat(&resized)?;

    let batch = Array4::from_shape_vec(
        (1, 3, target_h as usize, target_w as usize),
        flat,
    )?;
    Ok(batch)
}

fn resize_image(img: &RgbImage, target_w: u32, target_h: u32) -> RgbImage {
    if img.width() == target_w && img.height() == target_h {
        return img.clone();
    }
    imageops::resize(img, target_w, target_h, FilterType::Triangle)
}

fn nchw_normalize_flat(img: &RgbImage) -> Result<Vec<f32>> {
    let buf = img.as_raw();
    let w = img.width() as usize;
    let h = img.height() as usize;

    if buf.len() != w * h * 3 {
        bail!("Unexpected buffer size: got {}, expected {}", buf.len(), w * h * 3);
    }

    let mut out = vec![0.0f32; buf.len()];
    let hw = w * h;

    for i in 0..hw {
        let r = buf[3 * i];
        let g = buf[3 * i + 1];
        let b = buf[3 * i + 2];

        out[i] = r as f32 / 255.0;             // Channel 0
        out[i + hw] = g as f32 / 255.0;         // Channel 1
        out[i + 2 * hw] = b as f32 / 255.0;     // Channel 2
    }

    Ok(out)
}
