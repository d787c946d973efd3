mod utils;
pub mod capture;
pub mod common;
pub mod config;
pub mod data;
pub mod decoder;
pub mod detection_runners;
pub mod error;
pub mod gui;

use std::time::Instant;
use image::RgbImage;
use crate::common::{ClassLabelTable, Frame, ModelConfig};
use crate::data::ConfigOrt;
use crate::detection_runners::{OrtEngine, YoloDetector};

/// Loads the class names and the ONNX network described by `model_details`.
///
/// Missing artifacts fail with a [`ModelError`](crate::error::ModelError)
/// wrapped in the returned error.
pub fn init_detector(model_details: &ModelConfig) -> anyhow::Result<YoloDetector<OrtEngine>> {
    log::info!("Initializing detector\n{}", model_details.to_string());

    let labels = ClassLabelTable::from_file(&model_details.labels_path)?;
    let ort_options = ConfigOrt::from_model_config(model_details)
        .with_trt_fp16(false)
        .with_profile(false);

    log::info!("Initializing ORT session with ({}) execution provider", model_details.inference_device);
    let engine = OrtEngine::new(&ort_options)?;
    let device = *engine.device();

    let mut yolo = YoloDetector::new(engine, labels, model_details.model_version)?
        .with_iou(model_details.iou_threshold)
        .with_profile(log::log_enabled!(log::Level::Trace));

    // warm-up pass
    let now = Instant::now();
    let blank = Frame::from(RgbImage::new(model_details.width, model_details.height));
    yolo.detections(&blank, 1.0)?;
    log::info!("Detector ready on {} in {:?}", device, now.elapsed());

    Ok(yolo)
}
