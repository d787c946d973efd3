use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use crate::common::inference_device::InferenceDevice;
use crate::common::model_version::ModelVersion;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// ONNX network (graph and weights, or graph with external weight data beside it).
    pub weights_path: PathBuf,
    pub labels_path: PathBuf,
    /// ONNX Runtime shared library. Empty means `ORT_DYLIB_PATH` or the system default.
    pub ort_lib_path: String,
    pub inference_device: InferenceDevice,
    pub model_version: ModelVersion,
    pub conf_threshold: f32,
    /// Enables non-max suppression when set. Off by default, so overlapping
    /// duplicates of one object are kept.
    pub iou_threshold: Option<f32>,
    pub width: u32,
    pub height: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            weights_path: PathBuf::from("models/yolov3.onnx"),
            labels_path: PathBuf::from("models/coco.names"),
            ort_lib_path: String::new(),
            inference_device: InferenceDevice::CPU,
            model_version: ModelVersion::YoloV3,
            conf_threshold: 0.5,
            iou_threshold: None,
            width: 416,
            height: 416,
        }
    }
}

impl ModelConfig {
    pub fn get_threshold(&self) -> f32 {
        self.conf_threshold
    }

    pub fn to_string(&self) -> String {
        format!("Weights File Path: {}\n\
        Labels Path: {}\n\
        OnnxRuntime Lib Path: {}\n\
        Inference Device: {}\n\
        Model Version: {:?}\n\
        Model Input Resolution: {}x{}\n\
        Detection Threshold: {}\n\
        NMS IoU Threshold: {:?}",
                self.weights_path.display(), self.labels_path.display(), self.ort_lib_path,
                self.inference_device, self.model_version,
                self.width, self.height, self.conf_threshold, self.iou_threshold)
    }
}
