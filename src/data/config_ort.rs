//! Options for building the ONNX Runtime engine.

use std::path::{Path, PathBuf};
use crate::common::{InferenceDevice, ModelConfig};

#[derive(Debug, Clone)]
pub struct ConfigOrt {
    pub onnx_path: PathBuf,
    pub ort_lib_path: String,
    pub device: InferenceDevice,
    pub model_width: u32,
    pub model_height: u32,
    pub profile: bool,

    // trt related
    pub trt_engine_cache_enable: bool,
    pub trt_fp16_enable: bool,
}

impl Default for ConfigOrt {
    fn default() -> Self {
        Self {
            onnx_path: PathBuf::new(),
            ort_lib_path: String::new(),
            device: InferenceDevice::CPU,
            model_width: 416,
            model_height: 416,
            profile: false,

            trt_engine_cache_enable: true,
            trt_fp16_enable: false,
        }
    }
}

impl ConfigOrt {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn from_model_config(model: &ModelConfig) -> Self {
        Self::new()
            .with_model(&model.weights_path)
            .with_ort_lib_path(&model.ort_lib_path)
            .with_device(model.inference_device)
            .with_model_width(model.width)
            .with_model_height(model.height)
    }

    pub fn with_model(mut self, onnx_path: &Path) -> Self {
        self.onnx_path = onnx_path.to_path_buf();
        self
    }

    pub fn with_ort_lib_path(mut self, ort_lib_path: &str) -> Self {
        self.ort_lib_path = ort_lib_path.to_string();
        self
    }

    pub fn with_model_width(mut self, n: u32) -> Self {
        self.model_width = n;
        self
    }

    pub fn with_model_height(mut self, n: u32) -> Self {
        self.model_height = n;
        self
    }

    pub fn with_device(mut self, device_type: InferenceDevice) -> Self {
        self.device = device_type;
        self
    }

    pub fn with_trt_fp16(mut self, x: bool) -> Self {
        self.trt_fp16_enable = x;
        self
    }

    pub fn with_profile(mut self, profile: bool) -> Self {
        self.profile = profile;
        self
    }
}
