use std::fmt;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum InferenceDevice {
    #[default] CPU,
    CUDA(usize),
    TensorRT(usize),
}

// Hardcoded device names, as written in the config file.
const CPU: &str = "cpu";
const CUDA: &str = "cuda";
const TENSOR_RT: &str = "tensorrt";

impl InferenceDevice {
    pub fn from_str(device: &str, device_id: usize) -> Option<Self> {
        match device.to_lowercase().as_str() {
            "cpu" => Some(InferenceDevice::CPU),
            "cuda" => Some(InferenceDevice::CUDA(device_id)),
            "tensorrt" => Some(InferenceDevice::TensorRT(device_id)),
            _ => None,
        }
    }

    /// Parses `cpu`, `cuda`, `cuda:1`, `tensorrt:0` and so on.
    pub fn parse(value: &str) -> Option<Self> {
        match value.split_once(':') {
            Some((device, id)) => Self::from_str(device.trim(), id.trim().parse().ok()?),
            None => Self::from_str(value.trim(), 0),
        }
    }

    pub fn str_lowercase(&self) -> &'static str {
        match self {
            InferenceDevice::CPU => CPU,
            InferenceDevice::CUDA(_) => CUDA,
            InferenceDevice::TensorRT(_) => TENSOR_RT,
        }
    }

    pub fn all_inference_devices() -> Vec<String> {
        vec![
            InferenceDevice::CPU.str_lowercase().to_string(),
            InferenceDevice::CUDA(0).str_lowercase().to_string(),
            InferenceDevice::TensorRT(0).str_lowercase().to_string(),
        ]
    }
}

impl fmt::Display for InferenceDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferenceDevice::CPU => write!(f, "{}", self.str_lowercase()),
            InferenceDevice::CUDA(id) | InferenceDevice::TensorRT(id) => {
                write!(f, "{}:{}", self.str_lowercase(), id)
            }
        }
    }
}

impl Serialize for InferenceDevice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for InferenceDevice {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        InferenceDevice::parse(&value).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "unknown inference device '{}', expected one of {:?}",
                value,
                InferenceDevice::all_inference_devices()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_device_with_and_without_id() {
        assert_eq!(InferenceDevice::parse("cpu"), Some(InferenceDevice::CPU));
        assert_eq!(InferenceDevice::parse("CUDA:1"), Some(InferenceDevice::CUDA(1)));
        assert_eq!(InferenceDevice::parse("tensorrt"), Some(InferenceDevice::TensorRT(0)));
        assert_eq!(InferenceDevice::parse("npu"), None);
    }

    #[test]
    fn display_round_trips_through_parse() {
        let device = InferenceDevice::CUDA(2);
        assert_eq!(InferenceDevice::parse(&device.to_string()), Some(device));
    }
}
