use serde::{Deserialize, Serialize};
use crate::common::DetectionBox;
use crate::detection_runners::ort_detector::nms::Nms;

/// One predicted object: class, score and box. Lives for a single
/// annotation pass.
#[derive(Default, Debug, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Detection {
    pub class_id: usize,
    pub bbox: DetectionBox,
    pub label: Option<String>,
    pub confidence: f32,
}

impl Nms for Detection {
    fn iou(&self, other: &Self) -> f32 {
        self.bbox.iou(&other.bbox)
    }

    fn confidence(&self) -> f32 {
        self.confidence
    }
}

impl Detection {
    /// Sets the bounding box's coordinates and dimensions using `(x, y, w, h)`.
    pub fn with_x1y1_wh(mut self, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.bbox = DetectionBox::default().with_x1y1_wh(x, y, w, h);
        self
    }

    pub fn with_bbox(mut self, bbox: DetectionBox) -> Self {
        self.bbox = bbox;
        self
    }

    pub fn with_confidence(mut self, conf: f32) -> Self {
        self.confidence = conf;
        self
    }

    pub fn with_class_id(mut self, class_id: usize) -> Self {
        self.class_id = class_id;
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn get_label(&self) -> String {
        self.label.clone().unwrap_or_else(|| format!("# {}", self.class_id))
    }

    /// Text drawn next to the box, e.g. `person: 0.87`.
    pub fn caption(&self) -> String {
        format!("{}: {:.2}", self.get_label(), self.confidence)
    }
}
