use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelVersion {
    #[default] YoloV3,
    YoloV5,
    YoloV8,
}

impl ModelVersion {
    pub fn name(&self) -> String {
        match self {
            Self::YoloV3 => "YoloV3".to_string(),
            Self::YoloV5 => "YoloV5".to_string(),
            Self::YoloV8 => "YoloV8".to_string(),
        }
    }

    pub fn preds(&self) -> YoloPreds {
        match self {
            ModelVersion::YoloV3 => YoloPreds::darknet(),
            ModelVersion::YoloV5 => YoloPreds::n_a_cxcywh_confclss(),
            ModelVersion::YoloV8 => YoloPreds::n_cxcywh_clss_a(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClssType {
    /// `[obj, clss..]` where the class scores already carry the objectness.
    ObjClss,
    /// `[conf, clss..]`, the score is `conf * cls`.
    ConfClss,
    /// `[clss..]`
    Clss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorsPosition {
    Before,
    After,
}

/// Layout of one detection-layer output. Boxes are always `cx, cy, w, h`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YoloPreds {
    pub clss: ClssType,
    pub anchors: AnchorsPosition,
    pub is_bbox_normalized: bool,
}

impl Default for YoloPreds {
    fn default() -> Self {
        Self::darknet()
    }
}

impl YoloPreds {
    pub fn darknet() -> Self {
        // YOLOv3 region layers: NACxcywhObjClss, normalized to the frame
        Self {
            clss: ClssType::ObjClss,
            anchors: AnchorsPosition::Before,
            is_bbox_normalized: true,
        }
    }

    pub fn n_a_cxcywh_confclss() -> Self {
        // YOLOv5 | YOLOv7 : NACxcywhConfClss
        Self {
            clss: ClssType::ConfClss,
            anchors: AnchorsPosition::Before,
            is_bbox_normalized: false,
        }
    }

    pub fn n_cxcywh_clss_a() -> Self {
        // YOLOv8 : NCxcywhClssA
        Self {
            clss: ClssType::Clss,
            anchors: AnchorsPosition::After,
            is_bbox_normalized: false,
        }
    }

    pub fn is_anchors_first(&self) -> bool {
        matches!(self.anchors, AnchorsPosition::Before)
    }

    /// Column where the per-class scores start.
    pub fn scores_offset(&self) -> usize {
        match self.clss {
            ClssType::ObjClss | ClssType::ConfClss => 5,
            ClssType::Clss => 4,
        }
    }
}
