use anyhow::{bail, Result};
use ndarray::{s, Array2, ArrayD, Array4, Axis};
use rayon::prelude::*;

use crate::common::{ClassLabelTable, ClssType, Detection, DetectionBox, Frame, ModelVersion, YoloPreds};
use crate::detection_runners::annotate::Annotator;
use crate::detection_runners::inference_process::{InferenceProcess, Network};
use crate::detection_runners::ort_detector::{image_ops, nms};

/// YOLO post-processing over any [`Network`]: decodes candidate rows into
/// [`Detection`]s and draws them.
#[derive(Debug)]
pub struct YoloDetector<N: Network> {
    network: N,
    labels: ClassLabelTable,
    layout: YoloPreds,
    iou: Option<f32>,
    annotator: Annotator,
    profile: bool,
}

impl<N: Network> InferenceProcess for YoloDetector<N> {
    type Input = Frame;
    type Output = Vec<Detection>;

    fn preprocess(&self, x: &Frame) -> Result<Array4<f32>> {
        let (width, height) = self.network.input_size();
        image_ops::preprocess(x, width, height)
    }

    fn inference(&mut self, x: Array4<f32>) -> Result<Vec<ArrayD<f32>>> {
        self.network.forward(x)
    }

    fn postprocess(&self, ys: Vec<ArrayD<f32>>, x0: &Frame, threshold: f32) -> Result<Vec<Detection>> {
        let (frame_w, frame_h) = x0.dimensions();
        let (input_w, input_h) = self.network.input_size();
        let layout = self.layout;
        let labels = &self.labels;
        let offset = layout.scores_offset();

        let mut detections = Vec::new();
        for y in ys.iter() {
            let preds = Self::candidates(y, &layout)?;
            if preds.nrows() == 0 {
                continue;
            }
            if preds.ncols() <= offset {
                bail!("Detection output has {} values per candidate, expected more than {}", preds.ncols(), offset);
            }

            let layer: Vec<Detection> = preds
                .axis_iter(Axis(0))
                .into_par_iter()
                .filter_map(|row| {
                    // confidence & class_id
                    let (class_id, &score) = row
                        .slice(s![offset..])
                        .into_iter()
                        .enumerate()
                        .max_by(|a, b| a.1.total_cmp(b.1))?;

                    let confidence = match layout.clss {
                        ClssType::ConfClss => score * row[4],
                        ClssType::ObjClss | ClssType::Clss => score,
                    };

                    // filtering low scores
                    if confidence.is_nan() || confidence <= threshold {
                        return None;
                    }

                    let (mut cx, mut cy, mut w, mut h) = (row[0], row[1], row[2], row[3]);
                    if !layout.is_bbox_normalized {
                        cx /= input_w as f32;
                        cy /= input_h as f32;
                        w /= input_w as f32;
                        h /= input_h as f32;
                    }

                    let bbox = DetectionBox::default()
                        .with_cxcy_wh(
                            cx * frame_w as f32,
                            cy * frame_h as f32,
                            w * frame_w as f32,
                            h * frame_h as f32,
                        )
                        .clamped(frame_w, frame_h);

                    Some(Detection::default()
                        .with_bbox(bbox)
                        .with_confidence(confidence)
                        .with_class_id(class_id)
                        .with_label(&labels.name(class_id)))
                })
                .collect();

            detections.extend(layer);
        }

        if let Some(iou) = self.iou {
            nms::nms(&mut detections, iou);
        }

        Ok(detections)
    }
}

impl<N: Network> YoloDetector<N> {
    pub fn new(network: N, labels: ClassLabelTable, version: ModelVersion) -> Result<Self> {
        let layout = version.preds();
        log::info!("YOLO Version: {} | Classes: {}", version.name(), labels.len());

        Ok(Self {
            network,
            labels,
            layout,
            iou: None,
            annotator: Annotator::new()?,
            profile: false,
        })
    }

    /// Enables non-max suppression with the given IoU threshold.
    pub fn with_iou(mut self, iou: Option<f32>) -> Self {
        self.iou = iou;
        self
    }

    /// Logs per-stage timings at trace level.
    pub fn with_profile(mut self, profile: bool) -> Self {
        self.profile = profile;
        self
    }

    /// Boxes and labels for every candidate scoring strictly above `threshold`.
    /// A score equal to the threshold is rejected, so threshold 0 keeps
    /// positive scores only and threshold 1 keeps nothing.
    pub fn detections(&mut self, frame: &Frame, threshold: f32) -> Result<Vec<Detection>> {
        let profile = self.profile;
        self.forward(frame, threshold, profile)
    }

    /// Annotated copy of `frame`. The input is never modified and the result
    /// always has the same dimensions.
    pub fn detect(&mut self, frame: &Frame, threshold: f32) -> Result<Frame> {
        let detections = self.detections(frame, threshold)?;
        log::debug!("Detected {} objects above {:.2}", detections.len(), threshold);
        Ok(self.annotator.draw(frame, &detections))
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    /// Flattens one output into `[candidates, values]` rows.
    fn candidates(y: &ArrayD<f32>, layout: &YoloPreds) -> Result<Array2<f32>> {
        let shape = y.shape();
        if shape.len() < 2 {
            bail!("Unexpected detection output shape {:?}", shape);
        }
        let last = shape[shape.len() - 1];

        if layout.is_anchors_first() {
            let rows = if last == 0 { 0 } else { y.len() / last };
            Ok(y.to_shape((rows, last))?.to_owned())
        } else {
            let features = shape[shape.len() - 2];
            let preds = y.to_shape((features, last))?;
            Ok(preds.t().to_owned())
        }
    }
}
