//! UI state machine. Holds no widgets, so every transition can be driven
//! directly from tests.

use std::path::PathBuf;
use crate::common::Frame;
use crate::data::send_channels::{Job, WorkerEvent};
use crate::data::TimeCalc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Showing the camera feed.
    Live,
    /// Frozen on the retained frame, captured or imported.
    Captured,
}

/// What the shell has to do after a transition.
#[derive(Debug)]
pub enum Action {
    Present(Frame),
    Submit(Job),
}

#[derive(Debug)]
pub struct AppState {
    mode: Mode,
    retained: Option<Frame>,
    last_live: Option<Frame>,
    dims: Option<(u32, u32)>,
    detection_enabled: bool,
    threshold: f32,
    epoch: u64,
    /// Epoch and requested threshold of the import in flight.
    import_pending: Option<(u64, Option<f32>)>,
    message: String,
    detect_time: TimeCalc,
}

impl AppState {
    pub fn new(threshold: f32) -> Self {
        Self {
            mode: Mode::Live,
            retained: None,
            last_live: None,
            dims: None,
            detection_enabled: false,
            threshold: threshold.clamp(0., 1.),
            epoch: 0,
            import_pending: None,
            message: String::new(),
            detect_time: TimeCalc::default(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn retained(&self) -> Option<&Frame> {
        self.retained.as_ref()
    }

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.dims
    }

    pub fn detection_enabled(&self) -> bool {
        self.detection_enabled
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn import_pending(&self) -> bool {
        self.import_pending.is_some()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn button_label(&self) -> &'static str {
        match self.mode {
            Mode::Live => "Take a picture",
            Mode::Captured => "Retake Image",
        }
    }

    pub fn width_text(&self) -> String {
        match self.dims {
            Some((width, _)) => format!("Width: {}", width),
            None => "Width: -".to_string(),
        }
    }

    pub fn height_text(&self) -> String {
        match self.dims {
            Some((_, height)) => format!("Height: {}", height),
            None => "Height: -".to_string(),
        }
    }

    /// One-line summary for the status bar.
    pub fn status(&self) -> String {
        let mode = match self.mode {
            Mode::Live => "Live",
            Mode::Captured => "Captured",
        };
        let detection = if self.detection_enabled {
            format!("on (> {:.2})", self.threshold)
        } else {
            "off".to_string()
        };
        let mut status = format!("{} | Detection: {}", mode, detection);
        if let Some(avg) = self.detect_time.avg() {
            status.push_str(&format!(" | Avg detection: {:.1?}", avg));
        }
        if !self.message.is_empty() {
            status.push_str(" | ");
            status.push_str(&self.message);
        }
        status
    }

    /// Records a problem outside the regular transitions, e.g. a stopped worker.
    pub fn report(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    /// A camera pull while `Live`. `None` means the device had nothing new.
    pub fn on_tick(&mut self, frame: Option<Frame>) -> Option<Action> {
        if self.mode != Mode::Live {
            return None;
        }
        let frame = frame?;

        if !self.detection_enabled {
            self.last_live = Some(frame.clone());
            return Some(Action::Present(frame));
        }

        if self.import_pending.is_some() {
            self.last_live = Some(frame);
            return None;
        }

        self.last_live = Some(frame.clone());
        Some(Action::Submit(Job::Detect {
            epoch: self.epoch,
            frame,
            threshold: self.threshold,
        }))
    }

    /// The capture/retake button.
    pub fn on_capture_pressed(&mut self) -> Option<Action> {
        if self.import_pending.is_some() {
            self.message = "Import in progress".to_string();
            return None;
        }

        match self.mode {
            Mode::Live => {
                let Some(frame) = self.last_live.clone() else {
                    self.message = "No camera frame to capture yet".to_string();
                    return None;
                };
                self.advance();
                self.mode = Mode::Captured;
                self.dims = Some(frame.dimensions());
                self.retained = Some(frame);
                self.message = "Image captured".to_string();
                self.render_retained()
            }
            Mode::Captured => {
                self.advance();
                self.mode = Mode::Live;
                self.message.clear();
                None
            }
        }
    }

    pub fn on_import_requested(&mut self, path: PathBuf) -> Option<Action> {
        if self.import_pending.is_some() {
            self.message = "Import already in progress".to_string();
            return None;
        }

        self.advance();
        let threshold = self.detection_enabled.then_some(self.threshold);
        self.import_pending = Some((self.epoch, threshold));
        self.message = format!("Importing {}", path.display());
        Some(Action::Submit(Job::Import {
            epoch: self.epoch,
            path,
            threshold,
        }))
    }

    pub fn set_detection(&mut self, enabled: bool) -> Option<Action> {
        if self.detection_enabled == enabled {
            return None;
        }
        self.detection_enabled = enabled;
        self.advance();
        self.message.clear();
        self.rerender()
    }

    pub fn set_threshold(&mut self, threshold: f32) -> Option<Action> {
        let threshold = threshold.clamp(0., 1.);
        if self.threshold == threshold {
            return None;
        }
        self.threshold = threshold;
        self.advance();
        if self.detection_enabled {
            self.rerender()
        } else {
            None
        }
    }

    pub fn on_worker_event(&mut self, event: WorkerEvent) -> Option<Action> {
        match event {
            WorkerEvent::Detected { epoch, frame, elapsed } => {
                self.detect_time.add_or_push(0, elapsed);
                self.detect_time.finish_run();
                if epoch != self.epoch {
                    log::debug!("Dropping detection result from epoch {} (now {})", epoch, self.epoch);
                    return None;
                }
                Some(Action::Present(frame))
            }
            WorkerEvent::DetectFailed { epoch, reason } => {
                if epoch != self.epoch {
                    return None;
                }
                self.detection_enabled = false;
                self.advance();
                self.message = format!("Detection disabled: {}", reason);
                None
            }
            WorkerEvent::Imported { epoch, frame, annotated } => {
                let Some((_, requested)) = self.take_import(epoch) else {
                    return None;
                };
                self.advance();
                self.mode = Mode::Captured;
                self.dims = Some(frame.dimensions());
                self.retained = Some(frame.clone());
                self.message = "Image imported".to_string();

                let wanted = self.detection_enabled.then_some(self.threshold);
                match annotated {
                    Some(Ok(annotated)) if requested == wanted => Some(Action::Present(annotated)),
                    Some(Err(reason)) => {
                        self.detection_enabled = false;
                        self.message = format!("Image imported, detection disabled: {}", reason);
                        Some(Action::Present(frame))
                    }
                    _ => self.render_retained(),
                }
            }
            WorkerEvent::ImportFailed { epoch, error } => {
                if self.take_import(epoch).is_some() {
                    self.message = format!("Import failed: {}", error);
                }
                None
            }
        }
    }

    fn take_import(&mut self, epoch: u64) -> Option<(u64, Option<f32>)> {
        match self.import_pending {
            Some((pending, _)) if pending == epoch => self.import_pending.take(),
            _ => {
                log::debug!("Dropping import result from epoch {}", epoch);
                None
            }
        }
    }

    fn advance(&mut self) {
        self.epoch += 1;
    }

    fn rerender(&mut self) -> Option<Action> {
        if self.mode == Mode::Captured && self.import_pending.is_none() {
            self.render_retained()
        } else {
            None
        }
    }

    fn render_retained(&self) -> Option<Action> {
        let frame = self.retained.clone()?;
        if self.detection_enabled {
            Some(Action::Submit(Job::Detect {
                epoch: self.epoch,
                frame,
                threshold: self.threshold,
            }))
        } else {
            Some(Action::Present(frame))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn frame(width: u32, height: u32) -> Frame {
        Frame::from(RgbImage::new(width, height))
    }

    #[test]
    fn labels_follow_mode() {
        let mut state = AppState::new(0.5);
        assert_eq!(state.button_label(), "Take a picture");
        assert_eq!(state.width_text(), "Width: -");

        state.on_tick(Some(frame(8, 6)));
        state.on_capture_pressed();
        assert_eq!(state.button_label(), "Retake Image");
        assert_eq!(state.width_text(), "Width: 8");
        assert_eq!(state.height_text(), "Height: 6");
    }

    #[test]
    fn capture_without_a_frame_is_ignored() {
        let mut state = AppState::new(0.5);
        assert!(state.on_capture_pressed().is_none());
        assert_eq!(state.mode(), Mode::Live);
        assert!(!state.message().is_empty());
    }

    #[test]
    fn threshold_is_clamped() {
        let mut state = AppState::new(3.0);
        assert_eq!(state.threshold(), 1.0);
        state.set_threshold(-1.0);
        assert_eq!(state.threshold(), 0.0);
    }
}
