use std::time::{Duration, Instant};
use eframe::egui;
use crate::capture::FrameSource;
use crate::decoder::SUPPORTED_EXTENSIONS;
use crate::detection_runners::DetectionWorker;
use crate::gui::display::DisplaySink;
use crate::gui::state::{Action, AppState, Mode};

const TEXT_SIZE: f32 = 14.0;

pub struct AutoIntellApp {
    state: AppState,
    source: Box<dyn FrameSource>,
    worker: DetectionWorker,
    display: DisplaySink,
    tick: Duration,
    last_tick: Option<Instant>,
}

impl AutoIntellApp {
    pub fn new(
        source: Box<dyn FrameSource>,
        worker: DetectionWorker,
        threshold: f32,
        display_width: u32,
        tick: Duration,
    ) -> Self {
        Self {
            state: AppState::new(threshold),
            source,
            worker,
            display: DisplaySink::new(display_width),
            tick,
            last_tick: None,
        }
    }

    fn apply(&mut self, ctx: &egui::Context, action: Option<Action>) {
        match action {
            Some(Action::Present(frame)) => self.display.present(ctx, Some(&frame)),
            Some(Action::Submit(job)) => {
                if !self.worker.submit(job) {
                    self.state.report("Detection worker is not running");
                }
            }
            None => {}
        }
    }

    fn drain_worker(&mut self, ctx: &egui::Context) {
        while let Some(event) = self.worker.poll() {
            let action = self.state.on_worker_event(event);
            self.apply(ctx, action);
        }
    }

    fn pull_frame(&mut self, ctx: &egui::Context) {
        if self.state.mode() != Mode::Live {
            return;
        }
        if self.last_tick.is_some_and(|last| last.elapsed() < self.tick) {
            return;
        }
        self.last_tick = Some(Instant::now());

        let frame = match self.source.next_frame() {
            Ok(frame) => frame,
            Err(err) => {
                log::warn!("Camera read failed on {}: {err:#}", self.source.describe());
                None
            }
        };
        let action = self.state.on_tick(frame);
        self.apply(ctx, action);
    }

    fn controls(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        ui.add_space(8.0);
        if ui.button(egui::RichText::new(self.state.button_label()).size(TEXT_SIZE)).clicked() {
            let action = self.state.on_capture_pressed();
            self.apply(ctx, action);
        }

        let import = ui.add_enabled(
            !self.state.import_pending(),
            egui::Button::new(egui::RichText::new("Import Image").size(TEXT_SIZE)),
        );
        if import.clicked() {
            let picked = rfd::FileDialog::new()
                .set_title("Import Image")
                .add_filter("Images", &SUPPORTED_EXTENSIONS)
                .pick_file();
            if let Some(path) = picked {
                let action = self.state.on_import_requested(path);
                self.apply(ctx, action);
            }
        }

        ui.separator();

        let mut enabled = self.state.detection_enabled();
        if ui.checkbox(&mut enabled, egui::RichText::new("Detect objects").size(TEXT_SIZE)).changed() {
            let action = self.state.set_detection(enabled);
            self.apply(ctx, action);
        }

        let mut threshold = self.state.threshold();
        let slider = ui.add(egui::Slider::new(&mut threshold, 0.0..=1.0).text("Threshold"));
        if slider.changed() {
            let action = self.state.set_threshold(threshold);
            self.apply(ctx, action);
        }

        ui.separator();
        ui.label(egui::RichText::new(self.state.width_text()).size(TEXT_SIZE));
        ui.label(egui::RichText::new(self.state.height_text()).size(TEXT_SIZE));
    }
}

impl eframe::App for AutoIntellApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_worker(ctx);
        self.pull_frame(ctx);

        egui::SidePanel::left("controls")
            .resizable(false)
            .show(ctx, |ui| self.controls(ctx, ui));

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(self.state.status());
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.display.show(ui);
        });

        ctx.request_repaint_after(self.tick);
    }
}
