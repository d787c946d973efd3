use std::process;
use std::time::Duration;
use eframe::egui;
use autointell::capture;
use autointell::config::AppConfig;
use autointell::detection_runners::DetectionWorker;
use autointell::gui::AutoIntellApp;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            log::error!("{err:#}, using the default configuration");
            AppConfig::default()
        }
    };

    let source = match capture::open_source(&config.camera) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Camera not found!: {err:#}");
            process::exit(1);
        }
    };

    let model = config.model.clone();
    let worker = match DetectionWorker::spawn(move || autointell::init_detector(&model)) {
        Ok(worker) => worker,
        Err(err) => {
            eprintln!("Failed to start the detection worker: {err:#}");
            process::exit(1);
        }
    };

    let app = AutoIntellApp::new(
        source,
        worker,
        config.model.get_threshold(),
        config.display_width,
        Duration::from_millis(config.tick_interval_ms),
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("AutoIntell")
            .with_inner_size([config.window_width, config.window_height]),
        ..Default::default()
    };

    eframe::run_native(
        "AutoIntell",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
}
