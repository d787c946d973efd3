//! Camera frame sources.
//!
//! A source is pulled once per UI tick. `Ok(None)` means the device had
//! nothing new this tick and the caller keeps what it is showing.

mod normalize;
mod synthetic;
#[cfg(feature = "camera-v4l2")]
mod v4l2;

pub use normalize::to_frame;
pub use synthetic::SyntheticSource;
#[cfg(feature = "camera-v4l2")]
pub use v4l2::V4l2Source;

use crate::common::Frame;
use crate::config::CameraConfig;

pub const STUB_PREFIX: &str = "stub://";

pub trait FrameSource {
    fn next_frame(&mut self) -> anyhow::Result<Option<Frame>>;

    /// Human-readable device name for logs and the status line.
    fn describe(&self) -> String;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn next_frame(&mut self) -> anyhow::Result<Option<Frame>> {
        (**self).next_frame()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Maps the configured device string to a device node. A bare number `N`
/// means `/dev/videoN`.
pub fn device_path(device: &str) -> String {
    match device.trim().parse::<usize>() {
        Ok(index) => format!("/dev/video{}", index),
        Err(_) => device.trim().to_string(),
    }
}

/// Opens the configured camera. Failure here is fatal for the application.
pub fn open_source(config: &CameraConfig) -> anyhow::Result<Box<dyn FrameSource>> {
    if config.device.starts_with(STUB_PREFIX) {
        let source = SyntheticSource::new(&config.device, config.width, config.height);
        log::info!("Camera opened: {}", source.describe());
        return Ok(Box::new(source));
    }
    open_device(config)
}

#[cfg(feature = "camera-v4l2")]
fn open_device(config: &CameraConfig) -> anyhow::Result<Box<dyn FrameSource>> {
    let source = V4l2Source::open(&device_path(&config.device), config.width, config.height, config.fps)?;
    log::info!("Camera opened: {}", source.describe());
    Ok(Box::new(source))
}

#[cfg(not(feature = "camera-v4l2"))]
fn open_device(config: &CameraConfig) -> anyhow::Result<Box<dyn FrameSource>> {
    anyhow::bail!(
        "{}: camera support is not compiled in (enable the `camera-v4l2` feature or use a `{}` device)",
        device_path(&config.device),
        STUB_PREFIX,
    )
}
