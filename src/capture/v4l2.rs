//! V4L2 camera source.

use std::sync::Arc;
use anyhow::{Context, Result};
use ouroboros::self_referencing;
use crate::capture::{normalize, FrameSource};
use crate::common::Frame;

#[self_referencing]
struct DeviceState {
    device: v4l::Device,
    #[borrows(mut device)]
    #[covariant]
    stream: v4l::prelude::MmapStream<'this, v4l::Device>,
}

// `POLLIN` from poll(2)
const POLLIN: i16 = 0x001;

/// Frames from a local `/dev/videoN` node, converted to RGB.
///
/// Once streaming, a frame is only dequeued when the driver already has one
/// ready, so a tick never waits for the camera.
pub struct V4l2Source {
    path: String,
    handle: Arc<v4l::device::Handle>,
    state: DeviceState,
    streaming: bool,
    fourcc: [u8; 4],
    width: u32,
    height: u32,
}

impl V4l2Source {
    pub fn open(path: &str, width: u32, height: u32, fps: u32) -> Result<Self> {
        use v4l::buffer::Type;
        use v4l::video::Capture;

        let mut device = v4l::Device::with_path(path)
            .with_context(|| format!("open v4l2 device {}", path))?;
        let mut format = device.format().context("read v4l2 format")?;
        format.width = width;
        format.height = height;
        format.fourcc = v4l::FourCC::new(b"YUYV");

        let format = match device.set_format(&format) {
            Ok(format) => format,
            Err(err) => {
                log::warn!("V4l2Source: failed to set format on {}: {}", path, err);
                device
                    .format()
                    .context("read v4l2 format after set failure")?
            }
        };

        if fps > 0 {
            let params = v4l::video::capture::Parameters::with_fps(fps);
            if let Err(err) = device.set_params(&params) {
                log::warn!("V4l2Source: failed to set fps on {}: {}", path, err);
            }
        }

        let handle = device.handle();
        let state = DeviceStateBuilder {
            device,
            stream_builder: |device| {
                v4l::prelude::MmapStream::with_buffers(device, Type::VideoCapture, 4)
                    .map_err(|err| anyhow::Error::new(err).context("create v4l2 buffer stream"))
            },
        }
        .try_build()?;

        log::info!(
            "V4l2Source: connected to {} ({}x{} {})",
            path,
            format.width,
            format.height,
            format.fourcc,
        );

        Ok(Self {
            path: path.to_string(),
            handle,
            state,
            streaming: false,
            fourcc: format.fourcc.repr,
            width: format.width,
            height: format.height,
        })
    }

    /// Zero-timeout poll on the device node.
    fn buffer_ready(&self) -> Result<bool> {
        let ready = self.handle.poll(POLLIN, 0).context("poll v4l2 device")?;
        Ok(ready > 0)
    }
}

impl FrameSource for V4l2Source {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        use v4l::io::traits::CaptureStream;

        if self.streaming && !self.buffer_ready()? {
            return Ok(None);
        }

        let (fourcc, width, height) = (self.fourcc, self.width, self.height);
        let frame = self.state.with_mut(|fields| -> Result<Option<Frame>> {
            let (buf, meta) = fields.stream.next().context("capture v4l2 frame")?;
            let used = (meta.bytesused as usize).min(buf.len());
            if used == 0 {
                return Ok(None);
            }
            normalize::to_frame(&fourcc, width, height, &buf[..used]).map(Some)
        })?;
        self.streaming = true;
        Ok(frame)
    }

    fn describe(&self) -> String {
        format!(
            "{} ({}x{} {})",
            self.path,
            self.width,
            self.height,
            String::from_utf8_lossy(&self.fourcc)
        )
    }
}
