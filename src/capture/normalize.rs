//! Conversion of raw capture buffers to RGB frames.

use anyhow::{bail, Context};
use image::ImageFormat;
use crate::common::Frame;

/// Converts one captured buffer with pixel format `fourcc` into a frame.
/// Drivers may pad buffers, so only the leading bytes are used.
pub fn to_frame(fourcc: &[u8; 4], width: u32, height: u32, buf: &[u8]) -> anyhow::Result<Frame> {
    match fourcc {
        b"RGB3" => {
            let len = width as usize * height as usize * 3;
            if buf.len() < len {
                bail!("Short RGB3 buffer: got {} bytes, expected {}", buf.len(), len);
            }
            Frame::from_raw(width, height, buf[..len].to_vec())
                .context("RGB3 buffer does not match the frame size")
        }
        b"YUYV" => yuyv_to_frame(width, height, buf),
        b"MJPG" => {
            let image = image::load_from_memory_with_format(buf, ImageFormat::Jpeg)
                .context("Failed to decode MJPG frame")?;
            Ok(Frame::from(image))
        }
        other => bail!("Unsupported pixel format {}", String::from_utf8_lossy(other)),
    }
}

fn yuyv_to_frame(width: u32, height: u32, buf: &[u8]) -> anyhow::Result<Frame> {
    let pixels = width as usize * height as usize;
    if pixels % 2 != 0 {
        bail!("YUYV frames need an even pixel count, got {}x{}", width, height);
    }
    if buf.len() < pixels * 2 {
        bail!("Short YUYV buffer: got {} bytes, expected {}", buf.len(), pixels * 2);
    }

    let mut rgb = Vec::with_capacity(pixels * 3);
    for chunk in buf[..pixels * 2].chunks_exact(4) {
        let (y0, u, y1, v) = (chunk[0], chunk[1], chunk[2], chunk[3]);
        rgb.extend_from_slice(&yuv_to_rgb(y0, u, v));
        rgb.extend_from_slice(&yuv_to_rgb(y1, u, v));
    }

    Frame::from_raw(width, height, rgb).context("YUYV buffer does not match the frame size")
}

/// BT.601 full range.
fn yuv_to_rgb(y: u8, u: u8, v: u8) -> [u8; 3] {
    let y = y as f32;
    let u = u as f32 - 128.;
    let v = v as f32 - 128.;

    let r = y + 1.402 * v;
    let g = y - 0.344_136 * u - 0.714_136 * v;
    let b = y + 1.772 * u;
    [
        r.round().clamp(0., 255.) as u8,
        g.round().clamp(0., 255.) as u8,
        b.round().clamp(0., 255.) as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_chroma_gives_grey() {
        let frame = to_frame(b"YUYV", 2, 1, &[128, 128, 64, 128]).unwrap();
        assert_eq!(frame.get_pixel(0, 0).0, [128, 128, 128]);
        assert_eq!(frame.get_pixel(1, 0).0, [64, 64, 64]);
    }

    #[test]
    fn rgb3_ignores_padding() {
        let frame = to_frame(b"RGB3", 1, 1, &[1, 2, 3, 0, 0]).unwrap();
        assert_eq!(frame.get_pixel(0, 0).0, [1, 2, 3]);
    }

    #[test]
    fn short_buffers_are_rejected() {
        assert!(to_frame(b"RGB3", 2, 2, &[0; 6]).is_err());
        assert!(to_frame(b"YUYV", 2, 2, &[0; 4]).is_err());
        assert!(to_frame(b"H264", 2, 2, &[0; 64]).is_err());
    }
}
