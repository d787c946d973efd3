use image::{Rgb, RgbImage};
use crate::capture::FrameSource;
use crate::common::Frame;

/// Moving gradient used in place of a camera for `stub://` devices.
#[derive(Debug)]
pub struct SyntheticSource {
    name: String,
    width: u32,
    height: u32,
    frame_count: u64,
}

impl SyntheticSource {
    pub fn new(name: &str, width: u32, height: u32) -> Self {
        Self {
            name: name.to_string(),
            width: width.max(1),
            height: height.max(1),
            frame_count: 0,
        }
    }

    pub fn frames_captured(&self) -> u64 {
        self.frame_count
    }
}

impl FrameSource for SyntheticSource {
    fn next_frame(&mut self) -> anyhow::Result<Option<Frame>> {
        self.frame_count += 1;
        let (width, height) = (self.width, self.height);
        let shift = (self.frame_count % width as u64) as u32;
        let tint = (self.frame_count % 256) as u8;

        let image = RgbImage::from_fn(width, height, |x, y| {
            Rgb([
                ((x + shift) % width * 255 / width) as u8,
                (y * 255 / height) as u8,
                tint,
            ])
        });
        Ok(Some(Frame::from(image)))
    }

    fn describe(&self) -> String {
        format!("{} (synthetic {}x{})", self.name, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successive_frames_differ() {
        let mut source = SyntheticSource::new("stub://test", 16, 8);
        let first = source.next_frame().unwrap().unwrap();
        let second = source.next_frame().unwrap().unwrap();

        assert_eq!(first.dimensions(), (16, 8));
        assert_ne!(first, second);
        assert_eq!(source.frames_captured(), 2);
    }
}
