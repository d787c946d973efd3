use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};

/// A single RGB raster snapshot, from the camera or from a file.
///
/// Frames are immutable once produced. Stages hand them over by value, so a
/// frame has exactly one owner at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    image: RgbImage,
}

impl std::ops::Deref for Frame {
    type Target = RgbImage;

    fn deref(&self) -> &Self::Target {
        &self.image
    }
}

impl From<DynamicImage> for Frame {
    fn from(image: DynamicImage) -> Self {
        Self {
            image: image.to_rgb8(),
        }
    }
}

impl From<GrayImage> for Frame {
    fn from(image: GrayImage) -> Self {
        Self {
            image: DynamicImage::from(image).to_rgb8(),
        }
    }
}

impl From<RgbImage> for Frame {
    fn from(image: RgbImage) -> Self {
        Self { image }
    }
}

impl From<RgbaImage> for Frame {
    fn from(image: RgbaImage) -> Self {
        Self {
            image: DynamicImage::from(image).to_rgb8(),
        }
    }
}

impl From<Frame> for RgbImage {
    fn from(frame: Frame) -> Self {
        frame.into_rgb8()
    }
}

impl Frame {
    /// Builds a frame from a packed RGB buffer. Returns `None` when the buffer
    /// length does not match `width * height * 3`.
    pub fn from_raw(width: u32, height: u32, buffer: Vec<u8>) -> Option<Self> {
        RgbImage::from_raw(width, height, buffer).map(Self::from)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn is_empty(&self) -> bool {
        self.image.width() == 0 || self.image.height() == 0
    }

    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn to_rgb8(&self) -> RgbImage {
        self.image.clone()
    }

    pub fn into_rgb8(self) -> RgbImage {
        self.image
    }
}
