//! Still-image import.

use std::fs;
use std::path::Path;
use crate::common::Frame;
use crate::error::DecodeError;

/// Extensions offered by the import dialog.
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

/// Decodes the file at `path` into an RGB frame at its native size. The
/// format is taken from the file content, not the extension.
pub fn load(path: &Path) -> Result<Frame, DecodeError> {
    let bytes = fs::read(path).map_err(|source| DecodeError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let image = image::load_from_memory(&bytes).map_err(|source| DecodeError::Unsupported {
        path: path.to_path_buf(),
        source,
    })?;

    log::info!("Imported {} ({}x{})", path.display(), image.width(), image.height());
    Ok(Frame::from(image))
}
