use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn an image file into a [`Frame`](crate::common::Frame).
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("cannot read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{} is not a supported image: {source}", path.display())]
    Unsupported {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Missing or unusable model artifacts. Fails a single detection call.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model artifact not found: {}", .0.display())]
    MissingArtifact(PathBuf),
    #[error("model artifact {} is malformed: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },
}
