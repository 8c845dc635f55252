//! Fixed-size image nodes

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::helpers::encode_segment;

/// Hex characters of the content hash kept in public URLs
const HASH_LENGTH: usize = 16;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image not found: {0:?}")]
    NotFound(PathBuf),
    #[error("unsupported image format: {0:?}")]
    Unsupported(PathBuf),
    #[error("corrupted image: {0:?}")]
    Corrupted(PathBuf),
    #[error("image has no pixels: {0:?}")]
    Empty(PathBuf),
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// An image scaled to a fixed width, ready to be placed in an `<img>` tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedImage {
    pub src: String,
    pub width: u32,
    pub height: u32,
}

/// A processed image: where it came from, and where it is published
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageNode {
    pub source: PathBuf,
    /// Output path relative to the public directory
    pub output: PathBuf,
    pub fixed: FixedImage,
}

/// Probes images and assigns them content-hashed public URLs
pub struct ImageProcessor;

impl ImageProcessor {
    /// Build a fixed-width node for the image at `path`
    ///
    /// The height keeps the original aspect ratio.
    pub fn fixed(path: &Path, width: u32) -> Result<ImageNode, ImageError> {
        if !path.is_file() {
            return Err(ImageError::NotFound(path.to_path_buf()));
        }

        let size = match imagesize::size(path) {
            Ok(size) => size,
            Err(imagesize::ImageError::NotSupported) => {
                return Err(ImageError::Unsupported(path.to_path_buf()))
            }
            Err(imagesize::ImageError::CorruptedImage) => {
                return Err(ImageError::Corrupted(path.to_path_buf()))
            }
            Err(imagesize::ImageError::IoError(source)) => {
                return Err(ImageError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        if size.width == 0 || size.height == 0 || width == 0 {
            return Err(ImageError::Empty(path.to_path_buf()));
        }

        let height = scaled_height(size.width as u64, size.height as u64, width);

        let bytes = fs::read(path).map_err(|source| ImageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let hash = hash_bytes(&bytes);

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();

        Ok(ImageNode {
            source: path.to_path_buf(),
            output: Path::new("static").join(&hash).join(&file_name),
            fixed: FixedImage {
                src: format!("/static/{}/{}", hash, encode_segment(&file_name)),
                width,
                height,
            },
        })
    }
}

fn scaled_height(original_width: u64, original_height: u64, width: u32) -> u32 {
    let height = (original_height * width as u64 + original_width / 2) / original_width;
    height.clamp(1, u32::MAX as u64) as u32
}

fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let mut hash = hex::encode(hasher.finalize());
    hash.truncate(HASH_LENGTH);
    hash
}
