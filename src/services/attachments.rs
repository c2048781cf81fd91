//! Turning files and clipboard contents into inline image payloads

use crate::pane::types::ImagePayload;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::ImageFormat;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const MAX_IMAGE_BYTES: usize = 200 * 1024;

#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("image is {size} bytes, the limit is {limit}")]
    TooLarge { size: usize, limit: usize },
    #[error("not a supported image")]
    Unsupported,
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn supported(format: ImageFormat) -> bool {
    matches!(
        format,
        ImageFormat::Png
            | ImageFormat::Jpeg
            | ImageFormat::Gif
            | ImageFormat::WebP
            | ImageFormat::Bmp
    )
}

/// Size and format are checked against the bytes, not the file name
pub fn encode_image_bytes(bytes: &[u8], name: &str) -> Result<ImagePayload, AttachmentError> {
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(AttachmentError::TooLarge {
            size: bytes.len(),
            limit: MAX_IMAGE_BYTES,
        });
    }
    let format = image::guess_format(bytes).map_err(|_| AttachmentError::Unsupported)?;
    if !supported(format) {
        return Err(AttachmentError::Unsupported);
    }
    Ok(ImagePayload {
        name: name.to_string(),
        data_uri: format!("data:{};base64,{}", format.to_mime_type(), STANDARD.encode(bytes)),
    })
}

pub fn load_image_file(path: &Path) -> Result<ImagePayload, AttachmentError> {
    let bytes = std::fs::read(path).map_err(|source| AttachmentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("image");
    encode_image_bytes(&bytes, name)
}

/// Recognizes a pasted file path (quoted, `file://`, or `~/`) pointing at an
/// existing file with an image extension
pub fn parse_image_path(input: &str) -> Option<PathBuf> {
    let mut candidate = input.trim().trim_matches('"').trim_matches('\'').to_string();
    if let Some(stripped) = candidate.strip_prefix("file://") {
        candidate = stripped.to_string();
    }
    if let Some(rest) = candidate.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            candidate = format!("{}/{}", home, rest);
        }
    }
    if candidate.is_empty() || candidate.contains('\n') {
        return None;
    }
    let path = PathBuf::from(candidate);
    (has_image_extension(&path) && path.is_file()).then_some(path)
}

fn has_image_extension(path: &Path) -> bool {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();
    matches!(
        extension.as_str(),
        "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp"
    )
}
