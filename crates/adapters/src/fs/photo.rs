use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use facility_report_application::ApplicationError;
use facility_report_domain::{detect_mime_type, EncodedImage, RawImage};

/// Reads a photo from disk. The size ceiling is checked against file
/// metadata so oversized files are never read into memory.
pub fn load_photo(path: &Path, max_bytes: usize) -> Result<RawImage, ApplicationError> {
    let mime_type = detect_mime_type(path).ok_or_else(|| {
        ApplicationError::InvalidInput(format!("not a supported photo: {}", path.display()))
    })?;

    let metadata = fs::metadata(path).map_err(|error| ApplicationError::Io(error.to_string()))?;
    if !metadata.is_file() {
        return Err(ApplicationError::InvalidInput(format!(
            "not a file: {}",
            path.display()
        )));
    }
    let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
    if size > max_bytes {
        return Err(ApplicationError::OversizedInput {
            size,
            limit: max_bytes,
        });
    }

    let bytes = fs::read(path).map_err(|error| ApplicationError::Io(error.to_string()))?;
    Ok(RawImage::new(bytes, mime_type))
}

/// Writes the JPEG carried by a data URI to `path`.
pub fn write_jpeg(image: &EncodedImage, path: &Path) -> Result<(), ApplicationError> {
    let (_, payload) = image.data_uri().split_once(";base64,").ok_or_else(|| {
        ApplicationError::InvalidInput("photo is not a base64 data URI".to_string())
    })?;
    let bytes = STANDARD
        .decode(payload)
        .map_err(|error| ApplicationError::Decode(error.to_string()))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|error| ApplicationError::Io(error.to_string()))?;
    }
    fs::write(path, bytes).map_err(|error| ApplicationError::Io(error.to_string()))
}
