use std::path::Path;

use crate::DomainError;

/// Raw upload ceiling, checked before any decoding work.
pub const MAX_INPUT_BYTES: usize = 5_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    bytes: Vec<u8>,
    mime_type: String,
}

impl RawImage {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn byte_size(&self) -> usize {
        self.bytes.len()
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    pub fn ensure_within(&self, limit: usize) -> Result<(), DomainError> {
        if self.byte_size() > limit {
            return Err(DomainError::OversizedInput {
                size: self.byte_size(),
                limit,
            });
        }
        Ok(())
    }
}

pub fn detect_mime_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension().and_then(|ext| ext.to_str())?;

    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        _ => None,
    }
}

/// Approximate decoded byte size of a base64 text, in kilobytes.
pub fn encoded_size_kb(encoded_len: usize) -> f64 {
    encoded_len as f64 * 3.0 / 4.0 / 1024.0
}

/// A data URI together with its size estimate. The size is always derived
/// from the string it is stored with.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedImage {
    data_uri: String,
    size_kb: f64,
}

impl EncodedImage {
    pub fn from_data_uri(data_uri: String) -> Self {
        let size_kb = encoded_size_kb(data_uri.len());
        Self { data_uri, size_kb }
    }

    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }

    pub fn encoded_len(&self) -> usize {
        self.data_uri.len()
    }

    pub fn size_kb(&self) -> f64 {
        self.size_kb
    }

    pub fn exceeds(&self, ceiling_kb: f64) -> bool {
        self.size_kb > ceiling_kb
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Result<Self, DomainError> {
        if width == 0 || height == 0 {
            return Err(DomainError::EmptyDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    /// Shrinks the dominant axis to `max_side`, keeping the aspect ratio.
    /// Images already inside the bound keep their native size.
    pub fn fit_within(self, max_side: u32) -> Self {
        let width = f64::from(self.width);
        let height = f64::from(self.height);
        let max = f64::from(max_side);

        if self.width > self.height && self.width > max_side {
            Self::truncated(max, height * max / width)
        } else if self.height > max_side {
            Self::truncated(width * max / height, max)
        } else {
            self
        }
    }

    pub fn scale(self, factor: f64) -> Self {
        Self::truncated(f64::from(self.width) * factor, f64::from(self.height) * factor)
    }

    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    // Canvas sizes drop the fractional part.
    fn truncated(width: f64, height: f64) -> Self {
        Self {
            width: (width as u32).max(1),
            height: (height as u32).max(1),
        }
    }
}

/// Decoded RGB8 pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub dimensions: ImageDimensions,
    pub rgb: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionStage {
    Initial,
    Requality,
    Downscale,
}

impl CompressionStage {
    pub const LADDER: [CompressionStage; 3] = [
        CompressionStage::Initial,
        CompressionStage::Requality,
        CompressionStage::Downscale,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Requality => "requality",
            Self::Downscale => "downscale",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReductionPolicy {
    pub max_input_bytes: usize,
    pub max_dimension: u32,
    pub ceiling_kb: f64,
    pub initial_quality: f32,
    pub fallback_quality: f32,
    pub downscale_factor: f64,
}

impl Default for ReductionPolicy {
    fn default() -> Self {
        Self {
            max_input_bytes: MAX_INPUT_BYTES,
            max_dimension: 600,
            ceiling_kb: 35.0,
            initial_quality: 0.5,
            fallback_quality: 0.3,
            downscale_factor: 0.7,
        }
    }
}

impl ReductionPolicy {
    pub fn quality_for(&self, stage: CompressionStage) -> f32 {
        match stage {
            CompressionStage::Initial => self.initial_quality,
            CompressionStage::Requality | CompressionStage::Downscale => self.fallback_quality,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.max_dimension == 0 {
            return Err(DomainError::InvalidConfig(
                "max dimension must be positive".to_string(),
            ));
        }
        if !(self.ceiling_kb.is_finite() && self.ceiling_kb > 0.0) {
            return Err(DomainError::InvalidConfig(
                "image ceiling must be a positive number of kilobytes".to_string(),
            ));
        }
        for (name, quality) in [
            ("initial quality", self.initial_quality),
            ("fallback quality", self.fallback_quality),
        ] {
            if !(quality > 0.0 && quality <= 1.0) {
                return Err(DomainError::InvalidConfig(format!(
                    "{name} must be in (0, 1], got {quality}"
                )));
            }
        }
        if !(self.downscale_factor > 0.0 && self.downscale_factor < 1.0) {
            return Err(DomainError::InvalidConfig(format!(
                "downscale factor must be in (0, 1), got {}",
                self.downscale_factor
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompressionAttempt {
    pub stage: CompressionStage,
    pub dimensions: ImageDimensions,
    pub quality: f32,
    pub size_kb: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reduction {
    pub image: EncodedImage,
    pub source: ImageDimensions,
    pub output: ImageDimensions,
    pub attempts: Vec<CompressionAttempt>,
}

impl Reduction {
    pub fn final_stage(&self) -> Option<CompressionStage> {
        self.attempts.last().map(|attempt| attempt.stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_is_derived_from_data_uri_length() {
        let image = EncodedImage::from_data_uri("a".repeat(4096));
        assert_eq!(image.encoded_len(), 4096);
        assert_eq!(image.size_kb(), 3.0);
        assert_eq!(image.size_kb(), encoded_size_kb(image.data_uri().len()));
        assert!(!image.exceeds(3.0));
        assert!(image.exceeds(2.9));
    }

    #[test]
    fn oversized_input_is_rejected() {
        let raw = RawImage::new(vec![0_u8; 11], "image/jpeg");
        assert!(raw.ensure_within(11).is_ok());
        assert_eq!(
            raw.ensure_within(10),
            Err(DomainError::OversizedInput {
                size: 11,
                limit: 10
            })
        );
    }

    #[test]
    fn only_image_mime_types_count_as_images() {
        assert!(RawImage::new(Vec::new(), "image/png").is_image());
        assert!(!RawImage::new(Vec::new(), "application/pdf").is_image());
    }

    #[test]
    fn landscape_images_fit_on_width() {
        let dims = ImageDimensions::new(1200, 900).expect("dims").fit_within(600);
        assert_eq!(dims, ImageDimensions { width: 600, height: 450 });
    }

    #[test]
    fn portrait_and_square_images_fit_on_height() {
        let portrait = ImageDimensions::new(1000, 3000).expect("dims").fit_within(600);
        assert_eq!(portrait, ImageDimensions { width: 200, height: 600 });

        let square = ImageDimensions::new(800, 800).expect("dims").fit_within(600);
        assert_eq!(square, ImageDimensions { width: 600, height: 600 });
    }

    #[test]
    fn small_images_keep_native_size() {
        let dims = ImageDimensions::new(320, 240).expect("dims");
        assert_eq!(dims.fit_within(600), dims);
    }

    #[test]
    fn fractional_sizes_truncate() {
        let dims = ImageDimensions::new(1001, 700).expect("dims").fit_within(600);
        assert_eq!(dims, ImageDimensions { width: 600, height: 419 });

        let scaled = ImageDimensions::new(600, 450).expect("dims").scale(0.7);
        assert_eq!(scaled, ImageDimensions { width: 420, height: 315 });

        let tiny = ImageDimensions::new(1, 1).expect("dims").scale(0.7);
        assert_eq!(tiny, ImageDimensions { width: 1, height: 1 });
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(matches!(
            ImageDimensions::new(0, 10),
            Err(DomainError::EmptyDimensions { .. })
        ));
    }

    #[test]
    fn mime_type_detection_works() {
        assert_eq!(detect_mime_type(Path::new("a.JPG")), Some("image/jpeg"));
        assert_eq!(detect_mime_type(Path::new("a.png")), Some("image/png"));
        assert_eq!(detect_mime_type(Path::new("a.nef")), None);
        assert_eq!(detect_mime_type(Path::new("noext")), None);
    }

    #[test]
    fn default_policy_matches_ladder_constants() {
        let policy = ReductionPolicy::default();
        assert!(policy.validate().is_ok());
        assert_eq!(policy.quality_for(CompressionStage::Initial), 0.5);
        assert_eq!(policy.quality_for(CompressionStage::Requality), 0.3);
        assert_eq!(policy.quality_for(CompressionStage::Downscale), 0.3);
    }

    #[test]
    fn policy_rejects_out_of_range_quality() {
        let policy = ReductionPolicy {
            fallback_quality: 1.5,
            ..ReductionPolicy::default()
        };
        assert!(matches!(
            policy.validate(),
            Err(DomainError::InvalidConfig(_))
        ));
    }
}
