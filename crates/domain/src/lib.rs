mod config;
mod error;
mod image;
mod payload;
mod report;
mod status;

pub use config::{FormConfig, FormVariant};
pub use error::DomainError;
pub use image::{
    detect_mime_type, encoded_size_kb, Bitmap, CompressionAttempt, CompressionStage,
    EncodedImage, ImageDimensions, RawImage, Reduction, ReductionPolicy, MAX_INPUT_BYTES,
};
pub use payload::TemplateParams;
pub use report::{ReportDraft, ReportField, UrgencyLevel};
pub use status::{StatusKind, SubmissionPhase, SubmissionStatus};
