use thiserror::Error;

use crate::ReportField;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("image is {size} bytes, limit is {limit} bytes")]
    OversizedInput { size: usize, limit: usize },
    #[error("image dimensions must be non-zero, got {width}x{height}")]
    EmptyDimensions { width: u32, height: u32 },
    #[error("unknown urgency level: {0}")]
    UnknownUrgency(String),
    #[error("unknown report field: {0}")]
    UnknownField(String),
    #[error("{value:?} is not a listed {} option", .field.label())]
    UnknownOption { field: ReportField, value: String },
    #[error("unknown form variant: {0}")]
    UnknownVariant(String),
    #[error("invalid form configuration: {0}")]
    InvalidConfig(String),
}
