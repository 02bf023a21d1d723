use facility_report_domain::{DomainError, ReportField};
use thiserror::Error;

use crate::DeliveryError;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(DomainError),
    #[error("missing required fields: {}", join_labels(.0))]
    Validation(Vec<ReportField>),
    #[error("image is {size} bytes, limit is {limit} bytes")]
    OversizedInput { size: usize, limit: usize },
    #[error("payload is {size_kb:.2} KB, limit is {limit_kb} KB")]
    PayloadBudgetExceeded { size_kb: f64, limit_kb: f64 },
    #[error("delivery failed: {0}")]
    Delivery(DeliveryError),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("encode error: {0}")]
    Encode(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("form state lock poisoned")]
    StatePoisoned,
    #[error("background task failed: {0}")]
    Task(String),
}

impl From<DomainError> for ApplicationError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::OversizedInput { size, limit } => Self::OversizedInput { size, limit },
            other => Self::Domain(other),
        }
    }
}

fn join_labels(fields: &[ReportField]) -> String {
    fields
        .iter()
        .map(|field| field.label())
        .collect::<Vec<_>>()
        .join(", ")
}
