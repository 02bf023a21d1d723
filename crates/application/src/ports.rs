use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use facility_report_domain::{Bitmap, ImageDimensions};

use crate::ApplicationError;

pub const SUCCESS_STATUS: u16 = 200;

pub trait ImageCodec: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<Bitmap, ApplicationError>;

    fn resize(&self, bitmap: &Bitmap, target: ImageDimensions) -> Result<Bitmap, ApplicationError>;

    /// `quality` is on a 0.0..=1.0 scale.
    fn encode_jpeg(&self, bitmap: &Bitmap, quality: f32) -> Result<Vec<u8>, ApplicationError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryCredentials {
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryRequest {
    pub service_id: String,
    pub template_id: String,
    pub params: BTreeMap<String, String>,
    pub public_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryResponse {
    pub status: u16,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryError {
    pub status: Option<u16>,
    pub text: Option<String>,
    pub message: Option<String>,
}

impl DeliveryError {
    pub fn from_response(response: DeliveryResponse) -> Self {
        Self {
            status: Some(response.status),
            text: Some(response.text),
            message: None,
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            text: None,
            message: Some(message.into()),
        }
    }

    /// Remote text if present, otherwise the local message.
    pub fn detail(&self) -> Option<&str> {
        self.text
            .as_deref()
            .filter(|text| !text.is_empty())
            .or_else(|| self.message.as_deref().filter(|message| !message.is_empty()))
    }
}

impl Display for DeliveryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (self.status, self.detail()) {
            (Some(status), Some(detail)) => write!(f, "status {status}: {detail}"),
            (Some(status), None) => write!(f, "status {status}"),
            (None, Some(detail)) => f.write_str(detail),
            (None, None) => f.write_str("no detail"),
        }
    }
}

impl std::error::Error for DeliveryError {}

#[async_trait]
pub trait DeliveryClient: Send + Sync {
    async fn send(&self, request: DeliveryRequest) -> Result<DeliveryResponse, DeliveryError>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}
