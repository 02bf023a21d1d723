use std::collections::BTreeMap;

use async_trait::async_trait;
use facility_report_application::{
    DeliveryClient, DeliveryError, DeliveryRequest, DeliveryResponse, SUCCESS_STATUS,
};
use serde::Serialize;
use tracing::{debug, info};

pub const EMAILJS_DEFAULT_URL: &str = "https://api.emailjs.com";

const SEND_PATH: &str = "/api/v1.0/email/send";

/// Sends template parameters through the EmailJS REST endpoint. Every
/// HTTP answer comes back as a response; only transport failures are
/// errors, so the caller decides what a non-200 status means.
pub struct EmailJsClient {
    base_url: String,
    client: reqwest::Client,
}

impl EmailJsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn send_url(&self) -> String {
        format!("{}{SEND_PATH}", self.base_url)
    }
}

#[derive(Debug, Serialize)]
struct SendBody<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a BTreeMap<String, String>,
}

impl<'a> SendBody<'a> {
    fn from_request(request: &'a DeliveryRequest) -> Self {
        Self {
            service_id: &request.service_id,
            template_id: &request.template_id,
            user_id: &request.public_key,
            template_params: &request.params,
        }
    }
}

#[async_trait]
impl DeliveryClient for EmailJsClient {
    async fn send(&self, request: DeliveryRequest) -> Result<DeliveryResponse, DeliveryError> {
        let url = self.send_url();
        debug!(%url, template_id = %request.template_id, "posting report");

        let response = self
            .client
            .post(&url)
            .json(&SendBody::from_request(&request))
            .send()
            .await
            .map_err(|error| {
                if error.is_connect() {
                    DeliveryError::transport(format!("could not reach {}: {error}", self.base_url))
                } else {
                    DeliveryError::transport(error.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|error| DeliveryError {
                status: Some(status),
                text: None,
                message: Some(error.to_string()),
            })?;
        debug!(status, "emailjs answered");
        Ok(DeliveryResponse { status, text })
    }
}

/// Logs the request instead of sending it and always reports success.
#[derive(Debug, Default)]
pub struct DryRunDelivery;

#[async_trait]
impl DeliveryClient for DryRunDelivery {
    async fn send(&self, request: DeliveryRequest) -> Result<DeliveryResponse, DeliveryError> {
        info!(
            service_id = %request.service_id,
            template_id = %request.template_id,
            fields = request.params.len(),
            "dry run, report not sent"
        );
        for (key, value) in &request.params {
            debug!(key = %key, chars = value.chars().count(), "template param");
        }
        Ok(DeliveryResponse {
            status: SUCCESS_STATUS,
            text: "OK".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> DeliveryRequest {
        let mut params = BTreeMap::new();
        params.insert("location".to_string(), "Lobby".to_string());
        params.insert("photo_data".to_string(), String::new());
        DeliveryRequest {
            service_id: "service_x".to_string(),
            template_id: "template_y".to_string(),
            params,
            public_key: "key_z".to_string(),
        }
    }

    #[test]
    fn body_uses_emailjs_field_names() {
        let request = request();
        let body = serde_json::to_value(SendBody::from_request(&request)).expect("json");

        assert_eq!(body["service_id"], "service_x");
        assert_eq!(body["template_id"], "template_y");
        assert_eq!(body["user_id"], "key_z");
        assert_eq!(body["template_params"]["location"], "Lobby");
        assert_eq!(body["template_params"]["photo_data"], "");
    }

    #[test]
    fn send_url_trims_trailing_slash() {
        let client = EmailJsClient::new("https://api.emailjs.com/");
        assert_eq!(
            client.send_url(),
            "https://api.emailjs.com/api/v1.0/email/send"
        );
    }

    #[tokio::test]
    async fn dry_run_reports_success() {
        let response = DryRunDelivery.send(request()).await.expect("dry run");
        assert_eq!(response.status, SUCCESS_STATUS);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_error() {
        let client = EmailJsClient::new("http://127.0.0.1:9");
        let error = client.send(request()).await.expect_err("no server");
        assert_eq!(error.status, None);
        assert!(error.message.is_some());
    }
}
