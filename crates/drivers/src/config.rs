use std::env;

use facility_report_adapters::EMAILJS_DEFAULT_URL;
use facility_report_application::DeliveryCredentials;
use facility_report_domain::FormVariant;

const ENV_PREFIX: &str = "FACILITY_REPORT_";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
    pub emailjs_url: String,
    pub variant: FormVariant,
    pub log_json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service_id: String::new(),
            template_id: String::new(),
            public_key: String::new(),
            emailjs_url: EMAILJS_DEFAULT_URL.to_string(),
            variant: FormVariant::Strict,
            log_json: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Overlays `FACILITY_REPORT_*` values on the defaults. Unset or empty
    /// values keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let get = |key: &str| {
            lookup(&format!("{ENV_PREFIX}{key}")).filter(|value| !value.trim().is_empty())
        };
        let mut config = Self::default();

        if let Some(value) = get("SERVICE_ID") {
            config.service_id = value;
        }
        if let Some(value) = get("TEMPLATE_ID") {
            config.template_id = value;
        }
        if let Some(value) = get("PUBLIC_KEY") {
            config.public_key = value;
        }
        if let Some(value) = get("EMAILJS_URL") {
            config.emailjs_url = value;
        }
        if let Some(value) = get("VARIANT") {
            config.variant = value
                .parse()
                .map_err(|error| format!("{ENV_PREFIX}VARIANT: {error}"))?;
        }
        if let Some(value) = get("LOG_JSON") {
            config.log_json = parse_bool(&value)
                .ok_or_else(|| format!("{ENV_PREFIX}LOG_JSON: expected a boolean, got {value}"))?;
        }
        Ok(config)
    }

    pub fn credentials(&self) -> DeliveryCredentials {
        DeliveryCredentials {
            service_id: self.service_id.clone(),
            template_id: self.template_id.clone(),
            public_key: self.public_key.clone(),
        }
    }

    /// Names of the credential variables that are still unset.
    pub fn missing_credentials(&self) -> Vec<String> {
        [
            ("SERVICE_ID", &self.service_id),
            ("TEMPLATE_ID", &self.template_id),
            ("PUBLIC_KEY", &self.public_key),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(key, _)| format!("{ENV_PREFIX}{key}"))
        .collect()
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
        "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
        _ => None,
    }
}
