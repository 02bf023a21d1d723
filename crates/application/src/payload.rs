use facility_report_domain::{FormConfig, ReportDraft, TemplateParams};

use crate::ApplicationError;

/// en-US locale rendering, e.g. `3/9/2024, 2:05:00 PM`.
pub const REPORT_DATE_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

const NOT_AVAILABLE: &str = "N/A";

pub fn assemble_payload(draft: &ReportDraft, config: &FormConfig) -> TemplateParams {
    TemplateParams {
        report_date: draft.reported_at.format(REPORT_DATE_FORMAT).to_string(),
        location_department: config.resolve(&draft.location, &draft.location_other),
        issue_type: config.resolve(&draft.issue_type, &draft.issue_type_other),
        description: draft.description.clone(),
        urgency: draft
            .urgency
            .map(|level| level.label().to_string())
            .unwrap_or_default(),
        contact_name: or_not_available(&draft.contact_name),
        contact_email: or_not_available(&draft.contact_email),
        contact_phone: or_not_available(&draft.contact_phone),
        photo_data: draft
            .photo
            .as_ref()
            .map(|photo| photo.data_uri().to_string())
            .unwrap_or_default(),
    }
}

/// Size of the JSON-serialized payload in kilobytes.
pub fn payload_size_kb(params: &TemplateParams) -> Result<f64, ApplicationError> {
    let bytes = serde_json::to_vec(params)
        .map_err(|error| ApplicationError::Serialization(error.to_string()))?;
    Ok(bytes.len() as f64 / 1024.0)
}

fn or_not_available(value: &str) -> String {
    if value.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        value.to_string()
    }
}
