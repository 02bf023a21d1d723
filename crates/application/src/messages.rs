use facility_report_domain::ReportField;

use crate::DeliveryError;

pub(crate) const PHOTO_COMPRESSED: &str = "Image uploaded and compressed for email delivery";
pub(crate) const PAYLOAD_TOO_LARGE: &str =
    "Data is too large. Please try removing the photo and submit again.";
pub(crate) const SUBMIT_SUCCEEDED: &str =
    "Report submitted successfully! The facilities team has been notified.";

const REQUIRED_FIELDS: &str = "Please fill in all required fields";
const FAILURE_PREFIX: &str = "Failed to submit report. ";
const SIZE_LIMIT_INDICATOR: &str = "size limit";
const TEMPLATE_INDICATOR: &str = "template";

pub fn validation_message(missing: &[ReportField]) -> String {
    if missing.is_empty() {
        return REQUIRED_FIELDS.to_string();
    }
    let labels = missing
        .iter()
        .map(|field| field.label())
        .collect::<Vec<_>>()
        .join(", ");
    format!("{REQUIRED_FIELDS}: {labels}")
}

pub(crate) fn photo_too_large(limit_bytes: usize) -> String {
    format!(
        "Image size should be less than {}MB",
        limit_bytes / 1_000_000
    )
}

pub(crate) fn photo_unreadable(detail: &str) -> String {
    format!("Image could not be processed: {detail}")
}

/// Only the remote response text is searched for hints; a local transport
/// message is shown as-is. Size-limit hints win over template hints.
pub fn delivery_failure_message(error: &DeliveryError) -> String {
    let remote = error.text.as_deref().filter(|text| !text.is_empty());
    let reason = match remote {
        Some(text) if text.contains(SIZE_LIMIT_INDICATOR) => {
            "Data is too large. Try submitting without the photo or use a smaller image."
                .to_string()
        }
        Some(text) if text.contains(TEMPLATE_INDICATOR) => {
            "Email template configuration error. Please check the email template configuration."
                .to_string()
        }
        _ => error
            .detail()
            .map_or_else(|| "Please try again".to_string(), str::to_string),
    };
    format!("{FAILURE_PREFIX}{reason}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected(text: &str) -> DeliveryError {
        DeliveryError {
            status: Some(400),
            text: Some(text.to_string()),
            message: None,
        }
    }

    #[test]
    fn size_limit_rejection_mentions_payload_size() {
        let message = delivery_failure_message(&rejected(
            "Variables size limit. The maximum allowed variables size is 50Kb",
        ));
        assert!(message.starts_with("Failed to submit report. Data is too large."));
    }

    #[test]
    fn size_limit_beats_template_indicator() {
        let message = delivery_failure_message(&rejected("template size limit reached"));
        assert!(message.contains("Data is too large"));
    }

    #[test]
    fn template_rejection_points_at_configuration() {
        let message = delivery_failure_message(&rejected("The template ID is invalid"));
        assert!(message.contains("Email template configuration error"));
    }

    #[test]
    fn other_rejections_are_surfaced_verbatim() {
        let message = delivery_failure_message(&rejected("The Public Key is invalid"));
        assert_eq!(message, "Failed to submit report. The Public Key is invalid");

        let message = delivery_failure_message(&DeliveryError::default());
        assert_eq!(message, "Failed to submit report. Please try again");
    }

    #[test]
    fn transport_message_is_never_classified() {
        let message = delivery_failure_message(&DeliveryError::transport(
            "could not reach template server: size limit of socket buffer",
        ));
        assert_eq!(
            message,
            "Failed to submit report. could not reach template server: size limit of socket buffer"
        );
    }

    #[test]
    fn validation_message_names_missing_fields() {
        assert_eq!(
            validation_message(&[ReportField::Description, ReportField::Urgency]),
            "Please fill in all required fields: Description, Urgency Level"
        );
        assert_eq!(validation_message(&[]), "Please fill in all required fields");
    }

    #[test]
    fn photo_limit_is_reported_in_megabytes() {
        assert_eq!(photo_too_large(5_000_000), "Image size should be less than 5MB");
    }
}
