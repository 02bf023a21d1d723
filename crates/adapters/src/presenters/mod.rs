use facility_report_domain::{FormConfig, Reduction, SubmissionStatus, UrgencyLevel};

pub fn present_status(status: &SubmissionStatus) -> Option<String> {
    let message = status.message()?;
    let tag = match status {
        SubmissionStatus::Info(_) => "info",
        SubmissionStatus::Error(_) => "error",
        SubmissionStatus::Success(_) => "success",
        SubmissionStatus::None => return None,
    };
    Some(format!("[{tag}] {message}"))
}

pub fn present_reduction(reduction: &Reduction) -> String {
    let mut lines = vec![format!(
        "source {}x{} -> output {}x{}, {:.2} KB",
        reduction.source.width,
        reduction.source.height,
        reduction.output.width,
        reduction.output.height,
        reduction.image.size_kb()
    )];
    for attempt in &reduction.attempts {
        lines.push(format!(
            "  {}\t{}x{}\tq={:.1}\t{:.2} KB",
            attempt.stage.label(),
            attempt.dimensions.width,
            attempt.dimensions.height,
            attempt.quality,
            attempt.size_kb
        ));
    }
    lines.join("\n")
}

pub fn present_options(config: &FormConfig) -> String {
    let mut lines = vec![format!("variant: {}", config.variant)];

    if config.locations.is_empty() {
        lines.push("locations: free text".to_string());
    } else {
        lines.push(format!("locations: {}", config.locations.join(", ")));
    }
    lines.push(format!("issue types: {}", config.issue_types.join(", ")));

    let urgency = UrgencyLevel::ALL
        .iter()
        .map(|level| format!("{} {}", level.badge(), level.label()))
        .collect::<Vec<_>>()
        .join(", ");
    lines.push(format!("urgency: {urgency}"));

    let required = config
        .required_fields
        .iter()
        .map(|field| field.label())
        .collect::<Vec<_>>()
        .join(", ");
    lines.push(format!("required: {required}"));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use facility_report_domain::{
        CompressionAttempt, CompressionStage, EncodedImage, ImageDimensions,
    };

    use super::*;

    #[test]
    fn status_banner_is_tagged_by_kind() {
        assert_eq!(
            present_status(&SubmissionStatus::Error("Nope".to_string())),
            Some("[error] Nope".to_string())
        );
        assert_eq!(present_status(&SubmissionStatus::None), None);
    }

    #[test]
    fn reduction_lists_each_attempt() {
        let dims = ImageDimensions { width: 600, height: 400 };
        let reduction = Reduction {
            image: EncodedImage::from_data_uri("a".repeat(4096)),
            source: ImageDimensions { width: 1200, height: 800 },
            output: dims,
            attempts: vec![CompressionAttempt {
                stage: CompressionStage::Initial,
                dimensions: dims,
                quality: 0.5,
                size_kb: 3.0,
            }],
        };

        let text = present_reduction(&reduction);
        assert!(text.starts_with("source 1200x800 -> output 600x400, 3.00 KB"));
        assert!(text.contains("initial\t600x400\tq=0.5\t3.00 KB"));
    }

    #[test]
    fn strict_options_use_free_text_location() {
        let text = present_options(&FormConfig::strict());
        assert!(text.contains("locations: free text"));
        assert!(text.contains("Emergency"));
    }
}
