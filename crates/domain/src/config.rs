use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

use crate::{DomainError, ReductionPolicy, ReportField};

const ISSUE_TYPES: [&str; 10] = [
    "Plumbing",
    "Electrical",
    "HVAC",
    "Furniture",
    "Safety",
    "Cleaning",
    "Security",
    "IT Equipment",
    "Structural",
    "Other",
];

const DEPARTMENTS: [&str; 9] = [
    "Main Office",
    "Reception",
    "Warehouse",
    "Production Floor",
    "Laboratory",
    "Cafeteria",
    "Restrooms",
    "Parking Lot",
    "Others",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormVariant {
    /// Contact name and email are mandatory; location is free text.
    Strict,
    /// Contact details are optional; location comes from a department list.
    Relaxed,
}

impl FromStr for FormVariant {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "relaxed" => Ok(Self::Relaxed),
            _ => Err(DomainError::UnknownVariant(value.to_string())),
        }
    }
}

impl Display for FormVariant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strict => f.write_str("strict"),
            Self::Relaxed => f.write_str("relaxed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormConfig {
    pub variant: FormVariant,
    pub required_fields: Vec<ReportField>,
    /// Empty means the location is typed freely.
    pub locations: Vec<String>,
    pub issue_types: Vec<String>,
    pub other_sentinels: Vec<String>,
    pub reduction: ReductionPolicy,
    pub payload_ceiling_kb: f64,
    pub info_clear_delay: Duration,
    pub success_clear_delay: Duration,
    pub auto_reset_delay: Duration,
}

impl FormConfig {
    pub fn strict() -> Self {
        Self {
            variant: FormVariant::Strict,
            required_fields: vec![
                ReportField::Location,
                ReportField::IssueType,
                ReportField::Description,
                ReportField::Urgency,
                ReportField::ContactName,
                ReportField::ContactEmail,
            ],
            locations: Vec::new(),
            issue_types: ISSUE_TYPES.iter().map(|value| value.to_string()).collect(),
            other_sentinels: vec!["Other".to_string(), "Others".to_string()],
            reduction: ReductionPolicy::default(),
            payload_ceiling_kb: 48.0,
            info_clear_delay: Duration::from_millis(2000),
            success_clear_delay: Duration::from_millis(500),
            auto_reset_delay: Duration::from_millis(3000),
        }
    }

    pub fn relaxed() -> Self {
        Self {
            variant: FormVariant::Relaxed,
            required_fields: vec![
                ReportField::Location,
                ReportField::IssueType,
                ReportField::Description,
                ReportField::Urgency,
            ],
            locations: DEPARTMENTS.iter().map(|value| value.to_string()).collect(),
            ..Self::strict()
        }
    }

    pub fn for_variant(variant: FormVariant) -> Self {
        match variant {
            FormVariant::Strict => Self::strict(),
            FormVariant::Relaxed => Self::relaxed(),
        }
    }

    pub fn is_other(&self, selected: &str) -> bool {
        self.other_sentinels
            .iter()
            .any(|sentinel| sentinel == selected)
    }

    /// Effective value of a selector with an adjacent free-text escape.
    pub fn resolve(&self, selected: &str, other: &str) -> String {
        if self.is_other(selected) {
            other.to_string()
        } else {
            selected.to_string()
        }
    }

    /// Listed selectors only take values from their list. Empty clears the
    /// selector, and an empty list means the field is typed freely.
    pub fn is_allowed(&self, field: ReportField, value: &str) -> bool {
        let options = match field {
            ReportField::Location => &self.locations,
            ReportField::IssueType => &self.issue_types,
            _ => return true,
        };
        value.is_empty() || options.is_empty() || options.iter().any(|option| option == value)
    }

    pub fn check_option(&self, field: ReportField, value: &str) -> Result<(), DomainError> {
        if self.is_allowed(field, value) {
            Ok(())
        } else {
            Err(DomainError::UnknownOption {
                field,
                value: value.to_string(),
            })
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        self.reduction.validate()?;
        if !(self.payload_ceiling_kb.is_finite() && self.payload_ceiling_kb > 0.0) {
            return Err(DomainError::InvalidConfig(
                "payload ceiling must be a positive number of kilobytes".to_string(),
            ));
        }
        if self.issue_types.is_empty() {
            return Err(DomainError::InvalidConfig(
                "at least one issue type is required".to_string(),
            ));
        }
        if let Some(field) = self
            .required_fields
            .iter()
            .find(|field| matches!(field, ReportField::LocationOther | ReportField::IssueTypeOther))
        {
            return Err(DomainError::InvalidConfig(format!(
                "{} is an escape field and cannot be required",
                field.label()
            )));
        }
        Ok(())
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self::strict()
    }
}
