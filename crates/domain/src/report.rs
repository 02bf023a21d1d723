use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{NaiveDateTime, Timelike};

use crate::{DomainError, EncodedImage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReportField {
    Location,
    LocationOther,
    IssueType,
    IssueTypeOther,
    Description,
    Urgency,
    ContactName,
    ContactEmail,
    ContactPhone,
}

impl ReportField {
    pub const ALL: [ReportField; 9] = [
        ReportField::Location,
        ReportField::LocationOther,
        ReportField::IssueType,
        ReportField::IssueTypeOther,
        ReportField::Description,
        ReportField::Urgency,
        ReportField::ContactName,
        ReportField::ContactEmail,
        ReportField::ContactPhone,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Location => "Location / Department",
            Self::LocationOther => "Other Location",
            Self::IssueType => "Issue Type",
            Self::IssueTypeOther => "Other Issue Type",
            Self::Description => "Description",
            Self::Urgency => "Urgency Level",
            Self::ContactName => "Contact Name",
            Self::ContactEmail => "Contact Email",
            Self::ContactPhone => "Contact Phone",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Location => "location",
            Self::LocationOther => "location-other",
            Self::IssueType => "issue-type",
            Self::IssueTypeOther => "issue-type-other",
            Self::Description => "description",
            Self::Urgency => "urgency",
            Self::ContactName => "contact-name",
            Self::ContactEmail => "contact-email",
            Self::ContactPhone => "contact-phone",
        }
    }
}

impl FromStr for ReportField {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.key() == value)
            .ok_or_else(|| DomainError::UnknownField(value.to_string()))
    }
}

impl Display for ReportField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UrgencyLevel {
    Low,
    Medium,
    High,
    Emergency,
}

impl UrgencyLevel {
    pub const ALL: [UrgencyLevel; 4] = [
        UrgencyLevel::Low,
        UrgencyLevel::Medium,
        UrgencyLevel::High,
        UrgencyLevel::Emergency,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Emergency => "Emergency",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Low => "#4caf50",
            Self::Medium => "#ff9800",
            Self::High => "#f44336",
            Self::Emergency => "#d32f2f",
        }
    }

    pub fn badge(self) -> &'static str {
        match self {
            Self::Low => "●",
            Self::Medium => "●●",
            Self::High => "●●●",
            Self::Emergency => "🚨",
        }
    }
}

impl FromStr for UrgencyLevel {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.label().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| DomainError::UnknownUrgency(value.to_string()))
    }
}

impl Display for UrgencyLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Mutable form state, edited one field at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDraft {
    pub reported_at: NaiveDateTime,
    pub location: String,
    pub location_other: String,
    pub issue_type: String,
    pub issue_type_other: String,
    pub description: String,
    pub urgency: Option<UrgencyLevel>,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub photo: Option<EncodedImage>,
}

impl ReportDraft {
    /// Fresh draft stamped with `now`, at minute precision.
    pub fn new(now: NaiveDateTime) -> Self {
        let reported_at = now
            .with_second(0)
            .and_then(|stamp| stamp.with_nanosecond(0))
            .unwrap_or(now);
        Self {
            reported_at,
            location: String::new(),
            location_other: String::new(),
            issue_type: String::new(),
            issue_type_other: String::new(),
            description: String::new(),
            urgency: None,
            contact_name: String::new(),
            contact_email: String::new(),
            contact_phone: String::new(),
            photo: None,
        }
    }

    pub fn set(&mut self, field: ReportField, value: &str) -> Result<(), DomainError> {
        if field == ReportField::Urgency {
            self.urgency = if value.is_empty() {
                None
            } else {
                Some(value.parse()?)
            };
            return Ok(());
        }
        if let Some(slot) = self.text_mut(field) {
            *slot = value.to_string();
        }
        Ok(())
    }

    pub fn is_filled(&self, field: ReportField) -> bool {
        match field {
            ReportField::Urgency => self.urgency.is_some(),
            other => self.text(other).is_some_and(|value| !value.is_empty()),
        }
    }

    pub fn missing_fields(&self, required: &[ReportField]) -> Vec<ReportField> {
        required
            .iter()
            .copied()
            .filter(|field| !self.is_filled(*field))
            .collect()
    }

    pub fn text(&self, field: ReportField) -> Option<&str> {
        let value = match field {
            ReportField::Location => &self.location,
            ReportField::LocationOther => &self.location_other,
            ReportField::IssueType => &self.issue_type,
            ReportField::IssueTypeOther => &self.issue_type_other,
            ReportField::Description => &self.description,
            ReportField::ContactName => &self.contact_name,
            ReportField::ContactEmail => &self.contact_email,
            ReportField::ContactPhone => &self.contact_phone,
            ReportField::Urgency => return None,
        };
        Some(value.as_str())
    }

    fn text_mut(&mut self, field: ReportField) -> Option<&mut String> {
        let value = match field {
            ReportField::Location => &mut self.location,
            ReportField::LocationOther => &mut self.location_other,
            ReportField::IssueType => &mut self.issue_type,
            ReportField::IssueTypeOther => &mut self.issue_type_other,
            ReportField::Description => &mut self.description,
            ReportField::ContactName => &mut self.contact_name,
            ReportField::ContactEmail => &mut self.contact_email,
            ReportField::ContactPhone => &mut self.contact_phone,
            ReportField::Urgency => return None,
        };
        Some(value)
    }
}
