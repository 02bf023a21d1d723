use std::collections::BTreeMap;

use serde::Serialize;

/// Flat record handed to the delivery template. Field order is the
/// serialization order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TemplateParams {
    pub report_date: String,
    pub location_department: String,
    pub issue_type: String,
    pub description: String,
    pub urgency: String,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub photo_data: String,
}

impl TemplateParams {
    pub fn to_map(&self) -> BTreeMap<String, String> {
        [
            ("report_date", &self.report_date),
            ("location_department", &self.location_department),
            ("issue_type", &self.issue_type),
            ("description", &self.description),
            ("urgency", &self.urgency),
            ("contact_name", &self.contact_name),
            ("contact_email", &self.contact_email),
            ("contact_phone", &self.contact_phone),
            ("photo_data", &self.photo_data),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_carries_every_template_key() {
        let params = TemplateParams {
            issue_type: "HVAC".to_string(),
            ..TemplateParams::default()
        };
        let map = params.to_map();
        assert_eq!(map.len(), 9);
        assert_eq!(map.get("issue_type").map(String::as_str), Some("HVAC"));
        assert_eq!(map.get("photo_data").map(String::as_str), Some(""));
    }
}
