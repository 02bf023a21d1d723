use facility_report_domain::{RawImage, ReportField};

#[derive(Debug, Clone)]
pub struct SetFieldCommand {
    pub field: ReportField,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct AttachPhotoCommand {
    pub image: RawImage,
}

#[derive(Debug, Clone, Default)]
pub struct SubmitReportCommand;
