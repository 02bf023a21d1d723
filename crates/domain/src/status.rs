#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    None,
    Info,
    Error,
    Success,
}

/// Banner shown above the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionStatus {
    #[default]
    None,
    Info(String),
    Error(String),
    Success(String),
}

impl SubmissionStatus {
    pub fn kind(&self) -> StatusKind {
        match self {
            Self::None => StatusKind::None,
            Self::Info(_) => StatusKind::Info,
            Self::Error(_) => StatusKind::Error,
            Self::Success(_) => StatusKind::Success,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Info(message) | Self::Error(message) | Self::Success(message) => {
                Some(message)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Validating,
    Sending,
    Success,
    Error,
}

impl SubmissionPhase {
    pub fn accepts_submit(self) -> bool {
        matches!(self, Self::Idle | Self::Success | Self::Error)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_exposes_kind_and_message() {
        let status = SubmissionStatus::Info("compressed".to_string());
        assert_eq!(status.kind(), StatusKind::Info);
        assert_eq!(status.message(), Some("compressed"));
        assert_eq!(SubmissionStatus::default().message(), None);
    }

    #[test]
    fn only_settled_phases_accept_submit() {
        assert!(SubmissionPhase::Idle.accepts_submit());
        assert!(SubmissionPhase::Error.accepts_submit());
        assert!(!SubmissionPhase::Validating.accepts_submit());
        assert!(!SubmissionPhase::Sending.accepts_submit());
    }
}
