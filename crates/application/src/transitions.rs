//! Pure transitions over [`FormState`]. Each one takes the current state by
//! reference and returns the next value; none of them perform I/O.
//!
//! Two epochs make delayed transitions safe to apply late: `status_epoch`
//! changes with every banner change, `submission_epoch` with every submit
//! attempt. A timer carries the epoch it was scheduled under and does
//! nothing if the state has moved on.

use chrono::NaiveDateTime;
use facility_report_domain::{
    DomainError, EncodedImage, ReportDraft, ReportField, SubmissionPhase, SubmissionStatus,
};

use crate::messages::{self, PAYLOAD_TOO_LARGE, PHOTO_COMPRESSED, SUBMIT_SUCCEEDED};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct UploadTicket(u64);

impl UploadTicket {
    pub fn sequence(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub draft: ReportDraft,
    pub status: SubmissionStatus,
    pub phase: SubmissionPhase,
    pub in_flight: bool,
    pub dialog_open: bool,
    pub latest_upload: u64,
    pub status_epoch: u64,
    pub submission_epoch: u64,
}

impl FormState {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            draft: ReportDraft::new(now),
            status: SubmissionStatus::None,
            phase: SubmissionPhase::Idle,
            in_flight: false,
            dialog_open: false,
            latest_upload: 0,
            status_epoch: 0,
            submission_epoch: 0,
        }
    }

    pub fn is_latest(&self, ticket: UploadTicket) -> bool {
        ticket.0 == self.latest_upload
    }

    fn with_status(&self, status: SubmissionStatus) -> Self {
        Self {
            status,
            status_epoch: self.status_epoch + 1,
            ..self.clone()
        }
    }
}

pub fn set_field(
    state: &FormState,
    field: ReportField,
    value: &str,
) -> Result<FormState, DomainError> {
    let mut next = state.clone();
    next.draft.set(field, value)?;
    Ok(next)
}

pub fn issue_upload(state: &FormState) -> (FormState, UploadTicket) {
    let sequence = state.latest_upload + 1;
    let next = FormState {
        latest_upload: sequence,
        ..state.clone()
    };
    (next, UploadTicket(sequence))
}

/// Attaches a compressed photo if `ticket` is still the latest upload.
/// Returns `None` for a superseded upload.
pub fn photo_attached(
    state: &FormState,
    ticket: UploadTicket,
    photo: EncodedImage,
) -> Option<FormState> {
    if !state.is_latest(ticket) {
        return None;
    }
    let mut next = state.with_status(SubmissionStatus::Info(PHOTO_COMPRESSED.to_string()));
    next.draft.photo = Some(photo);
    Some(next)
}

pub fn upload_rejected(state: &FormState, message: String) -> FormState {
    state.with_status(SubmissionStatus::Error(message))
}

pub fn remove_photo(state: &FormState) -> FormState {
    let mut next = state.clone();
    next.draft.photo = None;
    next
}

/// Clears an info banner, unless the banner changed since `status_epoch`.
pub fn clear_info(state: &FormState, status_epoch: u64) -> FormState {
    let still_same = state.status_epoch == status_epoch
        && matches!(state.status, SubmissionStatus::Info(_));
    if still_same {
        state.with_status(SubmissionStatus::None)
    } else {
        state.clone()
    }
}

pub fn begin_validation(state: &FormState) -> FormState {
    FormState {
        phase: SubmissionPhase::Validating,
        submission_epoch: state.submission_epoch + 1,
        ..state.clone()
    }
}

pub fn validation_failed(state: &FormState, missing: &[ReportField]) -> FormState {
    let mut next = state.with_status(SubmissionStatus::Error(messages::validation_message(
        missing,
    )));
    next.phase = SubmissionPhase::Error;
    next
}

pub fn budget_exceeded(state: &FormState) -> FormState {
    let mut next = state.with_status(SubmissionStatus::Error(PAYLOAD_TOO_LARGE.to_string()));
    next.phase = SubmissionPhase::Error;
    next.in_flight = false;
    next
}

pub fn begin_sending(state: &FormState) -> FormState {
    let mut next = state.with_status(SubmissionStatus::None);
    next.phase = SubmissionPhase::Sending;
    next.in_flight = true;
    next
}

pub fn delivered(state: &FormState) -> FormState {
    let mut next = state.with_status(SubmissionStatus::Success(SUBMIT_SUCCEEDED.to_string()));
    next.phase = SubmissionPhase::Success;
    next.in_flight = false;
    next.dialog_open = true;
    next
}

pub fn delivery_failed(state: &FormState, message: String) -> FormState {
    let mut next = state.with_status(SubmissionStatus::Error(message));
    next.phase = SubmissionPhase::Error;
    next.in_flight = false;
    next
}

/// Post-success draft reset. Ignored once another submit has started.
/// Uploads still compressing belong to the old draft and are discarded.
pub fn clear_draft(state: &FormState, now: NaiveDateTime, submission_epoch: u64) -> FormState {
    if state.submission_epoch != submission_epoch || state.phase != SubmissionPhase::Success {
        return state.clone();
    }
    FormState {
        draft: ReportDraft::new(now),
        latest_upload: state.latest_upload + 1,
        ..state.clone()
    }
}

/// Returns a settled submission to `Idle`. The success path also clears the
/// banner and the draft; the error path keeps both so the user can fix and
/// resubmit.
pub fn auto_reset(state: &FormState, now: NaiveDateTime, submission_epoch: u64) -> FormState {
    if state.submission_epoch != submission_epoch || !state.phase.is_terminal() {
        return state.clone();
    }
    match state.phase {
        SubmissionPhase::Success => {
            let mut next = state.with_status(SubmissionStatus::None);
            next.draft = ReportDraft::new(now);
            next.latest_upload += 1;
            next.phase = SubmissionPhase::Idle;
            next
        }
        _ => FormState {
            phase: SubmissionPhase::Idle,
            ..state.clone()
        },
    }
}

pub fn dismiss_status(state: &FormState) -> FormState {
    state.with_status(SubmissionStatus::None)
}

pub fn close_dialog(state: &FormState) -> FormState {
    FormState {
        dialog_open: false,
        ..state.clone()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use facility_report_domain::StatusKind;

    use super::*;

    fn stamp(minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .and_then(|date| date.and_hms_opt(9, minute, 0))
            .expect("valid timestamp")
    }

    fn photo() -> EncodedImage {
        EncodedImage::from_data_uri("data:image/jpeg;base64,AAAA".to_string())
    }

    #[test]
    fn superseded_upload_is_discarded() {
        let state = FormState::new(stamp(0));
        let (state, first) = issue_upload(&state);
        let (state, second) = issue_upload(&state);
        assert!(first < second);

        let attached = photo_attached(&state, second, photo()).expect("latest upload");
        assert!(attached.draft.photo.is_some());
        assert!(photo_attached(&attached, first, photo()).is_none());
    }

    #[test]
    fn info_clear_respects_stale_guard() {
        let state = FormState::new(stamp(0));
        let (state, ticket) = issue_upload(&state);
        let attached = photo_attached(&state, ticket, photo()).expect("attach");
        let epoch = attached.status_epoch;

        let cleared = clear_info(&attached, epoch);
        assert_eq!(cleared.status, SubmissionStatus::None);

        let replaced = upload_rejected(&attached, "too big".to_string());
        let untouched = clear_info(&replaced, epoch);
        assert_eq!(untouched.status.kind(), StatusKind::Error);
    }

    #[test]
    fn success_path_resets_draft_and_returns_to_idle() {
        let mut state = FormState::new(stamp(0));
        state.draft.description = "Broken chair".to_string();
        let state = begin_sending(&begin_validation(&state));
        assert!(state.in_flight);

        let state = delivered(&state);
        assert_eq!(state.phase, SubmissionPhase::Success);
        assert!(state.dialog_open);
        assert!(!state.in_flight);

        let epoch = state.submission_epoch;
        let cleared = clear_draft(&state, stamp(7), epoch);
        assert_eq!(cleared.draft, ReportDraft::new(stamp(7)));
        assert_eq!(cleared.status.kind(), StatusKind::Success);

        let idle = auto_reset(&cleared, stamp(8), epoch);
        assert_eq!(idle.phase, SubmissionPhase::Idle);
        assert_eq!(idle.status, SubmissionStatus::None);
        assert_eq!(idle.draft.reported_at, stamp(8));
    }

    #[test]
    fn success_resets_discard_uploads_started_for_the_old_draft() {
        let state = delivered(&begin_sending(&begin_validation(&FormState::new(stamp(0)))));
        let epoch = state.submission_epoch;

        let (state, before_clear) = issue_upload(&state);
        let cleared = clear_draft(&state, stamp(1), epoch);
        assert!(photo_attached(&cleared, before_clear, photo()).is_none());

        let (cleared, before_reset) = issue_upload(&cleared);
        let idle = auto_reset(&cleared, stamp(2), epoch);
        assert!(photo_attached(&idle, before_reset, photo()).is_none());

        let (idle, fresh) = issue_upload(&idle);
        assert!(photo_attached(&idle, fresh, photo()).is_some());
    }

    #[test]
    fn error_path_keeps_draft_and_banner() {
        let mut state = FormState::new(stamp(0));
        state.draft.description = "Flickering light".to_string();
        let failed = delivery_failed(
            &begin_sending(&begin_validation(&state)),
            "Failed to submit report. Please try again".to_string(),
        );
        let idle = auto_reset(&failed, stamp(5), failed.submission_epoch);

        assert_eq!(idle.phase, SubmissionPhase::Idle);
        assert_eq!(idle.draft.description, "Flickering light");
        assert_eq!(idle.status.kind(), StatusKind::Error);
    }

    #[test]
    fn stale_reset_is_ignored_after_new_submit() {
        let state = FormState::new(stamp(0));
        let failed = validation_failed(&begin_validation(&state), &[ReportField::Location]);
        let old_epoch = failed.submission_epoch;

        let resubmitted = begin_validation(&failed);
        let after = auto_reset(&resubmitted, stamp(1), old_epoch);
        assert_eq!(after.phase, SubmissionPhase::Validating);
    }

    #[test]
    fn budget_failure_never_reaches_sending() {
        let state = begin_validation(&FormState::new(stamp(0)));
        let failed = budget_exceeded(&state);
        assert_eq!(failed.phase, SubmissionPhase::Error);
        assert!(!failed.in_flight);
        assert_eq!(
            failed.status.message(),
            Some("Data is too large. Please try removing the photo and submit again.")
        );
    }

    #[test]
    fn dismiss_and_close_are_independent() {
        let state = delivered(&begin_sending(&FormState::new(stamp(0))));
        let dismissed = dismiss_status(&state);
        assert_eq!(dismissed.status, SubmissionStatus::None);
        assert!(dismissed.dialog_open);
        assert!(!close_dialog(&dismissed).dialog_open);
    }
}
