use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::NaiveDateTime;
use facility_report_domain::{FormConfig, Reduction};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::messages::{self, delivery_failure_message};
use crate::transitions::{self, FormState, UploadTicket};
use crate::{
    assemble_payload, payload_size_kb, ApplicationError, AttachPhotoCommand, Clock,
    DeliveryClient, DeliveryCredentials, DeliveryError, DeliveryRequest, ImageCodec,
    ImageReducer, SetFieldCommand, SubmitReportCommand, SUCCESS_STATUS,
};

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitReceipt {
    pub status: u16,
    pub payload_kb: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PhotoOutcome {
    Attached(Reduction),
    /// A newer upload was started before this one finished.
    Superseded { ticket: UploadTicket },
}

/// One open report form: the state container, its collaborators, and the
/// timers that clear banners and reset the form. Timers die with the
/// session.
pub struct FormSession {
    config: FormConfig,
    credentials: DeliveryCredentials,
    reducer: Arc<ImageReducer>,
    delivery: Arc<dyn DeliveryClient>,
    clock: Arc<dyn Clock>,
    state: Arc<Mutex<FormState>>,
    timers: Mutex<Vec<JoinHandle<()>>>,
}

impl FormSession {
    pub fn new(
        config: FormConfig,
        credentials: DeliveryCredentials,
        codec: Arc<dyn ImageCodec>,
        delivery: Arc<dyn DeliveryClient>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ApplicationError> {
        config.validate()?;
        let reducer = Arc::new(ImageReducer::new(codec, config.reduction));
        let state = FormState::new(clock.now());
        Ok(Self {
            config,
            credentials,
            reducer,
            delivery,
            clock,
            state: Arc::new(Mutex::new(state)),
            timers: Mutex::new(Vec::new()),
        })
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn snapshot(&self) -> Result<FormState, ApplicationError> {
        Ok(self.lock_state()?.clone())
    }

    pub fn set_field(&self, command: SetFieldCommand) -> Result<(), ApplicationError> {
        self.config.check_option(command.field, &command.value)?;
        let mut state = self.lock_state()?;
        *state = transitions::set_field(&state, command.field, &command.value)?;
        Ok(())
    }

    pub fn remove_photo(&self) -> Result<(), ApplicationError> {
        let mut state = self.lock_state()?;
        *state = transitions::remove_photo(&state);
        Ok(())
    }

    pub fn dismiss_status(&self) -> Result<(), ApplicationError> {
        let mut state = self.lock_state()?;
        *state = transitions::dismiss_status(&state);
        Ok(())
    }

    pub fn close_dialog(&self) -> Result<(), ApplicationError> {
        let mut state = self.lock_state()?;
        *state = transitions::close_dialog(&state);
        Ok(())
    }

    /// Rejects oversized or non-image files up front, then compresses off the
    /// event loop and attaches the result if no newer upload has started.
    pub async fn attach_photo(
        &self,
        command: AttachPhotoCommand,
    ) -> Result<PhotoOutcome, ApplicationError> {
        let image = command.image;
        if !image.is_image() {
            self.reject_upload("Please choose an image file".to_string())?;
            return Err(ApplicationError::InvalidInput(format!(
                "not an image: {}",
                image.mime_type()
            )));
        }
        let limit = self.config.reduction.max_input_bytes;
        if let Err(error) = image.ensure_within(limit) {
            self.reject_upload(messages::photo_too_large(limit))?;
            return Err(error.into());
        }

        let ticket = self.begin_upload()?;
        let reducer = Arc::clone(&self.reducer);
        let reduction = tokio::task::spawn_blocking(move || reducer.reduce(&image))
            .await
            .map_err(|error| ApplicationError::Task(error.to_string()))?;

        match reduction {
            Ok(reduction) => self.finish_upload(ticket, reduction),
            Err(error) => {
                let mut state = self.lock_state()?;
                if state.is_latest(ticket) {
                    *state = transitions::upload_rejected(
                        &state,
                        messages::photo_unreadable(&error.to_string()),
                    );
                }
                Err(error)
            }
        }
    }

    pub fn begin_upload(&self) -> Result<UploadTicket, ApplicationError> {
        let mut state = self.lock_state()?;
        let (next, ticket) = transitions::issue_upload(&state);
        *state = next;
        debug!(ticket = ticket.sequence(), "photo upload started");
        Ok(ticket)
    }

    pub fn finish_upload(
        &self,
        ticket: UploadTicket,
        reduction: Reduction,
    ) -> Result<PhotoOutcome, ApplicationError> {
        let mut state = self.lock_state()?;
        let Some(next) = transitions::photo_attached(&state, ticket, reduction.image.clone())
        else {
            debug!(
                ticket = ticket.sequence(),
                latest = state.latest_upload,
                "discarding superseded photo"
            );
            return Ok(PhotoOutcome::Superseded { ticket });
        };

        let status_epoch = next.status_epoch;
        *state = next;
        drop(state);

        info!(
            size_kb = %format!("{:.2}", reduction.image.size_kb()),
            width = reduction.output.width,
            height = reduction.output.height,
            attempts = reduction.attempts.len(),
            "photo attached"
        );
        self.schedule(self.config.info_clear_delay, move |state, _now| {
            transitions::clear_info(state, status_epoch)
        });
        Ok(PhotoOutcome::Attached(reduction))
    }

    /// Validate, check the payload budget, then deliver exactly once.
    pub async fn submit(
        &self,
        _command: SubmitReportCommand,
    ) -> Result<SubmitReceipt, ApplicationError> {
        let (request, payload_kb) = {
            let mut state = self.lock_state()?;
            if state.in_flight || !state.phase.accepts_submit() {
                return Err(ApplicationError::InvalidInput(
                    "a submission is already in progress".to_string(),
                ));
            }

            let validating = transitions::begin_validation(&state);
            let epoch = validating.submission_epoch;

            let missing = validating
                .draft
                .missing_fields(&self.config.required_fields);
            if !missing.is_empty() {
                *state = transitions::validation_failed(&validating, &missing);
                drop(state);
                warn!(missing = missing.len(), "report is missing required fields");
                self.schedule_auto_reset(epoch);
                return Err(ApplicationError::Validation(missing));
            }

            let params = assemble_payload(&validating.draft, &self.config);
            let payload_kb = payload_size_kb(&params)?;
            if payload_kb > self.config.payload_ceiling_kb {
                *state = transitions::budget_exceeded(&validating);
                drop(state);
                warn!(
                    size_kb = %format!("{payload_kb:.2}"),
                    limit_kb = self.config.payload_ceiling_kb,
                    "report payload over budget"
                );
                self.schedule_auto_reset(epoch);
                return Err(ApplicationError::PayloadBudgetExceeded {
                    size_kb: payload_kb,
                    limit_kb: self.config.payload_ceiling_kb,
                });
            }

            *state = transitions::begin_sending(&validating);
            let request = DeliveryRequest {
                service_id: self.credentials.service_id.clone(),
                template_id: self.credentials.template_id.clone(),
                params: params.to_map(),
                public_key: self.credentials.public_key.clone(),
            };
            (request, payload_kb)
        };

        info!(size_kb = %format!("{payload_kb:.2}"), "sending report");
        let result = self.delivery.send(request).await;

        let mut state = self.lock_state()?;
        let epoch = state.submission_epoch;
        let error = match result {
            Ok(response) if response.status == SUCCESS_STATUS => {
                *state = transitions::delivered(&state);
                drop(state);
                info!(status = response.status, "report delivered");
                self.schedule(self.config.success_clear_delay, move |state, now| {
                    transitions::clear_draft(state, now, epoch)
                });
                self.schedule_auto_reset(epoch);
                return Ok(SubmitReceipt {
                    status: response.status,
                    payload_kb,
                });
            }
            Ok(response) => DeliveryError::from_response(response),
            Err(error) => error,
        };

        *state = transitions::delivery_failed(&state, delivery_failure_message(&error));
        drop(state);
        warn!(error = %error, "report delivery failed");
        self.schedule_auto_reset(epoch);
        Err(ApplicationError::Delivery(error))
    }

    fn reject_upload(&self, message: String) -> Result<(), ApplicationError> {
        let mut state = self.lock_state()?;
        *state = transitions::upload_rejected(&state, message);
        Ok(())
    }

    fn schedule_auto_reset(&self, submission_epoch: u64) {
        self.schedule(self.config.auto_reset_delay, move |state, now| {
            transitions::auto_reset(state, now, submission_epoch)
        });
    }

    fn schedule<F>(&self, delay: Duration, apply: F)
    where
        F: FnOnce(&FormState, NaiveDateTime) -> FormState + Send + 'static,
    {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("no async runtime, delayed transition skipped");
            return;
        };
        let state = Arc::clone(&self.state);
        let clock = Arc::clone(&self.clock);
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            match state.lock() {
                Ok(mut guard) => {
                    let next = apply(&guard, clock.now());
                    *guard = next;
                }
                Err(_) => warn!("form state lock poisoned, dropping timer"),
            }
        });

        match self.timers.lock() {
            Ok(mut timers) => {
                timers.retain(|timer| !timer.is_finished());
                timers.push(handle);
            }
            Err(_) => warn!("timer registry lock poisoned, timer left detached"),
        }
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, FormState>, ApplicationError> {
        self.state
            .lock()
            .map_err(|_| ApplicationError::StatePoisoned)
    }
}

impl Drop for FormSession {
    fn drop(&mut self) {
        if let Ok(timers) = self.timers.get_mut() {
            for timer in timers.drain(..) {
                timer.abort();
            }
        }
    }
}
