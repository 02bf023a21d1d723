mod error;
mod messages;
mod payload;
mod ports;
mod reducer;
mod session;
pub mod transitions;
mod use_cases;

pub use error::ApplicationError;
pub use messages::{delivery_failure_message, validation_message};
pub use payload::{assemble_payload, payload_size_kb, REPORT_DATE_FORMAT};
pub use ports::{
    Clock, DeliveryClient, DeliveryCredentials, DeliveryError, DeliveryRequest,
    DeliveryResponse, ImageCodec, SUCCESS_STATUS,
};
pub use reducer::ImageReducer;
pub use session::{FormSession, PhotoOutcome, SubmitReceipt};
pub use transitions::{FormState, UploadTicket};
pub use use_cases::{AttachPhotoCommand, SetFieldCommand, SubmitReportCommand};
