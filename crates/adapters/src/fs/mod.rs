mod clock;
mod photo;

pub use clock::SystemClock;
pub use photo::{load_photo, write_jpeg};
