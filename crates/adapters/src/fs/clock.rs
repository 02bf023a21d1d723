use chrono::{Local, NaiveDateTime};
use facility_report_application::Clock;

/// Wall-clock time in the local timezone, as shown on the report.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
