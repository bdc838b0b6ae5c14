use chrono::{DateTime, Utc};
use moonlight_application::Clock;

/// Wall clock backed by the operating system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
