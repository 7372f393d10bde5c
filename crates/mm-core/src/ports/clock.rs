use chrono::{DateTime, NaiveDate};

pub trait ClockPort: Send + Sync {
    fn now_ms(&self) -> i64;

    /// Current UTC calendar date.
    fn today(&self) -> NaiveDate {
        DateTime::from_timestamp_millis(self.now_ms())
            .map(|now| now.date_naive())
            .unwrap_or_default()
    }
}
