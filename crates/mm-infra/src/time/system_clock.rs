use chrono::Utc;
use mm_core::ports::ClockPort;

pub struct SystemClock;

impl ClockPort for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn today_matches_utc_date() {
        let clock = SystemClock;
        let before = Utc::now().date_naive();
        let today = clock.today();
        let after = Utc::now().date_naive();
        assert!(today == before || today == after);
    }
}
