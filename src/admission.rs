//! Admission controls
//!
//! Gates consulted before any message reaches the state machine: a
//! per-chat sliding-window rate limit and a business-hours check with an
//! admin bypass. A gated message gets an informational reply and never
//! touches the store.

use chrono::{DateTime, Datelike, Local, NaiveDate, Timelike, Weekday};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Accepted messages per chat per rolling window.
pub const RATE_LIMIT_MAX: usize = 20;
/// Width of the rolling window.
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(5 * 60);

/// Sliding-window rate limiter keyed by chat id. Keeps the timestamps of
/// accepted messages younger than the window; a rejected message is not
/// recorded, so it does not extend the lockout.
#[derive(Debug, Default)]
pub struct RateLimiter {
    accepted: HashMap<String, Vec<Instant>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit or reject a message arriving now.
    pub fn check(&mut self, chat_id: &str) -> bool {
        self.check_at(chat_id, Instant::now())
    }

    /// Admit or reject a message arriving at `now` (tests pin the clock).
    pub fn check_at(&mut self, chat_id: &str, now: Instant) -> bool {
        let stamps = self.accepted.entry(chat_id.to_string()).or_default();
        stamps.retain(|t| now.saturating_duration_since(*t) < RATE_LIMIT_WINDOW);
        if stamps.len() >= RATE_LIMIT_MAX {
            tracing::warn!(chat_id = %chat_id, "Rate limit exceeded");
            return false;
        }
        stamps.push(now);
        true
    }
}

/// When the bot answers as "open": configured weekdays, local hours in
/// `[start_hour, end_hour)`, and no holiday match on today's date.
#[derive(Debug, Clone)]
pub struct BusinessHours {
    pub weekdays: Vec<Weekday>,
    pub start_hour: u32,
    pub end_hour: u32,
    pub holidays: Vec<NaiveDate>,
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self {
            weekdays: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
            start_hour: 9,
            end_hour: 18,
            holidays: Vec::new(),
        }
    }
}

impl BusinessHours {
    pub fn is_open_now(&self) -> bool {
        self.is_open_at(Local::now())
    }

    pub fn is_open_at(&self, now: DateTime<Local>) -> bool {
        if !self.weekdays.contains(&now.weekday()) {
            return false;
        }
        if now.hour() < self.start_hour || now.hour() >= self.end_hour {
            return false;
        }
        !self.holidays.contains(&now.date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn admits_up_to_the_cap_within_one_window() {
        let mut limiter = RateLimiter::new();
        let base = Instant::now();
        for _ in 0..RATE_LIMIT_MAX {
            assert!(limiter.check_at("u1", base));
        }
        assert!(!limiter.check_at("u1", base));
    }

    #[test]
    fn admits_again_after_the_window_elapses() {
        let mut limiter = RateLimiter::new();
        let base = Instant::now();
        for _ in 0..RATE_LIMIT_MAX {
            assert!(limiter.check_at("u1", base));
        }
        assert!(!limiter.check_at("u1", base + Duration::from_secs(60)));
        assert!(limiter.check_at("u1", base + RATE_LIMIT_WINDOW + Duration::from_secs(1)));
    }

    #[test]
    fn limits_are_tracked_per_chat() {
        let mut limiter = RateLimiter::new();
        let base = Instant::now();
        for _ in 0..RATE_LIMIT_MAX {
            assert!(limiter.check_at("u1", base));
        }
        assert!(!limiter.check_at("u1", base));
        assert!(limiter.check_at("u2", base));
    }

    #[test]
    fn rejected_messages_do_not_extend_the_lockout() {
        let mut limiter = RateLimiter::new();
        let base = Instant::now();
        for _ in 0..RATE_LIMIT_MAX {
            limiter.check_at("u1", base);
        }
        // Hammering while locked out must not push the window forward.
        for i in 0..10 {
            assert!(!limiter.check_at("u1", base + Duration::from_secs(i)));
        }
        assert!(limiter.check_at("u1", base + RATE_LIMIT_WINDOW + Duration::from_secs(1)));
    }

    fn local(y: i32, m: u32, d: u32, h: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, h, 30, 0).unwrap()
    }

    #[test]
    fn open_on_weekdays_inside_hours() {
        let hours = BusinessHours::default();
        // 2025-03-03 is a Monday.
        assert!(hours.is_open_at(local(2025, 3, 3, 9)));
        assert!(hours.is_open_at(local(2025, 3, 3, 17)));
    }

    #[test]
    fn closed_outside_hours_and_on_weekends() {
        let hours = BusinessHours::default();
        assert!(!hours.is_open_at(local(2025, 3, 3, 8)));
        // End hour is exclusive.
        assert!(!hours.is_open_at(local(2025, 3, 3, 18)));
        // 2025-03-01 is a Saturday.
        assert!(!hours.is_open_at(local(2025, 3, 1, 11)));
    }

    #[test]
    fn closed_on_holidays() {
        let hours = BusinessHours {
            holidays: vec![NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()],
            ..BusinessHours::default()
        };
        assert!(!hours.is_open_at(local(2025, 3, 3, 11)));
        assert!(hours.is_open_at(local(2025, 3, 4, 11)));
    }
}
