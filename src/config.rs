//! Environment configuration
//!
//! Everything operational comes from `INTAKE_*` environment variables with
//! defaults matching the production deployment.

use crate::admission::BusinessHours;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// Port the admin surface listens on.
    pub port: u16,
    /// Live conversation state file.
    pub state_path: PathBuf,
    /// Reset history file.
    pub history_path: PathBuf,
    /// Basic-auth credentials for the admin surface.
    pub web_username: String,
    pub web_password: String,
    /// Chat ids that bypass the business-hours gate.
    pub admin_ids: HashSet<String>,
    pub business_hours: BusinessHours,
}

impl Config {
    pub fn from_env() -> Self {
        let data_dir =
            PathBuf::from(std::env::var("INTAKE_DATA_DIR").unwrap_or_else(|_| "data".to_string()));

        let mut business_hours = BusinessHours::default();
        if let Some(hour) = env_parse("INTAKE_BUSINESS_START_HOUR") {
            business_hours.start_hour = hour;
        }
        if let Some(hour) = env_parse("INTAKE_BUSINESS_END_HOUR") {
            business_hours.end_hour = hour;
        }
        if let Ok(raw) = std::env::var("INTAKE_BUSINESS_HOLIDAYS") {
            business_hours.holidays = parse_holidays(&raw);
        }

        Self {
            port: env_parse("INTAKE_PORT").unwrap_or(3000),
            state_path: data_dir.join("conversation-state.json"),
            history_path: data_dir.join("conversation-history.json"),
            web_username: std::env::var("INTAKE_WEB_USERNAME")
                .unwrap_or_else(|_| "admin".to_string()),
            web_password: std::env::var("INTAKE_WEB_PASSWORD")
                .unwrap_or_else(|_| "inted2025".to_string()),
            admin_ids: std::env::var("INTAKE_ADMIN_IDS")
                .map(|raw| parse_id_list(&raw))
                .unwrap_or_default(),
            business_hours,
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

fn parse_id_list(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect()
}

/// Comma-separated ISO dates; entries that fail to parse are logged and
/// skipped rather than taking the gate down.
fn parse_holidays(raw: &str) -> Vec<NaiveDate> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(e) => {
                tracing::warn!(value = %s, error = %e, "Ignoring unparseable holiday");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_holiday_lists_and_skips_garbage() {
        let holidays = parse_holidays("2025-12-25, 2026-01-01,not-a-date,");
        assert_eq!(
            holidays,
            vec![
                NaiveDate::from_ymd_opt(2025, 12, 25).unwrap(),
                NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            ]
        );
    }

    #[test]
    fn parses_admin_id_lists() {
        let ids = parse_id_list("5491111111111@c.us, 5492222222222@c.us,,");
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("5491111111111@c.us"));
    }
}
