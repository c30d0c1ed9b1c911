use std::env;

use chrono::NaiveTime;
use tracing::warn;

/// Reference working day: 09:00 through 16:30 in 30-minute steps.
pub const DEFAULT_DAY_START: &str = "09:00";
pub const DEFAULT_DAY_END: &str = "16:30";
pub const DEFAULT_SLOT_MINUTES: u32 = 30;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_api_key: String,
    pub clinic_day_start: NaiveTime,
    pub clinic_day_end: NaiveTime,
    pub slot_interval_minutes: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            database_url: env::var("DATABASE_REST_URL")
                .unwrap_or_else(|_| {
                    warn!("DATABASE_REST_URL not set, using empty value");
                    String::new()
                }),
            database_api_key: env::var("DATABASE_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("DATABASE_API_KEY not set, using empty value");
                    String::new()
                }),
            clinic_day_start: parse_time_var("CLINIC_DAY_START", DEFAULT_DAY_START),
            clinic_day_end: parse_time_var("CLINIC_DAY_END", DEFAULT_DAY_END),
            slot_interval_minutes: parse_minutes_var("CLINIC_SLOT_MINUTES", DEFAULT_SLOT_MINUTES),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.database_url.is_empty() && !self.database_api_key.is_empty()
    }
}

fn parse_time_var(name: &str, default: &str) -> NaiveTime {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());

    NaiveTime::parse_from_str(&raw, "%H:%M").unwrap_or_else(|_| {
        warn!("{} is not a valid HH:MM time ({}), using default {}", name, raw, default);
        NaiveTime::parse_from_str(default, "%H:%M").expect("default clinic time is valid")
    })
}

fn parse_minutes_var(name: &str, default: u32) -> u32 {
    let raw = match env::var(name) {
        Ok(raw) => raw,
        Err(_) => return default,
    };

    match raw.parse::<u32>() {
        Ok(minutes) if minutes > 0 => minutes,
        _ => {
            warn!("{} is not a positive minute count ({}), using default {}", name, raw, default);
            default
        }
    }
}
