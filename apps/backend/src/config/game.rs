//! Runtime configuration, read once from the environment at startup.

use std::str::FromStr;
use std::time::Duration;

use crate::domain::round::{DEFAULT_ROUND_SECONDS, MAX_ROUND_SECONDS};
use crate::error::AppError;

/// When round 1 opens. Fixed for the lifetime of a coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundStartPolicy {
    /// The first successful registration opens round 1.
    #[default]
    FirstRegistration,
    /// Round 1 opens as soon as the coordinator is built.
    Immediate,
}

impl FromStr for RoundStartPolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first_registration" => Ok(Self::FirstRegistration),
            "immediate" => Ok(Self::Immediate),
            other => Err(AppError::config(format!(
                "ALLIANCE_ROUND_START must be 'first_registration' or 'immediate', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub host: String,
    pub port: u16,
    pub round_duration: Duration,
    pub start_policy: RoundStartPolicy,
    /// Expose the `game/advance_round` admin method.
    pub admin_enabled: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            round_duration: Duration::from_secs(DEFAULT_ROUND_SECONDS),
            start_policy: RoundStartPolicy::default(),
            admin_enabled: true,
        }
    }
}

impl GameConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = Self::default();

        let host = lookup("ALLIANCE_HOST").unwrap_or(defaults.host);
        let port = match lookup("ALLIANCE_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                AppError::config(format!("ALLIANCE_PORT must be a valid port number, got '{raw}'"))
            })?,
            None => defaults.port,
        };
        let round_duration = match lookup("ALLIANCE_ROUND_SECONDS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if (1..=MAX_ROUND_SECONDS).contains(&secs) => Duration::from_secs(secs),
                _ => {
                    return Err(AppError::config(format!(
                        "ALLIANCE_ROUND_SECONDS must be an integer between 1 and {MAX_ROUND_SECONDS}, got '{raw}'"
                    )))
                }
            },
            None => defaults.round_duration,
        };
        let start_policy = match lookup("ALLIANCE_ROUND_START") {
            Some(raw) => raw.parse()?,
            None => defaults.start_policy,
        };
        let admin_enabled = match lookup("ALLIANCE_ADMIN_ENABLED") {
            Some(raw) => parse_bool("ALLIANCE_ADMIN_ENABLED", &raw)?,
            None => defaults.admin_enabled,
        };

        Ok(Self {
            host,
            port,
            round_duration,
            start_policy,
            admin_enabled,
        })
    }

    /// Rejects durations a round deadline cannot be built from.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.round_duration.is_zero() {
            return Err(AppError::config("Round duration must be positive"));
        }
        if self.round_duration > Duration::from_secs(MAX_ROUND_SECONDS) {
            return Err(AppError::config(format!(
                "Round duration must not exceed {MAX_ROUND_SECONDS}s, got {}s",
                self.round_duration.as_secs()
            )));
        }
        Ok(())
    }

    pub fn with_round_duration(mut self, round_duration: Duration) -> Self {
        self.round_duration = round_duration;
        self
    }

    pub fn with_start_policy(mut self, start_policy: RoundStartPolicy) -> Self {
        self.start_policy = start_policy;
        self
    }

    pub fn with_admin(mut self, admin_enabled: bool) -> Self {
        self.admin_enabled = admin_enabled;
        self
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AppError::config(format!(
            "{key} must be a boolean, got '{raw}'"
        ))),
    }
}
