//! Startup configuration read from the environment.
//!
//! Everything is validated once, before any run starts; a missing source or
//! destination is a [`ConfigError`], never a mid-run surprise.

use std::env;
use std::time::Duration;

use chrono::FixedOffset;

use crate::error::ConfigError;
use crate::extract::SourceKind;
use crate::format::{DEFAULT_LIMIT, LengthPolicy, Overflow, PLATFORM_LIMIT};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const DEFAULT_TELEGRAM_API: &str = "https://api.telegram.org";

const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_UTC_OFFSET_HOURS: i32 = -5;
const DEFAULT_PART_PAUSE_MS: u64 = 1000;
const DEFAULT_SCOPE_PAUSE_MS: u64 = 2000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub source_url: String,
    pub source_kind: SourceKind,
    pub timeout: Duration,
    pub user_agent: String,
    pub utc_offset: FixedOffset,
    pub length: LengthPolicy,
    pub part_pause: Duration,
    pub scope_pause: Duration,
}

#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    pub bot_token: String,
    pub chat_id: String,
    pub api_base: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let source_url = get("PARRILLA_SOURCE_URL").ok_or(ConfigError::Missing("PARRILLA_SOURCE_URL"))?;
        if !(source_url.starts_with("http://") || source_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                key: "PARRILLA_SOURCE_URL",
                value: source_url,
                reason: "expected an http(s) url",
            });
        }

        let source_kind = match get("PARRILLA_STRATEGY") {
            None => SourceKind::Tabular,
            Some(raw) => SourceKind::parse(&raw).ok_or(ConfigError::Invalid {
                key: "PARRILLA_STRATEGY",
                value: raw,
                reason: "expected tabular or grouped",
            })?,
        };

        let timeout_secs = parse_in_range(
            "PARRILLA_TIMEOUT_SECS",
            get("PARRILLA_TIMEOUT_SECS"),
            DEFAULT_TIMEOUT_SECS,
            1,
            120,
        )?;
        let offset_hours = parse_in_range(
            "PARRILLA_UTC_OFFSET_HOURS",
            get("PARRILLA_UTC_OFFSET_HOURS"),
            DEFAULT_UTC_OFFSET_HOURS,
            -12,
            14,
        )?;
        let utc_offset = FixedOffset::east_opt(offset_hours * 3600).ok_or(ConfigError::Invalid {
            key: "PARRILLA_UTC_OFFSET_HOURS",
            value: offset_hours.to_string(),
            reason: "offset out of range",
        })?;
        let limit = parse_in_range(
            "PARRILLA_MESSAGE_LIMIT",
            get("PARRILLA_MESSAGE_LIMIT"),
            DEFAULT_LIMIT,
            200,
            PLATFORM_LIMIT,
        )?;
        let overflow = match get("PARRILLA_OVERFLOW").map(|s| s.to_ascii_lowercase()) {
            None => Overflow::Split,
            Some(v) if v == "split" => Overflow::Split,
            Some(v) if v == "truncate" => Overflow::Truncate,
            Some(v) => {
                return Err(ConfigError::Invalid {
                    key: "PARRILLA_OVERFLOW",
                    value: v,
                    reason: "expected split or truncate",
                });
            }
        };
        let part_pause_ms = parse_in_range(
            "PARRILLA_PART_PAUSE_MS",
            get("PARRILLA_PART_PAUSE_MS"),
            DEFAULT_PART_PAUSE_MS,
            0,
            60_000,
        )?;
        let scope_pause_ms = parse_in_range(
            "PARRILLA_SCOPE_PAUSE_MS",
            get("PARRILLA_SCOPE_PAUSE_MS"),
            DEFAULT_SCOPE_PAUSE_MS,
            0,
            60_000,
        )?;

        Ok(Self {
            source_url,
            source_kind,
            timeout: Duration::from_secs(timeout_secs),
            user_agent: get("PARRILLA_USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            utc_offset,
            length: LengthPolicy { limit, overflow },
            part_pause: Duration::from_millis(part_pause_ms),
            scope_pause: Duration::from_millis(scope_pause_ms),
        })
    }
}

impl DeliveryConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        let bot_token = get("BOT_TOKEN").ok_or(ConfigError::Missing("BOT_TOKEN"))?;
        let chat_id = get("CHAT_ID").ok_or(ConfigError::Missing("CHAT_ID"))?;
        let api_base = get("TELEGRAM_API_BASE")
            .unwrap_or_else(|| DEFAULT_TELEGRAM_API.to_string())
            .trim_end_matches('/')
            .to_string();
        Ok(Self {
            bot_token,
            chat_id,
            api_base,
        })
    }
}

fn parse_in_range<T>(
    key: &'static str,
    raw: Option<String>,
    default: T,
    min: T,
    max: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Copy,
{
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.parse::<T>() {
        Ok(v) if v >= min && v <= max => Ok(v),
        Ok(_) => Err(ConfigError::Invalid {
            key,
            value: raw,
            reason: "out of range",
        }),
        Err(_) => Err(ConfigError::Invalid {
            key,
            value: raw,
            reason: "not a number",
        }),
    }
}
