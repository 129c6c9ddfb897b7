use crate::modules::attendance::core::shift_policy::{
    FALLBACK_FULL_DAY_HOURS, FALLBACK_HALF_DAY_HOURS, FallbackThresholds,
};
use anyhow::{Context, bail};
use chrono::{FixedOffset, NaiveTime};
use std::env;
use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: SocketAddr,
    /// The deployment's single timezone.
    pub tz_offset: FixedOffset,
    pub reconciliation_time: NaiveTime,
    pub fallback: FallbackThresholds,
    pub outbox_topic: String,
    pub seed_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let tz_offset_minutes: i32 = var(&lookup, "TZ_OFFSET_MINUTES", 0)?;
        let tz_offset = FixedOffset::east_opt(tz_offset_minutes * 60)
            .with_context(|| format!("TZ_OFFSET_MINUTES out of range: {tz_offset_minutes}"))?;

        let reconciliation_time = match lookup("RECONCILIATION_TIME") {
            Some(raw) => NaiveTime::parse_from_str(raw.trim(), "%H:%M")
                .with_context(|| format!("RECONCILIATION_TIME must be HH:MM, got {raw:?}"))?,
            None => NaiveTime::from_hms_opt(0, 30, 0).context("invalid default reconciliation time")?,
        };

        let fallback = FallbackThresholds {
            full_day_hours: var(&lookup, "FALLBACK_FULL_DAY_HOURS", FALLBACK_FULL_DAY_HOURS)?,
            half_day_hours: var(&lookup, "FALLBACK_HALF_DAY_HOURS", FALLBACK_HALF_DAY_HOURS)?,
        };
        if fallback.half_day_hours <= 0.0 || fallback.full_day_hours <= fallback.half_day_hours {
            bail!(
                "FALLBACK_FULL_DAY_HOURS ({}) must exceed FALLBACK_HALF_DAY_HOURS ({}) and both must be positive",
                fallback.full_day_hours,
                fallback.half_day_hours
            );
        }

        Ok(Self {
            server_addr: var(&lookup, "SERVER_ADDR", SocketAddr::from(([0, 0, 0, 0], 8080)))?,
            tz_offset,
            reconciliation_time,
            fallback,
            outbox_topic: lookup("OUTBOX_TOPIC").unwrap_or_else(|| "attendance".to_string()),
            seed_file: lookup("SEED_FILE").map(PathBuf::from),
        })
    }
}

fn var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid {key} {raw:?}: {e}")),
        None => Ok(default),
    }
}
