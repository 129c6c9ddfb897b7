use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

pub const DEFAULT_GRACE_PERIOD_MINUTES: i64 = 15;

/// Canonical fallback thresholds, used only when a shift carries no
/// full/half-day hours of its own.
pub const FALLBACK_FULL_DAY_HOURS: f64 = 6.0;
pub const FALLBACK_HALF_DAY_HOURS: f64 = 4.0;

/// Shift configuration in force for one employee on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftPolicy {
    pub shift_id: String,
    pub shift_start_time: NaiveTime,
    pub shift_end_time: NaiveTime,
    pub full_day_hours: Option<f64>,
    pub half_day_hours: Option<f64>,
    #[serde(default = "default_grace_period_minutes")]
    pub grace_period_minutes: i64,
    pub late_threshold_minutes: Option<i64>,
    pub early_departure_threshold_minutes: Option<i64>,
    pub max_break_minutes: Option<i64>,
    #[serde(default)]
    pub overtime_enabled: bool,
    #[serde(default)]
    pub overtime_threshold_minutes: i64,
    #[serde(default)]
    pub weekly_off_days: Vec<Weekday>,
}

fn default_grace_period_minutes() -> i64 {
    DEFAULT_GRACE_PERIOD_MINUTES
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallbackThresholds {
    pub full_day_hours: f64,
    pub half_day_hours: f64,
}

impl Default for FallbackThresholds {
    fn default() -> Self {
        Self {
            full_day_hours: FALLBACK_FULL_DAY_HOURS,
            half_day_hours: FALLBACK_HALF_DAY_HOURS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdSource {
    Shift,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub full_day_hours: f64,
    pub half_day_hours: f64,
    pub source: ThresholdSource,
}

impl Thresholds {
    pub fn resolve(policy: Option<&ShiftPolicy>, fallback: &FallbackThresholds) -> Self {
        match policy.and_then(|p| p.configured_thresholds()) {
            Some((full_day_hours, half_day_hours)) => Self {
                full_day_hours,
                half_day_hours,
                source: ThresholdSource::Shift,
            },
            None => Self {
                full_day_hours: fallback.full_day_hours,
                half_day_hours: fallback.half_day_hours,
                source: ThresholdSource::Fallback,
            },
        }
    }
}

impl ShiftPolicy {
    /// Both thresholds must be present and positive to count as configured.
    pub fn configured_thresholds(&self) -> Option<(f64, f64)> {
        match (self.full_day_hours, self.half_day_hours) {
            (Some(full), Some(half)) if full > 0.0 && half > 0.0 => Some((full, half)),
            _ => None,
        }
    }

    pub fn is_overnight(&self) -> bool {
        self.shift_end_time <= self.shift_start_time
    }

    pub fn shift_start_on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.shift_start_time)
    }

    /// Shift end for a shift starting on `date`; overnight shifts end on the
    /// following calendar day.
    pub fn shift_end_on(&self, date: NaiveDate) -> NaiveDateTime {
        let end = date.and_time(self.shift_end_time);
        if self.is_overnight() {
            end + Duration::days(1)
        } else {
            end
        }
    }

    pub fn clock_out_deadline_on(&self, date: NaiveDate) -> NaiveDateTime {
        self.shift_end_on(date) + Duration::minutes(self.grace_period_minutes)
    }

    pub fn late_threshold(&self) -> i64 {
        self.late_threshold_minutes.unwrap_or(self.grace_period_minutes)
    }

    pub fn early_departure_threshold(&self) -> i64 {
        self.early_departure_threshold_minutes.unwrap_or(0)
    }

    pub fn is_weekly_off(&self, date: NaiveDate) -> bool {
        self.weekly_off_days.contains(&date.weekday())
    }
}
