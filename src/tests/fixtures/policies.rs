use crate::modules::attendance::core::shift_policy::{DEFAULT_GRACE_PERIOD_MINUTES, ShiftPolicy};
use chrono::{NaiveTime, Weekday};

/// General shift: 09:00-18:00, 8h full day, 4h half day, weekends off.
pub struct ShiftPolicyBuilder {
    inner: ShiftPolicy,
}

impl Default for ShiftPolicyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl ShiftPolicyBuilder {
    pub fn new() -> Self {
        Self {
            inner: ShiftPolicy {
                shift_id: "shift-general".to_string(),
                shift_start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                shift_end_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
                full_day_hours: Some(8.0),
                half_day_hours: Some(4.0),
                grace_period_minutes: DEFAULT_GRACE_PERIOD_MINUTES,
                late_threshold_minutes: None,
                early_departure_threshold_minutes: None,
                max_break_minutes: Some(60),
                overtime_enabled: true,
                overtime_threshold_minutes: 30,
                weekly_off_days: vec![Weekday::Sat, Weekday::Sun],
            },
        }
    }

    pub fn id(mut self, v: impl Into<String>) -> Self {
        self.inner.shift_id = v.into();
        self
    }

    pub fn hours(mut self, start_hour: u32, end_hour: u32) -> Self {
        self.inner.shift_start_time = NaiveTime::from_hms_opt(start_hour, 0, 0).unwrap();
        self.inner.shift_end_time = NaiveTime::from_hms_opt(end_hour, 0, 0).unwrap();
        self
    }

    pub fn thresholds(mut self, full_day_hours: f64, half_day_hours: f64) -> Self {
        self.inner.full_day_hours = Some(full_day_hours);
        self.inner.half_day_hours = Some(half_day_hours);
        self
    }

    pub fn without_thresholds(mut self) -> Self {
        self.inner.full_day_hours = None;
        self.inner.half_day_hours = None;
        self
    }

    pub fn grace(mut self, minutes: i64) -> Self {
        self.inner.grace_period_minutes = minutes;
        self
    }

    pub fn overtime(mut self, enabled: bool, threshold_minutes: i64) -> Self {
        self.inner.overtime_enabled = enabled;
        self.inner.overtime_threshold_minutes = threshold_minutes;
        self
    }

    pub fn weekly_off(mut self, days: Vec<Weekday>) -> Self {
        self.inner.weekly_off_days = days;
        self
    }

    pub fn build(self) -> ShiftPolicy {
        self.inner
    }
}
