use crate::calendar::{ALL_WEEKDAYS, calendar_date, default_semester_window};
use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub classes: Vec<String>,
}

impl DaySchedule {
    pub fn new<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            classes: classes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Classes meeting on each weekday. Every weekday is always present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekSchedule {
    pub monday: DaySchedule,
    pub tuesday: DaySchedule,
    pub wednesday: DaySchedule,
    pub thursday: DaySchedule,
    pub friday: DaySchedule,
    pub saturday: DaySchedule,
    pub sunday: DaySchedule,
}

impl WeekSchedule {
    pub fn day(&self, weekday: Weekday) -> &DaySchedule {
        match weekday {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }

    pub fn day_mut(&mut self, weekday: Weekday) -> &mut DaySchedule {
        match weekday {
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
            Weekday::Sun => &mut self.sunday,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &DaySchedule)> {
        ALL_WEEKDAYS.into_iter().map(move |day| (day, self.day(day)))
    }
}

pub const DEFAULT_MINIMUM_PERCENTAGE: f64 = 75.0;
pub const DEFAULT_CAUTION_PERCENTAGE: f64 = 85.0;

/// Display thresholds for remaining attendance. Not used by the attendance
/// math itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentageColorConfig {
    pub minimum: f64,
    pub caution: f64,
}

impl Default for PercentageColorConfig {
    fn default() -> Self {
        Self {
            minimum: DEFAULT_MINIMUM_PERCENTAGE,
            caution: DEFAULT_CAUTION_PERCENTAGE,
        }
    }
}

fn clamp_percent(value: f64, floor: f64) -> f64 {
    if value.is_nan() {
        floor
    } else {
        value.clamp(floor, 100.0)
    }
}

impl PercentageColorConfig {
    pub fn new(minimum: f64, caution: f64) -> Self {
        Self { minimum, caution }
    }

    /// `minimum` clamped to [0, 100], then `caution` clamped to [minimum, 100].
    pub fn clamped(&self) -> Self {
        let minimum = clamp_percent(self.minimum, 0.0);
        let caution = clamp_percent(self.caution, minimum);
        Self { minimum, caution }
    }

    pub fn classify(&self, remaining_percentage: f64) -> ThresholdBand {
        if remaining_percentage <= self.minimum {
            ThresholdBand::Low
        } else if remaining_percentage <= self.caution {
            ThresholdBand::Caution
        } else {
            ThresholdBand::Healthy
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdBand {
    Low,
    Caution,
    Healthy,
}

impl ThresholdBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThresholdBand::Low => "low",
            ThresholdBand::Caution => "caution",
            ThresholdBand::Healthy => "healthy",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemesterConfig {
    #[serde(with = "calendar_date")]
    pub start_date: NaiveDate,
    #[serde(with = "calendar_date")]
    pub end_date: NaiveDate,
    pub week_schedule: WeekSchedule,
    pub percentage_colors: PercentageColorConfig,
}

impl SemesterConfig {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            week_schedule: WeekSchedule::default(),
            percentage_colors: PercentageColorConfig::default(),
        }
    }

    /// Empty semester covering the default window around `today`.
    pub fn default_for(today: NaiveDate) -> Self {
        let (start, end) = default_semester_window(today);
        Self::new(start, end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}
