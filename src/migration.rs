//! Normalizes a persisted blob of any known generation into the current
//! [`CalendarState`] shape.
//!
//! Three concerns are migrated independently:
//!
//! * day marks: legacy `{type, date}` records become `{date, classMarks: [],
//!   allDayFree}` where only `type == "holiday"` survives as a free day;
//! * weekly schedule: `{morning, afternoon}` slots become `{classes: [...]}`,
//!   and missing weekdays are filled in;
//! * display thresholds: defaulted when absent, clamped when out of range.
//!
//! Running the migrator on its own output is a no-op.

use crate::calendar::{ALL_WEEKDAYS, calendar_date, parse_calendar_day, weekday_name};
use crate::class::Class;
use crate::mark::DayMark;
use crate::semester::{DaySchedule, PercentageColorConfig, SemesterConfig, WeekSchedule};
use crate::state::CalendarState;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("expected a JSON object at the top level")]
    NotAnObject,
    #[error("missing semester section")]
    MissingSemester,
    #[error("semester {field} is missing or not a valid date")]
    InvalidDate { field: &'static str },
    #[error("week schedule is not an object")]
    InvalidWeekSchedule,
    #[error("schedule for {day} is malformed: {reason}")]
    InvalidDaySchedule { day: &'static str, reason: String },
    #[error("percentage colors are malformed: {0}")]
    InvalidPercentageColors(serde_json::Error),
    #[error("classes are malformed: {0}")]
    InvalidClasses(serde_json::Error),
    #[error("marks are malformed: {0}")]
    InvalidMarks(serde_json::Error),
}

/// Which parts of the blob had to be reshaped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub marks_migrated: bool,
    pub schedule_migrated: bool,
    pub colors_migrated: bool,
    pub classes_migrated: bool,
}

impl MigrationReport {
    pub fn changed(&self) -> bool {
        self.marks_migrated || self.schedule_migrated || self.colors_migrated || self.classes_migrated
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Migrated {
    pub state: CalendarState,
    pub report: MigrationReport,
}

impl Migrated {
    /// True when the input was not already canonical and should be re-persisted.
    pub fn changed(&self) -> bool {
        self.report.changed()
    }
}

/// Day mark as found on disk. A record carrying a string `type` field is a
/// first-generation mark; anything else is read as the current shape.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredDayMark {
    Legacy(LegacyDayMark),
    Current(DayMark),
}

#[derive(Deserialize)]
struct LegacyDayMark {
    #[serde(rename = "type")]
    kind: String,
    #[serde(with = "calendar_date")]
    date: NaiveDate,
}

const LEGACY_FREE_DAY: &str = "holiday";

pub fn migrate(blob: &Value) -> Result<Migrated, MigrationError> {
    let root = blob.as_object().ok_or(MigrationError::NotAnObject)?;
    let semester = root
        .get("semester")
        .and_then(Value::as_object)
        .ok_or(MigrationError::MissingSemester)?;

    let start_date = read_date(semester, "startDate")?;
    let end_date = read_date(semester, "endDate")?;
    let (week_schedule, schedule_migrated) = migrate_week_schedule(semester.get("weekSchedule"))?;
    let (percentage_colors, colors_migrated) =
        migrate_percentage_colors(semester.get("percentageColors"))?;
    let (classes, classes_migrated) = migrate_classes(root.get("classes"))?;
    let (marks, marks_migrated) = migrate_marks(root.get("marks"))?;

    let report = MigrationReport {
        marks_migrated,
        schedule_migrated,
        colors_migrated,
        classes_migrated,
    };
    if report.changed() {
        info!(
            marks = marks_migrated,
            schedule = schedule_migrated,
            colors = colors_migrated,
            classes = classes_migrated,
            "migrated calendar blob to current schema"
        );
    } else {
        debug!("calendar blob already canonical");
    }

    Ok(Migrated {
        state: CalendarState {
            semester: SemesterConfig {
                start_date,
                end_date,
                week_schedule,
                percentage_colors,
            },
            classes,
            marks,
        },
        report,
    })
}

fn is_absent(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

fn read_date(semester: &Map<String, Value>, field: &'static str) -> Result<NaiveDate, MigrationError> {
    semester
        .get(field)
        .and_then(Value::as_str)
        .and_then(parse_calendar_day)
        .ok_or(MigrationError::InvalidDate { field })
}

fn migrate_week_schedule(value: Option<&Value>) -> Result<(WeekSchedule, bool), MigrationError> {
    if is_absent(value) {
        return Ok((WeekSchedule::default(), true));
    }
    let days = value
        .and_then(Value::as_object)
        .ok_or(MigrationError::InvalidWeekSchedule)?;

    let mut schedule = WeekSchedule::default();
    let mut changed = false;
    for weekday in ALL_WEEKDAYS {
        let name = weekday_name(weekday);
        let (day, day_changed) = migrate_day_schedule(name, days.get(name))?;
        *schedule.day_mut(weekday) = day;
        changed |= day_changed;
    }
    Ok((schedule, changed))
}

fn migrate_day_schedule(
    name: &'static str,
    value: Option<&Value>,
) -> Result<(DaySchedule, bool), MigrationError> {
    if is_absent(value) {
        return Ok((DaySchedule::default(), true));
    }
    let day = value
        .and_then(Value::as_object)
        .ok_or_else(|| MigrationError::InvalidDaySchedule {
            day: name,
            reason: "expected an object".into(),
        })?;

    if day.contains_key("morning") || day.contains_key("afternoon") {
        // slot era: morning class first, then afternoon; blank slots dropped
        let classes = ["morning", "afternoon"]
            .iter()
            .filter_map(|slot| day.get(*slot).and_then(Value::as_str))
            .filter(|code| !code.is_empty());
        return Ok((DaySchedule::new(classes), true));
    }

    match day.get("classes") {
        Some(classes) if !classes.is_null() => {
            let classes = Vec::<String>::deserialize(classes).map_err(|err| {
                MigrationError::InvalidDaySchedule {
                    day: name,
                    reason: err.to_string(),
                }
            })?;
            Ok((DaySchedule::new(classes), false))
        }
        _ => Ok((DaySchedule::default(), true)),
    }
}

fn migrate_percentage_colors(
    value: Option<&Value>,
) -> Result<(PercentageColorConfig, bool), MigrationError> {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return Ok((PercentageColorConfig::default(), true));
    };
    let stored = PercentageColorConfig::deserialize(value)
        .map_err(MigrationError::InvalidPercentageColors)?;
    let clamped = stored.clamped();
    Ok((clamped, clamped != stored))
}

fn migrate_classes(value: Option<&Value>) -> Result<(Vec<Class>, bool), MigrationError> {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return Ok((Vec::new(), true));
    };
    let stored = Vec::<Class>::deserialize(value).map_err(MigrationError::InvalidClasses)?;
    let stored_len = stored.len();

    let mut seen = HashSet::with_capacity(stored_len);
    let classes: Vec<Class> = stored
        .into_iter()
        .filter(|class| seen.insert(class.code.clone()))
        .collect();
    let changed = classes.len() != stored_len;
    Ok((classes, changed))
}

fn migrate_marks(
    value: Option<&Value>,
) -> Result<(BTreeMap<NaiveDate, DayMark>, bool), MigrationError> {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return Ok((BTreeMap::new(), true));
    };
    let stored = Vec::<StoredDayMark>::deserialize(value).map_err(MigrationError::InvalidMarks)?;
    let stored_len = stored.len();

    let mut reshaped = false;
    let mut marks = BTreeMap::new();
    for mark in stored {
        let mark = match mark {
            StoredDayMark::Legacy(legacy) => {
                reshaped = true;
                DayMark::new(legacy.date, Vec::new(), legacy.kind == LEGACY_FREE_DAY)
            }
            StoredDayMark::Current(current) => {
                let class_count = current.class_marks.len();
                let normalized =
                    DayMark::new(current.date, current.class_marks, current.all_day_free);
                reshaped |= normalized.class_marks.len() != class_count;
                normalized
            }
        };
        if mark.carries_information() {
            // later records for the same day win
            marks.insert(mark.date, mark);
        }
    }

    let changed = reshaped || marks.len() != stored_len;
    Ok((marks, changed))
}
