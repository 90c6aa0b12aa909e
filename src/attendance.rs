//! Read-only resolution rules over a canonical [`CalendarState`].
//!
//! Every statistic goes through [`CalendarState::class_status`]; a day marked
//! all-day-free overrides whatever is recorded for individual classes.

use crate::class::Class;
use crate::mark::{ClassStatus, DayMark, DayMode};
use crate::state::CalendarState;
use chrono::{Datelike, NaiveDate};
use std::borrow::Cow;

impl CalendarState {
    pub fn is_class_day(&self, date: NaiveDate) -> bool {
        !self.semester.week_schedule.day(date.weekday()).is_empty()
    }

    /// Roster entries meeting on `date`, in schedule order. Codes missing
    /// from the roster are skipped.
    pub fn classes_on_date(&self, date: NaiveDate) -> Vec<&Class> {
        self.semester
            .week_schedule
            .day(date.weekday())
            .classes
            .iter()
            .filter_map(|code| self.find_class(code))
            .collect()
    }

    pub fn meets_on(&self, code: &str, date: NaiveDate) -> bool {
        self.classes_on_date(date)
            .iter()
            .any(|class| class.code == code)
    }

    /// Stored mark for the day, or an empty one when nothing is stored.
    pub fn day_mark_for(&self, date: NaiveDate) -> Cow<'_, DayMark> {
        match self.marks.get(&date) {
            Some(mark) => Cow::Borrowed(mark),
            None => Cow::Owned(DayMark::empty(date)),
        }
    }

    pub fn class_status(&self, date: NaiveDate, class_code: &str) -> ClassStatus {
        let Some(mark) = self.marks.get(&date) else {
            return ClassStatus::Regular;
        };
        if mark.all_day_free {
            return ClassStatus::Free;
        }
        mark.recorded_status(class_code)
            .unwrap_or(ClassStatus::Regular)
    }

    pub fn day_mode(&self, date: NaiveDate) -> DayMode {
        let classes = self.classes_on_date(date);
        self.day_mark_for(date)
            .mode(classes.iter().map(|class| class.code.as_str()))
    }

    pub fn is_within_semester(&self, date: NaiveDate) -> bool {
        self.semester.contains(date)
    }
}
