//! State transitions. Every operation leaves `self` untouched and returns the
//! next state; none of them can fail; bad input is tolerated or corrected.

use crate::class::Class;
use crate::mark::{ClassMark, DayMark, DayMode};
use crate::semester::{DaySchedule, PercentageColorConfig, SemesterConfig, WeekSchedule};
use crate::state::CalendarState;
use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

impl CalendarState {
    /// No ordering check: a reversed period simply yields empty statistics.
    pub fn set_semester_period(&self, start: NaiveDate, end: NaiveDate) -> Self {
        let mut next = self.clone();
        next.semester.start_date = start;
        next.semester.end_date = end;
        next
    }

    pub fn set_semester(&self, semester: SemesterConfig) -> Self {
        let mut next = self.clone();
        next.semester = SemesterConfig {
            percentage_colors: semester.percentage_colors.clamped(),
            ..semester
        };
        next
    }

    pub fn set_week_schedule(&self, week_schedule: WeekSchedule) -> Self {
        let mut next = self.clone();
        next.semester.week_schedule = week_schedule;
        next
    }

    /// Codes are not checked against the roster.
    pub fn set_day_schedule(&self, weekday: Weekday, class_codes: Vec<String>) -> Self {
        let mut next = self.clone();
        *next.semester.week_schedule.day_mut(weekday) = DaySchedule::new(class_codes);
        next
    }

    /// Appends the class unless its code is already on the roster.
    pub fn add_class(&self, class: Class) -> Self {
        let mut next = self.clone();
        if self.find_class(&class.code).is_none() {
            next.classes.push(class);
        }
        next
    }

    /// Drops the class from the roster and from every weekday. Existing marks
    /// that mention it are left in place.
    pub fn remove_class(&self, code: &str) -> Self {
        let mut next = self.clone();
        next.classes.retain(|class| class.code != code);
        for weekday in crate::calendar::ALL_WEEKDAYS {
            next.semester
                .week_schedule
                .day_mut(weekday)
                .classes
                .retain(|scheduled| scheduled != code);
        }
        next
    }

    /// Upserts the day's mark, dropping it when it carries no information.
    pub fn set_day_mark(
        &self,
        date: NaiveDate,
        class_marks: Vec<ClassMark>,
        all_day_free: bool,
    ) -> Self {
        let mut next = self.clone();
        let mark = DayMark::new(date, class_marks, all_day_free);
        if mark.carries_information() {
            next.marks.insert(date, mark);
        } else {
            next.marks.remove(&date);
        }
        next
    }

    /// Applies a bulk mode to every class meeting on `date`.
    /// `Individual` leaves the day as it is.
    pub fn set_day_mode(&self, date: NaiveDate, mode: DayMode) -> Self {
        let Some(status) = mode.bulk_status() else {
            return self.clone();
        };
        let class_marks = self
            .classes_on_date(date)
            .into_iter()
            .map(|class| ClassMark::new(class.code.clone(), status))
            .collect();
        self.set_day_mark(date, class_marks, mode == DayMode::AllFree)
    }

    pub fn set_percentage_colors(&self, config: PercentageColorConfig) -> Self {
        let mut next = self.clone();
        next.semester.percentage_colors = config.clamped();
        next
    }

    pub fn reset_all_marks(&self) -> Self {
        let mut next = self.clone();
        next.marks.clear();
        next
    }
}

/// A requested state transition, as issued by a front-end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    SetSemesterPeriod {
        start: NaiveDate,
        end: NaiveDate,
    },
    SetSemester(SemesterConfig),
    SetWeekSchedule(WeekSchedule),
    SetDaySchedule {
        weekday: Weekday,
        classes: Vec<String>,
    },
    AddClass(Class),
    RemoveClass {
        code: String,
    },
    SetDayMark {
        date: NaiveDate,
        class_marks: Vec<ClassMark>,
        all_day_free: bool,
    },
    SetDayMode {
        date: NaiveDate,
        mode: DayMode,
    },
    SetPercentageColors(PercentageColorConfig),
    ResetAllMarks,
}

impl Mutation {
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::SetSemesterPeriod { .. } => "set_semester_period",
            Mutation::SetSemester(_) => "set_semester",
            Mutation::SetWeekSchedule(_) => "set_week_schedule",
            Mutation::SetDaySchedule { .. } => "set_day_schedule",
            Mutation::AddClass(_) => "add_class",
            Mutation::RemoveClass { .. } => "remove_class",
            Mutation::SetDayMark { .. } => "set_day_mark",
            Mutation::SetDayMode { .. } => "set_day_mode",
            Mutation::SetPercentageColors(_) => "set_percentage_colors",
            Mutation::ResetAllMarks => "reset_all_marks",
        }
    }

    pub fn apply(&self, state: &CalendarState) -> CalendarState {
        match self {
            Mutation::SetSemesterPeriod { start, end } => state.set_semester_period(*start, *end),
            Mutation::SetSemester(semester) => state.set_semester(semester.clone()),
            Mutation::SetWeekSchedule(schedule) => state.set_week_schedule(schedule.clone()),
            Mutation::SetDaySchedule { weekday, classes } => {
                state.set_day_schedule(*weekday, classes.clone())
            }
            Mutation::AddClass(class) => state.add_class(class.clone()),
            Mutation::RemoveClass { code } => state.remove_class(code),
            Mutation::SetDayMark {
                date,
                class_marks,
                all_day_free,
            } => state.set_day_mark(*date, class_marks.clone(), *all_day_free),
            Mutation::SetDayMode { date, mode } => state.set_day_mode(*date, *mode),
            Mutation::SetPercentageColors(config) => state.set_percentage_colors(*config),
            Mutation::ResetAllMarks => state.reset_all_marks(),
        }
    }
}
