use crate::calendar::days_in_range;
use crate::mark::ClassStatus;
use crate::state::CalendarState;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemesterStats {
    pub total_class_days: usize,
    pub available_class_days: usize,
    pub free_days: usize,
    pub total_absences: usize,
}

impl SemesterStats {
    pub fn to_cli_summary(&self) -> String {
        format!(
            "classes={}, available={}, free_days={}, absences={}",
            self.total_class_days, self.available_class_days, self.free_days, self.total_absences
        )
    }
}

/// Walks every day of the semester once. Whole free days count as one free
/// day; otherwise each meeting class counts toward the totals.
pub struct SemesterStatsPass<'a> {
    state: &'a CalendarState,
}

impl<'a> SemesterStatsPass<'a> {
    pub fn new(state: &'a CalendarState) -> Self {
        Self { state }
    }

    pub fn execute(&self, today: NaiveDate) -> SemesterStats {
        let semester = &self.state.semester;
        let mut stats = SemesterStats::default();

        for date in days_in_range(semester.start_date, semester.end_date) {
            if !self.state.is_class_day(date) {
                continue;
            }
            if self.state.day_mark_for(date).all_day_free {
                stats.free_days += 1;
                continue;
            }
            for class in self.state.classes_on_date(date) {
                stats.total_class_days += 1;
                match self.state.class_status(date, &class.code) {
                    ClassStatus::Absence => stats.total_absences += 1,
                    ClassStatus::Regular if date >= today => stats.available_class_days += 1,
                    ClassStatus::Regular | ClassStatus::Free => {}
                }
            }
        }
        stats
    }
}

impl CalendarState {
    pub fn semester_stats(&self, today: NaiveDate) -> SemesterStats {
        SemesterStatsPass::new(self).execute(today)
    }
}
