use crate::calendar::days_in_range;
use crate::class::Class;
use crate::mark::ClassStatus;
use crate::semester::{PercentageColorConfig, ThresholdBand};
use crate::state::CalendarState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassStats {
    pub code: String,
    pub name: String,
    pub weight: f64,
    pub remaining_percentage: f64,
    pub absence_count: usize,
    pub free_count: usize,
    pub total_days: usize,
}

impl ClassStats {
    fn start(class: &Class) -> Self {
        Self {
            code: class.code.clone(),
            name: class.name.clone(),
            weight: class.weight,
            remaining_percentage: 100.0,
            absence_count: 0,
            free_count: 0,
            total_days: 0,
        }
    }

    pub fn band(&self, colors: &PercentageColorConfig) -> ThresholdBand {
        colors.classify(self.remaining_percentage)
    }
}

/// Per-class remaining attendance. Each absence costs the class weight; free
/// days and free classes cost nothing. Results are ordered by class code.
pub struct ClassStatsPass<'a> {
    state: &'a CalendarState,
}

impl<'a> ClassStatsPass<'a> {
    pub fn new(state: &'a CalendarState) -> Self {
        Self { state }
    }

    pub fn execute(&self) -> Vec<ClassStats> {
        let semester = &self.state.semester;
        let mut by_code: BTreeMap<&str, ClassStats> = BTreeMap::new();
        for class in &self.state.classes {
            by_code
                .entry(class.code.as_str())
                .or_insert_with(|| ClassStats::start(class));
        }

        for date in days_in_range(semester.start_date, semester.end_date) {
            let mut meeting = self.state.classes_on_date(date);
            if meeting.is_empty() {
                continue;
            }
            // a code listed twice in one day still meets once
            meeting.sort_by(|a, b| a.code.cmp(&b.code));
            meeting.dedup_by(|a, b| a.code == b.code);

            let all_day_free = self.state.day_mark_for(date).all_day_free;
            for class in meeting {
                let Some(stats) = by_code.get_mut(class.code.as_str()) else {
                    continue;
                };
                stats.total_days += 1;
                if all_day_free {
                    stats.free_count += 1;
                    continue;
                }
                match self.state.class_status(date, &class.code) {
                    ClassStatus::Absence => {
                        stats.remaining_percentage -= stats.weight;
                        stats.absence_count += 1;
                    }
                    ClassStatus::Free => stats.free_count += 1,
                    ClassStatus::Regular => {}
                }
            }
        }

        by_code
            .into_values()
            .map(|mut stats| {
                stats.remaining_percentage = stats.remaining_percentage.max(0.0);
                stats
            })
            .collect()
    }
}

impl CalendarState {
    pub fn class_stats(&self) -> Vec<ClassStats> {
        ClassStatsPass::new(self).execute()
    }
}
