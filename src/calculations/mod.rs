pub mod class_stats;
pub mod semester_stats;

pub use class_stats::{ClassStats, ClassStatsPass};
pub use semester_stats::{SemesterStats, SemesterStatsPass};
