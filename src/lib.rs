pub mod attendance;
pub mod calculations;
pub mod calendar;
pub mod class;
pub mod config;
pub mod mark;
pub mod migration;
pub mod mutation;
pub mod persistence;
pub mod semester;
pub mod session;
pub mod state;

pub use calculations::{ClassStats, SemesterStats};
pub use class::Class;
pub use config::AppConfig;
pub use mark::{ClassMark, ClassStatus, DayMark, DayMode, ParseMarkError};
pub use migration::{Migrated, MigrationError, MigrationReport, migrate};
pub use mutation::Mutation;
pub use persistence::{CalendarStore, JsonFileStore, MemoryStore, PersistenceError};
#[cfg(feature = "sqlite")]
pub use persistence::SqliteCalendarStore;
pub use semester::{DaySchedule, PercentageColorConfig, SemesterConfig, ThresholdBand, WeekSchedule};
pub use session::{Session, StateSource};
pub use state::CalendarState;
