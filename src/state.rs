use crate::class::Class;
use crate::mark::DayMark;
use crate::semester::SemesterConfig;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The whole persisted unit. Read and written atomically as one blob.
///
/// Marks are keyed by calendar day; on the wire they are an ordered list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarState {
    pub semester: SemesterConfig,
    pub classes: Vec<Class>,
    #[serde(with = "marks_as_list")]
    pub marks: BTreeMap<NaiveDate, DayMark>,
}

impl CalendarState {
    pub fn new(semester: SemesterConfig) -> Self {
        Self {
            semester,
            classes: Vec::new(),
            marks: BTreeMap::new(),
        }
    }

    /// Structural default: no classes, no marks, empty weekly schedule and
    /// the default semester window around `today`.
    pub fn default_for(today: NaiveDate) -> Self {
        Self::new(SemesterConfig::default_for(today))
    }

    pub fn find_class(&self, code: &str) -> Option<&Class> {
        self.classes.iter().find(|class| class.code == code)
    }

    pub fn marks(&self) -> impl Iterator<Item = &DayMark> {
        self.marks.values()
    }
}

mod marks_as_list {
    use crate::mark::DayMark;
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S>(marks: &BTreeMap<NaiveDate, DayMark>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let list: Vec<&DayMark> = marks.values().collect();
        list.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeMap<NaiveDate, DayMark>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let list = Vec::<DayMark>::deserialize(deserializer)?;
        Ok(list.into_iter().map(|mark| (mark.date, mark)).collect())
    }
}
