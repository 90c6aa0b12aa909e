use crate::calendar::calendar_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassStatus {
    Regular,
    Absence,
    Free,
}

impl ClassStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassStatus::Regular => "regular",
            ClassStatus::Absence => "absence",
            ClassStatus::Free => "free",
        }
    }
}

impl fmt::Display for ClassStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseMarkError {
    kind: &'static str,
    value: String,
}

impl ParseMarkError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl FromStr for ClassStatus {
    type Err = ParseMarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "regular" => Ok(ClassStatus::Regular),
            "absence" | "absent" => Ok(ClassStatus::Absence),
            "free" => Ok(ClassStatus::Free),
            other => Err(ParseMarkError::new("class status", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassMark {
    pub class_code: String,
    pub status: ClassStatus,
}

impl ClassMark {
    pub fn new(class_code: impl Into<String>, status: ClassStatus) -> Self {
        Self {
            class_code: class_code.into(),
            status,
        }
    }
}

/// Sparse override for one calendar day. A date without a `DayMark` behaves
/// as if every scheduled class were `regular`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayMark {
    #[serde(with = "calendar_date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub class_marks: Vec<ClassMark>,
    #[serde(default)]
    pub all_day_free: bool,
}

impl DayMark {
    /// Build a mark, keeping only the first entry for each class code.
    pub fn new(date: NaiveDate, class_marks: Vec<ClassMark>, all_day_free: bool) -> Self {
        let mut unique: Vec<ClassMark> = Vec::with_capacity(class_marks.len());
        for mark in class_marks {
            if !unique.iter().any(|m| m.class_code == mark.class_code) {
                unique.push(mark);
            }
        }
        Self {
            date,
            class_marks: unique,
            all_day_free,
        }
    }

    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            class_marks: Vec::new(),
            all_day_free: false,
        }
    }

    /// False when the mark is indistinguishable from having no mark at all.
    pub fn carries_information(&self) -> bool {
        self.all_day_free
            || self
                .class_marks
                .iter()
                .any(|mark| mark.status != ClassStatus::Regular)
    }

    /// Status recorded for `class_code`, ignoring the all-day flag.
    pub fn recorded_status(&self, class_code: &str) -> Option<ClassStatus> {
        self.class_marks
            .iter()
            .find(|mark| mark.class_code == class_code)
            .map(|mark| mark.status)
    }

    /// Bulk mode a day editor would open in for the given class codes.
    pub fn mode<'a, I>(&self, class_codes: I) -> DayMode
    where
        I: IntoIterator<Item = &'a str>,
    {
        if self.all_day_free {
            return DayMode::AllFree;
        }
        let mut statuses = class_codes
            .into_iter()
            .map(|code| self.recorded_status(code).unwrap_or(ClassStatus::Regular));
        let Some(first) = statuses.next() else {
            return DayMode::Individual;
        };
        if statuses.any(|status| status != first) {
            return DayMode::Individual;
        }
        match first {
            ClassStatus::Regular => DayMode::AllRegular,
            ClassStatus::Absence => DayMode::AllAbsence,
            ClassStatus::Free => DayMode::AllFree,
        }
    }
}

/// Bulk controls for editing a whole day at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DayMode {
    Individual,
    AllRegular,
    AllAbsence,
    AllFree,
}

impl DayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayMode::Individual => "individual",
            DayMode::AllRegular => "all-regular",
            DayMode::AllAbsence => "all-absence",
            DayMode::AllFree => "all-free",
        }
    }

    pub fn bulk_status(&self) -> Option<ClassStatus> {
        match self {
            DayMode::Individual => None,
            DayMode::AllRegular => Some(ClassStatus::Regular),
            DayMode::AllAbsence => Some(ClassStatus::Absence),
            DayMode::AllFree => Some(ClassStatus::Free),
        }
    }
}

impl FromStr for DayMode {
    type Err = ParseMarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "individual" => Ok(DayMode::Individual),
            "all-regular" | "regular" => Ok(DayMode::AllRegular),
            "all-absence" | "absence" => Ok(DayMode::AllAbsence),
            "all-free" | "free" => Ok(DayMode::AllFree),
            other => Err(ParseMarkError::new("day mode", other)),
        }
    }
}
