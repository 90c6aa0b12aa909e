use chrono::{Datelike, Local, NaiveDate, Weekday};

pub const ALL_WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Lower-case English weekday name, as used for the week schedule keys.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// Parse a weekday from its full or three-letter English name, ignoring case.
pub fn parse_weekday(input: &str) -> Option<Weekday> {
    let lowered = input.trim().to_ascii_lowercase();
    ALL_WEEKDAYS.into_iter().find(|day| {
        let name = weekday_name(*day);
        lowered == name || (lowered.len() == 3 && name.starts_with(lowered.as_str()))
    })
}

/// Today's calendar day in the local zone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a persisted date. Accepts `YYYY-MM-DD` as well as full ISO
/// timestamps, which are truncated to the calendar day written in the
/// string (no zone conversion).
pub fn parse_calendar_day(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    let (day_part, rest) = (trimmed.get(..10)?, trimmed.get(10..)?);
    if !(rest.starts_with('T') || rest.starts_with(' ')) {
        return None;
    }
    NaiveDate::parse_from_str(day_part, "%Y-%m-%d").ok()
}

pub fn format_calendar_day(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Inclusive iterator over every calendar day from `start` to `end`.
/// Yields nothing when `start > end`.
#[derive(Debug, Clone)]
pub struct DateRange {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for DateRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        if current > self.end {
            self.next = None;
            return None;
        }
        self.next = current.succ_opt();
        Some(current)
    }
}

pub fn days_in_range(start: NaiveDate, end: NaiveDate) -> DateRange {
    DateRange {
        next: Some(start),
        end,
    }
}

/// Semester window suggested for a fresh install: January to June during the
/// first half of the year, otherwise August to December (July already shows
/// the upcoming semester).
pub fn default_semester_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let year = today.year();
    let (start, end) = if today.month() <= 6 {
        ((1, 1), (6, 30))
    } else {
        ((8, 1), (12, 31))
    };
    let start = NaiveDate::from_ymd_opt(year, start.0, start.1).unwrap_or(today);
    let end = NaiveDate::from_ymd_opt(year, end.0, end.1).unwrap_or(today);
    (start, end)
}

/// Serde adapter for calendar-day fields: writes `YYYY-MM-DD`, reads either
/// that or an ISO timestamp.
pub mod calendar_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_calendar_day(*date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_calendar_day(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid calendar date '{raw}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parses_plain_dates_and_timestamps() {
        assert_eq!(parse_calendar_day("2025-03-10"), Some(d(2025, 3, 10)));
        assert_eq!(
            parse_calendar_day("2025-03-10T23:30:00.000Z"),
            Some(d(2025, 3, 10))
        );
        assert_eq!(
            parse_calendar_day("2025-03-10 08:00:00"),
            Some(d(2025, 3, 10))
        );
        assert_eq!(parse_calendar_day("2025-03-10X"), None);
        assert_eq!(parse_calendar_day("10/03/2025"), None);
        assert_eq!(parse_calendar_day(""), None);
    }

    #[test]
    fn weekday_names_round_trip() {
        for day in ALL_WEEKDAYS {
            assert_eq!(parse_weekday(weekday_name(day)), Some(day));
        }
        assert_eq!(parse_weekday("Tue"), Some(Weekday::Tue));
        assert_eq!(parse_weekday("SUNDAY"), Some(Weekday::Sun));
        assert_eq!(parse_weekday("mo"), None);
    }

    #[test]
    fn date_range_is_inclusive_and_empty_when_reversed() {
        let days: Vec<_> = days_in_range(d(2025, 1, 30), d(2025, 2, 2)).collect();
        assert_eq!(days.len(), 4);
        assert_eq!(days.first().copied(), Some(d(2025, 1, 30)));
        assert_eq!(days.last().copied(), Some(d(2025, 2, 2)));

        assert_eq!(days_in_range(d(2025, 2, 2), d(2025, 2, 1)).count(), 0);
        assert_eq!(days_in_range(d(2025, 2, 2), d(2025, 2, 2)).count(), 1);
    }

    #[test]
    fn default_window_follows_half_of_year() {
        assert_eq!(
            default_semester_window(d(2025, 3, 15)),
            (d(2025, 1, 1), d(2025, 6, 30))
        );
        assert_eq!(
            default_semester_window(d(2025, 7, 4)),
            (d(2025, 8, 1), d(2025, 12, 31))
        );
        assert_eq!(
            default_semester_window(d(2025, 10, 1)),
            (d(2025, 8, 1), d(2025, 12, 31))
        );
    }
}
