//! Korean (ko_KR) calendar renderings.
//!
//! Search, month grouping and export all describe dates the way the diary's
//! user reads them: `2025년 7월 4일`, `금요일`, `오후 3:05`. These helpers are
//! table driven so the same renderings are used everywhere.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};

/// Full weekday names, indexed by days from Monday.
const WEEKDAY_NAMES: [&str; 7] = [
    "월요일", "화요일", "수요일", "목요일", "금요일", "토요일", "일요일",
];

/// Abbreviated weekday names, indexed by days from Monday.
const WEEKDAY_ABBREVIATIONS: [&str; 7] = ["월", "화", "수", "목", "금", "토", "일"];

/// Returns the full Korean name of a weekday (`화요일`).
pub fn weekday_name(weekday: Weekday) -> &'static str {
    WEEKDAY_NAMES[weekday.num_days_from_monday() as usize]
}

/// Returns the one-syllable Korean abbreviation of a weekday (`화`).
pub fn weekday_abbreviation(weekday: Weekday) -> &'static str {
    WEEKDAY_ABBREVIATIONS[weekday.num_days_from_monday() as usize]
}

/// A fixed way of rendering a calendar date as text.
///
/// The variants mirror the date formats a diary writer is likely to type into
/// a search box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePattern {
    /// `2025년 7월 1일`
    LongDate,
    /// `2025-07-01`
    IsoDate,
    /// `7월 1일`
    MonthDay,
    /// `2025년 7월`
    YearMonth,
    /// `7월`
    Month,
    /// `2025년`
    Year,
    /// `2025.7.1`
    DottedDate,
    /// `25.7.1`
    ShortDottedDate,
    /// `화요일`
    WeekdayName,
    /// `화`
    WeekdayAbbreviation,
}

impl DatePattern {
    /// Every pattern consulted by date search, in the order they are tried.
    pub const SEARCHABLE: [DatePattern; 10] = [
        DatePattern::LongDate,
        DatePattern::IsoDate,
        DatePattern::MonthDay,
        DatePattern::YearMonth,
        DatePattern::Month,
        DatePattern::Year,
        DatePattern::DottedDate,
        DatePattern::ShortDottedDate,
        DatePattern::WeekdayName,
        DatePattern::WeekdayAbbreviation,
    ];

    /// Renders `date` with this pattern.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use daybook::journal_core::dates::DatePattern;
    ///
    /// let date = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
    /// assert_eq!(DatePattern::LongDate.render(date), "2025년 7월 1일");
    /// assert_eq!(DatePattern::ShortDottedDate.render(date), "25.7.1");
    /// assert_eq!(DatePattern::WeekdayName.render(date), "화요일");
    /// ```
    pub fn render(self, date: NaiveDate) -> String {
        let (year, month, day) = (date.year(), date.month(), date.day());
        match self {
            DatePattern::LongDate => format!("{}년 {}월 {}일", year, month, day),
            DatePattern::IsoDate => format!("{:04}-{:02}-{:02}", year, month, day),
            DatePattern::MonthDay => format!("{}월 {}일", month, day),
            DatePattern::YearMonth => format_month_label(year, month),
            DatePattern::Month => format!("{}월", month),
            DatePattern::Year => format!("{}년", year),
            DatePattern::DottedDate => format!("{}.{}.{}", year, month, day),
            DatePattern::ShortDottedDate => {
                format!("{:02}.{}.{}", year.rem_euclid(100), month, day)
            }
            DatePattern::WeekdayName => weekday_name(date.weekday()).to_string(),
            DatePattern::WeekdayAbbreviation => weekday_abbreviation(date.weekday()).to_string(),
        }
    }
}

/// Formats a year and month as a section header label (`2025년 7월`).
pub fn format_month_label(year: i32, month: u32) -> String {
    format!("{}년 {}월", year, month)
}

/// Formats a date with its weekday, as shown on an entry's detail page
/// (`2025년 7월 4일 금요일`).
pub fn format_long_date(date: NaiveDate) -> String {
    format!(
        "{} {}",
        DatePattern::LongDate.render(date),
        weekday_name(date.weekday())
    )
}

/// Formats a time the way the ko_KR short time style does (`오후 3:05`).
pub fn format_time(datetime: NaiveDateTime) -> String {
    let (is_pm, hour) = datetime.hour12();
    let meridiem = if is_pm { "오후" } else { "오전" };
    format!("{} {}:{:02}", meridiem, hour, datetime.minute())
}
