//! Month grouping and summary statistics.

use super::dates::format_month_label;
use super::query::apply_sort_order;
use super::{JournalEntry, SortOrder};
use crate::constants::STREAK_TOLERANCE_DAYS;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use std::fmt;

/// Calendar year and month an entry belongs to.
///
/// Ordering compares the year first, then the month, so keys sort
/// chronologically across year boundaries regardless of how their labels
/// would sort as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        MonthKey {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Section header label (`2025년 7월`).
    pub fn label(&self) -> String {
        format_month_label(self.year, self.month)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Entries that share a calendar month, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthGroup<'a> {
    pub key: MonthKey,
    pub label: String,
    pub entries: Vec<&'a JournalEntry>,
}

/// Summary figures shown above the entry list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EntryStatistics {
    /// Number of entries.
    pub total_entries: usize,
    /// Sum of content lengths in characters. Not a whitespace word count.
    pub total_words: usize,
    /// Current writing streak, see [`streak`].
    pub streak: usize,
}

/// Buckets entries by calendar month.
///
/// Groups come most recent month first. Inside each group the entries are
/// re-sorted with `order`, independently of the order they arrived in.
pub fn group_by_month<'a>(entries: &[&'a JournalEntry], order: SortOrder) -> Vec<MonthGroup<'a>> {
    let mut buckets: BTreeMap<MonthKey, Vec<&'a JournalEntry>> = BTreeMap::new();
    for entry in entries {
        buckets
            .entry(MonthKey::of(entry.date.date()))
            .or_default()
            .push(*entry);
    }

    buckets
        .into_iter()
        .rev()
        .map(|(key, members)| MonthGroup {
            key,
            label: key.label(),
            entries: apply_sort_order(&members, order),
        })
        .collect()
}

/// Computes entry count, character count and streak for `entries`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use daybook::journal_core::{aggregate::statistics, JournalEntry};
///
/// let day = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap().and_hms_opt(9, 0, 0).unwrap();
/// let a = JournalEntry::new("a", "x".repeat(12), day);
/// let b = JournalEntry::new("b", "y".repeat(55), day);
///
/// let stats = statistics(&[&a, &b]);
/// assert_eq!(stats.total_entries, 2);
/// assert_eq!(stats.total_words, 67);
/// assert_eq!(stats.streak, 2);
/// ```
pub fn statistics(entries: &[&JournalEntry]) -> EntryStatistics {
    EntryStatistics {
        total_entries: entries.len(),
        total_words: entries.iter().map(|entry| entry.char_count()).sum(),
        streak: streak(entries),
    }
}

/// Length of the most recent run of entries written close together.
///
/// Entries are ordered newest first and compared pairwise by calendar day.
/// Each pair at most [`STREAK_TOLERANCE_DAYS`] apart extends the run; the
/// first wider gap ends it. Returns 0 for no entries and 1 for a single entry.
pub fn streak(entries: &[&JournalEntry]) -> usize {
    if entries.is_empty() {
        return 0;
    }

    let newest_first = apply_sort_order(entries, SortOrder::Newest);
    let days: Vec<NaiveDate> = newest_first.iter().map(|entry| entry.date.date()).collect();

    let mut count = 1;
    for pair in days.windows(2) {
        let gap = pair[0].signed_duration_since(pair[1]).num_days();
        if gap <= STREAK_TOLERANCE_DAYS {
            count += 1;
        } else {
            break;
        }
    }
    count
}
