//! Entry search and ordering.
//!
//! Both operations are total: they accept any slice, including an empty one,
//! and never reorder entries beyond what the requested sort demands.

use super::dates::DatePattern;
use super::{JournalEntry, SortOrder};
use caseless::Caseless;
use chrono::{Datelike, NaiveDateTime};
use unicode_normalization::UnicodeNormalization;

/// Returns the entries whose title, content or date matches `query`.
///
/// An empty query returns every entry in input order. Otherwise an entry is
/// kept when its title or content contains the query ignoring case, or when
/// [`matches_date`] accepts its date. Text is compared after Unicode case
/// folding and NFC normalization, so a decomposed Hangul query finds composed
/// text and `STRASSE` finds `Straße`. Input order is preserved; nothing is
/// ranked or truncated.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use daybook::journal_core::{query::search, JournalEntry};
///
/// let date = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap().and_hms_opt(9, 0, 0).unwrap();
/// let entries = vec![JournalEntry::new("여행", "부산에 다녀왔다", date)];
///
/// assert_eq!(search(&entries, "2025년 7월").len(), 1);
/// assert!(search(&entries, "8").is_empty());
/// ```
pub fn search<'a>(entries: &'a [JournalEntry], query: &str) -> Vec<&'a JournalEntry> {
    if query.is_empty() {
        return entries.iter().collect();
    }

    let needle = fold(query);
    entries
        .iter()
        .filter(|entry| {
            contains_folded(&entry.title, &needle)
                || contains_folded(&entry.content, &needle)
                || matches_date(entry.date, query)
        })
        .collect()
}

/// Tests whether `query` describes `date`.
///
/// The date is rendered through every [`DatePattern::SEARCHABLE`] pattern and
/// the query is looked for in each rendering, ignoring case. A query that is
/// exactly the year, month or day number (`"2025"`, `"7"`, `"4"`) also
/// matches; those three checks are equality, not containment.
pub fn matches_date(date: NaiveDateTime, query: &str) -> bool {
    let needle = fold(query);
    let day = date.date();

    if DatePattern::SEARCHABLE
        .iter()
        .any(|pattern| contains_folded(&pattern.render(day), &needle))
    {
        return true;
    }

    needle == day.year().to_string()
        || needle == day.month().to_string()
        || needle == day.day().to_string()
}

/// Stable sort by date: newest first for [`SortOrder::Newest`], oldest first
/// for [`SortOrder::Oldest`]. Entries sharing a timestamp keep their relative
/// input order, so repeated calls never shuffle them.
pub fn apply_sort_order<'a>(
    entries: &[&'a JournalEntry],
    order: SortOrder,
) -> Vec<&'a JournalEntry> {
    let mut sorted = entries.to_vec();
    match order {
        SortOrder::Newest => sorted.sort_by(|a, b| b.date.cmp(&a.date)),
        SortOrder::Oldest => sorted.sort_by(|a, b| a.date.cmp(&b.date)),
    }
    sorted
}

/// Canonical caseless form: decompose, case fold, then recompose.
fn fold(text: &str) -> String {
    text.nfd().default_case_fold().nfc().collect()
}

fn contains_folded(haystack: &str, folded_needle: &str) -> bool {
    fold(haystack).contains(folded_needle)
}
