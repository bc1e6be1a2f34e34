//! Bucket partitioner: splits a date-sorted run of bookmarks into calendar buckets.
//!
//! Pure functions, no I/O. Every partition is stable: items keep their input
//! order inside a bucket. Calendar fields are read in local time.

use chrono::{DateTime, Datelike, Local, TimeZone};

use crate::types::bookmark::BookmarkNode;
use crate::types::bucket::{Bucket, Granularity, Season, MONTH_NAMES};

/// Local date-time of a millisecond timestamp, falling back to epoch when out of range.
fn local_time(ms: i64) -> DateTime<Local> {
    Local
        .timestamp_millis_opt(ms)
        .earliest()
        .unwrap_or_default()
}

/// Timestamp the calendar fields are derived from: the stored value, or 0 when
/// it is missing or outside the representable range. Sort on this key so the
/// ordering agrees with `year_of` and `month_of`.
pub fn date_key(item: &BookmarkNode) -> i64 {
    let ms = item.date_added_ms();
    match Local.timestamp_millis_opt(ms).earliest() {
        Some(_) => ms,
        None => 0,
    }
}

/// Calendar year the item was added in.
pub fn year_of(item: &BookmarkNode) -> i32 {
    local_time(date_key(item)).year()
}

/// Zero-based calendar month (0 = January) the item was added in.
pub fn month_of(item: &BookmarkNode) -> u32 {
    local_time(date_key(item)).month0()
}

/// One bucket per year from the earliest to the latest year among `items`,
/// inclusive, including years nobody bookmarked anything in.
///
/// `items` are expected sorted by `date_key` so each bucket keeps date order;
/// the year range is taken over every item either way. An empty input yields
/// no buckets.
pub fn partition_by_year(items: &[BookmarkNode]) -> Vec<Bucket> {
    let years: Vec<i32> = items.iter().map(year_of).collect();
    let (Some(&min_year), Some(&max_year)) = (years.iter().min(), years.iter().max()) else {
        return Vec::new();
    };

    let mut buckets: Vec<Bucket> = (min_year..=max_year)
        .map(|year| Bucket::new(year.to_string(), Granularity::Year))
        .collect();

    for (item, year) in items.iter().zip(years) {
        buckets[(year - min_year) as usize].items.push(item.clone());
    }
    buckets
}

/// Winter, Spring, Summer, Autumn in that fixed order, skipping empty seasons.
pub fn partition_by_season(items: &[BookmarkNode]) -> Vec<Bucket> {
    let mut buckets: Vec<Bucket> = Season::ALL
        .iter()
        .map(|season| Bucket::new(season.name(), Granularity::Season))
        .collect();

    for item in items {
        let month = month_of(item);
        if let Some(slot) = Season::ALL.iter().position(|season| season.contains(month)) {
            buckets[slot].items.push(item.clone());
        }
    }

    buckets.retain(|bucket| !bucket.is_empty());
    buckets
}

/// Calendar-ordered month buckets, starting at the earliest populated month.
///
/// Months before the first populated one are never considered; inside the
/// remaining range only populated months are emitted.
pub fn partition_by_month(items: &[BookmarkNode]) -> Vec<Bucket> {
    let mut buckets: Vec<Bucket> = MONTH_NAMES
        .iter()
        .map(|name| Bucket::new(*name, Granularity::Month))
        .collect();

    let mut first_month = MONTH_NAMES.len();
    for item in items {
        let month = month_of(item) as usize;
        buckets[month].items.push(item.clone());
        first_month = first_month.min(month);
    }

    buckets
        .into_iter()
        .skip(first_month)
        .filter(|bucket| !bucket.is_empty())
        .collect()
}

/// Dispatches to the partition function for `granularity`.
pub fn partition(granularity: Granularity, items: &[BookmarkNode]) -> Vec<Bucket> {
    match granularity {
        Granularity::Year => partition_by_year(items),
        Granularity::Season => partition_by_season(items),
        Granularity::Month => partition_by_month(items),
    }
}
