use serde::{Deserialize, Serialize};

use super::bookmark::BookmarkNode;

/// Calendar level a bucket was cut at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Year,
    Season,
    Month,
}

/// Meteorological seasons, in the fixed order their folders are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Autumn];

    /// Zero-based calendar months (0 = January) belonging to the season.
    pub fn months(self) -> [u32; 3] {
        match self {
            Season::Winter => [11, 0, 1],
            Season::Spring => [2, 3, 4],
            Season::Summer => [5, 6, 7],
            Season::Autumn => [8, 9, 10],
        }
    }

    pub fn contains(self, month0: u32) -> bool {
        self.months().contains(&month0)
    }

    pub fn name(self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
        }
    }
}

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A transient group of items that becomes exactly one folder.
#[derive(Debug, Clone)]
pub struct Bucket {
    pub label: String,
    pub granularity: Granularity,
    pub items: Vec<BookmarkNode>,
}

impl Bucket {
    pub fn new(label: impl Into<String>, granularity: Granularity) -> Self {
        Self {
            label: label.into(),
            granularity,
            items: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item ids in bucket order.
    pub fn item_ids(&self) -> Vec<&str> {
        self.items.iter().map(|n| n.id.as_str()).collect()
    }
}
