//! Declarative date intervals.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Date filter applied to the composition's date column.
///
/// Wire form: `{"unit": "day", "value": 30}` or
/// `{"unit": "range", "value": {"start": "...", "end": "..."}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "value", rename_all = "lowercase")]
pub enum Interval {
    /// Rolling window of the last N days.
    Day(serde_json::Number),
    /// Inclusive calendar-day bounds.
    Range(DateRange),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl Interval {
    pub fn days(n: u64) -> Self {
        Interval::Day(n.into())
    }

    pub fn range(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        Interval::Range(DateRange { start, end })
    }
}
