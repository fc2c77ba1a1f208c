//! Interval compiler: date intervals to `WHERE` fragments.

use std::str::FromStr;

use chrono::{DateTime, Datelike, FixedOffset, Local, NaiveDate, Offset, Utc};

use super::CompileOptions;
use crate::model::Interval;
use crate::sql::token::format_number;
use crate::sql::{Token, TokenStream};

/// Zone used to take the calendar date of a range bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateZone {
    /// The process-local zone.
    #[default]
    Local,
    Fixed(FixedOffset),
}

impl DateZone {
    pub fn utc() -> Self {
        DateZone::Fixed(Utc.fix())
    }

    pub fn date_of(&self, instant: &DateTime<FixedOffset>) -> NaiveDate {
        match self {
            DateZone::Local => instant.with_timezone(&Local).date_naive(),
            DateZone::Fixed(offset) => instant.with_timezone(offset).date_naive(),
        }
    }
}

impl FromStr for DateZone {
    type Err = String;

    /// Accepts `local`, `utc`, or an offset such as `+05:30`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(DateZone::Local),
            "utc" | "z" => Ok(DateZone::utc()),
            other => other
                .parse::<FixedOffset>()
                .map(DateZone::Fixed)
                .map_err(|e| format!("invalid timezone '{}': {}", s, e)),
        }
    }
}

/// Unpadded `Y-M-D`.
fn calendar_date(date: NaiveDate) -> String {
    format!("{}-{}-{}", date.year(), date.month(), date.day())
}

/// Compile an interval against `options.date_column`.
///
/// `None` yields an empty stream.
pub fn compile_interval(interval: Option<&Interval>, options: &CompileOptions) -> TokenStream {
    let mut ts = TokenStream::new();
    let column = Token::ColumnRef(options.date_column.clone());

    match interval {
        None => {}
        Some(Interval::Day(days)) => {
            ts.push(column)
                .space()
                .push(Token::Gte)
                .space()
                .push(Token::CurrentTimestamp)
                .space()
                .push(Token::Minus)
                .space()
                .push(Token::Interval)
                .space()
                .push(Token::LitInline(format!("{} day", format_number(days))));
        }
        Some(Interval::Range(range)) => {
            let start = calendar_date(options.date_zone.date_of(&range.start));
            let end = calendar_date(options.date_zone.date_of(&range.end));
            ts.push(column.clone())
                .space()
                .push(Token::Gte)
                .space()
                .push(Token::LitInline(start))
                .space()
                .push(Token::LowerAnd)
                .space()
                .push(column)
                .space()
                .push(Token::Lte)
                .space()
                .push(Token::LitInline(end));
        }
    }
    ts
}
