use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// Calendar-month key. Ordering is chronological and matches the ordering of
/// the rendered `YYYY-MM` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeriodKey {
    year: i32,
    month: u32,
}

/// Raised when a period string does not have the `YYYY-MM` shape with a
/// month in `01..=12`. Rejected at the request boundary; the evaluation core
/// only ever sees well-formed keys.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid period '{input}': expected YYYY-MM with month 01-12")]
pub struct InvalidPeriodFormat {
    pub input: String,
}

impl PeriodKey {
    pub fn new(year: i32, month: u32) -> Result<Self, InvalidPeriodFormat> {
        if (1..=12).contains(&month) {
            Ok(Self { year, month })
        } else {
            Err(InvalidPeriodFormat {
                input: format!("{year:04}-{month:02}"),
            })
        }
    }

    pub const fn year(self) -> i32 {
        self.year
    }

    pub const fn month(self) -> u32 {
        self.month
    }

    /// Month containing `date`. Call sites that default the period to "now"
    /// compute the date themselves; the engine never reads the clock.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The key `delta` months away, rolling over year boundaries in either
    /// direction.
    pub fn add_months(self, delta: i32) -> Self {
        let total = i64::from(self.year) * 12 + i64::from(self.month) - 1 + i64::from(delta);
        Self {
            year: total.div_euclid(12) as i32,
            month: (total.rem_euclid(12) + 1) as u32,
        }
    }

    /// January of this key's year.
    pub const fn year_start(self) -> Self {
        Self {
            year: self.year,
            month: 1,
        }
    }

    /// Ordered months from `from` to `to` inclusive; empty when `from > to`.
    pub fn range_inclusive(from: Self, to: Self) -> PeriodRange {
        PeriodRange {
            next: Some(from),
            end: to,
        }
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for PeriodKey {
    type Err = InvalidPeriodFormat;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidPeriodFormat {
            input: value.to_string(),
        };

        let bytes = value.as_bytes();
        if bytes.len() != 7 || bytes[4] != b'-' {
            return Err(invalid());
        }
        if !bytes[..4].iter().all(u8::is_ascii_digit) || !bytes[5..].iter().all(u8::is_ascii_digit)
        {
            return Err(invalid());
        }

        let year = value[..4].parse::<i32>().map_err(|_| invalid())?;
        let month = value[5..].parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

/// Lazy iterator over an inclusive month range. Cloning restarts the walk.
#[derive(Debug, Clone)]
pub struct PeriodRange {
    next: Option<PeriodKey>,
    end: PeriodKey,
}

impl Iterator for PeriodRange {
    type Item = PeriodKey;

    fn next(&mut self) -> Option<PeriodKey> {
        let current = self.next?;
        if current > self.end {
            self.next = None;
            return None;
        }
        self.next = Some(current.add_months(1));
        Some(current)
    }
}
