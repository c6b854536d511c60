use super::period::PeriodKey;
use std::collections::HashMap;

/// Period-indexed accessor over the stored rows of one (kpi, scope) pair.
/// Absent periods and null values both read as `None`; "not measured" is
/// distinct from zero and never coerced to it.
#[derive(Debug, Default, Clone)]
pub struct SeriesLookup {
    values: HashMap<PeriodKey, Option<f64>>,
}

impl SeriesLookup {
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (PeriodKey, Option<String>)>,
    {
        let mut lookup = Self::default();
        for (period, raw) in rows {
            lookup.insert(period, raw.as_deref());
        }
        lookup
    }

    /// Records one stored value. Re-inserting a period replaces the earlier
    /// reading, matching upsert corrections of already-past months.
    pub fn insert(&mut self, period: PeriodKey, raw: Option<&str>) {
        self.values.insert(period, raw.and_then(parse_decimal));
    }

    pub fn value(&self, period: PeriodKey) -> Option<f64> {
        self.values.get(&period).copied().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Coerces a raw decimal serialization to a finite number. Blank strings and
/// anything that parses to NaN or an infinity read as `None` so downstream
/// arithmetic never sees a non-finite value.
pub(crate) fn parse_decimal(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}
