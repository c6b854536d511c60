use super::domain::KpiBasis;
use super::lookup::SeriesLookup;
use super::period::PeriodKey;

const RATE_UNIT_MARKERS: [&str; 4] = ["%", "pp", "pct", "porc"];

/// A unit is rate-like when averaging across months keeps its meaning; a
/// trailing sum of percentages has none. Matched case-insensitively against
/// the markers the measurement templates use, Spanish spellings included.
pub fn is_rate_like_unit(unit: Option<&str>) -> bool {
    let Some(unit) = unit else {
        return false;
    };
    let unit = unit.to_lowercase();
    RATE_UNIT_MARKERS.iter().any(|marker| unit.contains(marker))
}

/// Rolls the series up into the single evaluated figure for `period`.
///
/// ANNUAL takes the mean of the measured months from January of the period's
/// year through the period. TRAILING12 looks back over the 12-month window
/// ending at the period: the mean for rate-like units, the sum for absolute
/// ones. A window with no measurements evaluates to `None`; gaps are skipped,
/// never padded with zero.
///
/// Pure in the series: callable for any period against the same lookup, which
/// is how aligned evaluated series are rebuilt month by month.
pub fn evaluated_value(
    period: PeriodKey,
    basis: KpiBasis,
    unit: Option<&str>,
    lookup: &SeriesLookup,
) -> Option<f64> {
    match basis {
        KpiBasis::Annual => mean(&window_values(period.year_start(), period, lookup)),
        KpiBasis::Trailing12 => {
            let values = window_values(period.add_months(-11), period, lookup);
            if is_rate_like_unit(unit) {
                mean(&values)
            } else {
                sum(&values)
            }
        }
    }
}

/// Evaluated figures aligned 1:1 with `months`.
pub fn evaluated_series(
    months: &[PeriodKey],
    basis: KpiBasis,
    unit: Option<&str>,
    lookup: &SeriesLookup,
) -> Vec<Option<f64>> {
    months
        .iter()
        .map(|period| evaluated_value(*period, basis, unit, lookup))
        .collect()
}

/// Earliest period a caller must fetch so that every point of a displayed
/// window starting at `window_start` evaluates against complete history,
/// whichever basis applies.
pub fn fetch_floor(window_start: PeriodKey) -> PeriodKey {
    window_start.year_start().min(window_start.add_months(-11))
}

fn window_values(from: PeriodKey, to: PeriodKey, lookup: &SeriesLookup) -> Vec<f64> {
    PeriodKey::range_inclusive(from, to)
        .filter_map(|period| lookup.value(period))
        .collect()
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn sum(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(raw: &str) -> PeriodKey {
        raw.parse().expect("valid period key")
    }

    fn series(rows: &[(&str, Option<&str>)]) -> SeriesLookup {
        SeriesLookup::from_rows(
            rows.iter()
                .map(|(period, value)| (key(period), value.map(str::to_string))),
        )
    }

    #[test]
    fn rate_like_units_match_markers_case_insensitively() {
        for unit in ["%", "pp", "PCT", "Porcentaje", "% ocupación", "bps vs PP"] {
            assert!(is_rate_like_unit(Some(unit)), "unit {unit:?}");
        }
        for unit in ["USD", "m²", "units", "headcount"] {
            assert!(!is_rate_like_unit(Some(unit)), "unit {unit:?}");
        }
        assert!(!is_rate_like_unit(None));
    }

    #[test]
    fn annual_january_equals_the_single_month() {
        let lookup = series(&[("2026-01", Some("42"))]);
        assert_eq!(
            evaluated_value(key("2026-01"), KpiBasis::Annual, Some("USD"), &lookup),
            Some(42.0)
        );
    }

    #[test]
    fn annual_january_without_measurement_is_none() {
        let lookup = series(&[("2025-12", Some("42"))]);
        assert_eq!(
            evaluated_value(key("2026-01"), KpiBasis::Annual, Some("USD"), &lookup),
            None
        );
    }

    #[test]
    fn annual_mean_skips_null_months() {
        let lookup = series(&[
            ("2026-01", Some("100")),
            ("2026-02", Some("150")),
            ("2026-03", None),
        ]);
        assert_eq!(
            evaluated_value(key("2026-03"), KpiBasis::Annual, Some("USD"), &lookup),
            Some(125.0)
        );
    }

    #[test]
    fn annual_window_ignores_prior_year() {
        let lookup = series(&[("2025-12", Some("999")), ("2026-01", Some("10"))]);
        assert_eq!(
            evaluated_value(key("2026-02"), KpiBasis::Annual, Some("USD"), &lookup),
            Some(10.0)
        );
    }

    fn twelve_month_lookup() -> SeriesLookup {
        let values = [90, 92, 95, 97, 93, 96, 94, 95, 98, 91, 97, 99];
        SeriesLookup::from_rows(values.iter().enumerate().map(|(offset, value)| {
            (
                key("2025-04").add_months(offset as i32),
                Some(value.to_string()),
            )
        }))
    }

    #[test]
    fn trailing12_rate_units_take_the_mean() {
        let lookup = twelve_month_lookup();
        assert_eq!(
            evaluated_value(key("2026-03"), KpiBasis::Trailing12, Some("%"), &lookup),
            Some(94.75)
        );
    }

    #[test]
    fn trailing12_absolute_units_take_the_sum() {
        let lookup = twelve_month_lookup();
        assert_eq!(
            evaluated_value(key("2026-03"), KpiBasis::Trailing12, Some("USD"), &lookup),
            Some(1137.0)
        );
    }

    #[test]
    fn trailing12_short_history_is_not_zero_padded() {
        let lookup = series(&[("2026-02", Some("80")), ("2026-03", Some("90"))]);
        assert_eq!(
            evaluated_value(key("2026-03"), KpiBasis::Trailing12, Some("%"), &lookup),
            Some(85.0)
        );
        assert_eq!(
            evaluated_value(key("2026-03"), KpiBasis::Trailing12, Some("USD"), &lookup),
            Some(170.0)
        );
    }

    #[test]
    fn trailing12_window_excludes_older_months() {
        let lookup = series(&[("2025-03", Some("1000")), ("2026-03", Some("5"))]);
        assert_eq!(
            evaluated_value(key("2026-03"), KpiBasis::Trailing12, Some("USD"), &lookup),
            Some(5.0)
        );
    }

    #[test]
    fn empty_window_evaluates_to_none() {
        let lookup = series(&[("2026-01", None), ("2026-02", None)]);
        assert_eq!(
            evaluated_value(key("2026-02"), KpiBasis::Annual, Some("USD"), &lookup),
            None
        );
        assert_eq!(
            evaluated_value(key("2026-02"), KpiBasis::Trailing12, Some("USD"), &lookup),
            None
        );
    }

    #[test]
    fn evaluated_series_aligns_with_months() {
        let lookup = series(&[("2026-01", Some("10")), ("2026-03", Some("30"))]);
        let months = [key("2026-01"), key("2026-02"), key("2026-03")];
        let evaluated = evaluated_series(&months, KpiBasis::Annual, Some("USD"), &lookup);
        assert_eq!(evaluated, vec![Some(10.0), Some(10.0), Some(20.0)]);
    }

    #[test]
    fn fetch_floor_covers_both_bases() {
        assert_eq!(fetch_floor(key("2025-04")), key("2024-05"));
        // December: the trailing window bottoms out at January of the same year.
        assert_eq!(fetch_floor(key("2025-12")), key("2025-01"));
    }
}
