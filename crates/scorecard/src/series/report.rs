use super::domain::{KpiDefinition, KpiId, RawValueRow};
use super::evaluation::evaluated_series;
use super::lookup::SeriesLookup;
use super::period::PeriodKey;
use super::scope::ScopeKey;
use super::target;
use super::views::{KpiSeriesEntry, SeriesReportView};
use std::collections::HashMap;

/// Assembles the series report for one period, scope, and displayed window.
///
/// `rows` may span any period range; months before the displayed window feed
/// the trailing and year-to-date rollups of its early points. Rows recorded
/// under any other scope are ignored outright; partitioning is enforced here
/// even if the caller over-fetched.
pub fn build_series_report(
    kpis: &[KpiDefinition],
    rows: &[RawValueRow],
    scope: &ScopeKey,
    period: PeriodKey,
    window_months: u32,
) -> SeriesReportView {
    let window_months = window_months.max(1);
    let window_start = period.add_months(-(window_months as i32 - 1));
    let months: Vec<PeriodKey> = PeriodKey::range_inclusive(window_start, period).collect();

    let mut lookups: HashMap<&KpiId, SeriesLookup> = kpis
        .iter()
        .map(|kpi| (&kpi.id, SeriesLookup::default()))
        .collect();
    for row in rows {
        if row.scope_key != *scope {
            continue;
        }
        if let Some(lookup) = lookups.get_mut(&row.kpi_id) {
            lookup.insert(row.period_key, row.value.as_deref());
        }
    }

    let items = kpis
        .iter()
        .map(|kpi| {
            let lookup = &lookups[&kpi.id];
            let unit = kpi.unit.as_deref();

            let monthly: Vec<Option<f64>> =
                months.iter().map(|month| lookup.value(*month)).collect();
            let evaluated = evaluated_series(&months, kpi.basis, unit, lookup);
            let evaluated_current = evaluated.last().copied().flatten();
            let delta = target::delta(evaluated_current, kpi.target_value);
            let status = target::status(
                lookup.value(period),
                evaluated_current,
                kpi.target_value,
                kpi.direction,
            );

            KpiSeriesEntry {
                kpi_id: kpi.id.clone(),
                name: kpi.name.clone(),
                unit: kpi.unit.clone(),
                direction: kpi.direction,
                basis: kpi.basis,
                monthly,
                evaluated,
                evaluated_current,
                target: kpi.target_value,
                delta,
                status,
                status_label: status.label(),
            }
        })
        .collect();

    SeriesReportView {
        period_key: period.to_string(),
        scope_key: scope.clone(),
        months: months.iter().map(ToString::to_string).collect(),
        items,
    }
}
