use chrono::Local;
use clap::Args;
use scorecard::error::AppError;
use scorecard::series::domain::{KpiBasis, KpiDefinition, KpiDirection, KpiId, RawValueRow};
use scorecard::series::import::{read_catalog, read_measurements};
use scorecard::series::views::{KpiSeriesEntry, SeriesReportView};
use scorecard::series::{build_series_report, PeriodKey, ScopeKey};
use std::fs::File;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// KPI catalog CSV (KPI,Name,Unit,Direction,Basis,Target)
    #[arg(long)]
    pub(crate) catalog: PathBuf,
    /// Monthly measurement CSV (KPI,Period,Unit,Value)
    #[arg(long)]
    pub(crate) values: PathBuf,
    /// Reporting period (YYYY-MM). Defaults to the current month.
    #[arg(long)]
    pub(crate) period: Option<String>,
    /// Organizational unit scope. Defaults to the engagement-wide scope.
    #[arg(long)]
    pub(crate) unit: Option<String>,
    /// Number of months in the displayed window
    #[arg(long, default_value_t = 12)]
    pub(crate) window: u32,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reporting period (YYYY-MM). Defaults to the current month.
    #[arg(long)]
    pub(crate) period: Option<String>,
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        catalog,
        values,
        period,
        unit,
        window,
    } = args;

    let period = resolve_period(period)?;
    let catalog = read_catalog(File::open(catalog)?)?;
    let rows = read_measurements(File::open(values)?)?;
    let scope = ScopeKey::resolve(unit.as_deref());

    let report = build_series_report(&catalog, &rows, &scope, period, window);
    render_report(&report);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let period = resolve_period(args.period)?;

    println!("KPI scorecard demo");
    let (catalog, rows) = synthetic_engagement(period);
    let report = build_series_report(&catalog, &rows, &ScopeKey::Global, period, 12);
    render_report(&report);
    Ok(())
}

fn resolve_period(raw: Option<String>) -> Result<PeriodKey, AppError> {
    match raw.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
        Some(raw) => Ok(raw.parse::<PeriodKey>()?),
        None => Ok(PeriodKey::from_date(Local::now().date_naive())),
    }
}

pub(crate) fn render_report(report: &SeriesReportView) {
    println!(
        "Scorecard for {} (scope {})",
        report.period_key, report.scope_key
    );
    println!(
        "Window: {} -> {} ({} months)",
        report.months.first().map(String::as_str).unwrap_or("—"),
        report.months.last().map(String::as_str).unwrap_or("—"),
        report.months.len()
    );

    if report.items.is_empty() {
        println!("\nNo KPIs defined");
        return;
    }

    println!("\nKPIs");
    for item in &report.items {
        render_entry(item);
    }
}

fn render_entry(item: &KpiSeriesEntry) {
    let unit = item.unit.as_deref().unwrap_or("");
    println!(
        "- {} [{}] ({}, {})",
        item.name,
        unit,
        item.basis.label(),
        item.direction.label()
    );
    println!(
        "  current {}, evaluated {}, target {}, delta {} -> {}",
        fmt_value(item.monthly.last().copied().flatten()),
        fmt_value(item.evaluated_current),
        fmt_value(item.target),
        fmt_value(item.delta),
        item.status_label
    );
}

fn fmt_value(value: Option<f64>) -> String {
    match value {
        Some(value) if value.fract() == 0.0 => format!("{value:.0}"),
        Some(value) => format!("{value:.2}"),
        None => "—".to_string(),
    }
}

/// Fourteen months of synthetic history for three KPIs, gaps included, so the
/// demo exercises both bases and the no-data path.
fn synthetic_engagement(period: PeriodKey) -> (Vec<KpiDefinition>, Vec<RawValueRow>) {
    let catalog = vec![
        KpiDefinition {
            id: KpiId("occupancy".to_string()),
            name: "Occupancy rate".to_string(),
            unit: Some("%".to_string()),
            direction: KpiDirection::HigherIsBetter,
            basis: KpiBasis::Trailing12,
            target_value: Some(92.0),
        },
        KpiDefinition {
            id: KpiId("revenue".to_string()),
            name: "Recognized revenue".to_string(),
            unit: Some("USD".to_string()),
            direction: KpiDirection::HigherIsBetter,
            basis: KpiBasis::Trailing12,
            target_value: Some(1_150_000.0),
        },
        KpiDefinition {
            id: KpiId("churn".to_string()),
            name: "Customer churn".to_string(),
            unit: Some("pct".to_string()),
            direction: KpiDirection::LowerIsBetter,
            basis: KpiBasis::Annual,
            target_value: None,
        },
    ];

    let mut rows = Vec::new();
    for offset in 0..14 {
        let month = period.add_months(-offset);
        let step = f64::from(13 - offset);

        rows.push(value_row("occupancy", month, 88.0 + (step * 7.0) % 9.0));
        rows.push(value_row("revenue", month, 90_000.0 + step * 1_500.0));
        // Churn reporting lags a month; the latest period stays unmeasured.
        if offset > 0 {
            rows.push(value_row("churn", month, 4.0 + (step * 3.0) % 2.5));
        }
    }

    (catalog, rows)
}

fn value_row(kpi: &str, period: PeriodKey, value: f64) -> RawValueRow {
    RawValueRow {
        kpi_id: KpiId(kpi.to_string()),
        scope_key: ScopeKey::Global,
        period_key: period,
        value: Some(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_engagement_keeps_the_latest_churn_month_open() {
        let period: PeriodKey = "2026-08".parse().expect("valid period");
        let (catalog, rows) = synthetic_engagement(period);
        assert_eq!(catalog.len(), 3);

        let churn_current = rows.iter().find(|row| {
            row.kpi_id == KpiId("churn".to_string()) && row.period_key == period
        });
        assert!(churn_current.is_none());

        let report = build_series_report(&catalog, &rows, &ScopeKey::Global, period, 12);
        let churn = report
            .items
            .iter()
            .find(|item| item.kpi_id == KpiId("churn".to_string()))
            .expect("churn entry present");
        assert_eq!(churn.status_label, "No data");
    }

    #[test]
    fn fmt_value_renders_dashes_for_missing() {
        assert_eq!(fmt_value(None), "—");
        assert_eq!(fmt_value(Some(12.0)), "12");
        assert_eq!(fmt_value(Some(12.345)), "12.35");
    }
}
