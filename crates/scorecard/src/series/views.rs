use super::domain::{KpiBasis, KpiDirection, KpiId, KpiStatus};
use super::scope::ScopeKey;
use serde::Serialize;

/// One KPI's slice of the series report. `monthly` and `evaluated` are
/// aligned 1:1 with the report's `months`; nulls mean "no measurement".
#[derive(Debug, Clone, Serialize)]
pub struct KpiSeriesEntry {
    pub kpi_id: KpiId,
    pub name: String,
    pub unit: Option<String>,
    pub direction: KpiDirection,
    pub basis: KpiBasis,
    pub monthly: Vec<Option<f64>>,
    pub evaluated: Vec<Option<f64>>,
    pub evaluated_current: Option<f64>,
    pub target: Option<f64>,
    pub delta: Option<f64>,
    pub status: KpiStatus,
    pub status_label: &'static str,
}

/// Full series report for one requested period and scope, as served to
/// dashboards, print views, and exports.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesReportView {
    pub period_key: String,
    pub scope_key: ScopeKey,
    pub months: Vec<String>,
    pub items: Vec<KpiSeriesEntry>,
}
