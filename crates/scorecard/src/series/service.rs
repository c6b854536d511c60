use super::domain::{KpiDefinition, KpiId, RawValueRow};
use super::evaluation::fetch_floor;
use super::period::PeriodKey;
use super::report::build_series_report;
use super::repository::{KpiRepository, RepositoryError};
use super::scope::ScopeKey;
use super::views::SeriesReportView;
use std::sync::Arc;

/// Service composing the repository seam with the evaluation engine. Holds
/// the configured display window; everything else is per-request input.
pub struct KpiScorecardService<R> {
    repository: Arc<R>,
    window_months: u32,
}

impl<R> KpiScorecardService<R>
where
    R: KpiRepository + 'static,
{
    pub fn new(repository: Arc<R>, window_months: u32) -> Self {
        Self {
            repository,
            window_months: window_months.max(1),
        }
    }

    pub fn window_months(&self) -> u32 {
        self.window_months
    }

    /// Upsert a KPI definition, returning the stored record.
    pub fn define_kpi(
        &self,
        definition: KpiDefinition,
    ) -> Result<KpiDefinition, ScorecardServiceError> {
        Ok(self.repository.upsert_kpi(definition)?)
    }

    /// Record one monthly measurement for an optional unit scope. Upserts:
    /// corrections to already-past periods replace the earlier reading.
    pub fn record_value(
        &self,
        kpi_id: KpiId,
        unit_id: Option<&str>,
        period: PeriodKey,
        raw_value: Option<String>,
    ) -> Result<(), ScorecardServiceError> {
        let row = RawValueRow {
            kpi_id,
            scope_key: ScopeKey::resolve(unit_id),
            period_key: period,
            value: raw_value,
        };
        Ok(self.repository.upsert_value(row)?)
    }

    /// Build the series report for a period and optional unit scope: resolve
    /// the scope, fetch one batch of rows reaching back far enough for every
    /// point of the displayed window, and hand the snapshot to the engine.
    pub fn series_report(
        &self,
        period: PeriodKey,
        unit_id: Option<&str>,
    ) -> Result<SeriesReportView, ScorecardServiceError> {
        let scope = ScopeKey::resolve(unit_id);
        let window_start = period.add_months(-(self.window_months as i32 - 1));
        let floor = fetch_floor(window_start);

        let kpis = self.repository.kpis()?;
        let rows = self.repository.values_in_range(&scope, floor, period)?;

        Ok(build_series_report(
            &kpis,
            &rows,
            &scope,
            period,
            self.window_months,
        ))
    }
}

/// Error raised by the scorecard service.
#[derive(Debug, thiserror::Error)]
pub enum ScorecardServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
