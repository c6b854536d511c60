use super::domain::{KpiDefinition, KpiId, RawValueRow};
use super::period::PeriodKey;
use super::scope::ScopeKey;

/// Storage abstraction so the service layer can be exercised in isolation.
/// `values_in_range` must honor the scope partition: rows recorded under one
/// scope are never visible when another scope is queried.
pub trait KpiRepository: Send + Sync {
    fn upsert_kpi(&self, definition: KpiDefinition) -> Result<KpiDefinition, RepositoryError>;
    fn kpis(&self) -> Result<Vec<KpiDefinition>, RepositoryError>;
    fn upsert_value(&self, row: RawValueRow) -> Result<(), RepositoryError>;
    fn values_in_range(
        &self,
        scope: &ScopeKey,
        from: PeriodKey,
        to: PeriodKey,
    ) -> Result<Vec<RawValueRow>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("kpi '{0}' not found")]
    UnknownKpi(KpiId),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
