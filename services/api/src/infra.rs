use metrics_exporter_prometheus::PrometheusHandle;
use scorecard::series::domain::{KpiDefinition, KpiId, RawValueRow};
use scorecard::series::repository::{KpiRepository, RepositoryError};
use scorecard::series::{PeriodKey, ScopeKey};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local store backing the service. Values are keyed by the unique
/// (kpi, scope, period) triple so recording twice replaces the reading, and
/// range queries only ever see the requested partition.
#[derive(Default)]
pub(crate) struct InMemoryKpiRepository {
    kpis: Mutex<HashMap<KpiId, KpiDefinition>>,
    values: Mutex<HashMap<(KpiId, ScopeKey, PeriodKey), Option<String>>>,
}

impl KpiRepository for InMemoryKpiRepository {
    fn upsert_kpi(&self, definition: KpiDefinition) -> Result<KpiDefinition, RepositoryError> {
        let mut guard = self.kpis.lock().expect("kpi mutex poisoned");
        guard.insert(definition.id.clone(), definition.clone());
        Ok(definition)
    }

    fn kpis(&self) -> Result<Vec<KpiDefinition>, RepositoryError> {
        let guard = self.kpis.lock().expect("kpi mutex poisoned");
        let mut list: Vec<KpiDefinition> = guard.values().cloned().collect();
        list.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(list)
    }

    fn upsert_value(&self, row: RawValueRow) -> Result<(), RepositoryError> {
        {
            let guard = self.kpis.lock().expect("kpi mutex poisoned");
            if !guard.contains_key(&row.kpi_id) {
                return Err(RepositoryError::UnknownKpi(row.kpi_id));
            }
        }

        let mut guard = self.values.lock().expect("value mutex poisoned");
        guard.insert((row.kpi_id, row.scope_key, row.period_key), row.value);
        Ok(())
    }

    fn values_in_range(
        &self,
        scope: &ScopeKey,
        from: PeriodKey,
        to: PeriodKey,
    ) -> Result<Vec<RawValueRow>, RepositoryError> {
        let guard = self.values.lock().expect("value mutex poisoned");
        Ok(guard
            .iter()
            .filter(|((_, row_scope, period), _)| {
                row_scope == scope && (from..=to).contains(period)
            })
            .map(|((kpi_id, scope_key, period_key), value)| RawValueRow {
                kpi_id: kpi_id.clone(),
                scope_key: scope_key.clone(),
                period_key: *period_key,
                value: value.clone(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scorecard::series::domain::{KpiBasis, KpiDirection};

    fn key(raw: &str) -> PeriodKey {
        raw.parse().expect("valid period key")
    }

    fn definition(id: &str) -> KpiDefinition {
        KpiDefinition {
            id: KpiId(id.to_string()),
            name: id.to_string(),
            unit: Some("%".to_string()),
            direction: KpiDirection::HigherIsBetter,
            basis: KpiBasis::Annual,
            target_value: None,
        }
    }

    fn row(kpi: &str, scope: ScopeKey, period: &str, value: &str) -> RawValueRow {
        RawValueRow {
            kpi_id: KpiId(kpi.to_string()),
            scope_key: scope,
            period_key: key(period),
            value: Some(value.to_string()),
        }
    }

    #[test]
    fn rejects_values_for_unknown_kpis() {
        let repository = InMemoryKpiRepository::default();
        let result = repository.upsert_value(row("ghost", ScopeKey::Global, "2026-01", "1"));
        assert!(matches!(result, Err(RepositoryError::UnknownKpi(_))));
    }

    #[test]
    fn range_queries_stay_inside_the_scope_partition() {
        let repository = InMemoryKpiRepository::default();
        repository.upsert_kpi(definition("occupancy")).expect("kpi stored");

        let unit_a = ScopeKey::Unit("a".to_string());
        let unit_b = ScopeKey::Unit("b".to_string());
        repository
            .upsert_value(row("occupancy", unit_a.clone(), "2026-03", "95"))
            .expect("value stored");

        let global = repository
            .values_in_range(&ScopeKey::Global, key("2026-01"), key("2026-12"))
            .expect("query runs");
        assert!(global.is_empty());

        let other_unit = repository
            .values_in_range(&unit_b, key("2026-01"), key("2026-12"))
            .expect("query runs");
        assert!(other_unit.is_empty());

        let same_unit = repository
            .values_in_range(&unit_a, key("2026-01"), key("2026-12"))
            .expect("query runs");
        assert_eq!(same_unit.len(), 1);
    }

    #[test]
    fn upsert_replaces_the_period_reading() {
        let repository = InMemoryKpiRepository::default();
        repository.upsert_kpi(definition("occupancy")).expect("kpi stored");
        repository
            .upsert_value(row("occupancy", ScopeKey::Global, "2026-01", "90"))
            .expect("value stored");
        repository
            .upsert_value(row("occupancy", ScopeKey::Global, "2026-01", "92"))
            .expect("value replaced");

        let rows = repository
            .values_in_range(&ScopeKey::Global, key("2026-01"), key("2026-01"))
            .expect("query runs");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value.as_deref(), Some("92"));
    }
}
