use super::period::PeriodKey;
use super::scope::ScopeKey;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage identifier of a KPI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KpiId(pub String);

impl fmt::Display for KpiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether higher or lower values are considered better. Only consulted when
/// comparing an evaluated value against a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KpiDirection {
    HigherIsBetter,
    LowerIsBetter,
}

impl KpiDirection {
    pub const fn label(self) -> &'static str {
        match self {
            Self::HigherIsBetter => "Higher is better",
            Self::LowerIsBetter => "Lower is better",
        }
    }
}

/// Aggregation policy rolling monthly measurements into one evaluated figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KpiBasis {
    /// Year-to-date mean from January of the period's year.
    Annual,
    /// Rolling 12-month window; mean for rate-like units, sum otherwise.
    Trailing12,
}

impl KpiBasis {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Annual => "Year to date",
            Self::Trailing12 => "Trailing 12 months",
        }
    }
}

/// Derived standing of a KPI for one reporting period. Never persisted; the
/// comparator recomputes it from the current target and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KpiStatus {
    NoData,
    OnTarget,
    OffTarget,
}

impl KpiStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NoData => "No data",
            Self::OnTarget => "On target",
            Self::OffTarget => "Off target",
        }
    }
}

/// KPI master record as configured during engagement setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiDefinition {
    pub id: KpiId,
    pub name: String,
    #[serde(default)]
    pub unit: Option<String>,
    pub direction: KpiDirection,
    pub basis: KpiBasis,
    #[serde(default)]
    pub target_value: Option<f64>,
}

/// One stored monthly measurement, unique per (kpi, scope, period). The value
/// stays in its raw decimal serialization; coercion to a number is the
/// lookup's job so malformed storage degrades to "no measurement" uniformly.
#[derive(Debug, Clone, PartialEq)]
pub struct RawValueRow {
    pub kpi_id: KpiId,
    pub scope_key: ScopeKey,
    pub period_key: PeriodKey,
    pub value: Option<String>,
}
