use super::domain::{KpiBasis, KpiDefinition, KpiDirection, KpiId, RawValueRow};
use super::lookup::parse_decimal;
use super::period::{InvalidPeriodFormat, PeriodKey};
use super::scope::ScopeKey;
use serde::{Deserialize, Deserializer};
use std::io::Read;

/// Reads a monthly measurement export (`KPI,Period,Unit,Value`). Values stay
/// raw strings so the lookup's coercion rules apply uniformly; periods are
/// validated here, at the boundary.
pub fn read_measurements<R: Read>(reader: R) -> Result<Vec<RawValueRow>, SeriesImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for (index, record) in csv_reader.deserialize::<MeasurementCsvRow>().enumerate() {
        let row = record?;
        let period_key = row
            .period
            .parse::<PeriodKey>()
            .map_err(|source| SeriesImportError::Period {
                line: index + 2,
                source,
            })?;

        rows.push(RawValueRow {
            kpi_id: KpiId(row.kpi),
            scope_key: ScopeKey::resolve(row.unit.as_deref()),
            period_key,
            value: row.value,
        });
    }

    Ok(rows)
}

/// Reads a KPI catalog export (`KPI,Name,Unit,Direction,Basis,Target`).
/// Accepts the full enum names as well as the single-letter basis codes the
/// older spreadsheets used.
pub fn read_catalog<R: Read>(reader: R) -> Result<Vec<KpiDefinition>, SeriesImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut definitions = Vec::new();

    for (index, record) in csv_reader.deserialize::<CatalogCsvRow>().enumerate() {
        let row = record?;
        let line = index + 2;

        let direction = parse_direction(&row.direction).ok_or_else(|| SeriesImportError::Field {
            line,
            message: format!("unknown direction '{}'", row.direction),
        })?;
        let basis = parse_basis(&row.basis).ok_or_else(|| SeriesImportError::Field {
            line,
            message: format!("unknown basis '{}'", row.basis),
        })?;

        definitions.push(KpiDefinition {
            id: KpiId(row.kpi),
            name: row.name,
            unit: row.unit,
            direction,
            basis,
            target_value: row.target.as_deref().and_then(parse_decimal),
        });
    }

    Ok(definitions)
}

#[derive(Debug, Deserialize)]
struct MeasurementCsvRow {
    #[serde(rename = "KPI")]
    kpi: String,
    #[serde(rename = "Period")]
    period: String,
    #[serde(rename = "Unit", default, deserialize_with = "empty_string_as_none")]
    unit: Option<String>,
    #[serde(rename = "Value", default, deserialize_with = "empty_string_as_none")]
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogCsvRow {
    #[serde(rename = "KPI")]
    kpi: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Unit", default, deserialize_with = "empty_string_as_none")]
    unit: Option<String>,
    #[serde(rename = "Direction")]
    direction: String,
    #[serde(rename = "Basis")]
    basis: String,
    #[serde(rename = "Target", default, deserialize_with = "empty_string_as_none")]
    target: Option<String>,
}

fn parse_direction(raw: &str) -> Option<KpiDirection> {
    match raw.trim().to_ascii_uppercase().as_str() {
        "HIGHER_IS_BETTER" | "HIGHER" | "UP" => Some(KpiDirection::HigherIsBetter),
        "LOWER_IS_BETTER" | "LOWER" | "DOWN" => Some(KpiDirection::LowerIsBetter),
        _ => None,
    }
}

fn parse_basis(raw: &str) -> Option<KpiBasis> {
    match raw.trim().to_ascii_uppercase().as_str() {
        "ANNUAL" | "A" => Some(KpiBasis::Annual),
        "TRAILING12" | "L" => Some(KpiBasis::Trailing12),
        _ => None,
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Import failure; the line number counts the header as line 1.
#[derive(Debug, thiserror::Error)]
pub enum SeriesImportError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("line {line}: {source}")]
    Period {
        line: usize,
        source: InvalidPeriodFormat,
    },
    #[error("line {line}: {message}")]
    Field { line: usize, message: String },
}
