use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;

use super::domain::{KpiDefinition, KpiId};
use super::period::PeriodKey;
use super::repository::{KpiRepository, RepositoryError};
use super::service::{KpiScorecardService, ScorecardServiceError};

/// Router builder exposing HTTP endpoints for KPI setup, monthly intake, and
/// the evaluated series report.
pub fn scorecard_router<R>(service: Arc<KpiScorecardService<R>>) -> Router
where
    R: KpiRepository + 'static,
{
    Router::new()
        .route("/api/v1/kpis", post(define_kpi_handler::<R>))
        .route("/api/v1/kpis/:kpi_id/values", put(record_value_handler::<R>))
        .route("/api/v1/kpis/series", get(series_handler::<R>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct SeriesQuery {
    #[serde(default)]
    pub(crate) period: Option<String>,
    #[serde(default)]
    pub(crate) unit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecordValueRequest {
    pub(crate) period: String,
    #[serde(default)]
    pub(crate) unit: Option<String>,
    #[serde(default)]
    pub(crate) value: Option<ValueField>,
}

/// Accepts measurements as JSON numbers or decimal strings; either form ends
/// up as the raw serialization the lookup coerces later.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ValueField {
    Number(f64),
    Text(String),
}

impl ValueField {
    fn into_raw(self) -> String {
        match self {
            ValueField::Number(value) => value.to_string(),
            ValueField::Text(value) => value,
        }
    }
}

pub(crate) async fn series_handler<R>(
    State(service): State<Arc<KpiScorecardService<R>>>,
    Query(query): Query<SeriesQuery>,
) -> Response
where
    R: KpiRepository + 'static,
{
    // Defaulting to "now" happens here at the boundary; the engine only ever
    // receives an explicit period.
    let period = match query.period.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
        Some(raw) => match raw.parse::<PeriodKey>() {
            Ok(period) => period,
            Err(error) => {
                let payload = json!({ "error": error.to_string() });
                return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
            }
        },
        None => PeriodKey::from_date(Local::now().date_naive()),
    };

    match service.series_report(period, query.unit.as_deref()) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn define_kpi_handler<R>(
    State(service): State<Arc<KpiScorecardService<R>>>,
    Json(definition): Json<KpiDefinition>,
) -> Response
where
    R: KpiRepository + 'static,
{
    match service.define_kpi(definition) {
        Ok(stored) => (StatusCode::CREATED, Json(stored)).into_response(),
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn record_value_handler<R>(
    State(service): State<Arc<KpiScorecardService<R>>>,
    Path(kpi_id): Path<String>,
    Json(request): Json<RecordValueRequest>,
) -> Response
where
    R: KpiRepository + 'static,
{
    let period = match request.period.trim().parse::<PeriodKey>() {
        Ok(period) => period,
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
        }
    };

    let raw_value = request.value.map(ValueField::into_raw);
    match service.record_value(KpiId(kpi_id), request.unit.as_deref(), period, raw_value) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(ScorecardServiceError::Repository(RepositoryError::UnknownKpi(id))) => {
            let payload = json!({ "error": format!("kpi '{id}' not found") });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
