use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use scorecard::series::repository::KpiRepository;
use scorecard::series::router::scorecard_router;
use scorecard::series::service::KpiScorecardService;

pub(crate) fn with_scorecard_routes<R>(service: Arc<KpiScorecardService<R>>) -> axum::Router
where
    R: KpiRepository + 'static,
{
    scorecard_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryKpiRepository;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn router() -> axum::Router {
        let repository = Arc::new(InMemoryKpiRepository::default());
        let service = Arc::new(KpiScorecardService::new(repository, 12));
        with_scorecard_routes(service)
    }

    async fn read_json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        serde_json::from_slice(&bytes).expect("body is json")
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn series_route_rejects_malformed_periods() {
        let response = router()
            .oneshot(
                Request::get("/api/v1/kpis/series?period=2026-13")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload = read_json_body(response).await;
        assert!(payload
            .get("error")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .contains("2026-13"));
    }

    #[tokio::test]
    async fn series_route_serves_recorded_measurements() {
        let router = router();

        let define = Request::post("/api/v1/kpis")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({
                    "id": "occupancy",
                    "name": "Occupancy rate",
                    "unit": "%",
                    "direction": "HIGHER_IS_BETTER",
                    "basis": "ANNUAL",
                    "target_value": 90.0
                })
                .to_string(),
            ))
            .expect("request builds");
        let response = router.clone().oneshot(define).await.expect("route executes");
        assert_eq!(response.status(), StatusCode::CREATED);

        for (period, value) in [("2026-01", 88.0), ("2026-02", 94.0)] {
            let record = Request::put("/api/v1/kpis/occupancy/values")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "period": period, "value": value }).to_string(),
                ))
                .expect("request builds");
            let response = router.clone().oneshot(record).await.expect("route executes");
            assert_eq!(response.status(), StatusCode::NO_CONTENT);
        }

        let response = router
            .oneshot(
                Request::get("/api/v1/kpis/series?period=2026-02")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);

        let payload = read_json_body(response).await;
        assert_eq!(payload["scope_key"], json!("GLOBAL"));
        assert_eq!(payload["months"].as_array().map(Vec::len), Some(12));

        let item = &payload["items"][0];
        assert_eq!(item["kpi_id"], json!("occupancy"));
        assert_eq!(item["evaluated_current"], json!(91.0));
        assert_eq!(item["delta"], json!(1.0));
        assert_eq!(item["status"], json!("ON_TARGET"));
    }

    #[tokio::test]
    async fn recording_against_an_unknown_kpi_is_not_found() {
        let response = router()
            .oneshot(
                Request::put("/api/v1/kpis/ghost/values")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({ "period": "2026-01", "value": 1 }).to_string(),
                    ))
                    .expect("request builds"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
