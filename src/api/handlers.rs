//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::warn;

use super::AppState;
use super::types::{
    ErrorResponse, EstimateRequest, EstimateResponse, RowRecord, RowsQuery, SummaryResponse,
};
use crate::error::Result;
use crate::io::{read_consumption, samples_from_value};
use crate::pipeline::{Estimate, estimate};

/// Returns the served configuration and its self-consumption report.
///
/// `GET /summary` → 200 + `SummaryResponse` JSON
pub async fn get_summary(State(state): State<Arc<AppState>>) -> Json<SummaryResponse> {
    Json(SummaryResponse {
        config: state.config.clone(),
        report: state.estimate.report.clone(),
    })
}

/// Returns joined rows, optionally filtered by row index range.
///
/// `GET /rows` → 200 + `Vec<RowRecord>` JSON
/// `GET /rows?from=N&to=M` → filtered range (inclusive)
/// `GET /rows?from=10&to=5` → 400 + `ErrorResponse`
pub async fn get_rows(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RowsQuery>,
) -> impl IntoResponse {
    let from = query.from.unwrap_or(0);
    let to = query.to.unwrap_or(usize::MAX);

    if from > to {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("`from` ({from}) must be <= `to` ({to})"),
            }),
        ));
    }

    let table = &state.estimate.table;
    let records: Vec<RowRecord> = table
        .rows
        .iter()
        .enumerate()
        .filter(|(i, _)| *i >= from && *i <= to)
        .map(|(i, r)| RowRecord::from_row(i, r, table))
        .collect();

    Ok(Json(records))
}

/// Runs the pipeline on the posted inputs.
///
/// `POST /estimate` → 200 + `EstimateResponse` JSON
/// invalid input or configuration → 422 + `ErrorResponse`
pub async fn post_estimate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EstimateRequest>,
) -> impl IntoResponse {
    match run_request(&state, &request) {
        Ok(est) => Ok(Json(EstimateResponse {
            rows: RowRecord::from_table(&est.table),
            report: est.report,
        })),
        Err(e) => {
            warn!(error = %e, "estimate request rejected");
            Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
    }
}

fn run_request(state: &AppState, request: &EstimateRequest) -> Result<Estimate> {
    let mut cfg = state.config.clone();
    if let Some(capacities) = &request.capacities {
        cfg.capacity.multipliers = capacities.clone();
    }
    cfg.ensure_valid()?;

    let consumption = read_consumption(request.consumption_csv.as_bytes(), &cfg.consumption)?;
    let production = samples_from_value(&request.production, &cfg.production)?;
    estimate(&consumption, &production, &cfg)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::json;
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;
    use crate::config::PipelineConfig;
    use crate::series::{ConsumptionRecord, ProductionSample};

    const CONSUMPTION_CSV: &str = "meta\nmeta\nHorodate;Valeur\n\
2023-06-01T12:00:00+00:00;300\n\
2023-06-01T12:30:00+00:00;500\n\
2023-06-01T13:00:00+00:00;200\n";

    fn make_test_state() -> Arc<AppState> {
        let config = PipelineConfig::default();
        let consumption: Vec<ConsumptionRecord> = (0..24)
            .flat_map(|h| {
                [
                    ConsumptionRecord::new(format!("2023-06-01T{h:02}:00:00+00:00"), 400.0),
                    ConsumptionRecord::new(format!("2023-06-01T{h:02}:30:00+00:00"), 600.0),
                ]
            })
            .collect();
        let production: Vec<ProductionSample> = (6..20)
            .map(|h| ProductionSample::new(format!("20200601:{h:02}10"), 300.0))
            .collect();
        let estimate = estimate(&consumption, &production, &config).expect("estimate");
        Arc::new(AppState { config, estimate })
    }

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn summary_returns_200() {
        let app = router(make_test_state());

        let req = Request::builder()
            .uri("/summary")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        assert!(json.get("config").is_some());
        assert_eq!(json["report"]["rows"], 24);
        assert_eq!(json["report"]["unmatched_rows"], 10);
    }

    #[tokio::test]
    async fn rows_range_query() {
        let app = router(make_test_state());

        let req = Request::builder()
            .uri("/rows?from=5&to=10")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        let rows = json.as_array().cloned().unwrap_or_default();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0]["index"], 5);
        assert_eq!(rows[0]["production_w"], serde_json::Value::Null);
        assert_eq!(rows[1]["production_6kwc"], 1800.0);
    }

    #[tokio::test]
    async fn rows_invalid_range_returns_400() {
        let app = router(make_test_state());

        let req = Request::builder()
            .uri("/rows?from=10&to=5")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(resp).await.get("error").is_some());
    }

    #[tokio::test]
    async fn estimate_runs_pipeline() {
        let app = router(make_test_state());
        let body = json!({
            "consumption_csv": CONSUMPTION_CSV,
            "production": { "outputs": { "hourly": [
                { "time": "20200601:1210", "P": 100.0 },
                { "time": "20210601:1210", "P": 200.0 }
            ] } },
            "capacities": [2.0]
        });

        let req = Request::builder()
            .method("POST")
            .uri("/estimate")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        let rows = json["rows"].as_array().cloned().unwrap_or_default();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["consumption_w"], 400.0);
        assert_eq!(rows[0]["production_w"], 150.0);
        assert_eq!(rows[0]["production_2kwc"], 300.0);
        assert_eq!(rows[1]["production_w"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn estimate_with_empty_production_returns_422() {
        let app = router(make_test_state());
        let body = json!({
            "consumption_csv": CONSUMPTION_CSV,
            "production": []
        });

        let req = Request::builder()
            .method("POST")
            .uri("/estimate")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let json = body_json(resp).await;
        assert_eq!(json["error"], "production series is empty");
    }
}
