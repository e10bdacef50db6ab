//! HTTP surface: a greeting at `/` and the insight pipeline at
//! `/market/insight`.

use crate::error::MarketInsightError;
use crate::insight::{MarketInsight, MarketInsightService, DEFAULT_PERIOD, DEFAULT_TOP_N};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub type SharedService = Arc<MarketInsightService>;

#[derive(Debug, Deserialize)]
pub struct InsightParams {
    pub product: String,
    #[serde(default = "default_period")]
    pub period: String,
    #[serde(default = "default_top_n")]
    pub n: usize,
}

fn default_period() -> String {
    DEFAULT_PERIOD.to_string()
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

#[derive(Debug, Serialize)]
pub struct InsightResponse {
    pub status: u16,
    pub data: MarketInsight,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

fn internal_error(detail: String) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse { detail })).into_response()
}

/// Every pipeline failure is reported as a 500 carrying the error text.
impl IntoResponse for MarketInsightError {
    fn into_response(self) -> Response {
        internal_error(self.to_string())
    }
}

pub fn router(service: SharedService) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/market/insight", get(market_insight))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

async fn index() -> Json<&'static str> {
    Json("Hello world")
}

/// Query strings that cannot be coerced fail like the pipeline does, with a
/// 500 and the rejection text as `detail`.
async fn market_insight(
    State(service): State<SharedService>,
    params: Result<Query<InsightParams>, QueryRejection>,
) -> Result<Json<InsightResponse>, Response> {
    let Query(params) = params.map_err(|rejection| {
        log::error!("Rejected market insight query: {}", rejection.body_text());
        internal_error(rejection.body_text())
    })?;

    let data = service
        .get_market_insight(&params.product, &params.period, params.n)
        .await
        .map_err(|e| {
            log::error!("Market insight for '{}' failed: {}", params.product, e);
            e.into_response()
        })?;

    Ok(Json(InsightResponse {
        status: StatusCode::OK.as_u16(),
        data,
    }))
}
