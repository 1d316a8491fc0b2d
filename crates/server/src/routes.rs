//! HTTP API

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use engine::{
    all_profiles, calculate_profit, lookup, optimize_pricing, FeeModel, FeeSettings,
    OptimizeRequest, OptimizeResponse, PricingError, ProfitRequest, ProfitResponse,
};
use persistence::repository::{PricingHistoryRecord, PricingHistoryRepository};
use persistence::{Database, DbError};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::settings::{
    clear_fee_settings, effective_fee_defaults, save_fee_settings, stored_fee_settings,
};
use crate::APP_VERSION;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Arc<Database>,
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/health", get(api_health))
        .route("/pricing/calculate", post(api_calculate))
        .route("/pricing/optimize", post(api_optimize))
        .route("/pricing/profiles", get(api_profiles))
        .route("/pricing/history", get(api_history))
        .route(
            "/settings/fees",
            get(api_get_fee_settings)
                .put(api_put_fee_settings)
                .delete(api_clear_fee_settings),
        )
        .with_state(state);

    Router::new().nest("/api", api_routes).layer(cors)
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "success": false,
            "error": {
                "code": self.code,
                "message": self.message,
            },
        });
        (self.status, Json(body)).into_response()
    }
}

impl From<PricingError> for ApiError {
    fn from(err: PricingError) -> Self {
        let (status, code) = match err {
            PricingError::InvalidInput { .. } => (StatusCode::BAD_REQUEST, "invalid_input"),
            PricingError::DegenerateFeeModel { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "degenerate_fee_model")
            }
        };
        warn!(code, error = %err, "Rejected pricing request");
        Self {
            status,
            code,
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = match rejection {
            JsonRejection::MissingJsonContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            _ => StatusCode::BAD_REQUEST,
        };
        Self {
            status,
            code: "invalid_input",
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "invalid_input",
            message: rejection.body_text(),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        error!(error = %err, "Database query failed");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "internal_error",
            message: "database query failed".to_string(),
        }
    }
}

// ============================================================================
// Pricing
// ============================================================================

/// GET /api/health
async fn api_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "pod-pricer",
        "version": APP_VERSION,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// POST /api/pricing/calculate — price → profit
async fn api_calculate(
    State(state): State<AppState>,
    payload: Result<Json<ProfitRequest>, JsonRejection>,
) -> Result<Json<ProfitResponse>, ApiError> {
    let Json(request) = payload?;
    let defaults = effective_fee_defaults(&state.config, state.db.pool()).await?;
    let response = calculate_profit(&request, &defaults)?;
    Ok(Json(response))
}

/// POST /api/pricing/optimize — tiered pricing menu for a product type
async fn api_optimize(
    State(state): State<AppState>,
    payload: Result<Json<OptimizeRequest>, JsonRejection>,
) -> Result<Json<OptimizeResponse>, ApiError> {
    let Json(request) = payload?;
    let defaults = effective_fee_defaults(&state.config, state.db.pool()).await?;
    let response = optimize_pricing(&request, &defaults)?;

    let record = history_record(&request, &response);
    if let Err(e) = PricingHistoryRepository::new(state.db.pool())
        .save(&record)
        .await
    {
        // History is best-effort; the caller still gets their prices
        error!(error = %e, "Failed to record pricing history");
    }

    Ok(Json(response))
}

fn history_record(request: &OptimizeRequest, response: &OptimizeResponse) -> PricingHistoryRecord {
    let optimal = &response.pricing_tiers.recommended.optimal;
    PricingHistoryRecord {
        id: None,
        product_type: request.product_type.clone(),
        resolved_profile: response.market_insights.resolved_product_type.clone(),
        recognized: response.market_insights.product_type_recognized,
        target_profit: response.inputs.profit_bounds.target.to_string(),
        optimal_price: optimal.item_price.to_string(),
        optimal_profit: optimal.profit.to_string(),
        optimal_margin_pct: optimal.margin_pct.map(|m| m.to_string()),
        candidate_price: response
            .current_pricing
            .as_ref()
            .map(|c| c.pricing.item_price.to_string()),
        candidate_in_range: response.current_pricing.as_ref().map(|c| c.in_range),
        created_at: None,
    }
}

/// GET /api/pricing/profiles — built-in product profiles
async fn api_profiles() -> Json<serde_json::Value> {
    let profiles = all_profiles();
    Json(serde_json::json!({
        "success": true,
        "data": profiles,
        "total": profiles.len(),
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryParams {
    limit: Option<i64>,
    product_type: Option<String>,
}

/// GET /api/pricing/history — recent optimizer runs
async fn api_history(
    State(state): State<AppState>,
    params: Result<Query<HistoryParams>, QueryRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Query(params) = params?;
    let limit = params.limit.unwrap_or(20).clamp(1, 200);
    // Filter on the resolved profile so aliases ("tee", "t-shirts") share history
    let profile = params
        .product_type
        .as_deref()
        .map(|pt| lookup(pt).profile.key);

    let repo = PricingHistoryRepository::new(state.db.pool());
    let records = repo.recent(limit, profile).await?;
    let total = repo.count(profile).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": records,
        "returned": records.len(),
        "total": total,
        "limit": limit,
    })))
}

// ============================================================================
// Settings
// ============================================================================

async fn fee_settings_body(state: &AppState) -> Result<serde_json::Value, ApiError> {
    let stored = stored_fee_settings(state.db.pool()).await?;
    let effective = stored.layered_over(&state.config.fee_defaults);
    let resolved = FeeModel::resolve(&FeeSettings::default(), &effective);

    Ok(serde_json::json!({
        "success": true,
        "environment": state.config.fee_defaults,
        "stored": stored,
        "effective": resolved.to_settings(),
        "solvable": resolved.is_solvable(),
    }))
}

/// GET /api/settings/fees — fee defaults per layer and the schedule they resolve to
async fn api_get_fee_settings(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    Ok(Json(fee_settings_body(&state).await?))
}

/// PUT /api/settings/fees — store seller fee defaults (fields left out are unchanged)
async fn api_put_fee_settings(
    State(state): State<AppState>,
    payload: Result<Json<FeeSettings>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(settings) = payload?;
    if settings.is_empty() {
        return Err(PricingError::invalid("fees", "no fee fields supplied").into());
    }
    settings.validate("fees")?;
    save_fee_settings(state.db.pool(), &settings).await?;
    info!(settings = ?settings, "Stored seller fee settings");
    Ok(Json(fee_settings_body(&state).await?))
}

/// DELETE /api/settings/fees — drop stored fee defaults, reverting to environment values
async fn api_clear_fee_settings(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let removed = clear_fee_settings(state.db.pool()).await?;
    info!(removed, "Cleared seller fee settings");
    let mut body = fee_settings_body(&state).await?;
    body["removed"] = serde_json::json!(removed);
    Ok(Json(body))
}
