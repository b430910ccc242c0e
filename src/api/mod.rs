pub mod chart;
pub mod dto;
pub mod errors;
pub mod handlers;

use axum::{routing::get, Router};
use sqlx::PgPool;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

use handlers::ApiDoc;

pub fn router(pool: PgPool) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .route("/api/devices", get(handlers::get_devices))
        .route("/api/latest/{device_id}", get(handlers::get_latest_reading))
        .route("/api/history/{device_id}", get(handlers::get_history))
        .route("/api/stats/{device_id}", get(handlers::get_stats))
        .route("/sensores", get(handlers::get_fleet_snapshot))
        .route("/historico/{device_id}", get(handlers::get_historico))
        .route("/grafica/{device_id}", get(handlers::get_chart_page))
        .with_state(pool)
        .split_for_parts();

    router
        .route("/health", get(handlers::health))
        .route(
            "/api-docs/openapi.json",
            get(move || async move { axum::Json(api) }),
        )
}
