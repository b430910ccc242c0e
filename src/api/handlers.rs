use anyhow::Context;
use axum::{
    extract::{Path, Query, State},
    response::Html,
    Json,
};
use serde::Deserialize;
use sqlx::PgPool;
use utoipa::OpenApi;

use super::{
    chart,
    dto::{
        DeviceListResponse, DeviceStatsDto, FleetSnapshotResponse, HistoricoResponse,
        HistoryResponse, ReadingDto, ReadingWithPowerDto,
    },
    errors::{AppError, ChartError},
};
use crate::db::models::{ChartPoint, DeviceStats, Reading};

const DEFAULT_HISTORICO_LIMIT: i64 = 200;
const DEFAULT_CHART_LIMIT: i64 = 100;

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// `limit` is kept as a raw string: a present-but-unparseable value falls
/// back to the default instead of failing the request.
#[derive(Debug, Deserialize)]
pub struct HistoricoParams {
    pub limit: Option<String>,
}

impl HistoricoParams {
    fn effective_limit(&self) -> i64 {
        self.limit
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_HISTORICO_LIMIT)
    }
}

#[derive(Debug, Deserialize)]
pub struct ChartParams {
    pub limit: Option<i64>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// List every distinct device that has reported at least one reading.
#[utoipa::path(
    get,
    path = "/api/devices",
    responses(
        (status = 200, description = "Distinct device IDs, ascending", body = DeviceListResponse),
        (status = 500, description = "Database error"),
    ),
    tag = "readings"
)]
pub async fn get_devices(
    State(pool): State<PgPool>,
) -> Result<Json<DeviceListResponse>, AppError> {
    let devices: Vec<String> =
        sqlx::query_scalar("SELECT DISTINCT device_id FROM lecturas ORDER BY device_id")
            .fetch_all(&pool)
            .await
            .context("fetching device list")?;

    Ok(Json(DeviceListResponse { devices }))
}

/// Fetch the single most recent reading for a device.
#[utoipa::path(
    get,
    path = "/api/latest/{device_id}",
    params(("device_id" = String, Path, description = "Reporting device ID")),
    responses(
        (status = 200, description = "Most recent reading", body = ReadingDto),
        (status = 404, description = "Device has no readings"),
        (status = 500, description = "Database error"),
    ),
    tag = "readings"
)]
pub async fn get_latest_reading(
    State(pool): State<PgPool>,
    Path(device_id): Path<String>,
) -> Result<Json<ReadingDto>, AppError> {
    let row: Option<Reading> = sqlx::query_as(
        r#"
        SELECT device_id, temperatura, humedad, distancia_cm,
               luz_porcentaje, estado_luz, consumo_w, timestamp_lectura
        FROM lecturas
        WHERE device_id = $1
        ORDER BY timestamp_lectura DESC
        LIMIT 1
        "#,
    )
    .bind(&device_id)
    .fetch_optional(&pool)
    .await
    .context("fetching latest reading")?;

    row.map(ReadingDto::from)
        .map(Json)
        .ok_or(AppError::NotFound)
}

/// Fetch the 50 most recent readings for a device, oldest first.
///
/// The query is newest-first so `LIMIT 50` picks the most recent rows; the
/// result is then reversed so callers always receive ascending time order.
/// There is no time-window filter, despite what older docs claimed.
#[utoipa::path(
    get,
    path = "/api/history/{device_id}",
    params(("device_id" = String, Path, description = "Reporting device ID")),
    responses(
        (status = 200, description = "Up to 50 readings, oldest first", body = HistoryResponse),
        (status = 500, description = "Database error"),
    ),
    tag = "readings"
)]
pub async fn get_history(
    State(pool): State<PgPool>,
    Path(device_id): Path<String>,
) -> Result<Json<HistoryResponse>, AppError> {
    let mut rows: Vec<Reading> = sqlx::query_as(
        r#"
        SELECT device_id, temperatura, humedad, distancia_cm,
               luz_porcentaje, estado_luz, consumo_w, timestamp_lectura
        FROM lecturas
        WHERE device_id = $1
        ORDER BY timestamp_lectura DESC
        LIMIT 50
        "#,
    )
    .bind(&device_id)
    .fetch_all(&pool)
    .await
    .context("fetching history")?;

    rows.reverse();

    Ok(Json(HistoryResponse {
        readings: rows.into_iter().map(Into::into).collect(),
    }))
}

/// All-time AVG/MIN/MAX over temperatura, humedad and distancia_cm plus a
/// row count for one device. Aggregates are null when the device has no
/// rows; the count is then 0.
#[utoipa::path(
    get,
    path = "/api/stats/{device_id}",
    params(("device_id" = String, Path, description = "Reporting device ID")),
    responses(
        (status = 200, description = "All-time aggregates", body = DeviceStatsDto),
        (status = 500, description = "Database error"),
    ),
    tag = "readings"
)]
pub async fn get_stats(
    State(pool): State<PgPool>,
    Path(device_id): Path<String>,
) -> Result<Json<DeviceStatsDto>, AppError> {
    let stats: DeviceStats = sqlx::query_as(
        r#"
        SELECT
            AVG(temperatura) AS avg_temp,
            MIN(temperatura) AS min_temp,
            MAX(temperatura) AS max_temp,
            AVG(humedad) AS avg_humidity,
            MIN(humedad) AS min_humidity,
            MAX(humedad) AS max_humidity,
            AVG(distancia_cm) AS avg_distance,
            MIN(distancia_cm) AS min_distance,
            MAX(distancia_cm) AS max_distance,
            COUNT(*) AS total_readings
        FROM lecturas
        WHERE device_id = $1
        "#,
    )
    .bind(&device_id)
    .fetch_one(&pool)
    .await
    .context("fetching stats")?;

    Ok(Json(stats.into()))
}

/// Fleet snapshot: the most recent reading of every known device.
///
/// When several rows share a device's maximum timestamp, which one wins is
/// store-dependent (`DISTINCT ON` with no secondary sort key).
#[utoipa::path(
    get,
    path = "/sensores",
    responses(
        (status = 200, description = "Latest reading per device", body = FleetSnapshotResponse),
        (status = 500, description = "Database error"),
    ),
    tag = "readings"
)]
pub async fn get_fleet_snapshot(
    State(pool): State<PgPool>,
) -> Result<Json<FleetSnapshotResponse>, AppError> {
    let rows: Vec<Reading> = sqlx::query_as(
        r#"
        SELECT DISTINCT ON (device_id)
               device_id, temperatura, humedad, distancia_cm,
               luz_porcentaje, estado_luz, consumo_w, timestamp_lectura
        FROM lecturas
        ORDER BY device_id, timestamp_lectura DESC
        "#,
    )
    .fetch_all(&pool)
    .await
    .context("fetching fleet snapshot")?;

    Ok(Json(FleetSnapshotResponse {
        devices: rows.into_iter().map(Into::into).collect(),
    }))
}

/// Readings for a device, newest first, with power draw included.
/// `?limit=` caps the result (default 200); a non-numeric limit is ignored
/// and the default used.
#[utoipa::path(
    get,
    path = "/historico/{device_id}",
    params(
        ("device_id" = String, Path, description = "Reporting device ID"),
        ("limit" = Option<String>, Query, description = "Row cap, default 200; ignored when not an integer"),
    ),
    responses(
        (status = 200, description = "Readings, newest first", body = HistoricoResponse),
        (status = 500, description = "Database error"),
    ),
    tag = "readings"
)]
pub async fn get_historico(
    State(pool): State<PgPool>,
    Path(device_id): Path<String>,
    Query(params): Query<HistoricoParams>,
) -> Result<Json<HistoricoResponse>, AppError> {
    let rows: Vec<Reading> = sqlx::query_as(
        r#"
        SELECT device_id, temperatura, humedad, distancia_cm,
               luz_porcentaje, estado_luz, consumo_w, timestamp_lectura
        FROM lecturas
        WHERE device_id = $1
        ORDER BY timestamp_lectura DESC
        LIMIT $2
        "#,
    )
    .bind(&device_id)
    .bind(params.effective_limit())
    .fetch_all(&pool)
    .await
    .context("fetching historico")?;

    Ok(Json(HistoricoResponse {
        readings: rows.into_iter().map(Into::into).collect(),
    }))
}

/// Server-rendered Chart.js page plotting temperatura, humedad and
/// consumo_w for the last `limit` readings (default 100), oldest first.
/// Failures answer in plain text, not JSON.
#[utoipa::path(
    get,
    path = "/grafica/{device_id}",
    params(
        ("device_id" = String, Path, description = "Reporting device ID"),
        ("limit" = Option<i64>, Query, description = "Row cap, default 100"),
    ),
    responses(
        (status = 200, description = "HTML chart page", body = String, content_type = "text/html"),
        (status = 500, description = "Database error (plain text)"),
    ),
    tag = "charts"
)]
pub async fn get_chart_page(
    State(pool): State<PgPool>,
    Path(device_id): Path<String>,
    Query(params): Query<ChartParams>,
) -> Result<Html<String>, ChartError> {
    let mut points: Vec<ChartPoint> = sqlx::query_as(
        r#"
        SELECT timestamp_lectura, temperatura, humedad, consumo_w
        FROM lecturas
        WHERE device_id = $1
        ORDER BY timestamp_lectura DESC
        LIMIT $2
        "#,
    )
    .bind(&device_id)
    .bind(params.limit.unwrap_or(DEFAULT_CHART_LIMIT))
    .fetch_all(&pool)
    .await
    .context("fetching chart data")?;

    points.reverse();

    Ok(Html(chart::render_chart_page(&device_id, &points)?))
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Returns `200 OK` with `{"status":"ok"}` when the server is running.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy"),
    ),
    tag = "system"
)]
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// OpenAPI spec
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    paths(
        get_devices,
        get_latest_reading,
        get_history,
        get_stats,
        get_fleet_snapshot,
        get_historico,
        get_chart_page,
        health,
    ),
    components(schemas(
        ReadingDto,
        ReadingWithPowerDto,
        DeviceStatsDto,
        DeviceListResponse,
        HistoryResponse,
        FleetSnapshotResponse,
        HistoricoResponse,
    )),
    tags(
        (name = "readings", description = "Sensor reading query endpoints"),
        (name = "charts", description = "Server-rendered chart pages"),
        (name = "system", description = "System endpoints"),
    ),
    info(
        title = "ESP32 Telemetry API",
        version = "0.1.0",
        description = "Read-only HTTP API over ESP32 sensor readings"
    )
)]
pub struct ApiDoc;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
