use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::models::{DeviceStats, Reading};

/// One sensor reading as returned by `/api/latest`, `/api/history` and
/// `/sensores`. Those queries never select `consumo_w`, so the field is
/// absent here rather than null.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadingDto {
    pub device_id: String,
    /// Degrees Celsius
    pub temperatura: Option<f64>,
    /// Relative humidity percentage
    pub humedad: Option<f64>,
    /// Centimetres
    pub distancia_cm: Option<f64>,
    /// Light level percentage
    pub luz_porcentaje: Option<f64>,
    pub estado_luz: Option<String>,
    /// ISO-8601
    pub timestamp_lectura: DateTime<Utc>,
}

/// One sensor reading including power draw, as returned by `/historico`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadingWithPowerDto {
    pub device_id: String,
    pub temperatura: Option<f64>,
    pub humedad: Option<f64>,
    pub distancia_cm: Option<f64>,
    pub luz_porcentaje: Option<f64>,
    pub estado_luz: Option<String>,
    /// Watts
    pub consumo_w: Option<f64>,
    /// ISO-8601
    pub timestamp_lectura: DateTime<Utc>,
}

/// All-time per-device aggregates. Aggregate fields are null for a device
/// with no readings; `total_readings` is then 0.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeviceStatsDto {
    pub avg_temp: Option<f64>,
    pub min_temp: Option<f64>,
    pub max_temp: Option<f64>,
    pub avg_humidity: Option<f64>,
    pub min_humidity: Option<f64>,
    pub max_humidity: Option<f64>,
    pub avg_distance: Option<f64>,
    pub min_distance: Option<f64>,
    pub max_distance: Option<f64>,
    pub total_readings: i64,
}

/// Response for `GET /api/devices`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeviceListResponse {
    /// Distinct device IDs, ascending.
    pub devices: Vec<String>,
}

/// Response for `GET /api/history/{device_id}`: oldest first, at most 50.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HistoryResponse {
    pub readings: Vec<ReadingDto>,
}

/// Response for `GET /sensores`: the latest reading of every known device.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FleetSnapshotResponse {
    pub devices: Vec<ReadingDto>,
}

/// Response for `GET /historico/{device_id}`: newest first.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HistoricoResponse {
    pub readings: Vec<ReadingWithPowerDto>,
}

impl From<Reading> for ReadingDto {
    fn from(r: Reading) -> Self {
        Self {
            device_id: r.device_id,
            temperatura: r.temperatura,
            humedad: r.humedad,
            distancia_cm: r.distancia_cm,
            luz_porcentaje: r.luz_porcentaje,
            estado_luz: r.estado_luz,
            timestamp_lectura: r.timestamp_lectura,
        }
    }
}

impl From<Reading> for ReadingWithPowerDto {
    fn from(r: Reading) -> Self {
        Self {
            device_id: r.device_id,
            temperatura: r.temperatura,
            humedad: r.humedad,
            distancia_cm: r.distancia_cm,
            luz_porcentaje: r.luz_porcentaje,
            estado_luz: r.estado_luz,
            consumo_w: r.consumo_w,
            timestamp_lectura: r.timestamp_lectura,
        }
    }
}

impl From<DeviceStats> for DeviceStatsDto {
    fn from(s: DeviceStats) -> Self {
        Self {
            avg_temp: s.avg_temp,
            min_temp: s.min_temp,
            max_temp: s.max_temp,
            avg_humidity: s.avg_humidity,
            min_humidity: s.min_humidity,
            max_humidity: s.max_humidity,
            avg_distance: s.avg_distance,
            min_distance: s.min_distance,
            max_distance: s.max_distance,
            total_readings: s.total_readings,
        }
    }
}
