use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of the `lecturas` table. The table is written by the ESP32
/// ingestion path; this service treats it as append-only and read-only.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Reading {
    pub device_id: String,
    /// Degrees Celsius
    pub temperatura: Option<f64>,
    /// Relative humidity percentage
    pub humedad: Option<f64>,
    /// Centimetres
    pub distancia_cm: Option<f64>,
    /// Light level percentage
    pub luz_porcentaje: Option<f64>,
    /// Light state label (e.g. "encendida" / "apagada")
    pub estado_luz: Option<String>,
    /// Watts
    pub consumo_w: Option<f64>,
    pub timestamp_lectura: DateTime<Utc>,
}

/// Slim row for the chart page: only the three plotted series plus the label.
#[derive(Debug, Clone, FromRow)]
pub struct ChartPoint {
    pub timestamp_lectura: DateTime<Utc>,
    pub temperatura: Option<f64>,
    pub humedad: Option<f64>,
    pub consumo_w: Option<f64>,
}

/// All-time aggregates for one device. Every aggregate is null when the
/// device has no rows (SQL aggregate-of-empty-set semantics); the count is 0.
#[derive(Debug, Clone, FromRow)]
pub struct DeviceStats {
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
