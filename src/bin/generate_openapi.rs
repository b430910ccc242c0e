//! Prints the service's OpenAPI document to stdout.
//!
//! Usage:
//!   cargo run --bin generate_openapi > openapi.json

use esp32_telemetry_api::api::handlers::ApiDoc;
use utoipa::OpenApi;

fn main() -> anyhow::Result<()> {
    println!("{}", ApiDoc::openapi().to_pretty_json()?);
    Ok(())
}
