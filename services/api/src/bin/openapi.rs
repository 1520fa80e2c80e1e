//! services/api/src/bin/openapi.rs
//!
//! Writes the OpenAPI 3.0 document for the MindReflect REST API.
//! Usage: `openapi [OUTPUT]` (defaults to `openapi.json`).

use api_lib::web::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "openapi.json".to_string());

    let mut doc = ApiDoc::openapi();
    doc.info.title = "MindReflect API".to_string();
    doc.info.version = env!("CARGO_PKG_VERSION").to_string();

    std::fs::write(&path, doc.to_pretty_json()?)?;
    println!("OpenAPI specification generated at {}", path);
    Ok(())
}
