//! services/portal/src/bin/openapi.rs
//!
//! Writes the OpenAPI 3.0 document for the JSON endpoints to `openapi.json`,
//! or to the path given as the first argument.

use portal_lib::web::rest::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "openapi.json".to_string());
    std::fs::write(&path, ApiDoc::openapi().to_pretty_json()?)?;
    println!("OpenAPI document written to {}", path);
    Ok(())
}
