use axum::response::Json;
use utoipa::OpenApi;

/// Merge the per-module OpenAPI documents into one spec served at
/// `/openapi.json`.
pub fn build_spec() -> utoipa::openapi::OpenApi {
    let mut doc = directory::api::rest::ApiDoc::openapi();
    doc.merge(connections::api::rest::ApiDoc::openapi());
    doc.merge(messaging::api::rest::ApiDoc::openapi());
    doc.merge(notifications::api::rest::ApiDoc::openapi());

    doc.info.title = "NextStep Connect API".to_string();
    doc.info.version = env!("CARGO_PKG_VERSION").to_string();
    doc.info.description = Some(
        "Connections, direct messaging, notifications and the user directory.".to_string(),
    );
    doc
}

pub async fn serve_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(build_spec())
}
