use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::http::HeaderName;
use axum::{middleware::from_fn, middleware::from_fn_with_state, routing::get, Router};
use directory::contract::DirectoryApi;
use tower_http::{
    cors::CorsLayer, limit::RequestBodyLimitLayer, request_id::PropagateRequestIdLayer,
    request_id::SetRequestIdLayer, timeout::TimeoutLayer,
};

use crate::config::GatewayConfig;
use crate::identity::{self, IdentityState};
use crate::{openapi, request_id, web};

/// Everything the gateway mounts: one service per module plus the directory
/// client used for identity resolution.
pub struct ModuleServices {
    pub directory: Arc<directory::domain::service::Service>,
    pub directory_config: Arc<directory::config::DirectoryConfig>,
    pub directory_client: Arc<dyn DirectoryApi>,
    pub connections: Arc<connections::domain::service::Service>,
    pub messaging: Arc<messaging::domain::service::Service>,
    pub notifications: Arc<notifications::domain::service::Service>,
}

/// Assemble the full application router.
///
/// Middleware order (outermost to innermost):
/// SetRequestId -> PropagateRequestId -> record_request_id -> Trace
/// -> Timeout -> CORS -> BodyLimit -> identity resolution -> routes.
/// SetRequestId must be outside PropagateRequestId so the propagate layer
/// sees the generated header and copies it onto the response.
pub fn build_router(config: &GatewayConfig, services: ModuleServices) -> Result<Router> {
    let identity_header = HeaderName::try_from(config.identity_header.to_ascii_lowercase())
        .with_context(|| format!("invalid identity header name: {}", config.identity_header))?;

    let api = Router::new()
        .merge(directory::api::rest::router(
            services.directory,
            services.directory_config,
        ))
        .merge(connections::api::rest::router(services.connections))
        .merge(messaging::api::rest::router(services.messaging))
        .merge(notifications::api::rest::router(services.notifications));

    let mut router = Router::new()
        .nest("/api/v1", api)
        .route("/health", get(web::health_check));

    if config.enable_docs {
        router = router
            .route("/openapi.json", get(openapi::serve_spec))
            .route("/docs", get(web::serve_docs));
    }

    // Identity runs inside the other layers so its span already carries the
    // request id.
    router = router.layer(from_fn_with_state(
        IdentityState::new(services.directory_client, identity_header),
        identity::resolve_identity,
    ));

    let x_request_id = request_id::header();
    router = router.layer(RequestBodyLimitLayer::new(config.body_limit_bytes));
    if config.cors_enabled {
        router = router.layer(CorsLayer::permissive());
    }
    if config.request_timeout_sec > 0 {
        router = router.layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_sec,
        )));
    }
    router = router.layer(request_id::create_trace_layer());
    router = router.layer(from_fn(request_id::record_request_id));
    router = router.layer(PropagateRequestIdLayer::new(x_request_id.clone()));
    router = router.layer(SetRequestIdLayer::new(
        x_request_id,
        request_id::NanoRequestId,
    ));

    Ok(router)
}
