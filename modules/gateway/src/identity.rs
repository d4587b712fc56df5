use std::sync::Arc;

use axum::http::HeaderName;
use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use api_core::CallerIdentity;
use directory::contract::DirectoryApi;
use tracing::{debug, warn};

/// State for the identity-resolution middleware.
#[derive(Clone)]
pub struct IdentityState {
    directory: Arc<dyn DirectoryApi>,
    header: HeaderName,
}

impl IdentityState {
    pub fn new(directory: Arc<dyn DirectoryApi>, header: HeaderName) -> Self {
        Self { directory, header }
    }
}

/// Resolve the trusted identity header into a [`CallerIdentity`] extension,
/// exactly once per request.
///
/// Missing or unknown subjects resolve to anonymous; handlers decide per
/// operation whether anonymous means 401 or an empty read. A directory
/// failure also degrades to anonymous so that unauthenticated surfaces
/// (health, docs) stay reachable.
pub async fn resolve_identity(
    State(state): State<IdentityState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let subject = req
        .headers()
        .get(&state.header)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let identity = match subject {
        None => CallerIdentity::anonymous(),
        Some(subject) => match state.directory.resolve_subject(&subject).await {
            Ok(Some(ctx)) => CallerIdentity::authenticated(ctx),
            Ok(None) => {
                debug!(%subject, "Unknown identity subject");
                CallerIdentity::anonymous()
            }
            Err(err) => {
                warn!(%subject, error = %err, "Identity resolution failed");
                CallerIdentity::anonymous()
            }
        },
    };

    req.extensions_mut().insert(identity);
    next.run(req).await
}
