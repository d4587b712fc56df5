use serde::{Deserialize, Serialize};

/// Gateway configuration, read from the `gateway` entry of the per-module
/// configuration bag.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Serve `/docs` and `/openapi.json`.
    #[serde(default)]
    pub enable_docs: bool,
    /// Permissive CORS for browser clients on another origin.
    #[serde(default)]
    pub cors_enabled: bool,
    /// Trusted header carrying the identity subject, set by the fronting
    /// identity-aware proxy. Never read from untrusted traffic directly.
    #[serde(default = "default_identity_header")]
    pub identity_header: String,
    /// Request body cap in bytes.
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
    /// Per-request timeout in seconds; 0 disables the layer.
    #[serde(default = "default_timeout_sec")]
    pub request_timeout_sec: u64,
}

fn default_identity_header() -> String {
    "x-identity-subject".to_string()
}

fn default_body_limit() -> usize {
    256 * 1024
}

fn default_timeout_sec() -> u64 {
    30
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            enable_docs: false,
            cors_enabled: false,
            identity_header: default_identity_header(),
            body_limit_bytes: default_body_limit(),
            request_timeout_sec: default_timeout_sec(),
        }
    }
}
