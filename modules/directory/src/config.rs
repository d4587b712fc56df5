use serde::{Deserialize, Serialize};

/// Directory module configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirectoryConfig {
    /// Shared bearer token guarding the identity-sync endpoints.
    /// When unset the sync endpoints are disabled.
    #[serde(default)]
    pub sync_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_disabled_sync() {
        let cfg = DirectoryConfig::default();
        assert!(cfg.sync_token.is_none());
    }

    #[test]
    fn deserializes_from_module_bag() {
        let cfg: DirectoryConfig =
            serde_json::from_value(serde_json::json!({ "sync_token": "s3cr3t" })).unwrap();
        assert_eq!(cfg.sync_token.as_deref(), Some("s3cr3t"));
    }

    #[test]
    fn rejects_unknown_fields() {
        let result: Result<DirectoryConfig, _> =
            serde_json::from_value(serde_json::json!({ "sync_tokn": "oops" }));
        assert!(result.is_err());
    }
}
