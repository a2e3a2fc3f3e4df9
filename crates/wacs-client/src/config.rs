//! Run configuration: which server to talk to and which accounts to use

use serde::{Deserialize, Serialize};
use wacs_fs::{ConfigStore, NormalizedPath};

use crate::{Credentials, Result};

/// Environment variable naming the configuration file for live runs.
pub const CONFIG_ENV: &str = "WACS_TEST_CONFIG";

/// Settings for an end-to-end run against a hosting service.
///
/// Stored as JSON:
///
/// ```json
/// {
///   "goodLogin": { "username": "alice", "password": "secret" },
///   "badLogin":  { "username": "alice", "password": "wrong" },
///   "endpoint":  "https://git.example.org/api/v1",
///   "tokenName": "wacs-client-test"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestConfig {
    /// Credentials that must be accepted.
    pub good_login: Credentials,
    /// Credentials that must be rejected.
    pub bad_login: Credentials,
    /// API base URL.
    pub endpoint: String,
    /// Name given to the access token issued at login.
    pub token_name: String,
}

impl TestConfig {
    /// Load a configuration file; the format follows the extension.
    pub fn load(path: impl Into<NormalizedPath>) -> Result<Self> {
        Ok(ConfigStore::new().load(&path.into())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_json_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("test.json");
        fs::write(
            &path,
            r#"{
                "goodLogin": {"username": "alice", "password": "right"},
                "badLogin": {"username": "alice", "password": "wrong"},
                "endpoint": "https://git.example.org/api/v1",
                "tokenName": "wacs-client-test"
            }"#,
        )
        .unwrap();

        let config = TestConfig::load(path).unwrap();

        assert_eq!(config.good_login, Credentials::new("alice", "right"));
        assert_eq!(config.bad_login.password, "wrong");
        assert_eq!(config.endpoint, "https://git.example.org/api/v1");
        assert_eq!(config.token_name, "wacs-client-test");
    }

    #[test]
    fn test_missing_field_is_a_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("test.json");
        fs::write(&path, r#"{"endpoint": "https://git.example.org/api/v1"}"#).unwrap();

        let err = TestConfig::load(path).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Fs(wacs_fs::Error::ConfigParse { .. })
        ));
    }
}
