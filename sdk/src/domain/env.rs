// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// App Environment - identity and locations handed to the app by Nebo's sandbox
//
// Resolved once at startup from NEBO_APP_* variables and immutable afterwards.
// Every capability's HealthCheck reports `name` and `version` from here.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// App installation directory
pub const ENV_DIR: &str = "NEBO_APP_DIR";
/// Unix socket path the app must listen on
pub const ENV_SOCK: &str = "NEBO_APP_SOCK";
/// App ID from the manifest
pub const ENV_ID: &str = "NEBO_APP_ID";
/// App name from the manifest
pub const ENV_NAME: &str = "NEBO_APP_NAME";
/// App version from the manifest
pub const ENV_VERSION: &str = "NEBO_APP_VERSION";
/// App data directory
pub const ENV_DATA: &str = "NEBO_APP_DATA";

/// Typed view of the NEBO_APP_* environment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppEnv {
    /// App's installation directory (`NEBO_APP_DIR`)
    pub dir: PathBuf,

    /// Unix socket path to listen on (`NEBO_APP_SOCK`)
    pub sock_path: PathBuf,

    /// App ID from manifest (`NEBO_APP_ID`)
    pub id: String,

    /// App name from manifest (`NEBO_APP_NAME`)
    pub name: String,

    /// App version from manifest (`NEBO_APP_VERSION`)
    pub version: String,

    /// Path to the app's data directory (`NEBO_APP_DATA`)
    pub data_dir: PathBuf,
}

impl AppEnv {
    /// Read the process environment. Unset variables become empty values.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (used by `from_env` and tests)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).unwrap_or_default();
        Self {
            dir: PathBuf::from(get(ENV_DIR)),
            sock_path: PathBuf::from(get(ENV_SOCK)),
            id: get(ENV_ID),
            name: get(ENV_NAME),
            version: get(ENV_VERSION),
            data_dir: PathBuf::from(get(ENV_DATA)),
        }
    }

    /// Whether a socket path was provided
    pub fn has_sock_path(&self) -> bool {
        !self.sock_path.as_os_str().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_reads_all_fields() {
        let env = AppEnv::from_lookup(lookup(&[
            (ENV_DIR, "/apps/test"),
            (ENV_SOCK, "/tmp/test.sock"),
            (ENV_ID, "com.example.test"),
            (ENV_NAME, "Test App"),
            (ENV_VERSION, "1.2.3"),
            (ENV_DATA, "/apps/test/data"),
        ]));

        assert_eq!(env.dir, PathBuf::from("/apps/test"));
        assert_eq!(env.sock_path, PathBuf::from("/tmp/test.sock"));
        assert_eq!(env.id, "com.example.test");
        assert_eq!(env.name, "Test App");
        assert_eq!(env.version, "1.2.3");
        assert_eq!(env.data_dir, PathBuf::from("/apps/test/data"));
        assert!(env.has_sock_path());
    }

    #[test]
    fn test_missing_variables_are_empty() {
        let env = AppEnv::from_lookup(lookup(&[]));

        assert_eq!(env, AppEnv::default());
        assert!(!env.has_sock_path());
        assert!(env.name.is_empty());
    }
}
