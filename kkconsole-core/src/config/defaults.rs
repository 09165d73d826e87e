//! Default configuration values for the console
//!
//! This module centralizes all default values to make them easy to find and modify.

use std::time::Duration;

// Backend defaults
pub const DEFAULT_BACKEND_HOST: &str = "127.0.0.1";
pub const DEFAULT_BACKEND_PORT: u16 = 8082;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// Read-side endpoint paths
pub const CLUSTER_LIST_PATH: &str = "getClusterInfo";
pub const CLUSTER_VERSION_OPTIONS_PATH: &str = "clusterVersionOptions";
pub const KS_VERSION_OPTIONS_PATH: &str = "ksVersionOptions";

// Wizard defaults
pub const DEFAULT_KUBEKEY_NAMESPACE: &str = "kubekey-system";
pub const DEFAULT_KUBESPHERE_VERSION: &str = "v3.4.0";

// Logging defaults
pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const fn duration_secs(secs: u64) -> Duration {
    Duration::from_secs(secs)
}
