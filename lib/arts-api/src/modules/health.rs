//! Liveness and version.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::{Response, Result, api_module};

/// Liveness report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    /// `ok` when every dependency is reachable.
    pub status: String,
    /// Server time, unix timestamp.
    #[serde(default)]
    pub timestamp: Option<i64>,
}

/// Deployed server version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    /// Semantic version.
    pub version: String,
    /// Git commit.
    #[serde(default)]
    pub commit: Option<String>,
    /// Build time.
    #[serde(default)]
    pub build_time: Option<String>,
}

/// Health calls.
#[api_module]
pub trait HealthApi {
    /// Liveness check.
    #[get("/arts/health")]
    #[auth(none)]
    async fn ping(&self) -> Result<HealthStatus>;

    /// Deployed version.
    #[get("/arts/health/version")]
    #[auth(none)]
    async fn version(&self) -> Result<VersionInfo>;

    /// Same route as [`HealthApi::ping`], returning the response with its headers.
    #[get("/arts/health")]
    #[auth(none)]
    #[raw]
    async fn probe(&self) -> Result<Response<Bytes>>;
}
