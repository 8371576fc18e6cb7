//! Static assets and remote app configuration.

use std::collections::HashMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Result, api_module};

/// Remote configuration read at app start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Oldest app version still supported.
    pub min_version: String,
    /// Where to get the latest version.
    #[serde(default)]
    pub download_url: Option<String>,
    /// Set while the platform is under maintenance.
    #[serde(default)]
    pub maintenance: bool,
    /// Announcement banner text.
    #[serde(default)]
    pub announcement: Option<String>,
    /// Feature switches and other keys this client does not interpret.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// A promotional banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    /// Banner id.
    pub id: String,
    /// Image URL.
    pub image: String,
    /// Target opened on tap.
    #[serde(default)]
    pub link: Option<String>,
    /// Placement, e.g. `home`.
    pub position: String,
    /// Display order, ascending.
    #[serde(default)]
    pub sort: i32,
}

/// Static calls. None of them needs a token.
#[api_module(module = "static")]
pub trait StaticApi {
    /// Asset bytes. `path` may contain `/`; it is sent percent-encoded as one segment.
    #[get("/arts/static/{path}")]
    #[auth(none)]
    #[binary]
    async fn asset(&self, path: &str) -> Result<Bytes>;

    /// Remote app configuration.
    #[get("/arts/static/config")]
    #[auth(none)]
    async fn app_config(&self) -> Result<AppConfig>;

    /// Banners, optionally for one placement only.
    #[get("/arts/static/banners")]
    #[auth(none)]
    async fn banners(&self, #[query] position: Option<&str>) -> Result<Vec<Banner>>;
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn app_config_keeps_unknown_keys() {
        let config: AppConfig = serde_json::from_value(json!({
            "minVersion": "2.3.0",
            "maintenance": true,
            "enableTickets": false
        }))
        .expect("config");

        assert_eq!(config.min_version, "2.3.0");
        assert!(config.maintenance);
        assert_eq!(config.extra.get("enableTickets"), Some(&json!(false)));
    }

    #[test]
    fn endpoint_table() {
        use crate::{AuthMode, Method, ResponseMode};

        let table: Vec<_> = StaticModule::ENDPOINTS
            .iter()
            .map(|e| (e.name, e.method, e.path, e.auth, e.response))
            .collect();
        assert_eq!(
            table,
            [
                ("asset", Method::Get, "/arts/static/{path}", AuthMode::None, ResponseMode::Binary),
                ("app_config", Method::Get, "/arts/static/config", AuthMode::None, ResponseMode::Json),
                ("banners", Method::Get, "/arts/static/banners", AuthMode::None, ResponseMode::Json),
            ]
        );
        assert!(StaticModule::ENDPOINTS.iter().all(|e| e.module == "static"));
    }
}
