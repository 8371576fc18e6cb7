//! Distribution channels and promotion stats.

use serde::{Deserialize, Serialize};

use crate::{Result, api_module};

/// A distribution channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    /// Channel id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Code users bind to join.
    pub code: String,
    /// Logo URL.
    #[serde(default)]
    pub logo: Option<String>,
    /// Short description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Promotion results of the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionStats {
    /// Users brought in.
    pub invited: u64,
    /// Of those, users who bought something.
    pub active: u64,
    /// Commission earned.
    pub commission: String,
    /// Token of the commission.
    pub symbol: String,
}

/// Bind the caller to a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindChannel {
    /// Channel code.
    pub channel_code: String,
}

/// Channel calls.
#[api_module]
pub trait ChannelApi {
    /// Every public channel.
    #[get("/arts/channel/list")]
    #[auth(none)]
    async fn list(&self) -> Result<Vec<Channel>>;

    /// One channel.
    #[get("/arts/channel/{id}")]
    async fn detail(&self, id: &str) -> Result<Channel>;

    /// Promotion results.
    #[get("/arts/channel/promotion")]
    #[auth(required)]
    async fn promotion(&self) -> Result<PromotionStats>;

    /// Bind to a channel; a user belongs to at most one.
    #[post("/arts/channel/bind")]
    #[auth(required)]
    async fn bind(&self, request: &BindChannel) -> Result<()>;
}
