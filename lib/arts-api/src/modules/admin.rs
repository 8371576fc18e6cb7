//! Back-office calls. The server rejects non-admin tokens with a business error.

use serde::{Deserialize, Serialize};

use super::{DEFAULT_PAGE_SIZE, Page};
use crate::{Result, api_module};

/// Filters of [`AdminApi::users`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserQuery {
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub size: u32,
    /// Matches address, nickname or invite code.
    pub keyword: Option<String>,
    /// Only banned (or only active) users.
    pub banned: Option<bool>,
}

impl Default for AdminUserQuery {
    fn default() -> Self {
        Self {
            page: 1,
            size: DEFAULT_PAGE_SIZE,
            keyword: None,
            banned: None,
        }
    }
}

/// A user as seen by the back office.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    /// User id.
    pub id: String,
    /// Wallet address.
    pub address: String,
    /// Display name.
    #[serde(default)]
    pub nickname: Option<String>,
    /// VIP level.
    #[serde(default)]
    pub vip_level: u32,
    /// Whether the account is banned.
    #[serde(default)]
    pub banned: bool,
    /// Unix timestamp, seconds.
    pub created_at: i64,
}

/// Ban a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BanUser {
    /// Shown to the user.
    pub reason: String,
    /// Unix timestamp the ban ends; permanent when `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub until: Option<i64>,
}

/// Review decision for a submitted work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewWork {
    /// Publish or reject.
    pub approved: bool,
    /// Reason shown to the author.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

/// Platform-wide counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStats {
    /// Registered users.
    pub users: u64,
    /// Users active in the last 24 hours.
    pub active_users: u64,
    /// Published works.
    pub works: u64,
    /// Trading volume of the day.
    pub volume_today: String,
    /// Token of the volume.
    pub symbol: String,
}

/// Back-office calls.
#[api_module]
pub trait AdminApi {
    /// Search users.
    #[get("/arts/admin/users")]
    #[auth(required)]
    async fn users(&self, #[query(flatten)] query: &AdminUserQuery) -> Result<Page<AdminUser>>;

    /// Ban a user.
    #[post("/arts/admin/users/{id}/ban")]
    #[auth(required)]
    async fn ban_user(&self, id: &str, ban: &BanUser) -> Result<()>;

    /// Approve or reject a submitted work.
    #[post("/arts/admin/work/{id}/review")]
    #[auth(required)]
    async fn review_work(&self, id: &str, review: &ReviewWork) -> Result<()>;

    /// Platform-wide counters.
    #[get("/arts/admin/stats")]
    #[auth(required)]
    async fn stats(&self) -> Result<PlatformStats>;
}
