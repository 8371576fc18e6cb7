//! Accounts: wallet login, profile, invitations, VIP level and mining stats.
//!
//! Login is a signed-nonce flow: fetch a [`NonceInfo`] for the wallet
//! address, sign its `message`, then exchange the signature for a token with
//! [`UserApi::login`].

use serde::{Deserialize, Serialize};

use super::{Page, PageQuery};
use crate::{Result, api_module};

/// Nonce to sign before logging in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NonceInfo {
    /// Single-use nonce.
    pub nonce: String,
    /// Exact text to sign.
    pub message: String,
}

/// Login with a signed nonce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Wallet address.
    pub address: String,
    /// Signature of the nonce message.
    pub signature: String,
    /// Nonce that was signed.
    pub nonce: String,
    /// Invite code, on first login only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invite_code: Option<String>,
}

impl LoginRequest {
    /// Login without an invite code.
    #[must_use]
    pub fn new(
        address: impl Into<String>,
        signature: impl Into<String>,
        nonce: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            signature: signature.into(),
            nonce: nonce.into(),
            invite_code: None,
        }
    }

    /// Attach an invite code.
    #[must_use]
    pub fn with_invite_code(mut self, code: impl Into<String>) -> Self {
        self.invite_code = Some(code.into());
        self
    }
}

/// Result of a login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Token for authenticated calls.
    pub token: String,
    /// The logged-in user.
    pub user: UserProfile,
}

/// A user's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// User id.
    pub id: String,
    /// Wallet address.
    pub address: String,
    /// Display name.
    #[serde(default)]
    pub nickname: Option<String>,
    /// Avatar URL.
    #[serde(default)]
    pub avatar: Option<String>,
    /// Code other users enter to join as invitees.
    pub invite_code: String,
    /// VIP level, `0` for none.
    #[serde(default)]
    pub vip_level: u32,
    /// Unix timestamp, seconds.
    pub created_at: i64,
}

/// Profile changes; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfile {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    /// New avatar URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Invite code of the inviter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindInvite {
    /// Inviter's code.
    pub invite_code: String,
}

/// A user who joined with the caller's invite code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invitee {
    /// Wallet address.
    pub address: String,
    /// Unix timestamp, seconds.
    pub joined_at: i64,
    /// VIP level.
    #[serde(default)]
    pub vip_level: u32,
}

/// VIP membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VipStatus {
    /// Current level.
    pub level: u32,
    /// Unix timestamp, absent for permanent levels.
    #[serde(default)]
    pub expires_at: Option<i64>,
    /// Next reachable level, absent at the top.
    #[serde(default)]
    pub next_level: Option<u32>,
    /// Progress towards the next level, as a decimal string in `0..=1`.
    #[serde(default)]
    pub progress: String,
}

/// Mining totals of the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MiningStats {
    /// Current hashrate.
    pub hashrate: String,
    /// Mined since the account was created.
    pub total_mined: String,
    /// Mined today (server time).
    pub today_mined: String,
    /// Mined token.
    pub symbol: String,
}

/// Balance of one token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    /// Token symbol.
    pub symbol: String,
    /// Spendable amount.
    pub available: String,
    /// Amount locked by pending orders.
    pub frozen: String,
}

/// Account calls.
#[api_module]
pub trait UserApi {
    /// Nonce to sign for `address`.
    #[get("/arts/user/nonce")]
    #[auth(none)]
    async fn nonce(&self, #[query] address: &str) -> Result<NonceInfo>;

    /// Exchange a signed nonce for a token.
    ///
    /// The token is not stored; pass it to `Client::set_token`.
    #[post("/arts/user/login")]
    #[auth(none)]
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse>;

    /// Invalidate the current token server-side.
    #[post("/arts/user/logout")]
    #[auth(required)]
    async fn logout(&self) -> Result<()>;

    /// The caller's profile.
    #[get("/arts/user/info")]
    #[auth(required)]
    async fn profile(&self) -> Result<UserProfile>;

    /// Update nickname or avatar.
    #[put("/arts/user/info")]
    #[auth(required)]
    async fn update_profile(&self, changes: &UpdateProfile) -> Result<UserProfile>;

    /// Bind an inviter after the first login.
    #[post("/arts/user/invite")]
    #[auth(required)]
    async fn bind_invite(&self, request: &BindInvite) -> Result<()>;

    /// Users who joined with the caller's code.
    #[get("/arts/user/invitees")]
    #[auth(required)]
    async fn invitees(&self, #[query(flatten)] page: &PageQuery) -> Result<Page<Invitee>>;

    /// VIP membership.
    #[get("/arts/user/vip")]
    #[auth(required)]
    async fn vip(&self) -> Result<VipStatus>;

    /// Mining totals.
    #[get("/arts/user/mining")]
    #[auth(required)]
    async fn mining(&self) -> Result<MiningStats>;

    /// Balances of every token held.
    #[get("/arts/user/balance")]
    #[auth(required)]
    async fn balances(&self) -> Result<Vec<Balance>>;
}
