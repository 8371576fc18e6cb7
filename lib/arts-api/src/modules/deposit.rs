//! On-chain deposits and withdrawals.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use super::{DEFAULT_PAGE_SIZE, Page};
use crate::{Result, api_module};

/// Address to send funds to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositAddress {
    /// Chain name, e.g. `BSC`.
    pub chain: String,
    /// Token symbol.
    pub symbol: String,
    /// Receiving address.
    pub address: String,
    /// Memo or tag some chains require.
    #[serde(default)]
    pub memo: Option<String>,
    /// Smallest accepted amount.
    #[serde(default)]
    pub min_amount: Option<String>,
}

/// Report a deposit transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitDeposit {
    /// Chain name.
    pub chain: String,
    /// Token symbol.
    pub symbol: String,
    /// Transaction hash.
    pub tx_hash: String,
    /// Amount sent.
    pub amount: String,
}

/// Withdraw to an external address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawRequest {
    /// Chain name.
    pub chain: String,
    /// Token symbol.
    pub symbol: String,
    /// Destination address.
    pub address: String,
    /// Amount to withdraw, fee included.
    pub amount: String,
    /// Memo for chains that need one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

/// Direction of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Funds received.
    #[display("deposit")]
    Deposit,
    /// Funds sent out.
    #[display("withdraw")]
    Withdraw,
}

/// Processing state of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    /// Waiting for confirmations or review.
    Pending,
    /// Credited or sent.
    Success,
    /// Rejected or reverted.
    Failed,
}

/// A deposit or withdrawal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositRecord {
    /// Record id.
    pub id: String,
    /// Direction.
    pub kind: RecordKind,
    /// Chain name.
    pub chain: String,
    /// Token symbol.
    pub symbol: String,
    /// Amount.
    pub amount: String,
    /// Network fee, withdrawals only.
    #[serde(default)]
    pub fee: Option<String>,
    /// Transaction hash, once known.
    #[serde(default)]
    pub tx_hash: Option<String>,
    /// Processing state.
    pub status: RecordStatus,
    /// Unix timestamp, seconds.
    pub created_at: i64,
}

/// Filters of [`DepositApi::records`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordQuery {
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub size: u32,
    /// Only deposits or only withdrawals; both when `None`.
    pub kind: Option<RecordKind>,
}

impl Default for RecordQuery {
    fn default() -> Self {
        Self {
            page: 1,
            size: DEFAULT_PAGE_SIZE,
            kind: None,
        }
    }
}

/// Deposit and withdrawal calls.
#[api_module]
pub trait DepositApi {
    /// Receiving address for `symbol` on `chain`.
    #[get("/arts/deposit/address")]
    #[auth(required)]
    async fn address(&self, #[query] chain: &str, #[query] symbol: &str)
    -> Result<DepositAddress>;

    /// Report a deposit so it is credited before the chain scanner sees it.
    #[post("/arts/deposit")]
    #[auth(required)]
    async fn submit(&self, deposit: &SubmitDeposit) -> Result<DepositRecord>;

    /// History of deposits and withdrawals.
    #[get("/arts/deposit/records")]
    #[auth(required)]
    async fn records(&self, #[query(flatten)] query: &RecordQuery) -> Result<Page<DepositRecord>>;

    /// Request a withdrawal.
    #[post("/arts/deposit/withdraw")]
    #[auth(required)]
    async fn withdraw(&self, request: &WithdrawRequest) -> Result<DepositRecord>;
}
