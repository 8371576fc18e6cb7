//! Mining nodes: products, purchases and rewards.

use serde::{Deserialize, Serialize};

use super::{Page, PageQuery};
use crate::{Result, api_module};

/// A node offered for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeProduct {
    /// Product id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: String,
    /// Token the price is in.
    pub symbol: String,
    /// Hashrate granted per unit.
    pub hashrate: String,
    /// Mining period, days.
    pub duration_days: u32,
    /// Units left.
    #[serde(default)]
    pub stock: u64,
}

/// Buy `quantity` units of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseNode {
    /// Product id.
    pub node_id: String,
    /// Units to buy.
    pub quantity: u32,
    /// Token to pay with.
    pub pay_symbol: String,
}

/// Purchase receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeOrder {
    /// Order id.
    pub order_id: String,
    /// Product id.
    pub node_id: String,
    /// Units bought.
    pub quantity: u32,
    /// Amount charged.
    pub amount: String,
    /// Token charged.
    pub symbol: String,
    /// Unix timestamp, seconds.
    pub created_at: i64,
}

/// A node owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedNode {
    /// Holding id.
    pub id: String,
    /// Product id.
    pub node_id: String,
    /// Product name.
    pub name: String,
    /// Units held.
    pub quantity: u32,
    /// Combined hashrate.
    pub hashrate: String,
    /// Unix timestamp, seconds.
    pub started_at: i64,
    /// Unix timestamp, seconds.
    pub expires_at: i64,
}

/// One reward payout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeReward {
    /// Reward id.
    pub id: String,
    /// Amount earned.
    pub amount: String,
    /// Token earned.
    pub symbol: String,
    /// Whether it has been claimed.
    #[serde(default)]
    pub claimed: bool,
    /// Unix timestamp, seconds.
    pub created_at: i64,
}

/// Result of claiming rewards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResult {
    /// Amount moved to the balance.
    pub amount: String,
    /// Token claimed.
    pub symbol: String,
}

/// Node calls.
#[api_module]
pub trait NodeApi {
    /// Nodes on sale.
    #[get("/arts/node/list")]
    async fn list(&self, #[query(flatten)] page: &PageQuery) -> Result<Page<NodeProduct>>;

    /// One node product.
    #[get("/arts/node/{id}")]
    async fn detail(&self, id: &str) -> Result<NodeProduct>;

    /// Buy nodes. Fails with a business error when the balance is too low.
    #[post("/arts/node/purchase")]
    #[auth(required)]
    async fn purchase(&self, order: &PurchaseNode) -> Result<NodeOrder>;

    /// Nodes owned by the caller.
    #[get("/arts/node/mine")]
    #[auth(required)]
    async fn mine(&self) -> Result<Vec<OwnedNode>>;

    /// Reward history.
    #[get("/arts/node/rewards")]
    #[auth(required)]
    async fn rewards(&self, #[query(flatten)] page: &PageQuery) -> Result<Page<NodeReward>>;

    /// Claim every unclaimed reward.
    #[post("/arts/node/rewards/claim")]
    #[auth(required)]
    async fn claim(&self) -> Result<ClaimResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_table() {
        use crate::{AuthMode, Method, ResponseMode};

        let table: Vec<_> = NodeModule::ENDPOINTS
            .iter()
            .map(|e| (e.name, e.method, e.path, e.auth, e.response))
            .collect();
        assert_eq!(
            table,
            [
                ("list", Method::Get, "/arts/node/list", AuthMode::Optional, ResponseMode::Json),
                ("detail", Method::Get, "/arts/node/{id}", AuthMode::Optional, ResponseMode::Json),
                ("purchase", Method::Post, "/arts/node/purchase", AuthMode::Required, ResponseMode::Json),
                ("mine", Method::Get, "/arts/node/mine", AuthMode::Required, ResponseMode::Json),
                ("rewards", Method::Get, "/arts/node/rewards", AuthMode::Required, ResponseMode::Json),
                ("claim", Method::Post, "/arts/node/rewards/claim", AuthMode::Required, ResponseMode::Json),
            ]
        );
        assert!(NodeModule::ENDPOINTS.iter().all(|e| e.module == "node"));
    }
}
