//! Event tickets.

use serde::{Deserialize, Serialize};

use super::{Page, PageQuery};
use crate::{Result, api_module};

/// A ticket on sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Ticket id.
    pub id: String,
    /// Event title.
    pub title: String,
    /// Poster URL.
    #[serde(default)]
    pub cover: Option<String>,
    /// Unit price.
    pub price: String,
    /// Token the price is in.
    pub symbol: String,
    /// Tickets left.
    #[serde(default)]
    pub stock: u64,
    /// Event start, unix timestamp.
    pub starts_at: i64,
}

/// Buy tickets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyTicket {
    /// Ticket id.
    pub ticket_id: String,
    /// Number of tickets.
    pub quantity: u32,
}

/// Purchase receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketOrder {
    /// Order id.
    pub order_id: String,
    /// Ticket id.
    pub ticket_id: String,
    /// Number of tickets.
    pub quantity: u32,
    /// Amount charged.
    pub amount: String,
    /// Token charged.
    pub symbol: String,
}

/// A ticket held by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedTicket {
    /// Holding id, used to redeem.
    pub id: String,
    /// Ticket id.
    pub ticket_id: String,
    /// Event title.
    pub title: String,
    /// Code shown at the entrance.
    pub code: String,
    /// Whether it has been used.
    #[serde(default)]
    pub redeemed: bool,
    /// Unix timestamp of redemption.
    #[serde(default)]
    pub redeemed_at: Option<i64>,
}

/// Ticket calls.
#[api_module]
pub trait TicketApi {
    /// Tickets on sale.
    #[get("/arts/ticket/list")]
    async fn list(&self, #[query(flatten)] page: &PageQuery) -> Result<Page<Ticket>>;

    /// Buy tickets.
    #[post("/arts/ticket/buy")]
    #[auth(required)]
    async fn buy(&self, order: &BuyTicket) -> Result<TicketOrder>;

    /// Tickets held by the caller.
    #[get("/arts/ticket/mine")]
    #[auth(required)]
    async fn mine(&self, #[query(flatten)] page: &PageQuery) -> Result<Page<OwnedTicket>>;

    /// Mark a held ticket as used.
    #[post("/arts/ticket/{id}/redeem")]
    #[auth(required)]
    async fn redeem(&self, id: &str) -> Result<OwnedTicket>;
}
