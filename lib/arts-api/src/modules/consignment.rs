//! Secondary market: owners list editions for resale, others buy them.

use serde::{Deserialize, Serialize};

use super::{DEFAULT_PAGE_SIZE, Page, PageQuery};
use crate::{Result, api_module};

/// Listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsignmentSort {
    /// Newest first.
    Latest,
    /// Cheapest first.
    PriceAsc,
    /// Most expensive first.
    PriceDesc,
}

/// State of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsignmentStatus {
    /// For sale.
    Listed,
    /// Bought.
    Sold,
    /// Withdrawn by the seller.
    Cancelled,
}

/// Filters of [`ConsignmentApi::list`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsignmentQuery {
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub size: u32,
    /// Listings of one work only.
    pub work_id: Option<String>,
    /// Listing order, server default when `None`.
    pub sort: Option<ConsignmentSort>,
}

impl Default for ConsignmentQuery {
    fn default() -> Self {
        Self {
            page: 1,
            size: DEFAULT_PAGE_SIZE,
            work_id: None,
            sort: None,
        }
    }
}

/// A resale listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consignment {
    /// Listing id.
    pub id: String,
    /// Listed work.
    pub work_id: String,
    /// Work title.
    pub title: String,
    /// Cover URL.
    #[serde(default)]
    pub cover: Option<String>,
    /// Edition number.
    pub edition: u64,
    /// Seller wallet address.
    pub seller: String,
    /// Asking price.
    pub price: String,
    /// Token the price is in.
    pub symbol: String,
    /// Listing state.
    pub status: ConsignmentStatus,
    /// Unix timestamp, seconds.
    pub created_at: i64,
}

/// List an owned edition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConsignment {
    /// Id of the owned edition.
    pub owned_id: String,
    /// Asking price.
    pub price: String,
    /// Token the price is in.
    pub symbol: String,
}

/// Payment choice when buying a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyConsignment {
    /// Token to pay with.
    pub pay_symbol: String,
}

/// Purchase receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsignmentOrder {
    /// Order id.
    pub order_id: String,
    /// Listing bought.
    pub consignment_id: String,
    /// Amount charged, fee included.
    pub amount: String,
    /// Platform fee.
    #[serde(default)]
    pub fee: Option<String>,
    /// Token charged.
    pub symbol: String,
}

/// Secondary market calls.
#[api_module]
pub trait ConsignmentApi {
    /// Listings for sale.
    #[get("/arts/consignment/list")]
    async fn list(&self, #[query(flatten)] query: &ConsignmentQuery) -> Result<Page<Consignment>>;

    /// List an owned edition for sale.
    #[post("/arts/consignment")]
    #[auth(required)]
    async fn create(&self, listing: &CreateConsignment) -> Result<Consignment>;

    /// Withdraw one of the caller's listings.
    #[delete("/arts/consignment/{id}")]
    #[auth(required)]
    async fn cancel(&self, id: &str) -> Result<()>;

    /// Buy a listing.
    #[post("/arts/consignment/{id}/buy")]
    #[auth(required)]
    async fn buy(&self, id: &str, payment: &BuyConsignment) -> Result<ConsignmentOrder>;

    /// The caller's own listings.
    #[get("/arts/consignment/mine")]
    #[auth(required)]
    async fn mine(&self, #[query(flatten)] page: &PageQuery) -> Result<Page<Consignment>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Query;

    #[test]
    fn sort_is_snake_case_in_query() {
        let query = ConsignmentQuery {
            work_id: Some("w-9".to_string()),
            sort: Some(ConsignmentSort::PriceAsc),
            ..ConsignmentQuery::default()
        };
        let query = Query::from_serialize(&query).expect("query");
        assert_eq!(
            query.to_query_string(),
            "page=1&size=20&workId=w-9&sort=price_asc"
        );
    }

    #[test]
    fn endpoint_table() {
        use crate::{AuthMode, Method, ResponseMode};

        let table: Vec<_> = ConsignmentModule::ENDPOINTS
            .iter()
            .map(|e| (e.name, e.method, e.path, e.auth, e.response))
            .collect();
        assert_eq!(
            table,
            [
                ("list", Method::Get, "/arts/consignment/list", AuthMode::Optional, ResponseMode::Json),
                ("create", Method::Post, "/arts/consignment", AuthMode::Required, ResponseMode::Json),
                ("cancel", Method::Delete, "/arts/consignment/{id}", AuthMode::Required, ResponseMode::Json),
                ("buy", Method::Post, "/arts/consignment/{id}/buy", AuthMode::Required, ResponseMode::Json),
                ("mine", Method::Get, "/arts/consignment/mine", AuthMode::Required, ResponseMode::Json),
            ]
        );
        assert!(ConsignmentModule::ENDPOINTS.iter().all(|e| e.module == "consignment"));
    }
}
