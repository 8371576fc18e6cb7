//! Domain modules.
//!
//! Each module is a trait declared with [`api_module`](crate::api_module) and
//! the wire models it exchanges. The generated `*Module` structs hold a clone
//! of the client's engine and carry no logic of their own.
//!
//! Wire models use camelCase field names. Token and price amounts are decimal
//! strings, kept as-is to avoid float rounding.

mod admin;
mod channel;
mod consignment;
mod deposit;
mod file;
mod health;
mod node;
mod statics;
mod ticket;
mod user;
mod work;

use serde::{Deserialize, Serialize};

pub use admin::{
    AdminApi, AdminModule, AdminUser, AdminUserQuery, BanUser, PlatformStats, ReviewWork,
};
pub use channel::{BindChannel, Channel, ChannelApi, ChannelModule, PromotionStats};
pub use consignment::{
    BuyConsignment, Consignment, ConsignmentApi, ConsignmentModule, ConsignmentOrder,
    ConsignmentQuery, ConsignmentSort, ConsignmentStatus, CreateConsignment,
};
pub use deposit::{
    DepositAddress, DepositApi, DepositModule, DepositRecord, RecordKind, RecordQuery,
    RecordStatus, SubmitDeposit, WithdrawRequest,
};
pub use file::{FileApi, FileInfo, FileModule, UploadedFile};
pub use health::{HealthApi, HealthModule, HealthStatus, VersionInfo};
pub use node::{
    ClaimResult, NodeApi, NodeModule, NodeOrder, NodeProduct, NodeReward, OwnedNode, PurchaseNode,
};
pub use statics::{AppConfig, Banner, StaticApi, StaticModule};
pub use ticket::{BuyTicket, OwnedTicket, Ticket, TicketApi, TicketModule, TicketOrder};
pub use user::{
    Balance, BindInvite, Invitee, LoginRequest, LoginResponse, MiningStats, NonceInfo,
    UpdateProfile, UserApi, UserModule, UserProfile, VipStatus,
};
pub use work::{
    Category, CreateWork, PlayUrl, WorkApi, WorkDetail, WorkModule, WorkQuery, WorkSummary,
};

/// Default page size of list calls.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// One page of a paginated list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    /// Items of this page.
    #[serde(default)]
    pub list: Vec<T>,
    /// Total number of items.
    #[serde(default)]
    pub total: u64,
    /// 1-based page number.
    #[serde(default)]
    pub page: u32,
    /// Page size.
    #[serde(default)]
    pub size: u32,
}

impl<T> Page<T> {
    /// Returns `true` if later pages exist.
    #[must_use]
    pub fn has_more(&self) -> bool {
        let seen = u64::from(self.page.max(1)) * u64::from(self.size);
        seen < self.total
    }
}

/// Pagination query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageQuery {
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub size: u32,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageQuery {
    /// Page `page` of `size` items.
    #[must_use]
    pub const fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    /// The following page.
    #[must_use]
    pub const fn next(self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            size: self.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::Query;

    #[test]
    fn page_decodes_with_missing_fields() {
        let page: Page<u32> = serde_json::from_value(json!({"list": [1, 2], "total": 5})).expect("page");
        assert_eq!(page.list, vec![1, 2]);
        assert_eq!(page.total, 5);
        assert_eq!(page.page, 0);
    }

    #[test]
    fn page_has_more() {
        let page = Page::<u32> {
            list: vec![],
            total: 45,
            page: 2,
            size: 20,
        };
        assert!(page.has_more());

        let last = Page::<u32> { page: 3, ..page };
        assert!(!last.has_more());
    }

    #[test]
    fn page_query_renders_in_field_order() {
        let query = Query::from_serialize(&PageQuery::default().next()).expect("query");
        assert_eq!(query.to_query_string(), "page=2&size=20");
    }

    #[test]
    fn next_page_saturates() {
        let last = PageQuery::new(u32::MAX, 20).next();
        assert_eq!(last.page, u32::MAX);
    }
}
