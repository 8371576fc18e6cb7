//! Works catalog: browsing, detail, likes and creation.

use serde::{Deserialize, Serialize};

use super::{DEFAULT_PAGE_SIZE, Page};
use crate::{Result, api_module};

/// Filters of [`WorkApi::list`].
///
/// `None` filters and an empty tag list are left out of the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkQuery {
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub size: u32,
    /// Category id.
    pub category: Option<String>,
    /// Full-text search.
    pub keyword: Option<String>,
    /// Works carrying all of these tags; sent as repeated `tags` keys.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Default for WorkQuery {
    fn default() -> Self {
        Self {
            page: 1,
            size: DEFAULT_PAGE_SIZE,
            category: None,
            keyword: None,
            tags: Vec::new(),
        }
    }
}

/// A work as shown in lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkSummary {
    /// Work id.
    pub id: String,
    /// Title.
    pub title: String,
    /// Cover image URL.
    pub cover: String,
    /// Author display name.
    pub author: String,
    /// Decimal price string.
    pub price: String,
    /// Token the price is in.
    pub symbol: String,
    /// Like count.
    #[serde(default)]
    pub likes: u64,
}

/// Full work detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkDetail {
    /// Work id.
    pub id: String,
    /// Title.
    pub title: String,
    /// Description, may contain markdown.
    #[serde(default)]
    pub description: String,
    /// Cover image URL.
    pub cover: String,
    /// Author display name.
    pub author: String,
    /// Category id.
    pub category: String,
    /// Tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Decimal price string.
    pub price: String,
    /// Token the price is in.
    pub symbol: String,
    /// Editions left for sale.
    #[serde(default)]
    pub stock: u64,
    /// Like count.
    #[serde(default)]
    pub likes: u64,
    /// Whether the caller liked it; always `false` without a token.
    #[serde(default)]
    pub liked: bool,
    /// Unix timestamp, seconds.
    pub created_at: i64,
}

/// A work category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Category id.
    pub id: String,
    /// Localized name.
    pub name: String,
    /// Icon URL.
    #[serde(default)]
    pub icon: Option<String>,
}

/// A new work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWork {
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Category id.
    pub category: String,
    /// Id of an uploaded cover, see `FileApi::upload`.
    pub cover_file_id: String,
    /// Id of the uploaded media.
    pub media_file_id: String,
    /// Tags.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tags: Vec<String>,
}

/// Time-limited playback address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayUrl {
    /// Playlist or media URL.
    pub url: String,
    /// Unix timestamp after which `url` stops working.
    pub expires_at: i64,
}

/// Works catalog calls.
#[api_module]
pub trait WorkApi {
    /// Paginated works matching `query`.
    #[get("/arts/work/list")]
    async fn list(&self, #[query(flatten)] query: &WorkQuery) -> Result<Page<WorkSummary>>;

    /// Work detail, with `liked` filled in when a token is set.
    #[get("/arts/work/{id}")]
    async fn detail(&self, id: &str) -> Result<WorkDetail>;

    /// Every category.
    #[get("/arts/work/categories")]
    #[auth(none)]
    async fn categories(&self) -> Result<Vec<Category>>;

    /// Like a work.
    #[post("/arts/work/{id}/like")]
    #[auth(required)]
    async fn like(&self, id: &str) -> Result<()>;

    /// Remove a like.
    #[delete("/arts/work/{id}/like")]
    #[auth(required)]
    async fn unlike(&self, id: &str) -> Result<()>;

    /// Publish a work from previously uploaded files.
    #[post("/arts/work")]
    #[auth(required)]
    async fn create(&self, work: &CreateWork) -> Result<WorkDetail>;

    /// Playback address; paid works need a token that owns an edition.
    #[get("/arts/work/{id}/play")]
    async fn play_url(&self, id: &str) -> Result<PlayUrl>;
}
