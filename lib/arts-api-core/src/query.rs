//! Query strings and URL building.
//!
//! [`build_url`] joins a base address, a path and an optional [`Query`]:
//!
//! - the path always starts with `/`;
//! - when the base already ends with the API root (`/arts`) and the path starts
//!   with it too, the duplicate root is dropped from the path;
//! - `null` values are omitted, arrays repeat their key once per element;
//! - an empty query adds no `?`.
//!
//! ```
//! use arts_api_core::{Query, build_url};
//!
//! let query = Query::new()
//!     .with("tag", vec!["music", "live"])
//!     .with("cursor", None::<String>);
//!
//! assert_eq!(
//!     build_url("https://api.example.com/arts/", "/arts/work/list", Some(&query)),
//!     "https://api.example.com/arts/work/list?tag=music&tag=live"
//! );
//! ```

use std::borrow::Cow;

use derive_more::{Display, Error, From};
use serde_json::Value;
use url::form_urlencoded;

/// Root segment under which every arts API route lives.
pub const API_ROOT: &str = "/arts";

// ============================================================================
// Query Values
// ============================================================================

/// A single query value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    /// Absent value; never rendered.
    Null,
    /// A scalar rendered as one `key=value` pair.
    Scalar(String),
    /// A list rendered as one pair per element, in order.
    List(Vec<QueryValue>),
}

impl QueryValue {
    /// Convert a JSON value.
    ///
    /// Booleans and numbers use their JSON text, nested objects are rendered as
    /// compact JSON.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(flag) => Self::Scalar(flag.to_string()),
            Value::Number(number) => Self::Scalar(number.to_string()),
            Value::String(text) => Self::Scalar(text.clone()),
            Value::Array(items) => Self::List(items.iter().map(Self::from_json).collect()),
            Value::Object(_) => Self::Scalar(value.to_string()),
        }
    }

    fn append(&self, key: &str, out: &mut form_urlencoded::Serializer<'_, String>) {
        match self {
            Self::Null => {}
            Self::Scalar(value) => {
                out.append_pair(key, value);
            }
            Self::List(items) => {
                for item in items {
                    item.append(key, out);
                }
            }
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<QueryValue>> From<Vec<T>> for QueryValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

// ============================================================================
// Query
// ============================================================================

/// Query parameters could not be derived from a value.
#[derive(Debug, Display, Error, From)]
pub enum QueryError {
    /// The value failed to serialize.
    #[display("query serialization error: {_0}")]
    Serialize(serde_json::Error),

    /// Only structs and maps can be expanded into parameters.
    #[display("query must serialize to an object, got {_0}")]
    #[from(skip)]
    NotAnObject(#[error(not(source))] &'static str),
}

/// Ordered query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, QueryValue)>,
}

impl Query {
    /// Create an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand a struct or map into parameters, one per field.
    ///
    /// `None` fields become [`QueryValue::Null`] and are skipped when rendered.
    ///
    /// # Example
    ///
    /// ```
    /// use arts_api_core::Query;
    /// use serde::Serialize;
    ///
    /// #[derive(Serialize)]
    /// struct Filter { page: u32, keyword: Option<String>, ids: Vec<u64> }
    ///
    /// let query = Query::from_serialize(&Filter { page: 2, keyword: None, ids: vec![7, 9] })
    ///     .expect("query");
    /// assert_eq!(query.to_query_string(), "page=2&ids=7&ids=9");
    /// ```
    pub fn from_serialize<T: serde::Serialize + ?Sized>(value: &T) -> Result<Self, QueryError> {
        let mut query = Self::new();
        query.extend(value)?;
        Ok(query)
    }

    /// Append every field of a struct or map.
    pub fn extend<T: serde::Serialize + ?Sized>(&mut self, value: &T) -> Result<(), QueryError> {
        match serde_json::to_value(value)? {
            Value::Object(fields) => {
                for (key, value) in &fields {
                    self.push(key.clone(), QueryValue::from_json(value));
                }
                Ok(())
            }
            Value::Null => Ok(()),
            Value::Bool(_) => Err(QueryError::NotAnObject("a boolean")),
            Value::Number(_) => Err(QueryError::NotAnObject("a number")),
            Value::String(_) => Err(QueryError::NotAnObject("a string")),
            Value::Array(_) => Err(QueryError::NotAnObject("an array")),
        }
    }

    /// Append a single parameter from any serializable value.
    pub fn param<T: serde::Serialize + ?Sized>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<(), QueryError> {
        let value = serde_json::to_value(value)?;
        self.push(key, QueryValue::from_json(&value));
        Ok(())
    }

    /// Append a parameter.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Append a parameter, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.push(key, value);
        self
    }

    /// Returns `true` if no parameter would be rendered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_query_string().is_empty()
    }

    /// Parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.pairs.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Render as `application/x-www-form-urlencoded` text, without the leading `?`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.pairs {
            value.append(key, &mut out);
        }
        out.finish()
    }
}

// ============================================================================
// URL Builder
// ============================================================================

/// Build a full request URL under the default [`API_ROOT`].
#[must_use]
pub fn build_url(base: &str, path: &str, query: Option<&Query>) -> String {
    build_url_with_root(base, API_ROOT, path, query)
}

/// Build a full request URL, de-duplicating `root` between base and path.
///
/// An empty `base` yields a root-relative URL.
#[must_use]
pub fn build_url_with_root(base: &str, root: &str, path: &str, query: Option<&Query>) -> String {
    let base = base.trim_end_matches('/');
    let root = root.trim_end_matches('/');

    let path: Cow<'_, str> = if path.starts_with('/') {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(format!("/{path}"))
    };

    let path = if !root.is_empty() && base_path(base).ends_with(root) {
        strip_root(&path, root)
    } else {
        &path
    };

    let mut url = format!("{base}{path}");

    if let Some(query) = query {
        let rendered = query.to_query_string();
        if !rendered.is_empty() {
            url.push('?');
            url.push_str(&rendered);
        }
    }

    url
}

/// Remove a leading `root` segment from `path`, matching whole segments only.
/// Path component of `base`; a host is never mistaken for the API root.
fn base_path(base: &str) -> &str {
    match base.split_once("://") {
        Some((_, rest)) => rest.find('/').and_then(|at| rest.get(at..)).unwrap_or(""),
        None => base,
    }
}

fn strip_root<'a>(path: &'a str, root: &str) -> &'a str {
    match path.strip_prefix(root) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => path,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn path_gets_leading_slash() {
        assert_eq!(
            build_url("https://api.example.com", "health", None),
            "https://api.example.com/health"
        );
    }

    #[test]
    fn trailing_slashes_on_base_are_ignored() {
        assert_eq!(
            build_url("https://api.example.com///", "/arts/health", None),
            "https://api.example.com/arts/health"
        );
    }

    #[test]
    fn api_root_is_not_duplicated() {
        let url = build_url("https://api.example.com/arts", "/arts/user/info", None);
        assert_eq!(url, "https://api.example.com/arts/user/info");
        assert_eq!(url.matches("/arts").count(), 1);

        assert_eq!(
            build_url("https://api.example.com/arts/", "arts/user/info", None),
            "https://api.example.com/arts/user/info"
        );
    }

    #[test]
    fn root_relative_path_under_root_base() {
        assert_eq!(
            build_url("https://api.example.com/arts", "/user/info", None),
            "https://api.example.com/arts/user/info"
        );
    }

    #[test]
    fn api_root_only_stripped_as_whole_segment() {
        assert_eq!(
            build_url("https://api.example.com/arts", "/artsy/gallery", None),
            "https://api.example.com/arts/artsy/gallery"
        );
        assert_eq!(
            build_url("https://api.example.com/arts", "/arts", None),
            "https://api.example.com/arts"
        );
    }

    #[test]
    fn host_named_like_root_is_not_stripped() {
        assert_eq!(build_url("http://arts", "/arts/x", None), "http://arts/arts/x");
        assert_eq!(build_url("http://arts/arts", "/arts/x", None), "http://arts/arts/x");
        assert_eq!(build_url("/arts", "/arts/x", None), "/arts/x");
    }

    #[test]
    fn base_without_root_keeps_path() {
        assert_eq!(
            build_url("https://api.example.com", "/arts/user/info", None),
            "https://api.example.com/arts/user/info"
        );
    }

    #[test]
    fn empty_base_yields_root_relative_url() {
        assert_eq!(build_url("", "/arts/health", None), "/arts/health");
        assert_eq!(build_url("", "user/info", None), "/user/info");
    }

    #[test]
    fn null_values_are_dropped() {
        let query = Query::new()
            .with("page", "1")
            .with("keyword", None::<String>)
            .with("sort", "new");

        let url = build_url("https://api.example.com", "/arts/work/list", Some(&query));
        assert_eq!(url, "https://api.example.com/arts/work/list?page=1&sort=new");
        assert!(!url.contains("keyword"));
    }

    #[test]
    fn arrays_repeat_the_key_in_order() {
        let query = Query::new().with("k", vec!["a", "b"]);
        let url = build_url("https://x.test", "/arts/work/list", Some(&query));

        assert!(url.ends_with("?k=a&k=b"), "{url}");
        assert!(!url.contains("a%2Cb"));
    }

    #[test]
    fn missing_or_empty_query_adds_no_question_mark() {
        assert_eq!(
            build_url("https://x.test", "/arts/health", None),
            "https://x.test/arts/health"
        );
        assert_eq!(
            build_url("https://x.test", "/arts/health", Some(&Query::new())),
            "https://x.test/arts/health"
        );
        let only_nulls = Query::new().with("a", None::<&str>);
        assert_eq!(
            build_url("https://x.test", "/arts/health", Some(&only_nulls)),
            "https://x.test/arts/health"
        );
    }

    #[test]
    fn values_are_form_encoded() {
        let query = Query::new().with("q", "lo-fi & chill").with("tag", "a=b");
        assert_eq!(query.to_query_string(), "q=lo-fi+%26+chill&tag=a%3Db");
    }

    #[test]
    fn from_serialize_expands_struct_fields() {
        #[derive(serde::Serialize)]
        struct Filter {
            page: u32,
            size: u32,
            category: Option<String>,
            tags: Vec<String>,
            featured: bool,
        }

        let query = Query::from_serialize(&Filter {
            page: 1,
            size: 20,
            category: None,
            tags: vec!["pop".to_string(), "jazz".to_string()],
            featured: true,
        })
        .expect("query");

        assert_eq!(
            query.to_query_string(),
            "page=1&size=20&tags=pop&tags=jazz&featured=true"
        );
    }

    #[test]
    fn from_serialize_rejects_scalars() {
        let err = Query::from_serialize(&42).expect_err("scalar");
        assert_eq!(
            err.to_string(),
            "query must serialize to an object, got a number"
        );
        assert!(Query::from_serialize(&None::<u32>).expect("null").is_empty());
    }

    #[test]
    fn param_accepts_any_serializable() {
        let mut query = Query::new();
        query.param("ids", &[3, 1, 2]).expect("ids");
        query.param("cursor", &None::<u64>).expect("cursor");
        query.param("filter", &json!({"min": 1})).expect("filter");

        assert_eq!(
            query.to_query_string(),
            "ids=3&ids=1&ids=2&filter=%7B%22min%22%3A1%7D"
        );
    }

    #[test]
    fn null_list_elements_are_dropped() {
        let value = QueryValue::from_json(&json!(["a", null, "b"]));
        let query = Query::new().with("k", value);
        assert_eq!(query.to_query_string(), "k=a&k=b");
    }
}
