//! Procedural macro for arts API modules.
//!
//! `#[api_module]` turns a trait of annotated `async fn`s into:
//! - a clean trait (attributes stripped)
//! - a module struct holding the shared request engine (e.g. `UserModule`)
//! - an `ENDPOINTS` table describing every route of the module
//! - a trait implementation whose methods are thin calls into the engine
//!
//! # Method attributes
//!
//! - `#[get("/arts/..")]`, `#[post(..)]`, `#[put(..)]`, `#[delete(..)]`, `#[patch(..)]`
//! - `#[auth(required | optional | none)]` (default `optional`)
//! - `#[binary]` returns the body bytes, `#[raw]` returns the whole response
//!
//! # Parameter attributes
//!
//! - `#[path]` / `#[path("id")]` - path placeholder, percent-encoded per segment
//! - `#[query]` / `#[query("pageSize")]` - one query parameter (`None` is omitted,
//!   sequences repeat the key)
//! - `#[query(flatten)]` - every field of a struct becomes a query parameter
//! - `#[body]` - JSON body
//! - `#[multipart]` - a multipart `Form`
//! - `#[header("X-Name")]` - a request header
//!
//! Parameters named after a placeholder are path parameters without an attribute,
//! and on POST, PUT and PATCH a single remaining parameter is the JSON body.
//!
//! # Example
//!
//! ```ignore
//! use arts_api::{Result, api_module};
//!
//! #[api_module(module = "work")]
//! pub trait WorkApi {
//!     /// Work detail.
//!     #[get("/arts/work/{id}")]
//!     async fn detail(&self, id: &str) -> Result<WorkDetail>;
//!
//!     /// Like a work.
//!     #[post("/arts/work/{id}/like")]
//!     #[auth(required)]
//!     async fn like(&self, id: &str) -> Result<()>;
//! }
//!
//! // Generates `WorkModule::new(engine)` implementing `WorkApi`.
//! ```

mod attrs;
mod codegen;
mod expand;

use proc_macro::TokenStream;

/// Declare an API module from a trait.
///
/// # Attributes
///
/// - `name` (optional): generated struct name, defaults to the trait name with
///   `Api` replaced by `Module`
/// - `module` (optional): module name used in endpoint descriptors and logs,
///   defaults to the lower-cased trait name without `Api`
#[proc_macro_attribute]
pub fn api_module(attr: TokenStream, item: TokenStream) -> TokenStream {
    expand::expand_api_module(attr.into(), item.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
