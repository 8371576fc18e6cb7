//! File uploads and downloads.
//!
//! Uploads are multipart forms; build one with [`Form`] and [`Part::file`],
//! which infers the content type from the file extension:
//!
//! ```ignore
//! use arts_api::{Form, Part};
//!
//! let form = Form::new()
//!     .part(Part::file("file", "cover.png", png_bytes))
//!     .text("usage", "cover");
//! let uploaded = client.file().upload(form).await?;
//! ```
//!
//! [`Part::file`]: crate::Part::file

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::{Form, Result, api_module};

/// A stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    /// File id, referenced by other calls.
    pub id: String,
    /// Public URL.
    pub url: String,
    /// Size in bytes.
    pub size: u64,
    /// Detected MIME type.
    pub mime: String,
}

/// Metadata of a stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    /// File id.
    pub id: String,
    /// Original file name.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// MIME type.
    pub mime: String,
    /// Public URL.
    pub url: String,
    /// Unix timestamp, seconds.
    pub created_at: i64,
}

/// File calls.
#[api_module]
pub trait FileApi {
    /// Upload a multipart form.
    #[post("/arts/file/upload")]
    #[auth(required)]
    async fn upload(&self, #[multipart] form: Form) -> Result<UploadedFile>;

    /// File content, unmodified.
    #[get("/arts/file/{id}")]
    #[binary]
    async fn download(&self, id: &str) -> Result<Bytes>;

    /// File metadata.
    #[get("/arts/file/{id}/info")]
    async fn info(&self, id: &str) -> Result<FileInfo>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_table() {
        use crate::{AuthMode, Method, ResponseMode};

        let table: Vec<_> = FileModule::ENDPOINTS
            .iter()
            .map(|e| (e.name, e.method, e.path, e.auth, e.response))
            .collect();
        assert_eq!(
            table,
            [
                ("upload", Method::Post, "/arts/file/upload", AuthMode::Required, ResponseMode::Json),
                ("download", Method::Get, "/arts/file/{id}", AuthMode::Optional, ResponseMode::Binary),
                ("info", Method::Get, "/arts/file/{id}/info", AuthMode::Optional, ResponseMode::Json),
            ]
        );
        assert!(FileModule::ENDPOINTS.iter().all(|e| e.module == "file"));
    }
}
