//! Tower middleware for the transport.
//!
//! Layers wrap the transport service, so they see every request after the
//! engine has built and authorized it, and every response before
//! classification. Layers are applied in reverse order: the last layer added
//! is the first to process requests.
//!
//! # Example
//!
//! ```ignore
//! use arts_api::Client;
//! use arts_api::middleware::LoggingLayer;
//!
//! let client = Client::builder()
//!     .base_url("https://api.example.com")
//!     .layer(LoggingLayer::debug())
//!     .build();
//! ```

mod logging;

pub use logging::{LogLevel, Logging, LoggingLayer};

// Re-export tower types for power users
pub use tower::{Layer, ServiceBuilder};
