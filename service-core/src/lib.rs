//! service-core: Shared infrastructure for upstream API connectors.
pub mod config;
pub mod error;
pub mod http;
pub mod observability;

pub use reqwest;
pub use serde;
pub use serde_json;
pub use tracing;
