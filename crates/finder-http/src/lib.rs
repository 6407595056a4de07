//! finder-http
//!
//! Connector for Elasticsearch-style REST backends. `endpoint` maps request
//! mappings onto method, path, query string and body; `connection` runs them
//! over a blocking reqwest client.

pub mod connection;
pub mod connector;
pub mod endpoint;

pub use connection::HttpConnection;
pub use connector::{HttpConnector, HttpSettings};
pub use endpoint::Endpoint;
