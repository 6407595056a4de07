use std::sync::Arc;

use serde_json::Value;

use crate::config::FinderConfig;
use crate::error::Result;
use crate::types::{Lookup, Params, ResultSet};

/// Executes already-shaped requests against a document backend.
///
/// Each method is one round trip. Responses are returned as raw JSON and
/// decoded by the caller.
pub trait Connection: Send + Sync {
    fn get(&self, request: &Params) -> Result<Lookup>;
    fn mget(&self, request: &Params) -> Result<Value>;
    fn search(&self, request: &Params) -> Result<Value>;
    fn scroll(&self, request: &Params) -> Result<Value>;
    fn clear_scroll(&self, request: &Params) -> Result<()>;
}

/// Owns backend connectivity and the static finder configuration.
pub trait Connector: Send + Sync {
    fn config(&self) -> &FinderConfig;
    fn connection(&self) -> Result<Arc<dyn Connection>>;
}

/// Builds one domain entity from a raw `_source` mapping.
pub trait EntityFactory: Send + Sync {
    type Entity;
    fn create_entity(&self, attributes: &Params) -> Result<Self::Entity>;
}

impl<F, E> EntityFactory for F
where
    F: Fn(&Params) -> Result<E> + Send + Sync,
{
    type Entity = E;

    fn create_entity(&self, attributes: &Params) -> Result<E> {
        self(attributes)
    }
}

pub trait Finder: Send + Sync {
    type Entity;

    fn get_by_identifier(&self, identifier: &str) -> Result<ResultSet<Self::Entity>>;
    fn get_by_identifiers(&self, identifiers: &[String]) -> Result<ResultSet<Self::Entity>>;
    fn find(&self, query: &Params) -> Result<ResultSet<Self::Entity>>;
    fn scroll_start(&self, query: &Params) -> Result<ResultSet<Self::Entity>>;
    fn scroll_next(&self, cursor: &str) -> Result<ResultSet<Self::Entity>>;
    fn scroll_end(&self, cursor: &str) -> Result<()>;
}
