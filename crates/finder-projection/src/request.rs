//! Request shaping.
//!
//! Every request is assembled in three layers, later layers winning:
//! 1. configured parameters for the operation
//! 2. the caller's query (search and scroll start only)
//! 3. structural fields: `index`, `type`, `id`, `body.ids`, scroll fields
//!
//! The first two layers replace whole top-level keys, so a caller `body`
//! replaces the configured one. Structural fields are merged key by key
//! and keep whatever else sits next to them.

use serde_json::{json, Value};

use finder_core::config::{FinderConfig, Operation};
use finder_core::error::Result;
use finder_core::types::Params;

pub const SCROLL_SEARCH_TYPE: &str = "scan";
pub const SCROLL_SORT_FIELD: &str = "_doc";

/// Deep-merges `overlay` into `target`.
pub fn merge(target: &mut Params, overlay: &Params) {
    for (key, incoming) in overlay {
        match (target.get_mut(key), incoming) {
            (Some(Value::Object(existing)), Value::Object(nested)) => merge(existing, nested),
            _ => {
                target.insert(key.clone(), incoming.clone());
            }
        }
    }
}

/// Configured parameters overlaid by the caller query, key by key at the
/// top level only.
fn layered(config: &FinderConfig, operation: Operation, query: Option<&Params>) -> Params {
    let mut request = config.parameters.for_operation(operation).cloned().unwrap_or_default();
    if let Some(query) = query {
        request.extend(query.iter().map(|(key, value)| (key.clone(), value.clone())));
    }
    request
}

fn finish(config: &FinderConfig, mut request: Params, structural: Params) -> Result<Params> {
    let index = config.index()?;
    let doc_type = config.doc_type()?;
    request.insert("index".into(), Value::from(index));
    request.insert("type".into(), Value::from(doc_type));
    merge(&mut request, &structural);
    Ok(request)
}

fn shape(config: &FinderConfig, operation: Operation, query: Option<&Params>, structural: Params) -> Result<Params> {
    finish(config, layered(config, operation, query), structural)
}

fn object(value: Value) -> Params {
    match value {
        Value::Object(map) => map,
        _ => Params::new(),
    }
}

pub fn get_request(config: &FinderConfig, identifier: &str) -> Result<Params> {
    shape(config, Operation::Get, None, object(json!({ "id": identifier })))
}

pub fn mget_request<S: AsRef<str>>(config: &FinderConfig, identifiers: &[S]) -> Result<Params> {
    let ids: Vec<&str> = identifiers.iter().map(AsRef::as_ref).collect();
    shape(config, Operation::Mget, None, object(json!({ "body": { "ids": ids } })))
}

pub fn search_request(config: &FinderConfig, query: &Params) -> Result<Params> {
    shape(config, Operation::Search, Some(query), Params::new())
}

/// A search request switched into scroll mode: no scoring, stable `_doc`
/// order, a kept-alive cursor and a bounded page. A `size` from the query or
/// the configured search parameters wins over `page_size`.
pub fn scroll_start_request(config: &FinderConfig, query: &Params, keep_alive: &str, page_size: u64) -> Result<Params> {
    let request = layered(config, Operation::Search, Some(query));
    let size = request.get("size").and_then(Value::as_u64).unwrap_or(page_size);
    let scroll = object(json!({
        "search_type": SCROLL_SEARCH_TYPE,
        "scroll": keep_alive,
        "sort": [SCROLL_SORT_FIELD],
        "size": size,
    }));
    finish(config, request, scroll)
}

pub fn scroll_continue_request(cursor: &str, keep_alive: &str) -> Params {
    object(json!({ "scroll": keep_alive, "scroll_id": cursor }))
}

pub fn scroll_release_request(cursor: &str) -> Params {
    object(json!({ "scroll_id": cursor }))
}
