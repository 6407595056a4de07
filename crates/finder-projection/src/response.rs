use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use finder_core::error::{Error, Result};
use finder_core::types::Params;

pub(crate) fn decode<T: DeserializeOwned>(raw: Value, what: &str) -> Result<T> {
    serde_json::from_value(raw).map_err(|e| Error::MalformedResponse(format!("{} response: {}", what, e)))
}

#[derive(Debug, Deserialize)]
pub(crate) struct GetResponse {
    #[serde(rename = "_source")]
    pub source: Params,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MgetResponse {
    pub docs: Vec<MgetSlot>,
}

/// One multi-get slot. A slot either reports a per-document failure or
/// says whether the document exists; anything else is malformed.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum MgetSlot {
    Failed {
        #[serde(rename = "_id", default)]
        id: Option<String>,
        #[serde(default)]
        status: Option<u16>,
        error: Value,
    },
    Resolved {
        #[serde(rename = "_id", default)]
        id: Option<String>,
        found: bool,
        #[serde(rename = "_source", default)]
        source: Option<Params>,
    },
}

/// Status reported for a failed slot that carries none of its own.
pub(crate) const SLOT_FAILURE_STATUS: u16 = 500;

/// `error.reason`, then `error.type`, then a bare string error.
pub(crate) fn slot_reason(error: &Value) -> String {
    error
        .get("reason")
        .or_else(|| error.get("type"))
        .and_then(Value::as_str)
        .or_else(|| error.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| error.to_string())
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(rename = "_scroll_id", default)]
    pub scroll_id: Option<String>,
    pub hits: Hits,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Hits {
    #[serde(default)]
    pub total: Option<Total>,
    #[serde(default)]
    pub hits: Vec<Hit>,
}

/// Older backends report a bare count, newer ones `{ value, relation }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Total {
    Count(u64),
    Tracked { value: u64 },
}

impl Total {
    pub fn value(&self) -> u64 {
        match self {
            Total::Count(n) => *n,
            Total::Tracked { value } => *value,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Hit {
    #[serde(rename = "_source")]
    pub source: Params,
}
