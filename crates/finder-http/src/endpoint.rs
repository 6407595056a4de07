use reqwest::Method;
use serde_json::Value;

use finder_core::error::{Error, Result};
use finder_core::types::Params;

/// One REST call derived from a request mapping.
///
/// `index`, `type` and `id` become path segments, `body` becomes the JSON
/// body and every remaining key is sent as a query parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub method: Method,
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl Endpoint {
    pub fn get(request: &Params) -> Result<Self> {
        let mut params = request.clone();
        let index = take_segment(&mut params, "index")?;
        let doc_type = take_segment(&mut params, "type")?;
        let id = take_segment(&mut params, "id")?;
        let body = params.remove("body");
        Ok(Self { method: Method::GET, segments: vec![index, doc_type, id], query: query_pairs(params), body })
    }

    pub fn mget(request: &Params) -> Result<Self> {
        Self::collection(Method::POST, request, "_mget")
    }

    pub fn search(request: &Params) -> Result<Self> {
        Self::collection(Method::POST, request, "_search")
    }

    pub fn scroll(request: &Params) -> Result<Self> {
        Ok(Self {
            method: Method::POST,
            segments: scroll_segments(),
            query: Vec::new(),
            body: Some(Value::Object(request.clone())),
        })
    }

    /// The release body always carries a list of cursors.
    pub fn clear_scroll(request: &Params) -> Result<Self> {
        let mut body = request.clone();
        match body.remove("scroll_id") {
            Some(Value::String(cursor)) => body.insert("scroll_id".into(), Value::Array(vec![Value::String(cursor)])),
            Some(cursors @ Value::Array(_)) => body.insert("scroll_id".into(), cursors),
            _ => return Err(Error::InvalidConfig("scroll release request has no scroll_id".into())),
        };
        Ok(Self { method: Method::DELETE, segments: scroll_segments(), query: Vec::new(), body: Some(Value::Object(body)) })
    }

    fn collection(method: Method, request: &Params, action: &str) -> Result<Self> {
        let mut params = request.clone();
        let index = take_segment(&mut params, "index")?;
        let doc_type = take_segment(&mut params, "type")?;
        let body = params.remove("body");
        Ok(Self { method, segments: vec![index, doc_type, action.to_string()], query: query_pairs(params), body })
    }
}

fn scroll_segments() -> Vec<String> {
    vec!["_search".to_string(), "scroll".to_string()]
}

fn take_segment(params: &mut Params, key: &str) -> Result<String> {
    match params.remove(key) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(Error::InvalidConfig(format!("request is missing `{}`", key))),
    }
}

fn query_pairs(params: Params) -> Vec<(String, String)> {
    params
        .into_iter()
        .filter_map(|(key, value)| query_value(&value).map(|v| (key, v)))
        .collect()
}

fn query_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => Some(items.iter().filter_map(query_value).collect::<Vec<_>>().join(",")),
        other => Some(other.to_string()),
    }
}
