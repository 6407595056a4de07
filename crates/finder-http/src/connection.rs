use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use serde_json::Value;
use tracing::{debug, warn};

use finder_core::error::{Error, Result};
use finder_core::traits::Connection;
use finder_core::types::{Lookup, Params};

use crate::connector::HttpSettings;
use crate::endpoint::Endpoint;

pub struct HttpConnection {
    client: Client,
    base_url: Url,
}

struct Reply {
    status: StatusCode,
    text: String,
}

impl Reply {
    fn json(&self) -> Result<Value> {
        if self.text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&self.text).map_err(|e| Error::MalformedResponse(format!("status {}: {}", self.status, e)))
    }

    fn failure(&self) -> Error {
        let reason = serde_json::from_str::<Value>(&self.text)
            .ok()
            .and_then(|body| error_reason(&body))
            .unwrap_or_else(|| self.text.chars().take(200).collect());
        Error::Backend { status: self.status.as_u16(), reason }
    }

    fn expect_json(self) -> Result<Value> {
        if self.status.is_success() { self.json() } else { Err(self.failure()) }
    }
}

fn error_reason(body: &Value) -> Option<String> {
    body.pointer("/error/reason")
        .and_then(Value::as_str)
        .or_else(|| body.get("error").and_then(Value::as_str))
        .map(str::to_string)
}

/// Only a body saying `found: false` means the document is absent. A bare
/// 404 (missing index, wrong path) is a failure.
fn reports_missing(body: &Value) -> bool {
    body.get("found").and_then(Value::as_bool) == Some(false)
}

impl HttpConnection {
    pub fn new(settings: &HttpSettings) -> Result<Self> {
        let base_url = Url::parse(&settings.url)
            .map_err(|e| Error::InvalidConfig(format!("invalid backend url '{}': {}", settings.url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidConfig(format!("backend url '{}' cannot carry a path", settings.url)));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| Error::Transport(e.to_string()))?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url { &self.base_url }

    fn url(&self, segments: &[String]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidConfig(format!("backend url '{}' cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn send(&self, endpoint: Endpoint) -> Result<Reply> {
        let url = self.url(&endpoint.segments)?;
        debug!(method = %endpoint.method, %url, "backend request");
        let mut builder = self.client.request(endpoint.method, url).query(&endpoint.query);
        if let Some(body) = &endpoint.body {
            builder = builder.json(body);
        }
        let response = builder.send().map_err(|e| Error::Transport(e.to_string()))?;
        let status = response.status();
        let text = response.text().map_err(|e| Error::Transport(e.to_string()))?;
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            warn!(status = status.as_u16(), "backend request failed");
        }
        Ok(Reply { status, text })
    }
}

impl Connection for HttpConnection {
    fn get(&self, request: &Params) -> Result<Lookup> {
        let reply = self.send(Endpoint::get(request)?)?;
        if reply.status == StatusCode::NOT_FOUND {
            return match reply.json() {
                Ok(body) if reports_missing(&body) => Ok(Lookup::Missing),
                _ => Err(reply.failure()),
            };
        }
        let body = reply.expect_json()?;
        if reports_missing(&body) { Ok(Lookup::Missing) } else { Ok(Lookup::Found(body)) }
    }

    fn mget(&self, request: &Params) -> Result<Value> {
        self.send(Endpoint::mget(request)?)?.expect_json()
    }

    fn search(&self, request: &Params) -> Result<Value> {
        self.send(Endpoint::search(request)?)?.expect_json()
    }

    fn scroll(&self, request: &Params) -> Result<Value> {
        self.send(Endpoint::scroll(request)?)?.expect_json()
    }

    fn clear_scroll(&self, request: &Params) -> Result<()> {
        let reply = self.send(Endpoint::clear_scroll(request)?)?;
        if reply.status == StatusCode::NOT_FOUND {
            debug!("scroll already released or expired");
            return Ok(());
        }
        reply.expect_json().map(|_| ())
    }
}
