use std::sync::Arc;

use serde::{Deserialize, Serialize};

use finder_core::config::FinderConfig;
use finder_core::error::Result;
use finder_core::traits::{Connection, Connector};

use crate::connection::HttpConnection;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_timeout_secs() -> u64 { DEFAULT_TIMEOUT_SECS }

/// The `[http]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSettings {
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl HttpSettings {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), timeout_secs: DEFAULT_TIMEOUT_SECS }
    }
}

/// Pairs one shared HTTP connection with a finder configuration.
pub struct HttpConnector {
    config: FinderConfig,
    connection: Arc<HttpConnection>,
}

impl HttpConnector {
    pub fn new(settings: &HttpSettings, config: FinderConfig) -> Result<Self> {
        Ok(Self { config, connection: Arc::new(HttpConnection::new(settings)?) })
    }
}

impl Connector for HttpConnector {
    fn config(&self) -> &FinderConfig { &self.config }

    fn connection(&self) -> Result<Arc<dyn Connection>> {
        Ok(self.connection.clone())
    }
}
