use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::Params;

/// Backend operations that accept configured extra parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Get,
    Mget,
    Search,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Get => "get",
            Operation::Mget => "mget",
            Operation::Search => "search",
        }
    }
}

/// Extra request fields per operation. An operation left unset
/// contributes nothing to its requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<Params>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mget: Option<Params>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<Params>,
}

impl OperationParameters {
    pub fn for_operation(&self, operation: Operation) -> Option<&Params> {
        match operation {
            Operation::Get => self.get.as_ref(),
            Operation::Mget => self.mget.as_ref(),
            Operation::Search => self.search.as_ref(),
        }
    }
}

/// Where a finder reads from and what it adds to each request.
///
/// Index and type are optional here so a half-filled configuration can be
/// loaded; finders reject it when a request is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinderConfig {
    #[serde(default)]
    pub index: Option<String>,
    #[serde(default, rename = "type")]
    pub doc_type: Option<String>,
    #[serde(default)]
    pub parameters: OperationParameters,
}

impl FinderConfig {
    pub fn new(index: impl Into<String>, doc_type: impl Into<String>) -> Self {
        Self { index: Some(index.into()), doc_type: Some(doc_type.into()), parameters: OperationParameters::default() }
    }

    pub fn with_parameters(mut self, operation: Operation, params: Params) -> Self {
        match operation {
            Operation::Get => self.parameters.get = Some(params),
            Operation::Mget => self.parameters.mget = Some(params),
            Operation::Search => self.parameters.search = Some(params),
        }
        self
    }

    pub fn index(&self) -> Result<&str> {
        required(self.index.as_deref(), "index")
    }

    pub fn doc_type(&self) -> Result<&str> {
        required(self.doc_type.as_deref(), "type")
    }
}

fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(Error::InvalidConfig(format!("finder has no {} configured", field))),
    }
}

/// Layered settings: `config.toml`, then `config.<env>.toml`, then `APP_*`
/// environment variables (`__` separates nested keys).
pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_from(Path::new("."), &env_name)
    }

    pub fn load_from(base: &Path, env_name: &str) -> anyhow::Result<Self> {
        let mut figment = Figment::new().merge(Toml::file(base.join("config.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file(base.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(base.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(base.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));
        Ok(Self { figment })
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// The `finders.<name>` table.
    pub fn finder(&self, name: &str) -> anyhow::Result<FinderConfig> {
        self.get(&format!("finders.{}", name))
    }
}
