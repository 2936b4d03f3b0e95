//! Model registry: named connection parameters for chat models.
//!
//! An entry resolves to either a hosted provider (API key from the
//! environment, no explicit base URL) or a locally served endpoint (explicit
//! base URL, placeholder key). The registry is built once at startup and is
//! immutable for the process lifetime; profile building reads it without side
//! effects.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// How a model entry's API key is obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Credential {
    /// Key material read from an environment variable at profile-build time.
    ///
    /// Absence is surfaced the first time the entry is used, not at process
    /// start.
    Env(String),
    /// Literal key, including the `"NULL"` placeholder local endpoints expect.
    Literal(String),
}

impl Credential {
    /// Placeholder key sent to locally served endpoints that ignore auth.
    pub const PLACEHOLDER: &'static str = "NULL";

    /// The placeholder credential for local endpoints.
    #[must_use]
    pub fn placeholder() -> Self {
        Self::Literal(Self::PLACEHOLDER.to_string())
    }

    /// Resolve to concrete key material.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingApiKey`] when the environment variable backing
    /// an [`Credential::Env`] credential is unset.
    pub fn resolve(&self, model_key: &str) -> Result<String> {
        match self {
            Self::Literal(key) => Ok(key.clone()),
            Self::Env(var) => std::env::var(var).map_err(|_| Error::MissingApiKey {
                key: model_key.to_string(),
                var: var.clone(),
            }),
        }
    }
}

/// Connection parameters for one model, immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEntry {
    key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    endpoint: Option<Url>,
    model: String,
    credential: Credential,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cache_seed: Option<u64>,
}

impl ModelEntry {
    /// Entry for a hosted provider: key from the environment, no base URL.
    #[must_use]
    pub fn hosted(
        key: impl Into<String>,
        model: impl Into<String>,
        api_key_var: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            endpoint: None,
            model: model.into(),
            credential: Credential::Env(api_key_var.into()),
            cache_seed: None,
        }
    }

    /// Entry for a locally served endpoint: explicit base URL, placeholder key.
    #[must_use]
    pub fn local(key: impl Into<String>, model: impl Into<String>, endpoint: Url) -> Self {
        Self {
            key: key.into(),
            endpoint: Some(endpoint),
            model: model.into(),
            credential: Credential::placeholder(),
            cache_seed: None,
        }
    }

    /// Attach a cache seed. Caching is disabled unless a seed is present.
    #[must_use]
    pub fn with_cache_seed(mut self, seed: u64) -> Self {
        self.cache_seed = Some(seed);
        self
    }

    /// Replace the credential.
    #[must_use]
    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credential = credential;
        self
    }

    /// Registry key, e.g. `"oai-gpt4"` or `"mistral"`.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Base URL for locally served endpoints; `None` for hosted providers.
    #[must_use]
    pub fn endpoint(&self) -> Option<&Url> {
        self.endpoint.as_ref()
    }

    /// Model name sent on the wire, e.g. `"gpt-4-turbo-preview"`.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The credential.
    #[must_use]
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Cache seed, if caching is enabled for this entry.
    #[must_use]
    pub fn cache_seed(&self) -> Option<u64> {
        self.cache_seed
    }
}

/// Mapping from model key to connection parameters.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    entries: HashMap<String, ModelEntry>,
}

impl ModelRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry under its own key, replacing any previous entry.
    pub fn insert(&mut self, entry: ModelEntry) -> Option<ModelEntry> {
        self.entries.insert(entry.key.clone(), entry)
    }

    /// Look up an entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownModelKey`] when the key is absent.
    pub fn get(&self, key: &str) -> Result<&ModelEntry> {
        self.entries.get(key).ok_or_else(|| Error::UnknownModelKey {
            key: key.to_string(),
        })
    }

    /// Whether an entry exists for `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of registered entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over registered keys in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl FromIterator<ModelEntry> for ModelRegistry {
    fn from_iter<I: IntoIterator<Item = ModelEntry>>(iter: I) -> Self {
        let mut registry = Self::new();
        for entry in iter {
            registry.insert(entry);
        }
        registry
    }
}
