//! Conversation profiles: per-purpose model-call settings.
//!
//! A profile bundles the parameters one functional need (general
//! conversation, coding, vision) sends with every model call. Building a
//! profile copies one registry entry and resolves its credential, so a bad
//! key or an unset environment variable is fatal before any session starts.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};
use crate::registry::ModelRegistry;

/// Default per-call timeout, matching every observed configuration.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.0;

/// A registry entry with its credential resolved to concrete key material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedModel {
    key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    endpoint: Option<Url>,
    model: String,
    api_key: String,
}

impl ResolvedModel {
    /// Registry key this model was resolved from.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Base URL for locally served endpoints.
    #[must_use]
    pub fn endpoint(&self) -> Option<&Url> {
        self.endpoint.as_ref()
    }

    /// Model name sent on the wire.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Concrete API key (the `"NULL"` placeholder for local endpoints).
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

/// Settings bundle for one functional need, immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationProfile {
    timeout: Duration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cache_seed: Option<u64>,
    models: Vec<ResolvedModel>,
    temperature: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

impl ConversationProfile {
    /// Per-call timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Cache seed; `None` means caching is disabled.
    #[must_use]
    pub fn cache_seed(&self) -> Option<u64> {
        self.cache_seed
    }

    /// The model list. Has exactly one element in every observed
    /// configuration; kept as a sequence for fallback lists.
    #[must_use]
    pub fn models(&self) -> &[ResolvedModel] {
        &self.models
    }

    /// The first (and in practice only) model.
    ///
    /// `None` only for profiles deserialized with an empty model list;
    /// [`ModelRegistry::build_profile`] always produces one entry.
    #[must_use]
    pub fn primary_model(&self) -> Option<&ResolvedModel> {
        self.models.first()
    }

    /// Sampling temperature.
    #[must_use]
    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Token cap for responses, if any.
    #[must_use]
    pub fn max_tokens(&self) -> Option<u32> {
        self.max_tokens
    }
}

/// Optional per-profile overrides; omitted fields take the documented
/// defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProfileOverrides {
    /// Sampling temperature in `[0, 2]`; default 0.
    pub temperature: Option<f32>,
    /// Per-call timeout; default 600 s.
    pub timeout: Option<Duration>,
    /// Token cap for responses; default none.
    pub max_tokens: Option<u32>,
}

impl ProfileOverrides {
    /// No overrides; every field takes its default.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Set the sampling temperature.
    #[must_use]
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the per-call timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the response token cap.
    #[must_use]
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

impl ModelRegistry {
    /// Build a [`ConversationProfile`] from one registry entry.
    ///
    /// Pure function of registry state: no partial profiles, no side effects.
    /// Caching stays disabled unless the entry carries a seed.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownModelKey`] when `key` is absent from the registry.
    /// - [`Error::MissingApiKey`] when a hosted entry's environment variable
    ///   is unset. This is the first point the entry is actually used.
    /// - [`Error::InvalidTemperature`] when an override falls outside `[0, 2]`.
    pub fn build_profile(
        &self,
        key: &str,
        overrides: ProfileOverrides,
    ) -> Result<ConversationProfile> {
        let entry = self.get(key)?;
        let api_key = entry.credential().resolve(key)?;

        let temperature = overrides.temperature.unwrap_or(DEFAULT_TEMPERATURE);
        if !(0.0..=2.0).contains(&temperature) {
            return Err(Error::InvalidTemperature { value: temperature });
        }

        Ok(ConversationProfile {
            timeout: overrides.timeout.unwrap_or(DEFAULT_TIMEOUT),
            cache_seed: entry.cache_seed(),
            models: vec![ResolvedModel {
                key: entry.key().to_string(),
                endpoint: entry.endpoint().cloned(),
                model: entry.model().to_string(),
                api_key,
            }],
            temperature,
            max_tokens: overrides.max_tokens,
        })
    }
}

/// The per-purpose profiles a session's roster draws from.
///
/// Every observed script builds one profile per functional need by hand; this
/// struct is that bundle with the vision slot optional, since only the
/// multimodal scenario uses it.
#[derive(Debug, Clone)]
pub struct ProfileSet {
    conversational: Arc<ConversationProfile>,
    coding: Arc<ConversationProfile>,
    vision: Option<Arc<ConversationProfile>>,
}

impl ProfileSet {
    /// Bundle conversational and coding profiles.
    #[must_use]
    pub fn new(conversational: ConversationProfile, coding: ConversationProfile) -> Self {
        Self {
            conversational: Arc::new(conversational),
            coding: Arc::new(coding),
            vision: None,
        }
    }

    /// Attach a vision profile.
    #[must_use]
    pub fn with_vision(mut self, vision: ConversationProfile) -> Self {
        self.vision = Some(Arc::new(vision));
        self
    }

    /// Profile for general conversation.
    #[must_use]
    pub fn conversational(&self) -> &Arc<ConversationProfile> {
        &self.conversational
    }

    /// Profile for coding agents.
    #[must_use]
    pub fn coding(&self) -> &Arc<ConversationProfile> {
        &self.coding
    }

    /// Profile for vision agents, when configured.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingProfile`] when no vision profile was attached.
    pub fn vision(&self) -> Result<&Arc<ConversationProfile>> {
        self.vision.as_ref().ok_or_else(|| Error::MissingProfile {
            purpose: "vision".to_string(),
        })
    }
}
