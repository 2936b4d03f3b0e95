//! Configuration schema definitions.
//!
//! The TOML config mirrors the shape every session needs: a model table, one
//! profile per functional need, session settings, and the chat UI strings.
//! Conversion into `troupe` types happens here so a bad key or URL is caught
//! before any session starts.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

use troupe::prelude::*;

use crate::error::{BotError, Result};

fn default_sentinel() -> String {
    Sentinel::TERMINATE_BRACKETED.to_string()
}

fn default_max_rounds() -> usize {
    10
}

fn default_work_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_greeting() -> String {
    "Ready to assist!".to_string()
}

fn default_accountant_avatar() -> String {
    "🤑".to_string()
}

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Master cache switch. When off, per-model cache seeds are ignored.
    #[serde(default)]
    pub cache_enabled: bool,

    /// Model registry entries, keyed by model key.
    #[serde(default)]
    pub models: BTreeMap<String, ModelConfig>,

    /// Per-purpose profile bindings.
    #[serde(default)]
    pub profiles: ProfilesConfig,

    /// Session settings.
    #[serde(default)]
    pub session: SessionSettings,

    /// Chat UI strings.
    #[serde(default)]
    pub ui: UiConfig,
}

impl Default for BotConfig {
    /// Local-only defaults that work without any API key.
    fn default() -> Self {
        let mut models = BTreeMap::new();
        models.insert(
            "mistral".to_string(),
            ModelConfig {
                model: "mistral".to_string(),
                base_url: Some("http://0.0.0.0:59991".to_string()),
                api_key: None,
                api_key_env: None,
                cache_seed: Some(1003),
            },
        );
        models.insert(
            "codellama".to_string(),
            ModelConfig {
                model: "codellama".to_string(),
                base_url: Some("http://0.0.0.0:59993".to_string()),
                api_key: None,
                api_key_env: None,
                cache_seed: Some(1005),
            },
        );
        models.insert(
            "oai-gpt4".to_string(),
            ModelConfig {
                model: "gpt-4-turbo-preview".to_string(),
                base_url: None,
                api_key: None,
                api_key_env: Some("OPEN_AI_API_KEY".to_string()),
                cache_seed: Some(1001),
            },
        );

        Self {
            cache_enabled: false,
            models,
            profiles: ProfilesConfig::default(),
            session: SessionSettings::default(),
            ui: UiConfig::default(),
        }
    }
}

/// One model registry entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model name sent on the wire.
    pub model: String,
    /// Base URL for locally served endpoints.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Literal API key. Local endpoints default to the `"NULL"` placeholder.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Environment variable holding the API key for hosted providers.
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// Cache seed, applied only when the master cache switch is on.
    #[serde(default)]
    pub cache_seed: Option<u64>,
}

/// One profile binding: which model, with optional overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileBinding {
    /// Model key into the `[models]` table.
    pub model: String,
    /// Sampling temperature override.
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Per-call timeout override, in seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Response token cap.
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

impl ProfileBinding {
    fn overrides(&self) -> ProfileOverrides {
        let mut overrides = ProfileOverrides::none();
        if let Some(temperature) = self.temperature {
            overrides = overrides.temperature(temperature);
        }
        if let Some(secs) = self.timeout_secs {
            overrides = overrides.timeout(std::time::Duration::from_secs(secs));
        }
        if let Some(max_tokens) = self.max_tokens {
            overrides = overrides.max_tokens(max_tokens);
        }
        overrides
    }
}

/// Per-purpose profile bindings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilesConfig {
    /// Profile for general conversation.
    pub conversational: ProfileBinding,
    /// Profile for coding agents.
    pub coding: ProfileBinding,
    /// Profile for vision agents; only the vision roster needs it.
    #[serde(default)]
    pub vision: Option<ProfileBinding>,
}

impl Default for ProfilesConfig {
    fn default() -> Self {
        Self {
            conversational: ProfileBinding {
                model: "mistral".to_string(),
                temperature: None,
                timeout_secs: None,
                max_tokens: None,
            },
            coding: ProfileBinding {
                model: "codellama".to_string(),
                temperature: None,
                timeout_secs: None,
                max_tokens: None,
            },
            vision: None,
        }
    }
}

/// Which pre-built roster a session uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RosterKind {
    /// Proxy plus one assistant.
    Pair,
    /// Proxy, writer, and two engineers.
    #[default]
    WritingTeam,
    /// The writing team plus chef and image explainer.
    VisionTeam,
}

/// Session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Termination sentinel keyword.
    #[serde(default = "default_sentinel")]
    pub sentinel: String,
    /// Round cap per session, opening message included.
    #[serde(default = "default_max_rounds")]
    pub max_rounds: usize,
    /// Sandbox directory for code-execution agents. Shared across sessions;
    /// sessions are serialized, so it is never written concurrently.
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,
    /// Roster to run.
    #[serde(default)]
    pub roster: RosterKind,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            sentinel: default_sentinel(),
            max_rounds: default_max_rounds(),
            work_dir: default_work_dir(),
            roster: RosterKind::default(),
        }
    }
}

/// Chat UI strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Greeting bubble shown before the first message.
    #[serde(default = "default_greeting")]
    pub greeting: String,
    /// Avatar for the cost-summary bubble.
    #[serde(default = "default_accountant_avatar")]
    pub accountant_avatar: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
            accountant_avatar: default_accountant_avatar(),
        }
    }
}

/// Severity of a configuration finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueLevel {
    /// The configuration cannot produce a working session.
    Error,
    /// Suspicious but runnable.
    Warning,
}

/// One configuration finding.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    /// Severity.
    pub level: IssueLevel,
    /// Operator-facing description.
    pub message: String,
}

impl ConfigIssue {
    fn error(message: impl Into<String>) -> Self {
        Self {
            level: IssueLevel::Error,
            message: message.into(),
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            level: IssueLevel::Warning,
            message: message.into(),
        }
    }
}

impl BotConfig {
    /// Build the model registry from the `[models]` table.
    ///
    /// # Errors
    ///
    /// [`BotError::Config`] for an unparseable base URL or an entry with no
    /// way to obtain a credential.
    pub fn registry(&self) -> Result<ModelRegistry> {
        let mut registry = ModelRegistry::new();
        for (key, model) in &self.models {
            let credential = match (&model.api_key_env, &model.api_key, &model.base_url) {
                (Some(var), _, _) => Credential::Env(var.clone()),
                (None, Some(literal), _) => Credential::Literal(literal.clone()),
                (None, None, Some(_)) => Credential::placeholder(),
                (None, None, None) => {
                    return Err(BotError::config(format!(
                        "model `{key}` needs api_key_env, api_key, or base_url"
                    )));
                }
            };

            let mut entry = match &model.base_url {
                Some(raw) => {
                    let url = Url::parse(raw).map_err(|e| {
                        BotError::config(format!("model `{key}` has invalid base_url: {e}"))
                    })?;
                    ModelEntry::local(key, &model.model, url).with_credential(credential)
                }
                None => match &credential {
                    Credential::Env(var) => ModelEntry::hosted(key, &model.model, var),
                    Credential::Literal(_) => {
                        ModelEntry::hosted(key, &model.model, "").with_credential(credential)
                    }
                },
            };

            if self.cache_enabled
                && let Some(seed) = model.cache_seed
            {
                entry = entry.with_cache_seed(seed);
            }
            registry.insert(entry);
        }
        Ok(registry)
    }

    /// Build the per-purpose profile set.
    ///
    /// # Errors
    ///
    /// Registry conversion errors, plus profile-build failures (unknown model
    /// key, unresolved API key, bad temperature) surfaced before any session.
    pub fn profile_set(&self) -> Result<ProfileSet> {
        let registry = self.registry()?;

        let conversational = registry.build_profile(
            &self.profiles.conversational.model,
            self.profiles.conversational.overrides(),
        )?;
        let coding = registry.build_profile(
            &self.profiles.coding.model,
            self.profiles.coding.overrides(),
        )?;

        let mut set = ProfileSet::new(conversational, coding);
        if let Some(vision) = &self.profiles.vision {
            set = set.with_vision(registry.build_profile(&vision.model, vision.overrides())?);
        }
        Ok(set)
    }

    /// The session sentinel.
    #[must_use]
    pub fn sentinel(&self) -> Sentinel {
        Sentinel::new(&self.session.sentinel)
    }

    /// Check the configuration without building anything.
    #[must_use]
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        let mut check_binding = |purpose: &str, binding: &ProfileBinding| {
            if !self.models.contains_key(&binding.model) {
                issues.push(ConfigIssue::error(format!(
                    "{purpose} profile references unknown model key `{}`",
                    binding.model
                )));
            }
            if let Some(t) = binding.temperature
                && !(0.0..=2.0).contains(&t)
            {
                issues.push(ConfigIssue::error(format!(
                    "{purpose} profile temperature {t} out of range [0, 2]"
                )));
            }
        };
        check_binding("conversational", &self.profiles.conversational);
        check_binding("coding", &self.profiles.coding);
        if let Some(vision) = &self.profiles.vision {
            check_binding("vision", vision);
        }

        if self.session.roster == RosterKind::VisionTeam && self.profiles.vision.is_none() {
            issues.push(ConfigIssue::error(
                "vision-team roster selected but no vision profile configured",
            ));
        }

        for (key, model) in &self.models {
            if model.api_key_env.is_none() && model.api_key.is_none() && model.base_url.is_none() {
                issues.push(ConfigIssue::error(format!(
                    "model `{key}` needs api_key_env, api_key, or base_url"
                )));
            }
            if let Some(raw) = &model.base_url
                && Url::parse(raw).is_err()
            {
                issues.push(ConfigIssue::error(format!(
                    "model `{key}` has invalid base_url `{raw}`"
                )));
            }
            if !self.cache_enabled && model.cache_seed.is_some() {
                issues.push(ConfigIssue::warning(format!(
                    "model `{key}` has a cache_seed but caching is disabled"
                )));
            }
        }

        if self.session.max_rounds < 2 {
            issues.push(ConfigIssue::warning(
                "max_rounds below 2 leaves no room for a reply",
            ));
        }

        issues
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_clean_and_local() {
        let config = BotConfig::default();
        let errors: Vec<_> = config
            .validate()
            .into_iter()
            .filter(|i| i.level == IssueLevel::Error)
            .collect();
        assert!(errors.is_empty(), "{errors:?}");

        // Local defaults resolve without any environment variable.
        let set = config.profile_set().unwrap();
        assert_eq!(set.conversational().primary_model().unwrap().api_key(), "NULL");
    }

    #[test]
    fn cache_switch_gates_seeds() {
        let mut config = BotConfig::default();
        let registry = config.registry().unwrap();
        assert_eq!(registry.get("mistral").unwrap().cache_seed(), None);

        config.cache_enabled = true;
        let registry = config.registry().unwrap();
        assert_eq!(registry.get("mistral").unwrap().cache_seed(), Some(1003));
    }

    #[test]
    fn unknown_profile_model_is_flagged() {
        let mut config = BotConfig::default();
        config.profiles.coding.model = "no-such-model".to_string();

        let issues = config.validate();
        assert!(issues.iter().any(|i| i.level == IssueLevel::Error
            && i.message.contains("no-such-model")));

        // And the build itself fails with the library error.
        let err = config.profile_set().unwrap_err();
        assert!(matches!(
            err,
            BotError::Session(troupe::Error::UnknownModelKey { .. })
        ));
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = BotConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: BotConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.models.len(), config.models.len());
        assert_eq!(parsed.session.sentinel, "[TERMINATE]");
        assert_eq!(parsed.ui.greeting, "Ready to assist!");
    }

    #[test]
    fn hosted_entry_defers_key_resolution() {
        let config = BotConfig::default();
        let registry = config.registry().unwrap();
        // Registry construction works without the variable; the profile build
        // would be the failing step.
        let entry = registry.get("oai-gpt4").unwrap();
        assert!(matches!(entry.credential(), Credential::Env(var) if var == "OPEN_AI_API_KEY"));
    }

    #[test]
    fn vision_roster_without_vision_profile_is_an_error() {
        let mut config = BotConfig::default();
        config.session.roster = RosterKind::VisionTeam;
        let issues = config.validate();
        assert!(issues.iter().any(|i| i.level == IssueLevel::Error
            && i.message.contains("vision")));
    }
}
