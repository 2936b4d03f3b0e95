//! Agent specifications and the per-session roster.
//!
//! An [`AgentSpec`] is declarative: a name, a natural-language role
//! description, a system prompt, and a reference to one conversation profile.
//! Exactly one spec per set is the proxy, which owns the termination sentinel
//! and the local code-execution sandbox. The [`AgentSet`] preserves insertion
//! order for display and indexes by name for the relay.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::profile::ConversationProfile;
use crate::sentinel::Sentinel;

/// Local sandbox where code-execution agents may write files.
///
/// Shared across all sessions in a process; sessions are serialized, so no
/// further synchronization exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeExecution {
    work_dir: PathBuf,
}

impl CodeExecution {
    /// Sandbox rooted at `work_dir`.
    #[must_use]
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }

    /// The working directory.
    #[must_use]
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }
}

/// A named participant in a conversation.
#[derive(Debug, Clone)]
pub struct AgentSpec {
    name: String,
    description: String,
    system_prompt: String,
    profile: Arc<ConversationProfile>,
    termination: Option<Sentinel>,
    code_execution: Option<CodeExecution>,
    max_auto_replies: Option<u32>,
}

impl AgentSpec {
    /// An assistant agent: replies, never terminates the session itself.
    #[must_use]
    pub fn assistant(name: impl Into<String>, profile: Arc<ConversationProfile>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            system_prompt: String::new(),
            profile,
            termination: None,
            code_execution: None,
            max_auto_replies: None,
        }
    }

    /// The proxy agent representing the operator side.
    ///
    /// Owns the termination predicate; the engine checks `sentinel` against
    /// every emitted message.
    #[must_use]
    pub fn proxy(
        name: impl Into<String>,
        profile: Arc<ConversationProfile>,
        sentinel: Sentinel,
    ) -> Self {
        Self {
            termination: Some(sentinel),
            ..Self::assistant(name, profile)
        }
    }

    /// Natural-language role description used for speaker selection.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// System prompt sent with every model call for this agent.
    #[must_use]
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    /// Attach a code-execution sandbox.
    #[must_use]
    pub fn with_code_execution(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.code_execution = Some(CodeExecution::new(work_dir));
        self
    }

    /// Cap consecutive automatic replies.
    #[must_use]
    pub fn with_max_auto_replies(mut self, max: u32) -> Self {
        self.max_auto_replies = Some(max);
        self
    }

    /// Unique display name within a session.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Role description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// System prompt.
    #[must_use]
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// The conversation profile this agent is bound to.
    #[must_use]
    pub fn profile(&self) -> &Arc<ConversationProfile> {
        &self.profile
    }

    /// The termination sentinel, present only on the proxy.
    #[must_use]
    pub fn sentinel(&self) -> Option<&Sentinel> {
        self.termination.as_ref()
    }

    /// Whether this agent owns the termination predicate.
    #[must_use]
    pub fn is_termination_detector(&self) -> bool {
        self.termination.is_some()
    }

    /// Termination predicate: delegates to the sentinel, false for agents
    /// without one.
    #[must_use]
    pub fn is_termination_message(&self, content: &str) -> bool {
        self.termination
            .as_ref()
            .is_some_and(|sentinel| sentinel.matches(content))
    }

    /// Code-execution sandbox, present only on the proxy.
    #[must_use]
    pub fn code_execution(&self) -> Option<&CodeExecution> {
        self.code_execution.as_ref()
    }

    /// Cap on consecutive automatic replies, if any.
    #[must_use]
    pub fn max_auto_replies(&self) -> Option<u32> {
        self.max_auto_replies
    }
}

/// A fixed, ordered roster of agents for one or more session runs.
#[derive(Debug, Clone)]
pub struct AgentSet {
    agents: Vec<AgentSpec>,
    index: HashMap<String, usize>,
    proxy_index: usize,
}

impl AgentSet {
    /// Start building a roster.
    #[must_use]
    pub fn builder() -> AgentSetBuilder {
        AgentSetBuilder { agents: Vec::new() }
    }

    /// Look up an agent by display name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AgentSpec> {
        self.index.get(name).map(|&i| &self.agents[i])
    }

    /// The proxy agent. Guaranteed to exist by construction.
    #[must_use]
    pub fn proxy(&self) -> &AgentSpec {
        &self.agents[self.proxy_index]
    }

    /// The roster's termination sentinel (the proxy's).
    #[must_use]
    pub fn sentinel(&self) -> &Sentinel {
        // The builder rejects sets whose proxy lacks a sentinel.
        self.proxy()
            .sentinel()
            .expect("agent set built without termination detector")
    }

    /// Iterate over agents in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &AgentSpec> {
        self.agents.iter()
    }

    /// Display names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.agents.iter().map(AgentSpec::name)
    }

    /// Whether an agent with `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of agents in the roster.
    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether the roster is empty. Always false for built sets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

/// Builder for [`AgentSet`].
#[derive(Debug, Default)]
pub struct AgentSetBuilder {
    agents: Vec<AgentSpec>,
}

impl AgentSetBuilder {
    /// Add an agent to the roster.
    #[must_use]
    pub fn agent(mut self, spec: AgentSpec) -> Self {
        self.agents.push(spec);
        self
    }

    /// Finish the roster.
    ///
    /// # Errors
    ///
    /// - [`Error::DuplicateAgentName`] when two agents share a display name.
    /// - [`Error::TerminationDetector`] unless exactly one agent carries the
    ///   termination sentinel.
    pub fn build(self) -> Result<AgentSet> {
        let mut index = HashMap::with_capacity(self.agents.len());
        for (i, agent) in self.agents.iter().enumerate() {
            if index.insert(agent.name().to_string(), i).is_some() {
                return Err(Error::DuplicateAgentName {
                    name: agent.name().to_string(),
                });
            }
        }

        let detectors: Vec<usize> = self
            .agents
            .iter()
            .enumerate()
            .filter(|(_, agent)| agent.is_termination_detector())
            .map(|(i, _)| i)
            .collect();
        let [proxy_index] = detectors[..] else {
            return Err(Error::TerminationDetector {
                count: detectors.len(),
            });
        };

        Ok(AgentSet {
            agents: self.agents,
            index,
            proxy_index,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::profile::{ConversationProfile, ProfileOverrides};
    use crate::registry::{ModelEntry, ModelRegistry};
    use url::Url;

    fn profile() -> Arc<ConversationProfile> {
        let registry: ModelRegistry = [ModelEntry::local(
            "mistral",
            "mistral",
            Url::parse("http://0.0.0.0:59991").unwrap(),
        )]
        .into_iter()
        .collect();
        Arc::new(
            registry
                .build_profile("mistral", ProfileOverrides::none())
                .unwrap(),
        )
    }

    #[test]
    fn build_preserves_insertion_order() {
        let profile = profile();
        let set = AgentSet::builder()
            .agent(AgentSpec::proxy(
                "UserProxy",
                Arc::clone(&profile),
                Sentinel::bracketed(),
            ))
            .agent(AgentSpec::assistant("Writer", Arc::clone(&profile)))
            .agent(AgentSpec::assistant("PythonEngineer", profile))
            .build()
            .unwrap();

        let names: Vec<&str> = set.names().collect();
        assert_eq!(names, ["UserProxy", "Writer", "PythonEngineer"]);
        assert_eq!(set.proxy().name(), "UserProxy");
        assert_eq!(set.sentinel().as_str(), "[TERMINATE]");
    }

    #[test]
    fn duplicate_names_rejected() {
        let profile = profile();
        let err = AgentSet::builder()
            .agent(AgentSpec::proxy(
                "UserProxy",
                Arc::clone(&profile),
                Sentinel::terminate(),
            ))
            .agent(AgentSpec::assistant("Writer", Arc::clone(&profile)))
            .agent(AgentSpec::assistant("Writer", profile))
            .build()
            .unwrap_err();

        assert!(matches!(err, Error::DuplicateAgentName { name } if name == "Writer"));
    }

    #[test]
    fn exactly_one_detector_required() {
        let profile = profile();

        let err = AgentSet::builder()
            .agent(AgentSpec::assistant("Writer", Arc::clone(&profile)))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::TerminationDetector { count: 0 }));

        let err = AgentSet::builder()
            .agent(AgentSpec::proxy(
                "UserProxy",
                Arc::clone(&profile),
                Sentinel::terminate(),
            ))
            .agent(AgentSpec::proxy("Second", profile, Sentinel::terminate()))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::TerminationDetector { count: 2 }));
    }

    #[test]
    fn lookup_by_name_never_fails_for_registered_agents() {
        let profile = profile();
        let set = AgentSet::builder()
            .agent(AgentSpec::proxy(
                "UserProxy",
                Arc::clone(&profile),
                Sentinel::terminate(),
            ))
            .agent(AgentSpec::assistant("Assistant", profile))
            .build()
            .unwrap();

        for name in ["UserProxy", "Assistant"] {
            assert!(set.get(name).is_some());
        }
        assert!(set.get("Stranger").is_none());
    }

    #[test]
    fn proxy_owns_sandbox_and_predicate() {
        let profile = profile();
        let proxy = AgentSpec::proxy("UserProxy", profile, Sentinel::terminate())
            .with_description("an assistant with strong communication skills")
            .with_code_execution("output")
            .with_max_auto_replies(10);

        assert!(proxy.is_termination_detector());
        assert_eq!(
            proxy.code_execution().unwrap().work_dir(),
            Path::new("output")
        );
        assert_eq!(proxy.max_auto_replies(), Some(10));
        assert!(proxy.is_termination_message("all done TERMINATE"));
        assert!(!proxy.is_termination_message("all done TERMINATE."));
    }
}
