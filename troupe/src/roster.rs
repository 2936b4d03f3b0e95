//! Pre-built rosters.
//!
//! Three rosters cover the observed scenarios: a one-on-one assistant pair,
//! a writing team with two engineers for group chat, and the writing team
//! extended with a chef and an image explainer for multimodal sessions. Each
//! roster has exactly one proxy, which owns the termination sentinel and the
//! code-execution sandbox.

use std::path::Path;
use std::sync::Arc;

use crate::agent::{AgentSet, AgentSpec};
use crate::error::Result;
use crate::profile::ProfileSet;
use crate::relay::AvatarMap;
use crate::sentinel::Sentinel;

/// Display name of the proxy agent.
pub const USER_PROXY: &str = "UserProxy";
/// Display name of the general assistant.
pub const ASSISTANT: &str = "Assistant";
/// Display name of the writer agent.
pub const WRITER: &str = "Writer";
/// Display name of the python engineer agent.
pub const PYTHON_ENGINEER: &str = "PythonEngineer";
/// Display name of the javascript engineer agent.
pub const JAVASCRIPT_ENGINEER: &str = "JavascriptEngineer";
/// Display name of the chef agent.
pub const CHEF: &str = "Chef";
/// Display name of the image explainer agent.
pub const IMAGE_EXPLAINER: &str = "ImageExplainer";

fn proxy(profiles: &ProfileSet, sentinel: Sentinel, work_dir: &Path) -> AgentSpec {
    AgentSpec::proxy(USER_PROXY, Arc::clone(profiles.conversational()), sentinel.clone())
        .with_description(
            "A project manager with strong communication skills that only interacts \
             when assistants cannot answer or to terminate chat",
        )
        .with_system_prompt(format!(
            "Reply {sentinel} without punctuation if the task has been solved at full satisfaction. \
             You only interact when assistants cannot answer satisfactorily or to terminate conversation"
        ))
        .with_code_execution(work_dir)
        .with_max_auto_replies(10)
}

fn writer(profiles: &ProfileSet) -> AgentSpec {
    AgentSpec::assistant(WRITER, Arc::clone(profiles.conversational()))
        .with_description(
            "a helpful assistant with strong writing skills who can communicate \
             clearly and without fluff",
        )
        .with_system_prompt(
            "You are a senior editor and acclaimed writer with exceptional skill \
             in engaging and concise storytelling",
        )
}

/// Proxy plus one general assistant, the one-on-one scenario.
///
/// # Errors
///
/// Construction errors from [`AgentSet::builder`]; impossible for this fixed
/// roster unless the constants are edited into collision.
pub fn assistant_pair(
    profiles: &ProfileSet,
    sentinel: Sentinel,
    work_dir: &Path,
) -> Result<AgentSet> {
    AgentSet::builder()
        .agent(proxy(profiles, sentinel, work_dir))
        .agent(
            AgentSpec::assistant(ASSISTANT, Arc::clone(profiles.conversational()))
                .with_description(
                    "an helpful assistant with strong writing skills who can \
                     communicate clearly and without fluff",
                )
                .with_system_prompt("You are a senior editor and acclaimed writer and researcher"),
        )
        .build()
}

/// Proxy, writer, and two engineers, the group-chat scenario.
///
/// # Errors
///
/// Construction errors from [`AgentSet::builder`].
pub fn writing_team(
    profiles: &ProfileSet,
    sentinel: Sentinel,
    work_dir: &Path,
) -> Result<AgentSet> {
    AgentSet::builder()
        .agent(proxy(profiles, sentinel, work_dir))
        .agent(writer(profiles))
        .agent(
            AgentSpec::assistant(PYTHON_ENGINEER, Arc::clone(profiles.coding()))
                .with_description(
                    "an assistant with strong software engineering skills specialized \
                     in python programming language",
                )
                .with_system_prompt("You are a senior python engineer."),
        )
        .agent(
            AgentSpec::assistant(JAVASCRIPT_ENGINEER, Arc::clone(profiles.coding()))
                .with_description(
                    "an assistant with strong software engineering skills specialized \
                     in javascript programming language",
                )
                .with_system_prompt("You are a senior javascript engineer."),
        )
        .build()
}

/// The writing team plus a chef and an image explainer, the multimodal
/// scenario.
///
/// # Errors
///
/// [`Error::MissingProfile`](crate::Error::MissingProfile) when the profile
/// set carries no vision profile, plus construction errors from
/// [`AgentSet::builder`].
pub fn vision_team(profiles: &ProfileSet, sentinel: Sentinel, work_dir: &Path) -> Result<AgentSet> {
    let vision = profiles.vision()?;
    AgentSet::builder()
        .agent(proxy(profiles, sentinel, work_dir))
        .agent(writer(profiles))
        .agent(
            AgentSpec::assistant(PYTHON_ENGINEER, Arc::clone(profiles.coding()))
                .with_description(
                    "an assistant with strong software engineering skills specialized \
                     in python programming language",
                )
                .with_system_prompt("You are a senior python engineer."),
        )
        .agent(
            AgentSpec::assistant(JAVASCRIPT_ENGINEER, Arc::clone(profiles.coding()))
                .with_description(
                    "an assistant with strong software engineering skills specialized \
                     in javascript programming language",
                )
                .with_system_prompt("You are a senior javascript engineer."),
        )
        .agent(
            AgentSpec::assistant(CHEF, Arc::clone(profiles.conversational()))
                .with_description("an expert chef in a 4-star restaurant")
                .with_system_prompt(
                    "You are an expert chef of a 4-star restaurant specialized creating \
                     easy to make but unique and delicious meals",
                ),
        )
        .agent(
            AgentSpec::assistant(IMAGE_EXPLAINER, Arc::clone(vision))
                .with_description(
                    "you are a helpful image explainer who describes the subject of a \
                     photo in high and exact detail",
                )
                .with_max_auto_replies(10),
        )
        .build()
}

/// Avatar glyphs for every roster member, plus the fallback for strangers.
#[must_use]
pub fn default_avatars() -> AvatarMap {
    [
        (USER_PROXY, "👨‍💼"),
        (ASSISTANT, "🤖"),
        (WRITER, "👩‍💻"),
        (PYTHON_ENGINEER, "👩‍🔬"),
        (JAVASCRIPT_ENGINEER, "👨‍🚀"),
        (CHEF, "👩‍🍳"),
        (IMAGE_EXPLAINER, "📷"),
    ]
    .into_iter()
    .collect()
}
