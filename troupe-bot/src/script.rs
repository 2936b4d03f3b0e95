//! Scripted transcripts for replay sessions.
//!
//! The bot's chat loop needs a `ChatEngine`; production orchestration lives
//! outside this repository, so the loop replays scripts. A script file is
//! TOML:
//!
//! ```toml
//! [[turns]]
//! sender = "Writer"
//! content = "Here is a very short story."
//! cost = { model = "mistral", total_cost = 0.004 }
//! ```

use std::path::Path;

use serde::Deserialize;

use troupe::prelude::*;
use troupe::roster;

use crate::error::{BotError, Result};

#[derive(Debug, Deserialize)]
struct ScriptFile {
    #[serde(default)]
    turns: Vec<ScriptTurn>,
}

#[derive(Debug, Deserialize)]
struct ScriptTurn {
    #[serde(default)]
    sender: Option<String>,
    content: String,
    #[serde(default)]
    recipient: Option<String>,
    #[serde(default)]
    cost: Option<CostEntry>,
}

impl From<ScriptTurn> for ScriptedTurn {
    fn from(turn: ScriptTurn) -> Self {
        let mut scripted = match turn.sender {
            Some(sender) => Self::new(sender, turn.content),
            None => Self::anonymous(turn.content),
        };
        if let Some(recipient) = turn.recipient {
            scripted = scripted.to(recipient);
        }
        if let Some(cost) = turn.cost {
            scripted = scripted.with_cost(cost);
        }
        scripted
    }
}

/// Load a scripted engine from a TOML file.
pub async fn load_script(path: &Path) -> Result<ScriptedEngine> {
    let content = tokio::fs::read_to_string(path).await?;
    let script: ScriptFile = toml::from_str(&content)
        .map_err(|e| BotError::config(format!("{}: {e}", path.display())))?;
    Ok(script.turns.into_iter().map(ScriptedTurn::from).collect())
}

/// Built-in demo script used when no script file is given.
#[must_use]
pub fn demo_script(sentinel: &Sentinel) -> ScriptedEngine {
    [
        ScriptedTurn::new(
            roster::WRITER,
            "Why did the scarecrow win an award? Because he was outstanding in his field.",
        )
        .with_cost(CostEntry::new("mistral", 0.0015)),
        ScriptedTurn::new(
            roster::WRITER,
            format!("That is all I have. {}", sentinel.as_str()),
        )
        .with_cost(CostEntry::new("mistral", 0.0005)),
    ]
    .into_iter()
    .collect()
}
