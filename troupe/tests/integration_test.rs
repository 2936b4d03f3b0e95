//! End-to-end tests for the session plumbing.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use troupe::prelude::*;
use troupe::roster;
use url::Url;

/// Chat display that records bubbles for assertions.
#[derive(Debug, Default)]
struct RecordingDisplay {
    bubbles: Mutex<Vec<ChatBubble>>,
}

impl RecordingDisplay {
    fn bubbles(&self) -> Vec<ChatBubble> {
        self.bubbles.lock().unwrap().clone()
    }
}

impl ChatDisplay for RecordingDisplay {
    fn send(&self, bubble: ChatBubble) {
        self.bubbles.lock().unwrap().push(bubble);
    }
}

fn profiles() -> ProfileSet {
    let registry: ModelRegistry = [
        ModelEntry::local(
            "mistral",
            "mistral",
            Url::parse("http://0.0.0.0:59991").unwrap(),
        )
        .with_cache_seed(1003),
        ModelEntry::local(
            "codellama",
            "codellama",
            Url::parse("http://0.0.0.0:59993").unwrap(),
        ),
    ]
    .into_iter()
    .collect();

    ProfileSet::new(
        registry
            .build_profile("mistral", ProfileOverrides::none())
            .unwrap(),
        registry
            .build_profile("codellama", ProfileOverrides::none())
            .unwrap(),
    )
}

fn writing_team() -> AgentSet {
    roster::writing_team(&profiles(), Sentinel::bracketed(), Path::new("output")).unwrap()
}

#[tokio::test]
async fn group_chat_session_relays_and_terminates() {
    let team = writing_team();
    let display = Arc::new(RecordingDisplay::default());
    let relay = MessageRelay::new(
        roster::default_avatars(),
        Arc::clone(&display) as Arc<dyn ChatDisplay>,
    );

    let engine: ScriptedEngine = [
        ScriptedTurn::new(roster::WRITER, "Here is a very short story.")
            .with_cost(CostEntry::new("mistral", 1.5)),
        ScriptedTurn::new(roster::PYTHON_ENGINEER, "No code needed here.")
            .with_cost(CostEntry::new("codellama", 2.25)),
        ScriptedTurn::new(roster::USER_PROXY, "[TERMINATE]"),
    ]
    .into_iter()
    .collect();

    let coordinator =
        SessionCoordinator::new(Arc::new(engine)).with_observer(Arc::new(relay));
    let result = coordinator
        .run_session(&team, "Tell me a very short story.", 10)
        .await
        .unwrap();

    assert_eq!(result.termination(), TerminationReason::Sentinel);
    // Opening message plus three replayed turns.
    assert_eq!(result.rounds(), 4);

    let bubbles = display.bubbles();
    let users: Vec<&str> = bubbles.iter().map(|b| b.user.as_str()).collect();
    assert_eq!(
        users,
        [roster::WRITER, roster::PYTHON_ENGINEER, roster::USER_PROXY]
    );
    assert_eq!(bubbles[0].avatar, "👩‍💻");
    assert_eq!(bubbles[1].avatar, "👩‍🔬");

    assert_eq!(summarize_cost(result.cost()), "$3.75");
}

#[tokio::test]
async fn exact_suffix_rule_detects_termination() {
    let team = writing_team();
    let coordinator = SessionCoordinator::new(Arc::new(ScriptedEngine::new(vec![
        ScriptedTurn::new(roster::WRITER, "Ha! ... [TERMINATE]"),
    ])));

    let result = coordinator
        .run_session(&team, "Tell me a joke.", 10)
        .await
        .unwrap();
    assert_eq!(result.termination(), TerminationReason::Sentinel);
}

#[tokio::test]
async fn trailing_period_is_not_termination() {
    let team = writing_team();
    let coordinator = SessionCoordinator::new(Arc::new(ScriptedEngine::new(vec![
        ScriptedTurn::new(roster::WRITER, "Ha! ... [TERMINATE]."),
    ])));

    let result = coordinator
        .run_session(&team, "Tell me a joke.", 10)
        .await
        .unwrap();
    assert_eq!(result.termination(), TerminationReason::RoundLimit);
}

#[tokio::test]
async fn unmapped_sender_still_renders() {
    let team = writing_team();
    let display = Arc::new(RecordingDisplay::default());
    let relay = MessageRelay::new(
        roster::default_avatars(),
        Arc::clone(&display) as Arc<dyn ChatDisplay>,
    );

    // A turn claiming a sender name outside the avatar mapping.
    let engine = ScriptedEngine::new(vec![ScriptedTurn::new("Ghostwriter", "[TERMINATE]")]);
    let coordinator =
        SessionCoordinator::new(Arc::new(engine)).with_observer(Arc::new(relay));

    coordinator.run_session(&team, "hello", 10).await.unwrap();

    let bubbles = display.bubbles();
    assert_eq!(bubbles.len(), 1);
    assert_eq!(bubbles[0].user, "Ghostwriter");
    assert_eq!(bubbles[0].avatar, AvatarMap::DEFAULT_FALLBACK);
}

#[tokio::test]
async fn cost_bubble_flow_matches_ui_contract() {
    // The UI variant appends one Accountant bubble per session with the
    // formatted total; an empty cost sequence still yields "$0.00".
    let team = writing_team();
    let coordinator = SessionCoordinator::new(Arc::new(ScriptedEngine::new(vec![
        ScriptedTurn::new(roster::WRITER, "short and free [TERMINATE]"),
    ])));

    let result = coordinator.run_session(&team, "hi", 10).await.unwrap();
    assert_eq!(summarize_cost(result.cost()), "$0.00");
}

#[tokio::test]
async fn auth_failure_reaches_caller_untouched() {
    let team = writing_team();
    let coordinator = SessionCoordinator::new(Arc::new(ScriptedEngine::failing(
        EngineError::auth("openai", "invalid key"),
    )));

    let err = coordinator.run_session(&team, "hi", 10).await.unwrap_err();
    match err {
        Error::Engine(engine_err) => {
            assert_eq!(engine_err.kind, EngineErrorKind::Auth);
            assert_eq!(engine_err.provider.as_deref(), Some("openai"));
            assert_eq!(engine_err.message, "invalid key");
        }
        other => panic!("expected engine error, got {other}"),
    }
}
