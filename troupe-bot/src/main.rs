//! Troupe Bot CLI - terminal front end for multi-agent chat sessions
//!
//! Wires a configured roster, the message relay, and a scripted engine into
//! an interactive loop. One session runs per line of input; a cost-summary
//! bubble follows each session.

#![allow(clippy::print_stdout)] // CLI program intentionally uses stdout

mod config;
mod display;
mod error;
mod script;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use troupe::prelude::*;
use troupe::roster;

use crate::config::{BotConfig, IssueLevel, RosterKind, load_config, load_config_from};
use crate::display::{TerminalDisplay, accountant_bubble, system_bubble};
use crate::error::{BotError, Result};

/// Troupe Bot - group chat sessions over a pre-built agent roster
#[derive(Parser)]
#[command(name = "troupe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file path
    #[arg(short, long, env = "TROUPE_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration and the code-execution sandbox
    Init(InitArgs),

    /// Start an interactive chat session
    Chat(ChatArgs),

    /// Show bot status and configuration
    Status,

    /// Manage configuration
    Config(ConfigArgs),
}

/// Arguments for the init command
#[derive(Args)]
struct InitArgs {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    force: bool,
}

/// Arguments for the chat command
#[derive(Args)]
struct ChatArgs {
    /// Initial message to send before reading stdin
    #[arg(short, long)]
    message: Option<String>,

    /// Scripted transcript to replay (TOML); defaults to the built-in demo
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Roster override: pair, writing-team, or vision-team
    #[arg(short, long)]
    roster: Option<String>,
}

/// Arguments for the config command
#[derive(Args)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Show configuration file path
    Path,
    /// Edit configuration in default editor
    Edit,
    /// Validate configuration
    Validate,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // The guard flushes the log file on drop; keep it for the whole run.
    let _guard = init_logging(cli.verbose);

    let rt = tokio::runtime::Runtime::new().expect("failed to create tokio runtime");

    match rt.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging with the given verbosity level.
///
/// Console output goes to stderr so chat bubbles own stdout; a second copy
/// of every event lands in `~/.troupe/troupe.log`.
fn init_logging(verbosity: u8) -> Option<WorkerGuard> {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "troupe_bot={level},troupe={level},{}",
            if verbosity >= 2 { "debug" } else { "warn" }
        ))
    });

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbosity >= 2);

    let log_dir = config::default_config_dir();
    let file = std::fs::create_dir_all(&log_dir)
        .map(|()| tracing_appender::rolling::never(&log_dir, "troupe.log"))
        .ok();

    match file {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = fmt::layer().with_writer(writer).with_ansi(false);
            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(console_layer)
                .with(file_layer)
                .try_init();
            Some(guard)
        }
        None => {
            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(console_layer)
                .try_init();
            None
        }
    }
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init(args) => cmd_init(args).await,
        Commands::Chat(args) => cmd_chat(args, cli.config).await,
        Commands::Status => cmd_status(cli.config).await,
        Commands::Config(args) => cmd_config(args, cli.config).await,
    }
}

/// Load config from the explicit path, falling back to the default location.
async fn load(config_path: Option<&Path>) -> Result<BotConfig> {
    match config_path {
        Some(path) => load_config_from(path).await,
        None => load_config().await,
    }
}

/// Initialize configuration.
async fn cmd_init(args: InitArgs) -> Result<()> {
    use crate::config::{config_path, init_config};

    let config_file = config_path();

    if config_file.exists() && !args.force {
        println!("Configuration already exists at: {}", config_file.display());
        println!("Use --force to overwrite.");
        return Ok(());
    }

    if config_file.exists() {
        tokio::fs::remove_file(&config_file).await?;
    }

    let config = init_config().await?;

    println!("Configuration created: {}", config_file.display());
    println!("Sandbox directory:     {}", config.session.work_dir.display());
    println!();
    println!("Next steps:");
    println!("  1. troupe config edit");
    println!("  2. export OPEN_AI_API_KEY=<key>   # hosted models only");
    println!("  3. troupe chat");

    Ok(())
}

/// Start interactive chat.
async fn cmd_chat(args: ChatArgs, config_path: Option<PathBuf>) -> Result<()> {
    let mut config = load(config_path.as_deref()).await?;

    if let Some(roster) = args.roster.as_deref() {
        config.session.roster = parse_roster(roster)?;
    }

    let errors: Vec<_> = config
        .validate()
        .into_iter()
        .filter(|i| i.level == IssueLevel::Error)
        .collect();
    if let Some(first) = errors.first() {
        for issue in &errors {
            tracing::error!("{}", issue.message);
        }
        return Err(BotError::config(first.message.clone()));
    }

    let profiles = config.profile_set()?;
    let sentinel = config.sentinel();
    let work_dir = config.session.work_dir.clone();
    let team = build_roster(&config, &profiles, sentinel.clone(), &work_dir)?;

    let display: Arc<dyn ChatDisplay> = Arc::new(TerminalDisplay);
    let relay = MessageRelay::new(roster::default_avatars(), Arc::clone(&display));

    let engine: Arc<dyn ChatEngine> = match &args.script {
        Some(path) => Arc::new(script::load_script(path).await?),
        None => Arc::new(script::demo_script(&sentinel)),
    };

    let coordinator = SessionCoordinator::new(engine).with_observer(Arc::new(relay));

    display.send(system_bubble(&config.ui.greeting));

    if let Some(message) = &args.message {
        run_one(&coordinator, &team, message, &config, &*display).await;
    }

    println!("Troupe Chat | type 'exit' to quit\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("exit") {
            break;
        }
        run_one(&coordinator, &team, line, &config, &*display).await;
    }

    Ok(())
}

/// Run a single session and print the cost-summary bubble.
///
/// A session failure is fatal only to that session: the widget shows no
/// response, the error goes to the log, and the loop keeps accepting input.
async fn run_one(
    coordinator: &SessionCoordinator,
    team: &AgentSet,
    message: &str,
    config: &BotConfig,
    display: &dyn ChatDisplay,
) {
    match coordinator
        .run_session(team, message, config.session.max_rounds)
        .await
    {
        Ok(result) => {
            display.send(accountant_bubble(&config.ui.accountant_avatar, &result));
        }
        Err(e) => {
            tracing::error!("session failed: {e}");
        }
    }
}

/// Build the configured roster.
fn build_roster(
    config: &BotConfig,
    profiles: &ProfileSet,
    sentinel: Sentinel,
    work_dir: &Path,
) -> Result<AgentSet> {
    let team = match config.session.roster {
        RosterKind::Pair => roster::assistant_pair(profiles, sentinel, work_dir)?,
        RosterKind::WritingTeam => roster::writing_team(profiles, sentinel, work_dir)?,
        RosterKind::VisionTeam => roster::vision_team(profiles, sentinel, work_dir)?,
    };
    Ok(team)
}

fn parse_roster(raw: &str) -> Result<RosterKind> {
    match raw {
        "pair" => Ok(RosterKind::Pair),
        "writing-team" => Ok(RosterKind::WritingTeam),
        "vision-team" => Ok(RosterKind::VisionTeam),
        other => Err(BotError::config(format!(
            "unknown roster `{other}` (expected pair, writing-team, or vision-team)"
        ))),
    }
}

/// Show status.
async fn cmd_status(config_path: Option<PathBuf>) -> Result<()> {
    use crate::config::config_path as default_config_path;

    let config_file = config_path.clone().unwrap_or_else(default_config_path);

    println!("Troupe Bot Status\n");

    println!("Configuration:");
    println!("  Path:   {}", config_file.display());
    println!(
        "  Exists: {}",
        if config_file.exists() { "yes" } else { "no" }
    );

    match load(config_path.as_deref()).await {
        Ok(config) => {
            let errors = config
                .validate()
                .iter()
                .filter(|i| i.level == IssueLevel::Error)
                .count();
            println!(
                "  Valid:  {}",
                if errors == 0 {
                    "yes".to_string()
                } else {
                    format!("no ({errors} errors)")
                }
            );
            println!();
            println!("Session:");
            println!("  Roster:     {:?}", config.session.roster);
            println!("  Sentinel:   {}", config.session.sentinel);
            println!("  Max rounds: {}", config.session.max_rounds);
            println!("  Sandbox:    {}", config.session.work_dir.display());
            println!();
            println!("Models:");
            for (key, model) in &config.models {
                let location = model.base_url.as_deref().unwrap_or("hosted");
                println!("  {key}: {} ({location})", model.model);
            }
            println!();
            println!("Environment:");
            let mut vars: Vec<_> = config
                .models
                .values()
                .filter_map(|m| m.api_key_env.as_deref())
                .collect();
            vars.sort_unstable();
            vars.dedup();
            if vars.is_empty() {
                println!("  (no hosted models configured)");
            }
            for var in vars {
                print_env_status(var);
            }
        }
        Err(e) => {
            println!("  Valid:  no ({e})");
        }
    }

    Ok(())
}

/// Configuration management.
async fn cmd_config(args: ConfigArgs, config_path: Option<PathBuf>) -> Result<()> {
    use crate::config::config_path as default_config_path;

    let config_file = config_path.clone().unwrap_or_else(default_config_path);

    match args.command {
        ConfigCommands::Path => {
            println!("{}", config_file.display());
        }
        ConfigCommands::Show => {
            if config_file.exists() {
                let content = tokio::fs::read_to_string(&config_file).await?;
                println!("{content}");
            } else {
                println!("Configuration file does not exist.");
                println!("Run 'troupe init' to create one.");
            }
        }
        ConfigCommands::Edit => {
            let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
            std::process::Command::new(&editor)
                .arg(&config_file)
                .status()
                .map_err(|e| BotError::config(format!("failed to open editor: {e}")))?;
        }
        ConfigCommands::Validate => {
            if !config_file.exists() {
                println!("error: configuration file does not exist");
                return Ok(());
            }

            match load(config_path.as_deref()).await {
                Ok(config) => {
                    let issues = config.validate();
                    if issues.is_empty() {
                        println!("Configuration is valid");
                    }
                    for issue in issues {
                        match issue.level {
                            IssueLevel::Error => println!("error: {}", issue.message),
                            IssueLevel::Warning => println!("warning: {}", issue.message),
                        }
                    }
                }
                Err(e) => println!("error: {e}"),
            }
        }
    }

    Ok(())
}

fn print_env_status(name: &str) {
    let status = if std::env::var(name).is_ok() {
        "set"
    } else {
        "-"
    };
    println!("  {name}: {status}");
}
