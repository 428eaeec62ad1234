//! CLI entrypoint for chatline
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod commands;
mod output;
mod repl;

use anyhow::{Context, Result, anyhow, bail};
use chatline_application::{
    ChatCoordinator, ChatError, IgnoreReason, KeyValueStore, SendOutcome, SessionStore,
};
use chatline_infrastructure::{
    ConfigLoader, FileConfig, FileKeyValueStore, HttpChatTransport, JsonlConversationLogger,
    MemoryKeyValueStore,
};
use clap::Parser;
use commands::{Cli, Command};
use output::{StreamPrinter, format_session_list, format_transcript};
use repl::ChatRepl;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("failed to load configuration: {e}"))?
    };

    let issues = config.validate();
    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("config: {issue}");
        }
        bail!("invalid configuration ({} issue(s))", issues.len());
    }

    info!("Starting chatline against {}", config.backend.base_url);

    // === Dependency Injection ===
    let storage = build_storage(&config, cli.ephemeral);
    let sessions = Arc::new(SessionStore::load(storage, config.storage.key.clone()).await);

    match cli.command.unwrap_or(Command::Chat) {
        Command::Sessions => {
            print!(
                "{}",
                format_session_list(&sessions.sessions(), &sessions.active_id())
            );
        }
        Command::New => {
            let id = sessions.create().await;
            println!("{id}");
        }
        Command::Close { id } => {
            if !sessions.close(&id).await {
                bail!("no session with id {id}");
            }
        }
        Command::Show { id } => {
            let session = sessions
                .get(&id)
                .with_context(|| format!("no session with id {id}"))?;
            print!("{}", format_transcript(&session));
        }
        Command::Send { text, session } => {
            let coordinator = build_coordinator(&config, sessions.clone(), interrupt_token());
            let outcome = match session {
                Some(id) => coordinator.send_to(&id, &text).await,
                None => coordinator.send(&text).await,
            };
            report_send(outcome)?;
        }
        Command::Chat => {
            let coordinator = build_coordinator(&config, sessions.clone(), interrupt_token());
            ChatRepl::new(Arc::new(coordinator)).run().await?;
        }
    }

    Ok(())
}

/// Install the tracing subscriber. Logs go to stderr, or to `log_file`
/// through a non-blocking writer whose guard must outlive `main`.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match log_file {
        Some(path) => {
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
            let name = path
                .file_name()
                .with_context(|| format!("invalid log file path {}", path.display()))?;
            if let Some(dir) = dir {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("cannot create {}", dir.display()))?;
            }
            let appender = tracing_appender::rolling::never(dir.unwrap_or(Path::new(".")), name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            builder.with_writer(writer).with_ansi(false).init();
            Ok(Some(guard))
        }
        None => {
            builder.with_writer(std::io::stderr).init();
            Ok(None)
        }
    }
}

fn build_storage(config: &FileConfig, ephemeral: bool) -> Arc<dyn KeyValueStore> {
    if ephemeral {
        return Arc::new(MemoryKeyValueStore::new());
    }
    match config.storage.resolve_dir() {
        Some(dir) => {
            info!("Storing sessions in {}", dir.display());
            Arc::new(FileKeyValueStore::new(dir))
        }
        None => {
            warn!("No data directory available; sessions will not be saved");
            Arc::new(MemoryKeyValueStore::new())
        }
    }
}

fn build_coordinator(
    config: &FileConfig,
    sessions: Arc<SessionStore>,
    cancellation: CancellationToken,
) -> ChatCoordinator {
    let transport = Arc::new(HttpChatTransport::new(
        config.backend.to_transport_config(),
        config.auth.provider(),
    ));

    let mut coordinator = ChatCoordinator::new(transport, sessions)
        .with_config(config.chat.to_chat_config())
        .with_progress(Arc::new(StreamPrinter))
        .with_cancellation(cancellation);

    if let Some(path) = &config.logging.conversation_log
        && let Some(logger) = JsonlConversationLogger::new(path)
    {
        info!("Writing transcript to {}", logger.path().display());
        coordinator = coordinator.with_conversation_logger(Arc::new(logger));
    }

    coordinator
}

/// Token cancelled on Ctrl-C.
fn interrupt_token() -> CancellationToken {
    let token = CancellationToken::new();
    let on_interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });
    token
}

fn report_send(outcome: Result<SendOutcome, ChatError>) -> Result<()> {
    match outcome {
        Ok(SendOutcome::Committed { .. }) => Ok(()),
        Ok(SendOutcome::Cancelled { .. }) => bail!("cancelled"),
        Ok(SendOutcome::Ignored(IgnoreReason::EmptyInput)) => bail!("nothing to send"),
        Ok(SendOutcome::Ignored(IgnoreReason::UnknownSession)) => bail!("no such session"),
        Ok(SendOutcome::Ignored(IgnoreReason::Busy)) => bail!("session is busy"),
        Err(ChatError::AuthRequired) => {
            bail!("sign-in required: set $CHATLINE_TOKEN or [auth] token")
        }
        Err(e) => Err(e.into()),
    }
}
