//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::output::format_session_list;
use chatline_application::{ChatCoordinator, ChatError, IgnoreReason, SendOutcome};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::sync::Arc;

/// What the loop should do after a slash command
#[derive(Debug, PartialEq, Eq)]
enum CommandResult {
    Continue,
    Quit,
}

/// Interactive chat REPL
pub struct ChatRepl {
    coordinator: Arc<ChatCoordinator>,
}

impl ChatRepl {
    pub fn new(coordinator: Arc<ChatCoordinator>) -> Self {
        Self { coordinator }
    }

    /// Run the interactive REPL
    pub async fn run(&self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = history_path();
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        loop {
            let readline = rl.readline(">>> ");

            match readline {
                Ok(line) => {
                    let line = line.trim();

                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        if self.handle_command(line).await == CommandResult::Quit {
                            break;
                        }
                        continue;
                    }

                    let _ = rl.add_history_entry(line);

                    if !self.process_message(line).await {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn print_welcome(&self) {
        let active = self.coordinator.sessions().active_session();
        println!();
        println!("chatline - {}", active.title());
        println!();
        print_help();
    }

    /// Handle slash commands.
    async fn handle_command(&self, line: &str) -> CommandResult {
        let sessions = self.coordinator.sessions();
        let mut parts = line.split_whitespace();
        let cmd = parts.next().unwrap_or_default();
        let arg = parts.next();

        match cmd {
            "/quit" | "/exit" | "/q" => {
                println!("Bye!");
                return CommandResult::Quit;
            }
            "/help" | "/h" | "/?" => print_help(),
            "/new" => {
                sessions.create().await;
                println!("Started a new conversation.");
            }
            "/list" | "/ls" => {
                print!(
                    "{}",
                    format_session_list(&sessions.sessions(), &sessions.active_id())
                );
            }
            "/switch" => match arg.and_then(|n| n.parse::<usize>().ok()) {
                Some(n) if n >= 1 => {
                    let listed = sessions.sessions();
                    match listed.get(n - 1) {
                        Some(session) => {
                            let id = sessions.switch_active(session.id());
                            if let Some(active) = sessions.get(&id) {
                                println!("Switched to: {}", active.title());
                            }
                        }
                        None => println!("No conversation #{n}. Use /list."),
                    }
                }
                _ => println!("Usage: /switch <number>"),
            },
            "/close" => {
                let active = sessions.active_id();
                sessions.close(&active).await;
                println!("Closed. Now in: {}", sessions.active_session().title());
            }
            _ => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
            }
        }
        CommandResult::Continue
    }

    /// Send one message. Returns false when the loop should stop.
    async fn process_message(&self, text: &str) -> bool {
        println!();
        let result = self.coordinator.send(text).await;
        let keep_going = match result {
            Ok(SendOutcome::Committed { .. }) => true,
            Ok(SendOutcome::Cancelled { .. }) => {
                println!();
                println!("(cancelled)");
                false
            }
            Ok(SendOutcome::Ignored(IgnoreReason::Busy)) => {
                println!("Still waiting for the previous reply.");
                true
            }
            Ok(SendOutcome::Ignored(_)) => true,
            Err(ChatError::AuthRequired) => {
                eprintln!("Sign-in required: set $CHATLINE_TOKEN or [auth] token.");
                true
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                true
            }
        };
        println!();
        keep_going
    }
}

fn print_help() {
    println!("Commands:");
    println!("  /new              - Start a new conversation");
    println!("  /list             - List conversations");
    println!("  /switch <number>  - Switch to a conversation from /list");
    println!("  /close            - Close the current conversation");
    println!("  /help, /h, /?     - Show this help");
    println!("  /quit, /exit, /q  - Exit chat");
    println!();
}

fn history_path() -> Option<std::path::PathBuf> {
    chatline_infrastructure::FileKeyValueStore::default_dir().map(|d| d.join("history.txt"))
}
