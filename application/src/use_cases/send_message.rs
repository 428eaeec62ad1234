//! Send message use case
//!
//! [`ChatCoordinator`] runs one user turn against a session: it records the
//! user message, streams the reply into the session while it arrives, and
//! either commits the reply with the backend's thread id or rolls the
//! session back to just the user message.
//!
//! The owning session is fixed when the send starts. Switching the active
//! session mid-stream does not redirect the reply, so concurrent sends on
//! different sessions never mix. A second send on a session that is still
//! streaming is ignored.

use crate::config::ChatConfig;
use crate::ports::chat_transport::{ChatStream, ChatTransport, TransportError};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::progress::{NoSendProgress, SendProgress};
use crate::use_cases::session_store::SessionStore;
use chatline_domain::{Message, Session};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors surfaced to the user for a failed send
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// No credential; the user has to sign in before sending.
    #[error("Sign-in required")]
    AuthRequired,

    /// Any other failure, carrying the message to display verbatim.
    #[error("{0}")]
    Transport(String),
}

impl From<TransportError> for ChatError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::AuthRequired => ChatError::AuthRequired,
            other => ChatError::Transport(other.to_string()),
        }
    }
}

/// Why a send was not attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The text was empty after trimming.
    EmptyInput,
    /// The target session is already streaming a reply.
    Busy,
    /// The target session does not exist.
    UnknownSession,
}

/// Result of a send that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The reply was streamed and committed.
    Committed {
        session_id: String,
        thread_id: Option<String>,
        reply: String,
    },
    /// Nothing was sent and no state changed.
    Ignored(IgnoreReason),
    /// The send was cancelled; the session keeps only the user message.
    Cancelled { session_id: String },
}

impl SendOutcome {
    pub fn reply(&self) -> Option<&str> {
        match self {
            SendOutcome::Committed { reply, .. } => Some(reply),
            _ => None,
        }
    }
}

/// How the reply stream ended
enum StreamEnd {
    Completed { thread_id: String },
    Cancelled,
}

/// Marks a session as sending for as long as it lives.
struct InFlightGuard<'a> {
    in_flight: &'a Mutex<HashSet<String>>,
    session_id: String,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(in_flight: &'a Mutex<HashSet<String>>, session_id: &str) -> Option<Self> {
        let mut set = in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if !set.insert(session_id.to_string()) {
            return None;
        }
        Some(Self {
            in_flight,
            session_id: session_id.to_string(),
        })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.session_id);
    }
}

/// Rolls the owning session back to the user message and prior thread if
/// the send is dropped before it settles.
struct AbandonGuard {
    sessions: Arc<SessionStore>,
    session_id: String,
    restore: Option<(Vec<Message>, Option<String>)>,
}

impl AbandonGuard {
    fn arm(
        sessions: &Arc<SessionStore>,
        session_id: &str,
        with_user: &[Message],
        prior_thread: &Option<String>,
    ) -> Self {
        Self {
            sessions: Arc::clone(sessions),
            session_id: session_id.to_string(),
            restore: Some((with_user.to_vec(), prior_thread.clone())),
        }
    }

    fn disarm(&mut self) {
        self.restore = None;
    }
}

impl Drop for AbandonGuard {
    fn drop(&mut self) {
        let Some((messages, thread_id)) = self.restore.take() else {
            return;
        };
        warn!("Send in session {} abandoned mid-reply", self.session_id);
        let restored = self
            .sessions
            .update_messages_detached(&self.session_id, messages, thread_id);
        if let Err(e) = restored {
            debug!("Dropping rollback for session {}: {}", self.session_id, e);
        }
    }
}

/// Reply being accumulated for one send.
struct PendingReply {
    message: Message,
    unflushed: usize,
}

impl PendingReply {
    fn new() -> Self {
        Self {
            message: Message::placeholder(),
            unflushed: 0,
        }
    }

    fn push(&mut self, delta: &str) {
        self.message.content.push_str(delta);
        self.unflushed += 1;
    }

    fn text(&self) -> &str {
        &self.message.content
    }
}

/// Coordinates user turns between the session store and the chat backend.
pub struct ChatCoordinator {
    transport: Arc<dyn ChatTransport>,
    sessions: Arc<SessionStore>,
    config: ChatConfig,
    in_flight: Mutex<HashSet<String>>,
    progress: Arc<dyn SendProgress>,
    conversation_logger: Arc<dyn ConversationLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl ChatCoordinator {
    pub fn new(transport: Arc<dyn ChatTransport>, sessions: Arc<SessionStore>) -> Self {
        Self {
            transport,
            sessions,
            config: ChatConfig::default(),
            in_flight: Mutex::new(HashSet::new()),
            progress: Arc::new(NoSendProgress),
            conversation_logger: Arc::new(NoConversationLogger),
            cancellation_token: None,
        }
    }

    pub fn with_config(mut self, config: ChatConfig) -> Self {
        self.config = config;
        self
    }

    /// Report deltas and send lifecycle to `progress`.
    pub fn with_progress(mut self, progress: Arc<dyn SendProgress>) -> Self {
        self.progress = progress;
        self
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Set a cancellation token for graceful interruption.
    ///
    /// The token is one-shot: once cancelled, the send in flight and every
    /// later send return [`SendOutcome::Cancelled`]. Build a new coordinator
    /// with a fresh token to send again.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// True while a reply is streaming into `session_id`.
    pub fn is_sending(&self, session_id: &str) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(session_id)
    }

    /// Send `text` in the active session.
    pub async fn send(&self, text: &str) -> Result<SendOutcome, ChatError> {
        let session_id = self.sessions.active_id();
        self.send_to(&session_id, text).await
    }

    /// Send `text` in the session `session_id`.
    ///
    /// On failure the session is left holding the user message and its
    /// previous thread id, and the error is returned for display.
    pub async fn send_to(&self, session_id: &str, text: &str) -> Result<SendOutcome, ChatError> {
        if text.trim().is_empty() {
            debug!("Ignoring empty message");
            return Ok(SendOutcome::Ignored(IgnoreReason::EmptyInput));
        }

        let Some(_guard) = InFlightGuard::acquire(&self.in_flight, session_id) else {
            debug!("Session {} is busy, ignoring send", session_id);
            return Ok(SendOutcome::Ignored(IgnoreReason::Busy));
        };

        let Some(session) = self.sessions.get(session_id) else {
            debug!("Session {} not found, ignoring send", session_id);
            return Ok(SendOutcome::Ignored(IgnoreReason::UnknownSession));
        };

        if self.is_cancelled() {
            return Ok(SendOutcome::Cancelled {
                session_id: session_id.to_string(),
            });
        }

        self.run_turn(&session, text).await
    }

    async fn run_turn(&self, session: &Session, text: &str) -> Result<SendOutcome, ChatError> {
        let session_id = session.id();
        let prior_thread = session.thread_id().map(str::to_string);

        let mut with_user = session.messages().to_vec();
        with_user.push(Message::user(text));

        self.write(session_id, with_user.clone(), prior_thread.clone())
            .await;
        let mut abandon = AbandonGuard::arm(&self.sessions, session_id, &with_user, &prior_thread);
        self.conversation_logger.log(ConversationEvent::user_message(
            session_id,
            prior_thread.as_deref(),
            text,
        ));
        info!(
            "Sending message in session {} (thread: {})",
            session_id,
            prior_thread.as_deref().unwrap_or("new")
        );

        let mut reply = PendingReply::new();
        let result = self
            .stream_reply(session_id, text, &prior_thread, &with_user, &mut reply)
            .await;
        // Every branch below settles the session on its first poll.
        abandon.disarm();

        match result {
            Ok(StreamEnd::Completed { thread_id }) => {
                let thread_id = Some(thread_id).filter(|t| !t.is_empty());
                let mut committed = with_user;
                committed.push(reply.message.clone());
                self.write(session_id, committed, thread_id.clone()).await;

                self.conversation_logger
                    .log(ConversationEvent::assistant_message(
                        session_id,
                        thread_id.as_deref(),
                        reply.text(),
                    ));
                self.progress.on_stream_end(session_id);
                info!(
                    "Committed {} byte reply in session {}",
                    reply.text().len(),
                    session_id
                );

                Ok(SendOutcome::Committed {
                    session_id: session_id.to_string(),
                    thread_id,
                    reply: reply.message.content,
                })
            }
            Ok(StreamEnd::Cancelled) => {
                self.write(session_id, with_user, prior_thread).await;
                self.conversation_logger
                    .log(ConversationEvent::send_cancelled(session_id, reply.text().len()));
                info!("Send cancelled in session {}", session_id);

                Ok(SendOutcome::Cancelled {
                    session_id: session_id.to_string(),
                })
            }
            Err(e) => {
                self.write(session_id, with_user, prior_thread).await;

                let error = ChatError::from(e);
                let message = error.to_string();
                self.conversation_logger
                    .log(ConversationEvent::send_failed(session_id, &message));
                self.progress.on_failed(session_id, &message);
                warn!("Send failed in session {}: {}", session_id, message);

                Err(error)
            }
        }
    }

    /// Request the reply and apply deltas until it completes, fails, or is
    /// cancelled.
    async fn stream_reply(
        &self,
        session_id: &str,
        text: &str,
        prior_thread: &Option<String>,
        with_user: &[Message],
        reply: &mut PendingReply,
    ) -> Result<StreamEnd, TransportError> {
        let request = self.transport.send(text, prior_thread.as_deref());
        let mut stream: ChatStream = if let Some(ref token) = self.cancellation_token {
            tokio::select! {
                biased;
                _ = token.cancelled() => return Ok(StreamEnd::Cancelled),
                stream = request => stream?,
            }
        } else {
            request.await?
        };

        let thread_id = stream.thread_id().to_string();
        debug!("Reply streaming in session {} (thread: {})", session_id, thread_id);
        self.progress.on_stream_start(session_id);

        if self.config.placeholder {
            self.flush(session_id, with_user, prior_thread, reply).await;
        }

        loop {
            let next = if let Some(ref token) = self.cancellation_token {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => return Ok(StreamEnd::Cancelled),
                    next = stream.next_delta() => next,
                }
            } else {
                stream.next_delta().await
            };

            match next {
                Some(Ok(delta)) => {
                    self.progress.on_chunk(session_id, &delta);
                    reply.push(&delta);
                    if self.config.placeholder && reply.unflushed >= self.config.flush_every {
                        self.flush(session_id, with_user, prior_thread, reply).await;
                    }
                }
                Some(Err(e)) => return Err(e),
                None => break,
            }
        }

        Ok(StreamEnd::Completed { thread_id })
    }

    /// Reflect the partial reply into the session.
    async fn flush(
        &self,
        session_id: &str,
        with_user: &[Message],
        prior_thread: &Option<String>,
        reply: &mut PendingReply,
    ) {
        let mut messages = with_user.to_vec();
        messages.push(reply.message.clone());
        self.write(session_id, messages, prior_thread.clone()).await;
        reply.unflushed = 0;
    }

    /// Update the owning session. A session closed or evicted mid-send is
    /// no longer tracked; its updates are dropped.
    async fn write(&self, session_id: &str, messages: Vec<Message>, thread_id: Option<String>) {
        if let Err(e) = self
            .sessions
            .update_messages(session_id, messages, thread_id)
            .await
        {
            debug!("Dropping update for session {}: {}", session_id, e);
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation_token
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
    }
}
