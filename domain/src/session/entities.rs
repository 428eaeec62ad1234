//! Session domain entities

use super::title::{DEFAULT_SESSION_TITLE, title_from_message};
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A message in a conversation (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: new_message_id(),
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            id: new_message_id(),
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// An assistant message with empty content, filled while streaming.
    pub fn placeholder() -> Self {
        Self::assistant(String::new())
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

/// Represents one conversation thread (Entity)
///
/// Serialized in the persisted record shape: camelCase keys and Unix
/// millisecond timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    id: String,
    title: String,
    messages: Vec<Message>,
    thread_id: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    updated_at: DateTime<Utc>,
}

impl Session {
    /// Create a fresh session: default title, no messages, no thread.
    pub fn new() -> Self {
        let now = now_millis();
        Self {
            id: new_session_id(now),
            title: DEFAULT_SESSION_TITLE.to_string(),
            messages: Vec::new(),
            thread_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn thread_id(&self) -> Option<&str> {
        self.thread_id.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn has_default_title(&self) -> bool {
        self.title == DEFAULT_SESSION_TITLE
    }

    /// Replace the message list and thread id.
    ///
    /// The title is derived from the first user message only while it is
    /// still the default and the new list is non-empty.
    pub fn update_messages(&mut self, messages: Vec<Message>, thread_id: Option<String>) {
        if self.has_default_title()
            && let Some(first_user) = messages.iter().find(|m| m.is_user())
        {
            self.title = title_from_message(&first_user.content);
        }

        self.messages = messages;
        self.thread_id = thread_id;
        self.updated_at = now_millis().max(self.updated_at);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Current time truncated to the millisecond precision used on disk.
fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

fn new_message_id() -> String {
    Uuid::new_v4().to_string()
}

/// Session ids look like `session_<unix millis>_<9 hex chars>`.
fn new_session_id(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("session_{}_{}", now.timestamp_millis(), &suffix[..9])
}
