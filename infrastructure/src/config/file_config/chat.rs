//! Chat configuration from TOML (`[chat]` section)

use chatline_application::ChatConfig;
use serde::{Deserialize, Serialize};

/// Raw chat configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileChatConfig {
    /// Show the reply in the session while it streams
    pub placeholder: bool,
    /// Number of deltas between session store writes
    pub flush_every: usize,
}

impl Default for FileChatConfig {
    fn default() -> Self {
        let defaults = ChatConfig::default();
        Self {
            placeholder: defaults.placeholder,
            flush_every: defaults.flush_every,
        }
    }
}

impl FileChatConfig {
    pub fn to_chat_config(&self) -> ChatConfig {
        ChatConfig::default()
            .with_placeholder(self.placeholder)
            .with_flush_every(self.flush_every)
    }
}
