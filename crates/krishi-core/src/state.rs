//! Transcript types shared by the library and any front end
//!
//! Plain data with no dependency on a UI framework, so a terminal front end
//! and a future web or desktop shell can render the same transcript.

use serde::{Deserialize, Serialize};

/// One line of the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// Who said it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn label(&self, resolver: &crate::language::Resolver) -> &'static str {
        match self {
            ChatRole::User => resolver.pick("आप", "You"),
            ChatRole::Assistant => resolver.pick("सहायक", "Assistant"),
        }
    }
}
