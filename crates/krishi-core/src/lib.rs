pub mod config;
pub mod conversation;
pub mod corpus;
pub mod faq;
pub mod language;
pub mod state;

// Re-export main types for convenience
pub use config::Config;
pub use conversation::{Conversation, ConversationState, Transcript, DEFAULT_REPLY_DELAY};
pub use corpus::{Category, Corpus, CorpusError, FaqEntry};
pub use faq::{CategoryFilter, CategoryOption, FaqEngine, Reply, MAX_SUGGESTIONS};
pub use language::{Language, LocalizedText, Resolver};
pub use state::{ChatMessage, ChatRole};
