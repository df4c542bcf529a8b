//! Bilingual content resolution
//!
//! Every piece of user-facing text exists in Hindi and English. A `Resolver`
//! holds the session's active language and picks the matching variant.

use serde::{Deserialize, Serialize};

/// The two display languages. Hindi is the primary language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Hindi,
    English,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Hindi => "hindi",
            Language::English => "english",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "hindi" => Some(Language::Hindi),
            "english" => Some(Language::English),
            _ => None,
        }
    }

    pub fn other(&self) -> Self {
        match self {
            Language::Hindi => Language::English,
            Language::English => Language::Hindi,
        }
    }

    /// Label shown on the toggle button (names the language you switch *to*)
    pub fn toggle_label(&self) -> &'static str {
        match self {
            Language::Hindi => "English",
            Language::English => "हिंदी",
        }
    }
}

/// The same content in both languages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub hindi: String,
    pub english: String,
}

impl LocalizedText {
    pub fn new(hindi: impl Into<String>, english: impl Into<String>) -> Self {
        Self {
            hindi: hindi.into(),
            english: english.into(),
        }
    }
}

/// Session-scoped language selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Resolver {
    language: Language,
}

impl Resolver {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn current(&self) -> Language {
        self.language
    }

    pub fn resolve<'a>(&self, text: &'a LocalizedText) -> &'a str {
        self.pick(&text.hindi, &text.english)
    }

    /// Choose between two borrowed variants, for UI strings that never live in the corpus
    pub fn pick<'a>(&self, hindi: &'a str, english: &'a str) -> &'a str {
        match self.language {
            Language::Hindi => hindi,
            Language::English => english,
        }
    }

    pub fn toggle(&mut self) {
        self.language = self.language.other();
        tracing::debug!(language = self.language.as_str(), "language toggled");
    }
}
