use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use crate::language::LocalizedText;

const DEFAULT_CORPUS: &str = include_str!("../data/faq.json");

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read corpus file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse corpus JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("entry {id} has an empty {field}")]
    EmptyText { id: u32, field: &'static str },

    #[error("duplicate entry id {0}")]
    DuplicateId(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Crop Cultivation")]
    CropCultivation,
    #[serde(rename = "Government Schemes")]
    GovernmentSchemes,
    #[serde(rename = "Pest Management")]
    PestManagement,
}

impl Category {
    /// Stable key, identical to the serialized name
    pub fn key(&self) -> &'static str {
        match self {
            Category::CropCultivation => "Crop Cultivation",
            Category::GovernmentSchemes => "Government Schemes",
            Category::PestManagement => "Pest Management",
        }
    }

    pub fn label(&self) -> LocalizedText {
        match self {
            Category::CropCultivation => LocalizedText::new("फसल उत्पादन", "Crop Cultivation"),
            Category::GovernmentSchemes => LocalizedText::new("सरकारी योजनाएं", "Government Schemes"),
            Category::PestManagement => LocalizedText::new("कीट प्रबंधन", "Pest Management"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub id: u32,
    pub question: LocalizedText,
    pub answer: LocalizedText,
    pub category: Category,
}

/// Validated, ordered FAQ entries. Order is the order they were loaded in.
#[derive(Debug, Clone)]
pub struct Corpus {
    entries: Vec<FaqEntry>,
}

impl Corpus {
    pub fn new(entries: Vec<FaqEntry>) -> Result<Self, CorpusError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.id) {
                return Err(CorpusError::DuplicateId(entry.id));
            }
            let fields = [
                ("hindi question", &entry.question.hindi),
                ("english question", &entry.question.english),
                ("hindi answer", &entry.answer.hindi),
                ("english answer", &entry.answer.english),
            ];
            for (field, text) in fields {
                if text.trim().is_empty() {
                    return Err(CorpusError::EmptyText { id: entry.id, field });
                }
            }
        }
        Ok(Self { entries })
    }

    pub fn from_json(json: &str) -> Result<Self, CorpusError> {
        let entries: Vec<FaqEntry> = serde_json::from_str(json)?;
        Self::new(entries)
    }

    pub fn load(path: &Path) -> Result<Self, CorpusError> {
        let content = std::fs::read_to_string(path)?;
        let corpus = Self::from_json(&content)?;
        tracing::info!(path = %path.display(), entries = corpus.len(), "loaded FAQ corpus");
        Ok(corpus)
    }

    /// The compiled-in farming FAQ
    pub fn builtin() -> Result<Self, CorpusError> {
        Self::from_json(DEFAULT_CORPUS)
    }

    pub fn entries(&self) -> &[FaqEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
