use crate::corpus::{Category, Corpus, FaqEntry};
use crate::language::{LocalizedText, Resolver};

/// Most suggested questions shown for any filter
pub const MAX_SUGGESTIONS: usize = 6;

/// Key of the "every category" sentinel
pub const ALL_CATEGORIES_KEY: &str = "all";

/// Selection in the suggested-questions category dropdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn key(&self) -> &'static str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES_KEY,
            CategoryFilter::Only(category) => category.key(),
        }
    }

    pub fn admits(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => *c == category,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOption {
    pub filter: CategoryFilter,
    pub key: &'static str,
    pub label: String,
}

/// An answer ready for display. `category` is `None` for the fallback message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub content: String,
    pub category: Option<Category>,
}

pub fn fallback_message() -> LocalizedText {
    LocalizedText::new(
        "मुझे खुशी होगी आपकी मदद करने में। कृपया अपना प्रश्न और स्पष्ट तरीके से पूछें।",
        "I would be happy to help you. Please ask your question more clearly.",
    )
}

/// Question lookup over an immutable corpus
pub struct FaqEngine {
    corpus: Corpus,
}

impl FaqEngine {
    pub fn new(corpus: Corpus) -> Self {
        Self { corpus }
    }

    pub fn entries(&self) -> &[FaqEntry] {
        self.corpus.entries()
    }

    pub fn get(&self, id: u32) -> Option<&FaqEntry> {
        self.corpus.entries().iter().find(|entry| entry.id == id)
    }

    /// The "all" sentinel followed by every category present, in order of first appearance
    pub fn list_categories(&self, resolver: &Resolver) -> Vec<CategoryOption> {
        let mut options = vec![CategoryOption {
            filter: CategoryFilter::All,
            key: CategoryFilter::All.key(),
            label: resolver.pick("सभी", "All").to_string(),
        }];

        for entry in self.corpus.entries() {
            let filter = CategoryFilter::Only(entry.category);
            if options.iter().any(|o| o.key == filter.key()) {
                continue;
            }
            options.push(CategoryOption {
                filter,
                key: filter.key(),
                label: resolver.resolve(&entry.category.label()).to_string(),
            });
        }

        options
    }

    pub fn suggested_questions(&self, filter: CategoryFilter) -> Vec<&FaqEntry> {
        self.corpus
            .entries()
            .iter()
            .filter(|entry| filter.admits(entry.category))
            .take(MAX_SUGGESTIONS)
            .collect()
    }

    /// First entry, in corpus order, whose question contains the input or is
    /// contained in it (either language, case-insensitive)
    pub fn find_match(&self, text: &str) -> Option<&FaqEntry> {
        if text.trim().is_empty() {
            return None;
        }

        let needle = text.to_lowercase();

        self.corpus.entries().iter().find(|entry| {
            let hindi = entry.question.hindi.to_lowercase();
            let english = entry.question.english.to_lowercase();

            hindi.contains(&needle)
                || english.contains(&needle)
                || needle.contains(&hindi)
                || needle.contains(&english)
        })
    }

    pub fn answer(&self, text: &str, resolver: &Resolver) -> Reply {
        match self.find_match(text) {
            Some(entry) => Reply {
                content: resolver.resolve(&entry.answer).to_string(),
                category: Some(entry.category),
            },
            None => {
                tracing::debug!(input = text, "no FAQ entry matched");
                Reply {
                    content: resolver.resolve(&fallback_message()).to_string(),
                    category: None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;

    fn entry(id: u32, english: &str, category: Category) -> FaqEntry {
        FaqEntry {
            id,
            question: LocalizedText::new(format!("प्रश्न {}", id), english),
            answer: LocalizedText::new(format!("उत्तर {}", id), format!("answer {}", id)),
            category,
        }
    }

    fn builtin() -> FaqEngine {
        FaqEngine::new(Corpus::builtin().unwrap())
    }

    #[test]
    fn test_blank_input_never_matches() {
        let engine = builtin();
        assert!(engine.find_match("").is_none());
        assert!(engine.find_match("   ").is_none());
        assert!(engine.find_match("\t\n").is_none());
    }

    #[test]
    fn test_first_containing_entry_wins() {
        let corpus = Corpus::new(vec![
            entry(1, "wheat", Category::CropCultivation),
            entry(2, "How to grow wheat?", Category::CropCultivation),
        ])
        .unwrap();
        let engine = FaqEngine::new(corpus);

        // Entry 1 is contained in the input, entry 2 contains it. Corpus order decides.
        assert_eq!(engine.find_match("wheat").map(|e| e.id), Some(1));
        assert_eq!(engine.find_match("I want wheat info").map(|e| e.id), Some(1));
    }

    #[test]
    fn test_earlier_entry_beats_tighter_match() {
        let corpus = Corpus::new(vec![
            entry(1, "How to grow wheat?", Category::CropCultivation),
            entry(2, "wheat", Category::CropCultivation),
        ])
        .unwrap();
        let engine = FaqEngine::new(corpus);

        assert_eq!(engine.find_match("wheat").map(|e| e.id), Some(1));
        assert_eq!(
            engine.find_match("tell me: how to grow wheat? thanks").map(|e| e.id),
            Some(1)
        );
        // Only entry 2 is contained in this input
        assert_eq!(engine.find_match("I want wheat info").map(|e| e.id), Some(2));
    }

    #[test]
    fn test_match_is_case_insensitive_in_both_languages() {
        let engine = builtin();
        assert_eq!(engine.find_match("pm kisan").map(|e| e.id), Some(2));
        assert_eq!(engine.find_match("PM KISAN SCHEME").map(|e| e.id), Some(2));
        assert_eq!(engine.find_match("गेहूं").map(|e| e.id), Some(1));
        assert!(engine.find_match("tractor loan").is_none());
    }

    #[test]
    fn test_answer_maps_no_match_to_fallback() {
        let engine = builtin();
        let resolver = Resolver::new(Language::English);

        let reply = engine.answer("weather tomorrow", &resolver);
        assert_eq!(reply.content, fallback_message().english);
        assert_eq!(reply.category, None);

        let reply = engine.answer("wheat", &resolver);
        assert_eq!(reply.content, engine.get(1).unwrap().answer.english);
        assert_eq!(reply.category, Some(Category::CropCultivation));
    }

    #[test]
    fn test_suggested_questions_cap_and_order() {
        let entries: Vec<FaqEntry> = (1..=9)
            .map(|id| {
                let category = if id % 3 == 0 {
                    Category::PestManagement
                } else {
                    Category::CropCultivation
                };
                entry(id, &format!("question {}", id), category)
            })
            .collect();
        let engine = FaqEngine::new(Corpus::new(entries).unwrap());

        let all: Vec<u32> = engine
            .suggested_questions(CategoryFilter::All)
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(all, vec![1, 2, 3, 4, 5, 6]);

        let pests: Vec<u32> = engine
            .suggested_questions(CategoryFilter::Only(Category::PestManagement))
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(pests, vec![3, 6, 9]);

        assert!(engine
            .suggested_questions(CategoryFilter::Only(Category::GovernmentSchemes))
            .is_empty());
    }

    #[test]
    fn test_list_categories_in_first_appearance_order() {
        let corpus = Corpus::new(vec![
            entry(1, "a", Category::PestManagement),
            entry(2, "b", Category::CropCultivation),
            entry(3, "c", Category::PestManagement),
        ])
        .unwrap();
        let engine = FaqEngine::new(corpus);

        let keys: Vec<&str> = engine
            .list_categories(&Resolver::new(Language::English))
            .iter()
            .map(|o| o.key)
            .collect();
        assert_eq!(keys, vec!["all", "Pest Management", "Crop Cultivation"]);

        let labels: Vec<String> = engine
            .list_categories(&Resolver::new(Language::Hindi))
            .into_iter()
            .map(|o| o.label)
            .collect();
        assert_eq!(labels, vec!["सभी", "कीट प्रबंधन", "फसल उत्पादन"]);
    }

    #[test]
    fn test_category_option_key_matches_filter() {
        let engine = FaqEngine::new(Corpus::builtin().unwrap());
        let options = engine.list_categories(&Resolver::new(Language::English));

        assert_eq!(CategoryFilter::All.key(), ALL_CATEGORIES_KEY);
        for option in &options {
            assert_eq!(option.key, option.filter.key());
        }
        assert_eq!(
            CategoryFilter::Only(Category::GovernmentSchemes).key(),
            Category::GovernmentSchemes.key()
        );
    }

    #[test]
    fn test_get_by_id() {
        let engine = builtin();
        assert_eq!(engine.get(3).map(|e| e.category), Some(Category::PestManagement));
        assert!(engine.get(999).is_none());
    }
}
