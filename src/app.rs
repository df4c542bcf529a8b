use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use ratatui::widgets::ListState;

use krishi_core::{
    CategoryFilter, Config, Conversation, ConversationState, Corpus, FaqEngine, FaqEntry,
    Resolver,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Suggestions,
    Input,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub focus: FocusPane,
    pub resolver: Resolver,

    // Suggested questions
    pub category_filter: CategoryFilter,
    pub suggestion_state: ListState,

    // Chat state
    pub query_input: String,
    pub query_cursor: usize, // cursor position in query_input, in chars
    pub chat_scroll: u16,
    pub chat_height: u16, // inner height of the chat area, set during render
    pub chat_width: u16,  // inner width of the chat area, set during render

    // Typing indicator frame, 0-2
    pub animation_frame: u8,

    // Data
    pub engine: Arc<FaqEngine>,
    pub conversation: Conversation,

    // Where the language choice is persisted; None disables persistence
    pub config_path: Option<PathBuf>,
}

impl App {
    /// Build the session. Must run inside the tokio runtime.
    pub fn new(config: &Config) -> Result<Self> {
        let corpus = match &config.corpus_path {
            Some(path) => Corpus::load(path)?,
            None => Corpus::builtin()?,
        };
        let engine = Arc::new(FaqEngine::new(corpus));

        let resolver = Resolver::new(config.language());
        let conversation = Conversation::new(Arc::clone(&engine), &resolver, config.reply_delay());

        let mut suggestion_state = ListState::default();
        suggestion_state.select(Some(0));

        Ok(Self {
            should_quit: false,
            focus: FocusPane::Input,
            resolver,

            category_filter: CategoryFilter::All,
            suggestion_state,

            query_input: String::new(),
            query_cursor: 0,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,

            animation_frame: 0,

            engine,
            conversation,

            config_path: Config::config_path().ok(),
        })
    }

    pub fn suggestions(&self) -> Vec<&FaqEntry> {
        self.engine.suggested_questions(self.category_filter)
    }

    pub fn awaiting_reply(&self) -> bool {
        self.conversation.state() == ConversationState::AwaitingReply
    }

    // Suggestion list navigation
    pub fn suggestion_nav_down(&mut self) {
        let len = self.suggestions().len();
        if len > 0 {
            let i = self.suggestion_state.selected().unwrap_or(0);
            self.suggestion_state.select(Some((i + 1).min(len - 1)));
        }
    }

    pub fn suggestion_nav_up(&mut self) {
        let i = self.suggestion_state.selected().unwrap_or(0);
        self.suggestion_state.select(Some(i.saturating_sub(1)));
    }

    /// Move to the next entry of the category dropdown, wrapping around
    pub fn cycle_category(&mut self) {
        let options = self.engine.list_categories(&self.resolver);
        let current_key = self.category_filter.key();
        let current = options
            .iter()
            .position(|o| o.key == current_key)
            .unwrap_or(0);
        if let Some(next) = options.get((current + 1) % options.len().max(1)) {
            self.category_filter = next.filter;
        }

        let has_items = !self.suggestions().is_empty();
        self.suggestion_state.select(has_items.then_some(0));
    }

    pub fn category_label(&self) -> String {
        self.engine
            .list_categories(&self.resolver)
            .into_iter()
            .find(|o| o.key == self.category_filter.key())
            .map(|o| o.label)
            .unwrap_or_default()
    }

    pub fn toggle_language(&mut self) {
        self.resolver.toggle();
        tracing::info!(language = self.resolver.current().as_str(), "language switched");
        if let Some(path) = &self.config_path {
            if let Err(e) = Config::save_language_to(path, self.resolver.current()) {
                tracing::warn!(error = %e, "could not persist language");
            }
        }
    }

    pub fn submit_input(&mut self) {
        let text = std::mem::take(&mut self.query_input);
        self.query_cursor = 0;
        if self.conversation.submit_user_text(&text, &self.resolver) {
            self.scroll_chat_to_bottom();
        }
    }

    pub fn submit_selected_suggestion(&mut self) {
        let selected = self
            .suggestion_state
            .selected()
            .and_then(|i| self.suggestions().get(i).map(|e| (*e).clone()));

        if let Some(entry) = selected {
            self.conversation.submit_suggested(&entry, &self.resolver);
            self.scroll_chat_to_bottom();
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.awaiting_reply() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    /// Scroll chat so the newest message (or the typing indicator) is visible
    pub fn scroll_chat_to_bottom(&mut self) {
        // Use actual chat width for wrap calculation, default to 50 if not set
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: usize = 0;

        for msg in self.conversation.transcript() {
            total_lines = total_lines.saturating_add(1); // Role line
            for line in msg.content.lines() {
                // Character count, not byte length: most content is Devanagari
                let char_count = line.chars().count();
                total_lines = total_lines.saturating_add(char_count / wrap_width + 1);
            }
            total_lines = total_lines.saturating_add(1); // Blank line after message
        }

        if self.awaiting_reply() {
            total_lines = total_lines.saturating_add(2);
        }

        // Paragraph scroll is u16; very long sessions pin to the end of that range
        let total_lines = u16::try_from(total_lines).unwrap_or(u16::MAX);

        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };

        self.chat_scroll = total_lines.saturating_sub(visible_height);
    }

    pub fn scroll_chat_down(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_add(lines);
    }

    pub fn scroll_chat_up(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use krishi_core::{Category, Language};

    fn english_config() -> Config {
        Config {
            language: Some("english".to_string()),
            reply_delay_ms: Some(100),
            corpus_path: None,
        }
    }

    fn test_app(config: &Config) -> App {
        let mut app = App::new(config).unwrap();
        app.config_path = None;
        app
    }

    #[tokio::test(start_paused = true)]
    async fn test_cycle_category_wraps() {
        let mut app = test_app(&english_config());
        assert_eq!(app.category_filter, CategoryFilter::All);

        app.cycle_category();
        assert_eq!(app.category_filter, CategoryFilter::Only(Category::CropCultivation));
        assert!(app.suggestions().iter().all(|e| e.category == Category::CropCultivation));

        app.cycle_category();
        app.cycle_category();
        app.cycle_category();
        assert_eq!(app.category_filter, CategoryFilter::All);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_input_clears_box() {
        let mut app = test_app(&english_config());
        app.query_input = "wheat".to_string();
        app.query_cursor = 5;

        app.submit_input();

        assert!(app.query_input.is_empty());
        assert_eq!(app.query_cursor, 0);
        assert!(app.awaiting_reply());
        app.conversation.settled().await;
        assert_eq!(app.conversation.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_selected_suggestion() {
        let mut app = test_app(&english_config());
        app.suggestion_nav_down();

        app.submit_selected_suggestion();
        app.conversation.settled().await;

        let transcript = app.conversation.transcript();
        let second = app.engine.get(2).unwrap();
        assert_eq!(transcript[1].content, second.question.english);
        assert_eq!(transcript[2].content, second.answer.english);
        assert_eq!(app.resolver.current(), Language::English);
    }

    #[tokio::test(start_paused = true)]
    async fn test_long_transcript_scroll_saturates() {
        let config = Config {
            reply_delay_ms: Some(1),
            ..english_config()
        };
        let mut app = test_app(&config);

        // Each exchange is at least six lines, well past u16::MAX in total
        for _ in 0..12_000 {
            assert!(app.conversation.submit_user_text("wheat", &app.resolver));
        }
        app.conversation.settled().await;
        assert_eq!(app.conversation.len(), 1 + 2 * 12_000);

        app.scroll_chat_to_bottom();
        assert_eq!(app.chat_scroll, u16::MAX - 20);
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_language_persists_to_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut app = test_app(&english_config());
        app.config_path = Some(path.clone());

        app.toggle_language();
        assert_eq!(app.resolver.current(), Language::Hindi);
        assert_eq!(Config::load_from(&path).unwrap().language(), Language::Hindi);

        app.toggle_language();
        assert_eq!(app.resolver.current(), Language::English);
        assert_eq!(Config::load_from(&path).unwrap().language(), Language::English);
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_language_without_config_path() {
        let mut app = test_app(&english_config());

        app.toggle_language();
        assert_eq!(app.resolver.current(), Language::Hindi);
    }
}
