use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::{App, FocusPane};
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize => {}
        AppEvent::Tick => app.tick_animation(),
        AppEvent::Transcript => app.scroll_chat_to_bottom(),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any pane
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => {
                app.should_quit = true;
                return;
            }
            KeyCode::Char('l') => {
                app.toggle_language();
                return;
            }
            // Other control chords are not text
            KeyCode::Char(_) => return,
            _ => {}
        }
    }

    match app.focus {
        FocusPane::Suggestions => handle_suggestions(app, key),
        FocusPane::Input => handle_input(app, key),
    }
}

fn handle_suggestions(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        KeyCode::Char('j') | KeyCode::Down => app.suggestion_nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.suggestion_nav_up(),
        KeyCode::Enter => app.submit_selected_suggestion(),

        KeyCode::Char('c') => app.cycle_category(),
        KeyCode::Char('L') => app.toggle_language(),

        // Chat scrolling
        KeyCode::PageDown => app.scroll_chat_down(app.chat_height / 2),
        KeyCode::PageUp => app.scroll_chat_up(app.chat_height / 2),
        KeyCode::Char('G') => app.scroll_chat_to_bottom(),
        KeyCode::Char('g') => app.chat_scroll = 0,

        KeyCode::Tab | KeyCode::Char('i') | KeyCode::Char('/') => {
            app.focus = FocusPane::Input;
            app.query_cursor = app.query_input.chars().count();
        }

        _ => {}
    }
}

fn handle_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Tab => {
            app.focus = FocusPane::Suggestions;
        }
        KeyCode::Enter => app.submit_input(),
        KeyCode::Backspace => {
            if app.query_cursor > 0 {
                app.query_cursor -= 1;
                let byte_pos = char_to_byte_index(&app.query_input, app.query_cursor);
                app.query_input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let char_count = app.query_input.chars().count();
            if app.query_cursor < char_count {
                let byte_pos = char_to_byte_index(&app.query_input, app.query_cursor);
                app.query_input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.query_cursor = app.query_cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.query_input.chars().count();
            app.query_cursor = (app.query_cursor + 1).min(char_count);
        }
        KeyCode::Home => app.query_cursor = 0,
        KeyCode::End => app.query_cursor = app.query_input.chars().count(),
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(&app.query_input, app.query_cursor);
            app.query_input.insert(byte_pos, c);
            app.query_cursor += 1;
        }
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollDown => app.scroll_chat_down(3),
        MouseEventKind::ScrollUp => app.scroll_chat_up(3),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use krishi_core::Config;

    fn press(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> AppEvent {
        AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn test_app() -> App {
        let config = Config {
            language: Some("english".to_string()),
            reply_delay_ms: Some(50),
            corpus_path: None,
        };
        let mut app = App::new(&config).unwrap();
        app.config_path = None;
        app
    }

    #[test]
    fn test_char_to_byte_index_devanagari() {
        let s = "गेहूं";
        assert_eq!(char_to_byte_index(s, 0), 0);
        assert_eq!(char_to_byte_index(s, 1), "ग".len());
        assert_eq!(char_to_byte_index(s, 99), s.len());
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_and_editing_input() {
        let mut app = test_app();
        for c in "whet".chars() {
            handle_event(&mut app, press(KeyCode::Char(c)));
        }
        handle_event(&mut app, press(KeyCode::Left));
        handle_event(&mut app, press(KeyCode::Char('a')));
        assert_eq!(app.query_input, "wheat");

        handle_event(&mut app, press(KeyCode::Enter));
        assert!(app.query_input.is_empty());
        assert_eq!(app.conversation.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_enter_adds_nothing() {
        let mut app = test_app();
        handle_event(&mut app, press(KeyCode::Char(' ')));
        handle_event(&mut app, press(KeyCode::Enter));
        assert_eq!(app.conversation.len(), 1);
        assert!(!app.awaiting_reply());
    }

    #[tokio::test(start_paused = true)]
    async fn test_q_only_quits_outside_input() {
        let mut app = test_app();
        handle_event(&mut app, press(KeyCode::Char('q')));
        assert!(!app.should_quit);
        assert_eq!(app.query_input, "q");

        handle_event(&mut app, press(KeyCode::Esc));
        handle_event(&mut app, press(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[tokio::test(start_paused = true)]
    async fn test_control_chords_do_not_insert_text() {
        let mut app = test_app();
        handle_event(&mut app, press(KeyCode::Char('w')));
        handle_event(&mut app, ctrl('a'));
        handle_event(&mut app, ctrl('e'));
        assert_eq!(app.query_input, "w");
        assert_eq!(app.query_cursor, 1);

        handle_event(&mut app, press(KeyCode::Esc));
        handle_event(&mut app, ctrl('j'));
        assert_eq!(app.suggestion_state.selected(), Some(0));
        assert!(!app.should_quit);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ctrl_l_toggles_language_from_input() {
        let mut app = test_app();
        handle_event(&mut app, ctrl('l'));
        assert!(app.query_input.is_empty());
        assert_eq!(app.resolver.current(), krishi_core::Language::Hindi);
    }
}
