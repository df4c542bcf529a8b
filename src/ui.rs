use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

use krishi_core::ChatRole;
use unicode_width::UnicodeWidthChar;

use crate::app::{App, FocusPane};

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    let [suggestions_area, chat_column] = Layout::horizontal([
        Constraint::Percentage(35),
        Constraint::Percentage(65),
    ])
    .areas(body_area);

    render_header(app, frame, header_area);
    render_suggestions(app, frame, suggestions_area);
    render_chat(app, frame, chat_column);
    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let r = &app.resolver;

    let title = Line::from(vec![
        Span::styled(
            format!(" {} ", r.pick("कृषि सहयोग", "KrishiSahyog")),
            Style::default().fg(Color::Green).bold(),
        ),
        Span::styled(
            r.pick("किसानों का साथी", "Farmer's Companion"),
            Style::default().fg(Color::White),
        ),
        Span::raw("  "),
        Span::styled(
            format!("[{}]", app.resolver.current().toggle_label()),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_suggestions(app: &mut App, frame: &mut Frame, area: Rect) {
    let r = app.resolver;
    let focused = app.focus == FocusPane::Suggestions;
    let border_color = if focused { Color::Cyan } else { Color::DarkGray };

    let [category_area, list_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
    ])
    .areas(area);

    let category_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {} (c) ", r.pick("श्रेणी चुनें", "Select Category")));
    let category = Paragraph::new(app.category_label())
        .style(Style::default().fg(Color::Green))
        .block(category_block);
    frame.render_widget(category, category_area);

    let items: Vec<ListItem> = app
        .suggestions()
        .iter()
        .map(|entry| ListItem::new(Text::from(r.resolve(&entry.question).to_string())))
        .collect();

    let list_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {} ", r.pick("त्वरित प्रश्न", "Quick Questions")));

    let list = List::new(items)
        .block(list_block)
        .highlight_style(
            Style::default()
                .bg(Color::Green)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, list_area, &mut app.suggestion_state);
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    let r = app.resolver;

    let [chat_area, input_area, note_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    // Inner size minus borders, for scroll calculations
    app.chat_height = chat_area.height.saturating_sub(2);
    app.chat_width = chat_area.width.saturating_sub(2);

    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(format!(" {} ", r.pick("AI सहायक", "AI Assistant")));

    let mut lines: Vec<Line> = Vec::new();
    for msg in app.conversation.transcript() {
        let role_style = match msg.role {
            ChatRole::User => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ChatRole::Assistant => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        };
        lines.push(Line::from(Span::styled(format!("{}:", msg.role.label(&r)), role_style)));
        for line in msg.content.lines() {
            lines.push(Line::from(line.to_string()));
        }
        lines.push(Line::default());
    }

    if app.awaiting_reply() {
        lines.push(Line::from(Span::styled(
            format!("{}:", ChatRole::Assistant.label(&r)),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )));
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("{}{}", r.pick("लिख रहा है", "Typing"), dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    let chat = Paragraph::new(Text::from(lines))
        .block(chat_block)
        .wrap(Wrap { trim: true })
        .scroll((app.chat_scroll, 0));
    frame.render_widget(chat, chat_area);

    let input_focused = app.focus == FocusPane::Input;
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if input_focused { Color::Yellow } else { Color::DarkGray }))
        .title(format!(" {} ", r.pick("अपना प्रश्न यहां लिखें...", "Type your question here...")));

    // Horizontal scrolling keeps the cursor visible
    let inner_width = input_area.width.saturating_sub(2) as usize;
    let cursor_pos = app.query_cursor;
    let scroll_offset = input_scroll_offset(&app.query_input, cursor_pos, inner_width);

    let mut used = 0;
    let visible_text: String = app
        .query_input
        .chars()
        .skip(scroll_offset)
        .take_while(|c| {
            used += c.width().unwrap_or(0);
            used <= inner_width
        })
        .collect();

    let input = Paragraph::new(visible_text)
        .style(Style::default().fg(Color::Cyan))
        .block(input_block);
    frame.render_widget(input, input_area);

    if input_focused {
        let cursor_x = cursor_column(&app.query_input, scroll_offset, cursor_pos);
        frame.set_cursor_position((input_area.x + cursor_x + 1, input_area.y + 1));
    }

    let note = Paragraph::new(r.pick(
        "यह एक सामान्य FAQ सिस्टम है। अधिक जानकारी के लिए कृषि विशेषज्ञ से संपर्क करें।",
        "This is a basic FAQ system. Contact agricultural experts for detailed information.",
    ))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(note, note_area);
}

/// First visible char of the input box, chosen so the cursor cell stays on screen.
/// Works in terminal columns, where most Devanagari vowel signs take none.
fn input_scroll_offset(input: &str, cursor: usize, inner_width: usize) -> usize {
    let widths: Vec<usize> = input
        .chars()
        .take(cursor)
        .map(|c| c.width().unwrap_or(0))
        .collect();

    let mut offset = widths.len();
    let mut used = 1; // cursor cell
    while offset > 0 && used + widths[offset - 1] <= inner_width {
        offset -= 1;
        used += widths[offset];
    }
    offset
}

/// Column of the cursor relative to the first visible char
fn cursor_column(input: &str, scroll_offset: usize, cursor: usize) -> u16 {
    let width: usize = input
        .chars()
        .skip(scroll_offset)
        .take(cursor.saturating_sub(scroll_offset))
        .map(|c| c.width().unwrap_or(0))
        .sum();
    u16::try_from(width).unwrap_or(u16::MAX)
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let r = &app.resolver;

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let hints = match app.focus {
        FocusPane::Suggestions => vec![
            Span::styled(" j/k ", key_style),
            Span::styled(format!(" {} ", r.pick("चुनें", "nav")), label_style),
            Span::styled(" Enter ", key_style),
            Span::styled(format!(" {} ", r.pick("पूछें", "ask")), label_style),
            Span::styled(" c ", key_style),
            Span::styled(format!(" {} ", r.pick("श्रेणी", "category")), label_style),
            Span::styled(" L ", key_style),
            Span::styled(format!(" {} ", r.current().toggle_label()), label_style),
            Span::styled(" Tab ", key_style),
            Span::styled(format!(" {} ", r.pick("लिखें", "type")), label_style),
            Span::styled(" q ", key_style),
            Span::styled(format!(" {} ", r.pick("बाहर", "quit")), label_style),
        ],
        FocusPane::Input => vec![
            Span::styled(" Enter ", key_style),
            Span::styled(format!(" {} ", r.pick("भेजें", "send")), label_style),
            Span::styled(" Tab/Esc ", key_style),
            Span::styled(format!(" {} ", r.pick("प्रश्न सूची", "questions")), label_style),
            Span::styled(" Ctrl-L ", key_style),
            Span::styled(format!(" {} ", r.current().toggle_label()), label_style),
            Span::styled(" Ctrl-C ", key_style),
            Span::styled(format!(" {} ", r.pick("बाहर", "quit")), label_style),
        ],
    };

    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}
