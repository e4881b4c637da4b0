use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::state::{ActivePanel, PreviewState};

pub fn draw_keybar(f: &mut Frame, area: Rect, state: &PreviewState) {
    let bindings: Vec<(&str, &str)> = match state.active_panel {
        ActivePanel::Main => vec![
            ("←/→", "prev/next page"),
            ("↑/↓", "question"),
            ("a-z", "answer"),
            ("Tab", "navigation"),
            ("Ctrl+Q", "quit"),
        ],
        ActivePanel::Sidebar => vec![
            ("↑/↓", "select"),
            ("Enter", "go to question"),
            ("←/→", "prev/next page"),
            ("Tab", "questions"),
            ("Ctrl+Q", "quit"),
        ],
    };

    let mut spans: Vec<Span> = vec![Span::raw(" ")];
    for (i, (key, action)) in bindings.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("   "));
        }
        spans.push(Span::styled(
            key.to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!(" {}", action)));
    }

    let line = Line::from(spans);
    let widget = Paragraph::new(line).style(Style::default().bg(Color::Rgb(20, 20, 20)));
    f.render_widget(widget, area);
}
