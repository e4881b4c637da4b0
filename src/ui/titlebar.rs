use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::state::PreviewState;

pub fn draw_titlebar(f: &mut Frame, area: Rect, state: &PreviewState) {
    let title_text = format!("[ {} ]", state.quiz.title);
    let window_text = format!(" {} ", state.window_label());

    let available = area.width as usize;
    let title_len = title_text.chars().count();
    let window_len = window_text.chars().count();
    let center_pad = available.saturating_sub(title_len) / 2;
    // Right padding fills the gap between centered title and right-aligned window label
    let right_pad = available.saturating_sub(center_pad + title_len + window_len);

    let line = Line::from(vec![
        Span::raw(" ".repeat(center_pad)),
        Span::styled(
            title_text,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" ".repeat(right_pad)),
        Span::styled(window_text, Style::default().fg(Color::Rgb(200, 200, 120))),
    ]);

    let widget = Paragraph::new(line)
        .style(Style::default().bg(Color::DarkGray))
        .alignment(Alignment::Left);
    f.render_widget(widget, area);
}
