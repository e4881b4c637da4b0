use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::state::{ActivePanel, PreviewState};

/// First question row shown, keeping the cursor on screen.
pub fn scroll_offset(state: &PreviewState, area: Rect) -> usize {
    let rows = area.height.saturating_sub(1) as usize; // title row
    if rows == 0 {
        return 0;
    }
    (state.nav_cursor + 1).saturating_sub(rows)
}

pub fn draw_sidebar(f: &mut Frame, area: Rect, state: &PreviewState) {
    let rows = area.height.saturating_sub(1) as usize;
    let offset = scroll_offset(state, area);
    let visible = state.visible_questions();
    let title_max_len = area.width.saturating_sub(11) as usize;

    let mut lines: Vec<Line> = Vec::new();
    for (i, q) in state.quiz.questions.iter().enumerate().skip(offset).take(rows) {
        let in_window = visible.contains(&i);
        let is_cursor = i == state.nav_cursor && state.active_panel == ActivePanel::Sidebar;
        let (icon, color) = if state.is_answered(i) {
            ("✓", Color::Green)
        } else {
            ("○", Color::White)
        };

        let mut style = Style::default();
        if in_window {
            style = style.fg(Color::Cyan).add_modifier(Modifier::BOLD);
        }
        if is_cursor {
            style = style.bg(Color::DarkGray);
        }

        let title: String = q.title.chars().take(title_max_len).collect();
        lines.push(Line::from(vec![
            Span::styled(if is_cursor { " ▸ " } else { "   " }, style),
            Span::styled(format!("{} ", icon), Style::default().fg(color)),
            Span::styled(format!("{:>2}. ", q.number), style),
            Span::styled(title, style),
        ]));
    }

    let border_style = if state.active_panel == ActivePanel::Sidebar {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::RIGHT)
        .title(" Quiz navigation ")
        .title_style(Style::default().add_modifier(Modifier::BOLD))
        .border_style(border_style);

    f.render_widget(Paragraph::new(lines).block(block), area);
}
