use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use quizpaginate::controller::SECONDARY_CLASS;
use quizpaginate::dom::NodeId;
use quizpaginate::host::Host;
use quizpaginate::model::QuestionKind;

use crate::state::{ActivePanel, PreviewState};

const BUTTON_GAP: u16 = 2;

pub fn draw_questions(f: &mut Frame, area: Rect, state: &PreviewState) {
    let mut lines: Vec<Line> = Vec::new();
    let focused = state.focused_question();

    for (pos, index) in state.visible_questions().into_iter().enumerate() {
        let Some(question) = state.question(index) else {
            continue;
        };
        if pos > 0 {
            lines.push(Line::from(""));
        }
        let is_focused = focused == Some(index) && state.active_panel == ActivePanel::Main;
        let marker = if is_focused { "▌" } else { " " };
        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(Color::Cyan)),
            Span::styled(
                format!("Question {}: {}", question.number, question.title),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]));
        for body in &question.body_lines {
            lines.push(Line::from(format!("  {}", body)));
        }

        match &question.kind {
            QuestionKind::SingleChoice(choices) | QuestionKind::MultiChoice(choices) => {
                let multi = matches!(question.kind, QuestionKind::MultiChoice(_));
                for (ci, choice) in choices.iter().enumerate() {
                    let checked = state.is_checked(index, ci);
                    let mark = match (multi, checked) {
                        (true, true) => "[x]",
                        (true, false) => "[ ]",
                        (false, true) => "(•)",
                        (false, false) => "( )",
                    };
                    let style = if checked {
                        Style::default().fg(Color::Green)
                    } else {
                        Style::default()
                    };
                    lines.push(Line::from(Span::styled(
                        format!("  {} {}. {}", mark, choice.label, choice.text),
                        style,
                    )));
                }
            }
            QuestionKind::Short | QuestionKind::Long => {
                lines.push(Line::from(Span::styled(
                    "  (text answer, not editable in the preview)",
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
    }

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::NONE))
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

/// Screen area of each button in the submit row, left to right.
pub fn button_hits(state: &PreviewState, area: Rect) -> Vec<(Rect, NodeId)> {
    let doc = &state.page.document;
    let mut x = area.x + 1;
    let mut hits = Vec::new();
    for button in state.page.buttons() {
        if doc.is_hidden(button) {
            continue;
        }
        let label = doc.attribute(&button, "value").unwrap_or_default();
        let width = label.chars().count() as u16 + 4;
        if x + width > area.x + area.width {
            break;
        }
        hits.push((Rect::new(x, area.y, width, 1), button));
        x += width + BUTTON_GAP;
    }
    hits
}

pub fn draw_buttonbar(f: &mut Frame, area: Rect, state: &PreviewState) {
    let doc = &state.page.document;
    let mut spans: Vec<Span> = vec![Span::raw(" ")];
    for (i, (_, button)) in button_hits(state, area).into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" ".repeat(BUTTON_GAP as usize)));
        }
        let label = doc.attribute(&button, "value").unwrap_or_default();
        let style = if doc.has_class(&button, SECONDARY_CLASS) {
            Style::default().fg(Color::White).bg(Color::Rgb(60, 60, 60))
        } else {
            Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD)
        };
        spans.push(Span::styled(format!("[ {} ]", label), style));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
