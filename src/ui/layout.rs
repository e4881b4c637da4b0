use ratatui::layout::{Constraint, Layout, Rect};

use crate::state::PreviewState;

const NAV_MIN_WIDTH: u16 = 18;
const NAV_MAX_WIDTH: u16 = 36;
/// Room for " ▸ ✓ 12. " plus the right border.
const NAV_ROW_CHROME: u16 = 10;
const QUESTIONS_MIN_WIDTH: u16 = 20;

/// Screen regions of the attempt preview.
pub struct PreviewLayout {
    pub titlebar: Rect,
    pub sidebar: Rect,
    pub main: Rect,
    pub buttonbar: Rect,
    pub keybar: Rect,
}

/// Navigation column width: fits the longest question title within bounds,
/// never squeezing the questions below their minimum.
pub fn nav_width(longest_title: usize, total_width: u16) -> u16 {
    let wanted = u16::try_from(longest_title)
        .unwrap_or(u16::MAX)
        .saturating_add(NAV_ROW_CHROME)
        .clamp(NAV_MIN_WIDTH, NAV_MAX_WIDTH);
    wanted.min(total_width.saturating_sub(QUESTIONS_MIN_WIDTH))
}

pub fn compute_layout(area: Rect, nav_width: u16) -> PreviewLayout {
    let [titlebar, middle, buttonbar, keybar] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(5),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);
    let [sidebar, main] = Layout::horizontal([
        Constraint::Length(nav_width),
        Constraint::Min(QUESTIONS_MIN_WIDTH),
    ])
    .areas(middle);

    PreviewLayout {
        titlebar,
        sidebar,
        main,
        buttonbar,
        keybar,
    }
}

/// Layout for the quiz currently previewed.
pub fn for_state(state: &PreviewState, area: Rect) -> PreviewLayout {
    let longest = state
        .quiz
        .questions
        .iter()
        .map(|q| q.title.chars().count())
        .max()
        .unwrap_or(0);
    compute_layout(area, nav_width(longest, area.width))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nav_width_follows_titles_within_bounds() {
        assert_eq!(nav_width(3, 120), NAV_MIN_WIDTH);
        assert_eq!(nav_width(20, 120), 30);
        assert_eq!(nav_width(500, 120), NAV_MAX_WIDTH);
        assert_eq!(nav_width(usize::MAX, 120), NAV_MAX_WIDTH);
    }

    #[test]
    fn narrow_terminals_keep_room_for_questions() {
        assert_eq!(nav_width(30, 40), 20);
        assert_eq!(nav_width(30, 10), 0);

        let layout = compute_layout(Rect::new(0, 0, 80, 24), nav_width(20, 80));
        assert_eq!(layout.sidebar.width, 30);
        assert_eq!(layout.main.width, 50);
        assert_eq!(layout.titlebar.height, 1);
        assert_eq!(layout.keybar.y, 23);
        assert_eq!(layout.buttonbar.y, 22);
    }
}
