pub mod keybar;
pub mod layout;
pub mod questions;
pub mod sidebar;
pub mod titlebar;

use ratatui::Frame;

use crate::state::PreviewState;

pub fn draw(f: &mut Frame, state: &PreviewState) {
    let layout = layout::for_state(state, f.area());

    titlebar::draw_titlebar(f, layout.titlebar, state);
    sidebar::draw_sidebar(f, layout.sidebar, state);
    questions::draw_questions(f, layout.main, state);
    questions::draw_buttonbar(f, layout.buttonbar, state);
    keybar::draw_keybar(f, layout.keybar, state);
}
