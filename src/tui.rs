use std::io;
use std::time::Duration;

use ratatui::crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::layout::{Position, Rect};
use ratatui::prelude::CrosstermBackend;
use ratatui::Terminal;
use tracing::warn;

use quizpaginate::dom::Document;
use quizpaginate::host::Host;
use quizpaginate::model::Quiz;
use quizpaginate::page::AttemptPage;
use quizpaginate::{Direction, PaginateError, SharedController};

use crate::state::{ActivePanel, PreviewState};
use crate::ui;

pub fn run_tui(
    quiz: Quiz,
    page: AttemptPage,
    controller: SharedController<Document>,
) -> Result<(), PaginateError> {
    let mut state = PreviewState::new(quiz, page, controller);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = main_loop(&mut terminal, &mut state);

    // Restore terminal
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture).ok();

    // Keep whatever was answered on the last page
    if let Err(e) = state.page.document.autosave() {
        warn!(error = %e, "final save failed");
    }

    result
}

fn main_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut PreviewState,
) -> Result<(), PaginateError> {
    loop {
        terminal.draw(|f| ui::draw(f, state))?;

        if state.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(key, state),
                Event::Mouse(mouse) => {
                    let size = terminal.size()?;
                    handle_mouse(mouse, state, Rect::new(0, 0, size.width, size.height));
                }
                _ => {}
            }
        }
    }

    Ok(())
}

fn handle_key(key: KeyEvent, state: &mut PreviewState) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('q') if ctrl => state.should_quit = true,
        KeyCode::Esc => state.should_quit = true,
        KeyCode::Left | KeyCode::PageUp => {
            state.press(Direction::Previous);
        }
        KeyCode::Right | KeyCode::PageDown => {
            state.press(Direction::Next);
        }
        KeyCode::Tab => {
            state.active_panel = match state.active_panel {
                ActivePanel::Main => ActivePanel::Sidebar,
                ActivePanel::Sidebar => ActivePanel::Main,
            };
        }
        _ => match state.active_panel {
            ActivePanel::Sidebar => handle_sidebar_key(key, state),
            ActivePanel::Main => handle_main_key(key, state),
        },
    }
}

fn handle_sidebar_key(key: KeyEvent, state: &mut PreviewState) {
    let total = state.quiz.questions.len();
    match key.code {
        KeyCode::Up => state.nav_cursor = state.nav_cursor.saturating_sub(1),
        KeyCode::Down => {
            if state.nav_cursor + 1 < total {
                state.nav_cursor += 1;
            }
        }
        KeyCode::Enter => state.open_nav(state.nav_cursor),
        _ => {}
    }
}

fn handle_main_key(key: KeyEvent, state: &mut PreviewState) {
    match key.code {
        KeyCode::Down | KeyCode::Enter => state.focus_next(),
        KeyCode::Up => {
            let count = state.visible_questions().len();
            if count > 0 {
                state.focus = (state.focus + count - 1) % count;
            }
        }
        KeyCode::Char(c) if c.is_ascii_lowercase() => {
            state.toggle_choice((c as u8 - b'a') as usize);
        }
        _ => {}
    }
}

fn handle_mouse(mouse: MouseEvent, state: &mut PreviewState, area: Rect) {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return;
    }
    let layout = ui::layout::for_state(state, area);
    let pos = Position::new(mouse.column, mouse.row);

    if layout.sidebar.contains(pos) {
        state.active_panel = ActivePanel::Sidebar;
        // first row is the block title
        let row = mouse.row.saturating_sub(layout.sidebar.y + 1) as usize;
        if mouse.row > layout.sidebar.y {
            let index = ui::sidebar::scroll_offset(state, layout.sidebar) + row;
            if index < state.quiz.questions.len() {
                state.open_nav(index);
            }
        }
    } else if layout.buttonbar.contains(pos) {
        let hit = ui::questions::button_hits(state, layout.buttonbar)
            .into_iter()
            .find(|(rect, _)| rect.contains(pos));
        if let Some((_, button)) = hit {
            state.click(button);
        }
    } else if layout.main.contains(pos) {
        state.active_panel = ActivePanel::Main;
    }
}
