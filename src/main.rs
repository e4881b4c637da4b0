mod cli;
mod state;
mod tui;
mod ui;

use std::fs;
use std::path::Path;
use std::sync::Mutex;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use quizpaginate::config::{self, Config};
use quizpaginate::page::{self, AttemptPage};
use quizpaginate::{parser, persist, PaginateError};

use crate::cli::Cli;

const LOG_FILE: &str = "quizpaginate.log";
const LOG_ENV: &str = "QUIZPAGINATE_LOG";

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), PaginateError> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let state_root = config.state_dir();
    init_logging(&state_root)?;

    // Read and parse quiz
    let quiz_hash = persist::compute_file_hash(&cli.quiz)?;
    let content = fs::read_to_string(&cli.quiz)?;
    let quiz_filename = cli
        .quiz
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    let quiz = parser::parse_quiz(&content, &quiz_filename, &quiz_hash)?;

    let state_dir = persist::state_dir_for(&state_root, &cli.quiz);
    if cli.clear {
        persist::clear_answers(&state_dir)?;
        eprintln!("Saved answers cleared.");
    }

    let mut page = AttemptPage::build(&quiz, cli.url.as_deref());
    page.document.set_strings(config.strings()?);

    match persist::load_answers(&state_dir, &quiz_hash) {
        Ok(saved) => {
            let restored = page.restore_inputs(&saved);
            tracing::info!(restored, "restored saved answers");
        }
        Err(e) => eprintln!("Warning: {}", e),
    }

    let autosave_dir = state_dir.clone();
    let autosave_file = quiz.quiz_file.clone();
    let autosave_hash = quiz.quiz_hash.clone();
    page.document.set_autosave_hook(move |doc| {
        persist::save_answers(
            &autosave_dir,
            &autosave_file,
            &autosave_hash,
            &page::saved_inputs(doc),
        )
        .map_err(|e| e.to_string())
    });

    let setting = match &cli.per_page {
        Some(n) => n.clone(),
        None => config::questions_per_page_setting(
            quiz.frontmatter
                .questions_per_page
                .as_ref()
                .or(config.questions_per_page.as_ref()),
        ),
    };
    let controller = quizpaginate::init(&mut page.document, setting.as_str())?;
    page.document.resolve_pending_strings();

    if cli.status {
        print_status(&quiz, &page, controller.borrow().first_visible());
        return Ok(());
    }

    tui::run_tui(quiz, page, controller)
}

fn init_logging(state_root: &Path) -> Result<(), PaginateError> {
    fs::create_dir_all(state_root)?;
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(state_root.join(LOG_FILE))?;
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("quizpaginate=info"));
    // A second init (tests, repeated runs in one process) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

fn print_status(quiz: &quizpaginate::model::Quiz, page: &AttemptPage, first: usize) {
    let visible = page.visible_questions();
    println!("Quiz: {}", quiz.title);
    println!("Questions: {}", quiz.questions.len());
    println!("Page: {}", page.document.url());
    println!("First visible: {}", first);
    for i in visible {
        let q = &quiz.questions[i];
        println!("  {:>2}. {}", q.number, q.title);
    }
}
