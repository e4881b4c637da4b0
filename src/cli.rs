use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "quizpaginate", version, about = "Page through a one-page quiz attempt")]
pub struct Cli {
    /// Markdown quiz file
    pub quiz: PathBuf,

    /// Questions shown at a time [default: frontmatter, then config, then 1]
    #[arg(long, value_name = "n")]
    pub per_page: Option<String>,

    /// Page address to open, e.g. "attempt.php?attempt=1#question-1-4"
    #[arg(long)]
    pub url: Option<String>,

    /// Config file [default: <config dir>/quizpaginate/config.yaml]
    #[arg(long, value_name = "path")]
    pub config: Option<PathBuf>,

    /// Clear saved answers and start fresh
    #[arg(long)]
    pub clear: bool,

    /// Print the opening window without entering the TUI
    #[arg(long)]
    pub status: bool,
}
