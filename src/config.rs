use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;

use crate::error::Result;
use crate::lang::StringTable;
use crate::window::QuestionsPerPage;

pub const CONFIG_FILE: &str = "config.yaml";

/// Settings read from `config.yaml`.
///
/// ```yaml
/// questions_per_page: 3
/// language: /path/to/de.yaml
/// state_dir: /tmp/quizpaginate
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Left as written; validated when pagination starts.
    pub questions_per_page: Option<serde_yaml::Value>,
    pub language: Option<PathBuf>,
    pub state_dir: Option<PathBuf>,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "quizpaginate")
}

pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|d| d.config_dir().join(CONFIG_FILE))
}

impl Config {
    /// Read `path`, or the default location when `path` is None. A missing
    /// default file is not an error; a missing explicit one is.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match default_config_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };
        if !explicit && !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    pub fn state_dir(&self) -> PathBuf {
        self.state_dir
            .clone()
            .or_else(|| project_dirs().map(|d| d.data_local_dir().to_path_buf()))
            .unwrap_or_else(|| PathBuf::from(".quizpaginate"))
    }

    pub fn strings(&self) -> Result<StringTable> {
        match &self.language {
            Some(path) => StringTable::load_overrides(path),
            None => Ok(StringTable::english()),
        }
    }
}

/// The raw page-size setting handed to `controller::init`. Unset means one
/// question per page; anything else is passed through for init to validate.
pub fn questions_per_page_setting(value: Option<&serde_yaml::Value>) -> String {
    match value {
        None | Some(serde_yaml::Value::Null) => QuestionsPerPage::default().to_string(),
        Some(serde_yaml::Value::Number(n)) => n.to_string(),
        Some(serde_yaml::Value::String(s)) => s.clone(),
        Some(other) => format!("{:?}", other),
    }
}
