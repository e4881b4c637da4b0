use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Frontmatter {
    pub title: Option<String>,
    /// Attempt sequence number used in question ids (`question-<attempt>-<slot>`).
    #[serde(default)]
    pub attempt: Option<u64>,
    /// Kept raw so that a bad value is reported when pagination starts.
    #[serde(default)]
    pub questions_per_page: Option<serde_yaml::Value>,
}

#[derive(Debug, Clone)]
pub struct Quiz {
    pub frontmatter: Frontmatter,
    pub title: String,
    pub preamble: Vec<String>,
    pub questions: Vec<Question>,
    pub quiz_file: String,
    pub quiz_hash: String,
}

#[derive(Debug, Clone)]
pub struct Question {
    /// Slot number, as written in the `## N. Title` heading.
    pub number: u32,
    pub title: String,
    pub body_lines: Vec<String>,
    pub kind: QuestionKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuestionKind {
    SingleChoice(Vec<Choice>),
    MultiChoice(Vec<Choice>),
    Short,
    Long,
}

impl QuestionKind {
    pub fn choices(&self) -> &[Choice] {
        match self {
            QuestionKind::SingleChoice(c) | QuestionKind::MultiChoice(c) => c,
            QuestionKind::Short | QuestionKind::Long => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub label: char,
    pub text: String,
}

/// One checked form input, as autosave records it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedInput {
    pub name: String,
    pub value: String,
}
