use thiserror::Error;

/// Everything that can go wrong while paginating an attempt page.
///
/// Only the configuration variants reach the caller of `controller::init`;
/// autosave and string lookup failures are logged and absorbed where they
/// happen.
#[derive(Debug, Error)]
pub enum PaginateError {
    #[error("questions per page must be a whole number >= 1, got {0:?}")]
    InvalidQuestionsPerPage(String),
    #[error("cannot find the control to clone ({0})")]
    MissingCloneSource(&'static str),
    #[error("no autosave hook on this page")]
    AutosaveUnavailable,
    #[error("autosave failed: {0}")]
    Autosave(String),
    #[error("string lookup failed: {0}")]
    Strings(String),
    #[error("invalid quiz: {0}")]
    Quiz(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl PaginateError {
    /// True for the errors that stop the controller from activating.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            PaginateError::InvalidQuestionsPerPage(_) | PaginateError::MissingCloneSource(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PaginateError>;
