use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::error::{PaginateError, Result};
use crate::model::SavedInput;

pub const ANSWERS_FILE: &str = "answers.yaml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedAttempt {
    pub quiz_file: String,
    pub quiz_file_hash: String,
    pub saved_at: String,
    #[serde(default)]
    pub inputs: Vec<SavedInput>,
}

/// Where answers for the quiz at `quiz_path` are kept.
pub fn state_dir_for(base: &Path, quiz_path: &Path) -> PathBuf {
    let canonical = quiz_path
        .canonicalize()
        .unwrap_or_else(|_| quiz_path.to_path_buf());
    let digest = compute_str_hash(&canonical.to_string_lossy());
    // "sha256:" + 12 hex digits is plenty to keep quizzes apart
    base.join(&digest[7..19])
}

pub fn save_answers(
    state_dir: &Path,
    quiz_file: &str,
    quiz_hash: &str,
    inputs: &[SavedInput],
) -> Result<()> {
    fs::create_dir_all(state_dir)?;
    let attempt = SavedAttempt {
        quiz_file: quiz_file.to_string(),
        quiz_file_hash: quiz_hash.to_string(),
        saved_at: chrono::Utc::now().to_rfc3339(),
        inputs: inputs.to_vec(),
    };
    let yaml = serde_yaml::to_string(&attempt)?;
    atomic_write(&state_dir.join(ANSWERS_FILE), &yaml)?;
    debug!(count = inputs.len(), "answers saved");
    Ok(())
}

/// Saved inputs for this quiz, or nothing when none exist or the quiz has
/// changed since they were written.
pub fn load_answers(state_dir: &Path, quiz_hash: &str) -> Result<Vec<SavedInput>> {
    let path = state_dir.join(ANSWERS_FILE);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(&path)?;
    let attempt: SavedAttempt = serde_yaml::from_str(&content)?;
    if attempt.quiz_file_hash != quiz_hash {
        warn!(
            saved = %attempt.quiz_file_hash,
            current = %quiz_hash,
            "quiz file has changed since answers were saved, starting fresh"
        );
        return Ok(Vec::new());
    }
    Ok(attempt.inputs)
}

pub fn clear_answers(state_dir: &Path) -> Result<()> {
    let path = state_dir.join(ANSWERS_FILE);
    if path.exists() {
        fs::remove_file(&path)?;
    }
    Ok(())
}

fn atomic_write(path: &Path, content: &str) -> Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

pub fn compute_file_hash(path: &Path) -> Result<String> {
    let content = fs::read(path).map_err(|e| {
        PaginateError::Quiz(format!("cannot read file {}: {}", path.display(), e))
    })?;
    let mut hasher = Sha256::new();
    hasher.update(&content);
    Ok(format!("sha256:{}", hex_encode(&hasher.finalize())))
}

pub fn compute_str_hash(s: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    format!("sha256:{}", hex_encode(&hasher.finalize()))
}
