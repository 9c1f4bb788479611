use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkillockError {
    #[error("Skill {0} not found")]
    UnknownSkill(String),

    #[error("Target quest not found: {0}")]
    TargetNotFound(String),

    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl SkillockError {
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        SkillockError::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SkillockError>;
