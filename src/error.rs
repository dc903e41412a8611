use thiserror::Error;

use hue::error::HueError;

#[derive(Error, Debug)]
pub enum SkillError {
    /* lifecycle errors */
    #[error("Skill {skill} start delayed, waiting for bridge authorization")]
    StartDelayed { skill: String },

    #[error("Skill {skill} failed to start: {reason}")]
    StartupFailed { skill: String, reason: String },

    /* dispatch errors */
    #[error("Unknown intent {0:?}")]
    UnknownIntent(String),

    /* mapped errors */
    #[error(transparent)]
    HueError(#[from] HueError),

    #[error(transparent)]
    ConfigError(#[from] config::ConfigError),

    #[error(transparent)]
    IOError(#[from] std::io::Error),

    #[error(transparent)]
    SerdeYml(#[from] serde_yml::Error),

    #[error(transparent)]
    SetLoggerError(#[from] log::SetLoggerError),

    #[error(transparent)]
    JoinError(#[from] tokio::task::JoinError),
}

impl SkillError {
    pub fn startup_failed(skill: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::StartupFailed {
            skill: skill.into(),
            reason: reason.into(),
        }
    }

    /// Whether the host should try to start the skill again later
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::StartDelayed { .. })
    }
}

pub type SkillResult<T> = Result<T, SkillError>;
