use thiserror::Error;

#[derive(Error, Debug)]
pub enum HueError {
    /* bridge errors */
    #[error("Bridge does not know our username (unauthorized user)")]
    UnauthorizedUser,

    #[error("Link button not pressed")]
    LinkButtonNotPressed,

    #[error("Registration on bridge failed: {0}")]
    Registration(String),

    #[error("No bridge address known, and auto discovery is disabled")]
    NoBridgeAddress,

    /* lookup errors */
    #[error("No such group: {0:?}")]
    NoSuchGroup(String),

    #[error("No such scene: {0:?}")]
    NoSuchScene(String),

    #[error("Scene {scene:?} is not defined for group {group:?}")]
    NoSuchSceneInGroup { scene: String, group: String },

    #[error("No such light: {0:?}")]
    NoSuchLight(String),

    /* mapped errors */
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    SerdeYml(#[from] serde_yml::Error),

    #[error(transparent)]
    IOError(#[from] std::io::Error),
}

pub type HueResult<T> = Result<T, HueError>;
